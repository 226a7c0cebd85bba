//! HTML writer for parsed reStructuredText.
//!
//! Reference, footnote and substitution resolution happens here because
//! targets may be defined anywhere in the document.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use super::block::{Block, Cell, Document, Image, Substitution, Table};
use super::inline::{Inline, NoteLabel, normalize_name};
use crate::message::SystemMessage;
use crate::util::{escape_html, slugify};

/// Sections are written starting at `<h2>`; `<h1>` belongs to the page.
const INITIAL_HEADER_LEVEL: usize = 2;

/// Labels for `[*]` footnotes, doubled on each pass through the list.
const NOTE_SYMBOLS: [char; 10] = ['*', '†', '‡', '§', '¶', '#', '♠', '♥', '♦', '♣'];

/// URL schemes allowed in `href` and `src` attributes.
const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

struct SectionInfo {
    level: usize,
    id: String,
    title_html: String,
}

struct NoteInfo {
    label: NoteLabel,
    /// Rendered label: the assigned number or symbol, or the citation name.
    text: String,
    id: String,
}

pub(crate) struct HtmlWriter<'d> {
    doc: &'d Document,
    out: String,
    messages: Vec<SystemMessage>,
    sections: Vec<SectionInfo>,
    /// Normalized section title to element id (implicit targets).
    implicit_targets: HashMap<String, String>,
    next_section: usize,
    open_sections: Vec<usize>,
    anonymous_refs: usize,
    first_anonymous_line: Option<usize>,
    notes: Vec<NoteInfo>,
    next_note: usize,
    auto_refs: usize,
    symbol_refs: usize,
}

impl<'d> HtmlWriter<'d> {
    pub(crate) fn new(doc: &'d Document) -> Self {
        Self {
            doc,
            out: String::with_capacity(4096),
            messages: Vec::new(),
            sections: Vec::new(),
            implicit_targets: HashMap::new(),
            next_section: 0,
            open_sections: Vec::new(),
            anonymous_refs: 0,
            first_anonymous_line: None,
            notes: Vec::new(),
            next_note: 0,
            auto_refs: 0,
            symbol_refs: 0,
        }
    }

    /// Write the document, returning HTML and resolution diagnostics.
    pub(crate) fn write(mut self) -> (String, Vec<SystemMessage>) {
        self.collect_notes();
        self.collect_sections();

        let doc = self.doc;
        for block in &doc.blocks {
            self.block(block);
        }
        while self.open_sections.pop().is_some() {
            self.out.push_str("</section>\n");
        }

        let targets = doc.anonymous_targets.len();
        if self.anonymous_refs != targets {
            self.messages.push(SystemMessage::error(
                self.first_anonymous_line.unwrap_or(1),
                format!(
                    "Anonymous hyperlink mismatch: {} references but {targets} targets.",
                    self.anonymous_refs
                ),
            ));
        }
        (self.out, self.messages)
    }

    /// Number footnotes in definition order.
    ///
    /// Auto-numbered footnotes take the lowest numbers not claimed by a
    /// manually numbered one.
    fn collect_notes(&mut self) {
        let doc = self.doc;
        let manual: HashSet<usize> = doc
            .notes
            .iter()
            .filter_map(|label| match label {
                NoteLabel::Number(n) => Some(*n),
                _ => None,
            })
            .collect();

        let mut footnotes = 0;
        let mut auto = 0;
        let mut symbols = 0;
        for label in &doc.notes {
            let (text, id) = match label {
                NoteLabel::Citation(name) => (name.clone(), format!("citation-{}", slugify(name))),
                _ => {
                    footnotes += 1;
                    let text = match label {
                        NoteLabel::Number(n) => n.to_string(),
                        NoteLabel::Symbol => {
                            symbols += 1;
                            note_symbol(symbols - 1)
                        }
                        _ => {
                            auto += 1;
                            while manual.contains(&auto) {
                                auto += 1;
                            }
                            auto.to_string()
                        }
                    };
                    (text, format!("footnote-{footnotes}"))
                }
            };
            self.notes.push(NoteInfo {
                label: label.clone(),
                text,
                id,
            });
        }
    }

    /// Assign unique ids to top-level sections and render their titles.
    fn collect_sections(&mut self) {
        let doc = self.doc;
        let mut seen: HashMap<String, usize> = HashMap::new();
        for block in &doc.blocks {
            let Block::Section { level, title, name } = block else {
                continue;
            };
            let base = slugify(name);
            let count = seen.entry(base.clone()).or_default();
            let id = if *count == 0 {
                base
            } else {
                format!("{base}-{count}")
            };
            *count += 1;

            self.implicit_targets
                .entry(normalize_name(name))
                .or_insert_with(|| format!("#{id}"));
            let title_html = self.inlines_to_string(title);
            self.sections.push(SectionInfo {
                level: *level,
                id,
                title_html,
            });
        }
    }

    fn inlines_to_string(&mut self, inlines: &[Inline]) -> String {
        let saved = std::mem::take(&mut self.out);
        // Diagnostics are reported when the title is written in place.
        let saved_messages = self.messages.len();
        let saved_refs = (
            self.anonymous_refs,
            self.first_anonymous_line,
            self.auto_refs,
            self.symbol_refs,
        );
        self.inlines(inlines);
        self.messages.truncate(saved_messages);
        (
            self.anonymous_refs,
            self.first_anonymous_line,
            self.auto_refs,
            self.symbol_refs,
        ) = saved_refs;
        std::mem::replace(&mut self.out, saved)
    }

    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Section { level, title, .. } => self.section(*level, title),
            Block::Paragraph(inlines) => {
                self.out.push_str("<p>");
                self.inlines(inlines);
                self.out.push_str("</p>\n");
            }
            Block::BulletList(items) => {
                self.out.push_str("<ul>\n");
                self.list_items(items);
                self.out.push_str("</ul>\n");
            }
            Block::EnumeratedList { start, items } => {
                if *start == 1 {
                    self.out.push_str("<ol>\n");
                } else {
                    writeln!(self.out, r#"<ol start="{start}">"#).unwrap();
                }
                self.list_items(items);
                self.out.push_str("</ol>\n");
            }
            Block::DefinitionList(items) => self.definitions("<dl>\n", items),
            Block::FieldList(items) => self.definitions("<dl class=\"field-list\">\n", items),
            Block::LiteralBlock { language, text } => match language {
                Some(lang) => writeln!(
                    self.out,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(text)
                )
                .unwrap(),
                None => writeln!(self.out, "<pre>{}</pre>", escape_html(text)).unwrap(),
            },
            Block::ParsedLiteral(inlines) => {
                self.out.push_str("<pre class=\"literal-block\">");
                self.inlines(inlines);
                self.out.push_str("</pre>\n");
            }
            Block::Math(text) => {
                writeln!(self.out, r#"<div class="math">{}</div>"#, escape_html(text)).unwrap();
            }
            Block::BlockQuote(body) => {
                self.out.push_str("<blockquote>\n");
                self.blocks(body);
                self.out.push_str("</blockquote>\n");
            }
            Block::Admonition { class, title, body } => {
                writeln!(
                    self.out,
                    r#"<aside class="admonition {}">"#,
                    escape_html(class)
                )
                .unwrap();
                writeln!(
                    self.out,
                    r#"<p class="admonition-title">{}</p>"#,
                    escape_html(title)
                )
                .unwrap();
                self.blocks(body);
                self.out.push_str("</aside>\n");
            }
            Block::Topic { class, title, body } => {
                let class = escape_html(class);
                writeln!(self.out, r#"<aside class="{class}">"#).unwrap();
                write!(self.out, r#"<p class="{class}-title">"#).unwrap();
                self.inlines(title);
                self.out.push_str("</p>\n");
                self.blocks(body);
                self.out.push_str("</aside>\n");
            }
            Block::Rubric(inlines) => {
                self.out.push_str("<p class=\"rubric\">");
                self.inlines(inlines);
                self.out.push_str("</p>\n");
            }
            Block::Container { classes, body } => {
                writeln!(self.out, r#"<div class="{}">"#, escape_html(classes)).unwrap();
                self.blocks(body);
                self.out.push_str("</div>\n");
            }
            Block::Image(image) => {
                self.image(image, None);
                self.out.push('\n');
            }
            Block::Figure {
                image,
                caption,
                legend,
            } => self.figure(image, caption, legend),
            Block::Table(table) => self.table(table),
            Block::LineBlock(lines) => {
                self.out.push_str("<div class=\"line-block\">\n");
                for line in lines {
                    self.out.push_str("<div class=\"line\">");
                    if line.is_empty() {
                        self.out.push_str("<br>");
                    }
                    self.inlines(line);
                    self.out.push_str("</div>\n");
                }
                self.out.push_str("</div>\n");
            }
            Block::Footnote { label, raw, body } => self.footnote(label, raw, body),
            Block::Contents { title } => self.contents(title),
            Block::Anchor(id) => {
                writeln!(self.out, r#"<span id="{}"></span>"#, escape_html(id)).unwrap();
            }
            Block::Transition => self.out.push_str("<hr>\n"),
        }
    }

    fn section(&mut self, level: usize, title: &[Inline]) {
        while self.open_sections.last().is_some_and(|open| *open >= level) {
            self.open_sections.pop();
            self.out.push_str("</section>\n");
        }
        self.open_sections.push(level);

        let id = match self.sections.get(self.next_section) {
            Some(info) => info.id.clone(),
            None => slugify(&format!("section-{}", self.next_section)),
        };
        self.next_section += 1;

        let h = (level + INITIAL_HEADER_LEVEL - 1).min(6);
        writeln!(self.out, r#"<section id="{}">"#, escape_html(&id)).unwrap();
        write!(self.out, "<h{h}>").unwrap();
        self.inlines(title);
        writeln!(self.out, "</h{h}>").unwrap();
    }

    fn list_items(&mut self, items: &[Vec<Block>]) {
        for item in items {
            if let [Block::Paragraph(inlines)] = item.as_slice() {
                self.out.push_str("<li>");
                self.inlines(inlines);
                self.out.push_str("</li>\n");
            } else {
                self.out.push_str("<li>\n");
                self.blocks(item);
                self.out.push_str("</li>\n");
            }
        }
    }

    fn definitions(&mut self, open: &str, items: &[(Vec<Inline>, Vec<Block>)]) {
        self.out.push_str(open);
        for (term, body) in items {
            self.out.push_str("<dt>");
            self.inlines(term);
            self.out.push_str("</dt>\n<dd>\n");
            self.blocks(body);
            self.out.push_str("</dd>\n");
        }
        self.out.push_str("</dl>\n");
    }

    fn figure(&mut self, image: &Image, caption: &[Inline], legend: &[Block]) {
        match &image.align {
            Some(align) => {
                writeln!(self.out, r#"<figure class="align-{}">"#, escape_html(align)).unwrap();
            }
            None => self.out.push_str("<figure>\n"),
        }
        self.image(image, None);
        self.out.push('\n');
        if !caption.is_empty() || !legend.is_empty() {
            self.out.push_str("<figcaption>\n");
            if !caption.is_empty() {
                self.out.push_str("<p>");
                self.inlines(caption);
                self.out.push_str("</p>\n");
            }
            if !legend.is_empty() {
                self.out.push_str("<div class=\"legend\">\n");
                self.blocks(legend);
                self.out.push_str("</div>\n");
            }
            self.out.push_str("</figcaption>\n");
        }
        self.out.push_str("</figure>\n");
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<table>\n");
        if let Some(title) = &table.title {
            self.out.push_str("<caption>");
            self.inlines(title);
            self.out.push_str("</caption>\n");
        }
        if !table.head.is_empty() {
            self.out.push_str("<thead>\n");
            self.rows(&table.head, "th");
            self.out.push_str("</thead>\n");
        }
        self.out.push_str("<tbody>\n");
        self.rows(&table.body, "td");
        self.out.push_str("</tbody>\n</table>\n");
    }

    fn rows(&mut self, rows: &[Vec<Cell>], tag: &str) {
        for row in rows {
            self.out.push_str("<tr>");
            for cell in row {
                write!(self.out, "<{tag}").unwrap();
                if cell.rowspan > 1 {
                    write!(self.out, r#" rowspan="{}""#, cell.rowspan).unwrap();
                }
                if cell.colspan > 1 {
                    write!(self.out, r#" colspan="{}""#, cell.colspan).unwrap();
                }
                self.out.push('>');
                match cell.body.as_slice() {
                    [] => {}
                    [Block::Paragraph(inlines)] => self.inlines(inlines),
                    body => {
                        self.out.push('\n');
                        self.blocks(body);
                    }
                }
                write!(self.out, "</{tag}>").unwrap();
            }
            self.out.push_str("</tr>\n");
        }
    }

    fn footnote(&mut self, label: &NoteLabel, raw: &str, body: &[Block]) {
        let (class, id, text) = match self.notes.get(self.next_note) {
            Some(note) if note.label == *label => {
                let class = if matches!(label, NoteLabel::Citation(_)) {
                    "citation"
                } else {
                    "footnote"
                };
                let text = if class == "citation" { raw } else { note.text.as_str() };
                (class, note.id.clone(), escape_html(text))
            }
            _ => ("footnote", String::new(), escape_html(raw)),
        };
        self.next_note += 1;

        if id.is_empty() {
            writeln!(self.out, r#"<aside class="{class}">"#).unwrap();
        } else {
            writeln!(self.out, r#"<aside class="{class}" id="{}">"#, escape_html(&id)).unwrap();
        }
        writeln!(self.out, r#"<span class="label">[{text}]</span>"#).unwrap();
        self.blocks(body);
        self.out.push_str("</aside>\n");
    }

    fn contents(&mut self, title: &str) {
        writeln!(
            self.out,
            r#"<nav class="contents" id="{}">"#,
            escape_html(&slugify(title))
        )
        .unwrap();
        writeln!(self.out, r#"<p class="topic-title">{}</p>"#, escape_html(title)).unwrap();

        let mut depth = 0;
        for info in &self.sections {
            while depth < info.level {
                self.out.push_str("<ul>\n");
                depth += 1;
            }
            while depth > info.level {
                self.out.push_str("</ul>\n");
                depth -= 1;
            }
            writeln!(
                self.out,
                r##"<li><a href="#{}">{}</a></li>"##,
                escape_html(&info.id),
                info.title_html
            )
            .unwrap();
        }
        while depth > 0 {
            self.out.push_str("</ul>\n");
            depth -= 1;
        }
        self.out.push_str("</nav>\n");
    }

    /// Write an image, wrapped in a link when it has a target.
    ///
    /// An image whose source has a disallowed scheme is replaced by its
    /// alternate text.
    fn image(&mut self, image: &Image, link: Option<&str>) {
        if !is_safe_url(&image.uri) {
            if let Some(alt) = &image.alt {
                self.out.push_str(&escape_html(alt));
            }
            return;
        }
        let href = image
            .target
            .as_deref()
            .or(link)
            .filter(|href| is_safe_url(href));
        if let Some(href) = href {
            write!(self.out, r#"<a href="{}">"#, escape_html(href)).unwrap();
        }
        let alt = image.alt.as_deref().unwrap_or(&image.uri);
        write!(
            self.out,
            r#"<img alt="{}" src="{}""#,
            escape_html(alt),
            escape_html(&image.uri)
        )
        .unwrap();
        if let Some(width) = &image.width {
            write!(self.out, r#" width="{}""#, escape_html(width)).unwrap();
        }
        if let Some(height) = &image.height {
            write!(self.out, r#" height="{}""#, escape_html(height)).unwrap();
        }
        if let Some(align) = &image.align {
            write!(self.out, r#" class="align-{}""#, escape_html(align)).unwrap();
        }
        self.out.push('>');
        if href.is_some() {
            self.out.push_str("</a>");
        }
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.out.push_str(&escape_html(text)),
            Inline::Emphasis(text) => self.wrap("em", text),
            Inline::Strong(text) => self.wrap("strong", text),
            Inline::Literal(text) => self.wrap("code", text),
            Inline::Interpreted(text) => self.wrap("cite", text),
            Inline::Subscript(text) => self.wrap("sub", text),
            Inline::Superscript(text) => self.wrap("sup", text),
            Inline::Abbreviation(text) => self.wrap("abbr", text),
            Inline::Math(text) => {
                write!(self.out, r#"<span class="math">{}</span>"#, escape_html(text)).unwrap();
            }
            Inline::Link { text, url } => self.link(url, text),
            Inline::Reference {
                text,
                name,
                anonymous,
                line,
            } => {
                let url = if *anonymous {
                    self.first_anonymous_line.get_or_insert(*line);
                    let url = self.doc.anonymous_targets.get(self.anonymous_refs).cloned();
                    self.anonymous_refs += 1;
                    url
                } else {
                    self.resolve(name)
                };
                match url {
                    Some(url) => self.link(&url, text),
                    None => {
                        if !*anonymous {
                            self.messages.push(SystemMessage::error(
                                *line,
                                format!("Unknown target name: \"{name}\"."),
                            ));
                        }
                        self.out.push_str(&escape_html(text));
                    }
                }
            }
            Inline::FootnoteReference { label, raw, line } => {
                self.footnote_reference(label, raw, *line);
            }
            Inline::Substitution {
                name,
                reference,
                line,
            } => {
                let doc = self.doc;
                let Some(substitution) = doc.substitutions.get(name) else {
                    self.messages.push(SystemMessage::error(
                        *line,
                        format!("Undefined substitution referenced: \"{name}\"."),
                    ));
                    return;
                };
                let link = if *reference { self.resolve(name) } else { None };
                if *reference && link.is_none() {
                    self.messages.push(SystemMessage::error(
                        *line,
                        format!("Unknown target name: \"{name}\"."),
                    ));
                }
                let link = link.filter(|url| is_safe_url(url));
                match substitution {
                    Substitution::Image(image) => self.image(image, link.as_deref()),
                    Substitution::Text(inlines) => {
                        if let Some(url) = &link {
                            write!(self.out, r#"<a href="{}">"#, escape_html(url)).unwrap();
                        }
                        self.inlines(inlines);
                        if link.is_some() {
                            self.out.push_str("</a>");
                        }
                    }
                }
            }
        }
    }

    /// Link a footnote or citation reference to its definition.
    ///
    /// `[#]_` and `[*]_` take the definitions of their kind in order.
    fn footnote_reference(&mut self, label: &NoteLabel, raw: &str, line: usize) {
        let found = match label {
            NoteLabel::Auto(None) => {
                self.auto_refs += 1;
                self.nth_note(self.auto_refs - 1, label).map_err(|available| {
                    format!(
                        "Too many autonumbered footnote references: only {available} corresponding footnotes available."
                    )
                })
            }
            NoteLabel::Symbol => {
                self.symbol_refs += 1;
                self.nth_note(self.symbol_refs - 1, label).map_err(|available| {
                    format!(
                        "Too many symbol footnote references: only {available} corresponding footnotes available."
                    )
                })
            }
            _ => self
                .notes
                .iter()
                .find(|note| note.label == *label)
                .map(|note| note.id.clone())
                .ok_or_else(|| {
                    format!(
                        "Unknown target name: \"{}\".",
                        label.refname().unwrap_or_default()
                    )
                }),
        };

        match found {
            Ok(id) => {
                let (class, text) = match label {
                    NoteLabel::Citation(_) => ("citation-reference", raw.to_owned()),
                    _ => (
                        "footnote-reference",
                        self.notes
                            .iter()
                            .find(|note| note.id == id)
                            .map(|note| note.text.clone())
                            .unwrap_or_default(),
                    ),
                };
                write!(
                    self.out,
                    r##"<a class="{class}" href="#{}">[{}]</a>"##,
                    escape_html(&id),
                    escape_html(&text)
                )
                .unwrap();
            }
            Err(message) => {
                self.messages.push(SystemMessage::error(line, message));
                write!(self.out, "[{}]_", escape_html(raw)).unwrap();
            }
        }
    }

    /// Id of the `nth` definition with `label`, or the number available.
    fn nth_note(&self, nth: usize, label: &NoteLabel) -> Result<String, usize> {
        let mut matching = self.notes.iter().filter(|note| note.label == *label);
        match matching.nth(nth) {
            Some(note) => Ok(note.id.clone()),
            None => Err(self.notes.iter().filter(|note| note.label == *label).count()),
        }
    }

    fn resolve(&self, name: &str) -> Option<String> {
        self.doc
            .targets
            .get(name)
            .or_else(|| self.implicit_targets.get(name))
            .cloned()
    }

    fn wrap(&mut self, tag: &str, text: &str) {
        write!(self.out, "<{tag}>{}</{tag}>", escape_html(text)).unwrap();
    }

    /// Write a hyperlink, or only its text when the URL scheme is disallowed.
    fn link(&mut self, url: &str, text: &str) {
        if !is_safe_url(url) {
            self.out.push_str(&escape_html(text));
            return;
        }
        write!(
            self.out,
            r#"<a href="{}">{}</a>"#,
            escape_html(url),
            escape_html(text)
        )
        .unwrap();
    }
}

/// Label of the `index`-th symbol footnote: `*`, `†`, ..., then `**`, `††`.
fn note_symbol(index: usize) -> String {
    let symbol = NOTE_SYMBOLS[index % NOTE_SYMBOLS.len()];
    std::iter::repeat_n(symbol, index / NOTE_SYMBOLS.len() + 1).collect()
}

/// Relative URLs and the schemes in [`SAFE_SCHEMES`] may be linked.
///
/// Whitespace and control characters are ignored, as browsers do when
/// reading a scheme.
fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match cleaned.find([':', '/', '?', '#']) {
        Some(pos) if cleaned[pos..].starts_with(':') => SAFE_SCHEMES
            .iter()
            .any(|scheme| cleaned[..pos].eq_ignore_ascii_case(scheme)),
        _ => true,
    }
}
