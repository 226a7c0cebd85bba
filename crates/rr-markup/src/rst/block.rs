//! Block structure parsing.
//!
//! The parser works on a slice of [`Line`]s whose indentation is relative to
//! the enclosing construct. Nested bodies (list items, block quotes,
//! directive content) are dedented and parsed recursively; line numbers
//! always refer to the original source.

mod directive;
mod table;

use std::collections::HashMap;

use super::inline::{self, Inline, NoteLabel, normalize_name};
use crate::message::SystemMessage;

pub(crate) use table::{Cell, Table};

const TAB_WIDTH: usize = 8;

/// Nested bodies (list items, quotes, directive content) deeper than this
/// are not parsed further.
const MAX_NESTING: usize = 32;

/// One source line with its indentation split off.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// 1-based source line number.
    pub no: usize,
    /// Indentation in columns relative to the enclosing construct.
    pub indent: usize,
    /// Line text without leading or trailing whitespace.
    pub text: &'a str,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Line text with its relative indentation restored.
    fn with_indent(&self) -> String {
        format!("{}{}", " ".repeat(self.indent), self.text)
    }
}

/// Split source text into lines, expanding tabs into indentation.
pub(crate) fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(idx, raw)| {
            let mut indent = 0;
            let mut offset = 0;
            for (pos, c) in raw.char_indices() {
                match c {
                    ' ' => indent += 1,
                    '\t' => indent += TAB_WIDTH - indent % TAB_WIDTH,
                    _ => {
                        offset = pos;
                        break;
                    }
                }
                offset = pos + c.len_utf8();
            }
            let text = raw[offset..].trim_end();
            Line {
                no: idx + 1,
                indent: if text.is_empty() { 0 } else { indent },
                text,
            }
        })
        .collect()
}

/// An image from the `image` directive or an image substitution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Image {
    pub uri: String,
    pub alt: Option<String>,
    pub target: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub align: Option<String>,
}

/// Replacement content of a substitution definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Substitution {
    Image(Image),
    Text(Vec<Inline>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    Section {
        level: usize,
        title: Vec<Inline>,
        /// Plain title text, used for ids and implicit targets.
        name: String,
    },
    Paragraph(Vec<Inline>),
    BulletList(Vec<Vec<Block>>),
    EnumeratedList {
        start: usize,
        items: Vec<Vec<Block>>,
    },
    DefinitionList(Vec<(Vec<Inline>, Vec<Block>)>),
    LiteralBlock {
        language: Option<String>,
        text: String,
    },
    BlockQuote(Vec<Block>),
    Admonition {
        class: String,
        title: String,
        body: Vec<Block>,
    },
    Image(Image),
    Contents {
        title: String,
    },
    /// Internal hyperlink target pointing at the following element.
    Anchor(String),
    Transition,
    /// Footnote or citation definition.
    Footnote {
        label: NoteLabel,
        /// Label as written between the brackets.
        raw: String,
        body: Vec<Block>,
    },
    Figure {
        image: Image,
        caption: Vec<Inline>,
        legend: Vec<Block>,
    },
    /// `topic` or `sidebar`.
    Topic {
        class: String,
        title: Vec<Inline>,
        body: Vec<Block>,
    },
    Rubric(Vec<Inline>),
    /// Generic `<div>` from `container`, `class`, `compound` and friends.
    Container {
        classes: String,
        body: Vec<Block>,
    },
    ParsedLiteral(Vec<Inline>),
    Math(String),
    Table(Table),
    LineBlock(Vec<Vec<Inline>>),
    FieldList(Vec<(Vec<Inline>, Vec<Block>)>),
}

/// Parsed reStructuredText document.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub blocks: Vec<Block>,
    /// Normalized target name to URL.
    pub targets: HashMap<String, String>,
    /// Anonymous target URLs in document order.
    pub anonymous_targets: Vec<String>,
    pub substitutions: HashMap<String, Substitution>,
    /// Footnote and citation labels in definition order.
    pub notes: Vec<NoteLabel>,
}

/// Section adornment style: underline character plus whether it has an overline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Adornment {
    ch: char,
    overline: bool,
}

#[derive(Default)]
pub(crate) struct BlockParser {
    doc: Document,
    messages: Vec<SystemMessage>,
    styles: Vec<Adornment>,
    /// Current section depth.
    depth: usize,
    /// Current body nesting.
    nesting: usize,
    /// Default language for literal blocks, set by `highlight`.
    highlight: Option<String>,
}

impl BlockParser {
    /// Parse a whole document.
    pub(crate) fn parse(text: &str) -> (Document, Vec<SystemMessage>) {
        let lines = split_lines(text);
        let mut parser = Self::default();
        let blocks = parser.parse_blocks(&lines, false);
        parser.doc.blocks = blocks;
        (parser.doc, parser.messages)
    }

    fn inline(&mut self, text: &str, line: usize) -> Vec<Inline> {
        inline::parse(text, line, &mut self.messages)
    }

    fn parse_blocks(&mut self, lines: &[Line<'_>], nested: bool) -> Vec<Block> {
        if self.nesting >= MAX_NESTING {
            return self.too_deep(lines);
        }
        self.nesting += 1;
        let blocks = self.parse_body(lines, nested);
        self.nesting -= 1;
        blocks
    }

    /// Keep over-nested content as a literal block instead of recursing.
    fn too_deep(&mut self, lines: &[Line<'_>]) -> Vec<Block> {
        let Some(first) = lines.iter().find(|l| !l.is_blank()) else {
            return Vec::new();
        };
        self.messages.push(SystemMessage::severe(
            first.no,
            format!("Nesting too deep: more than {MAX_NESTING} levels of nested content."),
        ));
        vec![Block::LiteralBlock {
            language: None,
            text: literal_text(lines),
        }]
    }

    fn parse_body(&mut self, lines: &[Line<'_>], nested: bool) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            if line.is_blank() {
                i += 1;
                continue;
            }

            if line.indent > 0 {
                let end = indented_end(lines, i);
                let body = dedent(&lines[i..end]);
                blocks.push(Block::BlockQuote(self.parse_blocks(&body, true)));
                i = end;
                continue;
            }

            if let Some(next) = self.try_section(lines, i, nested, &mut blocks) {
                i = next;
                continue;
            }

            if is_explicit(line.text) || is_anonymous_target(line.text) {
                let end = indented_end(lines, i + 1);
                self.explicit_markup(line, &lines[i + 1..end], &mut blocks);
                if ends_without_blank(lines, end)
                    && !is_explicit(lines[end].text)
                    && !is_anonymous_target(lines[end].text)
                {
                    self.messages.push(SystemMessage::warning(
                        lines[end].no,
                        "Explicit markup ends without a blank line; unexpected unindent.",
                    ));
                }
                i = end;
                continue;
            }

            if table::is_grid_border(line.text) {
                i = self.grid_table(lines, i, &mut blocks);
                continue;
            }

            if table::is_simple_border(line.text) {
                i = self.simple_table(lines, i, &mut blocks);
                continue;
            }

            if line_block_text(line.text).is_some() {
                i = self.line_block(lines, i, &mut blocks);
                continue;
            }

            if bullet(line.text).is_some() {
                i = self.bullet_list(lines, i, &mut blocks);
                continue;
            }

            if enumerator(line.text).is_some() {
                i = self.enumerated_list(lines, i, &mut blocks);
                continue;
            }

            if field_marker(line.text).is_some() {
                i = self.field_list(lines, i, &mut blocks);
                continue;
            }

            i = self.paragraph(lines, i, &mut blocks);
        }
        blocks
    }

    /// Recognise a section title or transition at `i`.
    fn try_section(
        &mut self,
        lines: &[Line<'_>],
        i: usize,
        nested: bool,
        blocks: &mut Vec<Block>,
    ) -> Option<usize> {
        let line = lines[i];
        let next = lines.get(i + 1);
        if is_explicit(line.text) || table::is_grid_border(line.text) {
            return None;
        }

        if is_adornment(line.text) {
            // Overline, title, underline.
            if let (Some(title), Some(under)) = (next, lines.get(i + 2))
                && !title.is_blank()
                && !is_adornment(title.text)
            {
                if under.text != line.text {
                    self.messages.push(SystemMessage::severe(
                        line.no,
                        "Title overline & underline mismatch.",
                    ));
                    blocks.push(Block::Paragraph(
                        self.inline(title.text, title.no),
                    ));
                    return Some(i + 3);
                }
                let style = Adornment {
                    ch: first_char(line.text),
                    overline: true,
                };
                self.section(title.text, title.no, style, nested, blocks);
                return Some(i + 3);
            }

            if line.text.chars().count() >= 4 && next.is_none_or(Line::is_blank) {
                if nested {
                    self.messages.push(SystemMessage::severe(
                        line.no,
                        "Unexpected section title or transition.",
                    ));
                } else {
                    blocks.push(Block::Transition);
                }
                return Some(i + 1);
            }
            return None;
        }

        let under = next?;
        if under.indent != 0 || !is_adornment(under.text) {
            return None;
        }
        let title_len = line.text.chars().count();
        let under_len = under.text.chars().count();
        if under_len < title_len {
            if under_len < 4 {
                return None;
            }
            self.messages.push(SystemMessage::warning(
                under.no,
                "Title underline too short.",
            ));
        }
        let style = Adornment {
            ch: first_char(under.text),
            overline: false,
        };
        self.section(line.text, line.no, style, nested, blocks);
        Some(i + 2)
    }

    fn section(
        &mut self,
        title: &str,
        line: usize,
        style: Adornment,
        nested: bool,
        blocks: &mut Vec<Block>,
    ) {
        let inlines = self.inline(title, line);
        if nested {
            self.messages
                .push(SystemMessage::severe(line, "Unexpected section title."));
            blocks.push(Block::Paragraph(inlines));
            return;
        }

        let level = if let Some(pos) = self.styles.iter().position(|s| *s == style) {
            pos + 1
        } else {
            self.styles.push(style);
            self.styles.len()
        };
        if level > self.depth + 1 {
            self.messages
                .push(SystemMessage::severe(line, "Title level inconsistent:"));
            blocks.push(Block::Paragraph(inlines));
            return;
        }
        self.depth = level;
        blocks.push(Block::Section {
            level,
            title: inlines,
            name: title.to_owned(),
        });
    }

    fn paragraph(&mut self, lines: &[Line<'_>], start: usize, blocks: &mut Vec<Block>) -> usize {
        let mut end = start + 1;
        while end < lines.len() && !lines[end].is_blank() && lines[end].indent == 0 {
            end += 1;
        }

        let indented_follows = lines.get(end).is_some_and(|l| !l.is_blank() && l.indent > 0);
        if indented_follows {
            if end == start + 1 {
                return self.definition_list(lines, start, blocks);
            }
            self.messages
                .push(SystemMessage::error(lines[end].no, "Unexpected indentation."));
        }

        let text = lines[start..end]
            .iter()
            .map(|l| l.text)
            .collect::<Vec<_>>()
            .join("\n");
        let first = lines[start].no;

        let Some(stripped) = text.strip_suffix("::") else {
            let inlines = self.inline(&text, first);
            blocks.push(Block::Paragraph(inlines));
            return end;
        };

        // `Paragraph::` introduces a literal block; the marker collapses to
        // a single colon, or disappears when separated by whitespace.
        let para = if stripped.trim().is_empty() {
            None
        } else if stripped.ends_with(char::is_whitespace) {
            Some(stripped.trim_end().to_owned())
        } else {
            Some(format!("{stripped}:"))
        };
        if let Some(para) = para {
            let inlines = self.inline(&para, first);
            blocks.push(Block::Paragraph(inlines));
        }

        let mut k = end;
        while k < lines.len() && lines[k].is_blank() {
            k += 1;
        }
        if k < lines.len() && lines[k].indent > 0 {
            let literal_end = indented_end(lines, k);
            blocks.push(Block::LiteralBlock {
                language: self.highlight.clone(),
                text: literal_text(&lines[k..literal_end]),
            });
            return literal_end;
        }
        self.messages.push(SystemMessage::warning(
            lines[end - 1].no + 1,
            "Literal block expected; none found.",
        ));
        end
    }

    fn definition_list(
        &mut self,
        lines: &[Line<'_>],
        start: usize,
        blocks: &mut Vec<Block>,
    ) -> usize {
        let mut items = Vec::new();
        let mut i = start;
        while is_definition_item(lines, i) {
            let term = self.inline(lines[i].text, lines[i].no);
            let end = indented_end(lines, i + 1);
            let body = dedent(&lines[i + 1..end]);
            items.push((term, self.parse_blocks(&body, true)));
            i = end;
            if ends_without_blank(lines, i) {
                self.messages.push(SystemMessage::warning(
                    lines[i].no,
                    "Definition list ends without a blank line; unexpected unindent.",
                ));
                break;
            }
        }
        blocks.push(Block::DefinitionList(items));
        i
    }

    fn bullet_list(&mut self, lines: &[Line<'_>], start: usize, blocks: &mut Vec<Block>) -> usize {
        let Some((marker, _)) = bullet(lines[start].text) else {
            return start + 1;
        };
        let mut items = Vec::new();
        let mut i = start;
        while let Some((m, content)) = lines.get(i).and_then(|l| bullet(l.text)) {
            if m != marker {
                break;
            }
            let (item, end) = self.list_item(lines, i, content);
            items.push(item);
            i = end;
        }
        if ends_without_blank(lines, i) {
            self.messages.push(SystemMessage::warning(
                lines[i].no,
                "Bullet list ends without a blank line; unexpected unindent.",
            ));
        }
        blocks.push(Block::BulletList(items));
        i
    }

    fn enumerated_list(
        &mut self,
        lines: &[Line<'_>],
        start: usize,
        blocks: &mut Vec<Block>,
    ) -> usize {
        let Some(first) = enumerator(lines[start].text) else {
            return start + 1;
        };
        let mut items = Vec::new();
        let mut i = start;
        while let Some(e) = lines.get(i).and_then(|l| enumerator(l.text)) {
            if e.style != first.style {
                break;
            }
            let (item, end) = self.list_item(lines, i, e.content);
            items.push(item);
            i = end;
        }
        if ends_without_blank(lines, i) {
            self.messages.push(SystemMessage::warning(
                lines[i].no,
                "Enumerated list ends without a blank line; unexpected unindent.",
            ));
        }
        blocks.push(Block::EnumeratedList {
            start: first.ordinal.unwrap_or(1),
            items,
        });
        i
    }

    /// Parse one list item whose first line holds `content` after the marker.
    fn list_item<'a>(
        &mut self,
        lines: &[Line<'a>],
        i: usize,
        content: &'a str,
    ) -> (Vec<Block>, usize) {
        let end = indented_end(lines, i + 1);
        let mut body = vec![Line {
            no: lines[i].no,
            indent: 0,
            text: content,
        }];
        body.extend(dedent(&lines[i + 1..end]));
        (self.parse_blocks(&body, true), end)
    }

    fn line_block(&mut self, lines: &[Line<'_>], start: usize, blocks: &mut Vec<Block>) -> usize {
        let mut entries: Vec<(usize, String)> = Vec::new();
        let mut i = start;
        while let Some(l) = lines.get(i).filter(|l| !l.is_blank()) {
            if l.indent == 0 {
                let Some(text) = line_block_text(l.text) else {
                    break;
                };
                entries.push((l.no, text.to_owned()));
            } else if let Some((_, text)) = entries.last_mut() {
                text.push('\n');
                text.push_str(l.text);
            }
            i += 1;
        }
        if ends_without_blank(lines, i) {
            self.messages.push(SystemMessage::warning(
                lines[i].no,
                "Line block ends without a blank line.",
            ));
        }
        let rendered = entries
            .iter()
            .map(|(no, text)| self.inline(text, *no))
            .collect();
        blocks.push(Block::LineBlock(rendered));
        i
    }

    fn field_list(&mut self, lines: &[Line<'_>], start: usize, blocks: &mut Vec<Block>) -> usize {
        let mut items = Vec::new();
        let mut i = start;
        while let Some(line) = lines.get(i).filter(|l| l.indent == 0)
            && let Some((name, text)) = field_marker(line.text)
        {
            let end = indented_end(lines, i + 1);
            let mut body = Vec::new();
            if !text.is_empty() {
                body.push(Line {
                    no: line.no,
                    indent: 0,
                    text,
                });
            }
            body.extend(dedent(&lines[i + 1..end]));
            let name = self.inline(name, line.no);
            items.push((name, self.parse_blocks(&body, true)));
            i = end;
        }
        if ends_without_blank(lines, i) {
            self.messages.push(SystemMessage::warning(
                lines[i].no,
                "Field list ends without a blank line; unexpected unindent.",
            ));
        }
        blocks.push(Block::FieldList(items));
        i
    }

    fn explicit_markup(&mut self, first: Line<'_>, body: &[Line<'_>], blocks: &mut Vec<Block>) {
        if let Some(url) = first.text.strip_prefix("__") {
            self.doc.anonymous_targets.push(target_url(url, body));
            return;
        }
        let rest = first.text[2..].trim_start();

        if let Some(target) = rest.strip_prefix('_') {
            self.hyperlink_target(target, first.no, body, blocks);
            return;
        }

        if let Some(bracketed) = rest.strip_prefix('[')
            && let Some((raw, text)) = bracketed.split_once(']')
            && text.chars().next().is_none_or(char::is_whitespace)
            && let Some(label) = NoteLabel::parse(raw)
        {
            self.footnote(label, raw, text.trim_start(), first.no, body, blocks);
            return;
        }

        if let Some(sub) = rest.strip_prefix('|') {
            self.substitution_definition(sub, first.no, body);
            return;
        }

        if let Some((name, args)) = directive_head(rest) {
            self.directive(name, args, first.no, body, blocks);
        }
        // Anything else is a comment.
    }

    fn hyperlink_target(
        &mut self,
        target: &str,
        line: usize,
        body: &[Line<'_>],
        blocks: &mut Vec<Block>,
    ) {
        let (name, url) = if let Some(rest) = target.strip_prefix("_:") {
            ("_".to_owned(), rest)
        } else if let Some(quoted) = target.strip_prefix('`')
            && let Some((name, rest)) = quoted.split_once("`:")
        {
            (name.to_owned(), rest)
        } else if let Some((name, rest)) = target.split_once(':') {
            (name.to_owned(), rest)
        } else {
            // Not a target after all; treat as comment.
            return;
        };

        let mut url = target_url(url, body);

        if name == "_" {
            self.doc.anonymous_targets.push(url);
            return;
        }

        let key = normalize_name(&name);
        if url.is_empty() {
            let id = crate::util::slugify(&key);
            blocks.push(Block::Anchor(id.clone()));
            url = format!("#{id}");
        }
        if self.doc.targets.insert(key.clone(), url).is_some() {
            self.messages.push(SystemMessage::warning(
                line,
                format!("Duplicate explicit target name: \"{key}\"."),
            ));
        }
    }

    fn footnote(
        &mut self,
        label: NoteLabel,
        raw: &str,
        text: &str,
        line: usize,
        body: &[Line<'_>],
        blocks: &mut Vec<Block>,
    ) {
        if let Some(name) = label.refname()
            && self.doc.notes.contains(&label)
        {
            self.messages.push(SystemMessage::warning(
                line,
                format!("Duplicate explicit target name: \"{name}\"."),
            ));
        }
        let mut lines = Vec::new();
        if !text.is_empty() {
            lines.push(Line {
                no: line,
                indent: 0,
                text,
            });
        }
        lines.extend(dedent(body));
        self.doc.notes.push(label.clone());
        let body = self.parse_blocks(&lines, true);
        blocks.push(Block::Footnote {
            label,
            raw: raw.to_owned(),
            body,
        });
    }
}

/// URL of a hyperlink target, joined across continuation lines.
fn target_url(first: &str, body: &[Line<'_>]) -> String {
    let mut url: String = first.split_whitespace().collect();
    for l in body {
        url.extend(l.text.split_whitespace());
    }
    url
}

/// Index of the first non-blank line at indentation 0 at or after `start`.
fn indented_end(lines: &[Line<'_>], start: usize) -> usize {
    let mut end = start;
    while end < lines.len() && (lines[end].is_blank() || lines[end].indent > 0) {
        end += 1;
    }
    end
}

/// True when a construct ending at `end` is followed directly by more text.
fn ends_without_blank(lines: &[Line<'_>], end: usize) -> bool {
    end > 0 && end < lines.len() && !lines[end - 1].is_blank()
}

fn is_explicit(text: &str) -> bool {
    text == ".." || text.starts_with(".. ")
}

/// Short anonymous target form, `__ https://example.com`.
fn is_anonymous_target(text: &str) -> bool {
    text == "__" || text.starts_with("__ ")
}

/// Text of a line block line, `| text`.
fn line_block_text(text: &str) -> Option<&str> {
    if text == "|" {
        Some("")
    } else {
        text.strip_prefix("| ").map(str::trim_start)
    }
}

/// `:name: body` at the start of a field list item.
fn field_marker(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(':')?;
    if rest.starts_with([' ', ':']) {
        return None;
    }
    let mut from = 0;
    loop {
        let pos = from + rest[from..].find(':')?;
        let before = rest[..pos].chars().last();
        let after = rest[pos + 1..].chars().next();
        if before.is_some_and(|c| !c.is_whitespace() && c != '\\')
            && after.is_none_or(char::is_whitespace)
        {
            return Some((&rest[..pos], rest[pos + 1..].trim_start()));
        }
        from = pos + 1;
    }
}

/// Remove the common indentation and trailing blank lines.
fn dedent<'a>(lines: &[Line<'a>]) -> Vec<Line<'a>> {
    let min = lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(|l| l.indent)
        .min()
        .unwrap_or(0);
    let last = lines.iter().rposition(|l| !l.is_blank()).map_or(0, |p| p + 1);
    lines[..last]
        .iter()
        .map(|l| Line {
            indent: l.indent.saturating_sub(min),
            ..*l
        })
        .collect()
}

fn skip_blank<'a, 'b>(lines: &'b [Line<'a>]) -> &'b [Line<'a>] {
    let first = lines.iter().position(|l| !l.is_blank()).unwrap_or(lines.len());
    &lines[first..]
}

fn literal_text(lines: &[Line<'_>]) -> String {
    dedent(skip_blank(lines))
        .iter()
        .map(Line::with_indent)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split leading `:name: value` field lines from directive content.
fn split_options<'a>(body: &[Line<'a>]) -> (Vec<(&'a str, &'a str)>, Vec<Line<'a>>) {
    let body = dedent(skip_blank(body));
    let mut options = Vec::new();
    let mut i = 0;
    while let Some(l) = body.get(i) {
        let Some(field) = l.text.strip_prefix(':') else {
            break;
        };
        let Some((key, value)) = field.split_once(':') else {
            break;
        };
        if key.is_empty() || key.contains(char::is_whitespace) {
            break;
        }
        options.push((key, value.trim()));
        i += 1;
    }
    let content = dedent(skip_blank(&body[i..]));
    (options, content)
}

fn is_definition_item(lines: &[Line<'_>], i: usize) -> bool {
    let (Some(term), Some(def)) = (lines.get(i), lines.get(i + 1)) else {
        return false;
    };
    !term.is_blank() && term.indent == 0 && !def.is_blank() && def.indent > 0
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or(' ')
}

/// A line made of one repeated punctuation character.
fn is_adornment(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(c) = chars.next() else {
        return false;
    };
    c.is_ascii_punctuation() && chars.all(|x| x == c) && text.len() > 1
}

/// `- item`, `* item` or `+ item`; returns the marker and item text.
fn bullet(text: &str) -> Option<(char, &str)> {
    let marker = text.chars().next()?;
    if !matches!(marker, '-' | '*' | '+' | '\u{2022}') {
        return None;
    }
    let rest = &text[marker.len_utf8()..];
    if rest.is_empty() {
        return Some((marker, rest));
    }
    rest.strip_prefix(' ').map(|r| (marker, r.trim_start()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumStyle {
    Period,
    Paren,
    Parens,
}

struct Enumerator<'a> {
    ordinal: Option<usize>,
    style: EnumStyle,
    content: &'a str,
}

/// `1. item`, `1) item`, `(1) item` or `#. item`.
fn enumerator(text: &str) -> Option<Enumerator<'_>> {
    let (inner, style, rest) = if let Some(r) = text.strip_prefix('(') {
        let (inner, rest) = r.split_once(')')?;
        (inner, EnumStyle::Parens, rest)
    } else {
        let pos = text.find(['.', ')'])?;
        let style = if text[pos..].starts_with('.') {
            EnumStyle::Period
        } else {
            EnumStyle::Paren
        };
        (&text[..pos], style, &text[pos + 1..])
    };

    let ordinal = if inner == "#" {
        None
    } else if !inner.is_empty() && inner.len() <= 9 && inner.chars().all(|c| c.is_ascii_digit()) {
        Some(inner.parse().ok()?)
    } else {
        return None;
    };

    let content = if rest.is_empty() {
        rest
    } else {
        rest.strip_prefix(' ')?.trim_start()
    };
    Some(Enumerator {
        ordinal,
        style,
        content,
    })
}

/// `name:: arguments` at the start of explicit markup.
fn directive_head(rest: &str) -> Option<(&str, &str)> {
    let pos = rest.find("::")?;
    let name = &rest[..pos];
    let after = &rest[pos + 2..];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.:".contains(c))
        && after.chars().next().is_none_or(char::is_whitespace);
    valid.then(|| (name, after.trim()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::message::Severity;

    fn parse_ok(text: &str) -> Document {
        let (doc, messages) = BlockParser::parse(text);
        assert!(messages.is_empty(), "unexpected messages: {messages:?}");
        doc
    }

    fn messages(text: &str) -> Vec<SystemMessage> {
        BlockParser::parse(text).1
    }

    fn para(s: &str) -> Block {
        Block::Paragraph(vec![Inline::Text(s.to_owned())])
    }

    #[test]
    fn test_split_lines_expands_tabs() {
        let lines = split_lines("a\n\tb\n  c  \n   ");
        assert_eq!(lines.len(), 4);
        assert_eq!((lines[1].indent, lines[1].text), (8, "b"));
        assert_eq!((lines[2].indent, lines[2].text), (2, "c"));
        assert!(lines[3].is_blank());
        assert_eq!(lines[3].indent, 0);
    }

    #[test]
    fn test_paragraphs() {
        let doc = parse_ok("First\nparagraph.\n\nSecond.");
        assert_eq!(doc.blocks, vec![para("First\nparagraph."), para("Second.")]);
    }

    #[test]
    fn test_sections_and_levels() {
        let doc = parse_ok("=====\nTitle\n=====\n\nIntro.\n\nPart\n----\n\nBody.\n\nNext\n----\n");
        let levels: Vec<_> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Section { level, name, .. } => Some((*level, name.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![(1, "Title"), (2, "Part"), (2, "Next")]);
    }

    #[test]
    fn test_title_underline_too_short() {
        let msgs = messages("Long title\n=====\n\nText.");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].to_string(), "line 2: Warning: Title underline too short.");
    }

    #[test]
    fn test_very_short_underline_is_paragraph() {
        let doc = parse_ok("Some text\n==");
        assert_eq!(doc.blocks, vec![para("Some text\n==")]);
    }

    #[test]
    fn test_title_level_inconsistent() {
        let msgs = messages("Title\n=====\n\nSub\n---\n\nSubsub\n~~~~~~\n\nOther\n=====\n\nJump\n~~~~\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].severity, Severity::Severe);
        assert_eq!(msgs[0].line, 13);
    }

    #[test]
    fn test_overline_mismatch() {
        let msgs = messages("=====\nTitle\n-----\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].severity, Severity::Severe);
    }

    #[test]
    fn test_transition() {
        let doc = parse_ok("Above.\n\n----------\n\nBelow.");
        assert_eq!(doc.blocks, vec![para("Above."), Block::Transition, para("Below.")]);
    }

    #[test]
    fn test_bullet_list() {
        let doc = parse_ok("- one\n- two\n  continued\n\n- three");
        assert_eq!(
            doc.blocks,
            vec![Block::BulletList(vec![
                vec![para("one")],
                vec![para("two\ncontinued")],
                vec![para("three")],
            ])]
        );
    }

    #[test]
    fn test_nested_bullet_list() {
        let doc = parse_ok("* outer\n\n  + inner\n");
        assert_eq!(
            doc.blocks,
            vec![Block::BulletList(vec![vec![
                para("outer"),
                Block::BulletList(vec![vec![para("inner")]]),
            ]])]
        );
    }

    #[test]
    fn test_bullet_list_without_blank_line() {
        let msgs = messages("- one\n- two\nNot an item.");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].line, 3);
        assert_eq!(
            msgs[0].message,
            "Bullet list ends without a blank line; unexpected unindent."
        );
    }

    #[test]
    fn test_enumerated_list() {
        let doc = parse_ok("3. three\n4. four\n");
        assert_eq!(
            doc.blocks,
            vec![Block::EnumeratedList {
                start: 3,
                items: vec![vec![para("three")], vec![para("four")]],
            }]
        );
        let doc = parse_ok("#) auto\n#) auto\n");
        assert!(matches!(doc.blocks[0], Block::EnumeratedList { start: 1, .. }));
    }

    #[test]
    fn test_definition_list() {
        let doc = parse_ok("term\n    Definition.\n\nother\n    More.\n");
        assert_eq!(
            doc.blocks,
            vec![Block::DefinitionList(vec![
                (vec![Inline::Text("term".to_owned())], vec![para("Definition.")]),
                (vec![Inline::Text("other".to_owned())], vec![para("More.")]),
            ])]
        );
    }

    #[test]
    fn test_unexpected_indentation() {
        let (doc, msgs) = BlockParser::parse("Line one\nline two\n    indented\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].to_string(), "line 3: Error: Unexpected indentation.");
        assert!(matches!(doc.blocks[1], Block::BlockQuote(_)));
    }

    #[test]
    fn test_literal_block() {
        let doc = parse_ok("Example::\n\n    $ pip install rr\n      --upgrade\n\nAfter.");
        assert_eq!(
            doc.blocks,
            vec![
                para("Example:"),
                Block::LiteralBlock {
                    language: None,
                    text: "$ pip install rr\n  --upgrade".to_owned(),
                },
                para("After."),
            ]
        );
    }

    #[test]
    fn test_expanded_literal_marker() {
        let doc = parse_ok("Example ::\n\n    code\n");
        assert_eq!(doc.blocks[0], para("Example"));
        let doc = parse_ok("::\n\n    code\n");
        assert!(matches!(doc.blocks[0], Block::LiteralBlock { .. }));
    }

    #[test]
    fn test_literal_block_expected() {
        let msgs = messages("Example::\n\nNot indented.");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].message, "Literal block expected; none found.");
    }

    #[test]
    fn test_block_quote() {
        let doc = parse_ok("Intro.\n\n    Quoted text.\n");
        assert_eq!(
            doc.blocks,
            vec![para("Intro."), Block::BlockQuote(vec![para("Quoted text.")])]
        );
    }

    #[test]
    fn test_comment_is_dropped() {
        let doc = parse_ok(".. This is a comment\n   spanning lines.\n\nText.");
        assert_eq!(doc.blocks, vec![para("Text.")]);
    }

    #[test]
    fn test_targets() {
        let doc = parse_ok(".. _PyPI: https://pypi.org/\n.. _`Read the Docs`: https://readthedocs.org/\n.. __: https://example.com\n");
        assert_eq!(doc.targets.get("pypi").map(String::as_str), Some("https://pypi.org/"));
        assert_eq!(
            doc.targets.get("read the docs").map(String::as_str),
            Some("https://readthedocs.org/")
        );
        assert_eq!(doc.anonymous_targets, vec!["https://example.com".to_owned()]);
    }

    #[test]
    fn test_duplicate_target() {
        let msgs = messages(".. _a: https://one\n.. _A: https://two\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].message, "Duplicate explicit target name: \"a\".");
    }

    #[test]
    fn test_explicit_markup_without_blank_line() {
        let msgs = messages(".. note:: Careful.\nText.");
        assert_eq!(msgs.len(), 1);
        assert_eq!(
            msgs[0].message,
            "Explicit markup ends without a blank line; unexpected unindent."
        );
    }

    #[test]
    fn test_image_directive() {
        let doc = parse_ok(".. image:: https://img.shields.io/pypi/v/rr.svg\n   :alt: Version\n   :target: https://pypi.org/project/rr\n");
        assert_eq!(
            doc.blocks,
            vec![Block::Image(Image {
                uri: "https://img.shields.io/pypi/v/rr.svg".to_owned(),
                alt: Some("Version".to_owned()),
                target: Some("https://pypi.org/project/rr".to_owned()),
                ..Image::default()
            })]
        );
    }

    #[test]
    fn test_image_unknown_option() {
        let msgs = messages(".. image:: a.png\n   :bogus: 1\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].severity, Severity::Error);
        assert!(msgs[0].message.contains("unknown option: \"bogus\""));
    }

    #[test]
    fn test_code_directive() {
        let doc = parse_ok(".. code-block:: python\n\n   import rr\n   print(rr)\n");
        assert_eq!(
            doc.blocks,
            vec![Block::LiteralBlock {
                language: Some("python".to_owned()),
                text: "import rr\nprint(rr)".to_owned(),
            }]
        );
    }

    #[test]
    fn test_admonition() {
        let doc = parse_ok(".. warning:: Mind the gap.\n");
        assert_eq!(
            doc.blocks,
            vec![Block::Admonition {
                class: "warning".to_owned(),
                title: "Warning".to_owned(),
                body: vec![para("Mind the gap.")],
            }]
        );
    }

    #[test]
    fn test_unknown_directive() {
        let msgs = messages(".. frobnicate:: now\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(
            msgs[0].to_string(),
            "line 1: Error: Unknown directive type \"frobnicate\"."
        );
    }

    #[test]
    fn test_raw_directive_disabled() {
        let msgs = messages(".. raw:: html\n\n   <b>hi</b>\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].severity, Severity::Warning);
    }

    #[test]
    fn test_substitution_definitions() {
        let doc = parse_ok(".. |badge| image:: https://example.com/b.svg\n.. |name| replace:: *rr*\n");
        assert!(matches!(doc.substitutions.get("badge"), Some(Substitution::Image(_))));
        assert_eq!(
            doc.substitutions.get("name"),
            Some(&Substitution::Text(vec![Inline::Emphasis("rr".to_owned())]))
        );
    }

    #[test]
    fn test_section_inside_list_is_unexpected() {
        let msgs = messages("- Title\n  =====\n");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].message, "Unexpected section title.");
    }

    #[test]
    fn test_deeply_nested_bullets_are_capped() {
        let (doc, messages) = BlockParser::parse(&"- ".repeat(1500));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Severe);
        assert_eq!(
            messages[0].message,
            "Nesting too deep: more than 32 levels of nested content."
        );
        assert!(matches!(doc.blocks.as_slice(), [Block::BulletList(_)]));
    }

    #[test]
    fn test_deep_block_quotes_are_capped() {
        let text: String = (0..500)
            .map(|i| format!("{}level\n\n", " ".repeat(i)))
            .collect();
        let messages = messages(&text);
        let severe = messages
            .iter()
            .filter(|m| m.severity == Severity::Severe)
            .count();
        assert_eq!(severe, 1);
    }

    #[test]
    fn test_anonymous_target_short_form() {
        let doc = parse_ok("See the docs__.\n\n__ https://example.com\n");
        assert_eq!(doc.anonymous_targets, vec!["https://example.com".to_owned()]);
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_footnote_definitions() {
        let doc = parse_ok(".. [1] First.\n.. [#note] Second.\n\n.. [CIT] Third.\n");
        assert_eq!(
            doc.notes,
            vec![
                NoteLabel::Number(1),
                NoteLabel::Auto(Some("note".to_owned())),
                NoteLabel::Citation("cit".to_owned()),
            ]
        );
        assert_eq!(
            doc.blocks[0],
            Block::Footnote {
                label: NoteLabel::Number(1),
                raw: "1".to_owned(),
                body: vec![para("First.")],
            }
        );
    }

    #[test]
    fn test_duplicate_footnote() {
        let messages = messages(".. [1] a\n.. [1] b\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Duplicate explicit target name: \"1\".");
    }

    #[test]
    fn test_line_block() {
        let doc = parse_ok("| one\n|\n| two\n   continued\n");
        let [Block::LineBlock(lines)] = doc.blocks.as_slice() else {
            panic!("expected a line block, got {:?}", doc.blocks);
        };
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![Inline::Text("one".to_owned())]);
        assert!(lines[1].is_empty());

        let messages = messages("| one\nplain\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Line block ends without a blank line.");
    }

    #[test]
    fn test_field_list() {
        let doc = parse_ok(":Author: Me\n:Version: 1.0\n");
        assert_eq!(
            doc.blocks,
            vec![Block::FieldList(vec![
                (vec![Inline::Text("Author".to_owned())], vec![para("Me")]),
                (vec![Inline::Text("Version".to_owned())], vec![para("1.0")]),
            ])]
        );
    }
}
