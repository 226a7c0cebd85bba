//! Directives and substitution definitions.
//!
//! Every standard docutils directive is recognised. Those without a visual
//! counterpart in a long description (`sectnum`, `meta`, `header` and the
//! like) produce no output; `raw`, `include` and file-backed `csv-table`
//! are disabled and reported.

use super::table::{Cell, Table, parse_csv};
use super::{
    Block, BlockParser, Image, Line, Substitution, directive_head, literal_text, normalize_name,
    split_options,
};
use crate::message::SystemMessage;
use crate::rst::inline::Inline;
use crate::util::slugify;

const ADMONITIONS: &[(&str, &str)] = &[
    ("attention", "Attention"),
    ("caution", "Caution"),
    ("danger", "Danger"),
    ("error", "Error"),
    ("hint", "Hint"),
    ("important", "Important"),
    ("note", "Note"),
    ("tip", "Tip"),
    ("warning", "Warning"),
];

const IMAGE_OPTIONS: &[&str] = &[
    "alt", "height", "width", "scale", "align", "target", "class", "name", "loading",
];

const FIGURE_OPTIONS: &[&str] = &[
    "alt", "height", "width", "scale", "align", "target", "class", "name", "loading",
    "figwidth", "figclass",
];

/// Directives that only affect processing or metadata.
const SILENT: &[&str] = &[
    "sectnum",
    "section-numbering",
    "header",
    "footer",
    "meta",
    "title",
    "target-notes",
    "default-role",
    "role",
];

/// Directives whose body becomes a generic container with their own class.
const CONTAINERS: &[&str] = &["compound", "epigraph", "highlights", "pull-quote"];

impl BlockParser {
    pub(super) fn directive(
        &mut self,
        name: &str,
        args: &str,
        line: usize,
        body: &[Line<'_>],
        blocks: &mut Vec<Block>,
    ) {
        match name {
            "image" => {
                if let Some(image) = self.image(args, line, body) {
                    blocks.push(Block::Image(image));
                }
            }
            "figure" => self.figure(args, line, body, blocks),
            "code" | "code-block" | "sourcecode" => {
                let (_, content) = split_options(body);
                if content.is_empty() {
                    self.content_expected(name, line);
                    return;
                }
                let language = args.split_whitespace().next().map(str::to_owned);
                blocks.push(Block::LiteralBlock {
                    language,
                    text: literal_text(&content),
                });
            }
            "parsed-literal" => {
                let (_, content) = split_options(body);
                let Some(first) = content.first() else {
                    self.content_expected(name, line);
                    return;
                };
                let inlines = self.inline(&literal_text(&content), first.no);
                blocks.push(Block::ParsedLiteral(inlines));
            }
            "math" => {
                let (_, content) = split_options(body);
                let mut parts = Vec::new();
                if !args.is_empty() {
                    parts.push(args.to_owned());
                }
                if !content.is_empty() {
                    parts.push(literal_text(&content));
                }
                if parts.is_empty() {
                    self.content_expected(name, line);
                    return;
                }
                blocks.push(Block::Math(parts.join("\n\n")));
            }
            "contents" => {
                let title = if args.is_empty() { "Contents" } else { args };
                blocks.push(Block::Contents {
                    title: title.to_owned(),
                });
            }
            "admonition" => {
                if args.is_empty() {
                    self.missing_argument(name, line);
                    return;
                }
                if let Some(body) = self.directive_body(name, line, body) {
                    blocks.push(Block::Admonition {
                        class: format!("admonition-{}", slugify(args)),
                        title: args.to_owned(),
                        body,
                    });
                }
            }
            "topic" | "sidebar" => {
                if args.is_empty() {
                    self.missing_argument(name, line);
                    return;
                }
                let title = self.inline(args, line);
                if let Some(body) = self.directive_body(name, line, body) {
                    blocks.push(Block::Topic {
                        class: name.to_owned(),
                        title,
                        body,
                    });
                }
            }
            "rubric" => {
                if args.is_empty() {
                    self.missing_argument(name, line);
                    return;
                }
                let title = self.inline(args, line);
                blocks.push(Block::Rubric(title));
            }
            "container" | "class" => {
                let classes = args.split_whitespace().collect::<Vec<_>>().join(" ");
                let (_, content) = split_options(body);
                if content.is_empty() {
                    // `class` without content applies to the next element.
                    if name == "container" {
                        self.content_expected(name, line);
                    }
                    return;
                }
                let body = self.parse_blocks(&content, true);
                let classes = if name == "container" {
                    format!("container {classes}").trim_end().to_owned()
                } else {
                    classes
                };
                blocks.push(Block::Container { classes, body });
            }
            "list-table" => {
                if let Some(table) = self.list_table(args, line, body) {
                    blocks.push(Block::Table(table));
                }
            }
            "csv-table" => {
                if let Some(table) = self.csv_table(args, line, body) {
                    blocks.push(Block::Table(table));
                }
            }
            "table" => self.table(args, line, body, blocks),
            "highlight" => {
                self.highlight = args.split_whitespace().next().map(str::to_owned);
            }
            "raw" | "include" => {
                self.messages.push(SystemMessage::warning(
                    line,
                    format!("\"{name}\" directive disabled."),
                ));
            }
            "replace" | "unicode" | "date" => {
                self.messages.push(SystemMessage::error(
                    line,
                    format!(
                        "Invalid context: the \"{name}\" directive can only be used within a substitution definition."
                    ),
                ));
            }
            _ if SILENT.contains(&name) => {}
            _ if CONTAINERS.contains(&name) => {
                if let Some(body) = self.directive_body(name, line, body) {
                    blocks.push(Block::Container {
                        classes: name.to_owned(),
                        body,
                    });
                }
            }
            _ => {
                let Some(&(class, title)) = ADMONITIONS.iter().find(|(n, _)| *n == name) else {
                    self.messages.push(SystemMessage::error(
                        line,
                        format!("Unknown directive type \"{name}\"."),
                    ));
                    return;
                };
                let (_, content) = split_options(body);
                let mut lines = Vec::new();
                if !args.is_empty() {
                    lines.push(Line {
                        no: line,
                        indent: 0,
                        text: args,
                    });
                }
                lines.extend(content);
                if lines.is_empty() {
                    self.content_expected(name, line);
                    return;
                }
                let body = self.parse_blocks(&lines, true);
                blocks.push(Block::Admonition {
                    class: class.to_owned(),
                    title: title.to_owned(),
                    body,
                });
            }
        }
    }

    pub(super) fn substitution_definition(&mut self, sub: &str, line: usize, body: &[Line<'_>]) {
        let parsed = sub.split_once('|').and_then(|(name, rest)| {
            let (directive, args) = directive_head(rest.trim_start())?;
            Some((normalize_name(name), directive, args))
        });
        let Some((name, directive, args)) = parsed else {
            self.messages.push(SystemMessage::error(
                line,
                format!(
                    "Substitution definition \"{}\" empty or invalid.",
                    sub.split('|').next().unwrap_or_default()
                ),
            ));
            return;
        };

        let mut text = args.to_owned();
        for l in body {
            text.push(' ');
            text.push_str(l.text);
        }

        let substitution = match directive {
            "image" => self.image(args, line, body).map(Substitution::Image),
            "replace" => Some(Substitution::Text(self.inline(text.trim(), line))),
            "unicode" => match decode_unicode(&text) {
                Ok(decoded) => Some(Substitution::Text(vec![Inline::Text(decoded)])),
                Err(msg) => {
                    self.directive_error(directive, line, &msg);
                    None
                }
            },
            "date" => Some(Substitution::Text(vec![Inline::Text(today(text.trim()))])),
            other => {
                self.messages.push(SystemMessage::error(
                    line,
                    format!("Unknown directive type \"{other}\"."),
                ));
                None
            }
        };
        if let Some(substitution) = substitution {
            self.doc.substitutions.insert(name, substitution);
        }
    }

    fn content_expected(&mut self, name: &str, line: usize) {
        self.messages.push(SystemMessage::error(
            line,
            format!("Content block expected for the \"{name}\" directive; none found."),
        ));
    }

    fn directive_error(&mut self, name: &str, line: usize, msg: &str) {
        self.messages.push(SystemMessage::error(
            line,
            format!("Error in \"{name}\" directive:\n{msg}"),
        ));
    }

    fn missing_argument(&mut self, name: &str, line: usize) {
        self.directive_error(name, line, "1 argument(s) required, 0 supplied.");
    }

    /// Parse required directive content, skipping leading options.
    fn directive_body(&mut self, name: &str, line: usize, body: &[Line<'_>]) -> Option<Vec<Block>> {
        let (_, content) = split_options(body);
        if content.is_empty() {
            self.content_expected(name, line);
            return None;
        }
        Some(self.parse_blocks(&content, true))
    }

    pub(super) fn image(&mut self, args: &str, line: usize, body: &[Line<'_>]) -> Option<Image> {
        let (image, content) = self.image_parts("image", IMAGE_OPTIONS, args, line, body)?;
        if !content.is_empty() {
            self.directive_error("image", line, "no content permitted.");
            return None;
        }
        Some(image)
    }

    /// Parse an image reference and its options, returning any content.
    fn image_parts<'a>(
        &mut self,
        name: &str,
        allowed: &[&str],
        args: &str,
        line: usize,
        body: &[Line<'a>],
    ) -> Option<(Image, Vec<Line<'a>>)> {
        if args.is_empty() {
            self.missing_argument(name, line);
            return None;
        }
        let (options, content) = split_options(body);

        let mut image = Image {
            uri: args.split_whitespace().collect(),
            ..Image::default()
        };
        for (key, value) in options {
            if !allowed.contains(&key) {
                self.directive_error(name, line, &format!("unknown option: \"{key}\"."));
                return None;
            }
            let value = Some(value.to_owned());
            match key {
                "alt" => image.alt = value,
                "target" => image.target = value.map(|v| v.split_whitespace().collect()),
                "width" => image.width = value,
                "height" => image.height = value,
                "align" => image.align = value,
                _ => {}
            }
        }
        Some((image, content))
    }

    /// `figure`: an image, then an optional caption paragraph and legend.
    fn figure(&mut self, args: &str, line: usize, body: &[Line<'_>], blocks: &mut Vec<Block>) {
        let Some((image, content)) = self.image_parts("figure", FIGURE_OPTIONS, args, line, body)
        else {
            return;
        };
        let mut parsed = self.parse_blocks(&content, true).into_iter();
        let caption = match parsed.next() {
            None => Vec::new(),
            Some(Block::Paragraph(caption)) => caption,
            Some(_) => {
                self.messages.push(SystemMessage::error(
                    line,
                    "Figure caption must be a paragraph or empty comment.",
                ));
                return;
            }
        };
        blocks.push(Block::Figure {
            image,
            caption,
            legend: parsed.collect(),
        });
    }

    /// `list-table`: a bullet list of rows, each a bullet list of cells.
    fn list_table(&mut self, args: &str, line: usize, body: &[Line<'_>]) -> Option<Table> {
        let (options, content) = split_options(body);
        if content.is_empty() {
            self.content_expected("list-table", line);
            return None;
        }
        let header_rows = self.header_rows("list-table", &options, line)?;
        let title = (!args.is_empty()).then(|| self.inline(args, line));

        let mut parsed = self.parse_blocks(&content, true);
        let rows = match parsed.as_mut_slice() {
            [Block::BulletList(rows)] => std::mem::take(rows),
            _ => {
                self.list_table_error(line, "exactly one bullet list expected.");
                return None;
            }
        };

        let mut table_rows: Vec<Vec<Cell>> = Vec::with_capacity(rows.len());
        for (n, mut row) in rows.into_iter().enumerate() {
            let cells = match row.as_mut_slice() {
                [Block::BulletList(cells)] => std::mem::take(cells),
                _ => {
                    self.list_table_error(
                        line,
                        &format!(
                            "two-level bullet list expected, but row {} does not contain a second-level bullet list.",
                            n + 1
                        ),
                    );
                    return None;
                }
            };
            if let Some(first) = table_rows.first()
                && first.len() != cells.len()
            {
                self.list_table_error(
                    line,
                    &format!(
                        "uniform two-level bullet list expected, but row {} does not contain the same number of items as row 1 ({} vs {}).",
                        n + 1,
                        cells.len(),
                        first.len()
                    ),
                );
                return None;
            }
            table_rows.push(cells.into_iter().map(Cell::new).collect());
        }

        self.table_from_rows(title, table_rows, header_rows, "list-table", line)
    }

    fn list_table_error(&mut self, line: usize, msg: &str) {
        self.messages.push(SystemMessage::error(
            line,
            format!("Error parsing content block for the \"list-table\" directive: {msg}"),
        ));
    }

    /// `csv-table` with inline content and an optional `:header:`.
    fn csv_table(&mut self, args: &str, line: usize, body: &[Line<'_>]) -> Option<Table> {
        let (options, content) = split_options(body);
        if options.iter().any(|(key, _)| matches!(*key, "file" | "url")) {
            self.messages.push(SystemMessage::warning(
                line,
                "File and URL access deactivated; ignoring \"csv-table\" directive.",
            ));
            return None;
        }
        let mut header_rows = self.header_rows("csv-table", &options, line)?;
        let option = |name: &str| options.iter().find(|(key, _)| *key == name).map(|(_, v)| *v);
        let delim = match option("delim") {
            None => ',',
            Some("tab") => '\t',
            Some("space") => ' ',
            Some(other) => other.chars().next().unwrap_or(','),
        };
        let quote = option("quote").and_then(|q| q.chars().next()).unwrap_or('"');

        let mut records = Vec::new();
        if let Some(header) = option("header") {
            match parse_csv(header, delim, quote) {
                Ok(rows) => {
                    header_rows += rows.len();
                    records.extend(rows.into_iter().map(|(_, row)| (line, row)));
                }
                Err(msg) => {
                    self.csv_error(line, &msg);
                    return None;
                }
            }
        }
        let Some(first) = content.first() else {
            self.content_expected("csv-table", line);
            return None;
        };
        let first_line = first.no;
        match parse_csv(&literal_text(&content), delim, quote) {
            Ok(rows) => records.extend(
                rows.into_iter()
                    .map(|(offset, row)| (first_line + offset, row)),
            ),
            Err(msg) => {
                self.csv_error(line, &msg);
                return None;
            }
        }

        let columns = records.iter().map(|(_, row)| row.len()).max().unwrap_or(0);
        let mut rows = Vec::with_capacity(records.len());
        for (row_line, fields) in records {
            let mut cells: Vec<Cell> = fields
                .iter()
                .map(|field| {
                    let blocks = if field.is_empty() {
                        Vec::new()
                    } else {
                        vec![Block::Paragraph(self.inline(field, row_line))]
                    };
                    Cell::new(blocks)
                })
                .collect();
            cells.resize_with(columns, || Cell::new(Vec::new()));
            rows.push(cells);
        }
        let title = (!args.is_empty()).then(|| self.inline(args, line));
        self.table_from_rows(title, rows, header_rows, "csv-table", line)
    }

    fn csv_error(&mut self, line: usize, msg: &str) {
        self.messages.push(SystemMessage::error(
            line,
            format!("Error with CSV data in \"csv-table\" directive:\n{msg}"),
        ));
    }

    /// `table`: a title for the single grid or simple table in its content.
    fn table(&mut self, args: &str, line: usize, body: &[Line<'_>], blocks: &mut Vec<Block>) {
        let (_, content) = split_options(body);
        if content.is_empty() {
            self.content_expected("table", line);
            return;
        }
        let title = (!args.is_empty()).then(|| self.inline(args, line));
        let mut parsed = self.parse_blocks(&content, true);
        match parsed.as_mut_slice() {
            [Block::Table(table)] => {
                table.title = title;
                blocks.append(&mut parsed);
            }
            _ => self.messages.push(SystemMessage::error(
                line,
                "Error parsing content block for the \"table\" directive: exactly one table expected.",
            )),
        }
    }

    fn header_rows(&mut self, name: &str, options: &[(&str, &str)], line: usize) -> Option<usize> {
        let Some((_, value)) = options.iter().find(|(key, _)| *key == "header-rows") else {
            return Some(0);
        };
        if let Ok(rows) = value.parse() {
            return Some(rows);
        }
        self.directive_error(
            name,
            line,
            &format!("invalid option value: (option: \"header-rows\"; value: '{value}')"),
        );
        None
    }

    fn table_from_rows(
        &mut self,
        title: Option<Vec<Inline>>,
        rows: Vec<Vec<Cell>>,
        header_rows: usize,
        name: &str,
        line: usize,
    ) -> Option<Table> {
        if header_rows > rows.len() {
            self.messages.push(SystemMessage::error(
                line,
                format!(
                    "{header_rows} header row(s) specified but only {} row(s) of data supplied (\"{name}\" directive).",
                    rows.len()
                ),
            ));
            return None;
        }
        let mut table = Table::new(rows, header_rows);
        table.title = title;
        Some(table)
    }
}

/// Decode the arguments of a `unicode` substitution.
///
/// Tokens are decimal codes, hex codes (`0xA9`, `U+00A9`, `\u00a9`,
/// `&#xa9;`) or literal text; `..` starts a comment.
fn decode_unicode(text: &str) -> Result<String, String> {
    let mut out = String::new();
    for token in text.split_whitespace() {
        if token == ".." {
            break;
        }
        let code = if token.chars().all(|c| c.is_ascii_digit()) {
            token.parse::<u32>().ok()
        } else if let Some(hex) = hex_code(token) {
            u32::from_str_radix(hex, 16).ok()
        } else {
            out.push_str(token);
            continue;
        };
        match code.and_then(char::from_u32) {
            Some(c) => out.push(c),
            None => return Err(format!("Invalid character code: {token}")),
        }
    }
    Ok(out)
}

fn hex_code(token: &str) -> Option<&str> {
    const PREFIXES: &[&str] = &[
        "0x", "0X", "\\x", "\\X", "\\u", "\\U", "U+", "u+", "x", "X", "U", "u",
    ];
    let hex = if let Some(entity) = token.strip_prefix("&#x").or_else(|| token.strip_prefix("&#X")) {
        entity.strip_suffix(';')?
    } else {
        PREFIXES.iter().find_map(|p| token.strip_prefix(p))?
    };
    (!hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())).then_some(hex)
}

/// Today's UTC date for the `date` substitution.
///
/// Supports the `%Y`, `%m`, `%d`, `%H`, `%M` and `%S` fields; the default
/// format is `%Y-%m-%d`.
fn today(format: &str) -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    format_date(secs, if format.is_empty() { "%Y-%m-%d" } else { format })
}

fn format_date(secs: u64, format: &str) -> String {
    let days = i64::try_from(secs / 86_400).unwrap_or_default();
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);

    let mut out = String::with_capacity(format.len() + 8);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('Y') => out.push_str(&year.to_string()),
            Some('m') => out.push_str(&format!("{month:02}")),
            Some('d') => out.push_str(&format!("{day:02}")),
            Some('H') => out.push_str(&format!("{:02}", rem / 3600)),
            Some('M') => out.push_str(&format!("{:02}", rem / 60 % 60)),
            Some('S') => out.push_str(&format!("{:02}", rem % 60)),
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Proleptic Gregorian date from days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (
        year,
        u32::try_from(month).unwrap_or(1),
        u32::try_from(day).unwrap_or(1),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::message::Severity;
    use crate::rst::block::Document;

    fn parse_ok(text: &str) -> Document {
        let (doc, messages) = BlockParser::parse(text);
        assert!(messages.is_empty(), "unexpected messages: {messages:?}");
        doc
    }

    fn para(s: &str) -> Block {
        Block::Paragraph(vec![Inline::Text(s.to_owned())])
    }

    fn cell(s: &str) -> Cell {
        Cell::new(vec![para(s)])
    }

    #[test]
    fn test_figure_with_caption_and_legend() {
        let doc = parse_ok(".. figure:: logo.png\n   :alt: Logo\n\n   The logo.\n\n   Legend text.\n");
        assert_eq!(
            doc.blocks,
            vec![Block::Figure {
                image: Image {
                    uri: "logo.png".to_owned(),
                    alt: Some("Logo".to_owned()),
                    ..Image::default()
                },
                caption: vec![Inline::Text("The logo.".to_owned())],
                legend: vec![para("Legend text.")],
            }]
        );
    }

    #[test]
    fn test_figure_caption_must_be_paragraph() {
        let (_, messages) = BlockParser::parse(".. figure:: logo.png\n\n   - not a caption\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Error);
    }

    #[test]
    fn test_generic_admonition() {
        let doc = parse_ok(".. admonition:: And, by the way\n\n   Read this.\n");
        assert_eq!(
            doc.blocks,
            vec![Block::Admonition {
                class: "admonition-and-by-the-way".to_owned(),
                title: "And, by the way".to_owned(),
                body: vec![para("Read this.")],
            }]
        );
    }

    #[test]
    fn test_admonition_requires_title() {
        let (_, messages) = BlockParser::parse(".. admonition::\n\n   Body.\n");
        assert_eq!(
            messages[0].message,
            "Error in \"admonition\" directive:\n1 argument(s) required, 0 supplied."
        );
    }

    #[test]
    fn test_topic_sidebar_and_rubric() {
        let doc = parse_ok(
            ".. topic:: Summary\n\n   Short.\n\n.. sidebar:: Aside\n\n   Notes.\n\n.. rubric:: Footnotes\n",
        );
        assert_eq!(
            doc.blocks,
            vec![
                Block::Topic {
                    class: "topic".to_owned(),
                    title: vec![Inline::Text("Summary".to_owned())],
                    body: vec![para("Short.")],
                },
                Block::Topic {
                    class: "sidebar".to_owned(),
                    title: vec![Inline::Text("Aside".to_owned())],
                    body: vec![para("Notes.")],
                },
                Block::Rubric(vec![Inline::Text("Footnotes".to_owned())]),
            ]
        );
    }

    #[test]
    fn test_containers() {
        let doc = parse_ok(
            ".. container:: custom\n\n   Inside.\n\n.. class:: special\n\n   Classy.\n\n.. epigraph::\n\n   Quote.\n",
        );
        assert_eq!(
            doc.blocks,
            vec![
                Block::Container {
                    classes: "container custom".to_owned(),
                    body: vec![para("Inside.")],
                },
                Block::Container {
                    classes: "special".to_owned(),
                    body: vec![para("Classy.")],
                },
                Block::Container {
                    classes: "epigraph".to_owned(),
                    body: vec![para("Quote.")],
                },
            ]
        );
    }

    #[test]
    fn test_parsed_literal_and_math() {
        let doc = parse_ok(".. parsed-literal::\n\n   pip install *rr*\n\n.. math:: E = mc^2\n");
        assert_eq!(
            doc.blocks,
            vec![
                Block::ParsedLiteral(vec![
                    Inline::Text("pip install ".to_owned()),
                    Inline::Emphasis("rr".to_owned()),
                ]),
                Block::Math("E = mc^2".to_owned()),
            ]
        );
    }

    #[test]
    fn test_highlight_sets_literal_language() {
        let doc = parse_ok(".. highlight:: python\n\nExample::\n\n    import rr\n");
        assert_eq!(
            doc.blocks[1],
            Block::LiteralBlock {
                language: Some("python".to_owned()),
                text: "import rr".to_owned(),
            }
        );
    }

    #[test]
    fn test_silent_directives() {
        let doc = parse_ok(".. sectnum::\n\n.. meta::\n   :keywords: rr\n\nText.\n");
        assert_eq!(doc.blocks, vec![para("Text.")]);
    }

    #[test]
    fn test_list_table() {
        let doc = parse_ok(
            ".. list-table:: Options\n   :header-rows: 1\n\n   * - Name\n     - Value\n   * - a\n     - 1\n",
        );
        let mut expected = Table::new(
            vec![vec![cell("Name"), cell("Value")], vec![cell("a"), cell("1")]],
            1,
        );
        expected.title = Some(vec![Inline::Text("Options".to_owned())]);
        assert_eq!(doc.blocks, vec![Block::Table(expected)]);
    }

    #[test]
    fn test_list_table_uneven_rows() {
        let (_, messages) =
            BlockParser::parse(".. list-table::\n\n   * - a\n     - b\n   * - c\n");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.contains("row 2 does not contain the same number of items"));
    }

    #[test]
    fn test_csv_table() {
        let doc = parse_ok(
            ".. csv-table:: Prices\n   :header: \"Item\", \"Price\"\n\n   \"Apple, red\", 1\n   Pear\n",
        );
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.head, vec![vec![cell("Item"), cell("Price")]]);
        assert_eq!(
            table.body,
            vec![
                vec![cell("Apple, red"), cell("1")],
                vec![cell("Pear"), Cell::new(Vec::new())],
            ]
        );
    }

    #[test]
    fn test_csv_table_file_is_disabled() {
        let (doc, messages) = BlockParser::parse(".. csv-table::\n   :file: data.csv\n");
        assert!(doc.blocks.is_empty());
        assert_eq!(messages[0].severity, Severity::Warning);
    }

    #[test]
    fn test_unicode_substitution() {
        let doc = parse_ok(".. |copy| unicode:: 0xA9 U+2122 .. trademark\n.. |x| unicode:: 88 and \\u00e9\n");
        assert_eq!(
            doc.substitutions.get("copy"),
            Some(&Substitution::Text(vec![Inline::Text("\u{a9}\u{2122}".to_owned())]))
        );
        assert_eq!(
            doc.substitutions.get("x"),
            Some(&Substitution::Text(vec![Inline::Text("Xand\u{e9}".to_owned())]))
        );
    }

    #[test]
    fn test_unicode_invalid_code() {
        let (_, messages) = BlockParser::parse(".. |bad| unicode:: 0x110000\n");
        assert_eq!(
            messages[0].message,
            "Error in \"unicode\" directive:\nInvalid character code: 0x110000"
        );
    }

    #[test]
    fn test_replace_outside_substitution() {
        let (_, messages) = BlockParser::parse(".. replace:: text\n");
        assert_eq!(messages[0].severity, Severity::Error);
        assert!(messages[0].message.starts_with("Invalid context"));
    }

    #[test]
    fn test_format_date() {
        // 2024-02-29 12:34:56 UTC
        assert_eq!(format_date(1_709_210_096, "%Y-%m-%d"), "2024-02-29");
        assert_eq!(format_date(1_709_210_096, "%H:%M:%S %%"), "12:34:56 %");
        assert_eq!(format_date(0, "%Y-%m-%d"), "1970-01-01");
    }
}
