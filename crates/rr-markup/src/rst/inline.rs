//! Inline markup recognition.
//!
//! Follows the docutils inline markup recognition rules: a start-string must
//! follow whitespace, the start of the text or an opening punctuation mark,
//! and must be followed by non-whitespace. An end-string must follow
//! non-whitespace and be followed by whitespace, the end of the text or a
//! closing punctuation mark.

use crate::message::SystemMessage;

/// A run of inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Inline {
    Text(String),
    Emphasis(String),
    Strong(String),
    Literal(String),
    /// Interpreted text with the default role (title reference).
    Interpreted(String),
    /// Hyperlink with a known URL (embedded or standalone).
    Link { text: String, url: String },
    /// Named or anonymous reference, resolved against targets at write time.
    Reference {
        text: String,
        name: String,
        anonymous: bool,
        line: usize,
    },
    /// `|name|` substitution reference, optionally also a reference (`|name|_`).
    Substitution {
        name: String,
        reference: bool,
        line: usize,
    },
    /// `[1]_`, `[#]_`, `[*]_` or `[CIT2002]_`.
    FootnoteReference {
        label: NoteLabel,
        /// Label as written between the brackets.
        raw: String,
        line: usize,
    },
    Subscript(String),
    Superscript(String),
    Abbreviation(String),
    Math(String),
}

/// Label of a footnote or citation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum NoteLabel {
    /// `[1]`
    Number(usize),
    /// `[#]`, or `[#name]` when labelled.
    Auto(Option<String>),
    /// `[*]`
    Symbol,
    /// `[CIT2002]`, normalized.
    Citation(String),
}

impl NoteLabel {
    pub(crate) fn parse(label: &str) -> Option<Self> {
        if label == "*" {
            return Some(Self::Symbol);
        }
        if let Some(name) = label.strip_prefix('#') {
            if name.is_empty() {
                return Some(Self::Auto(None));
            }
            return is_simple_name(name).then(|| Self::Auto(Some(normalize_name(name))));
        }
        if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
            return label.parse().ok().map(Self::Number);
        }
        is_simple_name(label).then(|| Self::Citation(normalize_name(label)))
    }

    /// Reference name used in "Unknown target name" messages.
    pub(crate) fn refname(&self) -> Option<String> {
        match self {
            Self::Number(n) => Some(n.to_string()),
            Self::Auto(name) => name.clone(),
            Self::Citation(name) => Some(name.clone()),
            Self::Symbol => None,
        }
    }
}

/// A reference name without whitespace, as used by footnote and citation labels.
fn is_simple_name(name: &str) -> bool {
    name.starts_with(char::is_alphanumeric)
        && name.ends_with(char::is_alphanumeric)
        && name.chars().all(|c| c.is_alphanumeric() || "-_.:+".contains(c))
}

#[derive(Clone, Copy)]
enum Kind {
    Emphasis,
    Strong,
    Literal,
    Interpreted,
    Substitution,
}

impl Kind {
    fn start(self) -> &'static str {
        match self {
            Self::Emphasis => "*",
            Self::Strong => "**",
            Self::Literal => "``",
            Self::Interpreted => "`",
            Self::Substitution => "|",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Literal => "literal",
            Self::Interpreted => "interpreted text or phrase reference",
            Self::Substitution => "substitution_reference",
        }
    }
}

const START_PRECEDERS: &[char] = &['\'', '"', '(', '[', '{', '<', '-', '/', ':'];
const END_FOLLOWERS: &[char] = &[
    '\'', '"', ')', ']', '}', '>', '-', '/', ':', '.', ',', ';', '!', '?', '\\',
];

fn closer_for(c: char) -> Option<char> {
    match c {
        '\'' => Some('\''),
        '"' => Some('"'),
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        _ => None,
    }
}

fn is_end_boundary(c: Option<char>) -> bool {
    c.is_none_or(|c| c.is_whitespace() || END_FOLLOWERS.contains(&c))
}

fn is_start_boundary(c: Option<char>) -> bool {
    c.is_none_or(|c| c.is_whitespace() || START_PRECEDERS.contains(&c))
}

/// Normalize a reference or target name for lookup.
///
/// Names are case-insensitive and whitespace-insensitive.
pub(crate) fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

struct InlineParser<'m> {
    chars: Vec<char>,
    first_line: usize,
    out: Vec<Inline>,
    text: String,
    messages: &'m mut Vec<SystemMessage>,
}

/// Parse inline markup in a text block starting at `first_line`.
pub(crate) fn parse(text: &str, first_line: usize, messages: &mut Vec<SystemMessage>) -> Vec<Inline> {
    let mut parser = InlineParser {
        chars: text.chars().collect(),
        first_line,
        out: Vec::new(),
        text: String::new(),
        messages,
    };
    parser.run();
    parser.out
}

impl InlineParser<'_> {
    fn run(&mut self) {
        let mut i = 0;
        while i < self.chars.len() {
            let c = self.chars[i];
            if c == '\\' {
                match self.chars.get(i + 1) {
                    Some(next) if next.is_whitespace() => i += 2,
                    Some(&next) => {
                        self.text.push(next);
                        i += 2;
                    }
                    None => {
                        self.text.push('\\');
                        i += 1;
                    }
                }
                continue;
            }

            let prev = i.checked_sub(1).map(|p| self.chars[p]);

            if let Some(next) = self.try_markup(i, prev) {
                i = next;
                continue;
            }
            if c == '['
                && is_start_boundary(prev)
                && let Some(next) = self.try_footnote_reference(i)
            {
                i = next;
                continue;
            }
            if c == '_'
                && let Some(next) = self.try_simple_reference(i)
            {
                i = next;
                continue;
            }
            if c == 'h'
                && is_start_boundary(prev)
                && let Some(next) = self.try_standalone_uri(i)
            {
                i = next;
                continue;
            }

            self.text.push(c);
            i += 1;
        }
        self.flush_text();
    }

    fn line_at(&self, pos: usize) -> usize {
        self.first_line + self.chars[..pos].iter().filter(|&&c| c == '\n').count()
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.out.push(Inline::Text(std::mem::take(&mut self.text)));
        }
    }

    fn starts_with_at(&self, pos: usize, pat: &str) -> bool {
        let mut idx = pos;
        for p in pat.chars() {
            if self.chars.get(idx) != Some(&p) {
                return false;
            }
            idx += 1;
        }
        true
    }

    fn kind_at(&self, pos: usize) -> Option<Kind> {
        [
            Kind::Literal,
            Kind::Strong,
            Kind::Emphasis,
            Kind::Interpreted,
            Kind::Substitution,
        ]
        .into_iter()
        .find(|k| self.starts_with_at(pos, k.start()))
    }

    /// Try to recognise inline markup starting at `pos`.
    ///
    /// Returns the position after the construct, or `None` when `pos` does
    /// not start markup (the caller then treats the character as text).
    fn try_markup(&mut self, pos: usize, prev: Option<char>) -> Option<usize> {
        let kind = self.kind_at(pos)?;
        let start_len = kind.start().chars().count();
        let after = self.chars.get(pos + start_len).copied();

        if !is_start_boundary(prev) || after.is_none_or(char::is_whitespace) {
            return None;
        }
        if let (Some(p), Some(a)) = (prev, after)
            && closer_for(p) == Some(a)
        {
            return None;
        }

        let content_start = pos + start_len;
        let Some(end) = self.find_end(content_start, kind) else {
            self.messages.push(SystemMessage::warning(
                self.line_at(pos),
                format!("Inline {} start-string without end-string.", kind.label()),
            ));
            self.text.push_str(kind.start());
            return Some(content_start);
        };

        let content: String = self.chars[content_start..end].iter().collect();
        let line = self.line_at(pos);
        let mut next = end + start_len;

        match kind {
            Kind::Emphasis => self.push(Inline::Emphasis(unescape(&content))),
            Kind::Strong => self.push(Inline::Strong(unescape(&content))),
            Kind::Literal => self.push(Inline::Literal(content)),
            Kind::Substitution => {
                let reference = self.chars.get(next) == Some(&'_');
                if reference {
                    next += 1;
                }
                self.push(Inline::Substitution {
                    name: normalize_name(&content),
                    reference,
                    line,
                });
            }
            Kind::Interpreted => {
                let underscores = self.trailing_underscores(next);
                next += underscores;
                if underscores > 0 {
                    self.push(phrase_reference(&content, underscores == 2, line));
                } else {
                    let role = self.take_role_prefix();
                    let inline = self.apply_role(role.as_deref(), content, line);
                    self.push(inline);
                }
            }
        }
        Some(next)
    }

    fn trailing_underscores(&self, pos: usize) -> usize {
        if self.starts_with_at(pos, "__") {
            2
        } else {
            usize::from(self.chars.get(pos) == Some(&'_'))
        }
    }

    /// Find the end-string for `kind`, searching from `from`.
    fn find_end(&self, from: usize, kind: Kind) -> Option<usize> {
        let end = kind.start();
        let end_len = end.chars().count();
        let literal = matches!(kind, Kind::Literal);
        let mut j = from + 1;
        while j < self.chars.len() {
            if self.starts_with_at(j, end) {
                let before = self.chars[j - 1];
                let escaped = !literal && before == '\\';
                let mut after_pos = j + end_len;
                if matches!(kind, Kind::Interpreted | Kind::Substitution) {
                    after_pos += self.trailing_underscores(after_pos);
                }
                if !before.is_whitespace()
                    && !escaped
                    && is_end_boundary(self.chars.get(after_pos).copied())
                {
                    return Some(j);
                }
            }
            j += 1;
        }
        None
    }

    fn push(&mut self, inline: Inline) {
        self.flush_text();
        self.out.push(inline);
    }

    /// Remove a `:role:` prefix from the pending text and return the role.
    fn take_role_prefix(&mut self) -> Option<String> {
        let body = self.text.strip_suffix(':')?;
        let start = body.rfind(':')?;
        let role = &body[start + 1..];
        let valid = !role.is_empty()
            && role
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.+".contains(c));
        if !valid || !is_start_boundary(body[..start].chars().last()) {
            return None;
        }
        let role = role.to_owned();
        self.text.truncate(start);
        Some(role)
    }

    /// Apply a standard role. Role names are case-insensitive.
    fn apply_role(&mut self, role: Option<&str>, content: String, line: usize) -> Inline {
        let Some(role) = role else {
            return Inline::Interpreted(unescape(&content));
        };
        match role.to_ascii_lowercase().as_str() {
            "title-reference" | "title" | "t" => Inline::Interpreted(unescape(&content)),
            "emphasis" => Inline::Emphasis(unescape(&content)),
            "strong" => Inline::Strong(unescape(&content)),
            "literal" | "code" => Inline::Literal(content),
            "subscript" | "sub" => Inline::Subscript(unescape(&content)),
            "superscript" | "sup" => Inline::Superscript(unescape(&content)),
            "abbreviation" | "ab" | "acronym" | "ac" => Inline::Abbreviation(unescape(&content)),
            "math" => Inline::Math(content),
            "pep-reference" | "pep" => match content.trim().parse::<u16>() {
                Ok(n) if n <= 9999 => Inline::Link {
                    text: format!("PEP {n}"),
                    url: format!("https://peps.python.org/pep-{n:04}"),
                },
                _ => self.role_error(
                    role,
                    content.clone(),
                    line,
                    format!("PEP number must be a number from 0 to 9999; \"{content}\" is invalid."),
                ),
            },
            "rfc-reference" | "rfc" => {
                let (number, anchor) = content
                    .split_once('#')
                    .map_or((content.as_str(), None), |(n, a)| (n, Some(a)));
                match number.trim().parse::<u32>() {
                    Ok(n) if n >= 1 => Inline::Link {
                        text: format!("RFC {n}"),
                        url: match anchor {
                            Some(anchor) => format!("https://tools.ietf.org/html/rfc{n}.html#{anchor}"),
                            None => format!("https://tools.ietf.org/html/rfc{n}.html"),
                        },
                    },
                    _ => self.role_error(
                        role,
                        content.clone(),
                        line,
                        format!(
                            "RFC number must be a number greater than or equal to 1; \"{content}\" is invalid."
                        ),
                    ),
                }
            }
            _ => self.role_error(
                role,
                content,
                line,
                format!("Unknown interpreted text role \"{role}\"."),
            ),
        }
    }

    fn role_error(&mut self, role: &str, content: String, line: usize, message: String) -> Inline {
        self.messages.push(SystemMessage::error(line, message));
        Inline::Text(format!(":{role}:`{content}`"))
    }

    /// `[label]_` starting at the bracket at `pos`.
    fn try_footnote_reference(&mut self, pos: usize) -> Option<usize> {
        let close = (pos + 1..self.chars.len())
            .find(|&j| self.chars[j] == ']' || self.chars[j].is_whitespace())?;
        if self.chars[close] != ']'
            || self.chars.get(close + 1) != Some(&'_')
            || !is_end_boundary(self.chars.get(close + 2).copied())
        {
            return None;
        }
        let raw: String = self.chars[pos + 1..close].iter().collect();
        let label = NoteLabel::parse(&raw)?;
        let line = self.line_at(pos);
        self.push(Inline::FootnoteReference { label, raw, line });
        Some(close + 2)
    }

    /// `name_` or `name__` reference ending at the underscore at `pos`.
    fn try_simple_reference(&mut self, pos: usize) -> Option<usize> {
        let anonymous = self.chars.get(pos + 1) == Some(&'_');
        let end = pos + if anonymous { 2 } else { 1 };
        if !is_end_boundary(self.chars.get(end).copied()) {
            return None;
        }

        let name_len = self
            .text
            .chars()
            .rev()
            .take_while(|c| c.is_alphanumeric() || "-_.:+".contains(*c))
            .count();
        if name_len == 0 {
            return None;
        }
        let split = self.text.char_indices().rev().nth(name_len - 1)?.0;
        let candidate = self.text[split..].trim_start_matches(|c: char| !c.is_alphanumeric());
        if candidate.is_empty() || !candidate.ends_with(|c: char| c.is_alphanumeric()) {
            return None;
        }
        let lead_len = self.text.len() - split - candidate.len();
        let before = self.text[..split + lead_len].chars().last();
        if !is_start_boundary(before) {
            return None;
        }

        let name = candidate.to_owned();
        self.text.truncate(self.text.len() - name.len());
        let line = self.line_at(pos);
        self.push(Inline::Reference {
            name: normalize_name(&name),
            text: name,
            anonymous,
            line,
        });
        Some(end)
    }

    fn try_standalone_uri(&mut self, pos: usize) -> Option<usize> {
        if !self.starts_with_at(pos, "http://") && !self.starts_with_at(pos, "https://") {
            return None;
        }
        let mut end = pos;
        while end < self.chars.len() && !self.chars[end].is_whitespace() && !"<>".contains(self.chars[end]) {
            end += 1;
        }
        while end > pos && ".,;:!?)'\"".contains(self.chars[end - 1]) {
            end -= 1;
        }
        let url: String = self.chars[pos..end].iter().collect();
        if url.ends_with("//") {
            return None;
        }
        self.push(Inline::Link {
            text: url.clone(),
            url,
        });
        Some(end)
    }
}

/// Build a phrase reference from the content of `` `...`_ ``.
fn phrase_reference(content: &str, anonymous: bool, line: usize) -> Inline {
    if let Some(body) = content.strip_suffix('>')
        && let Some(open) = body.rfind('<')
    {
        let url: String = body[open + 1..].split_whitespace().collect();
        let text = body[..open].trim_end();
        let text = if text.is_empty() { url.clone() } else { unescape(text) };
        if let Some(alias) = url.strip_suffix('_') {
            return Inline::Reference {
                text,
                name: normalize_name(alias),
                anonymous: false,
                line,
            };
        }
        return Inline::Link { text, url };
    }
    let text = unescape(content);
    Inline::Reference {
        name: normalize_name(&text),
        text,
        anonymous,
        line,
    }
}

/// Strip backslash escapes from recognised markup content.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(n) if n.is_whitespace() => {}
                Some(n) => out.push(n),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::message::Severity;

    fn parse_ok(text: &str) -> Vec<Inline> {
        let mut messages = Vec::new();
        let out = parse(text, 1, &mut messages);
        assert!(messages.is_empty(), "unexpected messages: {messages:?}");
        out
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_ok("Hello, I am some text."), vec![text("Hello, I am some text.")]);
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(
            parse_ok("a *b* and **c**."),
            vec![
                text("a "),
                Inline::Emphasis("b".to_owned()),
                text(" and "),
                Inline::Strong("c".to_owned()),
                text("."),
            ]
        );
    }

    #[test]
    fn test_literal_keeps_backslashes() {
        assert_eq!(
            parse_ok(r"run ``C:\temp`` now"),
            vec![text("run "), Inline::Literal(r"C:\temp".to_owned()), text(" now")]
        );
    }

    #[test]
    fn test_interpreted_text() {
        assert_eq!(
            parse_ok("see `The Book`"),
            vec![text("see "), Inline::Interpreted("The Book".to_owned())]
        );
    }

    #[test]
    fn test_code_role() {
        assert_eq!(
            parse_ok("call :code:`main()` first"),
            vec![text("call "), Inline::Literal("main()".to_owned()), text(" first")]
        );
    }

    #[test]
    fn test_unknown_role() {
        let mut messages = Vec::new();
        parse(":bogus:`x`", 4, &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Error);
        assert_eq!(messages[0].line, 4);
    }

    #[test]
    fn test_embedded_uri() {
        assert_eq!(
            parse_ok("`Docs <https://example.com/docs>`_"),
            vec![Inline::Link {
                text: "Docs".to_owned(),
                url: "https://example.com/docs".to_owned(),
            }]
        );
    }

    #[test]
    fn test_named_references() {
        assert_eq!(
            parse_ok("see `Read  The Docs`_ or pypi_."),
            vec![
                text("see "),
                Inline::Reference {
                    text: "Read  The Docs".to_owned(),
                    name: "read the docs".to_owned(),
                    anonymous: false,
                    line: 1,
                },
                text(" or "),
                Inline::Reference {
                    text: "pypi".to_owned(),
                    name: "pypi".to_owned(),
                    anonymous: false,
                    line: 1,
                },
                text("."),
            ]
        );
    }

    #[test]
    fn test_anonymous_reference() {
        let out = parse_ok("click here__");
        assert_eq!(
            out[1],
            Inline::Reference {
                text: "here".to_owned(),
                name: "here".to_owned(),
                anonymous: true,
                line: 1,
            }
        );
    }

    #[test]
    fn test_snake_case_is_not_a_reference() {
        assert_eq!(parse_ok("use snake_case names"), vec![text("use snake_case names")]);
    }

    #[test]
    fn test_standalone_uri() {
        assert_eq!(
            parse_ok("Visit https://pypi.org."),
            vec![
                text("Visit "),
                Inline::Link {
                    text: "https://pypi.org".to_owned(),
                    url: "https://pypi.org".to_owned(),
                },
                text("."),
            ]
        );
    }

    #[test]
    fn test_substitution_reference() {
        assert_eq!(
            parse_ok("|Build Status|_"),
            vec![Inline::Substitution {
                name: "build status".to_owned(),
                reference: true,
                line: 1,
            }]
        );
    }

    #[test]
    fn test_lone_pipe_is_text() {
        assert_eq!(parse_ok("a | b"), vec![text("a | b")]);
        assert_eq!(parse_ok("x||y"), vec![text("x||y")]);
    }

    #[test]
    fn test_unterminated_substitution_reference() {
        let mut messages = Vec::new();
        let out = parse("Hello |world and more.", 1, &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].to_string(),
            "line 1: Warning: Inline substitution_reference start-string without end-string."
        );
        assert_eq!(out, vec![text("Hello |world and more.")]);
    }

    #[test]
    fn test_standard_roles() {
        assert_eq!(
            parse_ok("x :sub:`2` y :SUP:`3` :abbr:`RR`"),
            vec![
                text("x "),
                Inline::Subscript("2".to_owned()),
                text(" y "),
                Inline::Superscript("3".to_owned()),
                text(" "),
                Inline::Abbreviation("RR".to_owned()),
            ]
        );
        assert_eq!(parse_ok(r":math:`\alpha`"), vec![Inline::Math(r"\alpha".to_owned())]);
    }

    #[test]
    fn test_pep_and_rfc_roles() {
        assert_eq!(
            parse_ok("See :PEP:`8` and :rfc:`2822`."),
            vec![
                text("See "),
                Inline::Link {
                    text: "PEP 8".to_owned(),
                    url: "https://peps.python.org/pep-0008".to_owned(),
                },
                text(" and "),
                Inline::Link {
                    text: "RFC 2822".to_owned(),
                    url: "https://tools.ietf.org/html/rfc2822.html".to_owned(),
                },
                text("."),
            ]
        );
    }

    #[test]
    fn test_invalid_pep_number() {
        let mut messages = Vec::new();
        parse(":pep:`eight`", 2, &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].severity, Severity::Error);
        assert_eq!(
            messages[0].message,
            "PEP number must be a number from 0 to 9999; \"eight\" is invalid."
        );
    }

    #[test]
    fn test_footnote_references() {
        let out = parse_ok("One [1]_, auto [#]_, named [#note]_, symbol [*]_ and [CIT2002]_.");
        let labels: Vec<_> = out
            .iter()
            .filter_map(|i| match i {
                Inline::FootnoteReference { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                NoteLabel::Number(1),
                NoteLabel::Auto(None),
                NoteLabel::Auto(Some("note".to_owned())),
                NoteLabel::Symbol,
                NoteLabel::Citation("cit2002".to_owned()),
            ]
        );
    }

    #[test]
    fn test_brackets_without_underscore_are_text() {
        assert_eq!(parse_ok("a [1] list [x y]_"), vec![text("a [1] list [x y]_")]);
    }

    #[test]
    fn test_operators_are_not_markup() {
        assert_eq!(parse_ok("2 * 3 = 6"), vec![text("2 * 3 = 6")]);
        assert_eq!(parse_ok("glob (*) here"), vec![text("glob (*) here")]);
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(parse_ok(r"not \*emphasis\*"), vec![text("not *emphasis*")]);
    }

    #[test]
    fn test_unterminated_interpreted_text() {
        let mut messages = Vec::new();
        let out = parse("Hello, I am some `totally borked< text.", 1, &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].to_string(),
            "line 1: Warning: Inline interpreted text or phrase reference start-string without end-string."
        );
        assert_eq!(out, vec![text("Hello, I am some `totally borked< text.")]);
    }

    #[test]
    fn test_unterminated_emphasis_reports_its_line() {
        let mut messages = Vec::new();
        parse("first line\nsecond *line", 10, &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].line, 11);
        assert!(messages[0].message.contains("Inline emphasis start-string"));
    }

    #[test]
    fn test_unterminated_literal() {
        let mut messages = Vec::new();
        parse("use ``pip install", 1, &mut messages);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.contains("Inline literal start-string"));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Read\nThe   Docs "), "read the docs");
    }
}
