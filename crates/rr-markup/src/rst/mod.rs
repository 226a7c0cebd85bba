//! reStructuredText rendering.
//!
//! Covers the subset of reStructuredText found in package long descriptions:
//! sections, paragraphs, lists, line blocks, field lists, literal and code
//! blocks, block quotes, grid and simple tables, hyperlink targets,
//! footnotes and citations, substitutions (badges), and the standard
//! directives and roles. File-system directives (`raw`, `include`) are
//! disabled and reported. Links and images are only written for relative
//! URLs and the `http`, `https` and `mailto` schemes.

mod block;
mod html;
mod inline;

use crate::message::SystemMessage;

/// Render reStructuredText, returning HTML and all diagnostics ordered by line.
pub(crate) fn render(text: &str) -> (String, Vec<SystemMessage>) {
    let (doc, mut messages) = block::BlockParser::parse(text);
    let (html, resolution) = html::HtmlWriter::new(&doc).write();
    messages.extend(resolution);
    messages.sort_by_key(|m| m.line);
    (html, messages)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::message::Severity;

    #[test]
    fn test_borked_text_warns_on_line_one() {
        let (_, messages) = render("Hello, I am some `totally borked< text.");
        assert_eq!(messages.len(), 1);
        let text = messages[0].to_string();
        assert!(text.starts_with("line 1: Warning:"), "{text}");
        assert!(text.contains("start-string without end-string"), "{text}");
    }

    #[test]
    fn test_messages_sorted_by_line() {
        let (_, messages) = render("See nowhere_.\n\nThen *broken.\n");
        let lines: Vec<_> = messages.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(messages[0].severity, Severity::Error);
        assert_eq!(messages[1].severity, Severity::Warning);
    }

    #[test]
    fn test_readme_document() {
        let text = "\
rr
==

|ci|

A long description renderer.

Usage
-----

Install with pip_::

    pip install rr

.. _pip: https://pip.pypa.io/
.. |ci| image:: https://ci.example/badge.svg
";
        let (html, messages) = render(text);
        assert_eq!(messages, vec![]);
        assert_eq!(
            html,
            "<section id=\"rr\">\n<h2>rr</h2>\n\
             <p><img alt=\"https://ci.example/badge.svg\" src=\"https://ci.example/badge.svg\"></p>\n\
             <p>A long description renderer.</p>\n\
             <section id=\"usage\">\n<h3>Usage</h3>\n\
             <p>Install with <a href=\"https://pip.pypa.io/\">pip</a>:</p>\n\
             <pre>pip install rr</pre>\n\
             </section>\n</section>\n"
        );
    }
}
