//! Markdown rendering via pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

use crate::content_type::MarkdownVariant;

/// Parser options for a Markdown variant.
#[must_use]
pub(crate) fn parser_options(variant: MarkdownVariant) -> Options {
    match variant {
        MarkdownVariant::Gfm => {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        }
        MarkdownVariant::CommonMark => Options::empty(),
    }
}

/// Render Markdown to HTML.
///
/// Markdown has no invalid input, so this always produces output.
#[must_use]
pub(crate) fn render(text: &str, variant: MarkdownVariant) -> String {
    let parser = Parser::new_ext(text, parser_options(variant));
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(
            render("This is a simple README.", MarkdownVariant::Gfm),
            "<p>This is a simple README.</p>\n"
        );
    }

    #[test]
    fn test_heading_and_emphasis() {
        let html = render("# Title\n\nSome *text*.", MarkdownVariant::Gfm);
        assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n");
    }

    #[test]
    fn test_gfm_table() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |";
        let html = render(md, MarkdownVariant::Gfm);
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_commonmark_has_no_tables() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |";
        let html = render(md, MarkdownVariant::CommonMark);
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_strikethrough_only_in_gfm() {
        assert!(render("~~gone~~", MarkdownVariant::Gfm).contains("<del>gone</del>"));
        assert!(!render("~~gone~~", MarkdownVariant::CommonMark).contains("<del>"));
    }

    #[test]
    fn test_unbalanced_markup_still_renders() {
        let html = render("Some `unterminated code", MarkdownVariant::Gfm);
        assert_eq!(html, "<p>Some `unterminated code</p>\n");
    }
}
