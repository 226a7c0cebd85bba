//! Long description renderers for package metadata.
//!
//! A long description is rendered according to its declared content type:
//!
//! - `text/x-rst` is parsed as reStructuredText and may produce diagnostics
//!   ([`SystemMessage`]). A diagnostic at or above the halt level means the
//!   description has invalid markup and no HTML is produced.
//! - `text/markdown` is rendered with pulldown-cmark, GFM unless the
//!   `variant=CommonMark` parameter is given. It never fails.
//! - `text/plain` is passed through verbatim.
//!
//! # Example
//!
//! ```
//! use rr_markup::{Markup, Renderer};
//!
//! let markup = Markup::from_content_type("text/x-rst; charset=UTF-8").unwrap();
//! let result = Renderer::new(markup).render("This is a simple README.");
//! assert_eq!(result.html.as_deref(), Some("<p>This is a simple README.</p>\n"));
//! ```

mod content_type;
mod markdown;
mod message;
mod renderer;
mod rst;
mod util;

pub use content_type::{
    ContentType, MarkdownVariant, Markup, MarkupError, TEXT_MARKDOWN, TEXT_PLAIN, TEXT_X_RST,
};
pub use message::{ParseSeverityError, Severity, SystemMessage};
pub use renderer::{RenderResult, Renderer};
pub use util::escape_html;
