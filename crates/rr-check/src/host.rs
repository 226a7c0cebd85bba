//! The boundary between the checker and whatever drives it.

/// Source of a long description and sink for its diagnostics.
///
/// Implemented by front ends (the `rr` command line, build tool plugins)
/// and by [`MockHost`](crate::MockHost) in tests. Callbacks take `&self`;
/// hosts that record messages use interior mutability.
pub trait Host {
    /// The long description text, if any.
    fn description(&self) -> Option<&str>;

    /// The declared content type, if any.
    fn content_type(&self) -> Option<&str>;

    /// Report a problem with the description.
    fn warn(&self, message: &str);

    /// Report progress or success.
    fn announce(&self, message: &str);
}
