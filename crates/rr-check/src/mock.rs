//! In-memory [`Host`] for testing.

use std::cell::RefCell;

use crate::host::Host;

/// Host double that records everything it is told.
///
/// # Example
///
/// ```ignore
/// use rr_check::{Checker, MockHost};
///
/// let host = MockHost::new()
///     .with_description("Hello *world*.")
///     .with_content_type("text/x-rst");
/// Checker::new().check(&host);
/// assert!(host.warnings().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockHost {
    description: Option<String>,
    content_type: Option<String>,
    warnings: RefCell<Vec<String>>,
    announcements: RefCell<Vec<String>>,
}

impl MockHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Messages received through [`Host::warn`], in order.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    /// Messages received through [`Host::announce`], in order.
    #[must_use]
    pub fn announcements(&self) -> Vec<String> {
        self.announcements.borrow().clone()
    }
}

impl Host for MockHost {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_owned());
    }

    fn announce(&self, message: &str) {
        self.announcements.borrow_mut().push(message.to_owned());
    }
}
