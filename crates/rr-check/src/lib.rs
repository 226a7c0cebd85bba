//! Long description checking and preview rendering.
//!
//! Two adapters sit between a [`Host`] (the build tool or command line that
//! owns the package metadata) and the renderers in `rr_markup`:
//!
//! - [`Checker`] validates the description and reports through
//!   [`Host::warn`] without ever failing itself.
//! - [`Printer`] renders the description to a writer and returns an exit
//!   [`Status`].
//!
//! Both resolve the content type with [`resolve`]. Neither keeps state
//! between calls.
//!
//! # Features
//!
//! - `mock`: exports [`MockHost`], an in-memory host for tests.

mod checker;
mod error;
mod host;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod printer;
mod resolve;

pub use checker::Checker;
pub use error::{CheckError, Diagnostics};
pub use host::Host;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockHost;
pub use printer::{Printer, Status};
pub use resolve::resolve;
