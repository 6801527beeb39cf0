//! Error kinds surfaced to the user.

use thiserror::Error;

/// Failures with a fixed, user-facing message.
///
/// Everything else travels as a plain `anyhow::Error`; these variants exist so
/// callers and tests can tell the outcomes apart with `downcast_ref`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// No listing address was given.
    #[error("Please provide a valid URL of a property on AirBnb.")]
    MissingAddress,

    /// The site answered with its 404 page (served with HTTP 200).
    #[error("This room does not exist.")]
    NotFound,

    /// A single-node query matched nothing.
    #[error("No element matches selector: {0}")]
    ElementNotFound(String),

    /// A browser wait ran past its deadline.
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout { what: String, ms: u64 },
}
