//! Error classification for chain sources.

use alloc::string::String;
use thiserror::Error;

/// The kind of an error returned by a chain source.
///
/// Chain-sync logic decides whether to retry or abort based on this classification. A
/// [`SourceErrorKind::Temporary`] error is an expected outcome, most commonly a block the
/// source has not observed yet, and the request should be retried later.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// A temporary error. The request may succeed if retried.
    #[error("Temporary error: {0}")]
    Temporary(String),
    /// A critical error. Retrying the request will not help.
    #[error("Critical error: {0}")]
    Critical(String),
}

impl SourceErrorKind {
    /// Returns `true` if the error is temporary.
    pub const fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    /// Returns `true` if the error is critical.
    pub const fn is_critical(&self) -> bool {
        matches!(self, Self::Critical(_))
    }
}
