//! Error types for link fetching and path search.
//!
//! Library crates use `thiserror` for explicit error enums; the CLI decides
//! how each variant maps to an exit status.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by a [`crate::LinkSource`] while producing link pages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkSourceError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// Remote service answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL without credentials.
        url: String,
    },

    /// Remote service reported an error object in an otherwise valid response.
    #[error("api error {code}: {info}")]
    Api {
        /// Machine-readable error code.
        code: String,
        /// Human-readable description.
        info: String,
    },

    /// Response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Outcome of a search that did not produce a path.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Start or end title is empty or otherwise unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The link source failed; the search was abandoned.
    #[error("link source unavailable: {0}")]
    SourceUnavailable(#[from] LinkSourceError),

    /// Every reachable node on one side was expanded without meeting the other side.
    #[error("no path found from {from:?} to {to:?}: {reason}")]
    NoPathFound {
        /// Normalized start title.
        from: String,
        /// Normalized end title.
        to: String,
        /// Which side ran out of nodes, and how far it got.
        reason: String,
    },

    /// The configured overall deadline elapsed before a meeting point was found.
    #[error("search deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// An exploration task panicked or was torn down unexpectedly.
    #[error("exploration task failed: {0}")]
    Internal(String),
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
