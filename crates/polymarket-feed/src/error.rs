//! Feed error taxonomy
//!
//! The fetch path needs to distinguish a stale build identifier (404,
//! recoverable) from everything else, so errors are typed rather than
//! collapsed into one opaque failure.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by build-id resolution and price fetching
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure: connect, TLS, timeout, body read
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Response completed with a status the caller cannot act on
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    /// Malformed HTML marker, malformed JSON, or a non-numeric price string
    #[error("parse error: {0}")]
    Parse(String),

    /// Well-formed response carrying zero matching outcomes
    #[error("no matching outcomes found")]
    NoData,
}

impl FeedError {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        FeedError::Parse(msg.into())
    }
}
