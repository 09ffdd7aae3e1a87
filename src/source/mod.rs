//! Remote story source.
//!
//! The list controller never talks to the network directly. It is driven by
//! a [`StorySource`], which the poller calls once per page:
//!
//! - [`algolia`] - reqwest client for the Hacker News Algolia search API
//!
//! Tests substitute in-memory sources to script page outcomes.

mod algolia;

pub use algolia::{AlgoliaSource, DEFAULT_API_BASE_URL};

use crate::story::Story;
use std::future::Future;
use thiserror::Error;

/// Errors from fetching a page of stories.
///
/// The list controller only ever sees the `Display` text of these; the
/// variants exist for logging and tests.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the client timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the expected `{ "hits": [...] }` shape
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Configured API base URL was rejected before any request was made
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// A paged source of stories, indexed from page 0.
pub trait StorySource: Send + Sync + 'static {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Vec<Story>, FetchError>> + Send;
}
