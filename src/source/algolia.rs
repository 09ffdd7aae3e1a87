use super::{FetchError, StorySource};
use crate::story::{SearchPage, Story};
use futures::StreamExt;
use std::time::Duration;
use url::Url;

/// Public Hacker News search API.
pub const DEFAULT_API_BASE_URL: &str = "https://hn.algolia.com/api/v1";

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Story source backed by `GET <base>/search_by_date?tags=story&page=<n>`.
///
/// Cloning is cheap: `reqwest::Client` is reference counted internally.
#[derive(Debug, Clone)]
pub struct AlgoliaSource {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl AlgoliaSource {
    /// Build a source with its own pooled HTTP client.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;
        Self::with_client(client, base_url)
    }

    /// Build a source around an existing client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        let endpoint = endpoint_for(base_url)?;
        Ok(Self {
            client,
            endpoint,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Deadline for one whole request: connect, headers, body and decode.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL for one page, e.g. `.../search_by_date?tags=story&page=3`.
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("tags", "story")
            .append_pair("page", &page.to_string());
        url
    }
}

/// Validate the base URL and derive the `search_by_date` endpoint.
///
/// HTTPS is required, except plain HTTP against localhost (used by tests
/// pointing at a mock server).
fn endpoint_for(base_url: &str) -> Result<Url, FetchError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{}/search_by_date", trimmed))
        .map_err(|e| FetchError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            let is_localhost = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
            if !is_localhost {
                tracing::error!(base_url = %base_url, "Rejecting non-HTTPS API base URL");
                return Err(FetchError::InvalidBaseUrl(format!(
                    "{}: HTTPS required (except localhost)",
                    base_url
                )));
            }
            tracing::warn!(base_url = %base_url, "Using non-HTTPS API base URL (localhost only)");
        }
        scheme => {
            return Err(FetchError::InvalidBaseUrl(format!(
                "{}: unsupported scheme {}",
                base_url, scheme
            )));
        }
    }

    Ok(url)
}

impl StorySource for AlgoliaSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Story>, FetchError> {
        let url = self.page_url(page);
        tracing::debug!(url = %url, page, "Fetching story page");

        // A stalled body must not outlive the deadline either
        let hits = tokio::time::timeout(self.timeout, self.request_page(url))
            .await
            .map_err(|_| {
                tracing::warn!(
                    page,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Story page request timed out"
                );
                FetchError::Timeout
            })??;

        tracing::debug!(page, hits = hits.len(), "Fetched story page");
        Ok(hits)
    }
}

impl AlgoliaSource {
    async fn request_page(&self, url: Url) -> Result<Vec<Story>, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let body: SearchPage = serde_json::from_slice(&bytes)?;
        Ok(body.hits)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_has_story_tag_and_page() {
        let source = AlgoliaSource::new(DEFAULT_API_BASE_URL).unwrap();
        assert_eq!(
            source.page_url(3).as_str(),
            "https://hn.algolia.com/api/v1/search_by_date?tags=story&page=3"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let source = AlgoliaSource::new("https://hn.algolia.com/api/v1/").unwrap();
        assert!(source
            .page_url(0)
            .as_str()
            .starts_with("https://hn.algolia.com/api/v1/search_by_date?"));
    }

    #[test]
    fn test_http_base_url_rejected() {
        let result = AlgoliaSource::new("http://evil.example.com/api");
        assert!(matches!(result, Err(FetchError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_localhost_http_allowed() {
        assert!(AlgoliaSource::new("http://127.0.0.1:8080").is_ok());
        assert!(AlgoliaSource::new("http://localhost:8080/api/v1").is_ok());
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let result = AlgoliaSource::new("file:///etc");
        assert!(matches!(result, Err(FetchError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_garbage_base_url_rejected() {
        let result = AlgoliaSource::new("not a url");
        assert!(matches!(result, Err(FetchError::InvalidBaseUrl(_))));
    }
}
