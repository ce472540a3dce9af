//! Retrieval of sitemap documents and pages.

pub mod mock;

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::errors::Result;

/// Anything that can turn a URL into its textual content.
///
/// `Ok(None)` means the URL was reachable but yielded no usable text. Transport failures are errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Option<String>>;
}

/// Fetches content over HTTP(S) with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{url} answered with status {status}, treating as no content");
            return Ok(None);
        }
        let body = response.text().await?;
        Ok(non_blank(body))
    }
}

/// Drops bodies that contain nothing but whitespace.
pub fn non_blank(body: String) -> Option<String> {
    if body.trim().is_empty() { None } else { Some(body) }
}

/// Validates that the input string is a URL.
pub fn is_valid_url(url: &str) -> Result<Url> {
    let valid_url = Url::parse(url)?;
    Ok(valid_url)
}

/// Turns operator input into a website origin: adds `https://` when no scheme is given
/// and drops any trailing slash so probe paths can be appended directly.
pub fn normalize_website(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    is_valid_url(&with_scheme)?;
    Ok(with_scheme.trim_end_matches('/').to_string())
}
