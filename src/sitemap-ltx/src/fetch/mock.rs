//! In-memory fetcher for testing
//!
//! Serves configured bodies by exact URL, simulates transport failures for chosen URLs,
//! and records every URL it was asked for.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::fetch::Fetcher;

/// Mock fetcher for testing
///
/// Unknown URLs yield no content, like a missing page.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock serving every `(url, body)` pair
    pub fn with_pages<U, B>(pages: Vec<(U, B)>) -> Self
    where
        U: AsRef<str>,
        B: AsRef<str>,
    {
        let mut fetcher = Self::new();
        for (url, body) in pages {
            fetcher.add_page(url.as_ref(), body.as_ref());
        }
        fetcher
    }

    /// Serve `body` for `url`
    pub fn add_page(&mut self, url: &str, body: &str) {
        self.pages.insert(url.to_string(), body.to_string());
    }

    /// Make every fetch of `url` fail with a transport-like error
    pub fn add_failure(&mut self, url: &str) {
        self.failing.insert(url.to_string());
    }

    /// Every URL fetched so far, in request order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }

        if self.failing.contains(url) {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("mock fetcher configured to fail for {url}"),
            )));
        }

        Ok(self.pages.get(url).cloned().and_then(super::non_blank))
    }
}
