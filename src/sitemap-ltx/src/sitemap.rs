//! Sitemap resolution: expands a sitemap into the page URLs of every sitemap nested below it.
//!
//! Candidate URLs are pulled out of the raw fetched text with two patterns:
//! `<loc>...</loc>` values (sitemap XML) and `<https://...>` autolinks (sitemaps rendered as
//! markdown link tables). A URL whose path ends in `.xml` names another sitemap; anything else
//! is a page.
//!
//! The sitemap tree is walked depth-first with an explicit stack, so the groups come out in
//! pre-order: a sitemap's own pages precede the pages of the sitemaps it lists, which appear
//! in listing order. Sitemaps already visited are skipped, so cyclic references terminate.

use std::collections::HashSet;
use std::sync::LazyLock;

use quick_xml::escape::unescape;
use regex::Regex;

use crate::fetch::Fetcher;

static LOC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<loc>\s*(.*?)\s*</loc>").expect("valid <loc> pattern"));

static AUTOLINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(https?://[^>]+)>").expect("valid autolink pattern"));

/// The page URLs listed directly by one sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    /// The sitemap that listed the pages
    pub source: String,
    /// Page URLs in the order they were extracted. Never empty.
    pub urls: Vec<String>,
}

/// Source groups in pre-order of the sitemap tree.
pub type ResolutionResult = Vec<SourceGroup>;

/// What a URL found inside a sitemap points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapEntry {
    /// Another sitemap to expand
    Nested(String),
    /// A terminal page
    Page(String),
}

/// Classifies a URL by suffix only: `.xml` (any case) is a nested sitemap.
pub fn classify(url: &str) -> SitemapEntry {
    if url.to_ascii_lowercase().ends_with(".xml") {
        SitemapEntry::Nested(url.to_string())
    } else {
        SitemapEntry::Page(url.to_string())
    }
}

/// Extracts candidate URLs from raw sitemap text.
///
/// All `<loc>` values come first, then all autolinks, each in document order. Nothing is
/// deduplicated. `<loc>` values are XML-unescaped when possible.
pub fn extract_urls(text: &str) -> Vec<String> {
    let locs = LOC_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|loc| !loc.is_empty())
        .map(|loc| unescape(loc).map(|u| u.into_owned()).unwrap_or_else(|_| loc.to_string()));

    let autolinks = AUTOLINK_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    locs.chain(autolinks).collect()
}

/// A sitemap's extracted URLs, split by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapListing {
    pub pages: Vec<String>,
    pub nested: Vec<String>,
}

impl SitemapListing {
    /// Extracts and classifies the URLs of one sitemap document.
    pub fn parse(text: &str) -> Self {
        let mut listing = Self::default();
        for url in extract_urls(text) {
            match classify(&url) {
                SitemapEntry::Nested(url) => listing.nested.push(url),
                SitemapEntry::Page(url) => listing.pages.push(url),
            }
        }
        listing
    }
}

/// Resolves `sitemap_url` and everything nested below it into source groups.
///
/// Never fails: a sitemap that cannot be fetched, or has no content, contributes nothing and
/// the walk carries on with its siblings.
pub async fn resolve<F>(fetcher: &F, sitemap_url: &str) -> ResolutionResult
where
    F: Fetcher + ?Sized,
{
    let mut groups = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: Vec<(String, usize)> = vec![(sitemap_url.to_string(), 0)];

    while let Some((url, level)) = frontier.pop() {
        if !visited.insert(url.clone()) {
            tracing::warn!("Skipping already visited sitemap {url} (level {level})");
            continue;
        }

        let Some(listing) = read_sitemap(fetcher, &url, level).await else {
            continue;
        };

        if !listing.pages.is_empty() {
            groups.push(SourceGroup {
                source: url.clone(),
                urls: listing.pages,
            });
        }

        // reversed so that the first listed sitemap is expanded next
        frontier.extend(listing.nested.into_iter().rev().map(|nested| (nested, level + 1)));

        tracing::info!("Finished processing sitemap {url}");
    }

    groups
}

async fn read_sitemap<F>(fetcher: &F, url: &str, level: usize) -> Option<SitemapListing>
where
    F: Fetcher + ?Sized,
{
    tracing::info!("Crawling sitemap {url} (level {level})");
    match fetcher.fetch(url).await {
        Ok(Some(text)) => {
            let listing = SitemapListing::parse(&text);
            tracing::info!(
                "Sitemap {url}: {} page(s), {} nested sitemap(s)",
                listing.pages.len(),
                listing.nested.len()
            );
            Some(listing)
        }
        Ok(None) => {
            tracing::info!("No content found for sitemap {url}");
            None
        }
        Err(error) => {
            tracing::warn!("Error crawling {url}: {error}");
            None
        }
    }
}

/// Every page URL across all groups, in resolution order.
pub fn page_urls(groups: &[SourceGroup]) -> Vec<String> {
    groups.iter().flat_map(|g| g.urls.iter().cloned()).collect()
}
