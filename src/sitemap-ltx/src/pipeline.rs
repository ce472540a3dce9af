//! Website → llms.txt: sitemap discovery, resolution, then fetch → clean → summarize per page.

use crate::batch::process_in_order;
use crate::clean::clean_text;
use crate::document::LlmsTxtDocument;
use crate::errors::Error;
use crate::fetch::Fetcher;
use crate::llms::LlmProvider;
use crate::sitemap::{page_urls, resolve};
use crate::summarize::{PageSummary, Stage, Summarizer};

/// Conventional sitemap locations, probed in this order.
pub const SITEMAP_PATHS: [&str; 4] = ["sitemap.xml", "sitemap_index.xml", "sitemap-index.xml", "sitemaps.xml"];

/// How a generation run ended.
#[derive(Debug)]
pub enum Outcome {
    /// A sitemap was found and every listed page was processed (successfully or not).
    Generated(LlmsTxtDocument),
    /// None of the probed sitemap locations had content.
    NoSitemap { website: String },
}

/// The probe URLs for a website origin (no trailing slash).
pub fn sitemap_candidates(website: &str) -> Vec<String> {
    SITEMAP_PATHS.iter().map(|path| format!("{website}/{path}")).collect()
}

/// Returns the first probe URL that yields content. Later candidates are not tried once one
/// succeeds; a probe that errors is logged and skipped.
pub async fn discover_sitemap<F>(fetcher: &F, website: &str) -> Option<String>
where
    F: Fetcher + ?Sized,
{
    for candidate in sitemap_candidates(website) {
        tracing::info!("Trying sitemap URL: {candidate}");
        match fetcher.fetch(&candidate).await {
            Ok(Some(content)) => {
                tracing::info!("Found sitemap at: {candidate}");
                tracing::debug!("Sitemap content:\n{content}");
                return Some(candidate);
            }
            Ok(None) => tracing::info!("No sitemap at: {candidate}"),
            Err(error) => tracing::warn!("Error with sitemap {candidate}: {error}"),
        }
    }
    None
}

/// Fetches, cleans and summarizes one page. Never fails: errors become a failed summary.
pub async fn process_page<F, P>(fetcher: &F, summarizer: &Summarizer<P>, url: &str) -> PageSummary
where
    F: Fetcher + ?Sized,
    P: LlmProvider,
{
    tracing::info!("Processing URL: {url}");
    let raw = match fetcher.fetch(url).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::warn!("Error processing {url}: {}", Error::EmptyPage);
            return PageSummary::failed(url, Stage::Fetch, &Error::EmptyPage);
        }
        Err(error) => {
            tracing::warn!("Error processing {url}: {error}");
            return PageSummary::failed(url, Stage::Fetch, &error);
        }
    };

    let text = clean_text(&raw);
    tracing::debug!("Cleaned text from {url}:\n{text}");

    summarizer.summarize(url, &text).await
}

/// Runs the whole pipeline for `website` (an origin such as `https://example.com`).
///
/// Pages are processed `concurrency` at a time; summaries always come back in sitemap
/// pre-order, whatever order they finish in.
pub async fn generate<F, P>(fetcher: &F, summarizer: &Summarizer<P>, website: &str, concurrency: usize) -> Outcome
where
    F: Fetcher + ?Sized,
    P: LlmProvider,
{
    let Some(sitemap_url) = discover_sitemap(fetcher, website).await else {
        return Outcome::NoSitemap {
            website: website.to_string(),
        };
    };

    let groups = resolve(fetcher, &sitemap_url).await;
    for group in &groups {
        tracing::info!("Source {} lists {} page(s)", group.source, group.urls.len());
    }

    let urls = page_urls(&groups);
    tracing::info!("Summarizing {} page(s) with concurrency {concurrency}", urls.len());

    let summaries = process_in_order(
        urls,
        |url, _index| async move { process_page(fetcher, summarizer, &url).await },
        concurrency,
    )
    .await;

    let document = LlmsTxtDocument::new(website, summaries);
    tracing::info!(
        "Summarized {} of {} page(s)",
        document.successes(),
        document.summaries().len()
    );
    Outcome::Generated(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fetch::mock::MockFetcher;
    use crate::llms::mock::MockLlmProvider;
    use crate::session::{Credential, Session};

    fn summarizer(provider: MockLlmProvider) -> Summarizer<MockLlmProvider> {
        Summarizer::new(provider, Session::with_credential(Credential::new("sk-test")))
    }

    fn urlset(locs: &[&str]) -> String {
        let entries: String = locs.iter().map(|l| format!("<url><loc>{l}</loc></url>")).collect();
        format!("<urlset>{entries}</urlset>")
    }

    #[test]
    fn test_sitemap_candidates() {
        assert_eq!(
            sitemap_candidates("https://example.com"),
            vec![
                "https://example.com/sitemap.xml",
                "https://example.com/sitemap_index.xml",
                "https://example.com/sitemap-index.xml",
                "https://example.com/sitemaps.xml",
            ]
        );
    }

    #[tokio::test]
    async fn test_discovery_takes_first_candidate_with_content() {
        let index = urlset(&["https://example.com/a"]);
        let decoy = urlset(&["https://example.com/b"]);
        let mut fetcher = MockFetcher::with_pages(vec![
            ("https://example.com/sitemap_index.xml", &index),
            ("https://example.com/sitemaps.xml", &decoy),
        ]);
        fetcher.add_failure("https://example.com/sitemap.xml");

        let found = discover_sitemap(&fetcher, "https://example.com").await;

        assert_eq!(found.as_deref(), Some("https://example.com/sitemap_index.xml"));
        assert_eq!(
            fetcher.requested(),
            vec!["https://example.com/sitemap.xml", "https://example.com/sitemap_index.xml"]
        );
    }

    #[tokio::test]
    async fn test_no_sitemap() {
        let fetcher = MockFetcher::new();
        let summarizer = summarizer(MockLlmProvider::with_default("unused"));

        let outcome = generate(&fetcher, &summarizer, "https://example.com", 1).await;

        assert!(matches!(outcome, Outcome::NoSitemap { website } if website == "https://example.com"));
        assert_eq!(fetcher.requested().len(), 4);
        assert_eq!(summarizer.provider().calls(), 0);
        assert!(!summarizer.session().has_credential());
    }

    #[tokio::test]
    async fn test_process_page_failures_are_per_page() {
        let mut fetcher = MockFetcher::with_pages(vec![(
            "https://example.com/ok",
            "<p>Fine page</p>",
        )]);
        fetcher.add_failure("https://example.com/down");
        let summarizer = summarizer(MockLlmProvider::with_default("[Fine] (https://example.com/ok): Fine."));

        let down = process_page(&fetcher, &summarizer, "https://example.com/down").await;
        let missing = process_page(&fetcher, &summarizer, "https://example.com/missing").await;
        let ok = process_page(&fetcher, &summarizer, "https://example.com/ok").await;

        assert!(matches!(&down, PageSummary::Failed(e) if e.stage == Stage::Fetch));
        assert!(down.to_string().starts_with("Error processing https://example.com/down:"));
        assert_eq!(
            missing.to_string(),
            "Error processing https://example.com/missing: no textual content was returned"
        );
        assert!(ok.is_success());
        assert_eq!(summarizer.provider().calls(), 1);
    }

    #[tokio::test]
    async fn test_page_text_is_cleaned_before_summarizing() {
        let fetcher = MockFetcher::with_pages(vec![
            ("https://example.com/sitemap.xml", urlset(&["https://example.com/a"])),
            (
                "https://example.com/a",
                r#"<p>Caf&eacute; hours <a href="/x">link text</a> at https://example.com/hours</p>"#.to_string(),
            ),
        ]);
        let summarizer = summarizer(MockLlmProvider::with_response(
            "Input content:\nCaf hours at",
            "[Cafe Hours] (https://example.com/a): Opening hours.",
        ));

        let Outcome::Generated(document) = generate(&fetcher, &summarizer, "https://example.com", 1).await else {
            panic!("expected a document");
        };

        assert_eq!(
            document.summaries(),
            &[PageSummary::Summary("[Cafe Hours] (https://example.com/a): Opening hours.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_summaries_follow_sitemap_pre_order() {
        let fetcher = MockFetcher::with_pages(vec![
            (
                "https://example.com/sitemap.xml",
                urlset(&["https://example.com/home", "https://example.com/posts.xml", "https://example.com/about"]),
            ),
            ("https://example.com/posts.xml", urlset(&["https://example.com/post-1", "https://example.com/post-2"])),
            ("https://example.com/home", "<p>home</p>".to_string()),
            ("https://example.com/about", "<p>about</p>".to_string()),
            ("https://example.com/post-1", "<p>post one</p>".to_string()),
            ("https://example.com/post-2", "<p>post two</p>".to_string()),
        ]);
        let summarizer = summarizer(MockLlmProvider::with_responses(vec![
            ("Input content:\nhome", "home"),
            ("Input content:\nabout", "about"),
            ("Input content:\npost one", "post-1"),
            ("Input content:\npost two", "post-2"),
        ]));

        for concurrency in [1, 3] {
            let Outcome::Generated(document) = generate(&fetcher, &summarizer, "https://example.com", concurrency).await
            else {
                panic!("expected a document");
            };
            let rendered: Vec<String> = document.summaries().iter().map(|s| s.to_string()).collect();
            assert_eq!(rendered, vec!["home", "about", "post-1", "post-2"]);
        }
    }
}
