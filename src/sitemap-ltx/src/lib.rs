//! # llms.txt from sitemaps
//!
//! Finds a website's sitemap, expands every nested sitemap into page URLs, then fetches,
//! cleans and summarizes each page into one line of an llms.txt directory document.
//!
//! ```no_run
//! use sitemap_ltx::{
//!     GeneratorOptions, HttpFetcher, OpenRouter, Outcome, Session, Summarizer, generate, normalize_website,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = GeneratorOptions::builder().concurrency(4).build();
//! let fetcher = HttpFetcher::new(options.timeout)?;
//! let summarizer = Summarizer::new(OpenRouter::from_options(&options)?, Session::interactive());
//!
//! let website = normalize_website("example.com")?;
//! match generate(&fetcher, &summarizer, &website, options.concurrency).await {
//!     Outcome::Generated(document) => document.write_to(&options.output)?,
//!     Outcome::NoSitemap { website } => eprintln!("no sitemap for {website}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod clean;
pub mod common;
pub mod config;
pub mod document;
mod errors;
pub mod fetch;
pub mod llms;
pub mod pipeline;
pub mod session;
pub mod sitemap;
pub mod summarize;

pub use clean::clean_text;
pub use common::logging::{DEFAULT_LOG_SETTINGS, setup_logging};
pub use config::{GeneratorOptions, GeneratorOptionsBuilder};
pub use document::LlmsTxtDocument;
pub use errors::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher, is_valid_url, normalize_website};
pub use llms::{LlmProvider, OpenRouter};
pub use pipeline::{Outcome, discover_sitemap, generate, process_page};
pub use session::{Credential, CredentialSource, Session};
pub use sitemap::{ResolutionResult, SourceGroup, resolve};
pub use summarize::{PageError, PageSummary, Stage, Summarizer};
