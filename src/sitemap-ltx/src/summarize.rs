//! One-line summaries of pages, with failures kept per page.

use crate::errors::Error;
use crate::llms::{ChatMessage, LlmProvider, SYSTEM_PROMPT, prompt_summarize_page};
use crate::session::Session;

/// The step of page processing that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Downloading the page
    Fetch,
    /// Obtaining the completion service credential
    Credential,
    /// Building the prompt or calling the completion service
    Summarize,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Credential => write!(f, "credential"),
            Stage::Summarize => write!(f, "summarize"),
        }
    }
}

/// Why a page has no summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    pub url: String,
    pub stage: Stage,
    pub message: String,
}

impl PageError {
    pub fn new(url: &str, stage: Stage, error: &Error) -> Self {
        Self {
            url: url.to_string(),
            stage,
            message: error.to_string(),
        }
    }
}

/// Rendered exactly as it appears in the llms.txt document.
impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error processing {}: {}", self.url, self.message)
    }
}

impl std::error::Error for PageError {}

/// Outcome of processing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSummary {
    /// `[Title] (url): sentence`, as returned by the completion service
    Summary(String),
    /// The page could not be summarized
    Failed(PageError),
}

impl PageSummary {
    pub fn failed(url: &str, stage: Stage, error: &Error) -> Self {
        PageSummary::Failed(PageError::new(url, stage, error))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PageSummary::Summary(_))
    }
}

impl std::fmt::Display for PageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSummary::Summary(summary) => write!(f, "{summary}"),
            PageSummary::Failed(error) => write!(f, "{error}"),
        }
    }
}

/// Summarizes pages with one completion call each, using the session's credential.
pub struct Summarizer<P> {
    provider: P,
    session: Session,
}

impl<P: LlmProvider> Summarizer<P> {
    pub fn new(provider: P, session: Session) -> Self {
        Self { provider, session }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Asks for a title + one-sentence summary of the page. Never fails: every error becomes
    /// a [`PageSummary::Failed`] naming the page.
    ///
    /// The first call acquires the credential from the session.
    pub async fn summarize(&self, url: &str, text: &str) -> PageSummary {
        let credential = match self.session.credential().await {
            Ok(credential) => credential,
            Err(error) => {
                tracing::error!("Cannot summarize {url} without a credential: {error}");
                return PageSummary::failed(url, Stage::Credential, &error);
            }
        };

        let prompt = match prompt_summarize_page(url, text) {
            Ok(prompt) => prompt,
            Err(error) => return PageSummary::failed(url, Stage::Summarize, &error),
        };
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        match self.provider.complete_chat(credential, &messages).await {
            Ok(summary) => {
                tracing::info!("Summary generated for {url}");
                PageSummary::Summary(summary)
            }
            Err(error) => {
                tracing::warn!("Error processing {url}: {error}");
                PageSummary::failed(url, Stage::Summarize, &error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::llms::mock::MockLlmProvider;
    use crate::session::{Credential, CredentialSource};

    fn session() -> Session {
        Session::with_credential(Credential::new("sk-test"))
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let provider = MockLlmProvider::with_response(
            "(https://example.com/a)",
            "[Example Page] (https://example.com/a): A sample page.",
        );
        let summarizer = Summarizer::new(provider, session());

        let summary = summarizer.summarize("https://example.com/a", "Some example text").await;

        assert_eq!(
            summary,
            PageSummary::Summary("[Example Page] (https://example.com/a): A sample page.".to_string())
        );
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_summarize_server_error_becomes_failed_summary() {
        let summarizer = Summarizer::new(MockLlmProvider::with_failure(500), session());

        let summary = summarizer.summarize("https://example.com/a", "text").await;

        match &summary {
            PageSummary::Failed(error) => {
                assert_eq!(error.stage, Stage::Summarize);
                assert_eq!(error.url, "https://example.com/a");
            }
            other => panic!("expected a failure, got {other:?}"),
        }
        assert!(summary.to_string().starts_with("Error processing https://example.com/a:"));
        assert_eq!(
            summary.to_string(),
            "Error processing https://example.com/a: 500 - scripted failure"
        );
    }

    #[tokio::test]
    async fn test_summarize_without_credential() {
        struct Refusing;

        #[async_trait::async_trait]
        impl CredentialSource for Refusing {
            async fn acquire(&self) -> crate::errors::Result<Credential> {
                Err(Error::Io(std::io::Error::other("stdin closed")))
            }
        }

        let provider = MockLlmProvider::with_default("never used");
        let summarizer = Summarizer::new(provider, Session::new(Refusing));

        let summary = summarizer.summarize("https://example.com/a", "text").await;

        assert!(matches!(&summary, PageSummary::Failed(e) if e.stage == Stage::Credential));
        assert_eq!(summarizer.provider().calls(), 0);
    }

    #[tokio::test]
    async fn test_credential_reused_across_pages() {
        let summarizer = Summarizer::new(MockLlmProvider::with_default("[T] (u): s."), session());

        for page in ["https://example.com/a", "https://example.com/b"] {
            assert!(summarizer.summarize(page, "text").await.is_success());
        }

        assert!(summarizer.session().has_credential());
        assert_eq!(summarizer.provider().calls(), 2);
    }
}
