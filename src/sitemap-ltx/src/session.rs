//! The operator's completion-service credential, asked for once and kept for the whole run.

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::errors::Result;

/// An API key for the completion service. Never logged and never written to disk.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    /// The raw key, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(<redacted>)")
    }
}

/// Where a credential comes from when the session first needs one.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn acquire(&self) -> Result<Credential>;
}

/// Asks the operator on the terminal, without echoing the key.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptCredential;

pub const CREDENTIAL_PROMPT: &str = "Enter your OpenRouter API key (get it from openrouter.ai)";

#[async_trait]
impl CredentialSource for PromptCredential {
    async fn acquire(&self) -> Result<Credential> {
        let key = tokio::task::spawn_blocking(|| {
            dialoguer::Password::new()
                .with_prompt(CREDENTIAL_PROMPT)
                .allow_empty_password(true)
                .interact()
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(Credential::new(key))
    }
}

/// A credential that is already known.
#[derive(Debug, Clone)]
pub struct FixedCredential(pub Credential);

#[async_trait]
impl CredentialSource for FixedCredential {
    async fn acquire(&self) -> Result<Credential> {
        Ok(self.0.clone())
    }
}

/// Process-lifetime holder of the credential.
///
/// The first call to [`Session::credential`] acquires it from the source; every later call
/// (including concurrent ones) gets the same value without asking again. A failed acquisition
/// leaves the session empty, so the next call asks again.
pub struct Session {
    source: Box<dyn CredentialSource>,
    credential: OnceCell<Credential>,
}

impl Session {
    pub fn new(source: impl CredentialSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            credential: OnceCell::new(),
        }
    }

    /// A session that asks the operator on the terminal.
    pub fn interactive() -> Self {
        Self::new(PromptCredential)
    }

    /// A session with a credential known up front.
    pub fn with_credential(credential: Credential) -> Self {
        Self::new(FixedCredential(credential))
    }

    pub async fn credential(&self) -> Result<&Credential> {
        self.credential
            .get_or_try_init(|| async {
                tracing::info!("Acquiring completion service credential");
                self.source.acquire().await
            })
            .await
    }

    /// True once a credential has been acquired.
    pub fn has_credential(&self) -> bool {
        self.credential.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::errors::Error;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail_first: bool,
    }

    #[async_trait]
    impl CredentialSource for CountingSource {
        async fn acquire(&self) -> Result<Credential> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(Error::Io(std::io::Error::other("terminal closed")));
            }
            Ok(Credential::new(format!("key-{call}")))
        }
    }

    #[tokio::test]
    async fn test_credential_is_acquired_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = Session::new(CountingSource {
            calls: calls.clone(),
            fail_first: false,
        });
        assert!(!session.has_credential());

        let first = session.credential().await.unwrap().clone();
        let second = session.credential().await.unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(first.expose(), "key-0");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(session.has_credential());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_acquisition() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = Session::new(CountingSource {
            calls: calls.clone(),
            fail_first: false,
        });

        let (a, b, c) = tokio::join!(session.credential(), session.credential(), session.credential());

        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_acquisition_is_retried_on_next_use() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = Session::new(CountingSource {
            calls: calls.clone(),
            fail_first: true,
        });

        assert!(session.credential().await.is_err());
        assert_eq!(session.credential().await.unwrap().expose(), "key-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("  sk-or-secret \n");
        assert_eq!(credential.expose(), "sk-or-secret");
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
