//! Scripted completion provider for tests: answers from configured rules, never touches the network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::{Error, Result};
use crate::llms::{ChatMessage, LlmProvider, Role};
use crate::session::Credential;

/// Replies with the first rule whose needle occurs in the user message(s), else the fallback.
///
/// Rules are checked in the order they were given.
#[derive(Default)]
pub struct MockLlmProvider {
    rules: Vec<(String, String)>,
    fallback: Option<String>,
    failure_status: Option<u16>,
    calls: AtomicUsize,
}

impl MockLlmProvider {
    pub fn with_response(needle: &str, reply: &str) -> Self {
        Self::with_responses(vec![(needle, reply)])
    }

    pub fn with_responses(rules: Vec<(&str, &str)>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(needle, reply)| (needle.to_string(), reply.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Answers every prompt with `reply`.
    pub fn with_default(reply: &str) -> Self {
        Self {
            fallback: Some(reply.to_string()),
            ..Self::default()
        }
    }

    /// Fails every call the way a service answering `status` with a plain-text body would.
    pub fn with_failure(status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::default()
        }
    }

    /// Completions requested so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply_for(&self, user_text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(needle, _)| user_text.contains(needle.as_str()))
            .map(|(_, reply)| reply.as_str())
            .or(self.fallback.as_deref())
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete_chat(&self, _credential: &Credential, messages: &[ChatMessage]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.failure_status {
            return Err(Error::CompletionStatus {
                status,
                body: "scripted failure".to_string(),
            });
        }

        let user_text: String = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        self.reply_for(&user_text)
            .map(str::to_string)
            .ok_or_else(|| Error::CompletionService {
                code: "mock".to_string(),
                message: "no scripted reply matches this prompt".to_string(),
            })
    }
}
