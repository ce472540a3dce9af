pub mod mock;
pub mod openrouter;
pub mod prompts;

use async_trait::async_trait;
use serde::Serialize;

pub use openrouter::OpenRouter;
pub use prompts::{SYSTEM_PROMPT, prompt_summarize_page};

use crate::errors::Result;
use crate::session::Credential;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Interface to a hosted LLM that lets us complete a chat and await the reply text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete_chat(&self, credential: &Credential, messages: &[ChatMessage]) -> Result<String>;
}
