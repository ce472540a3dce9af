//! Chat completions over an OpenAI-compatible HTTP endpoint (OpenRouter by default).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GeneratorOptions;
use crate::errors::{Error, Result};
use crate::llms::{ChatMessage, LlmProvider};
use crate::session::Credential;

/// Completion client for a single endpoint + model.
#[derive(Debug, Clone)]
pub struct OpenRouter {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OpenRouter {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }

    pub fn from_options(options: &GeneratorOptions) -> Result<Self> {
        Self::new(options.endpoint.clone(), options.model.clone(), options.timeout)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// `error` object of a failed completion. Providers disagree on whether `code` is a number or a string.
#[derive(Debug, Default, Deserialize)]
struct ServiceError {
    code: Option<serde_json::Value>,
    message: Option<String>,
}

impl From<ServiceError> for Error {
    fn from(error: ServiceError) -> Self {
        let code = match error.code {
            Some(serde_json::Value::String(code)) => code,
            Some(serde_json::Value::Null) | None => "Unknown code".to_string(),
            Some(other) => other.to_string(),
        };
        Error::CompletionService {
            code,
            message: error.message.unwrap_or_else(|| "Unknown error".to_string()),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouter {
    async fn complete_chat(&self, credential: &Credential, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("Completion response ({status}): {body}");

        interpret_response(status, body)
    }
}

/// Maps a completion response onto the reply text or the error the service reported.
///
/// - 200 with `choices`: the first choice's content.
/// - 200 without `choices`: the body's `error.code` / `error.message`, defaulting when absent.
/// - anything else: the body's `error` if it has one, otherwise the raw status and body.
fn interpret_response(status: u16, body: String) -> Result<String> {
    if status != 200 {
        return match serde_json::from_str::<ChatResponse>(&body) {
            Ok(ChatResponse { error: Some(error), .. }) => Err(error.into()),
            _ => Err(Error::CompletionStatus { status, body }),
        };
    }

    let response: ChatResponse = serde_json::from_str(&body)?;
    match response.choices {
        Some(choices) => choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(Error::EmptyCompletion),
        None => Err(response.error.unwrap_or_default().into()),
    }
}
