//! Anthropic Messages API backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::LanguageModel;
use crate::error::{NotesError, Result, Upstream};

const ANTHROPIC_API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error bodies, keyed by Anthropic's `error.type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ErrorBody {
    AuthenticationError { message: String },
    PermissionError { message: String },
    InvalidRequestError { message: String },
    NotFoundError { message: String },
    RequestTooLarge { message: String },
    RateLimitError { message: String },
    ApiError { message: String },
    OverloadedError { message: String },
}

impl ErrorBody {
    fn into_notes_error(self) -> NotesError {
        match self {
            Self::AuthenticationError { message } | Self::PermissionError { message } => {
                NotesError::auth(Upstream::Anthropic, message)
            }
            Self::InvalidRequestError { message }
            | Self::NotFoundError { message }
            | Self::RequestTooLarge { message } => {
                NotesError::Model(format!("request rejected: {}", message))
            }
            Self::RateLimitError { message } => {
                NotesError::Model(format!("rate limited: {}", message))
            }
            Self::ApiError { message } | Self::OverloadedError { message } => {
                NotesError::Model(format!("service error: {}", message))
            }
        }
    }
}

pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        base_url: String,
        model: String,
        max_tokens: u32,
    ) -> Self {
        info!(
            "Initialized Anthropic client with base URL: {} (model {})",
            base_url, model
        );

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    fn name(&self) -> &'static str {
        "Anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NotesError::auth(Upstream::Anthropic, "API key not configured"))?;

        let request_body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Anthropic request failed: {}", e);
                if e.is_timeout() {
                    NotesError::Model(format!("request timed out: {}", e))
                } else {
                    NotesError::Model(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| NotesError::Model(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!(
                "Anthropic request failed with status {}: {}",
                status, response_text
            );

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(error_response.error.into_notes_error());
            }

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(NotesError::auth(
                    Upstream::Anthropic,
                    format!("status {}", status),
                ));
            }

            return Err(NotesError::Model(format!(
                "status {}: {}",
                status, response_text
            )));
        }

        let messages_response: MessagesResponse = serde_json::from_str(&response_text)
            .map_err(|e| NotesError::Model(format!("failed to parse response: {}", e)))?;

        let text = messages_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(NotesError::Model("model returned no text".to_string()));
        }

        info!(
            "Anthropic completion successful, generated {} characters (stop reason: {})",
            text.len(),
            messages_response.stop_reason.as_deref().unwrap_or("unknown")
        );
        Ok(text)
    }
}
