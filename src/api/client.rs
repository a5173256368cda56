// ABOUTME: Thin reqwest client for the chat API
// Decodes responses leniently so a malformed body degrades instead of crashing the UI

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{ChatMessage, Role};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success response, carrying the server's `detail` when it sent one.
    #[error("{0}")]
    Server(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    session_id: &'a str,
    message: &'a str,
    context: Option<&'a str>,
    reset: bool,
}

/// Outcome of one chat round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub reply: String,
    pub history: Vec<ChatMessage>,
}

pub struct ChatClient {
    http: reqwest::Client,
    api_base: String,
}

impl ChatClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            api_base,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// POST the message to the active session and return the reply plus the
    /// server's view of the history.
    pub async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatExchange, ApiError> {
        let body = ChatRequestBody {
            session_id,
            message,
            context: None,
            reset: false,
        };
        let response = self
            .http
            .post(format!("{}/api/chat", self.api_base))
            .json(&body)
            .send()
            .await?;
        let value = Self::lenient_json(response).await?;
        Ok(ChatExchange {
            reply: reply_text(&value),
            history: normalize_history(&value),
        })
    }

    /// Fetch the stored history for a session.
    pub async fn fetch_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let response = self
            .http
            .get(format!("{}/api/chat/{}", self.api_base, session_id))
            .send()
            .await?;
        let value = Self::lenient_json(response).await?;
        Ok(normalize_history(&value))
    }

    /// Ask the server to drop its state for a session.
    pub async fn reset_session(&self, session_id: &str) -> Result<(), ApiError> {
        self.http
            .delete(format!("{}/api/chat/{}", self.api_base, session_id))
            .send()
            .await?;
        Ok(())
    }

    /// An undecodable body reads as an empty object; a non-success status
    /// becomes a Server error carrying the `detail` field when present.
    async fn lenient_json(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let value: Value = response
            .json()
            .await
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        if !status.is_success() {
            return Err(ApiError::Server(error_detail(&value)));
        }
        Ok(value)
    }
}

fn error_detail(value: &Value) -> String {
    value
        .get("detail")
        .and_then(Value::as_str)
        .unwrap_or("Request failed")
        .to_string()
}

fn reply_text(value: &Value) -> String {
    value
        .get("reply")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Anything that is not an assistant turn renders as a user turn; content is
/// stringified with missing values becoming empty.
fn normalize_history(value: &Value) -> Vec<ChatMessage> {
    let Some(items) = value.get("history").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let role = match item.get("role").and_then(Value::as_str) {
                Some("assistant") => Role::Assistant,
                _ => Role::User,
            };
            ChatMessage {
                role,
                content: content_text(item.get("content")),
            }
        })
        .collect()
}

fn content_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
