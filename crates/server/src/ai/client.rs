//! Chat-completions client for the hosted text-generation service

use std::future::Future;
use std::time::Duration;

use medbot_core::MedbotError;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;

/// Anything that turns a role-tagged conversation into text
pub trait TextGenerator: Send + Sync {
    fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
    ) -> impl Future<Output = Result<String, MedbotError>> + Send;
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client for an OpenAI-compatible chat completions endpoint (Groq by default)
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Request body for chat completions
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

/// Response from chat completions
#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error detail returned by the service
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Outcome of one HTTP attempt
enum Failure {
    /// Transport error, timeout, 429 or 5xx
    Retryable(String),
    Fatal(String),
}

impl ChatClient {
    /// Create a client with the configured endpoint, model and timeout
    pub fn new(settings: &LlmSettings) -> Result<Self, MedbotError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| MedbotError::Config(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    async fn send_once(&self, request: &ApiRequest<'_>) -> Result<String, Failure> {
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Failure::Retryable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            let message = format!("Text generation API error ({status}): {detail}");
            return if status.as_u16() == 429 || status.is_server_error() {
                Err(Failure::Retryable(message))
            } else {
                Err(Failure::Fatal(message))
            };
        }

        let parsed = response
            .json::<ApiResponse>()
            .await
            .map_err(|e| Failure::Fatal(format!("Failed to parse response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Failure::Fatal("No text content in response".to_string()))
    }
}

impl TextGenerator for ChatClient {
    /// Send the conversation, retrying once on transient failures
    async fn complete(&self, messages: Vec<Message>, temperature: f32) -> Result<String, MedbotError> {
        let request = ApiRequest {
            model: &self.model,
            messages: &messages,
            temperature,
        };

        match self.send_once(&request).await {
            Ok(text) => Ok(text),
            Err(Failure::Fatal(message)) => Err(MedbotError::Generation(message)),
            Err(Failure::Retryable(message)) => {
                tracing::warn!(error = %message, model = %self.model, "Text generation failed, retrying once");
                self.send_once(&request).await.map_err(|failure| match failure {
                    Failure::Retryable(m) | Failure::Fatal(m) => MedbotError::Generation(m),
                })
            }
        }
    }
}
