use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::api::dialect::{ApiDialect, EndpointMap};
use crate::api::probe::{probe_endpoint, DetectedApi, TOKEN_ENV_VAR};
use crate::api::{ChatReplyBody, ChatRequest};
use crate::core::constants::{DEFAULT_PROMPT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE};
use crate::core::message::Message;
use crate::utils::report::Reporter;
use crate::utils::url::normalize_base_url;

/// Connection settings, fixed for the lifetime of an [`LlmClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub model: String,
    /// Explicit bearer token. `None` or empty falls back to `LLM_API_TOKEN`.
    pub token: Option<String>,
    pub temperature: f32,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            token: None,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Pick the bearer token: a non-empty explicit token wins over the
/// environment, and a missing token is sent as an empty string.
pub fn resolve_token(explicit: Option<&str>, from_env: Option<String>) -> String {
    match explicit {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => from_env.unwrap_or_default(),
    }
}

/// Errors raised while talking to the chat or model endpoints. They are
/// reported and then degraded, never handed to the REPL.
#[derive(Debug)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    Request(reqwest::Error),

    /// The endpoint answered with a non-success status.
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body was not the JSON we expected.
    Decode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(source) => write!(f, "{source}"),
            TransportError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "API request failed with status {status}")
                } else {
                    write!(f, "API request failed with status {status}: {body}")
                }
            }
            TransportError::Decode(source) => write!(f, "invalid JSON response: {source}"),
        }
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TransportError::Request(source) => Some(source),
            TransportError::Status { .. } => None,
            TransportError::Decode(source) => Some(source),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        TransportError::Request(value)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(value: serde_json::Error) -> Self {
        TransportError::Decode(value)
    }
}

/// Sends an assembled conversation and yields the assistant's reply.
///
/// Implementations are fail-soft: any failure is reported and comes back as
/// an empty string.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_conversation(&self, messages: &[Message]) -> String;
}

pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    token: String,
    temperature: f32,
    detected: DetectedApi,
    reporter: Arc<dyn Reporter>,
}

impl LlmClient {
    /// Build the HTTP client and probe the endpoint. The returned client
    /// always has its dialect resolved.
    pub async fn connect(
        config: ClientConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let base_url = normalize_base_url(&config.base_url);
        let token = resolve_token(
            config.token.as_deref(),
            std::env::var(TOKEN_ENV_VAR).ok(),
        );
        let detected = probe_endpoint(&http, &base_url, &token, reporter.as_ref()).await;

        Ok(Self {
            http,
            base_url,
            model: config.model,
            token,
            temperature: config.temperature,
            detected,
            reporter,
        })
    }

    pub fn dialect(&self) -> ApiDialect {
        self.detected.dialect
    }

    pub fn endpoints(&self) -> &EndpointMap {
        &self.detected.endpoints
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Raw model listing, or an empty object when the request fails.
    pub async fn models(&self) -> Value {
        match self.fetch_models().await {
            Ok(body) => body,
            Err(err) => {
                self.reporter.error(&format!("Request failed: {err}"));
                Value::Object(Default::default())
            }
        }
    }

    /// One-shot exchange outside any conversation history.
    pub async fn send_prompt(&self, prompt: &str, system_prompt: &str) -> String {
        let system_prompt = if system_prompt.is_empty() {
            DEFAULT_PROMPT_SYSTEM_MESSAGE
        } else {
            system_prompt
        };
        let messages = [Message::system(system_prompt), Message::user(prompt)];
        self.send_conversation(&messages).await
    }

    async fn fetch_models(&self) -> Result<Value, TransportError> {
        debug!(url = %self.detected.endpoints.models, "listing models");
        let response = self
            .http
            .get(&self.detected.endpoints.models)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let body = read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_chat(&self, messages: &[Message]) -> Result<ChatReplyBody, TransportError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            stream: false,
        };

        debug!(
            url = %self.detected.endpoints.chat,
            dialect = %self.detected.dialect,
            messages = messages.len(),
            "sending chat request"
        );
        let response = self
            .http
            .post(&self.detected.endpoints.chat)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let body = read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ChatTransport for LlmClient {
    async fn send_conversation(&self, messages: &[Message]) -> String {
        match self.post_chat(messages).await {
            Ok(body) => extract_reply(body, self.reporter.as_ref()),
            Err(err) => {
                self.reporter.error(&format!("Request failed: {err}"));
                String::new()
            }
        }
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<String, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status { status, body });
    }
    Ok(response.text().await?)
}

/// Reply text from a decoded chat body, warning when neither known shape is
/// present.
pub fn extract_reply(body: ChatReplyBody, reporter: &dyn Reporter) -> String {
    match body.into_reply() {
        Some((shape, content)) => {
            debug!(?shape, "reply extracted");
            content
        }
        None => {
            reporter.warning("Unexpected JSON structure.");
            String::new()
        }
    }
}
