//! Wire payloads shared by both chat dialects.
//!
//! Ollama and OpenWebUI accept the same request body but answer in different
//! shapes: OpenWebUI mirrors the OpenAI `choices` array, Ollama returns a
//! single `message`. [`ChatReplyBody`] models both so one decode covers either.

pub mod client;
pub mod dialect;
pub mod probe;

pub use client::{ClientConfig, LlmClient};
pub use dialect::{ApiDialect, EndpointMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::message::Message;

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,
    pub stream: bool,
}

/// Which response convention a reply was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// `choices[0].message.content`
    Choices,
    /// `message.content`
    Message,
}

/// Top-level fields of a chat reply. Both are kept as raw JSON so that an
/// odd type in one field never hides the other.
#[derive(Deserialize, Default)]
pub struct ChatReplyBody {
    #[serde(default)]
    pub choices: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ChatReplyBody {
    /// Pull the assistant text out of whichever shape is present. A non-empty
    /// `choices` array wins over `message`, whatever `message` holds. Returns
    /// `None` when neither shape is there.
    pub fn into_reply(self) -> Option<(ReplyShape, String)> {
        if let Some(first) = self
            .choices
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
        {
            let content = first.get("message").and_then(|message| message.get("content"));
            return Some((ReplyShape::Choices, content_text(content)));
        }

        match self.message {
            None | Some(Value::Null) => None,
            Some(message) => Some((ReplyShape::Message, content_text(message.get("content")))),
        }
    }
}

fn content_text(content: Option<&Value>) -> String {
    match content {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// One entry of a model listing. OpenWebUI fills `id`, Ollama fills `model`.
#[derive(Deserialize, Debug, Default)]
pub struct ModelEntry {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
}
