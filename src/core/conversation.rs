//! Conversation history and context assembly
//!
//! A [`Conversation`] owns the ordered transcript of one chat session. Index 0
//! is always the system message. Each turn appends the user message and the
//! assistant reply, whatever the transport returned, so the transcript keeps
//! moving even when a request degraded to an empty reply.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::api::client::ChatTransport;
use crate::core::constants::{DEFAULT_SYSTEM_PROMPT, NO_RESPONSE_SENTINEL};
use crate::core::message::Message;

/// Which part of the history travels with a new user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContextMode {
    /// Every stored message.
    Full,
    /// The system message and the assistant's own prior replies.
    SummaryOnly,
    /// Only the system message.
    #[default]
    Minimal,
}

impl ContextMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextMode::Full => "full",
            ContextMode::SummaryOnly => "summary",
            ContextMode::Minimal => "minimal",
        }
    }

    pub fn all() -> [ContextMode; 3] {
        [
            ContextMode::Full,
            ContextMode::SummaryOnly,
            ContextMode::Minimal,
        ]
    }
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "everything" => Ok(ContextMode::Full),
            "summary" | "summary-only" | "summaryonly" | "assistant" => {
                Ok(ContextMode::SummaryOnly)
            }
            "minimal" | "none" => Ok(ContextMode::Minimal),
            other => Err(format!(
                "unknown context mode '{other}' (expected full, summary or minimal)"
            )),
        }
    }
}

impl TryFrom<String> for ContextMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContextMode> for String {
    fn from(value: ContextMode) -> Self {
        value.as_str().to_string()
    }
}

/// Errors from saving or loading a transcript file.
#[derive(Debug)]
pub enum TranscriptError {
    /// The file could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not a JSON array of `{role, content}` objects.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The transcript does not start with a system message.
    MissingSystemMessage { path: PathBuf },

    /// The file could not be written.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptError::Read { path, source } => {
                write!(f, "Failed to read transcript at {}: {}", path.display(), source)
            }
            TranscriptError::Parse { path, source } => {
                write!(f, "Failed to parse transcript at {}: {}", path.display(), source)
            }
            TranscriptError::MissingSystemMessage { path } => write!(
                f,
                "Transcript at {} does not start with a system message",
                path.display()
            ),
            TranscriptError::Write { path, source } => {
                write!(f, "Failed to write transcript to {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for TranscriptError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TranscriptError::Read { source, .. } => Some(source),
            TranscriptError::Parse { source, .. } => Some(source),
            TranscriptError::MissingSystemMessage { .. } => None,
            TranscriptError::Write { source, .. } => Some(source),
        }
    }
}

pub struct Conversation<T> {
    transport: T,
    messages: Vec<Message>,
}

impl<T: ChatTransport> Conversation<T> {
    pub fn new(transport: T, system_prompt: Option<&str>) -> Self {
        Self {
            transport,
            messages: vec![Message::system(
                system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT),
            )],
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// Messages to send for `user_text` under `mode`. History is not touched.
    pub fn assemble_context(&self, user_text: &str, mode: ContextMode) -> Vec<Message> {
        let mut prompt = match mode {
            ContextMode::Full => self.messages.clone(),
            ContextMode::SummaryOnly => std::iter::once(&self.messages[0])
                .chain(self.messages[1..].iter().filter(|m| m.is_assistant()))
                .cloned()
                .collect(),
            ContextMode::Minimal => vec![self.messages[0].clone()],
        };
        prompt.push(Message::user(user_text));
        prompt
    }

    /// Send `user_text` with the context `mode` selects, then record the turn.
    pub async fn send(&mut self, user_text: &str, mode: ContextMode) -> String {
        let prompt = self.assemble_context(user_text, mode);
        debug!(mode = %mode, messages = prompt.len(), "sending turn");
        let reply = self.transport.send_conversation(&prompt).await;
        self.record_turn(user_text, Some(&reply));
        reply
    }

    pub async fn send_with_full_context(&mut self, user_text: &str) -> String {
        self.send(user_text, ContextMode::Full).await
    }

    pub async fn send_with_summary_context(&mut self, user_text: &str) -> String {
        self.send(user_text, ContextMode::SummaryOnly).await
    }

    /// Append a user/assistant pair. A missing reply is stored as
    /// `[NO RESPONSE]`; an empty one is stored as-is.
    pub fn record_turn(&mut self, user_text: &str, reply: Option<&str>) {
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::assistant(
            reply.unwrap_or(NO_RESPONSE_SENTINEL),
        ));
    }

    /// Write the whole history as a pretty-printed JSON array.
    pub fn save_transcript(&self, path: impl AsRef<Path>) -> Result<(), TranscriptError> {
        let path = path.as_ref();
        let write_error = |source| TranscriptError::Write {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.messages).map_err(|err| {
            write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })?;

        let mut temp_file = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new_in("."),
        }
        .map_err(write_error)?;
        temp_file.write_all(json.as_bytes()).map_err(write_error)?;
        temp_file.as_file_mut().sync_all().map_err(write_error)?;
        temp_file
            .persist(path)
            .map_err(|err| write_error(err.error))?;

        debug!(path = %path.display(), messages = self.messages.len(), "transcript saved");
        Ok(())
    }

    /// Replace the history with the transcript stored at `path`. On error the
    /// current history is left untouched.
    pub fn load_transcript(&mut self, path: impl AsRef<Path>) -> Result<(), TranscriptError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TranscriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let loaded: Vec<Message> =
            serde_json::from_str(&contents).map_err(|source| TranscriptError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if !loaded.first().is_some_and(|first| first.role.is_system()) {
            return Err(TranscriptError::MissingSystemMessage {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), messages = loaded.len(), "transcript loaded");
        self.messages = loaded;
        Ok(())
    }
}
