//! Built-in defaults used when neither the command line nor the config file
//! provide a value

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/";

pub const DEFAULT_MODEL: &str = "gemma3:1b";

pub const DEFAULT_HANDLE: &str = "You";

pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// System message a new conversation starts with.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable AI assistant. \
Provide clear, concise, and accurate responses. When appropriate, ask clarifying questions \
or provide examples.";

/// System message for one-shot prompts sent outside a conversation.
pub const DEFAULT_PROMPT_SYSTEM_MESSAGE: &str =
    "You are a senior application security engineer.";

/// Stored in place of an assistant reply that never arrived.
pub const NO_RESPONSE_SENTINEL: &str = "[NO RESPONSE]";
