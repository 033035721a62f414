use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::conversation::ContextMode;

/// Settings read from `config.toml`. Every key is optional; anything left out
/// falls back to the command line or the built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Endpoint root, e.g. `http://localhost:11434/`
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Name shown in front of the input prompt
    pub handle: Option<String>,
    pub temperature: Option<f32>,
    /// Replaces the default system message of new conversations
    pub system_prompt: Option<String>,
    /// How much history travels with each turn: full, summary or minimal
    pub context_mode: Option<ContextMode>,
    pub request_timeout_secs: Option<u64>,
    /// Set to false to disable ANSI colors
    pub color: Option<bool>,
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub fn path_display(path: &Path) -> String {
    if let Some(home) = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()) {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
