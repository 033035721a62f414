use std::fmt;

use crate::utils::url::endpoint_url;

/// The request/response convention an endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiDialect {
    Ollama,
    OpenWebUi,
    Unknown,
}

impl ApiDialect {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiDialect::Ollama => "ollama",
            ApiDialect::OpenWebUi => "openwebui",
            ApiDialect::Unknown => "unknown",
        }
    }

    /// Paths of the model-listing and chat endpoints, relative to the base URL.
    pub fn paths(self) -> (&'static str, &'static str) {
        match self {
            ApiDialect::Ollama => ("api/tags", "api/chat"),
            ApiDialect::OpenWebUi | ApiDialect::Unknown => {
                ("api/models", "api/chat/completions")
            }
        }
    }

    pub fn endpoints(self, base_url: &str) -> EndpointMap {
        let (models, chat) = self.paths();
        EndpointMap {
            models: endpoint_url(base_url, models),
            chat: endpoint_url(base_url, chat),
        }
    }
}

impl fmt::Display for ApiDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMap {
    pub models: String,
    pub chat: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_endpoints() {
        let endpoints = ApiDialect::Ollama.endpoints("http://localhost:11434/");
        assert_eq!(endpoints.models, "http://localhost:11434/api/tags");
        assert_eq!(endpoints.chat, "http://localhost:11434/api/chat");
    }

    #[test]
    fn unknown_shares_the_openwebui_layout() {
        let base = "https://chat.example.com";
        assert_eq!(
            ApiDialect::Unknown.endpoints(base),
            ApiDialect::OpenWebUi.endpoints(base)
        );
        assert_eq!(
            ApiDialect::Unknown.endpoints(base).chat,
            "https://chat.example.com/api/chat/completions"
        );
    }

    #[test]
    fn display_uses_wire_names() {
        assert_eq!(ApiDialect::OpenWebUi.to_string(), "openwebui");
    }
}
