use crossterm::style::Stylize;

/// Speaker labels for the input prompt and assistant replies.
#[derive(Debug, Clone)]
pub struct PromptStyle {
    handle: String,
    model: String,
    color: bool,
}

impl PromptStyle {
    pub fn new(handle: impl Into<String>, model: impl Into<String>, color: bool) -> Self {
        Self {
            handle: handle.into(),
            model: model.into(),
            color,
        }
    }

    pub fn user_prompt(&self) -> String {
        let handle = if self.color {
            self.handle.as_str().green().to_string()
        } else {
            self.handle.clone()
        };
        format!("🧠 {handle} > ")
    }

    pub fn assistant_prefix(&self) -> String {
        let model = if self.color {
            self.model.as_str().cyan().to_string()
        } else {
            self.model.clone()
        };
        format!("🤖 {model} > ")
    }
}

/// Color stays on unless the flag, the config file or a non-empty `NO_COLOR`
/// turns it off.
pub fn color_enabled(no_color_flag: bool, config_color: Option<bool>, no_color_env: Option<&str>) -> bool {
    if no_color_flag {
        return false;
    }
    if no_color_env.is_some_and(|value| !value.is_empty()) {
        return false;
    }
    config_color.unwrap_or(true)
}
