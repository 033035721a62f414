//! Slash-command parsing
//!
//! Input lines starting with `/` are matched against the command registry.
//! Parsing is pure: it yields a [`CommandResult`] the chat loop carries out,
//! since most commands need the network or the filesystem.

mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

use std::path::PathBuf;

use chrono::Utc;

use crate::core::conversation::ContextMode;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Blank input, nothing to do.
    Continue,
    Exit,
    ShowHelp,
    ListModels,
    ShowContext,
    SetContext(ContextMode),
    Save(PathBuf),
    Load(PathBuf),
    /// The command was recognized but its arguments were not.
    Invalid(String),
    ProcessAsMessage(String),
}

pub fn process_input(input: &str) -> CommandResult {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return CommandResult::Continue;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => (command.handler)(CommandInvocation {
            input: trimmed,
            args,
        }),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

/// Help text listing every registered command.
pub fn help_text() -> String {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut text = String::from("Commands:\n");
    for command in all_commands() {
        text.push_str(&format!(
            "  {:<width$}  {}\n",
            command.usage,
            command.help,
            width = width
        ));
    }
    text.push_str("Anything else is sent to the model.");
    text
}

pub fn default_transcript_path() -> PathBuf {
    let date = Utc::now().format("%Y-%m-%d");
    PathBuf::from(format!("parley-transcript-{date}.json"))
}

pub(super) fn handle_help(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::ShowHelp
}

pub(super) fn handle_models(_invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::ListModels
}

pub(super) fn handle_exit(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        CommandResult::Exit
    } else {
        CommandResult::ProcessAsMessage(invocation.input.to_string())
    }
}

pub(super) fn handle_context(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::ShowContext;
    }
    match invocation.args.parse::<ContextMode>() {
        Ok(mode) => CommandResult::SetContext(mode),
        Err(err) => CommandResult::Invalid(err),
    }
}

pub(super) fn handle_save(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        CommandResult::Save(default_transcript_path())
    } else {
        CommandResult::Save(PathBuf::from(invocation.args))
    }
}

pub(super) fn handle_load(invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        CommandResult::Invalid("Usage: /load <path>".to_string())
    } else {
        CommandResult::Load(PathBuf::from(invocation.args))
    }
}
