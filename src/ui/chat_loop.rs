//! Interactive chat loop
//!
//! Reads one line at a time, dispatches slash commands, and sends everything
//! else to the model. A request is awaited before the next line is read, so
//! at most one request is ever in flight.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::api::client::{ClientConfig, LlmClient};
use crate::cli::model_list::format_models;
use crate::cli::Settings;
use crate::commands::{help_text, process_input, CommandResult};
use crate::core::conversation::{ContextMode, Conversation};
use crate::ui::prompt::PromptStyle;
use crate::utils::report::{ConsoleReporter, Reporter};

pub struct ChatSession {
    pub conversation: Conversation<LlmClient>,
    pub context_mode: ContextMode,
    pub prompt: PromptStyle,
    pub reporter: Arc<dyn Reporter>,
}

impl ChatSession {
    pub fn banner(&self) -> String {
        let client = self.conversation.transport();
        format!(
            "Interactive chat with model: {} @ {} ({})\nType /exit or press Ctrl+C to quit, /help for commands.\n",
            client.model(),
            client.base_url(),
            client.dialect()
        )
    }
}

pub async fn run_chat(settings: Settings) -> Result<(), Box<dyn Error>> {
    let reporter = ConsoleReporter::shared(settings.color);
    let client_config = ClientConfig::new(settings.base_url.clone(), settings.model.clone())
        .with_temperature(settings.temperature)
        .with_request_timeout(settings.request_timeout);
    let client = LlmClient::connect(client_config, reporter.clone()).await?;

    let mut session = ChatSession {
        conversation: Conversation::new(client, settings.system_prompt.as_deref()),
        context_mode: settings.context_mode,
        prompt: PromptStyle::new(settings.handle.clone(), settings.model.clone(), settings.color),
        reporter,
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    run_chat_loop(&mut session, stdin, &mut stdout).await?;
    Ok(())
}

/// Drive the session until an exit command or end of input.
pub async fn run_chat_loop<R, W>(
    session: &mut ChatSession,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", session.banner())?;

    loop {
        write!(out, "{}", session.prompt.user_prompt())?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match process_input(&line) {
            CommandResult::Continue => {}
            CommandResult::Exit => break,
            CommandResult::ShowHelp => writeln!(out, "{}", help_text())?,
            CommandResult::ListModels => {
                let body = session.conversation.transport().models().await;
                let listing = format_models(Some(&body), session.reporter.as_ref());
                writeln!(out, "{}", listing.render())?;
            }
            CommandResult::ShowContext => {
                writeln!(out, "Context mode: {}", session.context_mode)?;
            }
            CommandResult::SetContext(mode) => {
                session.context_mode = mode;
                writeln!(out, "Context mode set to {mode}.")?;
            }
            CommandResult::Save(path) => match session.conversation.save_transcript(&path) {
                Ok(()) => writeln!(out, "Transcript saved to {}", path.display())?,
                Err(err) => session.reporter.error(&err.to_string()),
            },
            CommandResult::Load(path) => match session.conversation.load_transcript(&path) {
                Ok(()) => writeln!(
                    out,
                    "Loaded {} messages from {}",
                    session.conversation.messages().len(),
                    path.display()
                )?,
                Err(err) => session.reporter.error(&err.to_string()),
            },
            CommandResult::Invalid(message) => session.reporter.warning(&message),
            CommandResult::ProcessAsMessage(text) => {
                debug!(mode = %session.context_mode, "user turn");
                let reply = session
                    .conversation
                    .send(&text, session.context_mode)
                    .await;
                if reply.trim().is_empty() {
                    writeln!(out, "[WARN] No response received.\n")?;
                } else {
                    writeln!(out, "{}{}\n", session.prompt.assistant_prefix(), reply)?;
                }
            }
        }
    }

    writeln!(out, "👋 Conversation ended.")?;
    out.flush()
}

#[cfg(test)]
mod tests;
