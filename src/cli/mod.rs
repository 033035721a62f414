//! Command-line interface parsing and startup
//!
//! Flags are merged with the config file and the built-in defaults into
//! [`Settings`], which the chat loop runs with.

pub mod model_list;

use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_HANDLE, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::core::conversation::ContextMode;
use crate::ui::chat_loop::run_chat;
use crate::ui::prompt::color_enabled;

const DEFAULT_LOG_FILTER: &str = "parley=warn";

#[derive(Parser, Debug, Default)]
#[command(name = "parley", version)]
#[command(about = "Interactive terminal chat with an Ollama or OpenWebUI endpoint")]
#[command(
    long_about = "Parley is a line-oriented chat client for self-hosted LLM servers. \
It probes the base URL to find out whether it talks to Ollama or OpenWebUI and then \
keeps a conversation going until you leave.\n\n\
Environment Variables:\n\
  LLM_API_TOKEN     Bearer token sent to OpenWebUI endpoints\n\
  NO_COLOR          Disable colored output when set\n\
  RUST_LOG          Diagnostic log filter (defaults to parley=warn)\n\n\
Commands:\n\
  /help             List the chat commands\n\
  /models           List the models the endpoint offers\n\
  /exit             End the conversation (also /bye and /quit)"
)]
pub struct Args {
    /// Model to chat with
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Name shown in front of your input
    #[arg(long, value_name = "NAME")]
    pub handle: Option<String>,

    /// Endpoint root, e.g. http://localhost:11434/
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// System message for the new conversation
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// How much history is sent with each message: full, summary or minimal
    #[arg(long, value_name = "MODE")]
    pub context: Option<ContextMode>,

    /// Sampling temperature
    #[arg(long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Request timeout in seconds (0 waits forever)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Read settings from this file instead of the default config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Drop arguments `Args` does not know so that stray flags never abort
/// startup. Values of known flags are kept; inline values on switches are
/// stripped.
pub fn retain_known_args<I>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let command = Args::command();
    let mut argv = argv.into_iter();
    let mut kept: Vec<OsString> = argv.next().into_iter().collect();

    while let Some(raw) = argv.next() {
        let text = raw.to_string_lossy().into_owned();
        if matches!(text.as_str(), "-h" | "--help" | "-V" | "--version") {
            kept.push(raw);
            continue;
        }

        let Some(flag) = text.strip_prefix("--").filter(|flag| !flag.is_empty()) else {
            debug!(argument = %text, "ignoring unrecognized argument");
            continue;
        };
        let (name, inline_value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        let Some(known) = command
            .get_arguments()
            .find(|arg| arg.get_long() == Some(name))
        else {
            debug!(flag = %name, "ignoring unrecognized flag");
            continue;
        };

        if !known.get_action().takes_values() {
            kept.push(OsString::from(format!("--{name}")));
            continue;
        }
        kept.push(raw);
        if inline_value.is_none() {
            kept.extend(argv.next());
        }
    }

    kept
}

/// Everything the chat session needs, after precedence is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub model: String,
    pub handle: String,
    pub temperature: f32,
    /// `None` keeps the built-in system message.
    pub system_prompt: Option<String>,
    pub context_mode: ContextMode,
    pub request_timeout: Option<Duration>,
    pub color: bool,
}

impl Settings {
    /// Command line first, then the config file, then built-in defaults.
    /// Blank strings count as unset.
    pub fn resolve(args: &Args, config: &Config, no_color_env: Option<&str>) -> Settings {
        let timeout = match args.timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => config.request_timeout(),
        };

        Settings {
            base_url: pick(&args.base_url, &config.base_url, DEFAULT_BASE_URL),
            model: pick(&args.model, &config.model, DEFAULT_MODEL),
            handle: pick(&args.handle, &config.handle, DEFAULT_HANDLE),
            temperature: args
                .temperature
                .or(config.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            system_prompt: non_blank(&args.system_prompt)
                .or_else(|| non_blank(&config.system_prompt))
                .map(str::to_string),
            context_mode: args
                .context
                .or(config.context_mode)
                .unwrap_or(ContextMode::Full),
            request_timeout: timeout,
            color: color_enabled(args.no_color, config.color, no_color_env),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}

fn pick(cli: &Option<String>, config: &Option<String>, default: &str) -> String {
    non_blank(cli)
        .or_else(|| non_blank(config))
        .unwrap_or(default)
        .to_string()
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse_from(retain_known_args(std::env::args_os()));

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let no_color = std::env::var("NO_COLOR").ok();
    let settings = Settings::resolve(&args, &config, no_color.as_deref());
    debug!(?settings, "starting chat");

    run_chat(settings).await
}
