//! Parley is a line-oriented chat client for self-hosted LLM servers.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] probes an endpoint for its dialect (Ollama or OpenWebUI) and
//!   carries chat and model-listing requests.
//! - [`core`] owns the conversation history, context assembly, transcripts,
//!   and configuration.
//! - [`commands`] parses slash commands typed at the prompt.
//! - [`ui`] runs the interactive read-send-print loop.
//! - [`utils`] holds the notice reporter and URL helpers.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`], which
//! resolves settings and hands over to [`ui::chat_loop`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
