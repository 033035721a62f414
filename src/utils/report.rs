//! User-facing notices
//!
//! Components never print directly. They receive a [`Reporter`] and send
//! informational, warning and error notices through it, so the REPL decides
//! how they are shown and tests can capture them.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;
use tracing::debug;

/// Severity for notices shown to the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Hints and status lines.
    Info,

    /// Something degraded but the session continues.
    Warning,

    /// A request or file operation failed.
    Error,
}

impl NoticeKind {
    pub fn tag(self) -> &'static str {
        match self {
            NoticeKind::Info => "[INFO]",
            NoticeKind::Warning => "[WARNING]",
            NoticeKind::Error => "[ERROR]",
        }
    }
}

pub trait Reporter: Send + Sync {
    fn report(&self, kind: NoticeKind, message: &str);

    fn info(&self, message: &str) {
        self.report(NoticeKind::Info, message);
    }

    fn warning(&self, message: &str) {
        self.report(NoticeKind::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(NoticeKind::Error, message);
    }
}

/// Prints tagged notices to stdout, interleaved with the chat itself.
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn shared(color: bool) -> Arc<dyn Reporter> {
        Arc::new(Self::new(color))
    }

    fn render(&self, kind: NoticeKind, message: &str) -> String {
        if !self.color {
            return format!("{} {}", kind.tag(), message);
        }
        let tag = match kind {
            NoticeKind::Info => kind.tag().dark_grey(),
            NoticeKind::Warning => kind.tag().yellow(),
            NoticeKind::Error => kind.tag().red(),
        };
        format!("{tag} {message}")
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, kind: NoticeKind, message: &str) {
        debug!(?kind, notice = message, "reported");
        let line = self.render(kind, message);
        let mut stdout = io::stdout().lock();
        // A closed stdout leaves nowhere to report to.
        let _ = writeln!(stdout, "{line}");
    }
}

/// Collects notices in memory.
#[derive(Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(NoticeKind, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(NoticeKind, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn messages_of(&self, kind: NoticeKind) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(entry_kind, _)| *entry_kind == kind)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((kind, message.to_string()));
        }
    }
}
