//! Logging utilities: the diagnostic channel for recoverable conditions and
//! tracing subscriber setup for the binary.

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogLevel {
    Info,
    Warn,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
        };
        write!(f, "{}", level_str)
    }
}

/// Recoverable conditions met while parsing or merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    UnsupportedAttribute,
    UnsupportedAnnotation,
    MissingFileReference,
    UnnamedField,
    EmptyFieldValue,
    UnresolvedReply,
    InvalidOpacity,
}

impl DiagnosticKind {
    pub fn level(&self) -> LogLevel {
        match self {
            DiagnosticKind::MissingFileReference
            | DiagnosticKind::UnnamedField
            | DiagnosticKind::EmptyFieldValue => LogLevel::Info,
            DiagnosticKind::UnsupportedAttribute
            | DiagnosticKind::UnsupportedAnnotation
            | DiagnosticKind::UnresolvedReply
            | DiagnosticKind::InvalidOpacity => LogLevel::Warn,
        }
    }
}

/// A single diagnostic entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub level: LogLevel,
    /// Attribute, element or annotation name the entry is about
    pub subject: String,
    pub message: String,
}

/// Collects diagnostics and forwards each one to tracing as it arrives
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) {
        let entry = Diagnostic {
            kind,
            level: kind.level(),
            subject: subject.into(),
            message: message.into(),
        };

        match entry.level {
            LogLevel::Info => info!(kind = ?entry.kind, subject = %entry.subject, "{}", entry.message),
            LogLevel::Warn => warn!(kind = ?entry.kind, subject = %entry.subject, "{}", entry.message),
        }

        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves every entry of `other` to the end of this log without re-emitting it
    pub fn append(&mut self, other: &mut DiagnosticLog) {
        self.entries.append(&mut other.entries);
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xfdf_merge={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| Error::ConfigError(format!("Failed to set tracing subscriber: {}", e)))
}
