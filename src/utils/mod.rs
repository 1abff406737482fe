//! Utility Module
//!
//! Conversion helpers for interchange attribute values and the logging /
//! diagnostics plumbing shared by the parser and the merge engine.

pub mod conversion;
pub mod logging;

pub use self::{
    conversion::*,
    logging::{init_logging, Diagnostic, DiagnosticKind, DiagnosticLog, LogLevel},
};
