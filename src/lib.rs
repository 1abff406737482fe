//! XFDF interchange parsing and annotation merging.
//!
//! Reads an XFDF document into a typed model, then merges its annotations
//! into a target PDF. Reply chains are resolved in a single pass even when
//! a reply appears before the annotation it answers.

// Configuration and pipeline
pub mod config;
pub mod error;
pub mod pipeline;

// Object model
pub mod types;

// Stage 1: XML tree and interchange parsing
pub mod xml;
pub mod interchange;

// Stage 2: Merge engine and target documents
pub mod merge;
pub mod target;

// Stage 3: Reporting
pub mod report;

// Shared utilities
pub mod utils;

// Re-exports for crate consumers
pub use config::{MergeConfig, TransformSpec};
pub use error::{Error, Result};
pub use interchange::{AttributeTable, InterchangeParser, ParserStatistics};
pub use merge::{merge, AnnotationRecord, AppearanceCachePolicy, MergeSession, MergeStatistics, MergeSummary};
pub use pipeline::{MergeOutcome, MergePipeline};
pub use report::{MergeReport, ReportFormat};
pub use target::{DocumentAdapter, LopdfTarget, MemoryTarget, PageHandle};
pub use types::{AffineTransform, Annotation, AnnotationKind, InterchangeDocument};
pub use utils::{init_logging, Diagnostic, DiagnosticKind, DiagnosticLog};
