//! Merge report: what was parsed, what was written, and every diagnostic

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tokio::fs as async_fs;

use crate::error::Result;
use crate::interchange::ParserStatistics;
use crate::merge::{MergeStatistics, MergeSummary};
use crate::utils::logging::{Diagnostic, LogLevel};

/// Report output formats, picked from the report path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    PlainText,
    Json,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
            _ => ReportFormat::PlainText,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub info_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generation_time: String,
    pub tool_version: String,
    pub total_entries: usize,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub metadata: ReportMetadata,
    pub parse: ParserStatistics,
    pub merge: MergeStatistics,
    /// Records written, keyed by PDF subtype
    pub records_by_subtype: BTreeMap<String, usize>,
    pub entries: Vec<Diagnostic>,
}

impl MergeReport {
    /// `diagnostics` covers both the parse and the merge, in that order
    pub fn new(parse: ParserStatistics, summary: &MergeSummary, diagnostics: Vec<Diagnostic>) -> Self {
        let mut records_by_subtype = BTreeMap::new();
        for record in &summary.records {
            *records_by_subtype
                .entry(record.kind.pdf_subtype().to_string())
                .or_insert(0) += 1;
        }

        let mut counts = ReportSummary::default();
        for entry in &diagnostics {
            match entry.level {
                LogLevel::Info => counts.info_count += 1,
                LogLevel::Warn => counts.warning_count += 1,
            }
        }

        Self {
            metadata: ReportMetadata {
                generation_time: chrono::Utc::now().to_rfc3339(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                total_entries: diagnostics.len(),
                summary: counts,
            },
            parse,
            merge: summary.statistics.clone(),
            records_by_subtype,
            entries: diagnostics,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self) -> String {
        let mut content = String::new();
        content.push_str("XFDF Merge Report\n");
        content.push_str("=================\n\n");
        content.push_str(&format!("Generated: {}\n", self.metadata.generation_time));
        content.push_str(&format!("Version: {}\n\n", self.metadata.tool_version));

        content.push_str(&format!(
            "Parsed: {} annotations, {} fields ({} annotations skipped, {} attributes dropped)\n",
            self.parse.annotations_parsed,
            self.parse.fields_parsed,
            self.parse.annotations_skipped,
            self.parse.attributes_dropped
        ));
        content.push_str(&format!(
            "Merged: {} records, {} popups, {} replies linked, {} unresolved, {} unsupported\n",
            self.merge.records_created,
            self.merge.popups_created,
            self.merge.replies_linked,
            self.merge.replies_unresolved,
            self.merge.unsupported_skipped
        ));
        for (subtype, count) in &self.records_by_subtype {
            content.push_str(&format!("- {}: {}\n", subtype, count));
        }

        content.push_str(&format!(
            "\nDiagnostics: {} info, {} warnings\n",
            self.metadata.summary.info_count, self.metadata.summary.warning_count
        ));
        for entry in &self.entries {
            content.push_str(&format!(
                "[{}] {:?} {}: {}\n",
                entry.level, entry.kind, entry.subject, entry.message
            ));
        }
        content
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = match ReportFormat::from_path(path) {
            ReportFormat::Json => self.to_json()?,
            ReportFormat::PlainText => self.to_text(),
        };
        async_fs::write(path, content).await?;
        Ok(())
    }
}
