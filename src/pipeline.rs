//! End-to-end merge pipeline: load both inputs, parse the interchange file,
//! merge it into the PDF and write the result.

use std::path::Path;

use tokio::fs as async_fs;
use tracing::{info, instrument};

use crate::config::MergeConfig;
use crate::error::Result;
use crate::interchange::{InterchangeParser, ParserStatistics};
use crate::merge::{MergeSession, MergeSummary};
use crate::report::MergeReport;
use crate::target::LopdfTarget;
use crate::types::InterchangeDocument;
use crate::utils::logging::{Diagnostic, DiagnosticLog};

/// Everything a run produced besides the output document
#[derive(Debug)]
pub struct MergeOutcome {
    pub parse_statistics: ParserStatistics,
    pub parse_diagnostics: DiagnosticLog,
    pub summary: MergeSummary,
}

impl MergeOutcome {
    /// Parse diagnostics followed by merge diagnostics
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.parse_diagnostics
            .entries()
            .iter()
            .chain(self.summary.diagnostics.entries())
            .cloned()
            .collect()
    }

    pub fn report(&self) -> MergeReport {
        MergeReport::new(self.parse_statistics, &self.summary, self.diagnostics())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergePipeline {
    config: MergeConfig,
}

impl MergePipeline {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Runs every stage against files on disk
    #[instrument(skip(self))]
    pub async fn execute(&self, pdf_path: &Path, xfdf_path: &Path, output_path: &Path) -> Result<MergeOutcome> {
        info!("Stage 0: loading inputs");
        let (pdf_bytes, xfdf_bytes) = tokio::try_join!(async_fs::read(pdf_path), async_fs::read(xfdf_path))?;

        let (output, outcome) = self.merge_bytes(&pdf_bytes, &xfdf_bytes)?;

        info!(bytes = output.len(), "Stage 3: writing output");
        async_fs::write(output_path, output).await?;
        Ok(outcome)
    }

    /// Parse and merge stages on in-memory inputs; returns the serialized PDF
    pub fn merge_bytes(&self, pdf_bytes: &[u8], xfdf_bytes: &[u8]) -> Result<(Vec<u8>, MergeOutcome)> {
        self.config.validate()?;

        info!("Stage 1: parsing interchange data");
        let (document, parse_statistics, parse_diagnostics) = self.stage_parse(xfdf_bytes)?;

        info!("Stage 2: merging annotations");
        let mut target = LopdfTarget::from_bytes(pdf_bytes)?;
        let summary = MergeSession::new(&self.config).merge(&document, &mut target)?;
        let output = target.to_bytes()?;

        Ok((
            output,
            MergeOutcome {
                parse_statistics,
                parse_diagnostics,
                summary,
            },
        ))
    }

    fn stage_parse(&self, xfdf_bytes: &[u8]) -> Result<(InterchangeDocument, ParserStatistics, DiagnosticLog)> {
        let mut parser = InterchangeParser::new();
        let document = parser.parse_bytes(xfdf_bytes)?;
        let statistics = *parser.statistics();
        Ok((document, statistics, parser.into_diagnostics()))
    }
}
