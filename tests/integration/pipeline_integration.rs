use xfdf_merge::{Error, LopdfTarget, MergeConfig, MergePipeline};

use crate::fixtures::TestFixtures;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_pipeline_execution() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("input.pdf");
        let xfdf_path = dir.path().join("review.xfdf");
        let output_path = dir.path().join("output.pdf");
        tokio::fs::write(&pdf_path, TestFixtures::blank_pdf(2)).await.unwrap();
        tokio::fs::write(&xfdf_path, TestFixtures::review_xfdf()).await.unwrap();

        let pipeline = MergePipeline::new(MergeConfig::default());
        let outcome = pipeline.execute(&pdf_path, &xfdf_path, &output_path).await.unwrap();

        assert_eq!(outcome.parse_statistics.annotations_parsed, 5);
        assert_eq!(outcome.summary.statistics.records_created, 5);
        assert_eq!(outcome.diagnostics().len(), 1);

        let written = tokio::fs::read(&output_path).await.unwrap();
        let merged = LopdfTarget::from_bytes(&written).unwrap();
        assert_eq!(merged.annotation_refs(1).unwrap().len(), 4);

        let report = outcome.report();
        assert_eq!(report.records_by_subtype.get("Caret"), Some(&1));
        assert_eq!(report.metadata.summary.warning_count, 1);
    }

    #[tokio::test]
    async fn test_pipeline_page_shift_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("input.pdf");
        let xfdf_path = dir.path().join("review.xfdf");
        let output_path = dir.path().join("output.pdf");
        tokio::fs::write(&pdf_path, TestFixtures::blank_pdf(2)).await.unwrap();
        tokio::fs::write(&xfdf_path, TestFixtures::review_xfdf()).await.unwrap();

        let config = MergeConfig {
            page_shift: 5,
            ..MergeConfig::default()
        };
        let result = MergePipeline::new(config).execute(&pdf_path, &xfdf_path, &output_path).await;
        assert!(matches!(result, Err(Error::TargetError(_))));
        assert!(!output_path.exists());
    }

    #[tokio::test]
    async fn test_pipeline_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        let result = MergePipeline::default()
            .execute(&missing, &missing, &dir.path().join("out.pdf"))
            .await;
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_merge_bytes_rejects_invalid_config() {
        let config = MergeConfig {
            scale: 0.0,
            ..MergeConfig::default()
        };
        let result = MergePipeline::new(config).merge_bytes(&TestFixtures::blank_pdf(1), b"<xfdf/>");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
