pub mod merge_integration;
pub mod pipeline_integration;
