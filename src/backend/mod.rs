use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::report::{
    AnalysisResult, ExtractionTestResult, ResetResult, SearchTestResult, StatsEnvelope,
};
use crate::state::AnalysisRequest;

pub mod http;

/// The six backend operations the workflow consumes. Implemented over HTTP
/// in production; test doubles implement it directly.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Submit one analysis request and wait for the full report.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;

    async fn extractor_stats(&self) -> Result<StatsEnvelope, AnalysisError>;

    async fn test_extraction(&self, url: &str) -> Result<ExtractionTestResult, AnalysisError>;

    async fn test_search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<SearchTestResult, AnalysisError>;

    async fn reset_extractors(&self) -> Result<ResetResult, AnalysisError>;

    /// Render the full report to PDF, returning the binary stream.
    async fn generate_pdf(&self, result: &AnalysisResult) -> Result<Vec<u8>, AnalysisError>;
}
