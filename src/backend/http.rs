use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::backend::Backend;
use crate::error::AnalysisError;
use crate::report::{
    AnalysisResult, ExtractionTestResult, FailureEnvelope, ResetResult, SearchTestResult,
    StatsEnvelope,
};
use crate::state::{AnalysisRequest, Config};

/// Flask-style `/api/*` backend over HTTP+JSON.
///
/// No client-side timeout is set: the analysis call can legitimately run for
/// minutes, and the contract is to wait until the backend settles.
pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            base: cfg.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base, path)
    }

    fn backend_error(status: reqwest::StatusCode, body: &str) -> AnalysisError {
        let envelope: FailureEnvelope = serde_json::from_str(body).unwrap_or_default();
        AnalysisError::Backend {
            message: envelope
                .error
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            recommendation: envelope.recommendation,
            required_apis: envelope.required_apis.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let resp = self
            .client
            .post(self.url("analyze"))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::backend(format!("resposta inválida: {}", e)))?;

        // A 2xx body carrying an error field is still a failed analysis.
        if value.get("error").map(|e| !e.is_null()).unwrap_or(false) {
            let envelope: FailureEnvelope = serde_json::from_value(value).unwrap_or_default();
            return Err(AnalysisError::Backend {
                message: envelope.error.unwrap_or_else(|| "Erro desconhecido".to_string()),
                recommendation: envelope.recommendation,
                required_apis: envelope.required_apis.unwrap_or_default(),
            });
        }

        serde_json::from_value(value)
            .map_err(|e| AnalysisError::backend(format!("resposta inválida: {}", e)))
    }

    async fn extractor_stats(&self) -> Result<StatsEnvelope, AnalysisError> {
        let resp = self.client.get(self.url("extractor_stats")).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| AnalysisError::backend(format!("stats inválidas: {}", e)))
    }

    async fn test_extraction(&self, url: &str) -> Result<ExtractionTestResult, AnalysisError> {
        let resp = self
            .client
            .post(self.url("test_extraction"))
            .json(&json!({ "url": url }))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| AnalysisError::backend(format!("resposta inválida: {}", e)))
    }

    async fn test_search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<SearchTestResult, AnalysisError> {
        let resp = self
            .client
            .post(self.url("test_search"))
            .json(&json!({ "query": query, "max_results": max_results }))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| AnalysisError::backend(format!("resposta inválida: {}", e)))
    }

    async fn reset_extractors(&self) -> Result<ResetResult, AnalysisError> {
        let resp = self
            .client
            .post(self.url("reset_extractors"))
            .json(&json!({}))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Self::backend_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| AnalysisError::backend(format!("resposta inválida: {}", e)))
    }

    async fn generate_pdf(&self, result: &AnalysisResult) -> Result<Vec<u8>, AnalysisError> {
        let resp = self
            .client
            .post(self.url("generate_pdf"))
            .json(result)
            .send()
            .await
            .map_err(|e| AnalysisError::Export(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AnalysisError::Export(format!("HTTP {}", resp.status().as_u16())));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AnalysisError::Export(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
