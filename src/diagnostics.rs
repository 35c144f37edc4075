//! Ad-hoc diagnostic actions against the extraction subsystem: test a URL,
//! test a search query, inspect or reset extractor statistics. Independent
//! of the analysis lifecycle; failures here are surfaced and contained.

use std::sync::{Arc, Mutex};

use url::Url;

use crate::backend::Backend;
use crate::error::AnalysisError;
use crate::logging::{self, obj, v_bool, v_num, v_str, Domain, Level};
use crate::notify::Notifier;
use crate::report::{ExtractorStats, StatusTier};

/// Default result count for search tests.
pub const SEARCH_MAX_RESULTS: u32 = 5;

/// Shaped success view of a content-extraction test.
#[derive(Debug, Clone)]
pub struct ContentPreview {
    pub url: String,
    pub score: f64,
    pub valid: bool,
    pub content_length: u64,
    pub preview: String,
}

/// One line of the stats overview.
#[derive(Debug, Clone)]
pub struct ExtractorLine {
    pub name: String,
    pub available: bool,
    pub usage_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub success_rate: f64,
    pub tier: StatusTier,
    pub avg_response_time: f64,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatsOverview {
    pub total_extractions: u64,
    pub total_successes: u64,
    pub total_failures: u64,
    pub success_rate: f64,
    pub tier: StatusTier,
    pub extractors: Vec<ExtractorLine>,
}

pub struct Diagnostics {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    /// Last stats seen from any endpoint; overwritten wholesale.
    stats: Mutex<Option<ExtractorStats>>,
}

impl Diagnostics {
    pub fn new(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier, stats: Mutex::new(None) }
    }

    pub fn cached_stats(&self) -> Option<ExtractorStats> {
        self.stats.lock().unwrap().clone()
    }

    fn cache(&self, stats: ExtractorStats) {
        *self.stats.lock().unwrap() = Some(stats);
    }

    /// Compact status line for the cached stats, tiered by success rate.
    pub fn status_line(&self) -> Option<(StatusTier, String)> {
        let stats = self.cached_stats()?;
        let global = stats.global?;
        Some((
            StatusTier::from_rate(global.success_rate),
            format!(
                "Extratores: {:.1}% sucesso ({} extrações)",
                global.success_rate, global.total_extractions
            ),
        ))
    }

    /// Initial best-effort load; failures are logged, not surfaced.
    pub async fn load_stats(&self) {
        match self.backend.extractor_stats().await {
            Ok(envelope) => self.cache(envelope.stats),
            Err(err) => logging::log(
                Level::Error,
                Domain::Diag,
                "stats_load_failed",
                obj(&[("error", v_str(&err.to_string()))]),
            ),
        }
    }

    pub async fn test_extraction(&self, url: &str) -> Result<ContentPreview, AnalysisError> {
        if Url::parse(url).is_err() {
            let msg = format!("URL inválida: {}", url);
            self.notifier.error(&msg);
            return Err(AnalysisError::Validation(msg));
        }

        self.notifier.info("Testando extração de conteúdo...");
        let result = match self.backend.test_extraction(url).await {
            Ok(result) => result,
            Err(err) => {
                self.notifier.error("Erro no teste de extração");
                return Err(err);
            }
        };

        if let Some(stats) = result.extractor_stats.clone() {
            self.cache(stats);
        }

        if !result.success {
            let error = result.error.unwrap_or_else(|| "Erro desconhecido".to_string());
            let msg = format!("Falha na extração: {}", error);
            self.notifier.error(&msg);
            return Err(AnalysisError::backend(error));
        }

        self.notifier.success(&format!(
            "Extração bem-sucedida! {} caracteres extraídos. Qualidade: {}%",
            result.content_length, result.validation.score
        ));
        logging::log(
            Level::Info,
            Domain::Diag,
            "extraction_test",
            obj(&[
                ("url", v_str(&result.url)),
                ("content_length", v_num(result.content_length as f64)),
                ("valid", v_bool(result.validation.valid)),
            ]),
        );

        Ok(ContentPreview {
            url: result.url,
            score: result.validation.score,
            valid: result.validation.valid,
            content_length: result.content_length,
            preview: result.content_preview,
        })
    }

    pub async fn test_search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<u64, AnalysisError> {
        self.notifier.info("Testando sistema de busca...");
        let result = match self.backend.test_search(query, max_results).await {
            Ok(result) => result,
            Err(err) => {
                self.notifier.error("Erro no teste de busca");
                return Err(err);
            }
        };

        if !result.success {
            let error = result.error.unwrap_or_else(|| "Erro desconhecido".to_string());
            self.notifier.error(&format!("Falha na busca: {}", error));
            return Err(AnalysisError::backend(error));
        }

        self.notifier
            .success(&format!("Busca bem-sucedida! {} resultados encontrados", result.results_count));
        Ok(result.results_count)
    }

    /// Fetch fresh stats and shape them for display.
    pub async fn stats_overview(&self) -> Result<StatsOverview, AnalysisError> {
        let envelope = match self.backend.extractor_stats().await {
            Ok(envelope) => envelope,
            Err(err) => {
                self.notifier.error("Erro ao obter estatísticas dos extratores");
                return Err(err);
            }
        };
        self.cache(envelope.stats.clone());
        Ok(shape_overview(&envelope.stats))
    }

    pub async fn reset(&self) -> Result<(), AnalysisError> {
        let result = match self.backend.reset_extractors().await {
            Ok(result) => result,
            Err(err) => {
                self.notifier.error("Erro ao resetar extratores");
                return Err(err);
            }
        };

        if !result.success {
            let error = result.error.unwrap_or_else(|| "Erro desconhecido".to_string());
            self.notifier.error(&format!("Erro ao resetar: {}", error));
            return Err(AnalysisError::backend(error));
        }

        if let Some(stats) = result.stats {
            self.cache(stats);
        }
        self.notifier
            .success("Estatísticas dos extratores resetadas com sucesso!");
        Ok(())
    }
}

fn shape_overview(stats: &ExtractorStats) -> StatsOverview {
    let global = stats.global.clone().unwrap_or_default();
    let extractors = stats
        .extractors
        .iter()
        .map(|(name, entry)| ExtractorLine {
            name: name.clone(),
            available: entry.available,
            usage_count: entry.usage_count,
            success_count: entry.success_count,
            error_count: entry.error_count,
            success_rate: entry.success_rate,
            tier: StatusTier::from_rate(entry.success_rate),
            avg_response_time: entry.avg_response_time,
            reason: entry.reason.clone(),
        })
        .collect();
    StatsOverview {
        total_extractions: global.total_extractions,
        total_successes: global.total_successes,
        total_failures: global.total_failures,
        success_rate: global.success_rate,
        tier: StatusTier::from_rate(global.success_rate),
        extractors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ExtractorEntry, GlobalStats};

    fn stats_with_rate(rate: f64) -> ExtractorStats {
        ExtractorStats {
            global: Some(GlobalStats {
                total_extractions: 10,
                total_successes: 5,
                total_failures: 5,
                success_rate: rate,
            }),
            extractors: Default::default(),
        }
    }

    #[test]
    fn overview_tiers_per_extractor() {
        let mut stats = stats_with_rate(90.0);
        stats.extractors.insert(
            "trafilatura".to_string(),
            ExtractorEntry { available: true, success_rate: 50.0, ..Default::default() },
        );
        stats.extractors.insert(
            "readability".to_string(),
            ExtractorEntry {
                available: false,
                reason: Some("módulo ausente".to_string()),
                ..Default::default()
            },
        );
        let overview = shape_overview(&stats);
        assert_eq!(overview.tier, StatusTier::Healthy);
        let trafilatura =
            overview.extractors.iter().find(|e| e.name == "trafilatura").unwrap();
        // exactly 50.0 is degraded, not unhealthy
        assert_eq!(trafilatura.tier, StatusTier::Degraded);
        let readability =
            overview.extractors.iter().find(|e| e.name == "readability").unwrap();
        assert!(!readability.available);
        assert_eq!(readability.reason.as_deref(), Some("módulo ausente"));
    }
}
