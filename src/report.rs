//! Wire types for the analysis backend.
//!
//! The backend returns one large JSON report with ~14 optional top-level
//! sections. Every section is independently optional: absence is legal and
//! simply means that part of the report is not rendered. Field names are the
//! backend's own (Brazilian Portuguese) keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Analysis report
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_ultra_detalhado: Option<AvatarSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drivers_mentais_customizados: Option<Vec<MentalDriver>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analise_concorrencia_detalhada: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escopo: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estrategia_palavras_chave: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metricas_performance_detalhadas: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plano_acao_detalhado: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights_exclusivos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provas_visuais_sugeridas: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sistema_anti_objecao: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_pitch_invisivel: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicoes_futuro_completas: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pesquisa_web_massiva: Option<ResearchSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AnalysisMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvatarSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfil_demografico: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfil_psicografico: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dores_viscerais: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desejos_secretos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objecoes_reais: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentalDriver {
    pub nome: String,
    #[serde(default)]
    pub gatilho_central: String,
    #[serde(default)]
    pub definicao_visceral: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roteiro_ativacao: Option<ActivationScript>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frases_ancoragem: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivationScript {
    #[serde(default)]
    pub pergunta_abertura: String,
    #[serde(default)]
    pub historia_analogia: String,
    #[serde(default)]
    pub comando_acao: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchSection {
    #[serde(default)]
    pub total_queries: u64,
    #[serde(default)]
    pub total_resultados: u64,
    #[serde(default)]
    pub fontes_unicas: u64,
    #[serde(default)]
    pub conteudo_extraido_chars: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queries_executadas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resultados_detalhados: Option<Vec<ResearchSource>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub real_data_sources: u64,
    #[serde(default)]
    pub total_content_analyzed: u64,
}

// =============================================================================
// Backend failure envelope
// =============================================================================

/// Body shape the backend uses when an analysis cannot be produced. Any of
/// the hint fields may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailureEnvelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub required_apis: Option<Vec<String>>,
}

// =============================================================================
// Extractor statistics
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalStats>,
    /// Per-extractor entries, keyed by extractor name.
    #[serde(flatten)]
    pub extractors: BTreeMap<String, ExtractorEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    #[serde(default)]
    pub total_extractions: u64,
    #[serde(default)]
    pub total_successes: u64,
    #[serde(default)]
    pub total_failures: u64,
    #[serde(default)]
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorEntry {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub avg_response_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The stats endpoint answers either `{ stats: {...} }` or
/// `{ success, stats: {...} }` depending on the route; both parse here.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    pub stats: ExtractorStats,
}

// =============================================================================
// Health tiers
// =============================================================================

/// Color tier of the compact extractor status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTier {
    Healthy,
    Degraded,
    Unhealthy,
}

impl StatusTier {
    pub fn from_rate(success_rate: f64) -> Self {
        if success_rate >= 80.0 {
            StatusTier::Healthy
        } else if success_rate >= 50.0 {
            StatusTier::Degraded
        } else {
            StatusTier::Unhealthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Healthy => "healthy",
            StatusTier::Degraded => "degraded",
            StatusTier::Unhealthy => "unhealthy",
        }
    }
}

// =============================================================================
// Diagnostic endpoint payloads
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionTestResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub content_length: u64,
    #[serde(default)]
    pub validation: ContentValidation,
    #[serde(default)]
    pub content_preview: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub extractor_stats: Option<ExtractorStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentValidation {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTestResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stats: Option<ExtractorStats>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_report_parses() {
        let r: AnalysisResult = serde_json::from_str("{}").unwrap();
        assert!(r.avatar_ultra_detalhado.is_none());
        assert!(r.metadata.is_none());
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let r: AnalysisResult =
            serde_json::from_value(json!({"campo_novo": {"x": 1}, "insights_exclusivos": ["a"]}))
                .unwrap();
        assert_eq!(r.insights_exclusivos.unwrap(), vec!["a"]);
    }

    #[test]
    fn stats_envelope_both_shapes() {
        let bare: StatsEnvelope =
            serde_json::from_value(json!({"stats": {"global": {"success_rate": 91.0}}})).unwrap();
        assert!(bare.success.is_none());
        assert_eq!(bare.stats.global.unwrap().success_rate, 91.0);

        let flagged: StatsEnvelope = serde_json::from_value(json!({
            "success": true,
            "stats": {
                "trafilatura": {"available": true, "usage_count": 7, "success_rate": 85.7},
                "global": {"total_extractions": 7, "success_rate": 85.7}
            }
        }))
        .unwrap();
        assert_eq!(flagged.success, Some(true));
        assert_eq!(flagged.stats.extractors["trafilatura"].usage_count, 7);
        assert!(!flagged.stats.extractors.contains_key("global"));
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(StatusTier::from_rate(80.0), StatusTier::Healthy);
        assert_eq!(StatusTier::from_rate(79.9), StatusTier::Degraded);
        // Exactly 50.0 is degraded, not unhealthy.
        assert_eq!(StatusTier::from_rate(50.0), StatusTier::Degraded);
        assert_eq!(StatusTier::from_rate(49.9), StatusTier::Unhealthy);
        assert_eq!(StatusTier::from_rate(0.0), StatusTier::Unhealthy);
    }

    #[test]
    fn driver_optional_subgroups() {
        let d: MentalDriver = serde_json::from_value(json!({
            "nome": "Urgência",
            "gatilho_central": "escassez",
            "definicao_visceral": "medo de ficar para trás"
        }))
        .unwrap();
        assert!(d.roteiro_ativacao.is_none());
        assert!(d.frases_ancoragem.is_none());
    }

    #[test]
    fn failure_envelope_hints() {
        let f: FailureEnvelope = serde_json::from_value(json!({
            "error": "APIs indisponíveis",
            "recommendation": "Configure as chaves de API",
            "required_apis": ["GEMINI_API_KEY", "SERPER_API_KEY"]
        }))
        .unwrap();
        assert_eq!(f.required_apis.unwrap().len(), 2);
    }
}
