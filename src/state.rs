use std::collections::BTreeMap;

use rand::Rng;

use crate::report::AnalysisResult;

#[derive(Clone)]
pub struct Config {
    pub api_base: String,
    /// Session identifier attached to every analysis request. Generated when
    /// not supplied via env.
    pub session_id: String,
    /// Cadence of the cosmetic progress simulator, in seconds.
    pub progress_tick_secs: u64,
    /// Per-step remaining-time estimate shown to the user, in seconds.
    pub step_estimate_secs: u64,
    /// Pause between completing the progress display and showing results,
    /// in milliseconds.
    pub grace_delay_ms: u64,
    pub pdf_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("API_BASE").unwrap_or_else(|_| "http://localhost:5000".to_string()),
            session_id: std::env::var("SESSION_ID").unwrap_or_else(|_| generate_session_id()),
            progress_tick_secs: std::env::var("PROGRESS_TICK_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(3),
            step_estimate_secs: std::env::var("STEP_ESTIMATE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(15),
            grace_delay_ms: std::env::var("GRACE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(1000),
            pdf_dir: std::env::var("PDF_DIR").unwrap_or_else(|_| ".".to_string()),
        }
    }
}

pub fn now_ts() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

/// Opaque per-instance session identifier: epoch millis plus a short random
/// alphanumeric suffix.
pub fn generate_session_id() -> String {
    const ALPHANUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHANUM[rng.gen_range(0..ALPHANUM.len())] as char)
        .collect();
    format!("session_{}_{}", crate::logging::ts_epoch_ms(), suffix)
}

/// Form payload for one submission. Built fresh each time, never persisted.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    pub session_id: String,
}

impl AnalysisRequest {
    pub fn segmento(&self) -> Option<&str> {
        self.fields.get("segmento").map(|s| s.as_str()).filter(|s| !s.trim().is_empty())
    }
}

/// Controller-side view of the lifecycle. One analysis in flight at most.
#[derive(Debug)]
pub struct AnalysisState {
    pub is_analyzing: bool,
    pub current_step: u32,
    pub total_steps: u32,
    pub last_result: Option<AnalysisResult>,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self {
            is_analyzing: false,
            current_step: 0,
            total_steps: crate::progress::TOTAL_STEPS,
            last_result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_format() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<u64>().is_ok(), "middle part is epoch ms: {}", id);
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn segmento_rejects_blank() {
        let mut req = AnalysisRequest::default();
        assert!(req.segmento().is_none());
        req.fields.insert("segmento".to_string(), "   ".to_string());
        assert!(req.segmento().is_none());
        req.fields.insert("segmento".to_string(), "fitness".to_string());
        assert_eq!(req.segmento(), Some("fitness"));
    }

    #[test]
    fn request_serializes_flat() {
        let mut req = AnalysisRequest::default();
        req.fields.insert("segmento".to_string(), "fitness".to_string());
        req.session_id = "session_1_abcdefghi".to_string();
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["segmento"], "fitness");
        assert_eq!(v["session_id"], "session_1_abcdefghi");
        assert!(v.get("attachments").is_none());
    }
}
