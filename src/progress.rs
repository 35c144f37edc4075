//! Cosmetic progress simulation for the long-running analysis call.
//!
//! The backend exposes no progress channel, so the displayed percentage is
//! driven by wall-clock time alone: one step every tick (3 s by default),
//! capped at the last phase label. The simulated timer must be stopped on
//! every settlement path or it leaks past the request's lifetime.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

use crate::logging::{self, obj, v_num, v_str, Domain, Level};

pub const TOTAL_STEPS: u32 = 13;

pub const START_LABEL: &str = "Iniciando análise ultra-detalhada...";
pub const COMPLETION_LABEL: &str = "🎉 Análise concluída com sucesso!";

/// Fixed phase sequence. Step n (1-based) shows `PHASE_LABELS[n-1]`.
pub const PHASE_LABELS: [&str; 13] = [
    "Validando dados de entrada...",
    "Executando pesquisa web massiva REAL...",
    "Extraindo conteúdo com múltiplos extratores...",
    "Validando qualidade do conteúdo...",
    "Analisando com múltiplas IAs...",
    "Gerando avatar ultra-detalhado...",
    "Criando drivers mentais customizados...",
    "Desenvolvendo provas visuais...",
    "Construindo sistema anti-objeção...",
    "Arquitetando pré-pitch invisível...",
    "Predizendo futuro do mercado...",
    "Consolidando insights exclusivos...",
    "Finalizando análise GIGANTE...",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub step: u32,
    pub total: u32,
    pub percentage: f64,
    pub label: String,
    /// Remaining-time estimate rendered as `M:SS`.
    pub eta: String,
}

/// Pure step counter; all display math lives here so it tests without a
/// runtime.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    step: u32,
    step_estimate_secs: u64,
    label_override: Option<String>,
}

impl ProgressTracker {
    pub fn new(step_estimate_secs: u64) -> Self {
        Self { step: 0, step_estimate_secs, label_override: None }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Advance one step, capped at the last label.
    pub fn advance(&mut self) {
        if self.step < TOTAL_STEPS {
            self.step += 1;
        }
    }

    /// Force the display to 13/13 with the completion label.
    pub fn complete(&mut self) {
        self.step = TOTAL_STEPS;
        self.label_override = Some(COMPLETION_LABEL.to_string());
    }

    pub fn percentage(&self) -> f64 {
        self.step as f64 / TOTAL_STEPS as f64 * 100.0
    }

    pub fn remaining_secs(&self) -> u64 {
        (TOTAL_STEPS.saturating_sub(self.step) as u64) * self.step_estimate_secs
    }

    pub fn label(&self) -> &str {
        if let Some(ref label) = self.label_override {
            return label;
        }
        if self.step == 0 {
            START_LABEL
        } else {
            PHASE_LABELS[(self.step as usize - 1).min(PHASE_LABELS.len() - 1)]
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            step: self.step,
            total: TOTAL_STEPS,
            percentage: self.percentage(),
            label: self.label().to_string(),
            eta: format_eta(self.remaining_secs()),
        }
    }
}

/// Render remaining seconds as `M:SS`.
pub fn format_eta(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Timer task advancing a shared tracker every tick. Dropped handles are
/// aborted; `stop` is the normal settlement path.
pub struct ProgressSimulator {
    tracker: Arc<Mutex<ProgressTracker>>,
    handle: JoinHandle<()>,
}

impl ProgressSimulator {
    pub fn start(tick_secs: u64, step_estimate_secs: u64) -> Self {
        let tracker = Arc::new(Mutex::new(ProgressTracker::new(step_estimate_secs)));
        emit(&tracker.lock().unwrap().snapshot());

        let shared = Arc::clone(&tracker);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(tick_secs.max(1)));
            // interval fires immediately; consume the first tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let snap = {
                    let mut t = shared.lock().unwrap();
                    if t.step() >= TOTAL_STEPS {
                        continue;
                    }
                    t.advance();
                    t.snapshot()
                };
                emit(&snap);
            }
        });

        Self { tracker, handle }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.tracker.lock().unwrap().snapshot()
    }

    /// Jump to 13/13 with the completion label.
    pub fn complete(&self) {
        let snap = {
            let mut t = self.tracker.lock().unwrap();
            t.complete();
            t.snapshot()
        };
        emit(&snap);
    }

    /// Cancel the timer. Idempotent.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn emit(snap: &ProgressSnapshot) {
    logging::log(
        Level::Info,
        Domain::Lifecycle,
        "progress",
        obj(&[
            ("step", v_num(snap.step as f64)),
            ("total", v_num(snap.total as f64)),
            ("percentage", v_num(snap.percentage)),
            ("label", v_str(&snap.label)),
            ("eta", v_str(&snap.eta)),
        ]),
    );
}
