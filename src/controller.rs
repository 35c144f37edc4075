//! Analysis submission lifecycle.
//!
//! `Idle → Submitting → InFlight → {Succeeded | Failed} → Idle`, with at
//! most one analysis in flight per controller. The progress display is a
//! cosmetic simulation (the backend has no progress channel) and its timer
//! is stopped on every settlement path.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::{sleep, Duration};

use crate::backend::Backend;
use crate::error::AnalysisError;
use crate::logging::{self, obj, v_str, Domain, Level};
use crate::notify::Notifier;
use crate::progress::{ProgressSimulator, ProgressSnapshot};
use crate::render::{self, html::MountSet};
use crate::report::AnalysisResult;
use crate::state::{AnalysisRequest, AnalysisState, Config};

/// Source of uploaded attachment references. The file-upload widget in the
/// original deployment; injected, never read from globals.
pub trait AttachmentSource: Send + Sync {
    fn uploaded_files(&self) -> Vec<String>;
}

/// No upload widget present.
pub struct NoAttachments;

impl AttachmentSource for NoAttachments {
    fn uploaded_files(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    InFlight,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::InFlight => "in_flight",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

/// Outcome of one submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Report received and rendered.
    Completed(Box<AnalysisResult>),
    /// Guard rejection: an analysis was already in flight. No side effects.
    Rejected,
    /// Validation, network, or backend failure; controller is idle again.
    Failed(AnalysisError),
}

pub struct AnalysisController {
    cfg: Config,
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    attachments: Arc<dyn AttachmentSource>,
    in_flight: AtomicBool,
    phase: Mutex<Phase>,
    simulator: Mutex<Option<ProgressSimulator>>,
    mounts: Mutex<MountSet>,
    last_result: Mutex<Option<AnalysisResult>>,
}

impl AnalysisController {
    pub fn new(
        cfg: Config,
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn Notifier>,
        attachments: Arc<dyn AttachmentSource>,
    ) -> Self {
        Self {
            cfg,
            backend,
            notifier,
            attachments,
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(Phase::Idle),
            simulator: Mutex::new(None),
            mounts: Mutex::new(MountSet::full_page()),
            last_result: Mutex::new(None),
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap()
    }

    pub fn session_id(&self) -> &str {
        &self.cfg.session_id
    }

    pub fn last_result(&self) -> Option<AnalysisResult> {
        self.last_result.lock().unwrap().clone()
    }

    /// Point-in-time view of the lifecycle.
    pub fn state(&self) -> AnalysisState {
        AnalysisState {
            is_analyzing: self.is_analyzing(),
            current_step: self.progress_snapshot().map(|s| s.step).unwrap_or(0),
            total_steps: crate::progress::TOTAL_STEPS,
            last_result: self.last_result(),
        }
    }

    /// Whether the simulated progress timer is still ticking.
    pub fn progress_running(&self) -> bool {
        self.simulator
            .lock()
            .unwrap()
            .as_ref()
            .map(|sim| !sim.is_stopped())
            .unwrap_or(false)
    }

    /// Current state of the progress surface, if a submission has started.
    pub fn progress_snapshot(&self) -> Option<ProgressSnapshot> {
        self.simulator.lock().unwrap().as_ref().map(|sim| sim.snapshot())
    }

    /// Rendered mount contents after the last successful analysis.
    pub fn mounts(&self) -> MountSet {
        self.mounts.lock().unwrap().clone()
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.lock().unwrap() = phase;
        logging::log(
            Level::Debug,
            Domain::Lifecycle,
            "phase",
            obj(&[("phase", v_str(phase.as_str()))]),
        );
    }

    /// Build the request payload for one submission: form fields, uploaded
    /// attachments, session id.
    pub fn build_request(&self, fields: &BTreeMap<String, String>) -> AnalysisRequest {
        AnalysisRequest {
            fields: fields.clone(),
            attachments: self.attachments.uploaded_files(),
            session_id: self.cfg.session_id.clone(),
        }
    }

    /// Drive one full submission: validate, request, simulate progress,
    /// settle, render. Exactly one backend request per call; no automatic
    /// retry.
    pub async fn submit(&self, fields: &BTreeMap<String, String>) -> SubmitOutcome {
        if self.is_analyzing() {
            self.notifier.warning("Análise já em andamento!");
            return SubmitOutcome::Rejected;
        }

        let request = self.build_request(fields);
        if request.segmento().is_none() {
            self.notifier.error("Segmento é obrigatório!");
            return SubmitOutcome::Failed(AnalysisError::Validation(
                "Segmento é obrigatório!".to_string(),
            ));
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.notifier.warning("Análise já em andamento!");
            return SubmitOutcome::Rejected;
        }

        self.set_phase(Phase::Submitting);
        logging::log(
            Level::Info,
            Domain::Lifecycle,
            "submit",
            obj(&[
                ("session_id", v_str(&request.session_id)),
                ("segmento", v_str(request.segmento().unwrap_or(""))),
            ]),
        );

        *self.simulator.lock().unwrap() = Some(ProgressSimulator::start(
            self.cfg.progress_tick_secs,
            self.cfg.step_estimate_secs,
        ));
        self.set_phase(Phase::InFlight);

        let settled = self.backend.analyze(&request).await;
        // The timer must not survive settlement, whatever the outcome.
        self.with_simulator(|sim| sim.stop());

        let outcome = match settled {
            Ok(result) => {
                self.with_simulator(|sim| sim.complete());
                sleep(Duration::from_millis(self.cfg.grace_delay_ms)).await;
                self.set_phase(Phase::Succeeded);
                self.render(&result);
                *self.last_result.lock().unwrap() = Some(result.clone());
                self.notifier
                    .success("Análise ultra-detalhada concluída com sucesso!");
                SubmitOutcome::Completed(Box::new(result))
            }
            Err(err) => {
                self.set_phase(Phase::Failed);
                self.notifier.error(&err.user_message());
                SubmitOutcome::Failed(err)
            }
        };

        // Cleanup runs on every settlement path: the flag never sticks.
        self.in_flight.store(false, Ordering::SeqCst);
        self.set_phase(Phase::Idle);
        outcome
    }

    fn with_simulator(&self, f: impl FnOnce(&ProgressSimulator)) {
        if let Some(sim) = self.simulator.lock().unwrap().as_ref() {
            f(sim);
        }
    }

    fn render(&self, result: &AnalysisResult) {
        let sections = render::shape_report(result);
        let mut mounts = self.mounts.lock().unwrap();
        render::html::bind(&mut mounts, &sections);
        logging::log(
            Level::Info,
            Domain::Render,
            "rendered",
            obj(&[("sections", logging::v_num(sections.len() as f64))]),
        );
    }

    /// Export the last report as PDF into the configured directory,
    /// `analise_mercado_YYYY-MM-DD.pdf`. Available once an analysis has
    /// succeeded.
    pub async fn export_pdf(&self) -> Result<PathBuf, AnalysisError> {
        let result = self
            .last_result()
            .ok_or_else(|| AnalysisError::Export("nenhuma análise disponível".to_string()))?;

        self.notifier.info("Gerando relatório PDF...");
        let bytes = match self.backend.generate_pdf(&result).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.notifier.error(&err.user_message());
                return Err(err);
            }
        };

        let filename = format!(
            "analise_mercado_{}.pdf",
            chrono::Utc::now().format("%Y-%m-%d")
        );
        let path = PathBuf::from(&self.cfg.pdf_dir).join(filename);
        if let Err(err) = std::fs::write(&path, &bytes) {
            let export = AnalysisError::Export(err.to_string());
            self.notifier.error(&export.user_message());
            return Err(export);
        }

        logging::log(
            Level::Info,
            Domain::Export,
            "pdf_written",
            obj(&[
                ("path", v_str(&path.to_string_lossy())),
                ("bytes", logging::v_num(bytes.len() as f64)),
            ]),
        );
        self.notifier.success("Relatório PDF baixado com sucesso!");
        Ok(path)
    }
}
