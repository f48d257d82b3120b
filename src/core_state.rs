//! Transport-agnostic application state.
//!
//! `CoreState` owns the data store, the summarizer and both view sessions.
//! Session mutexes are only held for state transitions, never across a
//! backend call: the `Awaiting`/`Generating` states are what serialize
//! submissions.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::admin::{AdminView, ReportRejection, ReportSession};
use crate::clinical::{ClinicalSession, ClinicalView, SubmitRejection};
use crate::config::AppConfig;
use crate::dashboard::DashboardView;
use crate::models::{Patient, ReportTab};
use crate::store::{DataStore, StoreError};
use crate::summarizer::{
    GeminiClient, Summarizer, SummarizerConfig, SummarizerError, TextGenerator,
};

pub struct CoreState {
    store: DataStore,
    summarizer: Summarizer,
    clinical: Mutex<ClinicalSession>,
    reports: Mutex<ReportSession>,
}

impl CoreState {
    /// Wire the demo store to the Gemini backend described by `config`.
    ///
    /// Builds a blocking HTTP client, so call this outside an async runtime.
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let store = DataStore::demo()?;
        let backend = GeminiClient::new(&config.api_base, config.request_timeout_secs)?;
        tracing::info!(
            api_base = backend.base_url(),
            patients = store.patients().len(),
            "Backend and data store ready"
        );
        let summarizer_config = config.summarizer_config();
        if !summarizer_config.has_credential() {
            tracing::warn!(
                "No backend credential configured; AI features will report a configuration error"
            );
        }
        Ok(Self::with_backend(
            store,
            summarizer_config,
            Arc::new(backend),
        ))
    }

    pub fn with_backend(
        store: DataStore,
        config: SummarizerConfig,
        backend: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            store,
            summarizer: Summarizer::new(config, backend),
            clinical: Mutex::new(ClinicalSession::new()),
            reports: Mutex::new(ReportSession::new()),
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn lock_clinical(&self) -> Result<MutexGuard<'_, ClinicalSession>, CoreError> {
        self.clinical.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn lock_reports(&self) -> Result<MutexGuard<'_, ReportSession>, CoreError> {
        self.reports.lock().map_err(|_| CoreError::LockPoisoned)
    }

    // ── Dashboard ───────────────────────────────────────────

    pub fn dashboard_view(&self) -> DashboardView {
        DashboardView::from_store(&self.store)
    }

    /// Owned copies of the patients matching `query`.
    pub fn search_patients(&self, query: &str) -> Vec<Patient> {
        self.store
            .filter_patients(query)
            .into_iter()
            .cloned()
            .collect()
    }

    // ── Clinical chat ───────────────────────────────────────

    pub fn clinical_view(&self) -> Result<ClinicalView, CoreError> {
        Ok(self.lock_clinical()?.view())
    }

    /// Start a fresh conversation for the patient whose id or MRN is
    /// `patient_id`.
    pub fn select_patient(&self, patient_id: &str) -> Result<ClinicalView, CoreError> {
        let patient = self
            .store
            .find_patient(patient_id)
            .or_else(|| self.store.find_by_mrn(patient_id))
            .cloned()
            .ok_or_else(|| CoreError::UnknownPatient(patient_id.to_string()))?;

        let mut session = self.lock_clinical()?;
        session.select_patient(patient);
        Ok(session.view())
    }

    /// Submit a chat message and block until the reply is recorded.
    ///
    /// Run from a blocking thread. If the patient is switched while the call
    /// is in flight, the reply is dropped and the new conversation returned.
    pub fn send_message(&self, text: &str) -> Result<ClinicalView, CoreError> {
        let pending = self.lock_clinical()?.begin_turn(text)?;

        let reply = self.summarizer.reply(&pending.context, &pending.query);
        if reply.is_error() {
            tracing::warn!(kind = reply.kind.as_str(), "Chat turn answered with an error reply");
        }

        let mut session = self.lock_clinical()?;
        if !session.complete_turn(pending.ticket, reply) {
            tracing::info!("Patient changed while awaiting a reply; reply discarded");
        }
        Ok(session.view())
    }

    // ── Admin reports ───────────────────────────────────────

    pub fn admin_view(&self) -> Result<AdminView, CoreError> {
        Ok(self.lock_reports()?.view(&self.store))
    }

    /// Generate the report for `tab` and block until it is stored.
    pub fn generate_report(&self, tab: ReportTab) -> Result<AdminView, CoreError> {
        let pending = self.lock_reports()?.begin_report(tab, &self.store)?;

        let reply = self.summarizer.reply(&pending.context, pending.query);

        let mut reports = self.lock_reports()?;
        reports.complete_report(pending.ticket, reply);
        Ok(reports.view(&self.store))
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Unknown patient: {0}")]
    UnknownPatient(String),
    #[error(transparent)]
    Chat(#[from] SubmitRejection),
    #[error(transparent)]
    Report(#[from] ReportRejection),
    #[error("Backend setup failed: {0}")]
    Backend(#[from] SummarizerError),
    #[error("Invalid data store: {0}")]
    Store(#[from] StoreError),
}
