//! Administration & finance panel: AI operational reports.
//!
//! Report state is `Idle` or `Generating`. Only the latest report is kept;
//! each completed generation overwrites the previous one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::context::OperationalSnapshot;
use crate::models::{format_rupiah_short, ClaimsQueueItem, ReplyKind, ReportTab};
use crate::store::DataStore;
use crate::summarizer::{Reply, Summarizer};

pub const PAYROLL_QUERY: &str = "Generate a concise executive summary for the current payroll period including overtime analysis and budget adherence.";

pub const BILLING_QUERY: &str = "Analyze current billing efficiency, highlight the main cause of claim rejections, and suggest 3 specific improvements.";

/// Fixed backend query for each admin tab.
pub fn report_query(tab: ReportTab) -> &'static str {
    match tab {
        ReportTab::Payroll => PAYROLL_QUERY,
        ReportTab::Billing => BILLING_QUERY,
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRejection {
    #[error("A report is already being generated")]
    AlreadyGenerating,
}

/// The single retained report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub tab: ReportTab,
    pub text: String,
    pub kind: ReplyKind,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingReport {
    pub ticket: Uuid,
    pub tab: ReportTab,
    pub context: String,
    pub query: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ReportState {
    #[default]
    Idle,
    Generating { tab: ReportTab, ticket: Uuid },
}

#[derive(Debug, Default)]
pub struct ReportSession {
    state: ReportState,
    current: Option<Report>,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `Generating` and hand out the context/query to send.
    pub fn begin_report(
        &mut self,
        tab: ReportTab,
        store: &DataStore,
    ) -> Result<PendingReport, ReportRejection> {
        if let ReportState::Generating { .. } = self.state {
            return Err(ReportRejection::AlreadyGenerating);
        }

        let ticket = Uuid::new_v4();
        self.state = ReportState::Generating { tab, ticket };
        tracing::info!(tab = tab.as_str(), "Report generation started");

        Ok(PendingReport {
            ticket,
            tab,
            context: OperationalSnapshot::from_store(store).to_context(),
            query: report_query(tab),
        })
    }

    /// Store the result for `ticket`, replacing any earlier report.
    /// Returns `false` if `ticket` is not the pending generation.
    pub fn complete_report(&mut self, ticket: Uuid, reply: Reply) -> bool {
        match self.state {
            ReportState::Generating { tab, ticket: current } if current == ticket => {
                self.finish(tab, reply);
                true
            }
            _ => {
                tracing::debug!(%ticket, "Discarding report for stale ticket");
                false
            }
        }
    }

    /// Generate a report for `tab`, blocking on the backend, and return
    /// the stored report.
    pub fn generate_report(
        &mut self,
        summarizer: &Summarizer,
        store: &DataStore,
        tab: ReportTab,
    ) -> Result<Report, ReportRejection> {
        let pending = self.begin_report(tab, store)?;
        let reply = summarizer.reply(&pending.context, pending.query);
        Ok(self.finish(pending.tab, reply))
    }

    fn finish(&mut self, tab: ReportTab, reply: Reply) -> Report {
        let reply = reply.non_blank();
        if reply.is_error() {
            tracing::warn!(
                tab = tab.as_str(),
                kind = reply.kind.as_str(),
                "Report generation failed"
            );
        }
        let report = Report {
            tab,
            text: reply.text,
            kind: reply.kind,
            generated_at: Utc::now(),
        };
        self.current = Some(report.clone());
        self.state = ReportState::Idle;
        report
    }

    pub fn current_report(&self) -> Option<&Report> {
        self.current.as_ref()
    }

    pub fn current_report_text(&self) -> Option<&str> {
        self.current.as_ref().map(|r| r.text.as_str())
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, ReportState::Generating { .. })
    }

    /// Tab currently being generated, if any.
    pub fn generating_tab(&self) -> Option<ReportTab> {
        match self.state {
            ReportState::Generating { tab, .. } => Some(tab),
            ReportState::Idle => None,
        }
    }

    pub fn view(&self, store: &DataStore) -> AdminView {
        AdminView {
            current_report: self.current_report_text().map(String::from),
            report: self.current.clone(),
            generating: self.is_generating(),
            generating_tab: self.generating_tab(),
            payroll: PayrollSummary::from_store(store),
            claims_queue: store.claims_queue().to_vec(),
        }
    }
}

/// Payroll batch figures formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollSummary {
    pub period: String,
    pub salary_base: String,
    pub incentives: String,
    pub staff_count: u32,
    pub overtime_hours: u32,
    pub status: &'static str,
}

impl PayrollSummary {
    pub fn from_store(store: &DataStore) -> Self {
        let payroll = store.payroll();
        let ops = store.operations();
        Self {
            period: payroll.period.clone(),
            salary_base: format_rupiah_short(payroll.salary_base),
            incentives: format_rupiah_short(payroll.incentives),
            staff_count: ops.staff_count,
            overtime_hours: ops.overtime_hours,
            status: if payroll.ready_for_review {
                "Ready for Review"
            } else {
                "In Progress"
            },
        }
    }
}

/// Read-only snapshot for the admin view.
#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub current_report: Option<String>,
    pub report: Option<Report>,
    pub generating: bool,
    pub generating_tab: Option<ReportTab>,
    pub payroll: PayrollSummary,
    pub claims_queue: Vec<ClaimsQueueItem>,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::summarizer::{MockGenerator, SummarizerConfig, SummarizerError, EMPTY_REPLY_MESSAGE};

    fn summarizer(mock: &Arc<MockGenerator>) -> Summarizer {
        Summarizer::new(
            SummarizerConfig::new(Some("test-key".into()), "test-model"),
            mock.clone(),
        )
    }

    #[test]
    fn new_session_is_idle_without_report() {
        let session = ReportSession::new();
        assert!(!session.is_generating());
        assert!(session.current_report().is_none());
    }

    #[test]
    fn payroll_then_billing_overwrites_report() {
        let store = DataStore::demo().unwrap();
        let mut session = ReportSession::new();

        let mock_a = Arc::new(MockGenerator::new("Report A"));
        session
            .generate_report(&summarizer(&mock_a), &store, ReportTab::Payroll)
            .unwrap();
        assert!(!session.is_generating());
        assert_eq!(session.current_report_text(), Some("Report A"));
        assert_eq!(session.current_report().unwrap().tab, ReportTab::Payroll);

        let mock_b = Arc::new(MockGenerator::new("Report B"));
        session
            .generate_report(&summarizer(&mock_b), &store, ReportTab::Billing)
            .unwrap();
        assert!(!session.is_generating());
        assert_eq!(session.current_report_text(), Some("Report B"));
        assert_eq!(session.current_report().unwrap().tab, ReportTab::Billing);
    }

    #[test]
    fn query_depends_on_tab() {
        let store = DataStore::demo().unwrap();
        let mock = Arc::new(MockGenerator::new("ok"));
        let summarizer = summarizer(&mock);
        let mut session = ReportSession::new();

        session
            .generate_report(&summarizer, &store, ReportTab::Payroll)
            .unwrap();
        assert!(mock.last_request().unwrap().input.ends_with(PAYROLL_QUERY));

        session
            .generate_report(&summarizer, &store, ReportTab::Billing)
            .unwrap();
        assert!(mock.last_request().unwrap().input.ends_with(BILLING_QUERY));
    }

    #[test]
    fn context_is_operational_snapshot() {
        let store = DataStore::demo().unwrap();
        let mut session = ReportSession::new();
        let pending = session.begin_report(ReportTab::Billing, &store).unwrap();
        assert!(pending.context.contains("Month: Oct 2023"));
        assert!(pending.context.contains("Pending Claims: 24"));
        assert_eq!(pending.query, BILLING_QUERY);
        assert_eq!(pending.tab, ReportTab::Billing);
    }

    #[test]
    fn trigger_while_generating_is_rejected() {
        let store = DataStore::demo().unwrap();
        let mock = Arc::new(MockGenerator::new("x"));
        let mut session = ReportSession::new();
        let pending = session.begin_report(ReportTab::Payroll, &store).unwrap();
        assert!(session.is_generating());
        assert_eq!(session.generating_tab(), Some(ReportTab::Payroll));

        let err = session
            .generate_report(&summarizer(&mock), &store, ReportTab::Billing)
            .unwrap_err();
        assert_eq!(err, ReportRejection::AlreadyGenerating);
        assert_eq!(mock.call_count(), 0);
        assert_eq!(session.generating_tab(), Some(ReportTab::Payroll));

        assert!(session.complete_report(pending.ticket, Reply::answer("done".into())));
        assert!(!session.is_generating());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let store = DataStore::demo().unwrap();
        let mut session = ReportSession::new();
        let _pending = session.begin_report(ReportTab::Payroll, &store).unwrap();
        assert!(!session.complete_report(Uuid::new_v4(), Reply::answer("x".into())));
        assert!(session.is_generating());
        assert!(session.current_report().is_none());
    }

    #[test]
    fn complete_without_pending_is_ignored() {
        let mut session = ReportSession::new();
        assert!(!session.complete_report(Uuid::new_v4(), Reply::answer("x".into())));
        assert!(session.current_report().is_none());
    }

    #[test]
    fn failed_generation_stores_fallback_and_returns_to_idle() {
        let store = DataStore::demo().unwrap();
        let mock = Arc::new(MockGenerator::failing(SummarizerError::Connection(
            "http://backend".into(),
        )));
        let mut session = ReportSession::new();
        let report = session
            .generate_report(&summarizer(&mock), &store, ReportTab::Billing)
            .unwrap();
        assert_eq!(report.kind, ReplyKind::BackendError);
        assert!(!report.text.is_empty());
        assert!(!report.text.contains("http://backend"));
        assert!(!session.is_generating());
    }

    #[test]
    fn blank_report_is_stored_as_backend_error() {
        let store = DataStore::demo().unwrap();
        let mock = Arc::new(MockGenerator::new("  \n "));
        let mut session = ReportSession::new();
        let report = session
            .generate_report(&summarizer(&mock), &store, ReportTab::Payroll)
            .unwrap();
        assert_eq!(report.text, EMPTY_REPLY_MESSAGE);
        assert_eq!(report.kind, ReplyKind::BackendError);
        assert_eq!(session.current_report(), Some(&report));
        assert!(!session.is_generating());
    }

    #[test]
    fn blank_completion_is_stored_as_backend_error() {
        let store = DataStore::demo().unwrap();
        let mut session = ReportSession::new();
        let pending = session.begin_report(ReportTab::Billing, &store).unwrap();
        assert!(session.complete_report(pending.ticket, Reply::answer(String::new())));
        let report = session.current_report().unwrap();
        assert_eq!(report.text, EMPTY_REPLY_MESSAGE);
        assert_eq!(report.kind, ReplyKind::BackendError);
    }

    #[test]
    fn generate_returns_the_stored_report() {
        let store = DataStore::demo().unwrap();
        let mock = Arc::new(MockGenerator::new("Billing fine"));
        let mut session = ReportSession::new();
        let report = session
            .generate_report(&summarizer(&mock), &store, ReportTab::Billing)
            .unwrap();
        assert_eq!(report.text, "Billing fine");
        assert_eq!(report.kind, ReplyKind::Answer);
        assert_eq!(session.current_report(), Some(&report));
    }

    #[test]
    fn view_includes_payroll_and_claims() {
        let store = DataStore::demo().unwrap();
        let session = ReportSession::new();
        let view = session.view(&store);
        assert!(view.current_report.is_none());
        assert!(!view.generating);
        assert_eq!(view.payroll.salary_base, "Rp 2.4B");
        assert_eq!(view.payroll.incentives, "Rp 450M");
        assert_eq!(view.payroll.status, "Ready for Review");
        assert_eq!(view.claims_queue.len(), 2);
        assert_eq!(view.claims_queue[0].count, 12);
    }
}
