//! Context serialization: turns domain records into the text block sent
//! alongside a query to the text-generation backend.
//!
//! Output is deterministic and total. Every field of the input appears in
//! the output; nothing is truncated or redacted.

use serde::Serialize;

use crate::models::*;
use crate::store::DataStore;

/// Fixed-shape operational figures used as admin report context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationalSnapshot {
    pub month_label: String,
    pub revenue: u64,
    pub expenses: u64,
    pub net_income: i64,
    pub pending_claims: u32,
    pub top_rejection_reason: String,
    pub top_rejection_share: f64,
    pub staff_count: u32,
    pub overtime_hours: u32,
}

impl OperationalSnapshot {
    /// Derive the snapshot from the latest month in the store.
    ///
    /// An empty financial series yields zero revenue/expenses labelled with
    /// the reporting year only.
    pub fn from_store(store: &DataStore) -> Self {
        let ops = store.operations();
        let (month_label, revenue, expenses, net_income) = match store.latest_metric() {
            Some(m) => (
                format!("{} {}", m.month, ops.year),
                m.revenue,
                m.expenses,
                m.net_income(),
            ),
            None => (ops.year.to_string(), 0, 0, 0),
        };

        Self {
            month_label,
            revenue,
            expenses,
            net_income,
            pending_claims: ops.pending_claims,
            top_rejection_reason: ops.top_rejection_reason.clone(),
            top_rejection_share: ops.top_rejection_share,
            staff_count: ops.staff_count,
            overtime_hours: ops.overtime_hours,
        }
    }

    pub fn to_context(&self) -> String {
        let body = [
            format!("Month: {}", self.month_label),
            format!(
                "Total Revenue: {} ({} IDR)",
                format_rupiah_short(self.revenue),
                self.revenue
            ),
            format!(
                "Total Expenses: {} ({} IDR)",
                format_rupiah_short(self.expenses),
                self.expenses
            ),
            format!(
                "Net Income: {} ({} IDR)",
                format_rupiah_signed(self.net_income),
                self.net_income
            ),
            format!("Pending Claims: {}", self.pending_claims),
            format!(
                "Top Claim Rejection Reason: \"{}\" ({})",
                self.top_rejection_reason,
                format_percent(self.top_rejection_share)
            ),
            format!("Staff Count: {}", self.staff_count),
            format!("Overtime Hours: {}", self.overtime_hours),
        ]
        .join("\n");

        section("OPERATIONAL SNAPSHOT", &body)
    }
}

/// Serialize a full patient record for a clinical query.
pub fn patient_context(patient: &Patient) -> String {
    let identity = [
        format!("ID: {}", patient.id),
        format!("Name: {}", patient.name),
        format!("Age: {}", patient.age),
        format!("Gender: {}", patient.gender.as_str()),
        format!("MRN: {}", patient.mrn),
        format!("Last Visit: {}", patient.last_visit),
    ]
    .join("\n");

    let vitals = [
        format!("Blood Pressure: {} mmHg", patient.vitals.bp),
        format!("Heart Rate: {} bpm", patient.vitals.hr),
        format!("Temperature: {} °C", patient.vitals.temp),
        format!("SpO2: {}%", patient.vitals.spo2),
    ]
    .join("\n");

    [
        section("PATIENT", &identity),
        section("DIAGNOSIS", &bullet_list(&patient.diagnosis)),
        section("MEDICATIONS", &bullet_list(&patient.medications)),
        section("VITALS", &vitals),
        section("CLINICAL NOTES", &patient.notes),
    ]
    .join("\n\n")
}

fn section(label: &str, content: &str) -> String {
    format!("<{label}>\n{content}\n</{label}>")
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- none recorded".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short Rupiah with a leading minus for losses: `-Rp 40M`.
fn format_rupiah_signed(amount: i64) -> String {
    let short = format_rupiah_short(amount.unsigned_abs());
    if amount < 0 {
        format!("-{short}")
    } else {
        short
    }
}

/// `45.0` → `45%`, `0.8` → `0.8%`.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}%", value as i64)
    } else {
        format!("{value}%")
    }
}
