//! Dashboard view: monthly financial series plus summary stat cards.

use serde::Serialize;

use crate::context::format_percent;
use crate::models::{format_rupiah_short, FinancialMetric};
use crate::store::DataStore;

/// Single summary card shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    /// Signed change vs the previous period, e.g. `+12%`.
    pub change: Option<String>,
    pub detail: String,
    /// Highlighted as requiring staff action.
    pub needs_action: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub metrics: Vec<FinancialMetric>,
    pub stat_cards: Vec<StatCard>,
}

impl DashboardView {
    pub fn from_store(store: &DataStore) -> Self {
        Self {
            metrics: store.financial_metrics().to_vec(),
            stat_cards: stat_cards(store),
        }
    }
}

fn stat_cards(store: &DataStore) -> Vec<StatCard> {
    let ops = store.operations();
    let mut cards = Vec::with_capacity(5);

    if let Some(latest) = store.latest_metric() {
        let change = store
            .previous_metric()
            .and_then(|prev| percent_change(prev.revenue as f64, latest.revenue as f64))
            .map(signed_percent);
        cards.push(StatCard {
            label: "Monthly Revenue",
            value: format_rupiah_short(latest.revenue),
            change,
            detail: format!("{} {}", latest.month, ops.year),
            needs_action: false,
        });
    }

    cards.push(StatCard {
        label: "Patient Admittance",
        value: group_thousands(ops.patient_admittance),
        change: Some(signed_percent(ops.admittance_change)),
        detail: "vs previous month".into(),
        needs_action: false,
    });

    cards.push(StatCard {
        label: "Avg. Billing Time",
        value: format!("{} min", trim_float(ops.avg_billing_minutes)),
        change: percent_change(ops.previous_billing_minutes, ops.avg_billing_minutes)
            .map(signed_percent),
        detail: format!("down from {} min", trim_float(ops.previous_billing_minutes)),
        needs_action: false,
    });

    cards.push(StatCard {
        label: "Pending Claims",
        value: ops.pending_claims.to_string(),
        change: None,
        detail: "Requires Action".into(),
        needs_action: ops.pending_claims > 0,
    });

    if let Some(latest) = store.latest_metric() {
        cards.push(StatCard {
            label: "Billing Efficiency",
            value: format_percent(latest.billing_efficiency),
            change: None,
            detail: format!(
                "Claim rejection rate {}",
                format_percent(latest.claim_rejection_rate)
            ),
            needs_action: false,
        });
    }

    cards
}

/// Relative change from `before` to `after` in percent. `None` when `before` is zero.
fn percent_change(before: f64, after: f64) -> Option<f64> {
    if before == 0.0 {
        return None;
    }
    Some((after - before) / before * 100.0)
}

fn signed_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded > 0.0 {
        format!("+{}%", trim_float(rounded))
    } else {
        format!("{}%", trim_float(rounded))
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
