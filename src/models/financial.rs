use serde::{Deserialize, Serialize};

/// Monthly financial figures for the dashboard charts.
///
/// Currency amounts are whole Rupiah.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetric {
    pub month: String,
    pub revenue: u64,
    pub expenses: u64,
    /// Percentage, 0-100.
    pub billing_efficiency: f64,
    /// Percentage, 0-100.
    pub claim_rejection_rate: f64,
}

impl FinancialMetric {
    /// Revenue minus expenses. Negative when the month ran at a loss.
    pub fn net_income(&self) -> i64 {
        self.revenue as i64 - self.expenses as i64
    }
}

/// Operational figures for the current reporting period that are not
/// part of the monthly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalStats {
    pub year: u16,
    pub pending_claims: u32,
    pub top_rejection_reason: String,
    /// Share of rejections with the top reason, percentage.
    pub top_rejection_share: f64,
    pub staff_count: u32,
    pub overtime_hours: u32,
    pub patient_admittance: u32,
    /// Admittance change vs the previous month, percentage.
    pub admittance_change: f64,
    pub avg_billing_minutes: f64,
    pub previous_billing_minutes: f64,
}

/// Payroll batch awaiting review in the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollBatch {
    pub period: String,
    pub salary_base: u64,
    pub incentives: u64,
    pub ready_for_review: bool,
}

/// One line in the claims workflow queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsQueueItem {
    pub label: String,
    pub count: u32,
    pub detail: String,
    pub action: String,
}

/// Short Rupiah format used on cards and in report context: `Rp 550M`, `Rp 2.4B`.
pub fn format_rupiah_short(amount: u64) -> String {
    const BILLION: u64 = 1_000_000_000;
    const MILLION: u64 = 1_000_000;
    const THOUSAND: u64 = 1_000;

    let (scaled, suffix) = if amount >= BILLION {
        (amount as f64 / BILLION as f64, "B")
    } else if amount >= MILLION {
        (amount as f64 / MILLION as f64, "M")
    } else if amount >= THOUSAND {
        (amount as f64 / THOUSAND as f64, "K")
    } else {
        return format!("Rp {amount}");
    };

    let rounded = (scaled * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("Rp {}{suffix}", rounded as u64)
    } else {
        format!("Rp {rounded:.1}{suffix}")
    }
}
