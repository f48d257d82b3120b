//! Domain data store: read-only patient and financial fixture collections.
//!
//! The store is built once at startup and handed to everything that needs it
//! (`CoreState` holds it behind an `Arc`). There are no mutation operations.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Duplicate patient id: {0}")]
    DuplicatePatientId(String),

    #[error("Duplicate MRN: {0}")]
    DuplicateMrn(String),

    #[error("{field} for {month} out of range (0-100): {value}")]
    PercentageOutOfRange {
        month: String,
        field: &'static str,
        value: f64,
    },
}

/// In-memory collections backing all three views.
#[derive(Debug, Clone)]
pub struct DataStore {
    patients: Vec<Patient>,
    financials: Vec<FinancialMetric>,
    operations: OperationalStats,
    payroll: PayrollBatch,
    claims_queue: Vec<ClaimsQueueItem>,
}

impl DataStore {
    /// Build a store, rejecting duplicate ids/MRNs and out-of-range percentages.
    pub fn new(
        patients: Vec<Patient>,
        financials: Vec<FinancialMetric>,
        operations: OperationalStats,
        payroll: PayrollBatch,
        claims_queue: Vec<ClaimsQueueItem>,
    ) -> Result<Self, StoreError> {
        let store = Self {
            patients,
            financials,
            operations,
            payroll,
            claims_queue,
        };
        store.validate()?;
        Ok(store)
    }

    /// Check the store invariants.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut ids = HashSet::new();
        let mut mrns = HashSet::new();
        for p in &self.patients {
            if !ids.insert(p.id.as_str()) {
                return Err(StoreError::DuplicatePatientId(p.id.clone()));
            }
            if !mrns.insert(p.mrn.as_str()) {
                return Err(StoreError::DuplicateMrn(p.mrn.clone()));
            }
        }

        for m in &self.financials {
            for (field, value) in [
                ("billing_efficiency", m.billing_efficiency),
                ("claim_rejection_rate", m.claim_rejection_rate),
            ] {
                if !(0.0..=100.0).contains(&value) {
                    return Err(StoreError::PercentageOutOfRange {
                        month: m.month.clone(),
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Monthly series in chronological order.
    pub fn financial_metrics(&self) -> &[FinancialMetric] {
        &self.financials
    }

    pub fn latest_metric(&self) -> Option<&FinancialMetric> {
        self.financials.last()
    }

    /// The month before the latest one, if the series has at least two entries.
    pub fn previous_metric(&self) -> Option<&FinancialMetric> {
        let len = self.financials.len();
        if len < 2 {
            return None;
        }
        self.financials.get(len - 2)
    }

    pub fn operations(&self) -> &OperationalStats {
        &self.operations
    }

    pub fn payroll(&self) -> &PayrollBatch {
        &self.payroll
    }

    pub fn claims_queue(&self) -> &[ClaimsQueueItem] {
        &self.claims_queue
    }

    pub fn find_patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn find_by_mrn(&self, mrn: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.mrn == mrn)
    }

    /// Patients whose name or MRN contains `query`, case-insensitively.
    pub fn filter_patients(&self, query: &str) -> Vec<&Patient> {
        filter_patients(&self.patients, query)
    }

    /// Fixture data for the demo deployment, checked like any other store.
    pub fn demo() -> Result<Self, StoreError> {
        Self::new(
            demo_patients(),
            demo_financials(),
            OperationalStats {
                year: 2023,
                pending_claims: 24,
                top_rejection_reason: "Incomplete Documentation".into(),
                top_rejection_share: 45.0,
                staff_count: 120,
                overtime_hours: 450,
                patient_admittance: 1245,
                admittance_change: 12.0,
                avg_billing_minutes: 3.2,
                previous_billing_minutes: 15.0,
            },
            PayrollBatch {
                period: "Oct 2023".into(),
                salary_base: 2_400_000_000,
                incentives: 450_000_000,
                ready_for_review: true,
            },
            vec![
                ClaimsQueueItem {
                    label: "Pending Authorization".into(),
                    count: 12,
                    detail: "claims require medical justification".into(),
                    action: "Review AI Suggestions".into(),
                },
                ClaimsQueueItem {
                    label: "Rejected (Coding Error)".into(),
                    count: 5,
                    detail: "claims flagged for ICD-10 mismatch".into(),
                    action: "Fix Codes".into(),
                },
            ],
        )
    }
}

/// Order-preserving, case-insensitive name/MRN filter.
///
/// Takes any sequence of patient references so an already-filtered list can
/// be filtered again.
pub fn filter_patients<'a, I>(patients: I, query: &str) -> Vec<&'a Patient>
where
    I: IntoIterator<Item = &'a Patient>,
{
    let needle = query.to_lowercase();
    patients
        .into_iter()
        .filter(|p| p.matches_lowercase(&needle))
        .collect()
}

fn demo_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "p1".into(),
            name: "Budi Santoso".into(),
            age: 45,
            gender: Gender::Male,
            mrn: "MRN-2023-8891".into(),
            last_visit: "2023-10-25".into(),
            diagnosis: vec!["Hypertension".into(), "Type 2 Diabetes".into()],
            medications: vec!["Amlodipine 5mg".into(), "Metformin 500mg".into()],
            notes: [
                "Patient presents with complaints of recurring headaches and mild dizziness over the last week. BP is elevated at 150/95. Patient admits to missing medication doses due to busy work schedule.",
                "Physical exam shows no neurological deficits. Heart sounds regular. Lungs clear.",
                "Plan: Reinforce medication adherence. Order lipid profile and HbA1c. Follow up in 2 weeks.",
            ]
            .join("\n"),
            vitals: Vitals {
                bp: "150/95".into(),
                hr: 88,
                temp: 36.8,
                spo2: 98,
            },
        },
        Patient {
            id: "p2".into(),
            name: "Siti Aminah".into(),
            age: 62,
            gender: Gender::Female,
            mrn: "MRN-2023-9921".into(),
            last_visit: "2023-10-28".into(),
            diagnosis: vec!["Osteoarthritis".into(), "Gastritis".into()],
            medications: vec!["Paracetamol".into(), "Omeprazole".into()],
            notes: [
                "Follow-up for knee pain. Patient reports pain score 6/10, worsening with activity. Stomach discomfort has improved with Omeprazole.",
                "Examination: Crepitus noted in right knee. Mild swelling, no redness. Range of motion limited due to pain.",
                "Plan: Continue analgesics. Refer to physiotherapy. Discussed weight management strategies.",
            ]
            .join("\n"),
            vitals: Vitals {
                bp: "130/80".into(),
                hr: 76,
                temp: 36.5,
                spo2: 99,
            },
        },
        Patient {
            id: "p3".into(),
            name: "Andi Pratama".into(),
            age: 28,
            gender: Gender::Male,
            mrn: "MRN-2023-1102".into(),
            last_visit: "2023-10-29".into(),
            diagnosis: vec!["Acute Bronchitis".into()],
            medications: vec!["Azithromycin".into(), "Salbutamol Inhaler".into()],
            notes: [
                "Patient complains of productive cough for 5 days, yellow sputum. Low grade fever. No history of asthma.",
                "Exam: Wheezing heard on expiration bilaterally. Throat slightly hyperemic.",
                "Plan: Prescribed antibiotics and bronchodilator. Advised rest and hydration. Alert signs explained.",
            ]
            .join("\n"),
            vitals: Vitals {
                bp: "120/75".into(),
                hr: 92,
                temp: 37.8,
                spo2: 96,
            },
        },
    ]
}

fn demo_financials() -> Vec<FinancialMetric> {
    let rows: [(&str, u64, u64, f64, f64); 6] = [
        ("May", 450_000_000, 320_000_000, 88.0, 4.5),
        ("Jun", 480_000_000, 330_000_000, 90.0, 3.8),
        ("Jul", 465_000_000, 340_000_000, 92.0, 3.0),
        ("Aug", 520_000_000, 350_000_000, 94.0, 2.1),
        ("Sep", 510_000_000, 345_000_000, 95.0, 1.5),
        ("Oct", 550_000_000, 360_000_000, 98.0, 0.8),
    ];
    rows.into_iter()
        .map(
            |(month, revenue, expenses, billing_efficiency, claim_rejection_rate)| {
                FinancialMetric {
                    month: month.into(),
                    revenue,
                    expenses,
                    billing_efficiency,
                    claim_rejection_rate,
                }
            },
        )
        .collect()
}
