//! Portfolio reconciliation engine
//!
//! This module implements the core outcome-based-contract reconciliation.
//!
//! # Reconciliation Flow
//!
//! ```text
//! InternalRecords ─┐
//!                  ├─→ validate keys → group claims by patient
//! ClaimEvents ─────┘                          ↓
//!                              per record: decision table
//!                                             ↓
//!                              one ReconciliationRecord each
//! ```
//!
//! Per patient, relative to a fixed as-of date:
//! 1. If any claim event carries a rescue code, the earliest such event
//!    confirms failure. Inside the 180-day rebate window the full booked
//!    revenue is owed back; at day 180 or later the rebate is zero. Either
//!    way the cash impact is `reserve - rebate`.
//! 2. Without a failure event, elapsed days decide: past 180 days the full
//!    reserve releases, past 90 days half of it, otherwise nothing.
//!
//! # Critical Invariants
//!
//! - **One output per record**: iteration is driven by the internal-record
//!   slice, never by the join, so claim cardinality cannot change the
//!   output count.
//! - **Determinism**: identical inputs, as-of date, and config produce
//!   bit-identical output, including order (input record order).
//! - **Purity**: inputs are never mutated; the only side effects are log
//!   events.
//! - **Integer money**: all amounts are i64 cents; the half-reserve release
//!   truncates toward zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::claim::{ClaimEvent, CODE_GLOFITAMAB, CODE_HOSPICE};
use crate::models::internal::InternalRecord;
use crate::models::reconciliation::{PatientStatus, ReconciliationRecord};

/// Errors that can occur during reconciliation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Claim event references unknown patient '{patient_id}'")]
    MissingPatientReference { patient_id: String },

    #[error("Duplicate patient id '{patient_id}' in internal records")]
    DuplicatePatientId { patient_id: String },
}

/// Reconciliation knobs
///
/// Defaults mirror the reference contract ("100% Rebate if Fail < 6mo"):
/// two rescue codes, a strict 180-day rebate window, full reserve release
/// after 180 days, partial release after 90.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Claim codes that mark a failure-driven rescue intervention
    pub rescue_codes: Vec<String>,

    /// Failure strictly inside this many days owes the full revenue back
    pub rebate_window_days: i64,

    /// Without failure, more than this many days releases the full reserve
    pub full_release_after_days: i64,

    /// Without failure, more than this many days releases half the reserve
    pub partial_release_after_days: i64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            rescue_codes: vec![CODE_GLOFITAMAB.to_string(), CODE_HOSPICE.to_string()],
            rebate_window_days: 180,
            full_release_after_days: 180,
            partial_release_after_days: 90,
        }
    }
}

impl ReconcilerConfig {
    /// Whether a claim code marks a failure-indicating rescue event
    pub fn is_rescue(&self, code: &str) -> bool {
        self.rescue_codes.iter().any(|c| c == code)
    }
}

/// Reconcile a portfolio against its claim events
///
/// Produces exactly one [`ReconciliationRecord`] per internal record, in
/// input order. Pure: same records + claims + as-of date + config always
/// yield bit-identical output.
///
/// # Arguments
/// * `records` - Internal records, patient ids unique
/// * `claims` - Claim events; every event must reference a known patient
/// * `as_of` - Fixed reference date for elapsed-day calculations
/// * `config` - Rescue codes and day thresholds
///
/// # Returns
/// One reconciliation record per internal record.
///
/// # Errors
/// - [`ReconcileError::DuplicatePatientId`] if two internal records share a
///   patient id
/// - [`ReconcileError::MissingPatientReference`] if a claim event references
///   a patient absent from the internal records
///
/// # Example
/// ```
/// use biosure_core_rs::{reconcile, ClaimEvent, InternalRecord, PatientStatus, ReconcilerConfig};
/// use chrono::NaiveDate;
///
/// let records = vec![InternalRecord::new(
///     "PT-10000".to_string(),
///     NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     "Commercial Plan".to_string(),
///     42_000_000,
///     16_800_000,
///     "100% Rebate if Fail < 6mo".to_string(),
/// )];
/// let claims = vec![ClaimEvent::new(
///     "PT-10000".to_string(),
///     NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     "Q2041".to_string(),
///     "CAR-T Infusion".to_string(),
/// )];
/// let as_of = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
///
/// let ledger = reconcile(&records, &claims, as_of, &ReconcilerConfig::default()).unwrap();
/// assert_eq!(ledger.len(), 1);
/// assert_eq!(ledger[0].status, PatientStatus::SafeRiskExpired);
/// assert_eq!(ledger[0].cash_impact, 16_800_000);
/// ```
pub fn reconcile(
    records: &[InternalRecord],
    claims: &[ClaimEvent],
    as_of: NaiveDate,
    config: &ReconcilerConfig,
) -> Result<Vec<ReconciliationRecord>, ReconcileError> {
    let claims_by_patient = group_claims(records, claims)?;

    let ledger: Vec<ReconciliationRecord> = records
        .iter()
        .map(|record| {
            let patient_claims = claims_by_patient
                .get(record.patient_id())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            classify(record, patient_claims, as_of, config)
        })
        .collect();

    debug!(
        records = records.len(),
        claims = claims.len(),
        "portfolio reconciled"
    );

    Ok(ledger)
}

/// Validate keys and group claim events by patient
///
/// Rejects duplicate internal patient ids and claim events referencing
/// unknown patients. Within each group, input order is preserved.
fn group_claims<'a>(
    records: &'a [InternalRecord],
    claims: &'a [ClaimEvent],
) -> Result<HashMap<&'a str, Vec<&'a ClaimEvent>>, ReconcileError> {
    let mut known: HashSet<&str> = HashSet::with_capacity(records.len());
    for record in records {
        if !known.insert(record.patient_id()) {
            return Err(ReconcileError::DuplicatePatientId {
                patient_id: record.patient_id().to_string(),
            });
        }
    }

    let mut by_patient: HashMap<&str, Vec<&ClaimEvent>> = HashMap::new();
    for event in claims {
        if !known.contains(event.patient_id()) {
            return Err(ReconcileError::MissingPatientReference {
                patient_id: event.patient_id().to_string(),
            });
        }
        by_patient.entry(event.patient_id()).or_default().push(event);
    }

    Ok(by_patient)
}

/// Apply the decision table to one patient
fn classify(
    record: &InternalRecord,
    patient_claims: &[&ClaimEvent],
    as_of: NaiveDate,
    config: &ReconcilerConfig,
) -> ReconciliationRecord {
    let days_since = (as_of - record.shipment_date()).num_days();
    if days_since < 0 {
        warn!(
            patient_id = record.patient_id(),
            days_since, "shipment date lies after the as-of date"
        );
    }

    // Earliest failure event; ties broken by lowest code, then input order
    // (min_by_key keeps the first minimal element)
    let earliest_failure = patient_claims
        .iter()
        .filter(|event| config.is_rescue(event.code()))
        .min_by_key(|event| (event.date(), event.code()));

    let (status, cash_impact) = match earliest_failure {
        Some(event) => {
            let days_to_fail = (event.date() - record.shipment_date()).num_days();
            let rebate_owed = if days_to_fail < config.rebate_window_days {
                record.revenue_booked()
            } else {
                0
            };
            // reserve - rebate: positive when the holdback already covers
            // the obligation, negative when liability exceeds it
            (
                PatientStatus::FailureConfirmed,
                record.reserve_held() - rebate_owed,
            )
        }
        None => {
            if days_since > config.full_release_after_days {
                (PatientStatus::SafeRiskExpired, record.reserve_held())
            } else if days_since > config.partial_release_after_days {
                // Truncating cents division
                (PatientStatus::LowRiskPartialRelease, record.reserve_held() / 2)
            } else {
                (PatientStatus::Monitoring, 0)
            }
        }
    };

    ReconciliationRecord {
        patient_id: record.patient_id().to_string(),
        days_on_therapy: days_since,
        current_reserve: record.reserve_held(),
        status,
        cash_impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(patient_id: &str, shipment: NaiveDate) -> InternalRecord {
        InternalRecord::new(
            patient_id.to_string(),
            shipment,
            "Commercial Plan".to_string(),
            42_000_000,
            16_800_000,
            "100% Rebate if Fail < 6mo".to_string(),
        )
    }

    fn rescue(patient_id: &str, event_date: NaiveDate) -> ClaimEvent {
        ClaimEvent::new(
            patient_id.to_string(),
            event_date,
            CODE_HOSPICE.to_string(),
            "Hospice".to_string(),
        )
    }

    #[test]
    fn test_default_config_matches_reference_contract() {
        let config = ReconcilerConfig::default();

        assert_eq!(config.rescue_codes, vec!["J9359", "Z51.5"]);
        assert_eq!(config.rebate_window_days, 180);
        assert_eq!(config.full_release_after_days, 180);
        assert_eq!(config.partial_release_after_days, 90);
    }

    #[test]
    fn test_is_rescue() {
        let config = ReconcilerConfig::default();

        assert!(config.is_rescue("J9359"));
        assert!(config.is_rescue("Z51.5"));
        assert!(!config.is_rescue("Q2041"));
        assert!(!config.is_rescue(""));
    }

    #[test]
    fn test_duplicate_patient_id_rejected() {
        let records = vec![
            record("PT-1", date(2023, 6, 1)),
            record("PT-1", date(2023, 7, 1)),
        ];

        let result = reconcile(&records, &[], date(2024, 10, 1), &ReconcilerConfig::default());
        assert_eq!(
            result,
            Err(ReconcileError::DuplicatePatientId {
                patient_id: "PT-1".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_patient_reference_rejected() {
        let records = vec![record("PT-1", date(2023, 6, 1))];
        let claims = vec![rescue("PT-9", date(2023, 8, 1))];

        let result = reconcile(&records, &claims, date(2024, 10, 1), &ReconcilerConfig::default());
        assert_eq!(
            result,
            Err(ReconcileError::MissingPatientReference {
                patient_id: "PT-9".to_string()
            })
        );
    }

    #[test]
    fn test_empty_portfolio_yields_empty_ledger() {
        let ledger =
            reconcile(&[], &[], date(2024, 10, 1), &ReconcilerConfig::default()).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_classify_no_claims_monitoring() {
        let rec = record("PT-1", date(2024, 9, 1));
        let result = classify(&rec, &[], date(2024, 10, 1), &ReconcilerConfig::default());

        assert_eq!(result.days_on_therapy, 30);
        assert_eq!(result.status, PatientStatus::Monitoring);
        assert_eq!(result.cash_impact, 0);
    }

    #[test]
    fn test_classify_failure_inside_window() {
        let rec = record("PT-1", date(2023, 6, 1));
        let event = rescue("PT-1", date(2023, 9, 1)); // day 92
        let result = classify(
            &rec,
            &[&event],
            date(2024, 10, 1),
            &ReconcilerConfig::default(),
        );

        assert_eq!(result.status, PatientStatus::FailureConfirmed);
        assert_eq!(result.cash_impact, 16_800_000 - 42_000_000);
    }

    #[test]
    fn test_non_rescue_codes_never_confirm_failure() {
        let rec = record("PT-1", date(2023, 6, 1));
        let infusion = ClaimEvent::new(
            "PT-1".to_string(),
            date(2023, 6, 1),
            "Q2041".to_string(),
            "CAR-T Infusion".to_string(),
        );
        let result = classify(
            &rec,
            &[&infusion],
            date(2024, 10, 1),
            &ReconcilerConfig::default(),
        );

        assert_eq!(result.status, PatientStatus::SafeRiskExpired);
    }

    #[test]
    fn test_odd_reserve_partial_release_truncates() {
        let rec = InternalRecord::new(
            "PT-1".to_string(),
            date(2024, 5, 1),
            "Commercial Plan".to_string(),
            100,
            3,
            String::new(),
        );
        // 153 days since shipment: partial-release bucket
        let result = classify(&rec, &[], date(2024, 10, 1), &ReconcilerConfig::default());

        assert_eq!(result.status, PatientStatus::LowRiskPartialRelease);
        assert_eq!(result.cash_impact, 1, "3 / 2 cents truncates to 1");
    }
}
