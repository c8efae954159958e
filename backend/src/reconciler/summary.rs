//! Ledger aggregation and fingerprinting
//!
//! Derived views over a reconciliation ledger:
//! - `LedgerSummary`: the portfolio-level cash picture (total reserves,
//!   cash unlock, new liability, net benefit) plus per-status counts
//! - `sorted_by_cash_impact`: the deterministic presentation order
//! - `ledger_fingerprint`: canonical-JSON SHA-256 digest, used to verify
//!   that two runs produced bit-identical ledgers
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::reconciliation::{PatientStatus, ReconciliationRecord};

/// Portfolio-level aggregate of one reconciliation run
///
/// Invariant: `net_benefit == cash_unlock + new_liability`, and the four
/// status counts sum to the ledger length.
///
/// # Example
/// ```
/// use biosure_core_rs::{LedgerSummary, PatientStatus, ReconciliationRecord};
///
/// let ledger = vec![ReconciliationRecord {
///     patient_id: "PT-10000".to_string(),
///     days_on_therapy: 200,
///     current_reserve: 16_800_000,
///     status: PatientStatus::SafeRiskExpired,
///     cash_impact: 16_800_000,
/// }];
///
/// let summary = LedgerSummary::from_records(&ledger);
/// assert_eq!(summary.cash_unlock, 16_800_000);
/// assert_eq!(summary.net_benefit, 16_800_000);
/// assert_eq!(summary.num_risk_expired, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Sum of reserves held across the portfolio (i64 cents)
    pub total_reserves: i64,

    /// Sum of strictly positive cash impacts (i64 cents)
    pub cash_unlock: i64,

    /// Sum of strictly negative cash impacts (i64 cents, itself <= 0)
    pub new_liability: i64,

    /// Sum of all cash impacts (i64 cents)
    pub net_benefit: i64,

    /// Patients still inside the monitoring window
    pub num_monitoring: usize,

    /// Patients eligible for partial reserve release
    pub num_partial_release: usize,

    /// Patients whose rebate risk has expired
    pub num_risk_expired: usize,

    /// Patients with a confirmed failure event
    pub num_failures: usize,
}

impl LedgerSummary {
    /// Aggregate a ledger in one pass
    pub fn from_records(records: &[ReconciliationRecord]) -> Self {
        let mut summary = LedgerSummary::default();

        for record in records {
            summary.total_reserves += record.current_reserve;
            summary.net_benefit += record.cash_impact;
            if record.cash_impact > 0 {
                summary.cash_unlock += record.cash_impact;
            } else if record.cash_impact < 0 {
                summary.new_liability += record.cash_impact;
            }

            match record.status {
                PatientStatus::Monitoring => summary.num_monitoring += 1,
                PatientStatus::LowRiskPartialRelease => summary.num_partial_release += 1,
                PatientStatus::SafeRiskExpired => summary.num_risk_expired += 1,
                PatientStatus::FailureConfirmed => summary.num_failures += 1,
            }
        }

        summary
    }

    /// Total number of patients covered by this summary
    pub fn num_patients(&self) -> usize {
        self.num_monitoring + self.num_partial_release + self.num_risk_expired + self.num_failures
    }
}

/// Clone a ledger into presentation order
///
/// Cash impact descending, ties broken by patient id ascending. The
/// reconciler itself emits input order; this is the order front ends show.
pub fn sorted_by_cash_impact(records: &[ReconciliationRecord]) -> Vec<ReconciliationRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        b.cash_impact
            .cmp(&a.cash_impact)
            .then_with(|| a.patient_id.cmp(&b.patient_id))
    });
    sorted
}

/// Compute the SHA-256 fingerprint of a ledger
///
/// Uses canonical JSON serialization with recursively sorted object keys,
/// so the digest depends only on the ledger's content and order, never on
/// map iteration order. Two reconciliation runs over identical inputs must
/// produce identical fingerprints.
///
/// # Returns
/// Lowercase hex digest.
pub fn ledger_fingerprint(
    records: &[ReconciliationRecord],
) -> Result<String, serde_json::Error> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(records)?;

    // Recursively sort all object keys for a canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(patient_id: &str, status: PatientStatus, cash_impact: i64) -> ReconciliationRecord {
        ReconciliationRecord {
            patient_id: patient_id.to_string(),
            days_on_therapy: 100,
            current_reserve: 16_800_000,
            status,
            cash_impact,
        }
    }

    #[test]
    fn test_empty_ledger_summary_is_zero() {
        let summary = LedgerSummary::from_records(&[]);
        assert_eq!(summary, LedgerSummary::default());
        assert_eq!(summary.num_patients(), 0);
    }

    #[test]
    fn test_summary_splits_signs() {
        let ledger = vec![
            entry("PT-1", PatientStatus::SafeRiskExpired, 16_800_000),
            entry("PT-2", PatientStatus::FailureConfirmed, -25_200_000),
            entry("PT-3", PatientStatus::Monitoring, 0),
        ];

        let summary = LedgerSummary::from_records(&ledger);

        assert_eq!(summary.total_reserves, 3 * 16_800_000);
        assert_eq!(summary.cash_unlock, 16_800_000);
        assert_eq!(summary.new_liability, -25_200_000);
        assert_eq!(summary.net_benefit, 16_800_000 - 25_200_000);
        assert_eq!(summary.num_patients(), 3);
    }

    #[test]
    fn test_sort_is_descending_with_stable_ties() {
        let ledger = vec![
            entry("PT-2", PatientStatus::SafeRiskExpired, 100),
            entry("PT-3", PatientStatus::FailureConfirmed, -50),
            entry("PT-1", PatientStatus::SafeRiskExpired, 100),
        ];

        let sorted = sorted_by_cash_impact(&ledger);
        let ids: Vec<&str> = sorted.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["PT-1", "PT-2", "PT-3"]);
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let ledger = vec![entry("PT-1", PatientStatus::Monitoring, 0)];

        let fp1 = ledger_fingerprint(&ledger).unwrap();
        let fp2 = ledger_fingerprint(&ledger).unwrap();
        assert_eq!(fp1, fp2);
        assert_eq!(fp1.len(), 64, "expected a hex-encoded SHA-256 digest");
    }

    #[test]
    fn test_fingerprint_sensitive_to_any_field() {
        let base = vec![entry("PT-1", PatientStatus::Monitoring, 0)];
        let changed = vec![entry("PT-1", PatientStatus::Monitoring, 1)];

        assert_ne!(
            ledger_fingerprint(&base).unwrap(),
            ledger_fingerprint(&changed).unwrap()
        );
    }
}
