//! Reconciliation output model
//!
//! The derived, per-patient result of a reconciliation run: how long the
//! patient has been on therapy, which bucket of the decision table they fall
//! into, and the signed cash impact on the held reserve. Recomputed fresh on
//! every run, never persisted by the core.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Patient status after reconciliation
///
/// Closed set; the serialized form and `Display` output are the exact labels
/// downstream consumers key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientStatus {
    /// Inside the 90-day window; reserve stays put
    #[serde(rename = "Monitoring")]
    Monitoring,

    /// Past 90 days without failure; half the reserve can be released
    #[serde(rename = "Low Risk (Partial Release)")]
    LowRiskPartialRelease,

    /// Past the 180-day rebate window without failure; full reserve released
    #[serde(rename = "Safe (Risk Expired)")]
    SafeRiskExpired,

    /// A rescue event confirmed treatment failure
    #[serde(rename = "Failure Confirmed")]
    FailureConfirmed,
}

impl PatientStatus {
    /// The fixed display label for this status
    pub fn label(&self) -> &'static str {
        match self {
            PatientStatus::Monitoring => "Monitoring",
            PatientStatus::LowRiskPartialRelease => "Low Risk (Partial Release)",
            PatientStatus::SafeRiskExpired => "Safe (Risk Expired)",
            PatientStatus::FailureConfirmed => "Failure Confirmed",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-patient reconciliation result
///
/// Exactly one per internal record. `cash_impact` is signed: positive means
/// reserve releasable now, negative means liability beyond the held reserve.
///
/// # Example
/// ```
/// use biosure_core_rs::{PatientStatus, ReconciliationRecord};
///
/// let record = ReconciliationRecord {
///     patient_id: "PT-10000".to_string(),
///     days_on_therapy: 120,
///     current_reserve: 16_800_000,
///     status: PatientStatus::LowRiskPartialRelease,
///     cash_impact: 8_400_000,
/// };
///
/// assert_eq!(record.status.label(), "Low Risk (Partial Release)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    /// Patient identifier
    pub patient_id: String,

    /// Whole days from shipment date to the as-of date (may be negative)
    pub days_on_therapy: i64,

    /// Reserve currently held (i64 cents)
    pub current_reserve: i64,

    /// Decision-table bucket
    pub status: PatientStatus,

    /// Signed cash impact (i64 cents)
    pub cash_impact: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(PatientStatus::Monitoring.label(), "Monitoring");
        assert_eq!(
            PatientStatus::LowRiskPartialRelease.label(),
            "Low Risk (Partial Release)"
        );
        assert_eq!(PatientStatus::SafeRiskExpired.label(), "Safe (Risk Expired)");
        assert_eq!(PatientStatus::FailureConfirmed.label(), "Failure Confirmed");
    }

    #[test]
    fn test_display_matches_label() {
        for status in [
            PatientStatus::Monitoring,
            PatientStatus::LowRiskPartialRelease,
            PatientStatus::SafeRiskExpired,
            PatientStatus::FailureConfirmed,
        ] {
            assert_eq!(status.to_string(), status.label());
        }
    }

    #[test]
    fn test_status_serializes_to_label() {
        let json = serde_json::to_string(&PatientStatus::SafeRiskExpired).unwrap();
        assert_eq!(json, "\"Safe (Risk Expired)\"");

        let back: PatientStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PatientStatus::SafeRiskExpired);
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = ReconciliationRecord {
            patient_id: "PT-10007".to_string(),
            days_on_therapy: -12,
            current_reserve: 16_800_000,
            status: PatientStatus::Monitoring,
            cash_impact: 0,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: ReconciliationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
