//! External claim event model
//!
//! Claim events arrive from payer feeds: the initial therapy administration
//! plus any later events for the same patient. A small set of codes marks a
//! "rescue" intervention (second-line therapy, hospice referral), which the
//! reconciler reads as evidence of treatment failure. Codes are free-form
//! strings; the known catalog below covers the reference contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// CAR-T infusion claim code (the initial therapy administration)
pub const CODE_CART_INFUSION: &str = "Q2041";

/// Glofitamab (Columvi) second-line therapy claim code
pub const CODE_GLOFITAMAB: &str = "J9359";

/// Hospice referral claim code
pub const CODE_HOSPICE: &str = "Z51.5";

/// One claim event for one patient
///
/// Zero or more events may exist per patient. Events are immutable once
/// created and carry no identity of their own; (patient, date, code) is not
/// assumed unique.
///
/// # Example
/// ```
/// use biosure_core_rs::{ClaimEvent, CODE_CART_INFUSION};
/// use chrono::NaiveDate;
///
/// let event = ClaimEvent::new(
///     "PT-10000".to_string(),
///     NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     CODE_CART_INFUSION.to_string(),
///     "CAR-T Infusion".to_string(),
/// );
///
/// assert_eq!(event.code(), "Q2041");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvent {
    /// Patient identifier (foreign key into the internal-record set)
    patient_id: String,

    /// Date the claim event occurred
    date: NaiveDate,

    /// Claim code (free-form string)
    code: String,

    /// Free-text description
    description: String,
}

impl ClaimEvent {
    /// Create a new claim event
    ///
    /// # Panics
    /// Panics if `patient_id` or `code` is empty.
    pub fn new(patient_id: String, date: NaiveDate, code: String, description: String) -> Self {
        assert!(!patient_id.is_empty(), "patient_id must be non-empty");
        assert!(!code.is_empty(), "code must be non-empty");

        Self {
            patient_id,
            date,
            code,
            description,
        }
    }

    /// Patient identifier this event references
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Event date
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Claim code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Free-text description
    pub fn description(&self) -> &str {
        &self.description
    }
}
