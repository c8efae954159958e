//! Internal pharma record model
//!
//! One record per patient, created when the therapy shipment is booked:
//! - Patient identifier (unique key across the portfolio)
//! - Shipment/infusion date
//! - Payer name
//! - Booked revenue and the reserve currently held against it
//! - Contract-term descriptor (free text, never parsed)
//!
//! Records are immutable once created; the reconciler only reads them.
//!
//! CRITICAL: All money values are i64 (cents)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Internal financial record for one patient
///
/// # Example
/// ```
/// use biosure_core_rs::InternalRecord;
/// use chrono::NaiveDate;
///
/// let record = InternalRecord::new(
///     "PT-10000".to_string(),
///     NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     "Commercial Plan".to_string(),
///     42_000_000, // $420,000.00 in cents
///     16_800_000, // $168,000.00 in cents
///     "100% Rebate if Fail < 6mo".to_string(),
/// );
///
/// assert_eq!(record.patient_id(), "PT-10000");
/// assert_eq!(record.revenue_booked(), 42_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalRecord {
    /// Patient identifier (unique key)
    patient_id: String,

    /// Date the therapy shipped / was infused
    shipment_date: NaiveDate,

    /// Payer name (free text)
    payer: String,

    /// Revenue booked for this patient (i64 cents)
    revenue_booked: i64,

    /// Reserve currently held against possible rebate (i64 cents)
    reserve_held: i64,

    /// Contract terms descriptor (free text, not parsed)
    contract_terms: String,
}

impl InternalRecord {
    /// Create a new internal record
    ///
    /// # Arguments
    /// * `patient_id` - Unique patient identifier (non-empty)
    /// * `shipment_date` - Therapy shipment/infusion date
    /// * `payer` - Payer name
    /// * `revenue_booked` - Booked revenue in cents (must be positive)
    /// * `reserve_held` - Reserve held in cents (must be non-negative)
    /// * `contract_terms` - Contract descriptor
    ///
    /// # Panics
    /// Panics if `patient_id` is empty, `revenue_booked <= 0`, or
    /// `reserve_held < 0`. Data loaded from external files goes through the
    /// store's checked validation instead of this constructor's asserts.
    pub fn new(
        patient_id: String,
        shipment_date: NaiveDate,
        payer: String,
        revenue_booked: i64,
        reserve_held: i64,
        contract_terms: String,
    ) -> Self {
        assert!(!patient_id.is_empty(), "patient_id must be non-empty");
        assert!(revenue_booked > 0, "revenue_booked must be positive");
        assert!(reserve_held >= 0, "reserve_held must be non-negative");

        Self {
            patient_id,
            shipment_date,
            payer,
            revenue_booked,
            reserve_held,
            contract_terms,
        }
    }

    /// Patient identifier
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Shipment/infusion date
    pub fn shipment_date(&self) -> NaiveDate {
        self.shipment_date
    }

    /// Payer name
    pub fn payer(&self) -> &str {
        &self.payer
    }

    /// Booked revenue in cents
    pub fn revenue_booked(&self) -> i64 {
        self.revenue_booked
    }

    /// Reserve held in cents
    pub fn reserve_held(&self) -> i64 {
        self.reserve_held
    }

    /// Contract terms descriptor
    pub fn contract_terms(&self) -> &str {
        &self.contract_terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_record() -> InternalRecord {
        InternalRecord::new(
            "PT-10000".to_string(),
            date(2023, 6, 1),
            "Commercial Plan".to_string(),
            42_000_000,
            16_800_000,
            "100% Rebate if Fail < 6mo".to_string(),
        )
    }

    #[test]
    fn test_record_creation() {
        let record = sample_record();

        assert_eq!(record.patient_id(), "PT-10000");
        assert_eq!(record.shipment_date(), date(2023, 6, 1));
        assert_eq!(record.payer(), "Commercial Plan");
        assert_eq!(record.revenue_booked(), 42_000_000);
        assert_eq!(record.reserve_held(), 16_800_000);
        assert_eq!(record.contract_terms(), "100% Rebate if Fail < 6mo");
    }

    #[test]
    #[should_panic(expected = "patient_id must be non-empty")]
    fn test_empty_patient_id_panics() {
        InternalRecord::new(
            String::new(),
            date(2023, 6, 1),
            "Commercial Plan".to_string(),
            42_000_000,
            16_800_000,
            String::new(),
        );
    }

    #[test]
    #[should_panic(expected = "revenue_booked must be positive")]
    fn test_zero_revenue_panics() {
        InternalRecord::new(
            "PT-10000".to_string(),
            date(2023, 6, 1),
            "Commercial Plan".to_string(),
            0,
            0,
            String::new(),
        );
    }

    #[test]
    #[should_panic(expected = "reserve_held must be non-negative")]
    fn test_negative_reserve_panics() {
        InternalRecord::new(
            "PT-10000".to_string(),
            date(2023, 6, 1),
            "Commercial Plan".to_string(),
            42_000_000,
            -1,
            String::new(),
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: InternalRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
