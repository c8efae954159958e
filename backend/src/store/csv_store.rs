//! CSV readers and writers for the three row shapes
//!
//! Columns:
//! - pharma: `Patient_ID, Shipment_Date, Payer, Revenue_Booked_Cents,
//!   Current_Reserve_Held_Cents, Contract_Terms`
//! - claims: `Patient_ID, Date, Code, Description`
//! - ledger: `Patient_ID, Days_On_Therapy, Current_Reserve_Cents, Status,
//!   Cash_Impact_Cents`
//!
//! Dates are `%Y-%m-%d`; money columns are i64 cents. Loading validates what
//! serde cannot (empty ids, non-positive revenue) and reports the offending
//! row number; nothing is ever silently skipped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::claim::ClaimEvent;
use crate::models::internal::InternalRecord;
use crate::models::reconciliation::{PatientStatus, ReconciliationRecord};

/// Default pharma snapshot filename
pub const PHARMA_CSV: &str = "biosure_pharma.csv";

/// Default claims feed filename
pub const CLAIMS_CSV: &str = "biosure_claims.csv";

/// Default reconciliation ledger filename
pub const LEDGER_CSV: &str = "biosure_ledger.csv";

/// Errors from CSV load/save
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct InternalRow {
    #[serde(rename = "Patient_ID")]
    patient_id: String,

    #[serde(rename = "Shipment_Date")]
    shipment_date: NaiveDate,

    #[serde(rename = "Payer")]
    payer: String,

    #[serde(rename = "Revenue_Booked_Cents")]
    revenue_booked_cents: i64,

    #[serde(rename = "Current_Reserve_Held_Cents")]
    current_reserve_held_cents: i64,

    #[serde(rename = "Contract_Terms")]
    contract_terms: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClaimRow {
    #[serde(rename = "Patient_ID")]
    patient_id: String,

    #[serde(rename = "Date")]
    date: NaiveDate,

    #[serde(rename = "Code")]
    code: String,

    #[serde(rename = "Description")]
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(rename = "Patient_ID")]
    patient_id: String,

    #[serde(rename = "Days_On_Therapy")]
    days_on_therapy: i64,

    #[serde(rename = "Current_Reserve_Cents")]
    current_reserve_cents: i64,

    #[serde(rename = "Status")]
    status: PatientStatus,

    #[serde(rename = "Cash_Impact_Cents")]
    cash_impact_cents: i64,
}

/// Load internal pharma records from CSV
///
/// # Errors
/// Fails on missing file, malformed rows, empty patient ids, non-positive
/// revenue, or negative reserves. Row numbers in errors count the header as
/// row 1.
pub fn load_internal_records(path: impl AsRef<Path>) -> Result<Vec<InternalRecord>, StoreError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<InternalRow>().enumerate() {
        let row = row?;
        let row_number = index + 2;

        if row.patient_id.is_empty() {
            return Err(StoreError::InvalidRecord {
                row: row_number,
                reason: "empty Patient_ID".to_string(),
            });
        }
        if row.revenue_booked_cents <= 0 {
            return Err(StoreError::InvalidRecord {
                row: row_number,
                reason: format!(
                    "Revenue_Booked_Cents must be positive, got {}",
                    row.revenue_booked_cents
                ),
            });
        }
        if row.current_reserve_held_cents < 0 {
            return Err(StoreError::InvalidRecord {
                row: row_number,
                reason: format!(
                    "Current_Reserve_Held_Cents must be non-negative, got {}",
                    row.current_reserve_held_cents
                ),
            });
        }

        records.push(InternalRecord::new(
            row.patient_id,
            row.shipment_date,
            row.payer,
            row.revenue_booked_cents,
            row.current_reserve_held_cents,
            row.contract_terms,
        ));
    }

    info!(count = records.len(), path = %path.display(), "loaded internal records");
    Ok(records)
}

/// Save internal pharma records to CSV
pub fn save_internal_records(
    records: &[InternalRecord],
    path: impl AsRef<Path>,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    for record in records {
        writer.serialize(InternalRow {
            patient_id: record.patient_id().to_string(),
            shipment_date: record.shipment_date(),
            payer: record.payer().to_string(),
            revenue_booked_cents: record.revenue_booked(),
            current_reserve_held_cents: record.reserve_held(),
            contract_terms: record.contract_terms().to_string(),
        })?;
    }
    writer.flush()?;

    info!(count = records.len(), path = %path.display(), "saved internal records");
    Ok(())
}

/// Load claim events from CSV
///
/// # Errors
/// Fails on missing file, malformed rows, empty patient ids, or empty codes.
pub fn load_claim_events(path: impl AsRef<Path>) -> Result<Vec<ClaimEvent>, StoreError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut events = Vec::new();
    for (index, row) in reader.deserialize::<ClaimRow>().enumerate() {
        let row = row?;
        let row_number = index + 2;

        if row.patient_id.is_empty() {
            return Err(StoreError::InvalidRecord {
                row: row_number,
                reason: "empty Patient_ID".to_string(),
            });
        }
        if row.code.is_empty() {
            return Err(StoreError::InvalidRecord {
                row: row_number,
                reason: "empty Code".to_string(),
            });
        }

        events.push(ClaimEvent::new(
            row.patient_id,
            row.date,
            row.code,
            row.description,
        ));
    }

    info!(count = events.len(), path = %path.display(), "loaded claim events");
    Ok(events)
}

/// Save claim events to CSV
pub fn save_claim_events(events: &[ClaimEvent], path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    for event in events {
        writer.serialize(ClaimRow {
            patient_id: event.patient_id().to_string(),
            date: event.date(),
            code: event.code().to_string(),
            description: event.description().to_string(),
        })?;
    }
    writer.flush()?;

    info!(count = events.len(), path = %path.display(), "saved claim events");
    Ok(())
}

/// Load a reconciliation ledger from CSV
///
/// Status cells must be the exact display labels the reconciler emits.
pub fn load_ledger(path: impl AsRef<Path>) -> Result<Vec<ReconciliationRecord>, StoreError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut ledger = Vec::new();
    for row in reader.deserialize::<LedgerRow>() {
        let row = row?;
        ledger.push(ReconciliationRecord {
            patient_id: row.patient_id,
            days_on_therapy: row.days_on_therapy,
            current_reserve: row.current_reserve_cents,
            status: row.status,
            cash_impact: row.cash_impact_cents,
        });
    }

    info!(count = ledger.len(), path = %path.display(), "loaded ledger");
    Ok(ledger)
}

/// Save a reconciliation ledger to CSV
pub fn save_ledger(
    ledger: &[ReconciliationRecord],
    path: impl AsRef<Path>,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    for record in ledger {
        writer.serialize(LedgerRow {
            patient_id: record.patient_id.clone(),
            days_on_therapy: record.days_on_therapy,
            current_reserve_cents: record.current_reserve,
            status: record.status,
            cash_impact_cents: record.cash_impact,
        })?;
    }
    writer.flush()?;

    info!(count = ledger.len(), path = %path.display(), "saved ledger");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_internal_records_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PHARMA_CSV);

        let records = vec![InternalRecord::new(
            "PT-10000".to_string(),
            date(2023, 6, 1),
            "Commercial Plan".to_string(),
            42_000_000,
            16_800_000,
            "100% Rebate if Fail < 6mo".to_string(),
        )];

        save_internal_records(&records, &path).unwrap();
        let loaded = load_internal_records(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_internal_header_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PHARMA_CSV);

        save_internal_records(
            &[InternalRecord::new(
                "PT-10000".to_string(),
                date(2023, 6, 1),
                "Commercial Plan".to_string(),
                42_000_000,
                16_800_000,
                String::new(),
            )],
            &path,
        )
        .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "Patient_ID,Shipment_Date,Payer,Revenue_Booked_Cents,\
             Current_Reserve_Held_Cents,Contract_Terms"
        );
        assert!(contents.contains("2023-06-01"));
    }

    #[test]
    fn test_claim_events_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CLAIMS_CSV);

        let events = vec![
            ClaimEvent::new(
                "PT-10000".to_string(),
                date(2023, 6, 1),
                "Q2041".to_string(),
                "CAR-T Infusion".to_string(),
            ),
            ClaimEvent::new(
                "PT-10000".to_string(),
                date(2023, 8, 14),
                "Z51.5".to_string(),
                "Hospice".to_string(),
            ),
        ];

        save_claim_events(&events, &path).unwrap();
        let loaded = load_claim_events(&path).unwrap();
        assert_eq!(loaded, events);
    }

    #[test]
    fn test_ledger_round_trip_preserves_status_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEDGER_CSV);

        let ledger = vec![ReconciliationRecord {
            patient_id: "PT-10000".to_string(),
            days_on_therapy: 488,
            current_reserve: 16_800_000,
            status: PatientStatus::SafeRiskExpired,
            cash_impact: 16_800_000,
        }];

        save_ledger(&ledger, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(
            contents.contains("Safe (Risk Expired)"),
            "status column must carry the display label, got:\n{}",
            contents
        );

        let loaded = load_ledger(&path).unwrap();
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_internal_records(dir.path().join("nope.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_unparseable_date_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CLAIMS_CSV);
        fs::write(
            &path,
            "Patient_ID,Date,Code,Description\nPT-1,06/01/2023,Q2041,CAR-T Infusion\n",
        )
        .unwrap();

        assert!(load_claim_events(&path).is_err());
    }

    #[test]
    fn test_non_positive_revenue_rejected_with_row_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PHARMA_CSV);
        fs::write(
            &path,
            "Patient_ID,Shipment_Date,Payer,Revenue_Booked_Cents,\
             Current_Reserve_Held_Cents,Contract_Terms\n\
             PT-1,2023-06-01,Commercial Plan,0,0,terms\n",
        )
        .unwrap();

        match load_internal_records(&path) {
            Err(StoreError::InvalidRecord { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status_label_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEDGER_CSV);
        fs::write(
            &path,
            "Patient_ID,Days_On_Therapy,Current_Reserve_Cents,Status,Cash_Impact_Cents\n\
             PT-1,100,1000,Definitely Fine,0\n",
        )
        .unwrap();

        assert!(load_ledger(&path).is_err());
    }
}
