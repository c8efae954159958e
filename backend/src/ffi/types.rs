//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).
//! Row dicts use the same column names as the CSV files, so a Python front
//! end can hand `csv.DictReader` rows straight across the boundary.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use chrono::NaiveDate;

use crate::generator::{ClaimProfile, CohortConfig};
use crate::models::claim::ClaimEvent;
use crate::models::internal::InternalRecord;
use crate::models::reconciliation::ReconciliationRecord;
use crate::reconciler::{LedgerSummary, ReconcilerConfig};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing or the type conversion fails.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

/// Parse a `YYYY-MM-DD` date string, naming the field in the error
pub(crate) fn parse_date(value: &str, field: &str) -> PyResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Invalid date '{}' in '{}': {} (expected YYYY-MM-DD)",
            value, field, e
        ))
    })
}

fn value_error(message: String) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(message)
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to ReconcilerConfig
///
/// All fields are optional and fall back to the standard contract terms:
/// `rescue_codes`, `rebate_window_days`, `full_release_after_days`,
/// `partial_release_after_days`.
///
/// # Errors
///
/// Returns PyErr if:
/// - Type conversions fail
/// - `rescue_codes` is present but empty
/// - A window length is zero or negative
pub fn parse_reconciler_config(py_config: &Bound<'_, PyDict>) -> PyResult<ReconcilerConfig> {
    let defaults = ReconcilerConfig::default();

    let rescue_codes: Vec<String> =
        extract_with_default(py_config, "rescue_codes", defaults.rescue_codes)?;
    if rescue_codes.is_empty() {
        return Err(value_error("rescue_codes must not be empty".to_string()));
    }

    let rebate_window_days: i64 =
        extract_with_default(py_config, "rebate_window_days", defaults.rebate_window_days)?;
    let full_release_after_days: i64 = extract_with_default(
        py_config,
        "full_release_after_days",
        defaults.full_release_after_days,
    )?;
    let partial_release_after_days: i64 = extract_with_default(
        py_config,
        "partial_release_after_days",
        defaults.partial_release_after_days,
    )?;

    for (name, value) in [
        ("rebate_window_days", rebate_window_days),
        ("full_release_after_days", full_release_after_days),
        ("partial_release_after_days", partial_release_after_days),
    ] {
        if value <= 0 {
            return Err(value_error(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
    }

    Ok(ReconcilerConfig {
        rescue_codes,
        rebate_window_days,
        full_release_after_days,
        partial_release_after_days,
    })
}

/// Convert Python dict to CohortConfig
///
/// Every knob is optional; missing fields fall back to the reference
/// portfolio defaults. `enrollment_start` is a `YYYY-MM-DD` string,
/// `therapy` and `rescue_catalog` entries are dicts with `code` and
/// `description`, and `failure_window_days` is a 2-tuple of day offsets.
///
/// # Errors
///
/// Returns PyErr if type conversions fail or a value violates a generator
/// precondition. `CohortGenerator::new` asserts the same preconditions, so
/// they are checked here first and surfaced as ValueError.
pub fn parse_cohort_config(py_config: &Bound<'_, PyDict>) -> PyResult<CohortConfig> {
    let defaults = CohortConfig::default();

    let num_patients: usize =
        extract_with_default(py_config, "num_patients", defaults.num_patients)?;
    let seed: u64 = extract_with_default(py_config, "seed", defaults.seed)?;

    let enrollment_start = match py_config.get_item("enrollment_start")? {
        Some(value) => {
            let raw: String = value.extract()?;
            parse_date(&raw, "enrollment_start")?
        }
        None => defaults.enrollment_start,
    };

    let enrollment_window_days: i64 = extract_with_default(
        py_config,
        "enrollment_window_days",
        defaults.enrollment_window_days,
    )?;
    let revenue_booked: i64 =
        extract_with_default(py_config, "revenue_booked", defaults.revenue_booked)?;
    let reserve_rate_bps: i64 =
        extract_with_default(py_config, "reserve_rate_bps", defaults.reserve_rate_bps)?;
    let payer: String = extract_with_default(py_config, "payer", defaults.payer)?;
    let contract_terms: String =
        extract_with_default(py_config, "contract_terms", defaults.contract_terms)?;

    let therapy = match py_config.get_item("therapy")? {
        Some(value) => {
            let profile_dict: Bound<'_, PyDict> = value.downcast_into()?;
            parse_claim_profile(&profile_dict)?
        }
        None => defaults.therapy,
    };

    let rescue_catalog = match py_config.get_item("rescue_catalog")? {
        Some(value) => {
            let catalog_list: Bound<'_, PyList> = value.downcast_into()?;
            let mut catalog = Vec::new();
            for item in catalog_list.iter() {
                let profile_dict: Bound<'_, PyDict> = item.downcast_into()?;
                catalog.push(parse_claim_profile(&profile_dict)?);
            }
            catalog
        }
        None => defaults.rescue_catalog,
    };

    let failure_probability: f64 = extract_with_default(
        py_config,
        "failure_probability",
        defaults.failure_probability,
    )?;
    let failure_window_days: (i64, i64) = extract_with_default(
        py_config,
        "failure_window_days",
        defaults.failure_window_days,
    )?;

    if num_patients == 0 {
        return Err(value_error("num_patients must be positive".to_string()));
    }
    if revenue_booked <= 0 {
        return Err(value_error(format!(
            "revenue_booked must be positive, got {}",
            revenue_booked
        )));
    }
    if !(0..=10_000).contains(&reserve_rate_bps) {
        return Err(value_error(format!(
            "reserve_rate_bps must be within 0..=10000, got {}",
            reserve_rate_bps
        )));
    }
    if enrollment_window_days < 0 {
        return Err(value_error(format!(
            "enrollment_window_days must be non-negative, got {}",
            enrollment_window_days
        )));
    }
    if failure_window_days.0 > failure_window_days.1 {
        return Err(value_error(format!(
            "failure_window_days must satisfy min <= max, got ({}, {})",
            failure_window_days.0, failure_window_days.1
        )));
    }
    if !(0.0..=1.0).contains(&failure_probability) {
        return Err(value_error(format!(
            "failure_probability must be within [0, 1], got {}",
            failure_probability
        )));
    }
    if failure_probability > 0.0 && rescue_catalog.is_empty() {
        return Err(value_error(
            "rescue_catalog must be non-empty when failures can occur".to_string(),
        ));
    }

    Ok(CohortConfig {
        num_patients,
        seed,
        enrollment_start,
        enrollment_window_days,
        revenue_booked,
        reserve_rate_bps,
        payer,
        contract_terms,
        therapy,
        rescue_catalog,
        failure_probability,
        failure_window_days,
    })
}

fn parse_claim_profile(dict: &Bound<'_, PyDict>) -> PyResult<ClaimProfile> {
    let code: String = extract_required(dict, "code")?;
    let description: String = extract_with_default(dict, "description", String::new())?;

    if code.is_empty() {
        return Err(value_error(
            "claim profile code must not be empty".to_string(),
        ));
    }

    Ok(ClaimProfile { code, description })
}

// ========================================================================
// Row Parsers
// ========================================================================

/// Convert one pharma row dict to an InternalRecord
///
/// Keys match the pharma CSV columns: `Patient_ID`, `Shipment_Date`,
/// `Payer`, `Revenue_Booked_Cents`, `Current_Reserve_Held_Cents`,
/// `Contract_Terms`. Payer and contract terms may be omitted.
///
/// # Errors
///
/// Returns PyValueError on missing fields, bad dates, an empty patient id,
/// non-positive revenue, or a negative reserve.
pub fn parse_internal_record(dict: &Bound<'_, PyDict>) -> PyResult<InternalRecord> {
    let patient_id: String = extract_required(dict, "Patient_ID")?;
    let shipment_raw: String = extract_required(dict, "Shipment_Date")?;
    let shipment_date = parse_date(&shipment_raw, "Shipment_Date")?;
    let payer: String = extract_with_default(dict, "Payer", String::new())?;
    let revenue_booked: i64 = extract_required(dict, "Revenue_Booked_Cents")?;
    let reserve_held: i64 = extract_required(dict, "Current_Reserve_Held_Cents")?;
    let contract_terms: String = extract_with_default(dict, "Contract_Terms", String::new())?;

    if patient_id.is_empty() {
        return Err(value_error("Patient_ID must not be empty".to_string()));
    }
    if revenue_booked <= 0 {
        return Err(value_error(format!(
            "Revenue_Booked_Cents must be positive for '{}', got {}",
            patient_id, revenue_booked
        )));
    }
    if reserve_held < 0 {
        return Err(value_error(format!(
            "Current_Reserve_Held_Cents must be non-negative for '{}', got {}",
            patient_id, reserve_held
        )));
    }

    Ok(InternalRecord::new(
        patient_id,
        shipment_date,
        payer,
        revenue_booked,
        reserve_held,
        contract_terms,
    ))
}

/// Convert one claim row dict to a ClaimEvent
///
/// Keys match the claims CSV columns: `Patient_ID`, `Date`, `Code`,
/// `Description`. Description may be omitted.
pub fn parse_claim_event(dict: &Bound<'_, PyDict>) -> PyResult<ClaimEvent> {
    let patient_id: String = extract_required(dict, "Patient_ID")?;
    let date_raw: String = extract_required(dict, "Date")?;
    let date = parse_date(&date_raw, "Date")?;
    let code: String = extract_required(dict, "Code")?;
    let description: String = extract_with_default(dict, "Description", String::new())?;

    if patient_id.is_empty() {
        return Err(value_error("Patient_ID must not be empty".to_string()));
    }
    if code.is_empty() {
        return Err(value_error(format!(
            "Code must not be empty for '{}'",
            patient_id
        )));
    }

    Ok(ClaimEvent::new(patient_id, date, code, description))
}

/// Parse a list of pharma row dicts
pub fn parse_internal_records(rows: &Bound<'_, PyList>) -> PyResult<Vec<InternalRecord>> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let dict: Bound<'_, PyDict> = row.downcast_into()?;
        records.push(parse_internal_record(&dict)?);
    }
    Ok(records)
}

/// Parse a list of claim row dicts
pub fn parse_claim_events(rows: &Bound<'_, PyList>) -> PyResult<Vec<ClaimEvent>> {
    let mut events = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let dict: Bound<'_, PyDict> = row.downcast_into()?;
        events.push(parse_claim_event(&dict)?);
    }
    Ok(events)
}

// ========================================================================
// Dict Builders
// ========================================================================

/// Convert an InternalRecord to a Python dict keyed by pharma CSV columns
pub fn internal_record_to_py(py: Python, record: &InternalRecord) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("Patient_ID", record.patient_id())?;
    dict.set_item(
        "Shipment_Date",
        record.shipment_date().format("%Y-%m-%d").to_string(),
    )?;
    dict.set_item("Payer", record.payer())?;
    dict.set_item("Revenue_Booked_Cents", record.revenue_booked())?;
    dict.set_item("Current_Reserve_Held_Cents", record.reserve_held())?;
    dict.set_item("Contract_Terms", record.contract_terms())?;

    Ok(dict.into())
}

/// Convert a ClaimEvent to a Python dict keyed by claims CSV columns
pub fn claim_event_to_py(py: Python, event: &ClaimEvent) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("Patient_ID", event.patient_id())?;
    dict.set_item("Date", event.date().format("%Y-%m-%d").to_string())?;
    dict.set_item("Code", event.code())?;
    dict.set_item("Description", event.description())?;

    Ok(dict.into())
}

/// Convert a ReconciliationRecord to a Python dict keyed by ledger CSV columns
///
/// `Status` carries the display label (e.g. "Safe (Risk Expired)").
pub fn reconciliation_record_to_py(
    py: Python,
    record: &ReconciliationRecord,
) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("Patient_ID", &record.patient_id)?;
    dict.set_item("Days_On_Therapy", record.days_on_therapy)?;
    dict.set_item("Current_Reserve_Cents", record.current_reserve)?;
    dict.set_item("Status", record.status.label())?;
    dict.set_item("Cash_Impact_Cents", record.cash_impact)?;

    Ok(dict.into())
}

/// Convert a LedgerSummary plus its fingerprint to a Python dict
///
/// All money values are i64 cents; counts are integers; `fingerprint` is
/// the hex SHA-256 of the canonical ledger.
pub fn ledger_summary_to_py(
    py: Python,
    summary: &LedgerSummary,
    fingerprint: &str,
) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("total_reserves", summary.total_reserves)?;
    dict.set_item("cash_unlock", summary.cash_unlock)?;
    dict.set_item("new_liability", summary.new_liability)?;
    dict.set_item("net_benefit", summary.net_benefit)?;
    dict.set_item("num_patients", summary.num_patients())?;
    dict.set_item("num_monitoring", summary.num_monitoring)?;
    dict.set_item("num_partial_release", summary.num_partial_release)?;
    dict.set_item("num_risk_expired", summary.num_risk_expired)?;
    dict.set_item("num_failures", summary.num_failures)?;
    dict.set_item("fingerprint", fingerprint)?;

    Ok(dict.into())
}
