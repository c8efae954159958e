//! PyO3 wrapper for the reconciler
//!
//! This module provides the Python interface to the Rust reconciliation
//! engine.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{
    ledger_summary_to_py, parse_claim_events, parse_date, parse_internal_records,
    parse_reconciler_config, reconciliation_record_to_py,
};
use crate::reconciler::{ledger_fingerprint, reconcile, LedgerSummary, ReconcilerConfig};

/// Python wrapper for the reconciliation engine
///
/// Holds a `ReconcilerConfig` and runs the decision table over row dicts.
///
/// # Example (from Python)
///
/// ```python
/// from biosure_core_rs import Reconciler
///
/// recon = Reconciler.new()
/// ledger = recon.analyze(pharma_rows, claim_rows, "2024-10-01")
/// for row in ledger:
///     print(row["Patient_ID"], row["Status"], row["Cash_Impact_Cents"])
/// ```
#[pyclass(name = "Reconciler")]
pub struct PyReconciler {
    config: ReconcilerConfig,
}

#[pymethods]
impl PyReconciler {
    /// Create a reconciler from an optional configuration dict
    ///
    /// # Arguments
    ///
    /// * `config` - Optional dictionary with `rescue_codes`,
    ///   `rebate_window_days`, `full_release_after_days`,
    ///   `partial_release_after_days`; missing keys fall back to the
    ///   standard contract terms
    ///
    /// # Returns
    ///
    /// New Reconciler instance
    ///
    /// # Errors
    ///
    /// Raises ValueError if a config value is out of range or of the
    /// wrong type
    #[staticmethod]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => parse_reconciler_config(dict)?,
            None => ReconcilerConfig::default(),
        };

        Ok(PyReconciler { config })
    }

    /// Reconcile a portfolio snapshot against a claims feed
    ///
    /// # Arguments
    ///
    /// * `pharma_rows` - List of pharma row dicts (pharma CSV columns)
    /// * `claim_rows` - List of claim row dicts (claims CSV columns)
    /// * `as_of` - Valuation date as a `YYYY-MM-DD` string
    ///
    /// # Returns
    ///
    /// List of ledger row dicts, one per pharma row, in input order:
    /// - `Patient_ID`: Patient identifier
    /// - `Days_On_Therapy`: Whole days from shipment to the as-of date
    /// - `Current_Reserve_Cents`: Reserve held (i64 cents)
    /// - `Status`: One of "Monitoring", "Low Risk (Partial Release)",
    ///   "Safe (Risk Expired)", "Failure Confirmed"
    /// - `Cash_Impact_Cents`: Signed cash impact (i64 cents)
    ///
    /// # Errors
    ///
    /// Raises ValueError if a row fails validation, a claim references an
    /// unknown patient, or two pharma rows share a patient id
    fn analyze(
        &self,
        py: Python,
        pharma_rows: &Bound<'_, PyList>,
        claim_rows: &Bound<'_, PyList>,
        as_of: &str,
    ) -> PyResult<Py<PyList>> {
        let records = parse_internal_records(pharma_rows)?;
        let claims = parse_claim_events(claim_rows)?;
        let as_of = parse_date(as_of, "as_of")?;

        let ledger = reconcile(&records, &claims, as_of, &self.config)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;

        let py_ledger = PyList::empty(py);
        for record in &ledger {
            py_ledger.append(reconciliation_record_to_py(py, record)?)?;
        }

        Ok(py_ledger.into())
    }

    /// Reconcile and aggregate into a portfolio summary
    ///
    /// Runs the same reconciliation as `analyze` and folds the ledger into
    /// portfolio totals.
    ///
    /// # Returns
    ///
    /// Dictionary with i64-cent totals and counts:
    /// - `total_reserves`: Sum of reserves held
    /// - `cash_unlock`: Sum of positive cash impacts
    /// - `new_liability`: Sum of negative cash impacts
    /// - `net_benefit`: Sum of all cash impacts
    /// - `num_patients`, `num_monitoring`, `num_partial_release`,
    ///   `num_risk_expired`, `num_failures`: Bucket counts
    /// - `fingerprint`: Hex SHA-256 of the canonical ledger
    ///
    /// # Errors
    ///
    /// Raises ValueError on the same conditions as `analyze`
    fn summarize(
        &self,
        py: Python,
        pharma_rows: &Bound<'_, PyList>,
        claim_rows: &Bound<'_, PyList>,
        as_of: &str,
    ) -> PyResult<Py<PyDict>> {
        let records = parse_internal_records(pharma_rows)?;
        let claims = parse_claim_events(claim_rows)?;
        let as_of = parse_date(as_of, "as_of")?;

        let ledger = reconcile(&records, &claims, as_of, &self.config)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;

        let summary = LedgerSummary::from_records(&ledger);
        let fingerprint = ledger_fingerprint(&ledger).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Failed to fingerprint ledger: {}",
                e
            ))
        })?;

        ledger_summary_to_py(py, &summary, &fingerprint)
    }

    /// Rescue codes this reconciler treats as failure evidence
    fn rescue_codes(&self) -> Vec<String> {
        self.config.rescue_codes.clone()
    }

    /// Length of the rebate window in days
    fn rebate_window_days(&self) -> i64 {
        self.config.rebate_window_days
    }
}
