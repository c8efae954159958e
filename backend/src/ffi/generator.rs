//! PyO3 wrapper for the cohort generator
//!
//! This module provides the Python interface to seeded synthetic cohort
//! generation.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{claim_event_to_py, internal_record_to_py, parse_cohort_config};
use crate::generator::{CohortConfig, CohortGenerator as RustCohortGenerator};

/// Python wrapper for the cohort generator
///
/// Produces the paired pharma and claims row lists for a seeded synthetic
/// patient cohort. The same config always yields the same rows.
///
/// # Example (from Python)
///
/// ```python
/// from biosure_core_rs import CohortGenerator
///
/// gen = CohortGenerator.new({"num_patients": 50, "seed": 7})
/// pharma_rows, claim_rows = gen.generate()
/// print(f"{len(pharma_rows)} patients, {len(claim_rows)} claims")
/// ```
#[pyclass(name = "CohortGenerator")]
pub struct PyCohortGenerator {
    inner: RustCohortGenerator,
}

#[pymethods]
impl PyCohortGenerator {
    /// Create a generator from an optional configuration dict
    ///
    /// # Arguments
    ///
    /// * `config` - Optional dictionary; every `CohortConfig` knob is
    ///   accepted (`num_patients`, `seed`, `enrollment_start`,
    ///   `enrollment_window_days`, `revenue_booked`, `reserve_rate_bps`,
    ///   `payer`, `contract_terms`, `therapy`, `rescue_catalog`,
    ///   `failure_probability`, `failure_window_days`) and missing keys
    ///   fall back to the reference portfolio defaults
    ///
    /// # Returns
    ///
    /// New CohortGenerator instance
    ///
    /// # Errors
    ///
    /// Raises ValueError if a config value is out of range or of the
    /// wrong type
    #[staticmethod]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => parse_cohort_config(dict)?,
            None => CohortConfig::default(),
        };

        Ok(PyCohortGenerator {
            inner: RustCohortGenerator::new(config),
        })
    }

    /// Generate the cohort
    ///
    /// # Returns
    ///
    /// Tuple `(pharma_rows, claim_rows)`:
    /// - `pharma_rows`: List of dicts keyed by the pharma CSV columns, one
    ///   per patient
    /// - `claim_rows`: List of dicts keyed by the claims CSV columns; every
    ///   patient has an infusion claim, failed patients also have a rescue
    ///   claim
    fn generate(&self, py: Python) -> PyResult<(Py<PyList>, Py<PyList>)> {
        let cohort = self.inner.generate();

        let pharma_rows = PyList::empty(py);
        for record in &cohort.internal {
            pharma_rows.append(internal_record_to_py(py, record)?)?;
        }

        let claim_rows = PyList::empty(py);
        for event in &cohort.claims {
            claim_rows.append(claim_event_to_py(py, event)?)?;
        }

        Ok((pharma_rows.into(), claim_rows.into()))
    }

    /// Seed this generator draws from
    fn seed(&self) -> u64 {
        self.inner.config().seed
    }

    /// Number of patients in the cohort
    fn num_patients(&self) -> usize {
        self.inner.config().num_patients
    }
}
