//! BioSure Reconciliation Core - Rust Engine
//!
//! Deterministic revenue-reserve reconciliation for outcome-based therapy
//! contracts.
//!
//! # Architecture
//!
//! - **models**: Domain types (InternalRecord, ClaimEvent, ReconciliationRecord)
//! - **reconciler**: Decision-table engine, ledger summary, fingerprint
//! - **generator**: Seeded synthetic cohort generation
//! - **store**: CSV load/save for the pharma, claims, and ledger files
//! - **forecast**: Reserve-rate calibration series
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Reconciliation is a pure function of its inputs
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod forecast;
pub mod generator;
pub mod models;
pub mod reconciler;
pub mod rng;
pub mod store;

// Re-exports for convenience
pub use forecast::{reserve_rate_evolution, CalibrationSource, ReserveRatePoint};
pub use generator::{ClaimProfile, CohortConfig, CohortGenerator, GeneratedCohort};
pub use models::{
    claim::{ClaimEvent, CODE_CART_INFUSION, CODE_GLOFITAMAB, CODE_HOSPICE},
    internal::InternalRecord,
    reconciliation::{PatientStatus, ReconciliationRecord},
};
pub use reconciler::{
    ledger_fingerprint, reconcile, sorted_by_cash_impact, LedgerSummary, ReconcileError,
    ReconcilerConfig,
};
pub use rng::RngManager;
pub use store::{
    load_claim_events, load_internal_records, load_ledger, save_claim_events,
    save_internal_records, save_ledger, StoreError, CLAIMS_CSV, LEDGER_CSV, PHARMA_CSV,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn biosure_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::PyCohortGenerator>()?;
    m.add_class::<ffi::PyReconciler>()?;
    Ok(())
}
