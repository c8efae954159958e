//! Portfolio reconciliation
//!
//! The engine applies the outcome-based-contract decision table patient by
//! patient; the summary module aggregates and fingerprints the resulting
//! ledger. Both are pure computations over in-memory snapshots.

pub mod engine;
pub mod summary;

pub use engine::{reconcile, ReconcileError, ReconcilerConfig};
pub use summary::{ledger_fingerprint, sorted_by_cash_impact, LedgerSummary};
