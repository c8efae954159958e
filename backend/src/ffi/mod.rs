//! Python FFI boundary
//!
//! PyO3 wrappers exposing the reconciler and cohort generator to Python.
//! Data crosses the boundary as row dicts keyed by the CSV column names;
//! conversion lives in `types`, the classes in `reconciler` and
//! `generator`.

pub mod generator;
pub mod reconciler;
pub mod types;

pub use generator::PyCohortGenerator;
pub use reconciler::PyReconciler;
