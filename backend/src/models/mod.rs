//! Domain models for the portfolio reconciler

pub mod claim;
pub mod internal;
pub mod reconciliation;

// Re-exports
pub use claim::{ClaimEvent, CODE_CART_INFUSION, CODE_GLOFITAMAB, CODE_HOSPICE};
pub use internal::InternalRecord;
pub use reconciliation::{PatientStatus, ReconciliationRecord};
