//! CSV persistence for portfolio snapshots and ledgers
//!
//! The reconciler core never touches files; this module owns the on-disk
//! format. Three row shapes, all ISO dates and integer-cent amounts, so a
//! write-then-read round trip is exact.

mod csv_store;

pub use csv_store::{
    load_claim_events, load_internal_records, load_ledger, save_claim_events,
    save_internal_records, save_ledger, StoreError, CLAIMS_CSV, LEDGER_CSV, PHARMA_CSV,
};
