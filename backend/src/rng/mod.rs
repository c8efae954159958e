//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, deterministic draws. CRITICAL: all randomness
//! in cohort generation MUST go through this module; reproducibility of a
//! seeded cohort is a contract, not a convenience.

mod xorshift;

pub use xorshift::RngManager;
