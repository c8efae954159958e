//! Synthetic cohort generation for deterministic pipeline runs
//!
//! Builds a full portfolio snapshot (internal records plus claim events)
//! from a seeded config, so the reconciler can be exercised without a real
//! claims feed.
//!
//! # Key Principles
//!
//! 1. **Determinism**: same seed + same config → the same cohort, element
//!    for element. `generate` is idempotent; it never advances shared state.
//! 2. **Fixed draw order**: per patient the stream is consumed as
//!    enrollment offset, failure draw, then (only on failure) fail offset
//!    and rescue pick. Changing this order changes every seeded cohort.
//! 3. **Structural fidelity**: every patient gets one internal record and
//!    one therapy claim dated on the shipment date; failing patients get
//!    exactly one rescue claim after it.
//!
//! # Example
//!
//! ```
//! use biosure_core_rs::generator::{CohortConfig, CohortGenerator};
//!
//! let generator = CohortGenerator::new(CohortConfig::default());
//! let cohort = generator.generate();
//!
//! assert_eq!(cohort.internal.len(), 100);
//! assert_eq!(cohort.internal[0].patient_id(), "PT-10000");
//! ```

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::claim::{ClaimEvent, CODE_CART_INFUSION, CODE_GLOFITAMAB, CODE_HOSPICE};
use crate::models::internal::InternalRecord;
use crate::rng::RngManager;

/// A claim code paired with its human-readable description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimProfile {
    /// Claim code emitted on generated events
    pub code: String,

    /// Description emitted on generated events
    pub description: String,
}

impl ClaimProfile {
    pub fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

/// Configuration for synthetic cohort generation
///
/// Defaults reproduce the reference portfolio: 100 patients enrolled across
/// a year starting 2023-06-01, $420,000 booked per patient with a 40%
/// reserve, a 30% chance of a rescue event 30 to 200 days after infusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Number of patients to generate
    pub num_patients: usize,

    /// RNG seed; the whole cohort is a pure function of this and the knobs
    pub seed: u64,

    /// First possible enrollment (shipment) date
    pub enrollment_start: NaiveDate,

    /// Enrollment offset window in days, inclusive of both ends
    pub enrollment_window_days: i64,

    /// Revenue booked per patient (i64 cents)
    pub revenue_booked: i64,

    /// Initial reserve rate in basis points (10_000 = 100%)
    pub reserve_rate_bps: i64,

    /// Payer label stamped on every internal record
    pub payer: String,

    /// Contract-terms label stamped on every internal record
    pub contract_terms: String,

    /// Therapy administration claim emitted for every patient
    pub therapy: ClaimProfile,

    /// Rescue events drawn from uniformly when a patient fails
    pub rescue_catalog: Vec<ClaimProfile>,

    /// Probability that a patient gets a rescue event
    pub failure_probability: f64,

    /// Days after shipment a failure occurs, inclusive (min, max)
    pub failure_window_days: (i64, i64),
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            num_patients: 100,
            seed: 42,
            enrollment_start: NaiveDate::from_ymd_opt(2023, 6, 1).expect("fixed calendar date"),
            enrollment_window_days: 365,
            revenue_booked: 42_000_000,
            reserve_rate_bps: 4_000,
            payer: "Commercial Plan".to_string(),
            contract_terms: "100% Rebate if Fail < 6mo".to_string(),
            therapy: ClaimProfile::new(CODE_CART_INFUSION, "CAR-T Infusion"),
            rescue_catalog: vec![
                ClaimProfile::new(CODE_GLOFITAMAB, "Glofitamab (Columvi)"),
                ClaimProfile::new(CODE_HOSPICE, "Hospice"),
            ],
            failure_probability: 0.30,
            failure_window_days: (30, 200),
        }
    }
}

/// A generated portfolio snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCohort {
    /// One internal record per patient, in patient-index order
    pub internal: Vec<InternalRecord>,

    /// Claim events, patient by patient, therapy claim first
    pub claims: Vec<ClaimEvent>,
}

/// Deterministic cohort generator
pub struct CohortGenerator {
    config: CohortConfig,
}

impl CohortGenerator {
    /// Create a generator for the given config
    ///
    /// # Panics
    /// Panics if the config is structurally invalid: non-positive revenue,
    /// reserve rate outside 0..=10_000 bps, negative enrollment window, an
    /// inverted failure window, a probability outside [0, 1], or an empty
    /// rescue catalog while failures are possible.
    pub fn new(config: CohortConfig) -> Self {
        assert!(config.revenue_booked > 0, "revenue_booked must be positive");
        assert!(
            (0..=10_000).contains(&config.reserve_rate_bps),
            "reserve_rate_bps must be within 0..=10000"
        );
        assert!(
            config.enrollment_window_days >= 0,
            "enrollment_window_days must be non-negative"
        );
        assert!(
            config.failure_window_days.0 <= config.failure_window_days.1,
            "failure window must satisfy min <= max"
        );
        assert!(
            (0.0..=1.0).contains(&config.failure_probability),
            "failure_probability must be within [0, 1]"
        );
        assert!(
            config.failure_probability <= 0.0 || !config.rescue_catalog.is_empty(),
            "rescue_catalog must be non-empty when failures can occur"
        );

        Self { config }
    }

    /// The config this generator was built with
    pub fn config(&self) -> &CohortConfig {
        &self.config
    }

    /// Generate the cohort
    ///
    /// Idempotent: the RNG is re-seeded on every call, so repeated calls
    /// return identical cohorts.
    pub fn generate(&self) -> GeneratedCohort {
        let mut rng = RngManager::new(self.config.seed);

        let mut internal = Vec::with_capacity(self.config.num_patients);
        let mut claims = Vec::new();

        // reserve = revenue * rate, in integer cents
        let reserve_held = self.config.revenue_booked * self.config.reserve_rate_bps / 10_000;

        for index in 0..self.config.num_patients {
            let patient_id = format!("PT-{}", 10_000 + index);

            let offset = rng.range(0, self.config.enrollment_window_days + 1);
            let shipment_date = self.config.enrollment_start + Duration::days(offset);

            internal.push(InternalRecord::new(
                patient_id.clone(),
                shipment_date,
                self.config.payer.clone(),
                self.config.revenue_booked,
                reserve_held,
                self.config.contract_terms.clone(),
            ));

            claims.push(ClaimEvent::new(
                patient_id.clone(),
                shipment_date,
                self.config.therapy.code.clone(),
                self.config.therapy.description.clone(),
            ));

            if rng.chance(self.config.failure_probability) {
                let (min, max) = self.config.failure_window_days;
                let fail_offset = rng.range(min, max + 1);
                let rescue = rng.pick(&self.config.rescue_catalog);

                claims.push(ClaimEvent::new(
                    patient_id,
                    shipment_date + Duration::days(fail_offset),
                    rescue.code.clone(),
                    rescue.description.clone(),
                ));
            }
        }

        info!(
            patients = internal.len(),
            claims = claims.len(),
            seed = self.config.seed,
            "synthetic cohort generated"
        );

        GeneratedCohort { internal, claims }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_portfolio() {
        let config = CohortConfig::default();

        assert_eq!(config.num_patients, 100);
        assert_eq!(config.seed, 42);
        assert_eq!(
            config.enrollment_start,
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
        );
        assert_eq!(config.revenue_booked, 42_000_000);
        assert_eq!(config.reserve_rate_bps, 4_000);
        assert_eq!(config.failure_probability, 0.30);
        assert_eq!(config.failure_window_days, (30, 200));
        assert_eq!(config.rescue_catalog.len(), 2);
    }

    #[test]
    fn test_reserve_is_rate_times_revenue() {
        let generator = CohortGenerator::new(CohortConfig {
            num_patients: 1,
            ..CohortConfig::default()
        });
        let cohort = generator.generate();

        // 40% of $420,000.00
        assert_eq!(cohort.internal[0].reserve_held(), 16_800_000);
        assert_eq!(cohort.internal[0].revenue_booked(), 42_000_000);
    }

    #[test]
    fn test_patient_ids_are_sequential() {
        let generator = CohortGenerator::new(CohortConfig {
            num_patients: 3,
            ..CohortConfig::default()
        });
        let cohort = generator.generate();

        let ids: Vec<&str> = cohort.internal.iter().map(|r| r.patient_id()).collect();
        assert_eq!(ids, vec!["PT-10000", "PT-10001", "PT-10002"]);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let generator = CohortGenerator::new(CohortConfig::default());
        assert_eq!(generator.generate(), generator.generate());
    }

    #[test]
    #[should_panic(expected = "rescue_catalog must be non-empty")]
    fn test_empty_catalog_with_failures_panics() {
        CohortGenerator::new(CohortConfig {
            rescue_catalog: Vec::new(),
            ..CohortConfig::default()
        });
    }

    #[test]
    #[should_panic(expected = "failure window must satisfy min <= max")]
    fn test_inverted_failure_window_panics() {
        CohortGenerator::new(CohortConfig {
            failure_window_days: (200, 30),
            ..CohortConfig::default()
        });
    }
}
