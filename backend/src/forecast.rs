//! Reserve-rate calibration series
//!
//! The quarterly evolution of the portfolio reserve rate, from the launch
//! quarter's conservative manual guess down to observed actuals. Rates are
//! basis points with a confidence band per quarter; rendering is a front-end
//! concern, this module only owns the data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a quarter's reserve rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationSource {
    /// Pre-launch finance estimate, wide band
    #[serde(rename = "Manual Guess")]
    ManualGuess,

    /// Model-calibrated estimate from accumulating outcome data
    #[serde(rename = "Model Calibrated")]
    ModelCalibrated,

    /// Observed failure-rate actuals
    #[serde(rename = "Actuals")]
    Actuals,
}

impl CalibrationSource {
    /// The fixed display label for this source
    pub fn label(&self) -> &'static str {
        match self {
            CalibrationSource::ManualGuess => "Manual Guess",
            CalibrationSource::ModelCalibrated => "Model Calibrated",
            CalibrationSource::Actuals => "Actuals",
        }
    }
}

impl fmt::Display for CalibrationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One quarter in the reserve-rate series
///
/// Serialize-only: the series is static data flowing outward, never parsed
/// back in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReserveRatePoint {
    /// Quarter label
    pub quarter: &'static str,

    /// Reserve rate in basis points (10_000 = 100%)
    pub rate_bps: i64,

    /// Lower confidence bound (bps)
    pub lower_bps: i64,

    /// Upper confidence bound (bps)
    pub upper_bps: i64,

    /// Provenance of the estimate
    pub source: CalibrationSource,
}

impl ReserveRatePoint {
    /// Band width in basis points
    pub fn band_width_bps(&self) -> i64 {
        self.upper_bps - self.lower_bps
    }
}

/// The quarterly reserve-rate series, launch guess through actuals
///
/// Invariants: each point satisfies `lower <= rate <= upper`, and the
/// confidence band tightens strictly quarter over quarter.
pub fn reserve_rate_evolution() -> Vec<ReserveRatePoint> {
    vec![
        ReserveRatePoint {
            quarter: "Q1 (Launch)",
            rate_bps: 4_000,
            lower_bps: 2_500,
            upper_bps: 5_500,
            source: CalibrationSource::ManualGuess,
        },
        ReserveRatePoint {
            quarter: "Q2",
            rate_bps: 3_600,
            lower_bps: 3_000,
            upper_bps: 4_200,
            source: CalibrationSource::ModelCalibrated,
        },
        ReserveRatePoint {
            quarter: "Q3",
            rate_bps: 3_400,
            lower_bps: 3_100,
            upper_bps: 3_700,
            source: CalibrationSource::ModelCalibrated,
        },
        ReserveRatePoint {
            quarter: "Q4 (Actuals)",
            rate_bps: 3_200,
            lower_bps: 3_100,
            upper_bps: 3_300,
            source: CalibrationSource::Actuals,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_starts_at_guess_and_ends_at_actuals() {
        let series = reserve_rate_evolution();

        assert_eq!(series.len(), 4);
        assert_eq!(series[0].source, CalibrationSource::ManualGuess);
        assert_eq!(series[0].rate_bps, 4_000);
        assert_eq!(series[3].source, CalibrationSource::Actuals);
        assert_eq!(series[3].rate_bps, 3_200);
    }

    #[test]
    fn test_rates_within_bounds() {
        for point in reserve_rate_evolution() {
            assert!(
                point.lower_bps <= point.rate_bps && point.rate_bps <= point.upper_bps,
                "{}: rate {} outside [{}, {}]",
                point.quarter,
                point.rate_bps,
                point.lower_bps,
                point.upper_bps
            );
        }
    }

    #[test]
    fn test_bands_tighten_each_quarter() {
        let series = reserve_rate_evolution();

        for pair in series.windows(2) {
            assert!(
                pair[1].band_width_bps() < pair[0].band_width_bps(),
                "band must tighten from {} to {}",
                pair[0].quarter,
                pair[1].quarter
            );
        }
    }

    #[test]
    fn test_rates_decline_monotonically() {
        let series = reserve_rate_evolution();

        for pair in series.windows(2) {
            assert!(pair[1].rate_bps < pair[0].rate_bps);
        }
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(CalibrationSource::ManualGuess.label(), "Manual Guess");
        assert_eq!(
            CalibrationSource::ModelCalibrated.to_string(),
            "Model Calibrated"
        );
        assert_eq!(CalibrationSource::Actuals.label(), "Actuals");
    }
}
