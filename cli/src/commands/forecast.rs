//! `biosure forecast` - print the quarterly reserve-rate calibration series

use anyhow::Result;
use clap::Args;

use biosure_core_rs::reserve_rate_evolution;

#[derive(Args, Clone)]
pub struct ForecastArgs {}

pub fn execute(_args: ForecastArgs) -> Result<()> {
    println!(
        "{:<12} {:>9} {:>9} {:>9} {:>6}  {}",
        "Quarter", "Rate_bps", "Low_bps", "High_bps", "Band", "Source"
    );
    for point in reserve_rate_evolution() {
        println!(
            "{:<12} {:>9} {:>9} {:>9} {:>6}  {}",
            point.quarter,
            point.rate_bps,
            point.lower_bps,
            point.upper_bps,
            point.band_width_bps(),
            point.source
        );
    }

    Ok(())
}
