//! `biosure generate` - write a seeded synthetic cohort to disk

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use biosure_core_rs::{
    save_claim_events, save_internal_records, CohortConfig, CohortGenerator, CLAIMS_CSV,
    PHARMA_CSV,
};

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Number of patients in the cohort
    #[arg(long, default_value_t = 100)]
    pub patients: usize,

    /// RNG seed; the same seed always produces the same cohort
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability that a patient fails therapy (0.0-1.0)
    #[arg(long, default_value_t = 0.3)]
    pub failure_rate: f64,

    /// First enrollment date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-06-01")]
    pub enrollment_start: NaiveDate,

    /// Directory the pharma and claims CSVs are written into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    ensure!(args.patients > 0, "patient count must be positive");
    ensure!(
        (0.0..=1.0).contains(&args.failure_rate),
        "failure rate must be within 0.0..=1.0, got {}",
        args.failure_rate
    );

    let config = CohortConfig {
        num_patients: args.patients,
        seed: args.seed,
        failure_probability: args.failure_rate,
        enrollment_start: args.enrollment_start,
        ..CohortConfig::default()
    };
    let cohort = CohortGenerator::new(config).generate();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

    let pharma_path = args.out_dir.join(PHARMA_CSV);
    let claims_path = args.out_dir.join(CLAIMS_CSV);

    save_internal_records(&cohort.internal, &pharma_path)
        .with_context(|| format!("writing {}", pharma_path.display()))?;
    save_claim_events(&cohort.claims, &claims_path)
        .with_context(|| format!("writing {}", claims_path.display()))?;

    info!(
        patients = cohort.internal.len(),
        claims = cohort.claims.len(),
        seed = args.seed,
        "cohort written to {}",
        args.out_dir.display()
    );

    Ok(())
}
