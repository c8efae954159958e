//! `biosure reconcile` - run the decision table and write the ledger

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use biosure_core_rs::{
    ledger_fingerprint, load_claim_events, load_internal_records, reconcile, save_ledger,
    sorted_by_cash_impact, LedgerSummary, ReconcilerConfig, CLAIMS_CSV, LEDGER_CSV, PHARMA_CSV,
};

#[derive(Args, Clone)]
pub struct ReconcileArgs {
    /// Pharma snapshot CSV (internal records)
    #[arg(long, default_value = PHARMA_CSV)]
    pub pharma: PathBuf,

    /// Claims feed CSV
    #[arg(long, default_value = CLAIMS_CSV)]
    pub claims: PathBuf,

    /// Valuation date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-10-01")]
    pub as_of: NaiveDate,

    /// Output ledger CSV, sorted by cash impact descending
    #[arg(long, default_value = LEDGER_CSV)]
    pub out: PathBuf,
}

pub fn execute(args: ReconcileArgs) -> Result<()> {
    let records = load_internal_records(&args.pharma)
        .with_context(|| format!("loading {}", args.pharma.display()))?;
    let claims = load_claim_events(&args.claims)
        .with_context(|| format!("loading {}", args.claims.display()))?;

    let ledger = reconcile(&records, &claims, args.as_of, &ReconcilerConfig::default())
        .context("reconciliation failed")?;
    let summary = LedgerSummary::from_records(&ledger);
    let fingerprint = ledger_fingerprint(&ledger).context("fingerprinting ledger")?;

    save_ledger(&sorted_by_cash_impact(&ledger), &args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;

    info!(
        patients = summary.num_patients(),
        monitoring = summary.num_monitoring,
        partial_release = summary.num_partial_release,
        risk_expired = summary.num_risk_expired,
        failures = summary.num_failures,
        "portfolio reconciled as of {}",
        args.as_of
    );
    info!(
        total_reserves_cents = summary.total_reserves,
        cash_unlock_cents = summary.cash_unlock,
        new_liability_cents = summary.new_liability,
        net_benefit_cents = summary.net_benefit,
        fingerprint = %fingerprint,
        "ledger written to {}",
        args.out.display()
    );

    Ok(())
}
