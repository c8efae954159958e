//! Subcommand implementations
//!
//! One module per subcommand; each exposes a clap `Args` struct and an
//! `execute` function returning `anyhow::Result`.

pub mod forecast;
pub mod generate;
pub mod reconcile;
