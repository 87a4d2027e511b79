//! Command-line surface (clap derive), grounded on `gat_cli::cli`'s
//! `Parser`/`Subcommand` layout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Coffee procurement planning pipeline", long_about = None)]
pub struct Cli {
    /// Set the logging level.
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the planning pipeline for a fresh request.
    Plan {
        /// Path to a plan input file (request + offices + distributors).
        input: PathBuf,
        /// Which backend to solve with.
        #[arg(long, default_value = "clarabel")]
        backend: BackendArg,
        /// Solver time budget, seconds.
        #[arg(long, default_value_t = 30.0)]
        max_time_seconds: f64,
        /// Write the `PlanResult` JSON here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the planning pipeline in correction mode against a prior plan's
    /// committed orders.
    Replan {
        /// Path to a plan input file; `is_correction_mode` is forced true.
        input: PathBuf,
        #[arg(long, default_value = "clarabel")]
        backend: BackendArg,
        #[arg(long, default_value_t = 30.0)]
        max_time_seconds: f64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum BackendArg {
    Clarabel,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl From<BackendArg> for coffee_planner::solver::SolverBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Clarabel => coffee_planner::solver::SolverBackend::Clarabel,
            #[cfg(feature = "solver-highs")]
            BackendArg::Highs => coffee_planner::solver::SolverBackend::Highs,
        }
    }
}
