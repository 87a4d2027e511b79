//! `coffee`: a thin binary exposing `plan`/`replan` over the
//! `coffee-planner` pipeline, standing in for the HTTP layer spec §1
//! names out of scope. Grounded on `gat-cli`'s `main.rs` dispatch shape.

mod cli;
mod commands;
mod input;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: failed to install tracing subscriber");
    }

    let code = match &cli.command {
        Commands::Plan { input, backend, max_time_seconds, out } => {
            commands::plan::handle(input, *backend, *max_time_seconds, out.as_ref())
        }
        Commands::Replan { input, backend, max_time_seconds, out } => {
            commands::replan::handle(input, *backend, *max_time_seconds, out.as_ref())
        }
    };

    match code {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Fatal: {err:#}");
            std::process::exit(1);
        }
    }
}
