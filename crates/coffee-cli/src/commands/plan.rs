use std::path::PathBuf;

use anyhow::Result;

use crate::cli::BackendArg;
use crate::commands::{exit_code_for_error, run_advanced, write_result};

pub fn handle(input: &PathBuf, backend: BackendArg, max_time_seconds: f64, out: Option<&PathBuf>) -> Result<i32> {
    match run_advanced(input, false, backend, max_time_seconds) {
        Ok((code, result)) => {
            write_result(&result, out.map(|p| p.as_path()))?;
            Ok(code)
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            Ok(exit_code_for_error(&err))
        }
    }
}
