//! FILENAME: app/src/lib.rs
// PURPOSE: Library side of the `weekly-compare` CLI: argument handling,
//          logging setup, comparison, rendering and export.

use std::io::Write;
use std::process::ExitCode;
use clap::Parser;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;

pub use cli::{Args, LogLevel};
pub use commands::{compare_files, export_report, ExportSummary};
pub use config::load_config;
pub use error::AppError;

/// Outcome of a run that did not abort.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub summary: ExportSummary,
    /// One message per failed comparison level.
    pub failures: Vec<String>,
}

/// Runs the tool for parsed arguments, writing tables to `out`.
pub fn execute(args: &Args, out: &mut dyn Write) -> Result<RunOutcome, AppError> {
    logging::init(args.log_level.filter(), args.log_file.as_deref())?;
    log_info!("SYS", "weekly-compare starting");

    let config = load_config(args.config.as_deref())?;
    let report = compare_files(args.previous.as_deref(), args.current.as_deref(), &config)?;

    if !args.quiet {
        write!(out, "{}", render::render_report(&report))?;
    }

    let failures = render::render_failures(&report);
    for failure in &failures {
        log_error!("CMD", "{}", failure);
    }

    let summary = export_report(&report, &args.out, args.out_dir.as_deref())?;
    Ok(RunOutcome { summary, failures })
}

/// Binary entry point: parses the process arguments and maps the outcome
/// to an exit code.
pub fn run() -> ExitCode {
    let args = Args::parse();
    let mut stdout = std::io::stdout();

    let code = match execute(&args, &mut stdout) {
        Ok(outcome) => {
            for failure in &outcome.failures {
                eprintln!("{}", failure);
            }
            println!(
                "Wrote {} tables to {}",
                outcome.summary.files.len(),
                outcome.summary.archive.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!("SYS", "{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    };

    logging::close_log_file();
    code
}
