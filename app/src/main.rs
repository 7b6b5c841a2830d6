//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point of the weekly comparison tool.

use std::process::ExitCode;

fn main() -> ExitCode {
    app_lib::run()
}
