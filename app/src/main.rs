//! FILENAME: app/src/main.rs

use app_lib::cli::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    app_lib::logging::init();
    let cli = Cli::parse();

    match app_lib::run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        // Some format failed; the others were still written
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
