use clap::Parser;
use crdgen::cli::{run_cli, Cli};
use crdgen::logging::{init_logging_with_config, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("Warning: {e:#}");
    }

    match run_cli(&cli) {
        Ok(report) if cli.should_fail(&report) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}
