// src/bin/pipeforge.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use pipeforge::{
    cli::{Cli, dispatcher},
    core::settings::Settings,
};

/// Sets up logging, parses arguments, dispatches to the command handler
/// and handles every error in one place.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Handler-level usage errors and `--help` keep clap's own output and exit codes.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let settings = Settings::load(cli.config.as_deref())?;
    dispatcher::dispatch(cli.command, cli.args, &settings)
}
