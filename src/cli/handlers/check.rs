// src/cli/handlers/check.rs

use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::{
    cli::handlers::commons,
    core::{compiler, settings::Settings, validation},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Validates input values and reports anything the compiler would skip."
)]
struct CheckArgs {
    /// The project interface JSON file.
    interface: PathBuf,

    /// The selection file (.json or .toml).
    selection: PathBuf,
}

/// Runs `check`.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;
    let (schema, tasks) = commons::load_inputs(&check_args.interface, &check_args.selection)?;

    let mut problems = 0;
    for task in tasks.iter().filter(|task| task.enabled) {
        let violations = validation::validate_inputs(task, &schema);
        let compilation = compiler::compile_document(task, &schema, &settings.compiler);
        if violations.is_empty() && compilation.is_clean() {
            println!("  {} {}", "ok".green(), task.label());
            continue;
        }

        println!("  {} {}", "fail".red().bold(), task.label());
        for violation in &violations {
            println!(
                "      {}.{} = \"{}\": {}",
                violation.option.cyan(),
                violation.field,
                violation.value,
                violation.message
            );
        }
        for diagnostic in &compilation.diagnostics {
            println!("      {}", diagnostic);
        }
        problems += violations.len() + compilation.diagnostics.len();
    }

    if problems > 0 {
        bail!("{} problem(s) found.", problems);
    }
    Ok(())
}
