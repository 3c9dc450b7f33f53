// src/cli/handlers/plan.rs

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::{
    cli::handlers::commons,
    core::{planner, settings::Settings},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints one entry/override pair per enabled task, ready to post to the engine."
)]
struct PlanArgs {
    /// The project interface JSON file.
    interface: PathBuf,

    /// The selection file (.json or .toml).
    selection: PathBuf,

    /// Indent the output.
    #[arg(long, short)]
    pretty: bool,

    /// Exit with an error instead of printing when anything was skipped.
    #[arg(long)]
    strict: bool,
}

/// Runs `plan`.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let plan_args = PlanArgs::try_parse_from(&args)?;
    let (schema, tasks) = commons::load_inputs(&plan_args.interface, &plan_args.selection)?;

    let run_plan = planner::plan(&tasks, &schema, &settings.compiler);
    commons::print_diagnostics(&run_plan.diagnostics);
    if plan_args.strict && !run_plan.diagnostics.is_empty() {
        bail!(
            "{} diagnostic(s) reported while planning; no plan written.",
            run_plan.diagnostics.len()
        );
    }

    let pretty = plan_args.pretty || settings.output.pretty;
    println!("{}", commons::to_json(&run_plan.tasks, pretty)?);
    Ok(())
}
