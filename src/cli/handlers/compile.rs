// src/cli/handlers/compile.rs

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::{
    cli::handlers::commons,
    core::{compiler, settings::Settings},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Compiles the enabled tasks of a selection into one pipeline override document."
)]
struct CompileArgs {
    /// The project interface JSON file.
    interface: PathBuf,

    /// The selection file (.json or .toml).
    selection: PathBuf,

    /// Compile only the entries with this task name or id, even if disabled.
    #[arg(long, short)]
    task: Option<String>,

    /// Indent the output.
    #[arg(long, short)]
    pretty: bool,

    /// Exit with an error instead of printing when anything was skipped.
    #[arg(long)]
    strict: bool,
}

/// Runs `compile`.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let compile_args = CompileArgs::try_parse_from(&args)?;
    let (schema, mut tasks) =
        commons::load_inputs(&compile_args.interface, &compile_args.selection)?;

    if let Some(name) = &compile_args.task {
        tasks = commons::select_tasks(tasks, name)?;
    }

    let compilation = compiler::compile_batch_document(&tasks, &schema, &settings.compiler);
    commons::print_diagnostics(&compilation.diagnostics);
    if compile_args.strict && !compilation.is_clean() {
        bail!(
            "{} diagnostic(s) reported while compiling; no document written.",
            compilation.diagnostics.len()
        );
    }

    let pretty = compile_args.pretty || settings.output.pretty;
    println!("{}", commons::to_json(&compilation.document, pretty)?);
    Ok(())
}
