// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::{
    cli::handlers::commons,
    core::{graph_display, loader, settings::Settings},
    models::ValueStore,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists the tasks of a project interface as option trees."
)]
struct ListArgs {
    /// The project interface JSON file.
    interface: PathBuf,

    /// Only show tasks available for this controller.
    #[arg(long)]
    controller: Option<String>,

    /// Only show tasks available for this resource.
    #[arg(long)]
    resource: Option<String>,

    /// Mark the cases chosen by this task entry of a selection file.
    #[arg(long, short, requires = "task")]
    selection: Option<PathBuf>,

    /// The task name or id to take values from when `--selection` is given.
    #[arg(long, short)]
    task: Option<String>,
}

/// Runs `list`.
pub fn handle(args: Vec<String>, _settings: &Settings) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let schema = loader::load_interface(&list_args.interface)?;

    let values = match (&list_args.selection, &list_args.task) {
        (Some(selection), Some(name)) => {
            let tasks = commons::select_tasks(loader::load_selection(selection)?, name)?;
            tasks.into_iter().next().map(|task| task.options).unwrap_or_default()
        }
        _ => ValueStore::new(),
    };

    let available: Vec<_> = schema
        .available_tasks(
            list_args.controller.as_deref(),
            list_args.resource.as_deref(),
        )
        .collect();

    if available.is_empty() {
        println!("\nNo tasks available for the given controller and resource.");
        return Ok(());
    }

    println!(
        "\n{} ({} task(s))",
        schema.name.as_deref().unwrap_or("Project interface").yellow().bold(),
        available.len()
    );
    for task in available {
        println!();
        graph_display::display_option_tree(task, &schema, &values);
    }
    Ok(())
}
