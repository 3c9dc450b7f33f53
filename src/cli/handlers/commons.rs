// src/cli/handlers/commons.rs

// Shared helpers for the command handlers.

use anyhow::{Result, bail};
use colored::Colorize;
use std::path::Path;

use crate::{
    core::{loader, resolver::ResolveError},
    models::{ProjectInterface, SelectedTask},
};

/// Loads the interface and the selection a command works on.
pub fn load_inputs(
    interface: &Path,
    selection: &Path,
) -> Result<(ProjectInterface, Vec<SelectedTask>)> {
    let schema = loader::load_interface(interface)?;
    let tasks = loader::load_selection(selection)?;
    Ok((schema, tasks))
}

/// Keeps the entries whose id or task name equals `name`, enabling them.
///
/// Fails when nothing matches.
pub fn select_tasks(tasks: Vec<SelectedTask>, name: &str) -> Result<Vec<SelectedTask>> {
    let selected: Vec<SelectedTask> = tasks
        .into_iter()
        .filter(|task| task.task_name == name || task.id.as_deref() == Some(name))
        .map(|mut task| {
            task.enabled = true;
            task
        })
        .collect();
    if selected.is_empty() {
        bail!("No entry named '{}' in the selection.", name);
    }
    Ok(selected)
}

/// Prints diagnostics to stderr, one per line.
pub fn print_diagnostics(diagnostics: &[ResolveError]) {
    for diagnostic in diagnostics {
        eprintln!("{}: {}", "warning".yellow().bold(), diagnostic);
    }
}

/// Serializes a value as JSON text, indented when `pretty` is set.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
