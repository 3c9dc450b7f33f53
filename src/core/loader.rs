// src/core/loader.rs

//! Reads the project interface and selected-task lists from disk.
//!
//! Only the shell calls into this module; the compiler works on values
//! already in memory.

use crate::{
    core::paths,
    models::{ProjectInterface, SelectedTask},
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

/// Errors raised while parsing an interface or selection file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file is not valid JSON for the expected shape.
    #[error("Failed to parse JSON file at '{path}': {source}")]
    JsonParse {
        /// The offending file.
        path: String,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The file is not valid TOML for the expected shape.
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        /// The offending file.
        path: String,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },

    /// The extension is neither `.json` nor `.toml`.
    #[error("Unsupported file extension for '{path}'. Expected .json or .toml.")]
    UnsupportedFormat {
        /// The offending file.
        path: String,
    },
}

/// On-disk shapes accepted for a selection file.
///
/// JSON may hold a bare array; TOML always needs a top-level `tasks` table array.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum SelectionDocument {
    List(Vec<SelectedTask>),
    Wrapped { tasks: Vec<SelectedTask> },
}

impl From<SelectionDocument> for Vec<SelectedTask> {
    fn from(document: SelectionDocument) -> Self {
        match document {
            SelectionDocument::List(tasks) | SelectionDocument::Wrapped { tasks } => tasks,
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(LoadError::UnsupportedFormat {
            path: paths::display_path(path),
        }),
    }
}

/// Loads a project interface from a JSON file.
pub fn load_interface(path: &Path) -> Result<ProjectInterface> {
    let content = fs::read_to_string(path).with_context(|| {
        format!(
            "Could not read project interface '{}'",
            paths::display_path(path)
        )
    })?;
    let interface: ProjectInterface =
        serde_json::from_str(&content).map_err(|e| LoadError::JsonParse {
            path: paths::display_path(path),
            source: e,
        })?;
    log::debug!(
        "Loaded interface '{}' with {} task(s) and {} option(s).",
        interface.name.as_deref().unwrap_or("<unnamed>"),
        interface.tasks.len(),
        interface.options.len()
    );
    Ok(interface)
}

/// Loads a selected-task list from a JSON or TOML file, chosen by extension.
pub fn load_selection(path: &Path) -> Result<Vec<SelectedTask>> {
    let format = format_of(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read selection '{}'", paths::display_path(path)))?;

    let document: SelectionDocument = match format {
        Format::Json => serde_json::from_str(&content).map_err(|e| LoadError::JsonParse {
            path: paths::display_path(path),
            source: e,
        })?,
        Format::Toml => toml::from_str(&content).map_err(|e| LoadError::TomlParse {
            path: paths::display_path(path),
            source: e,
        })?,
    };
    let tasks: Vec<SelectedTask> = document.into();
    log::debug!(
        "Loaded {} selected task(s) from '{}'.",
        tasks.len(),
        paths::display_path(path)
    );
    Ok(tasks)
}
