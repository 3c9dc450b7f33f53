//! # Compiler
//!
//! Turns selected tasks into a pipeline override document. Each call owns a
//! fresh accumulator; fragments are merged in a fixed order: the task's own
//! `pipeline_override` first, then every top-level option in declared order
//! (a case's fragment before its nested options). For a batch, tasks are
//! compiled in list order into the same accumulator, so later tasks win.
//!
//! Nothing here fails. Problems are logged and collected as
//! [`ResolveError`] diagnostics; the worst outcome is an incomplete but
//! well-formed document.

use crate::{
    constants::EMPTY_DOCUMENT,
    core::{
        merge::merge,
        resolver::{OptionResolver, ResolveError},
        settings::CompilerSettings,
    },
    dev_utils,
    models::{Fragment, ProjectInterface, SelectedTask},
};

/// The outcome of one compilation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compilation {
    /// The merged override document.
    pub document: Fragment,
    /// Soft failures, in the order they occurred.
    pub diagnostics: Vec<ResolveError>,
}

impl Compilation {
    /// Whether the run completed without any diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The document as compact JSON text.
    pub fn to_json(&self) -> String {
        serialize(&self.document, false)
    }

    /// The document as indented JSON text.
    pub fn to_json_pretty(&self) -> String {
        serialize(&self.document, true)
    }
}

// --- PUBLIC COMPILER API ---

/// Compiles one selected task into compact JSON, `"{}"` when the task is unknown.
pub fn compile(task: &SelectedTask, schema: &ProjectInterface) -> String {
    compile_document(task, schema, &CompilerSettings::default()).to_json()
}

/// Compiles every enabled task, in list order, into one compact JSON document.
pub fn compile_batch(tasks: &[SelectedTask], schema: &ProjectInterface) -> String {
    compile_batch_document(tasks, schema, &CompilerSettings::default()).to_json()
}

/// Compiles one selected task, keeping the document and its diagnostics.
///
/// The task is compiled whether or not it is enabled.
pub fn compile_document(
    task: &SelectedTask,
    schema: &ProjectInterface,
    settings: &CompilerSettings,
) -> Compilation {
    let mut compilation = Compilation::default();
    compile_into(task, schema, settings, &mut compilation);
    compilation
}

/// Compiles every enabled task into one shared accumulator.
pub fn compile_batch_document(
    tasks: &[SelectedTask],
    schema: &ProjectInterface,
    settings: &CompilerSettings,
) -> Compilation {
    let _timer = dev_utils::BlockTimer::new("compile_batch_document");
    let mut compilation = Compilation::default();
    for task in tasks.iter().filter(|task| task.enabled) {
        compile_into(task, schema, settings, &mut compilation);
    }
    log::debug!(
        "Compiled {} enabled task(s) with {} diagnostic(s).",
        tasks.iter().filter(|task| task.enabled).count(),
        compilation.diagnostics.len()
    );
    compilation
}

// --- HELPER IMPLEMENTATIONS ---

/// Merges one task's contribution into `compilation`.
fn compile_into(
    task: &SelectedTask,
    schema: &ProjectInterface,
    settings: &CompilerSettings,
    compilation: &mut Compilation,
) {
    let Some(definition) = schema.task(&task.task_name) else {
        let error = ResolveError::UnknownTask {
            task: task.task_name.clone(),
        };
        log::log!(error.log_level(), "{}", error);
        compilation.diagnostics.push(error);
        return;
    };
    log::trace!(
        "Compiling task '{}' (entry '{}').",
        task.label(),
        definition.entry
    );

    if let Some(fragment) = &definition.pipeline_override {
        merge(&mut compilation.document, fragment);
    }

    let mut resolver = OptionResolver::new(schema, &task.options, settings);
    for key in &definition.options {
        resolver.resolve(key, &mut compilation.document);
    }
    compilation.diagnostics.extend(resolver.into_diagnostics());
}

fn serialize(document: &Fragment, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    result.unwrap_or_else(|e| {
        log::error!("Failed to serialize override document: {}", e);
        EMPTY_DOCUMENT.to_string()
    })
}
