// src/core/validation.rs

//! Checks input values against the `verify` patterns declared by the schema.
//!
//! This is a presentation concern: the compiler never calls it and passes
//! unvalidated values through unchanged.

use crate::models::{InputValues, OptionDefinition, ProjectInterface, SelectedTask, SelectedValue};
use regex::Regex;
use std::collections::{HashSet, VecDeque};

/// An input value that does not satisfy its field's pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputViolation {
    /// Label of the selected task.
    pub task: String,
    /// Option key of the input option.
    pub option: String,
    /// Field name.
    pub field: String,
    /// The value that was checked.
    pub value: String,
    /// What to show the operator.
    pub message: String,
}

/// Validates every input option a task can reach, in breadth-first schema order.
///
/// All cases are followed, not only the active ones, so an option hidden
/// behind a currently inactive branch is still checked. Fields without a
/// `verify` pattern are skipped; a pattern that does not compile is reported
/// as a violation of its own.
pub fn validate_inputs(task: &SelectedTask, schema: &ProjectInterface) -> Vec<InputViolation> {
    let Some(definition) = schema.task(&task.task_name) else {
        return Vec::new();
    };

    let empty = InputValues::new();
    let mut violations = Vec::new();
    for key in reachable_options(schema, &definition.options) {
        let Some(OptionDefinition::Input { inputs, .. }) = schema.option(key) else {
            continue;
        };
        let values = match task.options.get(key) {
            Some(SelectedValue::Input { values }) => values,
            _ => &empty,
        };

        for field in inputs {
            let Some(pattern) = &field.verify else {
                continue;
            };
            let value = field.raw_value(values);
            let message = match Regex::new(pattern) {
                Ok(re) if re.is_match(value) => continue,
                Ok(_) => field
                    .pattern_msg
                    .clone()
                    .unwrap_or_else(|| format!("Value does not match pattern '{}'.", pattern)),
                Err(e) => format!("Pattern '{}' is not a valid regex: {}", pattern, e),
            };
            violations.push(InputViolation {
                task: task.label().to_string(),
                option: key.to_string(),
                field: field.name.clone(),
                value: value.to_string(),
                message,
            });
        }
    }
    violations
}

/// Every option key reachable from `roots` through any case, each visited once.
fn reachable_options<'a>(schema: &'a ProjectInterface, roots: &'a [String]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    let mut queue: VecDeque<&str> = roots.iter().map(String::as_str).collect();

    while let Some(key) = queue.pop_front() {
        if !seen.insert(key) {
            continue;
        }
        order.push(key);
        if let Some(option) = schema.option(key) {
            for case in option.cases() {
                queue.extend(case.options.iter().map(String::as_str));
            }
        }
    }
    order
}
