// src/core/graph_display.rs

use crate::{
    core::resolver::active_case_name,
    models::{OptionDefinition, ProjectInterface, TaskDefinition, ValueStore},
};
use colored::Colorize;

/// Prints the option tree of a task, marking the cases `values` activates.
pub fn display_option_tree(task: &TaskDefinition, schema: &ProjectInterface, values: &ValueStore) {
    for line in render_option_tree(task, schema, values) {
        println!("{}", line);
    }
}

/// Renders the option tree of a task as plain lines.
///
/// Active cases carry a `(*)` marker. An option already open on the current
/// branch is shown once more with `(cycle)` and not expanded again.
pub fn render_option_tree(
    task: &TaskDefinition,
    schema: &ProjectInterface,
    values: &ValueStore,
) -> Vec<String> {
    let mut lines = vec![format!("{} [{}]", task.name.bold(), task.entry)];
    let mut branch = Vec::new();
    for (i, key) in task.options.iter().enumerate() {
        let is_last = i == task.options.len() - 1;
        render_option(key, schema, values, "", is_last, &mut branch, &mut lines);
    }
    lines
}

fn render_option<'a>(
    key: &'a str,
    schema: &'a ProjectInterface,
    values: &'a ValueStore,
    prefix: &str,
    is_last: bool,
    branch: &mut Vec<&'a str>,
    lines: &mut Vec<String>,
) {
    let connector = if is_last { "└─" } else { "├─" };
    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });

    let Some(definition) = schema.option(key) else {
        lines.push(format!("{}{}{} {}", prefix, connector, key, "(undefined)".red()));
        return;
    };
    if branch.contains(&key) {
        lines.push(format!("{}{}{} {}", prefix, connector, key, "(cycle)".yellow()));
        return;
    }
    lines.push(format!(
        "{}{}{} <{}>",
        prefix,
        connector,
        key.cyan(),
        definition.kind()
    ));

    branch.push(key);
    match definition {
        OptionDefinition::Input { inputs, .. } => {
            for (i, field) in inputs.iter().enumerate() {
                let connector = if i == inputs.len() - 1 { "└─" } else { "├─" };
                let default = field.default.as_deref().unwrap_or("");
                lines.push(format!(
                    "{}{}{}: {:?} = \"{}\"",
                    child_prefix, connector, field.name, field.pipeline_type, default
                ));
            }
        }
        OptionDefinition::Select { cases, .. } | OptionDefinition::Switch { cases } => {
            let active = active_case_name(definition, values.get(key));
            for (i, case) in cases.iter().enumerate() {
                let is_last_case = i == cases.len() - 1;
                let connector = if is_last_case { "└─" } else { "├─" };
                let marker = if active == Some(case.name.as_str()) {
                    format!(" {}", "(*)".green())
                } else {
                    String::new()
                };
                lines.push(format!("{}{}{}{}", child_prefix, connector, case.name, marker));

                let case_prefix =
                    format!("{}{}", child_prefix, if is_last_case { "   " } else { "│  " });
                for (j, nested) in case.options.iter().enumerate() {
                    let is_last_nested = j == case.options.len() - 1;
                    render_option(
                        nested,
                        schema,
                        values,
                        &case_prefix,
                        is_last_nested,
                        branch,
                        lines,
                    );
                }
            }
        }
    }
    branch.pop();
}
