// src/core/planner.rs

//! Builds the per-task run plan handed to the execution engine: one
//! `{ name, entry, pipeline_override }` record per enabled task, each
//! compiled with its own accumulator.

use crate::{
    core::{
        compiler::{self, Compilation},
        resolver::ResolveError,
        settings::CompilerSettings,
    },
    dev_utils,
    models::{Fragment, ProjectInterface, SelectedTask},
};
use rayon::prelude::*;
use serde::Serialize;

/// One task ready to be posted to the execution engine.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlannedTask {
    /// Instance id of the selected task, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Task name.
    pub name: String,
    /// Entry the engine starts from.
    pub entry: String,
    /// This task's own override document.
    pub pipeline_override: Fragment,
}

/// The planned tasks, in list order, plus every diagnostic met while compiling them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunPlan {
    /// Planned tasks in list order.
    pub tasks: Vec<PlannedTask>,
    /// Diagnostics from all compilations, in list order.
    pub diagnostics: Vec<ResolveError>,
}

/// Compiles each enabled task independently.
///
/// Compilations share no state, so they run in parallel; the plan keeps the
/// order of `tasks`. Unknown tasks are left out of the plan and reported.
pub fn plan(
    tasks: &[SelectedTask],
    schema: &ProjectInterface,
    settings: &CompilerSettings,
) -> RunPlan {
    let _timer = dev_utils::BlockTimer::new("plan");

    let compiled: Vec<(Option<PlannedTask>, Compilation)> = tasks
        .par_iter()
        .filter(|task| task.enabled)
        .map(|task| {
            let compilation = compiler::compile_document(task, schema, settings);
            let planned = schema.task(&task.task_name).map(|definition| PlannedTask {
                id: task.id.clone(),
                name: definition.name.clone(),
                entry: definition.entry.clone(),
                pipeline_override: compilation.document.clone(),
            });
            (planned, compilation)
        })
        .collect();

    let mut run_plan = RunPlan::default();
    for (planned, compilation) in compiled {
        run_plan.tasks.extend(planned);
        run_plan.diagnostics.extend(compilation.diagnostics);
    }
    run_plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectedValue;
    use serde_json::json;

    fn schema() -> ProjectInterface {
        serde_json::from_value(json!({
            "task": [
                { "name": "Login", "entry": "LoginMain", "pipeline_override": { "LoginMain": { "timeout": 5 } } },
                { "name": "Collect", "entry": "CollectMain", "option": ["Speed"] }
            ],
            "option": {
                "Speed": {
                    "cases": [
                        { "name": "Fast", "pipeline_override": { "CollectMain": { "rate": 2 } } },
                        { "name": "Slow", "pipeline_override": { "CollectMain": { "rate": 1 } } }
                    ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_plan_keeps_order_and_isolates_tasks() {
        let pi = schema();
        let mut login = SelectedTask::new("Login");
        login.id = Some("first".to_string());
        let tasks = [
            login,
            SelectedTask::new("Collect").with_value("Speed", SelectedValue::select("Slow")),
            SelectedTask::new("Collect"),
        ];

        let run_plan = plan(&tasks, &pi, &CompilerSettings::default());

        assert!(run_plan.diagnostics.is_empty());
        let entries: Vec<_> = run_plan.tasks.iter().map(|t| t.entry.as_str()).collect();
        assert_eq!(entries, vec!["LoginMain", "CollectMain", "CollectMain"]);
        assert_eq!(run_plan.tasks[0].id.as_deref(), Some("first"));
        assert_eq!(
            serde_json::Value::Object(run_plan.tasks[0].pipeline_override.clone()),
            json!({ "LoginMain": { "timeout": 5 } })
        );
        assert_eq!(
            serde_json::Value::Object(run_plan.tasks[1].pipeline_override.clone()),
            json!({ "CollectMain": { "rate": 1 } })
        );
        assert_eq!(
            serde_json::Value::Object(run_plan.tasks[2].pipeline_override.clone()),
            json!({ "CollectMain": { "rate": 2 } })
        );
    }

    #[test]
    fn test_plan_omits_disabled_and_unknown_tasks() {
        let pi = schema();
        let tasks = [
            SelectedTask::new("Login").disabled(),
            SelectedTask::new("Ghost"),
            SelectedTask::new("Collect"),
        ];

        let run_plan = plan(&tasks, &pi, &CompilerSettings::default());

        assert_eq!(run_plan.tasks.len(), 1);
        assert_eq!(run_plan.tasks[0].name, "Collect");
        assert_eq!(
            run_plan.diagnostics,
            vec![ResolveError::UnknownTask {
                task: "Ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_planned_task_serialization() {
        let planned = PlannedTask {
            id: None,
            name: "Login".to_string(),
            entry: "LoginMain".to_string(),
            pipeline_override: Fragment::new(),
        };
        assert_eq!(
            serde_json::to_value(&planned).unwrap(),
            json!({ "name": "Login", "entry": "LoginMain", "pipeline_override": {} })
        );
    }
}
