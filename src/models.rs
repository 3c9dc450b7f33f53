// src/models.rs

//! Schema and selection types shared by the compiler and the shell.

use crate::constants::{SWITCH_OFF_FALLBACK, SWITCH_OFF_NAMES, SWITCH_ON_FALLBACK, SWITCH_ON_NAMES};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A JSON object fragment: a task's or case's `pipeline_override`, an input
/// template, or the accumulator a compilation run merges them into.
pub type Fragment = Map<String, Value>;

/// Raw input values keyed by input field name.
pub type InputValues = HashMap<String, String>;

/// The operator's current selections for one task instance, keyed by option key.
pub type ValueStore = HashMap<String, SelectedValue>;

// --- PROJECT INTERFACE MODELS ---
// The declarative schema the surrounding application loads. Read-only for the compiler.

/// The project interface: every task the engine exposes and every option they reference.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ProjectInterface {
    /// Display name of the project.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form version string.
    #[serde(default)]
    pub version: Option<String>,
    /// Declared controllers (`controller` on the wire).
    #[serde(default, rename = "controller")]
    pub controllers: Vec<NamedEntry>,
    /// Declared resources (`resource` on the wire).
    #[serde(default, rename = "resource")]
    pub resources: Vec<NamedEntry>,
    /// Task definitions, in declaration order.
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskDefinition>,
    /// Option definitions keyed by option key.
    #[serde(default, rename = "option")]
    pub options: HashMap<String, OptionDefinition>,
}

/// A controller or resource declaration. Only its name matters here.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    /// The controller or resource name.
    pub name: String,
}

/// An automation entry point the operator can add to the task list.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TaskDefinition {
    /// Unique task name, as referenced by selections.
    pub name: String,
    /// Opaque entry name handed to the execution engine.
    pub entry: String,
    /// Top-level option keys, in the order they are resolved.
    #[serde(default, rename = "option")]
    pub options: Vec<String>,
    /// Fragment merged before any option of the task.
    #[serde(default)]
    pub pipeline_override: Option<Fragment>,
    /// Controllers this task is restricted to. Empty means any.
    #[serde(default)]
    pub controller: Vec<String>,
    /// Resources this task is restricted to. Empty means any.
    #[serde(default)]
    pub resource: Vec<String>,
}

/// The three option kinds a schema may declare.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// One of several named cases.
    #[default]
    Select,
    /// An on/off pair of cases.
    Switch,
    /// Free-form input fields.
    Input,
}

/// A user-configurable option attached to one or more tasks.
#[derive(Deserialize, Debug, Clone)]
#[serde(from = "RawOptionDefinition")]
pub enum OptionDefinition {
    /// Pick one of several named cases.
    Select {
        /// The selectable cases, in declaration order.
        cases: Vec<Case>,
        /// Case used when nothing is recorded. Falls back to the first case.
        default_case: Option<String>,
    },
    /// A boolean toggle modeled as an "on" case and an "off" case.
    Switch {
        /// The on and off cases, matched by name.
        cases: Vec<Case>,
    },
    /// Free-form fields substituted into a shared template.
    Input {
        /// The fields, each one a `{name}` placeholder.
        inputs: Vec<InputField>,
        /// Template the fields are substituted into.
        pipeline_override: Option<Fragment>,
    },
}

/// One concrete choice within a select or switch option.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Case {
    /// Case name, unique within its option.
    pub name: String,
    /// Fragment merged when this case is active.
    #[serde(default)]
    pub pipeline_override: Option<Fragment>,
    /// Nested option keys resolved while this case is active.
    #[serde(default, rename = "option")]
    pub options: Vec<String>,
}

/// How an input value is coerced when substituted into a template.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PipelineType {
    /// Inserted verbatim.
    #[default]
    String,
    /// Inserted as a bare number; empty becomes `0`.
    #[serde(alias = "integer")]
    Int,
    /// Inserted as `true` or `false`.
    #[serde(alias = "boolean")]
    Bool,
}

/// A single field of an input option. Its name doubles as the `{name}` placeholder.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct InputField {
    /// Field name and placeholder token.
    pub name: String,
    /// How the value is coerced on substitution.
    #[serde(default)]
    pub pipeline_type: PipelineType,
    /// Value used when the operator recorded none.
    #[serde(default, deserialize_with = "lenient_string")]
    pub default: Option<String>,
    /// Validation regex, checked by the presentation layer only.
    #[serde(default)]
    pub verify: Option<String>,
    /// Message shown when `verify` does not match.
    #[serde(default)]
    pub pattern_msg: Option<String>,
}

/// Wire shape of an option definition. `type` defaults to `select`, which
/// a tagged enum cannot express directly.
#[derive(Deserialize, Debug)]
struct RawOptionDefinition {
    #[serde(default, rename = "type")]
    kind: OptionKind,
    #[serde(default)]
    cases: Vec<Case>,
    #[serde(default)]
    default_case: Option<String>,
    #[serde(default)]
    inputs: Vec<InputField>,
    #[serde(default)]
    pipeline_override: Option<Fragment>,
}

impl From<RawOptionDefinition> for OptionDefinition {
    fn from(raw: RawOptionDefinition) -> Self {
        match raw.kind {
            OptionKind::Select => Self::Select {
                cases: raw.cases,
                default_case: raw.default_case,
            },
            OptionKind::Switch => Self::Switch { cases: raw.cases },
            OptionKind::Input => Self::Input {
                inputs: raw.inputs,
                pipeline_override: raw.pipeline_override,
            },
        }
    }
}

impl ProjectInterface {
    /// Looks up a task definition by name.
    pub fn task(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// Looks up an option definition by key.
    pub fn option(&self, key: &str) -> Option<&OptionDefinition> {
        self.options.get(key)
    }

    /// Iterates the tasks usable with the given controller and resource, in schema order.
    /// A `None` filter matches every task.
    pub fn available_tasks<'a>(
        &'a self,
        controller: Option<&'a str>,
        resource: Option<&'a str>,
    ) -> impl Iterator<Item = &'a TaskDefinition> {
        self.tasks
            .iter()
            .filter(move |task| task.is_available_for(controller, resource))
    }
}

impl TaskDefinition {
    /// Whether this task may run with the given controller and resource.
    pub fn is_available_for(&self, controller: Option<&str>, resource: Option<&str>) -> bool {
        fn allowed(restriction: &[String], candidate: Option<&str>) -> bool {
            match candidate {
                Some(name) if !restriction.is_empty() => restriction.iter().any(|r| r == name),
                _ => true,
            }
        }
        allowed(&self.controller, controller) && allowed(&self.resource, resource)
    }
}

impl OptionDefinition {
    /// The kind this definition was declared as.
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Select { .. } => OptionKind::Select,
            Self::Switch { .. } => OptionKind::Switch,
            Self::Input { .. } => OptionKind::Input,
        }
    }

    /// The declared cases. Always empty for input options.
    pub fn cases(&self) -> &[Case] {
        match self {
            Self::Select { cases, .. } | Self::Switch { cases } => cases,
            Self::Input { .. } => &[],
        }
    }

    /// Finds a case by its exact name.
    pub fn find_case(&self, name: &str) -> Option<&Case> {
        self.cases().iter().find(|case| case.name == name)
    }

    /// The case name a switch resolves to for the given state.
    ///
    /// The first case whose name is in the canonical on/off set wins; when none
    /// matches, the literal `"Yes"`/`"No"` is returned so the lookup fails softly.
    pub fn switch_case_name(&self, on: bool) -> &str {
        let (names, fallback) = if on {
            (&SWITCH_ON_NAMES, SWITCH_ON_FALLBACK)
        } else {
            (&SWITCH_OFF_NAMES, SWITCH_OFF_FALLBACK)
        };
        self.cases()
            .iter()
            .find(|case| names.iter().any(|n| n.eq_ignore_ascii_case(&case.name)))
            .map_or(fallback, |case| case.name.as_str())
    }

    /// The case name used when the operator has not recorded a selection.
    pub fn default_case_name(&self) -> Option<&str> {
        match self {
            Self::Select {
                cases,
                default_case,
            } => default_case
                .as_deref()
                .or_else(|| cases.first().map(|case| case.name.as_str())),
            Self::Switch { .. } => Some(self.switch_case_name(false)),
            Self::Input { .. } => None,
        }
    }
}

impl InputField {
    /// The raw value for this field: the recorded one, else the declared default, else empty.
    pub fn raw_value<'v>(&'v self, values: &'v InputValues) -> &'v str {
        values
            .get(&self.name)
            .map(String::as_str)
            .or(self.default.as_deref())
            .unwrap_or("")
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Select => "select",
            Self::Switch => "switch",
            Self::Input => "input",
        };
        f.write_str(name)
    }
}

// --- SELECTION MODELS ---
// Owned by the UI/state layer; the compiler only reads snapshots.

/// The operator's recorded value for one option of one task instance.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SelectedValue {
    /// The chosen case of a select option.
    Select {
        /// Name of the chosen case.
        #[serde(rename = "caseName", alias = "case_name")]
        case_name: String,
    },
    /// The state of a switch option.
    Switch {
        /// `true` selects the on case.
        value: bool,
    },
    /// The raw field values of an input option.
    Input {
        /// Values keyed by field name.
        #[serde(default, deserialize_with = "lenient_string_map")]
        values: InputValues,
    },
}

impl SelectedValue {
    /// The option kind this value belongs to.
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Select { .. } => OptionKind::Select,
            Self::Switch { .. } => OptionKind::Switch,
            Self::Input { .. } => OptionKind::Input,
        }
    }

    /// A select value choosing `case_name`.
    pub fn select(case_name: impl Into<String>) -> Self {
        Self::Select {
            case_name: case_name.into(),
        }
    }

    /// A switch value.
    pub fn switch(value: bool) -> Self {
        Self::Switch { value }
    }

    /// An input value from field/value pairs.
    pub fn input<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Input {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One entry of the operator's task list.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectedTask {
    /// Instance id; lets one task appear several times in a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the task definition this entry instantiates.
    #[serde(rename = "taskName", alias = "task_name")]
    pub task_name: String,
    /// Disabled entries are skipped by batch compilation.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Recorded option values.
    #[serde(default)]
    pub options: ValueStore,
}

impl SelectedTask {
    /// Creates an enabled task instance with no recorded option values.
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            id: None,
            task_name: task_name.into(),
            enabled: true,
            options: ValueStore::new(),
        }
    }

    /// Records a value for an option key.
    pub fn with_value(mut self, key: impl Into<String>, value: SelectedValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Marks the entry disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The id if one was recorded, otherwise the task name. Used in messages.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.task_name)
    }
}

fn default_enabled() -> bool {
    true
}

// --- LENIENT DESERIALIZATION HELPERS ---
// Schema authors and hand-written selection files often write `5` or `true`
// where a raw string is expected.

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_to_string))
}

fn lenient_string_map<'de, D>(deserializer: D) -> Result<InputValues, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, scalar_to_string(v).unwrap_or_default()))
        .collect())
}
