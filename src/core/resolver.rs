// src/core/resolver.rs

//! # Option Resolver
//!
//! Walks one option key at a time: finds the active case (or the input
//! values), merges that branch's fragment into the accumulator and recurses
//! into the branch's nested options. Every failure is soft: it is logged,
//! recorded as a diagnostic, and resolution moves on to the next sibling.

use crate::{
    core::{
        interpolator::{self, SubstitutionError},
        merge::merge,
        settings::CompilerSettings,
    },
    models::{
        Case, Fragment, InputValues, OptionDefinition, ProjectInterface, SelectedValue,
        ValueStore,
    },
};
use thiserror::Error;

/// Soft failures met while compiling. None of them aborts a compilation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A selected task names no task definition.
    #[error("Task '{task}' is not defined in the project interface.")]
    UnknownTask {
        /// The task name as selected.
        task: String,
    },
    /// An option key is referenced but not defined.
    #[error("Option '{option}' is referenced but not defined.")]
    UnknownOption {
        /// The missing option key.
        option: String,
    },
    /// The active case name matches no case of the option.
    #[error("Option '{option}' has no case named '{case}'.")]
    UnknownCase {
        /// The option key.
        option: String,
        /// The case name that matched nothing.
        case: String,
    },
    /// An input template did not survive substitution; its fragment was dropped.
    #[error("Template of option '{option}' was dropped: {source}")]
    MalformedTemplate {
        /// The input option key.
        option: String,
        /// Why substitution failed.
        #[source]
        source: SubstitutionError,
    },
    /// An option is nested inside itself along the active path.
    #[error("Option '{option}' re-enters itself through nesting: {path}")]
    CyclicOption {
        /// The re-entered option key.
        option: String,
        /// The nesting path, written `A -> B -> A`.
        path: String,
    },
    /// Nesting went deeper than the configured limit.
    ///
    /// Depth alone does not bound the work: a schema whose cases each nest
    /// the next level twice still costs `2^depth` resolutions, which is what
    /// [`ResolveError::BudgetExhausted`] cuts off.
    #[error("Maximum nesting depth ({depth}) exceeded while resolving option '{option}'.")]
    MaxDepthExceeded {
        /// The configured limit.
        depth: u32,
        /// The option that was not entered.
        option: String,
    },
    /// The task resolved more options than the configured budget allows.
    /// Reported once per task; everything after it is skipped.
    #[error("Resolution budget ({limit}) exhausted at option '{option}'. Remaining options skipped.")]
    BudgetExhausted {
        /// The configured limit.
        limit: u32,
        /// The first option that was skipped.
        option: String,
    },
}

impl ResolveError {
    /// Dangling references are routine in hand-written schemas and only logged
    /// at debug level; everything else is a warning.
    pub fn log_level(&self) -> log::Level {
        match self {
            Self::UnknownTask { .. } | Self::UnknownOption { .. } | Self::UnknownCase { .. } => {
                log::Level::Debug
            }
            _ => log::Level::Warn,
        }
    }
}

/// Resolves options of one task instance into a caller-owned accumulator.
#[derive(Debug)]
pub struct OptionResolver<'a> {
    schema: &'a ProjectInterface,
    values: &'a ValueStore,
    settings: &'a CompilerSettings,
    // Keys on the active nesting path, outermost first.
    path: Vec<&'a str>,
    resolutions: u32,
    diagnostics: Vec<ResolveError>,
}

impl<'a> OptionResolver<'a> {
    /// Creates a resolver over one task instance's values.
    pub fn new(
        schema: &'a ProjectInterface,
        values: &'a ValueStore,
        settings: &'a CompilerSettings,
    ) -> Self {
        Self {
            schema,
            values,
            settings,
            path: Vec::new(),
            resolutions: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Resolves `key` and everything its active branch nests, merging into `acc`.
    pub fn resolve(&mut self, key: &'a str, acc: &mut Fragment) {
        if self.path.contains(&key) {
            let path = self
                .path
                .iter()
                .chain(std::iter::once(&key))
                .copied()
                .collect::<Vec<_>>()
                .join(" -> ");
            self.report(ResolveError::CyclicOption {
                option: key.to_string(),
                path,
            });
            return;
        }
        if self.path.len() >= self.settings.max_depth as usize {
            self.report(ResolveError::MaxDepthExceeded {
                depth: self.settings.max_depth,
                option: key.to_string(),
            });
            return;
        }

        if self.resolutions >= self.settings.max_resolutions {
            if self.resolutions == self.settings.max_resolutions {
                self.report(ResolveError::BudgetExhausted {
                    limit: self.settings.max_resolutions,
                    option: key.to_string(),
                });
                // Past the limit: later attempts are skipped without reporting.
                self.resolutions = self.resolutions.saturating_add(1);
            }
            return;
        }

        let Some(definition) = self.schema.option(key) else {
            self.report(ResolveError::UnknownOption {
                option: key.to_string(),
            });
            return;
        };
        self.resolutions += 1;

        self.path.push(key);
        match definition {
            OptionDefinition::Select { .. } | OptionDefinition::Switch { .. } => {
                match self.active_case(key, definition) {
                    Ok(Some(case)) => self.apply_case(case, acc),
                    Ok(None) => log::debug!("Option '{}' declares no cases. Skipping.", key),
                    Err(e) => self.report(e),
                }
            }
            OptionDefinition::Input {
                inputs,
                pipeline_override,
            } => {
                if let Some(template) = pipeline_override {
                    let empty = InputValues::new();
                    let values = match self.values.get(key) {
                        Some(SelectedValue::Input { values }) => values,
                        _ => &empty,
                    };
                    match interpolator::substitute_with(
                        self.settings.substitution,
                        template,
                        values,
                        inputs,
                    ) {
                        Ok(fragment) => merge(acc, &fragment),
                        Err(source) => self.report(ResolveError::MalformedTemplate {
                            option: key.to_string(),
                            source,
                        }),
                    }
                }
            }
        }
        self.path.pop();
    }

    /// The diagnostics recorded so far, in the order they occurred.
    pub fn diagnostics(&self) -> &[ResolveError] {
        &self.diagnostics
    }

    /// Consumes the resolver, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<ResolveError> {
        self.diagnostics
    }

    fn apply_case(&mut self, case: &'a Case, acc: &mut Fragment) {
        if let Some(fragment) = &case.pipeline_override {
            merge(acc, fragment);
        }
        for nested in &case.options {
            self.resolve(nested, acc);
        }
    }

    /// Picks the case a select/switch option resolves to. `Ok(None)` means the
    /// option has nothing to select from.
    fn active_case(
        &self,
        key: &str,
        definition: &'a OptionDefinition,
    ) -> Result<Option<&'a Case>, ResolveError> {
        let recorded = self.values.get(key);
        if let Some(mismatched) = recorded.filter(|value| value.kind() != definition.kind()) {
            log::debug!(
                "Option '{}' is a {} option but holds {:?}. Using its default.",
                key,
                definition.kind(),
                mismatched
            );
        }
        let case_name = active_case_name(definition, recorded);

        let Some(case_name) = case_name else {
            return Ok(None);
        };
        definition
            .find_case(case_name)
            .map(Some)
            .ok_or_else(|| ResolveError::UnknownCase {
                option: key.to_string(),
                case: case_name.to_string(),
            })
    }

    fn report(&mut self, error: ResolveError) {
        log::log!(error.log_level(), "{}", error);
        self.diagnostics.push(error);
    }
}

/// The case name a recorded value selects, falling back to the option's default.
///
/// A value of the wrong kind for the option counts as no value.
pub fn active_case_name<'d>(
    definition: &'d OptionDefinition,
    recorded: Option<&'d SelectedValue>,
) -> Option<&'d str> {
    match (definition, recorded) {
        (OptionDefinition::Select { .. }, Some(SelectedValue::Select { case_name })) => {
            Some(case_name.as_str())
        }
        (OptionDefinition::Switch { .. }, Some(SelectedValue::Switch { value })) => {
            Some(definition.switch_case_name(*value))
        }
        _ => definition.default_case_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn schema(value: Value) -> ProjectInterface {
        serde_json::from_value(value).unwrap()
    }

    fn resolve_one(
        pi: &ProjectInterface,
        values: &ValueStore,
        key: &str,
    ) -> (Value, Vec<ResolveError>) {
        let settings = CompilerSettings::default();
        let mut acc = Fragment::new();
        let mut resolver = OptionResolver::new(pi, values, &settings);
        resolver.resolve(key, &mut acc);
        (Value::Object(acc), resolver.into_diagnostics())
    }

    fn switch_schema() -> ProjectInterface {
        schema(json!({
            "option": {
                "Auto": {
                    "type": "switch",
                    "cases": [
                        { "name": "Y", "pipeline_override": { "Auto": { "enabled": true } } },
                        { "name": "N", "pipeline_override": { "Auto": { "enabled": false } } }
                    ]
                }
            }
        }))
    }

    #[test]
    fn test_switch_on_resolves_yes_case() {
        let pi = switch_schema();
        let values = ValueStore::from([("Auto".to_string(), SelectedValue::switch(true))]);
        let (doc, diagnostics) = resolve_one(&pi, &values, "Auto");
        assert_eq!(doc, json!({ "Auto": { "enabled": true } }));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_switch_default_resolves_no_case() {
        let pi = switch_schema();
        let (doc, _) = resolve_one(&pi, &ValueStore::new(), "Auto");
        assert_eq!(doc, json!({ "Auto": { "enabled": false } }));
    }

    #[test]
    fn test_select_uses_default_case_then_first_case() {
        let pi = schema(json!({
            "option": {
                "WithDefault": {
                    "default_case": "B",
                    "cases": [
                        { "name": "A", "pipeline_override": { "k": "a" } },
                        { "name": "B", "pipeline_override": { "k": "b" } }
                    ]
                },
                "WithoutDefault": {
                    "cases": [
                        { "name": "A", "pipeline_override": { "k": "a" } },
                        { "name": "B", "pipeline_override": { "k": "b" } }
                    ]
                }
            }
        }));
        assert_eq!(resolve_one(&pi, &ValueStore::new(), "WithDefault").0, json!({ "k": "b" }));
        assert_eq!(resolve_one(&pi, &ValueStore::new(), "WithoutDefault").0, json!({ "k": "a" }));
    }

    #[test]
    fn test_nested_option_resolves_even_when_not_top_level() {
        let pi = schema(json!({
            "option": {
                "Mode": {
                    "cases": [
                        { "name": "Farm", "pipeline_override": { "Mode": { "next": "Farm" } }, "option": ["Stage"] },
                        { "name": "Idle" }
                    ]
                },
                "Stage": {
                    "cases": [{ "name": "1-7", "pipeline_override": { "Stage": { "text": "1-7" } } }]
                }
            }
        }));
        let values = ValueStore::from([("Mode".to_string(), SelectedValue::select("Farm"))]);
        let (doc, diagnostics) = resolve_one(&pi, &values, "Mode");
        assert_eq!(
            doc,
            json!({ "Mode": { "next": "Farm" }, "Stage": { "text": "1-7" } })
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_case_fragment_merges_before_nested_fragments() {
        let pi = schema(json!({
            "option": {
                "Outer": {
                    "cases": [{ "name": "on", "pipeline_override": { "N": { "v": "outer", "keep": 1 } }, "option": ["Inner"] }]
                },
                "Inner": {
                    "cases": [{ "name": "on", "pipeline_override": { "N": { "v": "inner" } } }]
                }
            }
        }));
        let (doc, _) = resolve_one(&pi, &ValueStore::new(), "Outer");
        assert_eq!(doc, json!({ "N": { "v": "inner", "keep": 1 } }));
    }

    #[test]
    fn test_dangling_references_are_skipped() {
        let pi = schema(json!({
            "option": {
                "Parent": {
                    "cases": [{ "name": "A", "option": ["Ghost", "Child"] }]
                },
                "Child": {
                    "cases": [{ "name": "A", "pipeline_override": { "child": true } }]
                }
            }
        }));
        let (doc, diagnostics) = resolve_one(&pi, &ValueStore::new(), "Parent");
        assert_eq!(doc, json!({ "child": true }));
        assert_eq!(
            diagnostics,
            vec![ResolveError::UnknownOption {
                option: "Ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_case_is_skipped() {
        let pi = switch_schema();
        let values = ValueStore::from([("Auto".to_string(), SelectedValue::select("Maybe"))]);
        // A select value on a switch option falls back to the switch default.
        let (doc, _) = resolve_one(&pi, &values, "Auto");
        assert_eq!(doc, json!({ "Auto": { "enabled": false } }));

        let pi = schema(json!({
            "option": { "Pick": { "cases": [{ "name": "A", "pipeline_override": { "a": 1 } }] } }
        }));
        let values = ValueStore::from([("Pick".to_string(), SelectedValue::select("Z"))]);
        let (doc, diagnostics) = resolve_one(&pi, &values, "Pick");
        assert_eq!(doc, json!({}));
        assert!(matches!(
            diagnostics.as_slice(),
            [ResolveError::UnknownCase { case, .. }] if case == "Z"
        ));
    }

    #[test]
    fn test_input_option_substitutes_selected_values() {
        let pi = schema(json!({
            "option": {
                "Times": {
                    "type": "input",
                    "inputs": [
                        { "name": "n", "pipeline_type": "int", "default": "1" },
                        { "name": "label", "default": "run" }
                    ],
                    "pipeline_override": { "Loop": { "times": "{n}", "label": "{label}" } }
                }
            }
        }));
        let values = ValueStore::from([("Times".to_string(), SelectedValue::input([("n", "9")]))]);
        let (doc, _) = resolve_one(&pi, &values, "Times");
        assert_eq!(doc, json!({ "Loop": { "times": 9, "label": "run" } }));

        let (defaulted, _) = resolve_one(&pi, &ValueStore::new(), "Times");
        assert_eq!(defaulted, json!({ "Loop": { "times": 1, "label": "run" } }));
    }

    #[test]
    fn test_malformed_template_is_dropped_and_reported() {
        let pi = schema(json!({
            "option": {
                "Bad": {
                    "type": "input",
                    "inputs": [{ "name": "n", "pipeline_type": "int" }],
                    "pipeline_override": { "Loop": { "times": "{n}" } }
                }
            }
        }));
        let values = ValueStore::from([("Bad".to_string(), SelectedValue::input([("n", "x")]))]);
        let (doc, diagnostics) = resolve_one(&pi, &values, "Bad");
        assert_eq!(doc, json!({}));
        assert!(matches!(
            diagnostics.as_slice(),
            [ResolveError::MalformedTemplate { option, .. }] if option == "Bad"
        ));
    }

    #[test]
    fn test_cycles_are_cut() {
        let pi = schema(json!({
            "option": {
                "A": { "cases": [{ "name": "x", "pipeline_override": { "a": 1 }, "option": ["B"] }] },
                "B": { "cases": [{ "name": "x", "pipeline_override": { "b": 1 }, "option": ["A"] }] }
            }
        }));
        let (doc, diagnostics) = resolve_one(&pi, &ValueStore::new(), "A");
        assert_eq!(doc, json!({ "a": 1, "b": 1 }));
        assert_eq!(
            diagnostics,
            vec![ResolveError::CyclicOption {
                option: "A".to_string(),
                path: "A -> B -> A".to_string()
            }]
        );
    }

    #[test]
    fn test_same_option_may_appear_in_sibling_branches() {
        let pi = schema(json!({
            "option": {
                "Root": { "cases": [{ "name": "x", "option": ["Left", "Right"] }] },
                "Left": { "cases": [{ "name": "x", "option": ["Shared"] }] },
                "Right": { "cases": [{ "name": "x", "option": ["Shared"] }] },
                "Shared": { "cases": [{ "name": "x", "pipeline_override": { "shared": true } }] }
            }
        }));
        let (doc, diagnostics) = resolve_one(&pi, &ValueStore::new(), "Root");
        assert_eq!(doc, json!({ "shared": true }));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_max_depth_is_enforced() {
        let pi = schema(json!({
            "option": {
                "L1": { "cases": [{ "name": "x", "pipeline_override": { "l1": 1 }, "option": ["L2"] }] },
                "L2": { "cases": [{ "name": "x", "pipeline_override": { "l2": 1 }, "option": ["L3"] }] },
                "L3": { "cases": [{ "name": "x", "pipeline_override": { "l3": 1 } }] }
            }
        }));
        let settings = CompilerSettings {
            max_depth: 2,
            ..Default::default()
        };
        let values = ValueStore::new();
        let mut acc = Fragment::new();
        let mut resolver = OptionResolver::new(&pi, &values, &settings);
        resolver.resolve("L1", &mut acc);

        assert_eq!(Value::Object(acc), json!({ "l1": 1, "l2": 1 }));
        assert!(matches!(
            resolver.diagnostics(),
            [ResolveError::MaxDepthExceeded { depth: 2, option }] if option == "L3"
        ));
    }

    #[test]
    fn test_resolution_budget_cuts_exponential_fan_out() {
        // Every level nests the next one twice: 2^20 resolutions without a budget.
        let mut options = serde_json::Map::new();
        for level in 0..20 {
            let nested = vec![format!("L{}", level + 1); 2];
            options.insert(
                format!("L{}", level),
                json!({ "cases": [{ "name": "x", "pipeline_override": { "hit": level }, "option": nested }] }),
            );
        }
        options.insert("L20".to_string(), json!({ "cases": [{ "name": "x" }] }));
        let pi = schema(json!({ "option": options }));
        let settings = CompilerSettings {
            max_resolutions: 100,
            ..Default::default()
        };
        let values = ValueStore::new();
        let mut acc = Fragment::new();
        let mut resolver = OptionResolver::new(&pi, &values, &settings);
        resolver.resolve("L0", &mut acc);

        assert!(acc.contains_key("hit"));
        assert!(matches!(
            resolver.diagnostics(),
            [ResolveError::BudgetExhausted { limit: 100, .. }]
        ));
    }
}
