// src/core/interpolator.rs

//! # Interpolator
//!
//! Substitutes the `{field}` placeholders of an input option's template with
//! the operator's values, coerced to each field's declared pipeline type.
//!
//! Two strategies are available:
//!
//! * **Textual** (default): the template is serialized to JSON text, every
//!   token is replaced in the text and the result is parsed back. `int` and
//!   `bool` fields also replace the quoted form `"{field}"`, so authors may
//!   quote the placeholder or not. String values are inserted verbatim, so a
//!   value containing a quote or backslash yields invalid JSON, which the
//!   caller treats as a soft failure.
//! * **Structural**: the parsed template is walked and placeholders are
//!   replaced inside string leaves and keys. A string that is exactly one
//!   `int`/`bool` placeholder becomes a typed JSON value. No value can break
//!   the document structure.

use crate::{
    constants::{EMPTY_INT_LITERAL, TRUTHY_INPUTS},
    models::{Fragment, InputField, InputValues, PipelineType},
};
use lazy_static::lazy_static;
use regex::{Captures, NoExpand, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::borrow::Cow;
use thiserror::Error;

lazy_static! {
    // Any `{name}` token. Only used by the structural walk; the textual
    // strategy builds one exact pattern per declared field.
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{([^{}]+)\}").unwrap();
}

/// Errors produced while substituting a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    /// The text after substitution does not parse as JSON.
    #[error("substituted template is not valid JSON ({reason}): {text}")]
    InvalidJson {
        /// The text that failed to parse.
        text: String,
        /// The parser error.
        reason: String,
    },
    /// The text parsed, but not into an object.
    #[error("substituted template is not a JSON object: {text}")]
    NotAnObject {
        /// The parsed text.
        text: String,
    },
    /// A lone `int` placeholder received a value that is not a number.
    #[error("value '{value}' of field '{field}' is not a valid number")]
    InvalidNumber {
        /// The `int` field.
        field: String,
        /// The value after coercion.
        value: String,
    },
    /// The replacement pattern for a field could not be compiled.
    #[error("could not build a replacement pattern for '{token}': {reason}")]
    Pattern {
        /// The token being replaced.
        token: String,
        /// The regex error.
        reason: String,
    },
}

/// Selects how placeholders are substituted.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionStrategy {
    /// Replace tokens in the serialized text, then re-parse.
    #[default]
    Textual,
    /// Replace tokens inside the parsed tree.
    Structural,
}

/// Substitutes `template` with the chosen strategy.
pub fn substitute_with(
    strategy: SubstitutionStrategy,
    template: &Fragment,
    values: &InputValues,
    fields: &[InputField],
) -> Result<Fragment, SubstitutionError> {
    match strategy {
        SubstitutionStrategy::Textual => substitute(template, values, fields),
        SubstitutionStrategy::Structural => substitute_structural(template, values, fields),
    }
}

/// Textual substitution: serialize, replace tokens, re-parse.
///
/// Fields absent from `values` fall back to their declared default, then to
/// an empty string. Fields not referenced by the template are ignored, and
/// tokens without a field definition are left as literal text.
pub fn substitute(
    template: &Fragment,
    values: &InputValues,
    fields: &[InputField],
) -> Result<Fragment, SubstitutionError> {
    let mut text = serde_json::to_string(template).map_err(|e| SubstitutionError::InvalidJson {
        text: String::new(),
        reason: e.to_string(),
    })?;

    for field in fields {
        let literal = coerce(field.raw_value(values), field.pipeline_type);
        let token = format!("{{{}}}", field.name);

        if field.pipeline_type != PipelineType::String {
            // Strip the quotes around a quoted placeholder so the value lands bare.
            text = replace_token(&text, &format!("\"{}\"", token), &literal)?;
        }
        text = replace_token(&text, &token, &literal)?;
    }

    log::trace!("Substituted template text: {}", text);
    parse_fragment(text)
}

/// Structural substitution: walk the parsed template and replace tokens in place.
pub fn substitute_structural(
    template: &Fragment,
    values: &InputValues,
    fields: &[InputField],
) -> Result<Fragment, SubstitutionError> {
    StructuralWalk { values, fields }.substitute_object(template)
}

/// Renders a raw input value as the literal inserted for the given pipeline type.
pub fn coerce(raw: &str, pipeline_type: PipelineType) -> Cow<'_, str> {
    match pipeline_type {
        PipelineType::String => Cow::Borrowed(raw),
        PipelineType::Int if raw.is_empty() => Cow::Borrowed(EMPTY_INT_LITERAL),
        PipelineType::Int => Cow::Borrowed(raw),
        PipelineType::Bool => Cow::Borrowed(if is_truthy(raw) { "true" } else { "false" }),
    }
}

/// Whether a raw value reads as `true` for a `bool` field.
pub fn is_truthy(raw: &str) -> bool {
    TRUTHY_INPUTS
        .iter()
        .any(|truthy| truthy.eq_ignore_ascii_case(raw))
}

fn replace_token(text: &str, token: &str, literal: &str) -> Result<String, SubstitutionError> {
    let pattern = Regex::new(&regex::escape(token)).map_err(|e| SubstitutionError::Pattern {
        token: token.to_string(),
        reason: e.to_string(),
    })?;
    // `NoExpand` keeps `$` in operator values from being read as a group reference.
    Ok(pattern.replace_all(text, NoExpand(literal)).into_owned())
}

fn parse_fragment(text: String) -> Result<Fragment, SubstitutionError> {
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SubstitutionError::NotAnObject { text }),
        Err(e) => Err(SubstitutionError::InvalidJson {
            reason: e.to_string(),
            text,
        }),
    }
}

struct StructuralWalk<'a> {
    values: &'a InputValues,
    fields: &'a [InputField],
}

impl StructuralWalk<'_> {
    fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn substitute_object(&self, object: &Fragment) -> Result<Fragment, SubstitutionError> {
        object
            .iter()
            .map(|(key, value)| {
                self.substitute_value(value)
                    .map(|substituted| (self.substitute_text(key), substituted))
            })
            .collect()
    }

    fn substitute_value(&self, value: &Value) -> Result<Value, SubstitutionError> {
        match value {
            Value::String(s) => self.substitute_string(s),
            Value::Array(items) => items
                .iter()
                .map(|item| self.substitute_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(object) => self.substitute_object(object).map(Value::Object),
            other => Ok(other.clone()),
        }
    }

    fn substitute_string(&self, s: &str) -> Result<Value, SubstitutionError> {
        if let Some(field) = self.whole_token_field(s) {
            let literal = coerce(field.raw_value(self.values), field.pipeline_type);
            match field.pipeline_type {
                PipelineType::Int => {
                    return serde_json::from_str::<Number>(&literal)
                        .map(Value::Number)
                        .map_err(|_| SubstitutionError::InvalidNumber {
                            field: field.name.clone(),
                            value: literal.into_owned(),
                        });
                }
                PipelineType::Bool => return Ok(Value::Bool(literal == "true")),
                PipelineType::String => {}
            }
        }
        Ok(Value::String(self.substitute_text(s)))
    }

    /// The field a string refers to when the string is nothing but one placeholder.
    fn whole_token_field(&self, s: &str) -> Option<&InputField> {
        let captures = PLACEHOLDER_RE.captures(s)?;
        let whole = captures.get(0)?;
        if whole.start() != 0 || whole.end() != s.len() {
            return None;
        }
        self.field(captures.get(1)?.as_str())
    }

    fn substitute_text(&self, s: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(s, |captures: &Captures<'_>| {
                let whole = captures.get(0).map_or("", |m| m.as_str());
                let name = captures.get(1).map_or("", |m| m.as_str());
                match self.field(name) {
                    Some(field) => {
                        coerce(field.raw_value(self.values), field.pipeline_type).into_owned()
                    }
                    None => whole.to_string(),
                }
            })
            .into_owned()
    }
}
