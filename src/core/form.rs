//! # Form Synthesis Engine
//!
//! Compiles a command's option schema into toolkit-neutral widget descriptors,
//! and decodes the raw text a form submits back into a typed payload.
//!
//! Widget selection is an exhaustive match on [`ValueType`]:
//!
//! | value type   | widget            | initial value                                   |
//! |--------------|-------------------|-------------------------------------------------|
//! | enumerated   | single select     | default entry, else a placeholder when required |
//! | string / any | multi-line text   | default value                                   |
//! | integer      | numeric, step 1   | default value                                   |
//! | float        | numeric, any step | default value                                   |
//! | bool         | toggle (`"true"`) | checked iff the default is truthy               |
//!
//! Unrecognized types produce no widget and no submission entry; they are
//! reported as [`SchemaDiagnostic`]s.

use crate::{
    core::menu::display_label,
    models::{OptionDefinition, OptionSchema, Payload, SizeBounds, Submission, ValueType},
};
use serde_json::{Number, Value};
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Label of the non-submittable entry injected into required selects without a default.
pub const PLACEHOLDER_LABEL: &str = "Select an Option";

/// Literal a toggle submits when active.
pub const TOGGLE_ON_VALUE: &str = "true";

// --- DESCRIPTORS ---

#[derive(Debug, Clone, PartialEq)]
pub struct FormDescriptor {
    pub invocation_path: String,
    pub fields: Vec<FieldDescriptor>,
    pub diagnostics: Vec<SchemaDiagnostic>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub description: String,
    pub required: bool,
    pub widget: Widget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Select(SelectWidget),
    TextArea(TextAreaWidget),
    Number(NumberWidget),
    Toggle(ToggleWidget),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectWidget {
    pub entries: Vec<SelectEntry>,
    /// Index into `entries`; `None` only when there are no entries at all.
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectEntry {
    pub value: String,
    pub label: String,
    /// `false` for the injected placeholder.
    pub submittable: bool,
}

/// Length hints are carried for display only; they are never enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAreaWidget {
    pub initial: String,
    pub min_length: Option<Number>,
    pub max_length: Option<Number>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberWidget {
    pub initial: String,
    /// Inclusive bounds.
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: NumberStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStep {
    Integer,
    /// Fractional values allowed.
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleWidget {
    pub checked: bool,
}

/// An option that was skipped because its type is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDiagnostic {
    pub option: String,
    pub type_tag: String,
}

/// A presentation-layer constraint the current value violates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldIssue {
    #[error("'{field}' is required.")]
    Missing { field: String },
    #[error("'{field}' expects a number, got '{value}'.")]
    NotANumber { field: String, value: String },
    #[error("'{field}' expects a whole number, got '{value}'.")]
    NotAWholeNumber { field: String, value: String },
    #[error("'{field}' must be at least {bound}.")]
    BelowMinimum { field: String, bound: Number },
    #[error("'{field}' must be at most {bound}.")]
    AboveMaximum { field: String, bound: Number },
    #[error("'{field}' does not accept '{value}'.")]
    NotAnEntry { field: String, value: String },
}

/// Raised when submitted text cannot be coerced to the option's declared type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Field '{field}' expects an integer, got '{value}': {source}")]
    Integer {
        field: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("Field '{field}' expects a float, got '{value}': {source}")]
    Float {
        field: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("Field '{field}' expects a finite float, got '{value}'.")]
    NonFiniteFloat { field: String, value: String },
    #[error("Field '{field}' expects 'true' or 'false', got '{value}'.")]
    Bool { field: String, value: String },
}

// --- SYNTHESIS ---

/// Builds the form for one command. Exactly one field per recognized option,
/// in schema order.
pub fn synthesize(options: &OptionSchema, invocation_path: &str) -> FormDescriptor {
    let mut fields = Vec::with_capacity(options.len());
    let mut diagnostics = Vec::new();

    for (name, definition) in options {
        match synthesize_widget(definition) {
            Some(widget) => fields.push(FieldDescriptor {
                name: name.clone(),
                label: display_label(name),
                description: definition.description.clone(),
                required: definition.required,
                widget,
            }),
            None => {
                let type_tag = definition.value_type.tag().to_string();
                log::warn!(
                    "Skipping option '{}' of '{}': unrecognized value type '{}'",
                    name,
                    invocation_path,
                    type_tag
                );
                diagnostics.push(SchemaDiagnostic {
                    option: name.clone(),
                    type_tag,
                });
            }
        }
    }

    log::debug!(
        "Synthesized {} field(s) for '{}' ({} skipped)",
        fields.len(),
        invocation_path,
        diagnostics.len()
    );
    FormDescriptor {
        invocation_path: invocation_path.to_string(),
        fields,
        diagnostics,
    }
}

fn synthesize_widget(definition: &OptionDefinition) -> Option<Widget> {
    let default = definition.default_value.as_ref();
    let size = definition.size.clone().unwrap_or_default();

    let widget = match &definition.value_type {
        ValueType::Enumerated(values) => {
            Widget::Select(select_widget(values, default, definition.required))
        }
        ValueType::String | ValueType::Any => Widget::TextArea(TextAreaWidget {
            initial: default.map(literal_text).unwrap_or_default(),
            min_length: size.min,
            max_length: size.max,
        }),
        ValueType::Integer => number_widget(default, size, NumberStep::Integer),
        ValueType::Float => number_widget(default, size, NumberStep::Any),
        ValueType::Bool => Widget::Toggle(ToggleWidget {
            checked: default.is_some_and(is_truthy),
        }),
        ValueType::Unrecognized(_) => return None,
    };
    Some(widget)
}

fn select_widget(values: &[String], default: Option<&Value>, required: bool) -> SelectWidget {
    let mut entries: Vec<SelectEntry> = values
        .iter()
        .map(|value| SelectEntry {
            value: value.clone(),
            label: value.clone(),
            submittable: true,
        })
        .collect();

    let default_index = default
        .map(literal_text)
        .and_then(|text| entries.iter().position(|entry| entry.value == text));

    let selected = match default_index {
        Some(index) => Some(index),
        None if required => {
            entries.insert(
                0,
                SelectEntry {
                    value: String::new(),
                    label: PLACEHOLDER_LABEL.to_string(),
                    submittable: false,
                },
            );
            Some(0)
        }
        None if entries.is_empty() => None,
        None => Some(0),
    };

    SelectWidget { entries, selected }
}

fn number_widget(default: Option<&Value>, size: SizeBounds, step: NumberStep) -> Widget {
    Widget::Number(NumberWidget {
        initial: default.map(literal_text).unwrap_or_default(),
        min: size.min,
        max: size.max,
        step,
    })
}

/// Text form of a schema literal as an input would show it.
pub fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Truthiness of a schema literal: `false`, `0`, `""` and `null` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// --- PRESENTATION-LAYER CHECKS ---

impl FieldDescriptor {
    /// Whether an empty value must be refused. Toggles have no empty state.
    pub fn requires_value(&self) -> bool {
        self.required && !matches!(self.widget, Widget::Toggle(_))
    }

    /// Whether any value can pass [`check`](Self::check). A required select
    /// whose only entry is the placeholder can never be filled in.
    pub fn is_satisfiable(&self) -> bool {
        match &self.widget {
            Widget::Select(select) if self.requires_value() => {
                select.entries.iter().any(|entry| entry.submittable)
            }
            _ => true,
        }
    }

    /// The value this field submits when the user changes nothing.
    /// `None` means the field contributes no entry at all (unchecked toggle,
    /// placeholder or empty select).
    pub fn initial_value(&self) -> Option<String> {
        match &self.widget {
            Widget::Select(select) => select
                .selected
                .and_then(|index| select.entries.get(index))
                .filter(|entry| entry.submittable)
                .map(|entry| entry.value.clone()),
            Widget::TextArea(text) => Some(text.initial.clone()),
            Widget::Number(number) => Some(number.initial.clone()),
            Widget::Toggle(toggle) => toggle.checked.then(|| TOGGLE_ON_VALUE.to_string()),
        }
    }

    /// Checks a raw value against this field's presentation-layer constraints.
    /// `None` stands for "nothing submitted".
    pub fn check(&self, raw: Option<&str>) -> Result<(), FieldIssue> {
        let value = raw.unwrap_or("");
        if value.is_empty() {
            return if self.requires_value() {
                Err(FieldIssue::Missing {
                    field: self.name.clone(),
                })
            } else {
                Ok(())
            };
        }

        match &self.widget {
            Widget::Number(number) => check_number(&self.name, value, number),
            Widget::Select(select) => {
                let known = select
                    .entries
                    .iter()
                    .any(|entry| entry.submittable && entry.value == value);
                if known {
                    Ok(())
                } else {
                    Err(FieldIssue::NotAnEntry {
                        field: self.name.clone(),
                        value: value.to_string(),
                    })
                }
            }
            Widget::TextArea(_) | Widget::Toggle(_) => Ok(()),
        }
    }
}

fn check_number(field: &str, value: &str, number: &NumberWidget) -> Result<(), FieldIssue> {
    let parsed: f64 = value.trim().parse().map_err(|_| FieldIssue::NotANumber {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(FieldIssue::NotANumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    if number.step == NumberStep::Integer && value.trim().parse::<i64>().is_err() {
        return Err(FieldIssue::NotAWholeNumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    if let Some(min) = &number.min {
        if min.as_f64().is_some_and(|bound| parsed < bound) {
            return Err(FieldIssue::BelowMinimum {
                field: field.to_string(),
                bound: min.clone(),
            });
        }
    }
    if let Some(max) = &number.max {
        if max.as_f64().is_some_and(|bound| parsed > bound) {
            return Err(FieldIssue::AboveMaximum {
                field: field.to_string(),
                bound: max.clone(),
            });
        }
    }
    Ok(())
}

impl FormDescriptor {
    /// What the form submits if the user changes nothing, in field order.
    pub fn initial_submission(&self) -> Submission {
        self.fields
            .iter()
            .filter_map(|field| field.initial_value().map(|value| (field.name.clone(), value)))
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The first field no input can satisfy, if any.
    pub fn unsatisfiable_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| !field.is_satisfiable())
    }

    /// Runs every field's presentation-layer check against `submission`.
    pub fn check_submission(&self, submission: &Submission) -> Vec<FieldIssue> {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .check(submission.get(&field.name).map(String::as_str))
                    .err()
            })
            .collect()
    }
}

// --- DECODING ---

/// Decodes submitted text into the typed payload.
///
/// Empty values are omitted whatever `required` says; presentation-layer checks
/// are expected to have refused empty required fields already. Names without a
/// recognized definition are dropped. The first coercion failure rejects the
/// whole submission.
pub fn decode(submitted: &Submission, options: &OptionSchema) -> Result<Payload, DecodeError> {
    let mut payload = Payload::new();

    for (name, raw) in submitted {
        if raw.is_empty() {
            continue;
        }
        let Some(definition) = options.get(name) else {
            log::debug!("Dropping submitted field '{}': not in schema", name);
            continue;
        };

        let value = match &definition.value_type {
            ValueType::Integer => {
                let parsed = raw.trim().parse::<i64>().map_err(|e| DecodeError::Integer {
                    field: name.clone(),
                    value: raw.clone(),
                    source: e,
                })?;
                Value::from(parsed)
            }
            ValueType::Float => {
                let parsed = raw.trim().parse::<f64>().map_err(|e| DecodeError::Float {
                    field: name.clone(),
                    value: raw.clone(),
                    source: e,
                })?;
                let number = Number::from_f64(parsed).ok_or_else(|| DecodeError::NonFiniteFloat {
                    field: name.clone(),
                    value: raw.clone(),
                })?;
                Value::Number(number)
            }
            ValueType::Bool => match raw.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => {
                    return Err(DecodeError::Bool {
                        field: name.clone(),
                        value: raw.clone(),
                    });
                }
            },
            ValueType::Enumerated(_) | ValueType::String | ValueType::Any => {
                Value::String(raw.clone())
            }
            ValueType::Unrecognized(tag) => {
                log::debug!("Dropping submitted field '{}': unrecognized type '{}'", name, tag);
                continue;
            }
        };
        payload.insert(name.clone(), value);
    }

    log::debug!("Decoded payload: {:?}", payload);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> OptionSchema {
        serde_json::from_value(value).unwrap()
    }

    fn submission(pairs: &[(&str, &str)]) -> Submission {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn select_of(form: &FormDescriptor, name: &str) -> SelectWidget {
        match &form.field(name).unwrap().widget {
            Widget::Select(select) => select.clone(),
            other => panic!("expected select, got {:?}", other),
        }
    }

    #[test]
    fn test_enumerated_default_is_preselected() {
        let options = schema(json!({
            "env": { "value_type": { "accepted_value_list": ["a", "b"] }, "default_value": "b" }
        }));
        let form = synthesize(&options, "/api/run/deploy");
        let select = select_of(&form, "env");
        assert_eq!(select.entries.len(), 2);
        assert_eq!(select.entries[select.selected.unwrap()].value, "b");
        assert_eq!(form.initial_submission().get("env").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_required_enumerated_without_default_gets_placeholder() {
        let options = schema(json!({
            "env": { "value_type": { "accepted_value_list": ["a", "b"] }, "required": true }
        }));
        let form = synthesize(&options, "/api/run/deploy");
        let select = select_of(&form, "env");

        assert_eq!(select.entries.len(), 3);
        let placeholder = &select.entries[select.selected.unwrap()];
        assert_eq!(placeholder.label, PLACEHOLDER_LABEL);
        assert!(!placeholder.submittable);
        assert!(form.initial_submission().get("env").is_none());

        let issues = form.check_submission(&form.initial_submission());
        assert_eq!(
            issues,
            vec![FieldIssue::Missing {
                field: "env".to_string()
            }]
        );
    }

    #[test]
    fn test_optional_enumerated_without_default_selects_first() {
        let options = schema(json!({
            "level": { "value_type": { "accepted_value_list": ["low", "high"] } }
        }));
        let form = synthesize(&options, "/x");
        let select = select_of(&form, "level");
        assert_eq!(select.entries.len(), 2);
        assert_eq!(select.selected, Some(0));
    }

    #[test]
    fn test_numeric_default_matches_enumerated_entry() {
        let options = schema(json!({
            "replicas": { "value_type": { "accepted_value_list": ["1", "3"] }, "default_value": 3 }
        }));
        let select = select_of(&synthesize(&options, "/x"), "replicas");
        assert_eq!(select.selected, Some(1));
    }

    #[test]
    fn test_widget_per_value_type() {
        let options = schema(json!({
            "message": { "value_type": "string", "default_value": "hi", "size": { "min": 2, "max": 80 } },
            "count": { "value_type": "integer", "default_value": 3, "size": { "min": 1, "max": null } },
            "ratio": { "value_type": "float", "size": { "min": 0, "max": 1 } },
            "force": { "value_type": "bool", "default_value": true },
            "extra": { "value_type": "any" }
        }));
        let form = synthesize(&options, "/api/run/tool");
        assert_eq!(form.fields.len(), 5);
        assert!(form.diagnostics.is_empty());

        let Widget::TextArea(text) = &form.field("message").unwrap().widget else {
            panic!("string should be a text area");
        };
        assert_eq!(text.initial, "hi");
        assert_eq!(text.max_length.as_ref().and_then(Number::as_i64), Some(80));

        let Widget::Number(count) = &form.field("count").unwrap().widget else {
            panic!("integer should be numeric");
        };
        assert_eq!(count.initial, "3");
        assert_eq!(count.step, NumberStep::Integer);
        assert!(count.max.is_none());

        let Widget::Number(ratio) = &form.field("ratio").unwrap().widget else {
            panic!("float should be numeric");
        };
        assert_eq!(ratio.step, NumberStep::Any);
        assert_eq!(ratio.initial, "");

        assert_eq!(
            form.field("force").unwrap().widget,
            Widget::Toggle(ToggleWidget { checked: true })
        );
        assert!(matches!(form.field("extra").unwrap().widget, Widget::TextArea(_)));
    }

    #[test]
    fn test_unrecognized_type_is_skipped_with_diagnostic() {
        let options = schema(json!({
            "when": { "value_type": "datetime" },
            "name": { "value_type": "string" }
        }));
        let form = synthesize(&options, "/x");
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].name, "name");
        assert_eq!(
            form.diagnostics,
            vec![SchemaDiagnostic {
                option: "when".to_string(),
                type_tag: "datetime".to_string()
            }]
        );
    }

    #[test]
    fn test_malformed_option_is_skipped_with_diagnostic() {
        let info: crate::models::CommandInfo = serde_json::from_value(json!({
            "options": {
                "count": { "value_type": "integer", "size": { "max": "ten" } },
                "untyped": {},
                "name": { "value_type": "string" }
            }
        }))
        .unwrap();
        let form = synthesize(&info.options, "/x");
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].name, "name");
        let tags: Vec<_> = form
            .diagnostics
            .iter()
            .map(|d| (d.option.as_str(), d.type_tag.as_str()))
            .collect();
        assert_eq!(tags, vec![("count", "malformed"), ("untyped", "missing")]);
    }

    #[test]
    fn test_text_area_accepts_multi_line_values() {
        let options = schema(json!({
            "script": { "value_type": "string", "required": true, "default_value": "echo a\necho b" }
        }));
        let form = synthesize(&options, "/x");
        let field = form.field("script").unwrap();
        assert_eq!(field.initial_value().as_deref(), Some("echo a\necho b"));
        assert_eq!(field.check(Some("line one\r\nline two")), Ok(()));

        let payload = decode(&submission(&[("script", "line one\nline two")]), &options).unwrap();
        assert_eq!(payload.get("script"), Some(&json!("line one\nline two")));
    }

    #[test]
    fn test_required_select_without_entries_is_unsatisfiable() {
        let options = schema(json!({
            "target": { "value_type": { "accepted_value_list": [] }, "required": true },
            "mode": { "value_type": { "accepted_value_list": [] } },
            "env": { "value_type": { "accepted_value_list": ["dev"] }, "required": true }
        }));
        let form = synthesize(&options, "/x");
        assert!(!form.field("target").unwrap().is_satisfiable());
        assert!(form.field("mode").unwrap().is_satisfiable());
        assert!(form.field("env").unwrap().is_satisfiable());
        assert_eq!(form.unsatisfiable_field().unwrap().name, "target");

        let fine = synthesize(
            &schema(json!({ "env": { "value_type": "string", "required": true } })),
            "/x",
        );
        assert!(fine.unsatisfiable_field().is_none());
    }

    #[test]
    fn test_toggle_truthiness_of_defaults() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!(2)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
    }

    #[test]
    fn test_unchecked_toggle_submits_nothing() {
        let options = schema(json!({ "force": { "value_type": "bool", "required": true } }));
        let form = synthesize(&options, "/x");
        let field = form.field("force").unwrap();
        assert!(!field.requires_value());
        assert!(field.initial_value().is_none());
        assert!(form.check_submission(&form.initial_submission()).is_empty());
    }

    #[test]
    fn test_number_checks_respect_inclusive_bounds() {
        let options = schema(json!({
            "count": { "value_type": "integer", "size": { "min": 1, "max": 5 } },
            "ratio": { "value_type": "float", "size": { "min": 0.5 } }
        }));
        let form = synthesize(&options, "/x");
        let count = form.field("count").unwrap();
        assert!(count.check(Some("1")).is_ok());
        assert!(count.check(Some("5")).is_ok());
        assert!(matches!(count.check(Some("6")), Err(FieldIssue::AboveMaximum { .. })));
        assert!(matches!(count.check(Some("0")), Err(FieldIssue::BelowMinimum { .. })));
        assert!(matches!(count.check(Some("2.5")), Err(FieldIssue::NotAWholeNumber { .. })));
        assert!(matches!(count.check(Some("abc")), Err(FieldIssue::NotANumber { .. })));
        assert!(count.check(None).is_ok());

        let ratio = form.field("ratio").unwrap();
        assert!(ratio.check(Some("0.75")).is_ok());
        assert!(matches!(ratio.check(Some("0.25")), Err(FieldIssue::BelowMinimum { .. })));
    }

    #[test]
    fn test_string_length_hints_are_not_enforced() {
        let options = schema(json!({
            "note": { "value_type": "string", "size": { "min": 10, "max": 12 } }
        }));
        let form = synthesize(&options, "/x");
        assert!(form.field("note").unwrap().check(Some("short")).is_ok());
    }

    #[test]
    fn test_decode_omits_empty_even_when_required() {
        let options = schema(json!({ "a": { "value_type": "string", "required": true } }));
        let payload = decode(&submission(&[("a", "")]), &options).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_decode_coerces_by_declared_type() {
        let options = schema(json!({
            "n": { "value_type": "integer" },
            "f": { "value_type": "float" },
            "b": { "value_type": "bool" },
            "s": { "value_type": "string" },
            "e": { "value_type": { "accepted_value_list": ["x", "y"] } },
            "a": { "value_type": "any" }
        }));
        let payload = decode(
            &submission(&[("n", "42"), ("f", "3.5"), ("b", "true"), ("s", "42"), ("e", "y"), ("a", "false")]),
            &options,
        )
        .unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({ "n": 42, "f": 3.5, "b": true, "s": "42", "e": "y", "a": "false" })
        );
    }

    #[test]
    fn test_decode_keeps_submission_order() {
        let options = schema(json!({
            "first": { "value_type": "string" },
            "second": { "value_type": "string" }
        }));
        let payload = decode(&submission(&[("second", "2"), ("first", "1")]), &options).unwrap();
        let keys: Vec<_> = payload.keys().cloned().collect();
        assert_eq!(keys, vec!["second", "first"]);
    }

    #[test]
    fn test_decode_rejects_bad_numbers_and_booleans() {
        let options = schema(json!({
            "n": { "value_type": "integer" },
            "f": { "value_type": "float" },
            "b": { "value_type": "bool" }
        }));
        let err = decode(&submission(&[("n", "forty")]), &options).unwrap_err();
        assert!(matches!(err, DecodeError::Integer { ref field, .. } if field == "n"));
        assert!(err.to_string().contains("forty"));

        let err = decode(&submission(&[("f", "1.2.3")]), &options).unwrap_err();
        assert!(matches!(err, DecodeError::Float { .. }));

        let err = decode(&submission(&[("f", "inf")]), &options).unwrap_err();
        assert!(matches!(err, DecodeError::NonFiniteFloat { .. }));

        let err = decode(&submission(&[("b", "yes")]), &options).unwrap_err();
        assert!(matches!(err, DecodeError::Bool { .. }));
    }

    #[test]
    fn test_decode_drops_unknown_and_unrecognized_fields() {
        let options = schema(json!({ "when": { "value_type": "datetime" } }));
        let payload = decode(&submission(&[("when", "now"), ("ghost", "boo")]), &options).unwrap();
        assert!(payload.is_empty());
    }
}
