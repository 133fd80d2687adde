//! Recursive payload validation against a [`Schema`].
//!
//! Validation walks fields in declaration order and collects every error
//! in one pass, so retry feedback can name all offending fields at once
//! rather than surfacing them one attempt at a time.

use std::fmt;

use serde_json::Value;

use crate::schema::{Field, FieldKind, Schema};

/// A single validation failure with the path to the offending field.
///
/// Paths are dotted and indexed, e.g. `subtasks[2].name`. The root path
/// is empty when the payload cannot be interpreted as an object at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted/indexed path to the field.
    pub path: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Error at the payload root (no addressable field).
    #[must_use]
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "at root: {}", self.message)
        } else {
            write!(f, "at `{}`: {}", self.path, self.message)
        }
    }
}

/// Validates `payload` against `schema`, returning all errors found.
///
/// An empty result means the payload conforms. A payload that is not a
/// JSON object yields a single root error.
#[must_use]
pub fn validate(schema: &Schema, payload: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(map) = payload.as_object() {
        for field in schema.fields() {
            check_field(field, map, "", &mut errors);
        }
    } else {
        errors.push(FieldError::root(format!(
            "expected a JSON object, got {}",
            type_name(payload)
        )));
    }
    errors
}

fn check_field(
    field: &Field,
    map: &serde_json::Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) {
    let path = if prefix.is_empty() {
        field.name.clone()
    } else {
        format!("{prefix}.{}", field.name)
    };
    match map.get(&field.name) {
        Some(value) => check_kind(&field.kind, value, &path, errors),
        None => {
            if !matches!(field.kind, FieldKind::Optional(_)) {
                errors.push(FieldError {
                    path,
                    message: "required field is missing".to_string(),
                });
            }
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
    match kind {
        FieldKind::Integer { min, max } => match value.as_i64() {
            Some(n) => {
                if let Some(min) = min {
                    if n < *min {
                        push(errors, path, format!("{n} is below the minimum of {min}"));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        push(errors, path, format!("{n} is above the maximum of {max}"));
                    }
                }
            }
            None => push(
                errors,
                path,
                format!("expected an integer, got {}", type_name(value)),
            ),
        },
        FieldKind::Float => {
            if value.as_f64().is_none() {
                push(
                    errors,
                    path,
                    format!("expected a number, got {}", type_name(value)),
                );
            }
        }
        FieldKind::Bool => {
            if !value.is_boolean() {
                push(
                    errors,
                    path,
                    format!("expected a boolean, got {}", type_name(value)),
                );
            }
        }
        FieldKind::Text {
            min_len,
            require_uppercase,
        } => match value.as_str() {
            Some(s) => {
                if let Some(min_len) = min_len {
                    if s.chars().count() < *min_len {
                        push(
                            errors,
                            path,
                            format!("must be at least {min_len} characters"),
                        );
                    }
                }
                if *require_uppercase && s.chars().any(char::is_lowercase) {
                    push(errors, path, "must be ALL CAPS".to_string());
                }
            }
            None => push(
                errors,
                path,
                format!("expected a string, got {}", type_name(value)),
            ),
        },
        FieldKind::Choice(allowed) => match value.as_str() {
            Some(s) if allowed.iter().any(|option| option == s) => {}
            Some(s) => push(
                errors,
                path,
                format!("`{s}` is not one of [{}]", allowed.join(", ")),
            ),
            None => push(
                errors,
                path,
                format!(
                    "expected one of [{}], got {}",
                    allowed.join(", "),
                    type_name(value)
                ),
            ),
        },
        FieldKind::Object(schema) => match value.as_object() {
            Some(map) => {
                for field in schema.fields() {
                    check_field(field, map, path, errors);
                }
            }
            None => push(
                errors,
                path,
                format!("expected an object, got {}", type_name(value)),
            ),
        },
        FieldKind::List(element) => match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    check_kind(element, item, &format!("{path}[{index}]"), errors);
                }
            }
            None => push(
                errors,
                path,
                format!("expected an array, got {}", type_name(value)),
            ),
        },
        FieldKind::Optional(inner) => {
            if !value.is_null() {
                check_kind(inner, value, path, errors);
            }
        }
    }
}

fn push(errors: &mut Vec<FieldError>, path: &str, message: String) {
    errors.push(FieldError {
        path: path.to_string(),
        message,
    });
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
