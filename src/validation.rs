//! Field-level validation shared by the request payloads.
//!
//! Payloads are deserialized with every field as an optional
//! [`serde_json::Value`], then checked field by field so one response can
//! name every offending field.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub(crate) fn required_str<'a>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &'a Option<Value>,
) -> Option<&'a str> {
    match value {
        None | Some(Value::Null) => {
            errors.add(field, "field required");
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            errors.add(field, "must be a string");
            None
        }
    }
}

pub(crate) fn required_f64(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<Value>,
) -> Option<f64> {
    match value {
        None | Some(Value::Null) => {
            errors.add(field, "field required");
            None
        }
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => Some(f),
            None => {
                errors.add(field, "must be a number");
                None
            }
        },
        Some(_) => {
            errors.add(field, "must be a number");
            None
        }
    }
}

/// Absent or null yields `Ok(None)`; anything but a positive integer is an error.
pub(crate) fn optional_id(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<Value>,
) -> Option<i64> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) if id > 0 => Some(id),
            _ => {
                errors.add(field, "must be a positive integer");
                None
            }
        },
        Some(_) => {
            errors.add(field, "must be a positive integer");
            None
        }
    }
}
