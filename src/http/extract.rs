//! Extraction of structured errors from failed response bodies.
//!
//! The API reports failures in more than one body shape. [`classify`] reads
//! the human-facing shapes (`error`/`error_description` and
//! `message`/`validationErrors`), while [`error_code`] reads the
//! machine-facing `meta.error[].error_type` list used to detect an expired
//! token. The two are parsed independently.

use serde_json::{Map, Value};
use std::fmt;

/// `error_type` reported when the access token is expired or invalid.
pub const INVALID_TOKEN: &str = "INVALID_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Offending field; absent when the API sent a bare message.
    pub field: Option<String>,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    pub code: Option<String>,
    pub message: String,
    pub validation_errors: Vec<ValidationError>,
}

impl NormalizedError {
    fn generic(status: u16) -> Self {
        Self {
            code: None,
            message: format!("request failed with status code {}", status),
            validation_errors: Vec::new(),
        }
    }

    /// Lines suitable for an error log, one event per line.
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2 + self.validation_errors.len());
        match &self.code {
            Some(code) => {
                lines.push(format!("Error: {}", code));
                lines.push(format!("Description: {}", self.message));
            }
            None => lines.push(format!("Error: {}", self.message)),
        }
        lines.extend(self.validation_errors.iter().map(|v| format!("-- {}", v)));
        lines
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "{}: ", code)?;
        }
        write!(f, "{}", self.message)?;
        for validation in &self.validation_errors {
            write!(f, "; {}", validation)?;
        }
        Ok(())
    }
}

/// Normalizes a failed response body.
///
/// Shapes are checked in order: `{error, error_description}`, then
/// `{message, validationErrors}`. Anything else, including a body that is
/// not JSON, yields a generic message built from the status code.
pub fn classify(status: u16, body: &str) -> NormalizedError {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) else {
        return NormalizedError::generic(status);
    };

    if let Some(code) = present(&object, "error") {
        let code = value_to_string(code);
        let message = present(&object, "error_description")
            .map(value_to_string)
            .unwrap_or_else(|| code.clone());
        return NormalizedError {
            code: Some(code),
            message,
            validation_errors: Vec::new(),
        };
    }

    if let Some(message) = present(&object, "message") {
        return NormalizedError {
            code: None,
            message: value_to_string(message),
            validation_errors: present(&object, "validationErrors")
                .map(validation_errors)
                .unwrap_or_default(),
        };
    }

    NormalizedError::generic(status)
}

/// First `meta.error[].error_type` of a failed response body, if any.
pub fn error_code(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/meta/error/0/error_type")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Every object found in an `errors` array anywhere in the body, tagged
/// with a `path` field naming where it was found (e.g. `data/items/0`).
pub fn collect_errors(body: &str) -> Vec<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => search_errors(&value, &[]),
        Err(_) => Vec::new(),
    }
}

fn search_errors(value: &Value, path: &[String]) -> Vec<Map<String, Value>> {
    let mut errors = Vec::new();
    for (key, child) in children(value) {
        if !(child.is_object() || child.is_array()) {
            continue;
        }
        let mut next_path = path.to_vec();
        next_path.push(key.clone());

        if key == "errors" {
            for (_, entry) in children(child) {
                if let Value::Object(entry) = entry {
                    let mut tagged = entry.clone();
                    tagged.insert("path".to_string(), Value::String(next_path.join("/")));
                    errors.push(tagged);
                }
            }
        } else {
            errors.extend(search_errors(child, &next_path));
        }
    }
    errors
}

fn children(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn validation_errors(value: &Value) -> Vec<ValidationError> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(field, message)| ValidationError {
                field: Some(field.clone()),
                message: value_to_string(message),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|message| ValidationError {
                field: None,
                message: value_to_string(message),
            })
            .collect(),
        Value::Null => Vec::new(),
        other => vec![ValidationError {
            field: None,
            message: value_to_string(other),
        }],
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
