//! Error types for form construction and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors raised while building forms or their validation rules.
///
/// Validation failures and submit handler failures are not errors here:
/// the former live on fields as messages, the latter are captured into the
/// form's submission state.
#[derive(Debug, Error)]
pub enum FormError {
    /// Built-in rule name not present in the rule table
    #[error("unknown validation rule: {name}")]
    UnknownRule { name: String },

    /// Regular expression rule failed to compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The root model must be a JSON object
    #[error("model must be an object, got {kind}")]
    ModelNotObject { kind: &'static str },

    /// No field exists at the given path
    #[error("field not found: {path}")]
    FieldNotFound { path: String },

    /// Array operation on a field that is not an array
    #[error("field is not an array: {path}")]
    NotAnArray { path: String },

    /// Array index past the end
    #[error("index {index} out of range for {path} (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    /// Messages config file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    /// Short name of a JSON value's kind, used in error messages
    pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_rule_display() {
        let err = FormError::UnknownRule {
            name: "phone".into(),
        };
        assert_eq!(err.to_string(), "unknown validation rule: phone");
    }

    #[test]
    fn test_model_not_object_display() {
        let err = FormError::ModelNotObject {
            kind: FormError::kind_of(&json!([1, 2])),
        };
        assert_eq!(err.to_string(), "model must be an object, got array");
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FormError = parse.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
