//! Error types for unexpected response shapes.

use serde_json::Value;

/// A response arrived successfully but did not match the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// An overview endpoint returned an empty list where at least one
    /// time-windowed row was expected.
    #[error("Expected a non-empty list of rows from {endpoint}")]
    EmptyRows {
        /// The endpoint path that produced the response.
        endpoint: String,
    },

    /// An overview endpoint returned something other than a JSON array.
    #[error("Expected a list of rows from {endpoint}, got {found}")]
    NotAList {
        /// The endpoint path that produced the response.
        endpoint: String,
        /// The JSON type that was actually found.
        found: &'static str,
    },
}

impl ShapeError {
    /// Create an `EmptyRows` error for the given endpoint.
    pub fn empty_rows(endpoint: impl Into<String>) -> Self {
        ShapeError::EmptyRows {
            endpoint: endpoint.into(),
        }
    }

    /// Create a `NotAList` error, naming the JSON type that was found.
    pub fn not_a_list(endpoint: impl Into<String>, found: &Value) -> Self {
        ShapeError::NotAList {
            endpoint: endpoint.into(),
            found: json_type_name(found),
        }
    }
}

/// Human-readable name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
