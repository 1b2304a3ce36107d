//! Shared "read, decode, validate" step for result files.

use crate::errors::LoadError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read and decode a JSON document.
pub fn decode_file(path: &Path) -> Result<Value, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a JSON document and hand it to a shape validator.
///
/// A validator error becomes [`LoadError::Structure`] for this path.
pub fn load_and_validate<T, F>(path: &Path, validate: F) -> Result<T, LoadError>
where
    F: FnOnce(Value) -> Result<T, String>,
{
    let value = decode_file(path)?;
    validate(value).map_err(|reason| LoadError::Structure {
        path: path.to_path_buf(),
        reason,
    })
}

/// JSON type name for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
