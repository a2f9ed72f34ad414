use serde::{de::DeserializeOwned, Serialize};

use super::error::StoreError;

/// A store row: a JSON object keyed by column name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Serialize a value (a typed struct or a `json!` object) into a row.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Malformed(format!(
            "expected a JSON object, got: {other}"
        ))),
        Err(e) => Err(StoreError::Malformed(e.to_string())),
    }
}

/// Decode a row into a typed struct.
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(record))
        .map_err(|e| StoreError::Malformed(e.to_string()))
}
