//! JSON ↔ `Value` mapping for CLI input and output.

use serde_json::{Map, Number, Value as Json};
use thiserror::Error as ThisError;
use udfkit::prelude::Value;

///
/// JsonValueError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum JsonValueError {
    #[error("number {0} is not a 64-bit integer")]
    NonInteger(Number),

    #[error("row must be a JSON array or null, got {0}")]
    NotARow(String),
}

/// Map one JSON document onto a row value.
pub fn value_from_json(json: &Json) -> Result<Value, JsonValueError> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Int(
            n.as_i64()
                .ok_or_else(|| JsonValueError::NonInteger(n.clone()))?,
        ),
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => Value::List(
            items
                .iter()
                .map(value_from_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Json::Object(entries) => {
            let mut mapped = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                mapped.push((Value::Text(key.clone()), value_from_json(value)?));
            }

            Value::Map(mapped)
        }
    })
}

/// One JSONL line: an array of argument values, or `null` for an absent batch.
pub fn row_from_json(json: &Json) -> Result<Option<Vec<Value>>, JsonValueError> {
    match json {
        Json::Null => Ok(None),
        Json::Array(items) => items
            .iter()
            .map(value_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        other => Err(JsonValueError::NotARow(other.to_string())),
    }
}

/// Render a value for output. Map keys are rendered as text.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Text(s) => Json::String(s.clone()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(key, value)| (map_key(key), value_to_json(value)))
                .collect::<Map<_, _>>(),
        ),
    }
}

fn map_key(key: &Value) -> String {
    match key {
        Value::Text(s) => s.clone(),
        other => value_to_json(other).to_string(),
    }
}

///
/// TESTS
///
