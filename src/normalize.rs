//! Coercion of loosely-typed list values.
//!
//! Admin-edited content reaches the service in several shapes for the same
//! logical field: a real JSON array, a JSON array encoded inside a string, or
//! a comma-separated string. These helpers collapse all of them into one
//! canonical array, both for raw `serde_json::Value` content and, through the
//! `de_*` adapters, for typed structs.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Parses `"[...]"` strings as JSON. Returns `None` for anything else.
fn embedded_array(s: &str) -> Option<Vec<Value>> {
    let trimmed = s.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    serde_json::from_str::<Vec<Value>>(trimmed).ok()
}

fn split_commas(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalizes a value into a list of non-empty strings.
pub fn string_list(value: Value) -> Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar_to_string(item).ok_or_else(|| "expected a list of strings".to_string())
            })
            .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
            .collect(),
        Value::String(s) => match embedded_array(&s) {
            Some(items) => string_list(Value::Array(items)),
            None => Ok(split_commas(&s)),
        },
        Value::Number(_) | Value::Bool(_) => Err("expected a list of strings".to_string()),
        Value::Object(_) => Err("expected a list of strings, got an object".to_string()),
    }
}

/// Normalizes a value into a list of JSON objects.
pub fn object_list(value: Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            if items.iter().all(Value::is_object) {
                Ok(items)
            } else {
                Err("expected a list of objects".to_string())
            }
        }
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => match embedded_array(&s) {
            Some(items) => object_list(Value::Array(items)),
            None => Err("expected a list of objects, got text".to_string()),
        },
        // A single block is accepted as a one-element list.
        obj @ Value::Object(_) => Ok(vec![obj]),
        _ => Err("expected a list of objects".to_string()),
    }
}

/// Normalizes a scalar text field. Numbers and booleans become strings.
pub fn text(value: Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::String(String::new())),
        Value::String(_) => Ok(value),
        Value::Number(_) | Value::Bool(_) => Ok(Value::String(
            scalar_to_string(&value).unwrap_or_default(),
        )),
        _ => Err("expected text".to_string()),
    }
}

/// Normalizes "one or many" values (a scalar or an array, possibly given as
/// comma-separated text) into a typed list.
pub fn one_or_many<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, String> {
    let items = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::String(s) => match embedded_array(&s) {
            Some(items) => items,
            None => split_commas(&s).into_iter().map(Value::String).collect(),
        },
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| e.to_string()))
        .collect()
}

pub fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    string_list(value).map_err(serde::de::Error::custom)
}

pub fn de_opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    string_list(value).map(Some).map_err(serde::de::Error::custom)
}

pub fn de_one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    one_or_many(value).map_err(serde::de::Error::custom)
}

pub fn de_opt_one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    one_or_many(value).map(Some).map_err(serde::de::Error::custom)
}
