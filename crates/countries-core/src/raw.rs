// crates/countries-core/src/raw.rs

//! Shared raw input, as returned by the REST Countries endpoints.
//!
//! The record is kept as a JSON document instead of a rigid struct: the two
//! endpoints return different field subsets, and the shape of nested maps
//! (`name.nativeName`, `currencies`, `idd`) varies between countries.
//! All accessors are safe-get-with-default: a missing key is never an error.

use crate::error::{EtlError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static EMPTY_OBJECT: Lazy<Map<String, Value>> = Lazy::new(Map::new);

/// One raw country record (a JSON object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCountry(Map<String, Value>);

pub type CountriesRaw = Vec<RawCountry>;

impl RawCountry {
    /// Wraps a JSON value; `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Top-level field; `null` is reported as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        field(&self.0, key)
    }

    /// Shallow merge: keys of `other` override ours on collision.
    ///
    /// Existing keys keep their position, new keys are appended.
    pub fn merge_from(&mut self, other: RawCountry) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Human label for diagnostics (`name.common`, or a placeholder).
    pub fn label(&self) -> &str {
        self.get("name")
            .and_then(|name| name.get("common"))
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
    }
}

/// Validates a parsed payload: it must be an array and every element an object.
pub fn records_from_value(value: Value) -> Result<CountriesRaw> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(EtlError::InvalidData(format!(
                "expected a JSON array of country records, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let kind = kind_of(&item);
        let record = RawCountry::from_value(item).ok_or_else(|| {
            EtlError::InvalidData(format!(
                "country record #{index} is {kind}, expected an object"
            ))
        })?;
        records.push(record);
    }
    Ok(records)
}

// -----------------------------------------------------------------------------
// NESTED ACCESS HELPERS
// -----------------------------------------------------------------------------

/// Field of a JSON object, treating `null` as absent.
pub fn field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

/// Shared empty map, for "missing nested map" reads.
pub fn empty_object() -> &'static Map<String, Value> {
    &EMPTY_OBJECT
}

/// JSON type name, for messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
