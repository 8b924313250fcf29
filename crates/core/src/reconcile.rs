//! Field reconciliation for partial updates
//!
//! Reduces an edited record to the smallest PATCH payload: only fields that
//! changed, and only those whose new value is non-empty. Clearing a field
//! through this path is not possible; `cleared_fields` reports the edits
//! that were dropped for that reason.

use crate::record::{is_empty_value, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Drop empty values from a record, recursing into nested objects
///
/// A nested object is cleaned first and then dropped if nothing is left.
/// Arrays are only checked for length; their elements are kept as-is.
pub fn remove_empty_fields(record: &Record) -> Record {
    let mut cleaned = Record::new();

    for (key, value) in record {
        match value {
            Value::Object(nested) => {
                let nested = remove_empty_fields(nested);
                if !nested.is_empty() {
                    cleaned.insert(key.clone(), Value::Object(nested));
                }
            }
            other if is_empty_value(other) => {}
            other => {
                cleaned.insert(key.clone(), other.clone());
            }
        }
    }

    cleaned
}

/// Value-level form of [`remove_empty_fields`]
///
/// Objects are cleaned; every other value is returned unchanged.
pub fn remove_empty_values(value: &Value) -> Value {
    match value {
        Value::Object(record) => Value::Object(remove_empty_fields(record)),
        other => other.clone(),
    }
}

/// Collect the fields of `updated` whose value differs from `original`
///
/// Keys that exist only in `original` are never reported. Keys new in
/// `updated` always are.
pub fn get_changed_fields(original: &Record, updated: &Record) -> Record {
    updated
        .iter()
        .filter(|(key, new_value)| match original.get(key.as_str()) {
            Some(old_value) => !values_equal(old_value, new_value),
            None => true,
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Keys that held a value in `original` but were emptied in `updated`
///
/// These edits never survive [`ChangeSet::between`].
pub fn cleared_fields(original: &Record, updated: &Record) -> Vec<String> {
    updated
        .iter()
        .filter(|(key, new_value)| {
            let was_set = original
                .get(key.as_str())
                .map_or(false, |old| !is_blank(old));
            was_set && is_blank(new_value)
        })
        .map(|(key, _)| key.clone())
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Object(nested) => remove_empty_fields(nested).is_empty(),
        other => is_empty_value(other),
    }
}

/// Structural equality where numbers compare by value (`12 == 12.0`)
///
/// Two integers are compared exactly; the float comparison only applies
/// when one side is a float, so large integers never collapse together.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x == y
                || ((x.is_f64() || y.is_f64())
                    && matches!((x.as_f64(), y.as_f64()), (Some(p), Some(q)) if p == q))
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).map_or(false, |y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Minimal partial-update payload
///
/// Holds only changed, non-empty fields. An empty change set means there is
/// nothing to submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(Record);

impl ChangeSet {
    /// Reduce an edit to its payload: changed fields, then empty ones dropped
    pub fn between(original: &Record, updated: &Record) -> Self {
        Self(remove_empty_fields(&get_changed_fields(original, updated)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Names of the fields carried by this payload
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overwrite the changed top-level fields on a copy of `original`
    pub fn apply_to(&self, original: &Record) -> Record {
        let mut applied = original.clone();
        for (key, value) in &self.0 {
            applied.insert(key.clone(), value.clone());
        }
        applied
    }

    pub fn as_record(&self) -> &Record {
        &self.0
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}
