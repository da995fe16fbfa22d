//! JSON array imports.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use valbook_core::{RawField, RawRow, Record, normalize_row};

use crate::dedupe_first_wins;
use crate::error::ImportError;

/// Read a `.json` import file from disk and parse it into records.
pub fn read_json_file(path: &Path, now: DateTime<Utc>) -> Result<Vec<Record>, ImportError> {
    let text = fs::read_to_string(path)?;
    read_json_records(&text, now)
}

/// Parse a JSON document into records.
///
/// The top-level value must be an array of row objects; anything else is a
/// hard failure. Non-object elements and rows missing required fields are
/// dropped individually; an import where every element drops fails with
/// `NoValidRecords`.
pub fn read_json_records(text: &str, now: DateTime<Utc>) -> Result<Vec<Record>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let mut records = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(row) = value_to_row(item) else {
            debug!(index, "dropping non-object array element");
            continue;
        };
        match normalize_row(&row, now) {
            Some(rec) => records.push(rec),
            None => debug!(index, "dropping row missing required fields"),
        }
    }
    if records.is_empty() {
        return Err(ImportError::NoValidRecords);
    }
    Ok(dedupe_first_wins(records))
}

fn value_to_row(value: &Value) -> Option<RawRow> {
    let obj = value.as_object()?;
    let mut row = RawRow::new();
    for (key, value) in obj {
        row.insert(key.clone(), json_to_field(value));
    }
    Some(row)
}

fn json_to_field(value: &Value) -> RawField {
    match value {
        Value::Null => RawField::Empty,
        Value::Bool(b) => RawField::Bool(*b),
        Value::Number(n) => RawField::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => RawField::Text(s.clone()),
        // Nested structures degrade to their JSON text; field validation
        // rejects them downstream where a scalar was required.
        other => RawField::Text(other.to_string()),
    }
}
