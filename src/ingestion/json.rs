//! JSON → [`Table`].
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"t":0,"v":1}, {"t":1,"v":2}]`
//! - Newline-delimited JSON (NDJSON): `{"t":0,"v":1}\n{"t":1,"v":2}\n`
//!
//! Nested objects are flattened into dot-path column names (e.g. `sensor.temp`). Columns appear
//! in first-seen order; key order within an object is the order `serde_json` yields (sorted).

use std::fs;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use crate::error::{DataError, DataResult};
use crate::types::{CellValue, Table};

/// Read a JSON/NDJSON file into a [`Table`].
pub fn read_json_from_path(path: impl AsRef<Path>) -> DataResult<Table> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text)
}

/// Read JSON/NDJSON held in memory.
pub fn read_json_from_str(input: &str) -> DataResult<Table> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DataError::EmptyData {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    let values = match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::Array(items)) => items,
        Ok(v @ JsonValue::Object(_)) => vec![v],
        Ok(_) => {
            return Err(DataError::InvalidOption {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            });
        }
        Err(_) => {
            let mut values = Vec::new();
            for line in trimmed.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                values.push(serde_json::from_str::<JsonValue>(line)?);
            }
            values
        }
    };

    records_to_table(&values)
}

fn records_to_table(values: &[JsonValue]) -> DataResult<Table> {
    let mut names: Vec<String> = Vec::new();
    let mut flat_rows: Vec<Vec<(String, CellValue)>> = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let obj = v.as_object().ok_or_else(|| DataError::InvalidOption {
            message: format!("row {} is not a json object", idx0 + 1),
        })?;
        let mut flat = Vec::new();
        flatten("", obj, &mut flat);
        for (k, _) in &flat {
            if !names.contains(k) {
                names.push(k.clone());
            }
        }
        flat_rows.push(flat);
    }

    let rows = flat_rows
        .into_iter()
        .map(|flat| {
            let mut row = vec![CellValue::Null; names.len()];
            for (k, cell) in flat {
                if let Some(i) = names.iter().position(|n| *n == k) {
                    row[i] = cell;
                }
            }
            row
        })
        .collect();

    Table::from_rows(names, rows)
}

fn flatten(prefix: &str, obj: &Map<String, JsonValue>, out: &mut Vec<(String, CellValue)>) {
    for (k, v) in obj {
        let key = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        match v {
            JsonValue::Object(inner) => flatten(&key, inner, out),
            other => out.push((key, convert_json_value(other))),
        }
    }
}

fn convert_json_value(v: &JsonValue) -> CellValue {
    match v {
        JsonValue::Null => CellValue::Null,
        JsonValue::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        JsonValue::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        JsonValue::String(s) if s.trim().is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::Text(s.trim().to_owned()),
        other => CellValue::Text(other.to_string()),
    }
}
