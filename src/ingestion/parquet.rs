//! Parquet → [`Table`].

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{DataError, DataResult};
use crate::types::{CellValue, Table};

/// Read a Parquet file into a [`Table`].
///
/// Notes:
/// - Only top-level fields become columns; nested groups are rendered as text.
/// - `DATE` and `TIMESTAMP` logical types become date/time cells, so their columns are tagged
///   [`crate::types::ElementType::DateTime`].
/// - Uses the Parquet record API (`RowIter`).
pub fn read_parquet_from_path(path: impl AsRef<Path>) -> DataResult<Table> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;
    let names = top_level_field_names(&reader);

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        let mut map: HashMap<&str, &Field> = HashMap::new();
        for (name, field) in row.get_column_iter() {
            map.insert(name.as_str(), field);
        }

        let mut out_row = Vec::with_capacity(names.len());
        for name in &names {
            let f = map.get(name.as_str()).ok_or_else(|| DataError::ShapeMismatch {
                message: format!("row {row_num} missing column '{name}'"),
            })?;
            out_row.push(convert_parquet_field(f));
        }
        rows.push(out_row);
    }

    Table::from_rows(names, rows)
}

fn top_level_field_names<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Vec<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

fn convert_parquet_field(f: &Field) -> CellValue {
    match f {
        Field::Null => CellValue::Null,
        Field::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Field::Byte(v) => CellValue::Number(f64::from(*v)),
        Field::Short(v) => CellValue::Number(f64::from(*v)),
        Field::Int(v) => CellValue::Number(f64::from(*v)),
        Field::Long(v) => CellValue::Number(*v as f64),
        Field::UByte(v) => CellValue::Number(f64::from(*v)),
        Field::UShort(v) => CellValue::Number(f64::from(*v)),
        Field::UInt(v) => CellValue::Number(f64::from(*v)),
        Field::ULong(v) => CellValue::Number(*v as f64),
        Field::Float(v) => CellValue::Number(f64::from(*v)),
        Field::Double(v) => CellValue::Number(*v),
        Field::Str(s) if s.trim().is_empty() => CellValue::Null,
        Field::Str(s) => CellValue::Text(s.trim().to_owned()),
        Field::Date(days) => datetime_cell(DateTime::from_timestamp(i64::from(*days) * 86_400, 0), f),
        Field::TimestampMillis(ms) => datetime_cell(DateTime::from_timestamp_millis(*ms), f),
        Field::TimestampMicros(us) => datetime_cell(DateTime::from_timestamp_micros(*us), f),
        other => CellValue::Text(other.to_string()),
    }
}

fn datetime_cell(dt: Option<DateTime<Utc>>, raw: &Field) -> CellValue {
    dt.map(|d| CellValue::DateTime(d.naive_utc()))
        .unwrap_or_else(|| CellValue::Text(raw.to_string()))
}
