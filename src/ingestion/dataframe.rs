//! Polars `DataFrame` → [`Table`].
//!
//! Dtype mapping:
//!
//! - 8/16/32/64-bit integers, `Float32`/`Float64`, `Boolean` → `Number`
//! - `Date`/`Datetime` → `DateTime`
//! - `Categorical`/`Enum` → `Categorical` (labels kept as text)
//! - `String` → `Unknown` (formatter inference decides between numbers and dates)
//! - anything else is cast to `String` and tagged `Unknown`

use chrono::{DateTime, Utc};
use polars::prelude::{DataFrame, DataType, Series, TimeUnit};

use crate::error::DataResult;
use crate::types::{CellValue, Column, ElementType, Table};

/// Convert every column of `df` into a type-tagged [`Column`].
pub fn read_dataframe(df: &DataFrame) -> DataResult<Table> {
    let mut columns = Vec::with_capacity(df.width());
    for name in df.get_column_names() {
        let name = name.to_string();
        let series = df.column(&name)?.as_materialized_series();
        columns.push(convert_series(&name, series)?);
    }
    Table::new(columns)
}

fn convert_series(name: &str, s: &Series) -> DataResult<Column> {
    let column = match s.dtype() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => {
            let cast = s.cast(&DataType::Float64)?;
            let values = cast
                .f64()?
                .into_iter()
                .map(|v| v.map(CellValue::Number).unwrap_or(CellValue::Null))
                .collect();
            Column::new(name, ElementType::Number, values)
        }
        DataType::Date => {
            let days = s.cast(&DataType::Int32)?;
            let values = days
                .i32()?
                .into_iter()
                .map(|v| match v {
                    Some(d) => datetime_cell(DateTime::from_timestamp(i64::from(d) * 86_400, 0)),
                    None => CellValue::Null,
                })
                .collect();
            Column::new(name, ElementType::DateTime, values)
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let raw = s.cast(&DataType::Int64)?;
            let values = raw
                .i64()?
                .into_iter()
                .map(|v| match v {
                    Some(t) => datetime_cell(match unit {
                        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(t),
                        TimeUnit::Microseconds => DateTime::from_timestamp_micros(t),
                        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(t)),
                    }),
                    None => CellValue::Null,
                })
                .collect();
            Column::new(name, ElementType::DateTime, values)
        }
        DataType::String => text_column(name, s, ElementType::Unknown)?,
        DataType::Categorical(..) | DataType::Enum(..) => {
            text_column(name, &s.cast(&DataType::String)?, ElementType::Categorical)?
        }
        _ => text_column(name, &s.cast(&DataType::String)?, ElementType::Unknown)?,
    };
    Ok(column)
}

fn text_column(name: &str, s: &Series, element_type: ElementType) -> DataResult<Column> {
    let values = s
        .str()?
        .into_iter()
        .map(|v| match v.map(str::trim) {
            Some(t) if !t.is_empty() => CellValue::Text(t.to_owned()),
            _ => CellValue::Null,
        })
        .collect();
    Ok(Column::new(name, element_type, values))
}

fn datetime_cell(dt: Option<DateTime<Utc>>) -> CellValue {
    dt.map(|d| CellValue::DateTime(d.naive_utc()))
        .unwrap_or(CellValue::Null)
}
