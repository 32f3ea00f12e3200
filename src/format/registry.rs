//! Per-load formatter resolution and column conversion.

use std::collections::HashMap;

use crate::error::{DataError, DataResult};
use crate::types::{CellValue, Column, ColumnSelector, ElementType};

use super::datetime::{detect_pattern, looks_like_datetime, DateTimeFormatter};
use super::Formatter;

/// Formatter overrides for a single load.
///
/// Resolution order for a column: override registered for its name, override registered for its
/// position, formatter registered for its [`ElementType`], then [`infer`].
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    by_column: HashMap<ColumnSelector, Formatter>,
    by_type: HashMap<ElementType, Formatter>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `formatter` for the column identified by `column`.
    pub fn with_column(mut self, column: impl Into<ColumnSelector>, formatter: Formatter) -> Self {
        self.set_column(column, formatter);
        self
    }

    pub fn set_column(&mut self, column: impl Into<ColumnSelector>, formatter: Formatter) {
        self.by_column.insert(column.into(), formatter);
    }

    /// Use `formatter` for every column tagged `element_type` that has no column override.
    pub fn with_type(mut self, element_type: ElementType, formatter: Formatter) -> Self {
        self.set_type(element_type, formatter);
        self
    }

    pub fn set_type(&mut self, element_type: ElementType, formatter: Formatter) {
        self.by_type.insert(element_type, formatter);
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty() && self.by_type.is_empty()
    }

    /// Resolve the formatter for `column`, found at `position` in its table.
    pub fn resolve(&self, position: usize, column: &Column) -> Formatter {
        self.by_column
            .get(&ColumnSelector::Name(column.name.clone()))
            .or_else(|| self.by_column.get(&ColumnSelector::Position(position)))
            .or_else(|| self.by_type.get(&column.element_type))
            .cloned()
            .unwrap_or_else(|| infer(column))
    }
}

/// Pick a formatter from the column's element-type tag.
///
/// `Number` and `Categorical` columns get [`Formatter::Number`] and `DateTime` columns get
/// [`Formatter::DateTime`]. `Unknown` columns become date/time only when a strict majority of
/// their non-null cells are date/times or text matching a built-in pattern; ties stay numeric.
/// When every date-like text cell shares one built-in layout, the formatter is pinned to it so
/// values render back exactly as they were written.
pub fn infer(column: &Column) -> Formatter {
    match column.element_type {
        ElementType::Number | ElementType::Categorical => Formatter::Number,
        ElementType::DateTime => Formatter::DateTime(DateTimeFormatter::new()),
        ElementType::Unknown => {
            let mut non_null = 0usize;
            let mut datetimes = 0usize;
            let mut typed = false;
            for v in &column.values {
                match v {
                    CellValue::Null => continue,
                    CellValue::DateTime(_) => {
                        datetimes += 1;
                        typed = true;
                    }
                    CellValue::Text(s) if looks_like_datetime(s) => datetimes += 1,
                    _ => {}
                }
                non_null += 1;
            }
            if datetimes * 2 <= non_null {
                return Formatter::Number;
            }
            let texts = column.values.iter().filter_map(|v| match v {
                CellValue::Text(s) => Some(s.as_str()),
                _ => None,
            });
            match detect_pattern(texts) {
                Some(p) if !typed => Formatter::DateTime(DateTimeFormatter::with_pattern(p)),
                _ => Formatter::DateTime(DateTimeFormatter::new()),
            }
        }
    }
}

/// Convert every cell of `column` with `formatter`.
///
/// The first cell that fails aborts the conversion with [`DataError::Format`] carrying the
/// 1-based row, the column name and the raw value.
pub fn parse_column(column: &Column, formatter: &Formatter) -> DataResult<Vec<f64>> {
    column
        .values
        .iter()
        .enumerate()
        .map(|(idx0, v)| {
            formatter.parse(v).map_err(|message| DataError::Format {
                row: idx0 + 1,
                column: column.name.clone(),
                raw: v.to_string(),
                message,
            })
        })
        .collect()
}
