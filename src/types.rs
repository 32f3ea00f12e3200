//! Tabular input model.
//!
//! Every table adapter in [`crate::ingestion`] produces a [`Table`]: a rectangular set of named
//! [`Column`]s, each carrying an [`ElementType`] tag and a vector of raw [`CellValue`]s. The
//! formatter layer ([`crate::format`]) switches on the tag to pick a canonical numeric form.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Element-type tag attached to a column by the adapter that built it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Integers or floats.
    Number,
    /// Already-typed calendar date/time values.
    DateTime,
    /// Labels drawn from a finite set of strings. Produced for Polars `Categorical`/`Enum`
    /// columns and for hand-built tables; text-based adapters cannot tell labels from free text
    /// and tag such columns `Unknown`.
    Categorical,
    /// Untyped text; formatter inference falls back to textual pattern matching.
    Unknown,
}

impl ElementType {
    /// Detect a tag from raw cells: a column whose non-null cells are all numbers (or all
    /// date/times) gets that tag, anything else is [`ElementType::Unknown`].
    pub fn detect(values: &[CellValue]) -> Self {
        let mut non_null = values.iter().filter(|v| !v.is_null()).peekable();
        if non_null.peek().is_none() {
            return Self::Unknown;
        }
        let mut all_numbers = true;
        let mut all_datetimes = true;
        for v in non_null {
            all_numbers &= matches!(v, CellValue::Number(_));
            all_datetimes &= matches!(v, CellValue::DateTime(_));
        }
        if all_numbers {
            Self::Number
        } else if all_datetimes {
            Self::DateTime
        } else {
            Self::Unknown
        }
    }
}

/// A single raw cell as delivered by an adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing/empty value.
    Null,
    /// Numeric value (integers are widened to `f64`).
    Number(f64),
    /// Naive (UTC) date/time.
    DateTime(NaiveDateTime),
    /// Unparsed text.
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a cell from a trimmed text field: empty → `Null`, parseable float → `Number`,
    /// otherwise `Text`.
    pub fn from_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Null
        } else if let Ok(v) = trimmed.parse::<f64>() {
            Self::Number(v)
        } else {
            Self::Text(trimmed.to_owned())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str(""),
            Self::Number(v) => write!(f, "{v}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A named, type-tagged column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (header or explicit name).
    pub name: String,
    /// Element-type tag.
    pub element_type: ElementType,
    /// Raw cells, one per table row.
    pub values: Vec<CellValue>,
}

impl Column {
    /// Create a column with an explicit tag.
    pub fn new(name: impl Into<String>, element_type: ElementType, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            element_type,
            values,
        }
    }

    /// Create a column and detect its tag from the cells.
    pub fn detect(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let element_type = ElementType::detect(&values);
        Self::new(name, element_type, values)
    }

    /// A `Number`-tagged column.
    pub fn from_numbers(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            ElementType::Number,
            values.into_iter().map(CellValue::Number).collect(),
        )
    }

    /// An `Unknown`-tagged text column; empty strings become nulls.
    pub fn from_text<S: AsRef<str>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        let values = values
            .into_iter()
            .map(|s| {
                let s = s.as_ref().trim();
                if s.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(s.to_owned())
                }
            })
            .collect();
        Self::new(name, ElementType::Unknown, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Identifies a column by name or by 0-based position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    Position(usize),
    Name(String),
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ColumnSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for ColumnSelector {
    fn from(idx: usize) -> Self {
        Self::Position(idx)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(i) => write!(f, "position {i}"),
            Self::Name(n) => write!(f, "'{n}'"),
        }
    }
}

/// Rectangular table of named, type-tagged columns.
///
/// All columns have the same length; [`Table::new`] enforces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from columns of equal length.
    pub fn new(columns: Vec<Column>) -> DataResult<Self> {
        if let Some(first) = columns.first() {
            for c in &columns[1..] {
                if c.len() != first.len() {
                    return Err(DataError::ShapeMismatch {
                        message: format!(
                            "column '{}' has {} rows but column '{}' has {}",
                            c.name,
                            c.len(),
                            first.name,
                            first.len()
                        ),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    /// Create a table from row-major cells; tags are detected per column.
    ///
    /// Short rows are padded with nulls; rows longer than `names` are a shape error.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> DataResult<Self> {
        let width = names.len();
        let mut cols: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); width];
        for (idx0, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(DataError::ShapeMismatch {
                    message: format!(
                        "row {} has {} fields but only {} column names are known",
                        idx0 + 1,
                        row.len(),
                        width
                    ),
                });
            }
            let n = row.len();
            for (col, cell) in cols.iter_mut().zip(row) {
                col.push(cell);
            }
            for col in cols.iter_mut().skip(n) {
                col.push(CellValue::Null);
            }
        }
        let columns = names
            .into_iter()
            .zip(cols)
            .map(|(name, values)| Column::detect(name, values))
            .collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (0 for a table without columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Resolve a selector to a column position.
    pub fn position_of(&self, selector: &ColumnSelector) -> DataResult<usize> {
        let found = match selector {
            ColumnSelector::Position(i) if *i < self.columns.len() => Some(*i),
            ColumnSelector::Position(_) => None,
            ColumnSelector::Name(name) => self.index_of(name),
        };
        found.ok_or_else(|| DataError::ColumnNotFound {
            selector: selector.to_string(),
            available: self.column_names(),
        })
    }

    /// Resolve a selector to a column.
    pub fn resolve(&self, selector: &ColumnSelector) -> DataResult<&Column> {
        self.position_of(selector).map(|i| &self.columns[i])
    }

    /// Rename the leading columns positionally; extra columns keep their names.
    pub fn with_names(mut self, names: &[String]) -> DataResult<Self> {
        if names.len() > self.columns.len() {
            return Err(DataError::InvalidOption {
                message: format!(
                    "{} names given for a table with {} columns",
                    names.len(),
                    self.columns.len()
                ),
            });
        }
        for (col, name) in self.columns.iter_mut().zip(names) {
            col.name = name.clone();
        }
        Ok(self)
    }
}
