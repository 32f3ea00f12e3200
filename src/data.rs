//! A single channel: one output series over one or more input dimensions.

use crate::error::{DataError, DataResult};
use crate::format::Formatter;

/// One named output series `Y` over input coordinates `X`, with a train/test mask.
///
/// Invariants (enforced by every constructor and mutator):
///
/// - `x().len() == y().len() == mask().len()`
/// - `input_dims() >= 1` and every row of `X` has exactly `input_dims()` values
/// - one formatter and one label per input dimension
///
/// `mask[i] == true` marks row `i` as training data; `false` marks it as held out (test).
#[derive(Debug, Clone)]
pub struct Data {
    name: String,
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
    mask: Vec<bool>,
    x_formatters: Vec<Formatter>,
    x_labels: Vec<String>,
    y_formatter: Formatter,
    y_label: String,
}

impl Data {
    /// Create a channel from row-major `X` and `Y`. Every row starts as training data.
    ///
    /// Formatters default to [`Formatter::Number`]; labels default to `x0, x1, ...` and `y`.
    pub fn new(name: impl Into<String>, x: Vec<Vec<f64>>, y: Vec<f64>) -> DataResult<Self> {
        let name = name.into();
        let Some(first) = x.first() else {
            return Err(DataError::EmptyData {
                message: format!("channel '{name}' has no rows"),
            });
        };
        let input_dims = first.len();
        if input_dims == 0 {
            return Err(DataError::ShapeMismatch {
                message: format!("channel '{name}' needs at least one input dimension"),
            });
        }
        if let Some((i, row)) = x.iter().enumerate().find(|(_, r)| r.len() != input_dims) {
            return Err(DataError::ShapeMismatch {
                message: format!(
                    "channel '{name}': X row {} has {} values, expected {input_dims}",
                    i + 1,
                    row.len()
                ),
            });
        }
        if x.len() != y.len() {
            return Err(DataError::ShapeMismatch {
                message: format!(
                    "channel '{name}': X has {} rows but Y has {}",
                    x.len(),
                    y.len()
                ),
            });
        }

        let mask = vec![true; y.len()];
        Ok(Self {
            name,
            x,
            y,
            mask,
            x_formatters: vec![Formatter::Number; input_dims],
            x_labels: (0..input_dims).map(|i| format!("x{i}")).collect(),
            y_formatter: Formatter::Number,
            y_label: "y".to_string(),
        })
    }

    /// Create a one-dimensional channel from parallel `x` and `y` series.
    pub fn from_series(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> DataResult<Self> {
        Self::new(name, x.into_iter().map(|v| vec![v]).collect(), y)
    }

    /// Set one formatter per input dimension.
    pub fn with_x_formatters(mut self, formatters: Vec<Formatter>) -> DataResult<Self> {
        self.check_dims("x formatters", formatters.len())?;
        self.x_formatters = formatters;
        Ok(self)
    }

    /// Set one label per input dimension.
    pub fn with_x_labels(mut self, labels: Vec<String>) -> DataResult<Self> {
        self.check_dims("x labels", labels.len())?;
        self.x_labels = labels;
        Ok(self)
    }

    pub fn with_y_formatter(mut self, formatter: Formatter) -> Self {
        self.y_formatter = formatter;
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    fn check_dims(&self, what: &str, got: usize) -> DataResult<()> {
        if got != self.input_dims() {
            return Err(DataError::ShapeMismatch {
                message: format!(
                    "channel '{}': got {got} {what} for {} input dimensions",
                    self.name,
                    self.input_dims()
                ),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename a channel before it joins a [`crate::dataset::DataSet`]. Channels already in a
    /// dataset are renamed with [`crate::dataset::DataSet::rename`], which keeps names unique.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn input_dims(&self) -> usize {
        self.x_formatters.len()
    }

    pub fn x(&self) -> &[Vec<f64>] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn x_formatters(&self) -> &[Formatter] {
        &self.x_formatters
    }

    pub fn x_labels(&self) -> &[String] {
        &self.x_labels
    }

    pub fn y_formatter(&self) -> &Formatter {
        &self.y_formatter
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// All values of input dimension `dim`, in row order.
    pub fn x_column(&self, dim: usize) -> DataResult<Vec<f64>> {
        if dim >= self.input_dims() {
            return Err(DataError::Index {
                index: dim,
                len: self.input_dims(),
            });
        }
        Ok(self.x.iter().map(|row| row[dim]).collect())
    }

    /// Full `X` and `Y`, regardless of the mask.
    pub fn data(&self) -> (Vec<Vec<f64>>, Vec<f64>) {
        (self.x.clone(), self.y.clone())
    }

    /// Rows whose mask is `true`.
    pub fn train_data(&self) -> (Vec<Vec<f64>>, Vec<f64>) {
        self.select(true)
    }

    /// Rows whose mask is `false`.
    pub fn test_data(&self) -> (Vec<Vec<f64>>, Vec<f64>) {
        self.select(false)
    }

    fn select(&self, train: bool) -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for ((row, &v), &m) in self.x.iter().zip(&self.y).zip(&self.mask) {
            if m == train {
                x.push(row.clone());
                y.push(v);
            }
        }
        (x, y)
    }

    pub fn train_len(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    pub fn test_len(&self) -> usize {
        self.len() - self.train_len()
    }

    /// Replace the mask wholesale.
    pub fn set_mask(&mut self, mask: Vec<bool>) -> DataResult<()> {
        if mask.len() != self.len() {
            return Err(DataError::ShapeMismatch {
                message: format!(
                    "channel '{}': mask has {} entries but channel has {} rows",
                    self.name,
                    mask.len(),
                    self.len()
                ),
            });
        }
        self.mask = mask;
        Ok(())
    }

    /// Mark every row as training data.
    pub fn reset_mask(&mut self) {
        self.mask.iter_mut().for_each(|m| *m = true);
    }

    /// Make exactly the rows in `indices` test rows; all others become training rows.
    ///
    /// Indices are validated before the mask changes.
    pub fn set_test_indices(&mut self, indices: &[usize]) -> DataResult<()> {
        self.check_indices(indices)?;
        self.reset_mask();
        for &i in indices {
            self.mask[i] = false;
        }
        Ok(())
    }

    /// Additionally mark the rows in `indices` as test rows.
    pub fn remove_index(&mut self, indices: &[usize]) -> DataResult<()> {
        self.check_indices(indices)?;
        for &i in indices {
            self.mask[i] = false;
        }
        Ok(())
    }

    /// Mark every row whose `X[dim]` lies in `[start, end)` as a test row.
    ///
    /// Returns the number of rows newly moved to the test partition.
    pub fn remove_range(&mut self, dim: usize, start: f64, end: f64) -> DataResult<usize> {
        if dim >= self.input_dims() {
            return Err(DataError::Index {
                index: dim,
                len: self.input_dims(),
            });
        }
        if start > end {
            return Err(DataError::InvalidOption {
                message: format!("range start {start} is after end {end}"),
            });
        }
        let mut removed = 0;
        for (row, m) in self.x.iter().zip(self.mask.iter_mut()) {
            let v = row[dim];
            if *m && v >= start && v < end {
                *m = false;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn check_indices(&self, indices: &[usize]) -> DataResult<()> {
        match indices.iter().find(|&&i| i >= self.len()) {
            Some(&index) => Err(DataError::Index {
                index,
                len: self.len(),
            }),
            None => Ok(()),
        }
    }

    /// Render row `row` of `X` with the per-dimension formatters.
    pub fn render_x(&self, row: usize) -> DataResult<Vec<String>> {
        let values = self.x.get(row).ok_or(DataError::Index {
            index: row,
            len: self.len(),
        })?;
        Ok(values
            .iter()
            .zip(&self.x_formatters)
            .map(|(&v, f)| f.render(v))
            .collect())
    }

    /// Render `Y[row]` with the output formatter.
    pub fn render_y(&self, row: usize) -> DataResult<String> {
        self.y
            .get(row)
            .map(|&v| self.y_formatter.render(v))
            .ok_or(DataError::Index {
                index: row,
                len: self.len(),
            })
    }
}
