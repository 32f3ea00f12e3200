//! Ordered, uniquely named collection of channels.
//!
//! Channel order is significant: the position of a channel in a [`DataSet`] is the channel index
//! the modeling side uses (see [`DataSet::to_multioutput`]).
//!
//! ```rust
//! use gp_channels::data::Data;
//! use gp_channels::dataset::DataSet;
//!
//! let mut ds = DataSet::new();
//! ds.append(Data::from_series("a", vec![0.0, 1.0], vec![1.0, 2.0]).unwrap()).unwrap();
//! ds.append(Data::from_series("b", vec![0.0], vec![5.0]).unwrap()).unwrap();
//!
//! assert_eq!(ds.get_names(), vec!["a", "b"]);
//! assert_eq!(ds.get_input_dims(), vec![1, 1]);
//! // Duplicate names are rejected.
//! assert!(ds.append(Data::from_series("a", vec![0.0], vec![0.0]).unwrap()).is_err());
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::data::Data;
use crate::error::{DataError, DataResult};

/// Which rows of each channel to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// Every row, regardless of the mask.
    All,
    /// Rows whose mask is `true`.
    Train,
    /// Rows whose mask is `false`.
    Test,
}

/// Per-channel `X` tensors and `Y` vectors, in channel order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Partitioned {
    /// `x[c]` is the `rows × input_dims` matrix of channel `c`.
    pub x: Vec<Vec<Vec<f64>>>,
    /// `y[c]` is the output vector of channel `c`.
    pub y: Vec<Vec<f64>>,
}

/// All channels stacked into one design matrix.
///
/// Each row of `x` is `[channel_index, x_0, ..., x_{d-1}]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MultiOutput {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

/// Something that can be appended to a [`DataSet`]: one channel or all channels of a dataset.
#[derive(Debug, Clone)]
pub enum AppendSource {
    Channel(Data),
    DataSet(DataSet),
}

impl From<Data> for AppendSource {
    fn from(channel: Data) -> Self {
        Self::Channel(channel)
    }
}

impl From<DataSet> for AppendSource {
    fn from(dataset: DataSet) -> Self {
        Self::DataSet(dataset)
    }
}

/// Ordered collection of [`Data`] channels with unique names.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    channels: Vec<Data>,
}

impl DataSet {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset from channels, rejecting duplicate names.
    pub fn from_channels(channels: Vec<Data>) -> DataResult<Self> {
        let mut ds = Self::new();
        ds.append(AppendSource::DataSet(Self { channels }))?;
        Ok(ds)
    }

    /// Append one channel, or every channel of another dataset in its existing order.
    ///
    /// Fails with [`DataError::DuplicateName`] if any incoming name is already present (or
    /// repeats among the incoming channels); the dataset is left unchanged in that case.
    pub fn append(&mut self, source: impl Into<AppendSource>) -> DataResult<()> {
        let incoming = match source.into() {
            AppendSource::Channel(c) => vec![c],
            AppendSource::DataSet(ds) => ds.channels,
        };

        let mut seen: HashSet<&str> = self.channels.iter().map(Data::name).collect();
        for c in &incoming {
            if !seen.insert(c.name()) {
                return Err(DataError::DuplicateName {
                    name: c.name().to_string(),
                });
            }
        }

        self.channels.extend(incoming);
        Ok(())
    }

    /// Number of channels.
    pub fn get_output_dims(&self) -> usize {
        self.channels.len()
    }

    /// Input dimensionality of each channel, in channel order.
    pub fn get_input_dims(&self) -> Vec<usize> {
        self.channels.iter().map(Data::input_dims).collect()
    }

    /// Channel names, in channel order.
    pub fn get_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> &[Data] {
        &self.channels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Data> {
        self.channels.iter()
    }

    pub fn index_by_position(&self, index: usize) -> DataResult<&Data> {
        let len = self.channels.len();
        self.channels
            .get(index)
            .ok_or(DataError::Index { index, len })
    }

    pub fn index_by_position_mut(&mut self, index: usize) -> DataResult<&mut Data> {
        let len = self.channels.len();
        self.channels
            .get_mut(index)
            .ok_or(DataError::Index { index, len })
    }

    pub fn index_by_name(&self, name: &str) -> DataResult<&Data> {
        self.channels
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| DataError::Key {
                name: name.to_string(),
            })
    }

    pub fn index_by_name_mut(&mut self, name: &str) -> DataResult<&mut Data> {
        self.channels
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| DataError::Key {
                name: name.to_string(),
            })
    }

    /// Position of the channel named `name`, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.name() == name)
    }

    /// Remove and return the channel named `name`; later channels shift down by one.
    pub fn remove(&mut self, name: &str) -> DataResult<Data> {
        let idx = self.position(name).ok_or_else(|| DataError::Key {
            name: name.to_string(),
        })?;
        Ok(self.channels.remove(idx))
    }

    /// Rename a channel, keeping names unique.
    ///
    /// This is the only way to rename a channel held by a dataset; the mutable accessors do not
    /// expose the name:
    ///
    /// ```compile_fail
    /// use gp_channels::data::Data;
    /// use gp_channels::dataset::DataSet;
    ///
    /// let a = Data::from_series("a", vec![0.0], vec![1.0]).unwrap();
    /// let b = Data::from_series("b", vec![0.0], vec![2.0]).unwrap();
    /// let mut ds = DataSet::from_channels(vec![a, b]).unwrap();
    /// ds.index_by_name_mut("b").unwrap().set_name("a");
    /// ```
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> DataResult<()> {
        let to = to.into();
        if from != to && self.position(&to).is_some() {
            return Err(DataError::DuplicateName { name: to });
        }
        self.index_by_name_mut(from)?.set_name(to);
        Ok(())
    }

    /// Full `X`/`Y` of every channel, regardless of masks.
    pub fn get_data(&self) -> Partitioned {
        self.partition(Partition::All)
    }

    /// Training rows of every channel.
    pub fn get_train_data(&self) -> Partitioned {
        self.partition(Partition::Train)
    }

    /// Test rows of every channel. Channels without test rows yield empty tensors.
    pub fn get_test_data(&self) -> Partitioned {
        self.partition(Partition::Test)
    }

    pub fn partition(&self, which: Partition) -> Partitioned {
        let (x, y) = self
            .channels
            .iter()
            .map(|c| match which {
                Partition::All => c.data(),
                Partition::Train => c.train_data(),
                Partition::Test => c.test_data(),
            })
            .unzip();
        Partitioned { x, y }
    }

    /// Stack the selected rows of every channel, prefixing each `X` row with its channel index.
    ///
    /// All channels must share the same input dimensionality.
    pub fn to_multioutput(&self, which: Partition) -> DataResult<MultiOutput> {
        let dims = self.get_input_dims();
        if let Some(&first) = dims.first() {
            if let Some(pos) = dims.iter().position(|&d| d != first) {
                return Err(DataError::ShapeMismatch {
                    message: format!(
                        "channel '{}' has {} input dimensions but channel '{}' has {first}",
                        self.channels[pos].name(),
                        dims[pos],
                        self.channels[0].name()
                    ),
                });
            }
        }

        let parts = self.partition(which);
        let mut out = MultiOutput::default();
        for (channel, (xs, ys)) in parts.x.into_iter().zip(parts.y).enumerate() {
            for row in xs {
                let mut stacked = Vec::with_capacity(row.len() + 1);
                stacked.push(channel as f64);
                stacked.extend(row);
                out.x.push(stacked);
            }
            out.y.extend(ys);
        }
        Ok(out)
    }
}

impl IntoIterator for DataSet {
    type Item = Data;
    type IntoIter = std::vec::IntoIter<Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a Data;
    type IntoIter = std::slice::Iter<'a, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.iter()
    }
}
