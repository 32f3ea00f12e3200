//! Loading several files at once.
//!
//! Files are read and converted on the rayon pool, then merged into one [`DataSet`] in input
//! order. The merge goes through [`DataSet::append`], so two files producing a channel with the
//! same name fail the whole call with [`DataError::DuplicateName`]; use
//! [`LoadOptions::y_cols`]/[`LoadOptions::names`] or rename channels when files share headers.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::dataset::DataSet;
use crate::error::{DataError, DataResult};

use super::unified::{load_from_path, LoadOptions};

/// Load every path with the same options and merge the results in order.
///
/// The first failing path (in input order) is returned; observers see every individual load.
pub fn load_paths_parallel<P>(paths: &[P], options: &LoadOptions) -> DataResult<DataSet>
where
    P: AsRef<Path> + Sync,
{
    if paths.is_empty() {
        return Err(DataError::EmptyData {
            message: "no paths to load".to_string(),
        });
    }

    let loaded: Vec<DataResult<DataSet>> = paths
        .par_iter()
        .map(|p| load_from_path(p, options))
        .collect();

    let mut out = DataSet::new();
    for ds in loaded {
        out.append(ds?)?;
    }
    Ok(out)
}

/// Load every file matching a glob `pattern` (sorted by path) via [`load_paths_parallel`].
pub fn load_glob(pattern: &str, options: &LoadOptions) -> DataResult<DataSet> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(pattern)? {
        paths.push(entry.map_err(|e| DataError::Io(e.into()))?);
    }
    if paths.is_empty() {
        return Err(DataError::EmptyData {
            message: format!("no files match pattern '{pattern}'"),
        });
    }
    paths.sort();
    load_paths_parallel(&paths, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_rejected() {
        let none: [&str; 0] = [];
        let err = load_paths_parallel(&none, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::EmptyData { .. }));

        let err = load_glob("/definitely/not/here/*.csv", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::EmptyData { .. }));
    }

    #[test]
    fn bad_patterns_are_reported() {
        let err = load_glob("[", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::Glob(_)));
    }
}
