use std::path::Path;
use std::sync::OnceLock;

use super::error::DataFormatError;
use super::loader;
use super::model::ClaimsDataset;

/// Write-once holder for the dataset.
///
/// The first successful load is kept for the lifetime of the cache; every
/// later call returns that same instance without touching the source again.
/// A failed load stores nothing, so the next call retries.
#[derive(Debug, Default)]
pub struct DatasetCache {
    cell: OnceLock<ClaimsDataset>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        DatasetCache {
            cell: OnceLock::new(),
        }
    }

    /// The cached dataset, if one has been loaded.
    pub fn get(&self) -> Option<&ClaimsDataset> {
        self.cell.get()
    }

    /// Load `path` on first use. Later calls ignore `path`.
    pub fn load(&self, path: &Path) -> Result<&ClaimsDataset, DataFormatError> {
        self.load_with(|| loader::load_file(path))
    }

    /// Build the dataset with `build` on first use.
    pub fn load_with<E>(
        &self,
        build: impl FnOnce() -> Result<ClaimsDataset, E>,
    ) -> Result<&ClaimsDataset, E> {
        if let Some(dataset) = self.cell.get() {
            log::debug!("dataset served from cache");
            return Ok(dataset);
        }
        let dataset = build()?;
        // A concurrent first load may have won; its instance is kept.
        Ok(self.cell.get_or_init(|| dataset))
    }
}

static SHARED: DatasetCache = DatasetCache::new();

/// Process-wide dataset. Constructed at most once per process.
pub fn load(path: &Path) -> Result<&'static ClaimsDataset, DataFormatError> {
    SHARED.load(path)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn builds_once() {
        let cache = DatasetCache::new();
        let calls = Cell::new(0);
        let build = || {
            calls.set(calls.get() + 1);
            Ok::<_, DataFormatError>(ClaimsDataset::from_records(Vec::new()))
        };

        let first = cache.load_with(build).unwrap() as *const ClaimsDataset;
        let second = cache.load_with(build).unwrap() as *const ClaimsDataset;
        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = DatasetCache::new();
        let err = cache
            .load_with(|| Err(DataFormatError::Layout("boom".into())))
            .unwrap_err();
        assert!(matches!(err, DataFormatError::Layout(_)));
        assert!(cache.get().is_none());

        cache
            .load_with(|| Ok::<_, DataFormatError>(ClaimsDataset::from_records(Vec::new())))
            .unwrap();
        assert!(cache.get().is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let cache = DatasetCache::new();
        let err = cache.load(Path::new("/nonexistent/claims.csv")).unwrap_err();
        assert!(matches!(err, DataFormatError::Io { .. }));
    }
}
