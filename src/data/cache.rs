use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::load_file;
use super::model::Dataset;
use super::normalize::normalize;
use crate::error::{DashboardError, Result};

/// Holds the dataset for one source file for the lifetime of the process.
///
/// The file is read on the first [`get`](Self::get); later calls hand out the
/// same `Arc` until the cache is invalidated.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    dataset: Option<Arc<Dataset>>,
    loaded_mtime: Option<SystemTime>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dataset: None,
            loaded_mtime: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Return the cached dataset, loading it on first use.
    pub fn get(&mut self) -> Result<Arc<Dataset>> {
        if let Some(ds) = &self.dataset {
            return Ok(Arc::clone(ds));
        }
        let (mtime, dataset) = self.read()?;
        self.dataset = Some(Arc::clone(&dataset));
        self.loaded_mtime = Some(mtime);
        Ok(dataset)
    }

    fn read(&self) -> Result<(SystemTime, Arc<Dataset>)> {
        let mtime = modified_time(&self.path)?;
        let table = load_file(&self.path)?;
        let dataset = Arc::new(normalize(&table)?);
        log::info!(
            "Loaded {} records ({} regions, {} categories) from {}",
            dataset.len(),
            dataset.regions().len(),
            dataset.categories().len(),
            self.path.display()
        );
        Ok((mtime, dataset))
    }

    /// Drop the cached dataset so the next `get` re-reads the file.
    pub fn invalidate(&mut self) {
        if self.dataset.take().is_some() {
            log::debug!("Invalidated cached dataset for {}", self.path.display());
        }
        self.loaded_mtime = None;
    }

    /// Whether the file changed (or vanished) since it was loaded.
    /// An unloaded cache is never stale.
    pub fn is_stale(&self) -> bool {
        let Some(loaded) = self.loaded_mtime else {
            return false;
        };
        match modified_time(&self.path) {
            Ok(current) => current != loaded,
            Err(_) => true,
        }
    }

    /// Re-read the file now. On failure the previous dataset stays cached and
    /// the failed file version is remembered, so the next change retries.
    pub fn reload(&mut self) -> Result<Arc<Dataset>> {
        let attempted = modified_time(&self.path).ok();
        match self.read() {
            Ok((mtime, dataset)) => {
                self.dataset = Some(Arc::clone(&dataset));
                self.loaded_mtime = Some(mtime);
                Ok(dataset)
            }
            Err(e) => {
                if attempted.is_some() {
                    self.loaded_mtime = attempted;
                }
                Err(e)
            }
        }
    }

    /// Reload when stale. Returns the fresh dataset, or `None` if unchanged.
    pub fn reload_if_changed(&mut self) -> Result<Option<Arc<Dataset>>> {
        if !self.is_stale() {
            return Ok(None);
        }
        log::warn!("{} changed on disk, reloading", self.path.display());
        self.reload().map(Some)
    }
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| DashboardError::file_access(path, e))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use super::*;

    const CSV: &str = "Retailer,Region,City,Product,Invoice Date,Total Sales,Sales Method\n\
        Foot Locker,Northeast,New York,Men's Street Footwear,1/1/2020,100,In-store\n\
        Walmart,South,Houston,Women's Apparel,6/1/2021,50,Online\n";

    fn write_source(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("sales.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    fn bump_mtime(path: &Path, secs: u64) {
        let later = SystemTime::now() + Duration::from_secs(secs);
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(later)
            .unwrap();
    }

    #[test]
    fn repeated_get_returns_same_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, CSV);
        let mut cache = DatasetCache::new(&path);

        let first = cache.get().unwrap();
        // Deleting the source proves the second call never touches storage.
        fs::remove_file(&path).unwrap();
        let second = cache.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DatasetCache::new(dir.path().join("nope.csv"));
        assert!(matches!(cache.get(), Err(DashboardError::FileAccess { .. })));
        assert!(!cache.is_loaded());
    }

    #[test]
    fn invalidate_forces_a_fresh_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, CSV);
        let mut cache = DatasetCache::new(&path);

        let first = cache.get().unwrap();
        cache.invalidate();
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn detects_changed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, CSV);
        let mut cache = DatasetCache::new(&path);

        assert!(!cache.is_stale());
        cache.get().unwrap();
        assert!(!cache.is_stale());
        assert!(cache.reload_if_changed().unwrap().is_none());

        let extra = "Amazon,West,Seattle,Kids Hoodie,7/1/2021,5,Online\n";
        fs::write(&path, format!("{CSV}{extra}")).unwrap();
        bump_mtime(&path, 60);

        assert!(cache.is_stale());
        let reloaded = cache.reload_if_changed().unwrap().expect("reloaded");
        assert_eq!(reloaded.len(), 3);
        assert!(!cache.is_stale());
    }

    #[test]
    fn deleted_file_counts_as_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, CSV);
        let mut cache = DatasetCache::new(&path);
        cache.get().unwrap();
        fs::remove_file(&path).unwrap();
        assert!(cache.is_stale());
        assert!(cache.reload_if_changed().is_err());
    }

    #[test]
    fn failed_reload_keeps_data_and_retries_after_next_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, CSV);
        let mut cache = DatasetCache::new(&path);
        let original = cache.get().unwrap();

        let broken = "Amazon,West,Seattle,Kids Hoodie,someday,5,Online\n";
        fs::write(&path, format!("{CSV}{broken}")).unwrap();
        bump_mtime(&path, 60);
        assert!(matches!(
            cache.reload_if_changed(),
            Err(DashboardError::Parse { .. })
        ));

        // The broken version is not retried, and the old data stays served.
        assert!(!cache.is_stale());
        assert!(Arc::ptr_eq(&cache.get().unwrap(), &original));

        let fixed = "Amazon,West,Seattle,Kids Hoodie,7/1/2021,5,Online\n";
        fs::write(&path, format!("{CSV}{fixed}")).unwrap();
        bump_mtime(&path, 120);
        assert!(cache.is_stale());
        let reloaded = cache.reload_if_changed().unwrap().expect("reloaded");
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn explicit_reload_rereads_unchanged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(&dir, CSV);
        let mut cache = DatasetCache::new(&path);
        let first = cache.get().unwrap();
        let second = cache.reload().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &cache.get().unwrap()));
    }
}
