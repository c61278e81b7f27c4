//! JSON persistence of participation windows.

use crate::{CacheError, Window};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::info;

/// A window document on disk.
///
/// The document is `{startBlock, endBlock, period, council, records}`. Writes go to a sibling
/// temporary file first, so an interrupted save never leaves a truncated cache behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCache {
    path: PathBuf,
}

impl RecordCache {
    /// Creates a cache handle for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the conventional cache path for the window of `network` starting at `start`.
    pub fn default_path(dir: impl AsRef<Path>, network: &str, start: u64) -> PathBuf {
        dir.as_ref().join(format!("blocks_{network}_{start}.json"))
    }

    /// Returns the cache path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the cache file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Fails if the cache exists and `overwrite` is not set.
    ///
    /// Lets callers refuse early, before spending a whole window of fetches.
    pub fn ensure_writable(&self, overwrite: bool) -> Result<(), CacheError> {
        if self.exists() && !overwrite {
            return Err(CacheError::AlreadyExists(self.path.clone()));
        }
        Ok(())
    }

    /// Writes `window` to the cache.
    pub fn save(&self, window: &Window, overwrite: bool) -> Result<(), CacheError> {
        self.ensure_writable(overwrite)?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let file = File::create(&tmp).map_err(|source| self.io_error(source))?;
        let written = self.write_to(file, &tmp, window).and_then(|()| {
            fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))
        });
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }

        info!(
            target: "cache",
            path = %self.path.display(),
            records = window.records.len(),
            "saved participation window"
        );
        Ok(())
    }

    /// Reads and validates the cached window.
    pub fn load(&self) -> Result<Window, CacheError> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let window: Window = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CacheError::Json { path: self.path.clone(), source })?;
        window
            .check_bounds()
            .and_then(|()| window.validate())
            .map_err(|source| CacheError::Invalid { path: self.path.clone(), source })?;
        Ok(window)
    }

    fn write_to(&self, file: File, tmp: &Path, window: &Window) -> Result<(), CacheError> {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, window)
            .map_err(|source| CacheError::Json { path: tmp.to_path_buf(), source })?;
        writer.flush().map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io { path: self.path.clone(), source }
    }
}
