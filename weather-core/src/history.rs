//! Bounded, persisted log of successful lookups.
//!
//! The log lives in a single JSON document. Records are kept in insertion
//! order (oldest first) and only the most recent [`HISTORY_LIMIT`] survive.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{config::Config, error::StoreError, model::WeatherRecord};

/// Maximum number of records kept on disk.
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct HistoryLog {
    searches: Vec<WeatherRecord>,
}

/// Result of a lenient history read: never fails, but carries the error that
/// forced it to come back empty.
#[derive(Debug, Default)]
pub struct Recent {
    pub records: Vec<WeatherRecord>,
    pub error: Option<StoreError>,
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.settings.history_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record`, evicting the oldest entries beyond [`HISTORY_LIMIT`].
    ///
    /// A corrupt log is reported and left untouched, as is the log when the
    /// record itself is invalid.
    pub fn append(&self, record: WeatherRecord) -> Result<(), StoreError> {
        record.check().map_err(StoreError::InvalidRecord)?;

        let mut log = self.load()?;
        log.searches.push(record);

        if log.searches.len() > HISTORY_LIMIT {
            let excess = log.searches.len() - HISTORY_LIMIT;
            log.searches.drain(..excess);
            debug!(evicted = excess, "history trimmed");
        }

        self.save(&log)
    }

    /// Up to the last `n` records, oldest first (most recent last).
    pub fn try_recent(&self, n: usize) -> Result<Vec<WeatherRecord>, StoreError> {
        let mut log = self.load()?;
        let start = log.searches.len().saturating_sub(n);
        Ok(log.searches.split_off(start))
    }

    /// Like [`try_recent`](Self::try_recent), but degrades to an empty list on error.
    pub fn recent(&self, n: usize) -> Recent {
        match self.try_recent(n) {
            Ok(records) => Recent { records, error: None },
            Err(err) => {
                warn!(error = %err, "could not read search history");
                Recent { records: Vec::new(), error: Some(err) }
            }
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.searches.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn load(&self) -> Result<HistoryLog, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HistoryLog::default()),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&bytes).map_err(|source| {
            warn!(path = %self.path.display(), "history file is corrupt");
            StoreError::Corrupt { path: self.path.clone(), source }
        })
    }

    /// Write to a temp file next to the target, then rename over it.
    fn save(&self, log: &HistoryLog) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_vec_pretty(log).map_err(|e| self.io_error(e.into()))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&json).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}
