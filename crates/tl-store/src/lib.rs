//! Storage layer for the time log.
//!
//! Persists the whole [`LogStore`] as one JSON document.
//!
//! # Concurrency
//!
//! The file is read once when a command starts and replaced wholesale when
//! it finishes. There is no locking: two invocations racing each other will
//! silently lose the changes of whichever writes first.
//!
//! # Schema
//!
//! ```text
//! { "<year>": { "<month>": { "<day>": [ {"time": <epoch-seconds>, "event": "<kind>", "id": "<job>"}, ... ] } } }
//! ```
//!
//! - Keys are calendar numbers without zero padding.
//! - `id` is present only for job events.
//! - Array order is append order.
//!
//! A missing or empty file loads as an empty log. Anything else that does not
//! parse is an error; there is no partial recovery.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tl_core::LogStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The log file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The log file is not a valid time log.
    #[error("failed to parse time data in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The log could not be serialized.
    #[error("failed to serialize time data")]
    Serialize(#[source] serde_json::Error),
    /// Writing or replacing the log file failed.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle to the JSON log file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the log, returning an empty one if the file is missing or blank.
    pub fn load(&self) -> Result<LogStore, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no time data yet");
                return Ok(LogStore::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(LogStore::new());
        }

        let store: LogStore = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), days = store.days().count(), "loaded time data");
        Ok(store)
    }

    /// Replaces the file with the serialized log.
    ///
    /// The data is written to a temporary file next to the target and renamed
    /// over it, so readers never observe a half-written log.
    pub fn save(&self, store: &LogStore) -> Result<(), StoreError> {
        let mut json = serde_json::to_string(store).map_err(StoreError::Serialize)?;
        json.push('\n');

        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_err)?;

        let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "saved time data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::{DayKey, Event, JobId};

    fn sample() -> LogStore {
        let coding = JobId::new("coding").unwrap();
        let mut store = LogStore::new();
        let day = store.day_mut(DayKey::new(2026, 3, 9));
        day.append(Event::day_start(1_773_039_600));
        day.append(Event::job_start(1_773_039_600, coding.clone()));
        day.append(Event::day_pause(1_773_043_200));
        day.append(Event::day_back(1_773_043_500));
        day.append(Event::job_stop(1_773_047_100, coding));
        day.append(Event::day_stop(1_773_047_100));
        store
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("timedb.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn blank_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timedb.json");
        fs::write(&path, "\n").unwrap();
        assert!(JsonStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timedb.json");
        fs::write(&path, r#"{"2026": {"3": "#).unwrap();

        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("timedb.json"));
    }

    #[test]
    fn invalid_event_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timedb.json");
        fs::write(&path, r#"{"2026":{"3":{"9":[{"time":0,"event":"Starting job"}]}}}"#).unwrap();

        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/dir/timedb.json"));
        let log = sample();

        store.save(&log).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, log);
    }

    #[test]
    fn saved_file_uses_canonical_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timedb.json");
        let mut log = LogStore::new();
        let day = log.day_mut(DayKey::new(2026, 3, 9));
        day.append(Event::day_start(60));
        day.append(Event::job_start(120, JobId::new("coding").unwrap()));

        JsonStore::new(&path).save(&log).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            concat!(
                r#"{"2026":{"3":{"9":["#,
                r#"{"time":60,"event":"Starting day"},"#,
                r#"{"time":120,"event":"Starting job","id":"coding"}"#,
                "]}}}\n"
            )
        );
    }

    #[test]
    fn loads_files_written_by_older_releases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timedb.txt");
        fs::write(
            &path,
            concat!(
                r#"{"2015":{"11":{"2":[{"time":1446451200,"event":"Starting day"},"#,
                r#"{"time":1446451200,"event":"Starting job","id":"mail"}]}}}"#,
            ),
        )
        .unwrap();

        let loaded = JsonStore::new(&path).load().unwrap();
        let day = loaded.day(DayKey::new(2015, 11, 2)).unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day.events()[1].job_id().map(JobId::as_str), Some("mail"));
    }
}
