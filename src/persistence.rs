//! This module abstracts the small key-value store the best score lives in. The session only speaks
//! to the [`Backend`] trait; the terminal front end picks a [`FileBackend`] or [`Disabled`], and
//! tests use a [`MemoryBackend`].
//!
//! Storage is never allowed to break a game. [`load_best`] turns every failure into a score of
//! zero, and the session only logs a failed write.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;

/// The key under which the best score is stored.
pub const BEST_SCORE_KEY: &str = "2048-best-score";

/// The errors a storage backend may run into.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// This variant is used when the stored data exists but cannot be parsed or produced.
    #[error("malformed score file: {0}")]
    Format(#[from] serde_json::Error),
    /// This variant is used when the underlying medium cannot be read or written.
    #[error("score storage unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// A store of non-negative integers addressed by string keys.
pub trait Backend {
    /// This function reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the backing medium cannot be read or holds malformed data.
    fn get(&self, key: &str) -> Result<Option<u64>, Error>;

    /// This function stores `value` under `key`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the backing medium cannot be written.
    fn set(&mut self, key: &str, value: u64) -> Result<(), Error>;
}

/// A backend standing in for a missing store: nothing is ever found and writes go nowhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct Disabled;

impl Backend for Disabled {
    fn get(&self, _key: &str) -> Result<Option<u64>, Error> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: u64) -> Result<(), Error> {
        Ok(())
    }
}

/// A backend keeping a JSON object of integers in a single file. A missing file reads as an empty
/// store; every write rewrites the whole file. A file that cannot be parsed is replaced on the next
/// write, so a damaged store heals instead of failing forever.
#[derive(Clone, Debug)]
pub struct FileBackend {
    /// The location of the JSON file.
    path: PathBuf,
}

impl FileBackend {
    /// This function creates a backend over `path`. The file is not touched until the first read
    /// or write.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// This function returns the location of the JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// This function reads the whole store, treating a missing file as an empty one.
    fn load(&self) -> Result<HashMap<String, u64>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<u64>, Error> {
        Ok(self.load()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), Error> {
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(Error::Format(err)) => {
                warn!("replacing malformed {}: {err}", self.path.display());
                HashMap::new()
            }
            Err(err) => return Err(err),
        };
        let _ = entries.insert(key.to_owned(), value);
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// A backend holding its entries in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    /// The stored entries.
    entries: HashMap<String, u64>,
}

impl MemoryBackend {
    /// This function creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<u64>, Error> {
        Ok(self.entries.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), Error> {
        let _ = self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// This function reads the best score from `backend`. A missing entry and a failing backend both
/// read as zero; the failure is only logged.
pub fn load_best<B: Backend + ?Sized>(backend: &B) -> u64 {
    match backend.get(BEST_SCORE_KEY) {
        Ok(best) => best.unwrap_or(0),
        Err(err) => {
            warn!("could not read the best score, starting from zero: {err}");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// This structure fails every operation, as an unreachable store would.
    struct Broken;

    impl Backend for Broken {
        fn get(&self, _key: &str) -> Result<Option<u64>, Error> {
            Err(std::io::Error::from(ErrorKind::PermissionDenied).into())
        }

        fn set(&mut self, _key: &str, _value: u64) -> Result<(), Error> {
            Err(std::io::Error::from(ErrorKind::PermissionDenied).into())
        }
    }

    #[test]
    fn missing_values_read_as_zero() {
        assert_eq!(load_best(&MemoryBackend::new()), 0, "empty memory store");
        assert_eq!(load_best(&Disabled), 0, "disabled store");
        assert_eq!(load_best(&Broken), 0, "failing store");
    }

    #[test]
    fn memory_round_trip() {
        let mut backend = MemoryBackend::new();
        backend.set(BEST_SCORE_KEY, 512).expect("memory writes succeed");
        backend.set(BEST_SCORE_KEY, 1024).expect("memory writes succeed");

        assert_eq!(load_best(&backend), 1024, "last write wins");
        assert_eq!(
            backend.get("other").expect("memory reads succeed"),
            None,
            "other keys untouched"
        );
    }

    #[test]
    fn disabled_swallows_writes() {
        let mut backend = Disabled;
        backend.set(BEST_SCORE_KEY, 4096).expect("disabled writes succeed");

        assert_eq!(load_best(&backend), 0, "nothing was kept");
    }

    #[test]
    fn file_backend_persists_across_instances() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("best.json");

        assert_eq!(load_best(&FileBackend::new(&path)), 0, "no file yet");

        let mut backend = FileBackend::new(&path);
        backend.set(BEST_SCORE_KEY, 2048).expect("first write creates the file");
        backend.set("gamesPlayed", 3).expect("second write keeps the first");

        let reopened = FileBackend::new(&path);
        assert_eq!(reopened.path(), path.as_path(), "same location");
        assert_eq!(load_best(&reopened), 2048, "best score survives");
        assert_eq!(
            reopened.get("gamesPlayed").expect("file is readable"),
            Some(3),
            "other keys kept"
        );

        let contents = fs::read_to_string(&path).expect("file was written");
        assert!(contents.contains("\"2048-best-score\": 2048"), "stored key: {contents}");
    }

    #[test]
    fn malformed_file_degrades_to_zero() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("best.json");
        fs::write(&path, "not json").expect("seed the file");

        let backend = FileBackend::new(&path);
        assert!(
            matches!(backend.get(BEST_SCORE_KEY), Err(Error::Format(_))),
            "parse failure surfaces from the backend"
        );
        assert_eq!(load_best(&backend), 0, "but reads as zero");
    }

    #[test]
    fn set_overwrites_a_corrupt_file() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("best.json");
        fs::write(&path, "{truncated").expect("seed the file");

        let mut backend = FileBackend::new(&path);
        backend
            .set(BEST_SCORE_KEY, 512)
            .expect("a malformed file is replaced, not fatal");

        assert_eq!(load_best(&backend), 512, "the new best reads back");
        assert_eq!(
            load_best(&FileBackend::new(&path)),
            512,
            "and survives a reopen"
        );
    }

    #[test]
    fn set_still_reports_io_failures() {
        let dir = tempfile::tempdir().expect("temporary directory");

        let mut backend = FileBackend::new(dir.path());
        assert!(
            matches!(backend.set(BEST_SCORE_KEY, 8), Err(Error::Io(_))),
            "a directory cannot be read as a file"
        );
    }
}
