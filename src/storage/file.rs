//! JSON-file key-value store.
//!
//! One `<key>.json` file per key under a data directory. Writes go to a
//! temp file and are renamed into place, under an exclusive lock on
//! `.lock` so two processes sharing a data dir never interleave.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::error::PersistenceError;
use super::KeyValueStore;

const LOCK_FILE: &str = ".lock";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`. The directory is created lazily on
    /// first write so a read-only startup never touches the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn lock(&self) -> Result<File, PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let lock_path = self.dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| PersistenceError::Lock {
                path: lock_path.clone(),
                source: e,
            })?;
        file.lock_exclusive().map_err(|e| PersistenceError::Lock {
            path: lock_path,
            source: e,
        })?;
        Ok(file)
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable store entry, treating as absent");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let lock = self.lock()?;
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let io_err = |source| PersistenceError::Io {
            path: tmp_path.clone(),
            source,
        };
        let mut tmp = File::create(&tmp_path).map_err(io_err)?;
        tmp.write_all(value.as_bytes()).map_err(io_err)?;
        tmp.sync_all().map_err(io_err)?;
        drop(tmp);

        fs::rename(&tmp_path, &path).map_err(|e| PersistenceError::Io {
            path: path.clone(),
            source: e,
        })?;

        let _ = FileExt::unlock(&lock);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Io { path, source: e }),
        }
    }
}

/// Keys become file names; anything outside `[A-Za-z0-9_-]` is replaced.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
