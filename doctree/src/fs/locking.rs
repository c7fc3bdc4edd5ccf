//! Locked file access and per-path mutation guards.
//!
//! Reads take a shared `fs2` advisory lock and writes an exclusive one, so a
//! reader never observes a half-written document. Advisory locks are
//! cooperative, and on some platforms they do not exclude threads of the same
//! process, so mutations are additionally serialized in-process through
//! [`PathLocks`].

use crate::error::{DocError, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Read file contents with a shared (read) lock.
pub fn locked_read(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| DocError::from_io(path, e))?;
    file.lock_shared().map_err(|e| DocError::from_io(path, e))?;
    let mut content = String::new();
    BufReader::new(&file)
        .read_to_string(&mut content)
        .map_err(|e| DocError::from_io(path, e))?;
    Ok(content)
}

/// Write file contents with an exclusive (write) lock.
///
/// The file is truncated only after the lock is held: open → lock → truncate →
/// write → flush.
pub fn locked_write(path: &Path, content: &str) -> Result<()> {
    #[allow(clippy::suspicious_open_options)]
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .map_err(|e| DocError::from_io(path, e))?;
    file.lock_exclusive()
        .map_err(|e| DocError::from_io(path, e))?;
    file.set_len(0).map_err(|e| DocError::from_io(path, e))?;
    let mut writer = BufWriter::new(&file);
    writer
        .write_all(content.as_bytes())
        .map_err(|e| DocError::from_io(path, e))?;
    writer.flush().map_err(|e| DocError::from_io(path, e))?;
    Ok(())
}

/// Registry of in-process mutexes, one per canonical path.
///
/// [`PathLocks::with_lock`] gives at most one concurrent write/edit/delete
/// per path.
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Drop entries nobody else holds so the map does not grow without bound.
        locks.retain(|_, m| Arc::strong_count(m) > 1);
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }

    /// Run `f` once no other mutation of `path` is in flight.
    pub fn with_lock<T>(&self, path: &Path, f: impl FnOnce() -> T) -> T {
        let mutex = self.entry(path);
        let _guard = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Number of paths currently tracked.
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
