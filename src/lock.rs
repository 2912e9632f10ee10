//! File-based locking to prevent concurrent runs.
//!
//! Uses flock-style advisory locking so only one hostblock process updates
//! or restores the hosts file at a time.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{HostblockError, Result};

/// File name of the lock inside the state directory
pub const LOCK_FILE: &str = "hostblock.lock";

/// Holds an exclusive lock; released when dropped.
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Attempt to acquire the lock in `state_dir` without blocking.
    ///
    /// Opens with create+read+write (no truncate) so creation and locking
    /// do not race.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        fs::create_dir_all(state_dir)?;
        let path = state_dir.join(LOCK_FILE);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| HostblockError::Locked(path.clone()))?;

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
