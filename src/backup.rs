//! Hosts file backups.
//!
//! Every update first copies the live hosts file to a timestamped sibling
//! (`<hosts>_backup_<YYYYMMDDHHMMSS>`) and to a single rolling snapshot in the
//! state directory. Restore always reads the rolling snapshot, so once one
//! backup has succeeded a restore is possible.

use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{HostblockError, Result};
use crate::fs_abstraction::FileSystem;

/// File name of the rolling snapshot inside the state directory
pub const ROLLING_BACKUP_FILE: &str = "hosts_last_used";

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Proof that the hosts file was backed up; required before appending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub hosts_path: PathBuf,
    pub timestamped: PathBuf,
    pub rolling: PathBuf,
    pub taken_at: DateTime<Local>,
}

/// Snapshot store with a rolling capacity of one.
pub struct SnapshotStore<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    state_dir: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> SnapshotStore<'a, F> {
    pub fn new(fs: &'a F, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            state_dir: state_dir.into(),
        }
    }

    pub fn rolling_path(&self) -> PathBuf {
        self.state_dir.join(ROLLING_BACKUP_FILE)
    }

    /// Back up `hosts_path` using the current local time.
    pub fn backup(&self, hosts_path: &Path) -> Result<Snapshot> {
        self.backup_at(hosts_path, Local::now())
    }

    /// Back up `hosts_path` to a timestamped file and overwrite the rolling
    /// snapshot. Any failure leaves the caller without a [`Snapshot`].
    pub fn backup_at(&self, hosts_path: &Path, now: DateTime<Local>) -> Result<Snapshot> {
        let timestamped = self.next_backup_path(hosts_path, &now);
        let rolling = self.rolling_path();
        let fail = |source| HostblockError::Backup {
            path: hosts_path.to_path_buf(),
            source,
        };

        self.fs.create_dir_all(&self.state_dir).map_err(fail)?;
        self.fs.copy(hosts_path, &timestamped).map_err(fail)?;
        debug!("Copied {:?} to {:?}", hosts_path, timestamped);
        self.fs.copy(hosts_path, &rolling).map_err(fail)?;

        info!("Backed up hosts file to {:?}", timestamped);

        Ok(Snapshot {
            hosts_path: hosts_path.to_path_buf(),
            timestamped,
            rolling,
            taken_at: now,
        })
    }

    /// The rolling snapshot, if one has ever been written
    pub fn latest(&self) -> Option<PathBuf> {
        let rolling = self.rolling_path();
        self.fs.exists(&rolling).then_some(rolling)
    }

    /// Copy the rolling snapshot over `hosts_path`.
    ///
    /// Fails with [`HostblockError::NoBackup`] and leaves the hosts file alone
    /// when no snapshot exists.
    pub fn restore(&self, hosts_path: &Path) -> Result<PathBuf> {
        let rolling = self.latest().ok_or(HostblockError::NoBackup)?;

        self.fs
            .copy(&rolling, hosts_path)
            .map_err(|source| HostblockError::Restore {
                path: hosts_path.to_path_buf(),
                source,
            })?;

        info!("Restored {:?} from {:?}", hosts_path, rolling);
        Ok(rolling)
    }

    /// Timestamped backups of `hosts_path`, newest first
    pub fn list(&self, hosts_path: &Path) -> Result<Vec<PathBuf>> {
        let dir = match hosts_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = backup_prefix(hosts_path);

        let mut backups: Vec<((String, u32), PathBuf)> = self
            .fs
            .list_dir(dir)?
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                let key = parse_backup_suffix(name.strip_prefix(&prefix)?)?;
                Some((key, path))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    /// First free `<hosts>_backup_<ts>[_<n>]` path, so backups within the same
    /// second never overwrite each other.
    fn next_backup_path(&self, hosts_path: &Path, now: &DateTime<Local>) -> PathBuf {
        let base = backup_path(hosts_path, &now.format(TIMESTAMP_FORMAT).to_string());
        if !self.fs.exists(&base) {
            return base;
        }

        let mut n = 1u32;
        loop {
            let mut candidate = base.clone().into_os_string();
            candidate.push(format!("_{}", n));
            let candidate = PathBuf::from(candidate);
            if !self.fs.exists(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// `<hosts_path>_backup_<timestamp>`
pub fn backup_path(hosts_path: &Path, timestamp: &str) -> PathBuf {
    let mut path: OsString = hosts_path.as_os_str().to_owned();
    path.push("_backup_");
    path.push(timestamp);
    PathBuf::from(path)
}

fn backup_prefix(hosts_path: &Path) -> String {
    let name = hosts_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}_backup_", name)
}

/// Parse `<YYYYMMDDHHMMSS>[_<n>]` into a sortable key
fn parse_backup_suffix(suffix: &str) -> Option<(String, u32)> {
    let (timestamp, n) = match suffix.split_once('_') {
        Some((ts, n)) => (ts, n.parse().ok()?),
        None => (suffix, 0),
    };
    if timestamp.len() != 14 || !timestamp.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((timestamp.to_string(), n))
}
