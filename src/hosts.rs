//! Hosts file location and mutation.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{HostblockError, Result};
use crate::extractor::{extract, format_entry, DomainSet};
use crate::fs_abstraction::FileSystem;

#[cfg(windows)]
const DEFAULT_HOSTS_PATH: &str = r"C:\Windows\System32\drivers\etc\hosts";

#[cfg(not(windows))]
const DEFAULT_HOSTS_PATH: &str = "/etc/hosts";

/// Absolute path of the platform hosts file.
pub fn locate() -> PathBuf {
    PathBuf::from(DEFAULT_HOSTS_PATH)
}

/// The configured override if any, else the platform hosts file.
pub fn resolve_path(override_path: Option<&Path>) -> PathBuf {
    override_path.map(Path::to_path_buf).unwrap_or_else(locate)
}

/// A hosts file reached through a [`FileSystem`].
pub struct HostsFile<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    path: PathBuf,
}

impl<'a, F: FileSystem + ?Sized> HostsFile<'a, F> {
    pub fn new(fs: &'a F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Domains the file already null-routes
    pub fn blocked_domains(&self) -> Result<DomainSet> {
        let content = self.fs.read(&self.path)?;
        Ok(extract(&String::from_utf8_lossy(&content)))
    }

    /// Append one `0.0.0.0 <domain>` line per domain.
    ///
    /// Existing content is left untouched; a missing trailing newline is
    /// supplied first. No check is made against entries already present.
    /// Returns the number of lines written.
    pub fn append(&self, domains: &DomainSet) -> Result<usize> {
        if domains.is_empty() {
            debug!("Nothing to append to {:?}", self.path);
            return Ok(0);
        }

        let existing = self.fs.read(&self.path).map_err(|e| self.append_error(e))?;

        let mut block = String::new();
        if existing.last().is_some_and(|b| *b != b'\n') {
            block.push('\n');
        }
        for domain in domains {
            block.push_str(&format_entry(domain));
            block.push('\n');
        }

        self.fs
            .append(&self.path, block.as_bytes())
            .map_err(|e| self.append_error(e))?;

        Ok(domains.len())
    }

    fn append_error(&self, source: std::io::Error) -> HostblockError {
        HostblockError::Append {
            path: self.path.clone(),
            source,
        }
    }
}
