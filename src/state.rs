//! Run state persistence and display.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Category;
use crate::error::{HostblockError, Result};
use crate::fetcher::FetchOutcome;
use crate::fs_abstraction::FileSystem;
use crate::utils::{format_count, truncate};

/// File name of the run state inside the state directory
pub const STATE_FILE: &str = "hostblock-state.json";

/// What the last successful update did
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunState {
    pub last_update: Option<DateTime<Utc>>,
    pub sources: Vec<SourceStats>,
    pub failed: Vec<FailedSource>,
    pub total_domains: usize,
    pub appended: usize,
    pub last_backup: Option<PathBuf>,
}

/// Statistics for a single blocklist source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceStats {
    pub category: Category,
    pub url: String,
    pub domains: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedSource {
    pub category: Category,
    pub url: String,
    pub reason: String,
}

impl RunState {
    pub fn path(state_dir: &Path) -> PathBuf {
        state_dir.join(STATE_FILE)
    }

    /// Load state, or the empty state if none was saved yet
    pub fn load<F: FileSystem + ?Sized>(fs: &F, state_dir: &Path) -> Result<Self> {
        let path = Self::path(state_dir);
        if fs.exists(&path) {
            let content = fs.read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                HostblockError::Config(format!(
                    "Corrupt state file {:?}: {}",
                    path, e
                ))
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Like [`RunState::load`], but an unreadable or corrupt file is logged
    /// and treated as empty
    pub fn load_or_default<F: FileSystem + ?Sized>(fs: &F, state_dir: &Path) -> Self {
        Self::load(fs, state_dir).unwrap_or_else(|e| {
            warn!("Ignoring run state: {}", e);
            Self::default()
        })
    }

    pub fn save<F: FileSystem + ?Sized>(&self, fs: &F, state_dir: &Path) -> Result<()> {
        fs.create_dir_all(state_dir)?;
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| HostblockError::Config(e.to_string()))?;
        fs.write(&Self::path(state_dir), content.as_bytes())?;
        Ok(())
    }

    /// Record the results of an update
    pub fn record(
        &mut self,
        outcome: &FetchOutcome,
        total_domains: usize,
        appended: usize,
        backup: &Path,
    ) {
        self.sources = outcome
            .fetched
            .iter()
            .map(|r| SourceStats {
                category: r.source.category,
                url: r.source.url.clone(),
                domains: r.domains.len(),
            })
            .collect();
        self.failed = outcome
            .failed
            .iter()
            .map(|f| FailedSource {
                category: f.source.category,
                url: f.source.url.clone(),
                reason: f.error.to_string(),
            })
            .collect();
        self.total_domains = total_domains;
        self.appended = appended;
        self.last_backup = Some(backup.to_path_buf());
        self.last_update = Some(Utc::now());
    }
}

/// Render the state as the operator-facing status block
pub fn render(state: &RunState, hosts_path: &Path, rolling_backup: Option<&Path>) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(String::new());
    line("══════════════════════════════════════════════════════════════════".to_string());
    line(" HOSTBLOCK STATUS".to_string());
    line("══════════════════════════════════════════════════════════════════".to_string());
    line(format!(" Hosts file: {}", hosts_path.display()));
    line(format!(
        " Restore available: {}",
        match rolling_backup {
            Some(p) => format!("yes ({})", p.display()),
            None => "no".to_string(),
        }
    ));
    line(String::new());

    if !state.sources.is_empty() {
        line(" CATEGORY   SOURCE                                       DOMAINS".to_string());
        line(" ────────── ──────────────────────────────────────────── ────────".to_string());
        for source in &state.sources {
            line(format!(
                " {:<10} {:<44} {:>8}",
                source.category.to_string(),
                truncate(&source.url, 44),
                format_count(source.domains),
            ));
        }
        line(String::new());
    }

    for failed in &state.failed {
        line(format!(
            " [FAILED] {} {}: {}",
            failed.category, failed.url, failed.reason
        ));
    }

    line(format!(
        " Domains: {} extracted, {} appended",
        format_count(state.total_domains),
        format_count(state.appended)
    ));

    if let Some(backup) = &state.last_backup {
        line(format!(" Last backup: {}", backup.display()));
    }

    match state.last_update {
        Some(last_update) => {
            let local: DateTime<Local> = last_update.into();
            line(format!(
                " Last update: {} ({})",
                local.format("%Y-%m-%d %H:%M:%S"),
                format_duration_ago(last_update)
            ));
        }
        None => line(" Last update: never".to_string()),
    }

    line("══════════════════════════════════════════════════════════════════".to_string());
    out
}

/// Format duration since a timestamp
fn format_duration_ago(dt: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(dt).num_seconds();
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86400)
    }
}
