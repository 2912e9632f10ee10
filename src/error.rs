//! Error types for hostblock.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Error, Debug)]
pub enum HostblockError {
    /// No category was selected, or the selected categories have no URLs.
    #[error("No block lists selected")]
    NoListsSelected,

    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Every block list download failed ({0} attempted)")]
    AllFetchesFailed(usize),

    #[error("Backup of {path:?} failed: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Appending to {path:?} failed: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No backup found to restore")]
    NoBackup,

    #[error("Restore of {path:?} failed: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Another hostblock run holds the lock at {0:?}")]
    Locked(PathBuf),

    #[error("File system error: {0}")]
    Io(#[from] io::Error),
}

/// A pipeline failure, tagged with the stage it happened in.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: HostblockError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: HostblockError) -> Self {
        Self { stage, source }
    }
}

pub type Result<T, E = HostblockError> = std::result::Result<T, E>;
