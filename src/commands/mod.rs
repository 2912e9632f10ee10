//! CLI command implementations.

pub mod backups;
pub mod init;
pub mod restore;
pub mod status;
pub mod update;

use anyhow::Result;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Config;
use crate::hosts;

/// Global options every command receives
#[derive(Debug, Clone)]
pub struct Options {
    pub config: PathBuf,
    pub hosts: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

impl From<&Cli> for Options {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            hosts: cli.hosts.clone(),
            state_dir: cli.state_dir.clone(),
        }
    }
}

impl Options {
    /// Command line beats config file beats platform default
    pub fn hosts_path(&self, config: &Config) -> PathBuf {
        hosts::resolve_path(self.hosts.as_deref().or(config.hosts_path.as_deref()))
    }

    /// Command line beats config file beats the working directory
    pub fn state_dir(&self, config: &Config) -> PathBuf {
        self.state_dir
            .clone()
            .or_else(|| config.state_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load the config, falling back to defaults when the file doesn't exist.
    ///
    /// Used by commands that only need paths, so they work before `init`.
    pub fn config_or_default(&self) -> Result<Config> {
        if self.config.exists() {
            Config::load(&self.config)
        } else {
            Ok(Config::default())
        }
    }
}
