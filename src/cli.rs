//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CategorySelection;

#[derive(Parser)]
#[command(name = "hostblock")]
#[command(author, version, about = "Hosts-file domain blocker")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.json", global = true)]
    pub config: PathBuf,

    /// Hosts file to manage (overrides config and platform default)
    #[arg(long, global = true)]
    pub hosts: Option<PathBuf>,

    /// Directory for the rolling backup, run state and lock
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the selected block lists and append them to the hosts file
    Update {
        #[command(flatten)]
        categories: CategoryArgs,

        /// Fetch and count domains but don't touch the hosts file
        #[arg(long)]
        dry_run: bool,
    },

    /// Restore the hosts file from the last backup
    Restore,

    /// Show what the last update did
    Status,

    /// List timestamped backups of the hosts file
    Backups,

    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}

/// The four category toggles
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct CategoryArgs {
    /// Block advertising domains
    #[arg(long)]
    pub ads: bool,

    /// Block malware domains
    #[arg(long)]
    pub malware: bool,

    /// Block tracking domains
    #[arg(long)]
    pub tracking: bool,

    /// Block other malicious domains
    #[arg(long)]
    pub malicious: bool,

    /// Select every category
    #[arg(long)]
    pub all: bool,
}

impl CategoryArgs {
    pub fn selection(&self) -> CategorySelection {
        if self.all {
            return CategorySelection::all();
        }
        CategorySelection::new(self.ads, self.malware, self.tracking, self.malicious)
    }
}
