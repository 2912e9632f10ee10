//! # hostblock - Hosts-file domain blocker
//!
//! Downloads remote blocklists, extracts the domains they null-route and
//! appends them to the system hosts file, keeping a backup of every prior
//! state so the last one can be restored.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        hostblock                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: update, restore, status, backups, init     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_json)                                        │
//! │    └── Categories: ads, malware, tracking, malicious        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pipeline                                                   │
//! │    ├── Fetcher (reqwest + rustls), one URL at a time        │
//! │    ├── Extractor (regex), null-route lines → DomainSet      │
//! │    ├── SnapshotStore: timestamped + rolling backup          │
//! │    └── HostsFile: append `0.0.0.0 <domain>` entries         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use hostblock::config::{CategorySelection, Config};
//! use hostblock::fetcher::Fetcher;
//! use hostblock::fs_abstraction::real_fs;
//! use hostblock::hosts;
//! use hostblock::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let fetcher = Fetcher::new()?;
//!     let mut pipeline = Pipeline::new(&config, real_fs(), &fetcher, hosts::locate(), ".");
//!
//!     let report = pipeline
//!         .update(&CategorySelection::new(true, true, false, false))
//!         .await?;
//!     println!("appended {} entries", report.appended);
//!
//!     // Undo it
//!     pipeline.restore()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`backup`] - Timestamped and rolling hosts file snapshots
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and category resolution
//! - [`error`] - Error taxonomy
//! - [`extractor`] - Domain extraction from hosts-format lists
//! - [`fetcher`] - HTTP client for downloading blocklists
//! - [`fs_abstraction`] - Mockable filesystem seam
//! - [`hosts`] - Hosts file location and appending
//! - [`lock`] - File locking for concurrent execution prevention
//! - [`pipeline`] - Update/restore orchestration
//! - [`state`] - Run state persistence
//! - [`utils`] - Common utility functions (formatting, truncation)

pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod fs_abstraction;
pub mod hosts;
pub mod lock;
pub mod pipeline;
pub mod state;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::{CategorySelection, Config};
pub use error::{HostblockError, PipelineError};
pub use pipeline::{Pipeline, Stage, UpdateReport};
