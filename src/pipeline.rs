//! Update and restore pipeline.
//!
//! An update walks `Idle → ResolvingUrls → Fetching → Extracting → BackingUp →
//! Appending → Done`. It fails early, before the hosts file is touched, when no
//! list is selected or every download failed. It fails at `BackingUp` on I/O
//! errors, and appending only ever runs against a [`Snapshot`]. Individual
//! download failures are recorded and skipped.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backup::{Snapshot, SnapshotStore};
use crate::config::{BlocklistSource, CategorySelection, Config};
use crate::error::{HostblockError, PipelineError, Result};
use crate::extractor::DomainSet;
use crate::fetcher::{fetch_all, FetchOutcome, ListFetcher};
use crate::fs_abstraction::FileSystem;
use crate::hosts::HostsFile;
use crate::state::RunState;
use crate::utils::format_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ResolvingUrls,
    Fetching,
    Extracting,
    BackingUp,
    Appending,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ResolvingUrls => "resolving URLs",
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::BackingUp => "backing up",
            Stage::Appending => "appending",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of an update (or a dry run, which has no snapshot)
#[derive(Debug)]
pub struct UpdateReport {
    pub sources: Vec<BlocklistSource>,
    pub outcome: FetchOutcome,
    /// Unique domains across all fetched lists
    pub domains_found: usize,
    /// Domains skipped because the hosts file already blocks them
    pub already_present: usize,
    pub appended: usize,
    pub snapshot: Option<Snapshot>,
}

impl UpdateReport {
    pub fn is_dry_run(&self) -> bool {
        self.snapshot.is_none()
    }
}

/// Drives updates and restores against one hosts file and state directory.
pub struct Pipeline<'a, F: FileSystem + ?Sized, L: ListFetcher + ?Sized> {
    config: &'a Config,
    fs: &'a F,
    fetcher: &'a L,
    hosts_path: PathBuf,
    state_dir: PathBuf,
    stage: Stage,
}

impl<'a, F: FileSystem + ?Sized, L: ListFetcher + ?Sized> Pipeline<'a, F, L> {
    pub fn new(
        config: &'a Config,
        fs: &'a F,
        fetcher: &'a L,
        hosts_path: impl Into<PathBuf>,
        state_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            fs,
            fetcher,
            hosts_path: hosts_path.into(),
            state_dir: state_dir.into(),
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn hosts_path(&self) -> &Path {
        &self.hosts_path
    }

    pub fn snapshots(&self) -> SnapshotStore<'a, F> {
        SnapshotStore::new(self.fs, self.state_dir.clone())
    }

    /// Fetch the selected lists and append their domains to the hosts file.
    pub async fn update(
        &mut self,
        selection: &CategorySelection,
    ) -> Result<UpdateReport, PipelineError> {
        let (sources, outcome, domains) = self.collect(selection).await?;

        self.enter(Stage::BackingUp);
        let snapshot = self
            .snapshots()
            .backup(&self.hosts_path)
            .map_err(|e| self.fail(e))?;

        self.enter(Stage::Appending);
        let (appended, already_present) = self
            .append_after(&snapshot, &domains)
            .map_err(|e| self.fail(e))?;

        self.record_state(&outcome, domains.len(), appended, &snapshot);
        self.enter(Stage::Done);

        Ok(UpdateReport {
            sources,
            outcome,
            domains_found: domains.len(),
            already_present,
            appended,
            snapshot: Some(snapshot),
        })
    }

    /// Resolve, fetch and extract without backing up or writing anything.
    pub async fn dry_run(
        &mut self,
        selection: &CategorySelection,
    ) -> Result<UpdateReport, PipelineError> {
        let (sources, outcome, domains) = self.collect(selection).await?;

        let already_present = match HostsFile::new(self.fs, &self.hosts_path).blocked_domains() {
            Ok(existing) => domains.intersection(&existing).count(),
            Err(e) => {
                warn!("Could not read {:?}: {}", self.hosts_path, e);
                0
            }
        };
        self.enter(Stage::Done);

        Ok(UpdateReport {
            sources,
            outcome,
            domains_found: domains.len(),
            already_present,
            appended: 0,
            snapshot: None,
        })
    }

    /// Put the rolling snapshot back over the hosts file.
    pub fn restore(&self) -> Result<PathBuf> {
        self.snapshots().restore(&self.hosts_path)
    }

    async fn collect(
        &mut self,
        selection: &CategorySelection,
    ) -> Result<(Vec<BlocklistSource>, FetchOutcome, DomainSet), PipelineError> {
        self.enter(Stage::ResolvingUrls);
        let sources = self.config.resolve(selection);
        if sources.is_empty() {
            return Err(self.fail(HostblockError::NoListsSelected));
        }
        info!("Updating from {} block lists...", sources.len());

        self.enter(Stage::Fetching);
        let outcome = fetch_all(self.fetcher, &sources).await;
        if outcome.fetched.is_empty() {
            return Err(self.fail(HostblockError::AllFetchesFailed(sources.len())));
        }
        if !outcome.failed.is_empty() {
            warn!(
                "{} of {} block lists failed to download",
                outcome.failed.len(),
                sources.len()
            );
        }

        self.enter(Stage::Extracting);
        let domains = outcome.domains();
        info!("Extracted {} unique domains", format_count(domains.len()));

        Ok((sources, outcome, domains))
    }

    /// Append only domains the hosts file does not already null-route.
    fn append_after(&self, snapshot: &Snapshot, domains: &DomainSet) -> Result<(usize, usize)> {
        let hosts = HostsFile::new(self.fs, &snapshot.hosts_path);
        let existing = hosts.blocked_domains().map_err(|e| match e {
            HostblockError::Io(source) => HostblockError::Append {
                path: snapshot.hosts_path.clone(),
                source,
            },
            other => other,
        })?;

        let new: DomainSet = domains.difference(&existing).cloned().collect();
        let already_present = domains.len() - new.len();
        if already_present > 0 {
            info!(
                "Skipping {} domains already in the hosts file",
                format_count(already_present)
            );
        }

        let appended = hosts.append(&new)?;
        info!(
            "Appended {} entries to {:?}",
            format_count(appended),
            snapshot.hosts_path
        );
        Ok((appended, already_present))
    }

    /// State is informational: failing to save it does not fail the update.
    fn record_state(
        &self,
        outcome: &FetchOutcome,
        total_domains: usize,
        appended: usize,
        snapshot: &Snapshot,
    ) {
        let mut state = RunState::load_or_default(self.fs, &self.state_dir);
        state.record(outcome, total_domains, appended, &snapshot.timestamped);
        if let Err(e) = state.save(self.fs, &self.state_dir) {
            warn!("Failed to save run state: {}", e);
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!("Pipeline: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn fail(&mut self, source: HostblockError) -> PipelineError {
        let stage = self.stage;
        self.stage = Stage::Failed;
        PipelineError::new(stage, source)
    }
}
