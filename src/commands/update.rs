//! Update command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::Options;
use crate::config::{CategorySelection, Config};
use crate::error::HostblockError;
use crate::fetcher::Fetcher;
use crate::fs_abstraction::real_fs;
use crate::lock::LockGuard;
use crate::pipeline::{Pipeline, UpdateReport};
use crate::utils::format_count;

/// Run the update command
pub async fn run(selection: CategorySelection, dry_run: bool, opts: &Options) -> Result<()> {
    // Nothing selected: report before reading config or touching anything
    if selection.is_empty() {
        return Err(HostblockError::NoListsSelected.into());
    }

    let config = Config::load(&opts.config)
        .with_context(|| format!("Failed to load config from {:?}", opts.config))?;
    let hosts_path = opts.hosts_path(&config);
    let state_dir = opts.state_dir(&config);

    let fetcher = Fetcher::new()?;
    let mut pipeline = Pipeline::new(&config, real_fs(), &fetcher, &hosts_path, &state_dir);

    let report = if dry_run {
        info!("Dry run: the hosts file will not be modified");
        pipeline.dry_run(&selection).await?
    } else {
        let _lock = LockGuard::acquire(&state_dir)?;
        pipeline.update(&selection).await?
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &UpdateReport) {
    for failure in &report.outcome.failed {
        warn!("Skipped {}: {}", failure.source.url, failure.error);
    }

    println!();
    match &report.snapshot {
        Some(snapshot) => {
            println!(
                "[OK] Hosts file updated successfully: {} entries appended ({} domains found, {} already present)",
                format_count(report.appended),
                format_count(report.domains_found),
                format_count(report.already_present)
            );
            println!("     Backup: {}", snapshot.timestamped.display());
        }
        None => {
            println!(
                "[DRY RUN] {} domains found, {} already present, {} would be appended",
                format_count(report.domains_found),
                format_count(report.already_present),
                format_count(report.domains_found - report.already_present)
            );
        }
    }

    if !report.outcome.failed.is_empty() {
        println!(
            "     {} of {} lists failed to download",
            report.outcome.failed.len(),
            report.sources.len()
        );
    }
}
