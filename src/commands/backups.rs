//! Backup listing command implementation.

use anyhow::{Context, Result};

use super::Options;
use crate::backup::SnapshotStore;
use crate::fs_abstraction::real_fs;

/// Run the backups command
pub async fn run(opts: &Options) -> Result<()> {
    let config = opts.config_or_default()?;
    let hosts_path = opts.hosts_path(&config);
    let store = SnapshotStore::new(real_fs(), opts.state_dir(&config));

    let backups = store
        .list(&hosts_path)
        .with_context(|| format!("Failed to list backups of {:?}", hosts_path))?;

    println!();
    match store.latest() {
        Some(rolling) => println!("Rolling backup: {}", rolling.display()),
        None => println!("Rolling backup: none"),
    }

    if backups.is_empty() {
        println!("No timestamped backups of {}", hosts_path.display());
    } else {
        println!("Timestamped backups ({}):", backups.len());
        for backup in &backups {
            println!("  {}", backup.display());
        }
    }
    println!();

    Ok(())
}
