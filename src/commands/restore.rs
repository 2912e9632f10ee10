//! Restore command implementation.

use anyhow::Result;

use super::Options;
use crate::backup::SnapshotStore;
use crate::fs_abstraction::real_fs;
use crate::lock::LockGuard;

/// Run the restore command
pub async fn run(opts: &Options) -> Result<()> {
    let config = opts.config_or_default()?;
    let hosts_path = opts.hosts_path(&config);
    let state_dir = opts.state_dir(&config);

    let _lock = LockGuard::acquire(&state_dir)?;
    let from = SnapshotStore::new(real_fs(), &state_dir).restore(&hosts_path)?;

    println!();
    println!("[OK] Hosts file restored to the last used state");
    println!("     {} <- {}", hosts_path.display(), from.display());
    Ok(())
}
