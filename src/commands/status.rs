//! Status command implementation.

use anyhow::Result;

use super::Options;
use crate::backup::SnapshotStore;
use crate::fs_abstraction::real_fs;
use crate::state::{render, RunState};

/// Run the status command
pub async fn run(opts: &Options) -> Result<()> {
    let config = opts.config_or_default()?;
    let hosts_path = opts.hosts_path(&config);
    let state_dir = opts.state_dir(&config);

    let state = RunState::load_or_default(real_fs(), &state_dir);
    let rolling = SnapshotStore::new(real_fs(), &state_dir).latest();

    print!("{}", render(&state, &hosts_path, rolling.as_deref()));
    Ok(())
}
