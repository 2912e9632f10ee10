//! Init command implementation.

use anyhow::Result;
use tracing::info;

use super::Options;
use crate::config::Config;

/// Write the starter config, refusing to clobber an existing one unless forced
pub async fn run(force: bool, opts: &Options) -> Result<()> {
    if opts.config.exists() && !force {
        anyhow::bail!(
            "Config file {:?} already exists (use --force to overwrite)",
            opts.config
        );
    }

    Config::starter().save(&opts.config)?;
    info!("Wrote starter config to {:?}", opts.config);

    println!("[OK] Created {}", opts.config.display());
    println!("     Run 'hostblock update --all' to apply it");
    Ok(())
}
