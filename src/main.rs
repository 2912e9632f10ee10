//! hostblock - Hosts-file domain blocker
//!
//! Merges remote blocklists into the system hosts file, with backup/restore.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hostblock::cli::{Cli, Commands};
use hostblock::commands::Options;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opts = Options::from(&cli);

    match cli.command {
        Commands::Update {
            categories,
            dry_run,
        } => hostblock::commands::update::run(categories.selection(), dry_run, &opts).await,
        Commands::Restore => hostblock::commands::restore::run(&opts).await,
        Commands::Status => hostblock::commands::status::run(&opts).await,
        Commands::Backups => hostblock::commands::backups::run(&opts).await,
        Commands::Init { force } => hostblock::commands::init::run(force, &opts).await,
        Commands::Version => {
            println!("hostblock {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
