//! Watch the working directory and re-run tests on change

use anyhow::{Context, Result};
use autotest_core::{CommandRunner, WatchConfig};
use autotest_watcher::{Aggregator, FsWatcher};
use std::ffi::OsString;
use tracing::{debug, info};

/// Set up watching and run until interrupted
///
/// Setup failures are returned as errors. The watch handle is dropped on
/// every return path.
pub async fn run(args: Vec<OsString>) -> Result<()> {
    let config = WatchConfig::from_env().context("Invalid configuration")?;

    let root = std::env::current_dir().context("Failed to get working directory")?;

    let (watcher, streams) = FsWatcher::new(&root, config.recursive)?;

    info!("started autotest for {}", root.display());
    debug!(
        "program={} base_args={:?} suffix={} recursive={}",
        config.program, config.base_args, config.suffix, config.recursive
    );

    let runner = CommandRunner::new(config.program.clone(), config.base_args.clone());
    let aggregator = Aggregator::new(root, config.filter(), runner, args);

    tokio::select! {
        () = aggregator.run(streams) => {
            debug!("Event streams closed");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for interrupt")?;
            info!("interrupted, shutting down");
        }
    }

    drop(watcher);
    Ok(())
}
