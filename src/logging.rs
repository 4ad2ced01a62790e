use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "shorts.log";

/// Install a daily-rolling file subscriber under `logs_dir`.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr
/// once this returns. `RUST_LOG` takes precedence over the default level.
/// Keep the returned guard alive for the life of the program or buffered
/// lines are lost on exit.
pub fn init(logs_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;
    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(guard)
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "shorts=debug" } else { "shorts=info" }
}
