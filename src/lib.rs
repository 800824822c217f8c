//! clipbridge
//!
//! Host side of a clipboard port. Reads JSON-lines port messages from stdin,
//! answers `AskForClipBoard` requests with the system clipboard text and
//! writes responses to stdout. Logs go to stderr.

pub mod bootstrap;

use std::time::Duration;

use anyhow::Context;

/// Time given to the runtime to stop its blocking workers on exit.
/// A stdin read in flight never finishes on its own.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(200);

/// Load configuration, install tracing and serve until the port closes.
pub fn run() -> anyhow::Result<()> {
    let config_path = bootstrap::config::resolve_config_path();
    let config = bootstrap::config::load_or_default(config_path.as_deref())?;

    bootstrap::tracing::init_tracing_subscriber(&config.logging)
        .context("Failed to initialize tracing")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    let result = runtime.block_on(bootstrap::run::run_bridge(config, config_path));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    result
}
