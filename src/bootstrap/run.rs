//! Wiring and run loop.
//!
//! [`run_bridge`] assembles the platform adapters around stdin/stdout.
//! [`serve`] holds the lifecycle so it can run against any byte streams.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use cb_app::ClipboardBridge;
use cb_core::ports::{ClipboardReaderPort, PermissionPort};
use cb_core::{BridgeConfig, PermissionState};
use cb_platform::{HostPermission, InMemoryMessageBus, JsonLinesTransport, SystemClipboardReader};

/// How long pending clipboard reads may keep the outbound side open after
/// the inbound side closed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Serve the bridge over stdin/stdout until input ends or Ctrl-C.
///
/// On Unix, SIGHUP reloads the configuration file and publishes the
/// configured (or re-detected) permission state.
pub async fn run_bridge(config: BridgeConfig, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let permission = Arc::new(HostPermission::from_config(&config.permission));
    let reload = spawn_permission_reload(Arc::clone(&permission), config_path)?;

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        info!("Interrupted");
    };

    let result = serve(
        &config,
        permission,
        Arc::new(SystemClipboardReader::new()),
        tokio::io::stdin(),
        tokio::io::stdout(),
        shutdown,
    )
    .await;

    if let Some(reload) = reload {
        reload.abort();
    }
    result
}

/// Run one bridge session over the given streams.
///
/// Returns once the input ends (after letting pending reads answer) or once
/// `shutdown` resolves.
///
/// # Errors
///
/// - The permission query is rejected.
/// - The transport fails with an I/O error.
pub async fn serve<R, W, S>(
    config: &BridgeConfig,
    permission: Arc<dyn PermissionPort>,
    clipboard: Arc<dyn ClipboardReaderPort>,
    reader: R,
    writer: W,
    shutdown: S,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
    S: Future<Output = ()>,
{
    let (bus, endpoints) = InMemoryMessageBus::new(config.bus.capacity);
    let mut transport = tokio::spawn(JsonLinesTransport::new(reader, writer).run(endpoints));

    let bridge = Arc::new(ClipboardBridge::new(
        permission,
        clipboard,
        Arc::new(bus),
        config.permission.name.clone(),
    ));

    let mut handle = match Arc::clone(&bridge).initialize().await {
        Ok(handle) => handle,
        Err(err) => {
            error!(error = %err, "Clipboard bridge failed to start");
            transport.abort();
            return Err(err).context("Clipboard bridge failed to start");
        }
    };

    tokio::pin!(shutdown);
    let interrupted = tokio::select! {
        result = handle.join() => {
            if let Err(err) = result {
                warn!(error = %err, "Inbound dispatch task ended abnormally");
            }
            info!("Port input closed");
            false
        }
        _ = &mut shutdown => true,
    };

    if interrupted {
        handle.shutdown();
        transport.abort();
        info!("Clipboard bridge stopped");
        return Ok(());
    }

    // Pending reads hold the bus; the outbound side closes when they finish.
    drop(bridge);
    finish_transport(transport).await
}

async fn finish_transport(
    mut transport: JoinHandle<std::io::Result<()>>,
) -> anyhow::Result<()> {
    match timeout(SHUTDOWN_GRACE, &mut transport).await {
        Ok(Ok(result)) => {
            result.context("Port transport failed")?;
            info!("Clipboard bridge stopped");
            Ok(())
        }
        Ok(Err(err)) => Err(err).context("Port transport task failed"),
        Err(_) => {
            warn!("Clipboard reads still pending at shutdown, dropping them");
            transport.abort();
            Ok(())
        }
    }
}

/// Re-read the configuration and publish its permission state.
///
/// Without a configured state the platform is detected again. On error the
/// current state is kept.
#[cfg_attr(not(unix), allow(dead_code))]
fn reload_permission(
    permission: &HostPermission,
    config_path: Option<&Path>,
) -> anyhow::Result<PermissionState> {
    let config = super::config::load_or_default(config_path)?;
    let state = config
        .permission
        .state
        .unwrap_or_else(cb_platform::capability::detect_clipboard_permission);
    permission.set_state(state);
    Ok(state)
}

#[cfg(unix)]
fn spawn_permission_reload(
    permission: Arc<HostPermission>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<Option<JoinHandle<()>>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;

    Ok(Some(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading permission state");
            if let Err(err) = reload_permission(&permission, config_path.as_deref()) {
                let reason = format!("{err:#}");
                warn!(error = %reason, "Failed to reload configuration");
            }
        }
    })))
}

#[cfg(not(unix))]
fn spawn_permission_reload(
    _permission: Arc<HostPermission>,
    _config_path: Option<PathBuf>,
) -> anyhow::Result<Option<JoinHandle<()>>> {
    Ok(None)
}
