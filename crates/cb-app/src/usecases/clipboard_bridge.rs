use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use cb_core::ports::{
    ClipboardReaderPort, InboundSubscription, MessageBusError, MessageBusPort, PermissionError,
    PermissionPort,
};
use cb_core::{InboundMessage, OutboundMessage, PermissionName, PermissionState};

/// Answers clipboard requests coming from the embedded application.
///
/// Lifecycle:
/// 1. [`initialize`](Self::initialize) queries the permission, then starts
///    observing permission changes and dispatching inbound messages.
/// 2. Every `AskForClipBoard` spawns its own clipboard read. A successful read
///    is answered with exactly one `GotClipboard`; a failed read is logged and
///    never answered.
///
/// The permission state is observed, not enforced. Reads are issued whatever
/// the state and the host decides whether they succeed.
///
/// Responses carry no correlation id. When several requests are in flight
/// the responses arrive in the order the reads complete.
pub struct ClipboardBridge {
    permissions: Arc<dyn PermissionPort>,
    clipboard: Arc<dyn ClipboardReaderPort>,
    bus: Arc<dyn MessageBusPort>,
    permission_name: PermissionName,
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("permission query for {name} failed")]
    PermissionQuery {
        name: PermissionName,
        #[source]
        source: PermissionError,
    },

    #[error("failed to subscribe to inbound messages")]
    Subscribe(#[source] MessageBusError),
}

impl ClipboardBridge {
    pub fn new(
        permissions: Arc<dyn PermissionPort>,
        clipboard: Arc<dyn ClipboardReaderPort>,
        bus: Arc<dyn MessageBusPort>,
        permission_name: PermissionName,
    ) -> Self {
        Self {
            permissions,
            clipboard,
            bus,
            permission_name,
        }
    }

    pub fn permission_name(&self) -> &PermissionName {
        &self.permission_name
    }

    /// Resolve the permission, then start the observer and dispatch tasks.
    ///
    /// Suspends until the permission port answers. If it never answers this
    /// never returns.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::PermissionQuery`] if the port rejects the query. No
    ///   task is started in that case.
    /// - [`BridgeError::Subscribe`] if the inbound stream cannot be taken.
    pub async fn initialize(self: Arc<Self>) -> Result<BridgeHandle, BridgeError> {
        debug!(permission = %self.permission_name, "Querying permission");

        let status = self
            .permissions
            .query(&self.permission_name)
            .await
            .map_err(|source| BridgeError::PermissionQuery {
                name: self.permission_name.clone(),
                source,
            })?;

        info!(
            permission = %self.permission_name,
            state = %status.state(),
            "Permission resolved"
        );

        let inbound = self.bus.subscribe().map_err(BridgeError::Subscribe)?;

        let observer = tokio::spawn(Arc::clone(&self).observe_permission(status.into_changes()));
        let dispatcher = tokio::spawn(Arc::clone(&self).dispatch(inbound));

        info!("Clipboard bridge listening for inbound messages");

        Ok(BridgeHandle {
            dispatcher,
            observer,
        })
    }

    /// Handle one inbound message.
    ///
    /// Returns the handle of the spawned clipboard read, or `None` when the
    /// message needs no work.
    pub fn on_message(self: &Arc<Self>, message: InboundMessage) -> Option<JoinHandle<()>> {
        debug!(tag = message.tag(), "Inbound message received");

        match message {
            InboundMessage::AskForClipBoard => {
                let bridge = Arc::clone(self);
                Some(tokio::spawn(async move {
                    bridge.answer_clipboard_request().await;
                }))
            }
            InboundMessage::Unknown => None,
        }
    }

    /// Observe a permission state change.
    ///
    /// Only logs. The subscription stays active when the permission is
    /// revoked.
    pub fn on_permission_change(&self, state: PermissionState) {
        info!(
            permission = %self.permission_name,
            state = %state,
            "Permission state changed"
        );
    }

    async fn answer_clipboard_request(&self) {
        match self.clipboard.read_text().await {
            Ok(text) => {
                debug!(chars = text.chars().count(), "Clipboard read");
                if let Err(err) = self.bus.send(OutboundMessage::GotClipboard(text)).await {
                    warn!(error = %err, "Failed to send clipboard response");
                }
            }
            Err(err) => {
                error!(error = %err, "Failed to read clipboard");
            }
        }
    }

    async fn dispatch(self: Arc<Self>, mut inbound: InboundSubscription) {
        while let Some(message) = inbound.recv().await {
            // Reads are detached; the loop never waits on them.
            let _ = self.on_message(message);
        }
        info!("Inbound message stream closed");
    }

    async fn observe_permission(self: Arc<Self>, mut changes: watch::Receiver<PermissionState>) {
        while changes.changed().await.is_ok() {
            let state = *changes.borrow_and_update();
            self.on_permission_change(state);
        }
        debug!("Permission change notifications ended");
    }
}

/// Tasks started by [`ClipboardBridge::initialize`].
///
/// Clipboard reads already in flight are not owned by the handle and run to
/// completion on their own.
pub struct BridgeHandle {
    dispatcher: JoinHandle<()>,
    observer: JoinHandle<()>,
}

impl BridgeHandle {
    /// Wait until the inbound stream closes, then stop observing permission
    /// changes.
    ///
    /// Do not call again once it has returned.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        let result = (&mut self.dispatcher).await;
        self.observer.abort();
        result
    }

    /// Stop dispatching and observing immediately.
    pub fn shutdown(self) {
        self.dispatcher.abort();
        self.observer.abort();
    }
}
