use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use cb_core::ports::{InboundSubscription, MessageBusError, MessageBusPort};
use cb_core::{InboundMessage, OutboundMessage};

/// Host side of an [`InMemoryMessageBus`].
///
/// A transport pushes messages from the embedded application into
/// `inbound_tx` and drains responses from `outbound_rx`. Dropping
/// `inbound_tx` ends the bridge's inbound stream.
pub struct BusEndpoints {
    pub inbound_tx: mpsc::Sender<InboundMessage>,
    pub outbound_rx: mpsc::Receiver<OutboundMessage>,
}

/// In-process message bus backed by bounded tokio channels.
///
/// The inbound stream has a single subscriber. Outbound sends wait for
/// channel capacity and fail only once the host side is gone.
pub struct InMemoryMessageBus {
    inbound_rx: Mutex<Option<mpsc::Receiver<InboundMessage>>>,
    outbound_tx: mpsc::Sender<OutboundMessage>,
}

impl InMemoryMessageBus {
    /// Create a bus and its host endpoints. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> (Self, BusEndpoints) {
        let capacity = capacity.max(1);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);

        let bus = Self {
            inbound_rx: Mutex::new(Some(inbound_rx)),
            outbound_tx,
        };
        let endpoints = BusEndpoints {
            inbound_tx,
            outbound_rx,
        };
        (bus, endpoints)
    }
}

#[async_trait]
impl MessageBusPort for InMemoryMessageBus {
    fn subscribe(&self) -> Result<InboundSubscription, MessageBusError> {
        let mut slot = self
            .inbound_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.take().ok_or(MessageBusError::AlreadySubscribed)
    }

    async fn send(&self, message: OutboundMessage) -> Result<(), MessageBusError> {
        self.outbound_tx
            .send(message)
            .await
            .map_err(|_| MessageBusError::Closed)
    }
}
