use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::message::{InboundMessage, OutboundMessage};

/// Receiving end of the inbound message stream, in delivery order.
pub type InboundSubscription = mpsc::Receiver<InboundMessage>;

/// Message boundary shared with the embedded application.
///
/// # Behavior
/// - `subscribe()` hands out the inbound stream. It can be taken once.
/// - `send()` delivers without confirmation from the receiving side.
#[async_trait]
pub trait MessageBusPort: Send + Sync {
    fn subscribe(&self) -> Result<InboundSubscription, MessageBusError>;

    async fn send(&self, message: OutboundMessage) -> Result<(), MessageBusError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageBusError {
    #[error("inbound stream already has a subscriber")]
    AlreadySubscribed,

    #[error("message bus closed")]
    Closed,
}
