//! Mock implementations of the bridge ports for testing.
//!
//! Enabled for this crate's tests and for downstream crates through the
//! `test-utils` feature.

use async_trait::async_trait;
use mockall::mock;

use crate::message::OutboundMessage;
use crate::permission::PermissionName;
use crate::ports::{
    ClipboardReadError, ClipboardReaderPort, InboundSubscription, MessageBusError,
    MessageBusPort, PermissionError, PermissionPort, PermissionStatus,
};

mock! {
    pub Permission {}

    #[async_trait]
    impl PermissionPort for Permission {
        async fn query(&self, name: &PermissionName) -> Result<PermissionStatus, PermissionError>;
    }
}

mock! {
    pub ClipboardReader {}

    #[async_trait]
    impl ClipboardReaderPort for ClipboardReader {
        async fn read_text(&self) -> Result<String, ClipboardReadError>;
    }
}

mock! {
    pub MessageBus {}

    #[async_trait]
    impl MessageBusPort for MessageBus {
        fn subscribe(&self) -> Result<InboundSubscription, MessageBusError>;
        async fn send(&self, message: OutboundMessage) -> Result<(), MessageBusError>;
    }
}
