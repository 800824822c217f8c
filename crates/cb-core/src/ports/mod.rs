//! Port interfaces for the bridge
//!
//! Ports define the contract between the bridge use case and the host
//! capabilities it needs: permission queries, clipboard reads and the message
//! bus shared with the embedded application. Implementations live in
//! `cb-platform`; tests substitute mocks or in-memory fakes.

mod clipboard;
mod message_bus;
mod permission;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use clipboard::{ClipboardReadError, ClipboardReaderPort};
pub use message_bus::{InboundSubscription, MessageBusError, MessageBusPort};
pub use permission::{PermissionError, PermissionPort, PermissionStatus};
