//! # cb-platform
//!
//! Platform implementations of the clipbridge ports.
//!
//! This crate contains the adapters that touch the operating system and the
//! process boundary: the system clipboard, the host permission source, the
//! in-process message bus and the JSON-lines transport that carries port
//! messages over a byte stream.

pub mod adapters;
pub mod capability;
pub mod transport;

pub use adapters::{BusEndpoints, HostPermission, InMemoryMessageBus, SystemClipboardReader};
pub use transport::JsonLinesTransport;
