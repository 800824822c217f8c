mod clipboard;
mod message_bus;
mod permission;

pub use clipboard::SystemClipboardReader;
pub use message_bus::{BusEndpoints, InMemoryMessageBus};
pub use permission::HostPermission;
