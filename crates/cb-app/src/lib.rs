//! clipbridge application layer
//!
//! This crate contains the bridge use case that answers clipboard requests
//! from the embedded application. It depends only on the ports declared in
//! `cb-core`.

pub mod usecases;

pub use usecases::clipboard_bridge::{BridgeError, BridgeHandle, ClipboardBridge};
