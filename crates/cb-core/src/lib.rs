//! # cb-core
//!
//! Core domain models and port interfaces for clipbridge.
//!
//! This crate contains the message protocol spoken with the embedded
//! application, the permission model and the configuration model. It has no
//! infrastructure dependencies; adapters live in `cb-platform`.

pub mod config;
pub mod message;
pub mod permission;
pub mod ports;

pub use config::BridgeConfig;
pub use message::{InboundMessage, OutboundMessage};
pub use permission::{PermissionName, PermissionState};
