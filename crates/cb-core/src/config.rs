//! Bridge configuration domain model
//!
//! Every section and field is optional in the source file; absent values fall
//! back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::permission::{PermissionName, PermissionState};

/// Default capacity of the inbound and outbound message channels.
pub const DEFAULT_BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub permission: PermissionConfig,
    pub bus: BusConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Capability queried at startup
    pub name: PermissionName,

    /// Fixed state reported by the host permission adapter.
    /// When absent the adapter detects it from the platform.
    pub state: Option<PermissionState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write daily rolling log files under the platform data directory
    pub file: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_document_yields_defaults() {
        let config: BridgeConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.permission.name.as_str(), "clipboard-read");
        assert_eq!(config.permission.state, None);
        assert_eq!(config.bus.capacity, DEFAULT_BUS_CAPACITY);
        assert!(!config.logging.file);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: BridgeConfig = serde_json::from_value(json!({
            "permission": { "state": "prompt" },
            "logging": { "file": true }
        }))
        .unwrap();

        assert_eq!(config.permission.name, PermissionName::clipboard_read());
        assert_eq!(config.permission.state, Some(PermissionState::Prompt));
        assert_eq!(config.bus.capacity, DEFAULT_BUS_CAPACITY);
        assert!(config.logging.file);
    }

    #[test]
    fn unknown_permission_state_is_rejected() {
        let result = serde_json::from_value::<BridgeConfig>(json!({
            "permission": { "state": "maybe" }
        }));
        assert!(result.is_err());
    }
}
