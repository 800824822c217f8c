//! Permission model.
//!
//! The permission state is owned by the host. The bridge only observes it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Capability name queried for clipboard access.
pub const CLIPBOARD_READ: &str = "clipboard-read";

/// State of a host permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// The host will ask the user on first use.
    Prompt,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Prompt => "prompt",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid permission state: {0:?} (expected granted, denied or prompt)")]
pub struct ParsePermissionStateError(String);

impl FromStr for PermissionState {
    type Err = ParsePermissionStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(PermissionState::Granted),
            "denied" => Ok(PermissionState::Denied),
            "prompt" => Ok(PermissionState::Prompt),
            _ => Err(ParsePermissionStateError(s.to_string())),
        }
    }
}

/// Name of a host capability, e.g. `clipboard-read`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionName(String);

impl PermissionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn clipboard_read() -> Self {
        Self::new(CLIPBOARD_READ)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PermissionName {
    fn default() -> Self {
        Self::clipboard_read()
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PermissionName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
