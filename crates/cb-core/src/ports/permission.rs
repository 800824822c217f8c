use async_trait::async_trait;
use tokio::sync::watch;

use crate::permission::{PermissionName, PermissionState};

/// Result of a resolved permission query.
///
/// Holds the state at resolution time and a receiver that yields every
/// later state change published by the host.
#[derive(Debug)]
pub struct PermissionStatus {
    state: PermissionState,
    changes: watch::Receiver<PermissionState>,
}

impl PermissionStatus {
    pub fn new(state: PermissionState, changes: watch::Receiver<PermissionState>) -> Self {
        Self { state, changes }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn into_changes(self) -> watch::Receiver<PermissionState> {
        self.changes
    }
}

/// Host permission query capability.
#[async_trait]
pub trait PermissionPort: Send + Sync {
    /// Resolve the current state of the named permission.
    ///
    /// No timeout is applied; an implementation that never answers keeps the
    /// caller suspended.
    async fn query(&self, name: &PermissionName) -> Result<PermissionStatus, PermissionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("unsupported permission: {0}")]
    Unsupported(String),

    #[error("permission query failed: {0}")]
    QueryFailed(String),
}
