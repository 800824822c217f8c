use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use cb_core::config::PermissionConfig;
use cb_core::permission::CLIPBOARD_READ;
use cb_core::ports::{PermissionError, PermissionPort, PermissionStatus};
use cb_core::{PermissionName, PermissionState};

use crate::capability::detect_clipboard_permission;

/// Host-side permission source.
///
/// Answers queries for `clipboard-read` only and rejects every other
/// capability name. The current state is held in a watch channel, so every
/// resolved [`PermissionStatus`] sees later [`set_state`](Self::set_state)
/// calls as change notifications.
pub struct HostPermission {
    state_tx: watch::Sender<PermissionState>,
}

impl HostPermission {
    pub fn new(initial: PermissionState) -> Self {
        let (state_tx, _) = watch::channel(initial);
        Self { state_tx }
    }

    /// Build from the platform capability.
    pub fn detect() -> Self {
        Self::new(detect_clipboard_permission())
    }

    /// Use the configured state, or detect it when none is configured.
    pub fn from_config(config: &PermissionConfig) -> Self {
        match config.state {
            Some(state) => Self::new(state),
            None => Self::detect(),
        }
    }

    pub fn state(&self) -> PermissionState {
        *self.state_tx.borrow()
    }

    /// Publish a new state. Setting the current state again is not a change.
    pub fn set_state(&self, state: PermissionState) {
        let changed = self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });

        if changed {
            info!(state = %state, "Host permission changed");
        } else {
            debug!(state = %state, "Host permission unchanged");
        }
    }
}

#[async_trait]
impl PermissionPort for HostPermission {
    async fn query(&self, name: &PermissionName) -> Result<PermissionStatus, PermissionError> {
        if name.as_str() != CLIPBOARD_READ {
            return Err(PermissionError::Unsupported(name.to_string()));
        }

        let changes = self.state_tx.subscribe();
        let state = *changes.borrow();
        Ok(PermissionStatus::new(state, changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn query_resolves_current_state() {
        let permission = HostPermission::new(PermissionState::Prompt);
        let status = permission
            .query(&PermissionName::clipboard_read())
            .await
            .expect("query");
        assert_eq!(status.state(), PermissionState::Prompt);
    }

    #[tokio::test]
    async fn query_rejects_other_capabilities() {
        let permission = HostPermission::new(PermissionState::Granted);
        let err = permission
            .query(&PermissionName::from("camera"))
            .await
            .expect_err("camera is not served");
        assert_eq!(err, PermissionError::Unsupported("camera".to_string()));
    }

    #[tokio::test]
    async fn set_state_notifies_resolved_status() {
        let permission = HostPermission::new(PermissionState::Granted);
        let status = permission
            .query(&PermissionName::clipboard_read())
            .await
            .expect("query");
        let mut changes = status.into_changes();

        permission.set_state(PermissionState::Denied);

        timeout(Duration::from_millis(200), changes.changed())
            .await
            .expect("change timeout")
            .expect("sender alive");
        assert_eq!(*changes.borrow_and_update(), PermissionState::Denied);
        assert_eq!(permission.state(), PermissionState::Denied);
    }

    #[tokio::test]
    async fn setting_same_state_is_not_a_change() {
        let permission = HostPermission::new(PermissionState::Granted);
        let status = permission
            .query(&PermissionName::clipboard_read())
            .await
            .expect("query");
        let changes = status.into_changes();

        permission.set_state(PermissionState::Granted);

        assert!(!changes.has_changed().expect("sender alive"));
    }

    #[test]
    fn configured_state_wins_over_detection() {
        let config = PermissionConfig {
            name: PermissionName::clipboard_read(),
            state: Some(PermissionState::Prompt),
        };
        assert_eq!(
            HostPermission::from_config(&config).state(),
            PermissionState::Prompt
        );
    }

    #[cfg(target_os = "linux")]
    mod detection {
        use super::*;
        use serial_test::serial;

        const DISPLAY_VARS: [&str; 2] = ["WAYLAND_DISPLAY", "DISPLAY"];

        /// Run `f` with the display variables set as given, then restore them.
        fn with_display_env<T>(values: [Option<&str>; 2], f: impl FnOnce() -> T) -> T {
            let saved: Vec<_> = DISPLAY_VARS.iter().map(std::env::var_os).collect();
            for (var, value) in DISPLAY_VARS.iter().zip(values) {
                match value {
                    Some(value) => std::env::set_var(var, value),
                    None => std::env::remove_var(var),
                }
            }

            let result = f();

            for (var, value) in DISPLAY_VARS.iter().zip(saved) {
                match value {
                    Some(value) => std::env::set_var(var, value),
                    None => std::env::remove_var(var),
                }
            }
            result
        }

        fn unconfigured() -> PermissionConfig {
            PermissionConfig {
                name: PermissionName::clipboard_read(),
                state: None,
            }
        }

        #[test]
        #[serial]
        fn x11_display_detects_granted() {
            let state = with_display_env([None, Some(":0")], || {
                HostPermission::from_config(&unconfigured()).state()
            });
            assert_eq!(state, PermissionState::Granted);
        }

        #[test]
        #[serial]
        fn wayland_display_detects_granted() {
            let state = with_display_env([Some("wayland-0"), None], || {
                HostPermission::from_config(&unconfigured()).state()
            });
            assert_eq!(state, PermissionState::Granted);
        }

        #[test]
        #[serial]
        fn no_display_detects_denied() {
            let state = with_display_env([None, None], || {
                HostPermission::from_config(&unconfigured()).state()
            });
            assert_eq!(state, PermissionState::Denied);
        }

        #[test]
        #[serial]
        fn empty_display_counts_as_absent() {
            let state = with_display_env([Some(""), Some("")], || {
                HostPermission::from_config(&unconfigured()).state()
            });
            assert_eq!(state, PermissionState::Denied);
        }
    }
}
