//! Platform capability detection for clipboard access.
//!
//! Decides which permission state the host reports when none is configured.

use cb_core::PermissionState;

/// Detect whether the current platform can serve clipboard reads.
///
/// # Detection Logic
///
/// - **macOS**: Always `Granted` (pasteboard available)
/// - **Windows**: Always `Granted`
/// - **Linux**: `Granted` when a display server is reachable
///   (`WAYLAND_DISPLAY` or `DISPLAY` set), otherwise `Denied`
/// - **Other**: `Denied`
pub fn detect_clipboard_permission() -> PermissionState {
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    {
        PermissionState::Granted
    }

    #[cfg(target_os = "linux")]
    {
        let state = permission_for_display(has_display_server());
        if state == PermissionState::Denied {
            tracing::warn!("No display server detected; clipboard reads will fail");
        }
        state
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        tracing::warn!("Unsupported platform for clipboard access");
        PermissionState::Denied
    }
}

#[cfg(target_os = "linux")]
fn has_display_server() -> bool {
    ["WAYLAND_DISPLAY", "DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|value| !value.is_empty()))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn permission_for_display(has_display: bool) -> PermissionState {
    if has_display {
        PermissionState::Granted
    } else {
        PermissionState::Denied
    }
}
