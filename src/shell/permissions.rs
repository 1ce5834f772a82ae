use crate::platform::macos::ax;

const ACCESSIBILITY_SETTINGS_URL: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility";

/// Ask once at startup; the system shows its own dialog when untrusted.
pub fn prompt_if_untrusted() -> bool {
    let trusted = ax::is_process_trusted_with_prompt();
    tracing::info!(trusted, "accessibility permission checked");
    trusted
}

pub fn open_accessibility_settings() {
    tracing::warn!("accessibility access missing, opening System Settings");
    if let Err(err) = tauri_plugin_opener::open_url(ACCESSIBILITY_SETTINGS_URL, None::<&str>) {
        tracing::error!(%err, "failed to open Accessibility settings");
    }
}
