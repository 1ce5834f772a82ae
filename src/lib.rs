pub mod error;
pub mod hints;
pub mod logging;
pub mod platform;
pub mod settings;

#[cfg(target_os = "macos")]
mod shell;

pub use error::{HintError, SettingsError};

#[cfg(target_os = "macos")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logging::init();
    shell::run();
}

#[cfg(not(target_os = "macos"))]
pub fn run() {
    logging::init();
    tracing::error!("FlashClick drives the macOS accessibility API and only runs on macOS");
}
