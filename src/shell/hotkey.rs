use tauri::plugin::TauriPlugin;
use tauri::Wry;
use tauri_plugin_global_shortcut::{Builder, ShortcutState};

use crate::settings::DEFAULT_HOTKEY;

/// Global shortcut plugin bound to `accelerator`, falling back to the
/// default chord when the configured one does not parse.
pub fn plugin(accelerator: &str) -> TauriPlugin<Wry> {
    let builder = Builder::new().with_shortcut(accelerator).or_else(|err| {
        tracing::warn!(accelerator, %err, "invalid hotkey, using default");
        Builder::new().with_shortcut(DEFAULT_HOTKEY)
    });

    let builder = match builder {
        Ok(builder) => builder,
        Err(err) => {
            tracing::error!(%err, "no hotkey registered");
            Builder::new()
        }
    };

    builder
        .with_handler(|app, _shortcut, event| {
            if event.state == ShortcutState::Pressed {
                super::show_hints(app);
            }
        })
        .build()
}
