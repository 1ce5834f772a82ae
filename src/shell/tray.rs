use std::path::PathBuf;

use tauri::image::Image;
use tauri::menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem};
use tauri::path::BaseDirectory;
use tauri::tray::TrayIconBuilder;
use tauri::{AppHandle, Manager, Wry};

use super::HintState;

const TRAY_ID: &str = "tray";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrayAction {
    ShowHints,
    ToggleContinuous,
    Quit,
}

impl TrayAction {
    const SHOW_HINTS: &'static str = "show_hints";
    const CONTINUOUS: &'static str = "continuous";
    const QUIT: &'static str = "quit";

    fn from_id(id: &str) -> Option<Self> {
        match id {
            Self::SHOW_HINTS => Some(Self::ShowHints),
            Self::CONTINUOUS => Some(Self::ToggleContinuous),
            Self::QUIT => Some(Self::Quit),
            _ => None,
        }
    }
}

fn resolve_tray_icon_path(app_handle: &AppHandle) -> tauri::Result<PathBuf> {
    let candidates = [
        (BaseDirectory::Resource, "icons/tray.png"),
        (BaseDirectory::Resource, "icons/icon.png"),
    ];

    for (base, rel) in candidates {
        if let Ok(path) = app_handle.path().resolve(rel, base) {
            if path.is_file() {
                return Ok(path);
            }
        }
    }

    Err(tauri::Error::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "tray icon missing; tried Resource icon paths",
    )))
}

fn on_action(app_handle: &AppHandle, action: TrayAction) {
    match action {
        TrayAction::ShowHints => super::show_hints(app_handle),
        TrayAction::ToggleContinuous => {
            let Some(state) = app_handle.try_state::<HintState>() else {
                return;
            };
            let toggled = state.with_orchestrator(|o| {
                let continuous = !o.is_continuous();
                o.set_continuous(continuous);
                continuous
            });
            match toggled {
                Ok(continuous) => state.mode_changed(continuous),
                Err(err) => tracing::error!(%err, "could not toggle continuous mode"),
            }
        }
        TrayAction::Quit => app_handle.exit(0),
    }
}

/// Returns the continuous-mode item so the check mark can follow mode
/// changes made from the overlay.
pub fn create(app_handle: &AppHandle, continuous: bool) -> tauri::Result<CheckMenuItem<Wry>> {
    let show = MenuItem::with_id(
        app_handle,
        TrayAction::SHOW_HINTS,
        "Show Hints",
        true,
        None::<&str>,
    )?;
    let mode = CheckMenuItem::with_id(
        app_handle,
        TrayAction::CONTINUOUS,
        "Continuous Mode",
        true,
        continuous,
        None::<&str>,
    )?;
    let separator = PredefinedMenuItem::separator(app_handle)?;
    let quit = MenuItem::with_id(app_handle, TrayAction::QUIT, "Quit", true, None::<&str>)?;
    let menu = Menu::with_items(app_handle, &[&show, &mode, &separator, &quit])?;

    let icon = Image::from_path(resolve_tray_icon_path(app_handle)?)?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .icon_as_template(true)
        .tooltip("FlashClick")
        .menu(&menu)
        .on_menu_event(|app_handle: &AppHandle, event| {
            if let Some(action) = TrayAction::from_id(event.id.as_ref()) {
                on_action(app_handle, action);
            }
        })
        .build(app_handle)?;

    Ok(mode)
}
