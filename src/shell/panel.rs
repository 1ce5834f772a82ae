use tauri::{AppHandle, Emitter, LogicalPosition, LogicalSize, Position, Size, WebviewUrl};
use tauri_nspanel::{tauri_panel, ManagerExt, PanelBuilder, PanelLevel, StyleMask};

use crate::hints::{LabelPlacement, Rect};

const OVERLAY_LABEL: &str = "overlay";

pub const SHOW_EVENT: &str = "hints://show";
pub const NARROW_EVENT: &str = "hints://narrow";
pub const HIDE_EVENT: &str = "hints://hide";

tauri_panel! {
    panel!(HintOverlayPanel {
        config: {
            can_become_key_window: true,
            can_become_main_window: false,
            becomes_key_only_if_needed: false,
            is_floating_panel: true,
            hides_on_deactivate: false
        }
    })
}

fn overlay_geometry(frame: Rect) -> (Position, Size) {
    (
        Position::Logical(LogicalPosition::new(frame.x, frame.y)),
        Size::Logical(LogicalSize::new(frame.width, frame.height)),
    )
}

/// Build the transparent full-screen overlay. It takes key focus without
/// activating this application, so the target stays frontmost.
pub fn init(app_handle: &AppHandle) -> tauri::Result<()> {
    if app_handle.get_webview_panel(OVERLAY_LABEL).is_ok() {
        return Ok(());
    }

    let panel = PanelBuilder::<_, HintOverlayPanel>::new(app_handle, OVERLAY_LABEL)
        .url(WebviewUrl::App("index.html".into()))
        .level(PanelLevel::Status)
        .style_mask(StyleMask::empty().nonactivating_panel())
        .hides_on_deactivate(false)
        .no_activate(true)
        .transparent(true)
        .with_window(|window| window.decorations(false).transparent(true).resizable(false))
        .build()?;

    panel.hide();

    Ok(())
}

pub fn show(app_handle: &AppHandle, frame: Rect, labels: &[LabelPlacement]) -> Result<(), String> {
    let panel = app_handle
        .get_webview_panel(OVERLAY_LABEL)
        .map_err(|err| format!("overlay not found: {err:?}"))?;
    let window = panel
        .to_window()
        .ok_or_else(|| "overlay window missing".to_string())?;

    let (position, size) = overlay_geometry(frame);
    window.set_position(position).map_err(|err| err.to_string())?;
    window.set_size(size).map_err(|err| err.to_string())?;

    app_handle
        .emit(SHOW_EVENT, labels)
        .map_err(|err| err.to_string())?;
    panel.show_and_make_key();
    Ok(())
}

pub fn hide(app_handle: &AppHandle) {
    if let Ok(panel) = app_handle.get_webview_panel(OVERLAY_LABEL) {
        panel.hide();
    }
    if let Err(err) = app_handle.emit(HIDE_EVENT, ()) {
        tracing::warn!(%err, "failed to clear overlay");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_label_matches_the_capability_window() {
        let capability = include_str!("../../capabilities/default.json");
        assert_eq!(OVERLAY_LABEL, "overlay");
        assert!(capability.contains(&format!("\"{OVERLAY_LABEL}\"")));
    }

    #[test]
    fn overlay_covers_the_whole_frame() {
        let (position, size) = overlay_geometry(Rect::new(-1440.0, 0.0, 1440.0, 900.0));
        match (position, size) {
            (Position::Logical(p), Size::Logical(s)) => {
                assert_eq!((p.x, p.y), (-1440.0, 0.0));
                assert_eq!((s.width, s.height), (1440.0, 900.0));
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }
}
