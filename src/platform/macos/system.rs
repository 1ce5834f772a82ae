//! Workspace, display and synthetic input services.

use std::thread;
use std::time::Duration;

use core_graphics::display::CGDisplay;
use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use objc2_app_kit::{NSApplicationActivationOptions, NSRunningApplication, NSWorkspace};

use crate::error::HintError;
use crate::hints::{Pid, Point, Rect};

pub fn frontmost_pid() -> Option<Pid> {
    let workspace = NSWorkspace::sharedWorkspace();
    let frontmost = workspace.frontmostApplication()?;
    Some(frontmost.processIdentifier())
}

pub fn activate(pid: Pid) -> Result<(), HintError> {
    let app = NSRunningApplication::runningApplicationWithProcessIdentifier(pid)
        .ok_or(HintError::ActivateProcess(pid))?;
    #[allow(deprecated)]
    let activated = app.activateWithOptions(NSApplicationActivationOptions::ActivateIgnoringOtherApps);
    if activated {
        Ok(())
    } else {
        Err(HintError::ActivateProcess(pid))
    }
}

pub fn beep() {
    #[allow(unused_unsafe)]
    unsafe {
        objc2_app_kit::NSBeep()
    };
}

/// Main display bounds in global, top-left-origin coordinates.
pub fn main_display_frame() -> Rect {
    let bounds = CGDisplay::main().bounds();
    Rect::new(
        bounds.origin.x,
        bounds.origin.y,
        bounds.size.width,
        bounds.size.height,
    )
}

fn mouse_event(
    source: &CGEventSource,
    kind: CGEventType,
    at: CGPoint,
    name: &str,
) -> Result<CGEvent, HintError> {
    CGEvent::new_mouse_event(source.clone(), kind, at, CGMouseButton::Left)
        .map_err(|_| HintError::SyntheticClick(format!("could not create {name} event")))
}

/// Left button down, hold, up at `point`.
pub fn post_click(point: Point, hold: Duration) -> Result<(), HintError> {
    let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| HintError::SyntheticClick("event source unavailable".to_string()))?;
    let at = CGPoint::new(point.x, point.y);

    let down = mouse_event(&source, CGEventType::LeftMouseDown, at, "mouse down")?;
    let up = mouse_event(&source, CGEventType::LeftMouseUp, at, "mouse up")?;

    down.post(CGEventTapLocation::HID);
    thread::sleep(hold);
    up.post(CGEventTapLocation::HID);
    Ok(())
}
