use std::thread;
use std::time::Duration;

use tauri::{AppHandle, Emitter};

use super::panel;
use crate::error::HintError;
use crate::hints::{Desktop, LabelPlacement, Pid, Point, Rect, TimerToken};
use crate::platform::macos::{ax, system, MacAx};

/// `Desktop` backed by AppKit, CoreGraphics and the overlay panel.
pub struct MacDesktop {
    app: AppHandle,
    ax: MacAx,
    click_hold: Duration,
}

impl MacDesktop {
    pub fn new(app: AppHandle, click_hold: Duration) -> Self {
        Self {
            app,
            ax: MacAx::new(),
            click_hold,
        }
    }
}

impl Desktop for MacDesktop {
    type Ax = MacAx;

    fn accessibility(&self) -> &MacAx {
        &self.ax
    }

    fn is_trusted(&self) -> bool {
        ax::is_process_trusted()
    }

    fn frontmost_pid(&self) -> Option<Pid> {
        system::frontmost_pid()
    }

    fn screen_frame(&self) -> Rect {
        system::main_display_frame()
    }

    fn activate_process(&self, pid: Pid) -> Result<(), HintError> {
        system::activate(pid)
    }

    fn post_click(&self, point: Point) -> Result<(), HintError> {
        system::post_click(point, self.click_hold)
    }

    fn beep(&self) {
        system::beep();
    }

    fn show_overlay(&self, labels: &[LabelPlacement]) {
        if let Err(err) = panel::show(&self.app, self.screen_frame(), labels) {
            tracing::error!(%err, "failed to show overlay");
        }
    }

    fn narrow_overlay(&self, typed: &str) {
        if let Err(err) = self.app.emit(panel::NARROW_EVENT, typed) {
            tracing::warn!(%err, "failed to update overlay");
        }
    }

    fn hide_overlay(&self) {
        panel::hide(&self.app);
    }

    fn schedule(&self, token: TimerToken, delay: Duration) {
        let app = self.app.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let handle = app.clone();
            if let Err(err) = app.run_on_main_thread(move || super::fire_timer(&handle, token)) {
                tracing::warn!(%err, ?token, "could not deliver timer");
            }
        });
    }
}
