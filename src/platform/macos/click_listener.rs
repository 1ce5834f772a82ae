//! Global left/right mouse-down monitor on a listen-only CGEventTap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use core_foundation::runloop::{kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop};
use core_graphics::event::{
    CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventType,
};

use crate::hints::Point;

/// Runs `on_click` on a background thread for every pointer press anywhere
/// on screen. Events are observed, never modified.
pub struct ClickListener {
    running: Arc<AtomicBool>,
    run_loop: Arc<Mutex<Option<CFRunLoop>>>,
    _handle: JoinHandle<()>,
}

impl ClickListener {
    /// Fails when the tap cannot be created, usually because accessibility
    /// access has not been granted yet.
    pub fn start<F>(on_click: F) -> Result<Self, String>
    where
        F: Fn(Point) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);
        let (setup_tx, setup_rx) = mpsc::channel::<Result<(), String>>();
        let run_loop_holder: Arc<Mutex<Option<CFRunLoop>>> = Arc::new(Mutex::new(None));
        let run_loop_clone = Arc::clone(&run_loop_holder);

        let handle = thread::spawn(move || {
            Self::run_event_loop(running_clone, on_click, setup_tx, run_loop_clone);
        });

        match setup_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Ok(())) => Ok(Self {
                running,
                run_loop: run_loop_holder,
                _handle: handle,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err("Timeout waiting for event tap setup".to_string()),
        }
    }

    fn run_event_loop<F>(
        running: Arc<AtomicBool>,
        on_click: F,
        setup_tx: Sender<Result<(), String>>,
        run_loop_holder: Arc<Mutex<Option<CFRunLoop>>>,
    ) where
        F: Fn(Point) + Send + 'static,
    {
        let events_of_interest = vec![CGEventType::LeftMouseDown, CGEventType::RightMouseDown];

        let tap_result = CGEventTap::new(
            CGEventTapLocation::HID,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            events_of_interest,
            move |_proxy, event_type, event| {
                if matches!(
                    event_type,
                    CGEventType::LeftMouseDown | CGEventType::RightMouseDown
                ) {
                    let location = event.location();
                    on_click(Point::new(location.x, location.y));
                }
                // Passive tap: the event continues unchanged.
                None
            },
        );

        let tap = match tap_result {
            Ok(tap) => tap,
            Err(()) => {
                let _ = setup_tx.send(Err(
                    "Failed to create event tap. Check accessibility permissions.".to_string(),
                ));
                return;
            }
        };

        let loop_source = match tap.mach_port.create_runloop_source(0) {
            Ok(source) => source,
            Err(()) => {
                let _ = setup_tx.send(Err("Failed to create run loop source".to_string()));
                return;
            }
        };

        let current_run_loop = CFRunLoop::get_current();
        if let Ok(mut holder) = run_loop_holder.lock() {
            *holder = Some(current_run_loop.clone());
        }

        unsafe {
            current_run_loop.add_source(&loop_source, kCFRunLoopCommonModes);
        }
        tap.enable();
        let _ = setup_tx.send(Ok(()));

        // kCFRunLoopCommonModes is only valid for adding sources, not for running.
        while running.load(Ordering::SeqCst) {
            let result = unsafe {
                CFRunLoop::run_in_mode(kCFRunLoopDefaultMode, Duration::from_millis(100), true)
            };
            if result == core_foundation::runloop::CFRunLoopRunResult::Stopped {
                break;
            }
        }

        unsafe {
            current_run_loop.remove_source(&loop_source, kCFRunLoopCommonModes);
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Ok(holder) = self.run_loop.lock() {
            if let Some(ref run_loop) = *holder {
                run_loop.stop();
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for ClickListener {
    fn drop(&mut self) {
        self.stop();
    }
}
