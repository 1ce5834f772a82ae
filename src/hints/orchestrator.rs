//! Scan, display and activate loop.
//!
//! One `Orchestrator` exists per process. It is constructed explicitly by
//! the host and every entry point is expected on the UI thread; deferred
//! work comes back through `on_timer`.

use std::time::{Duration, Instant};

use super::accessor::{Accessibility, Pid};
use super::dedup::deduplicate;
use super::element::{sort_by_distance, ScanResult, UIElement};
use super::geometry::{Point, Rect};
use super::labels::{assign_labels, Alphabet};
use super::occlusion::filter_occluded;
use super::overlay::{placements, LabelPlacement};
use super::resolver::{InputResolver, KeyInput, Resolution};
use super::scanner::{ScanLimits, Scanner};
use super::timer::{TimerKind, TimerSlots, TimerToken};
use crate::error::HintError;

/// OS services the orchestrator drives.
pub trait Desktop {
    type Ax: Accessibility;

    fn accessibility(&self) -> &Self::Ax;

    fn is_trusted(&self) -> bool;

    fn frontmost_pid(&self) -> Option<Pid>;

    /// Frame of the screen the overlay covers.
    fn screen_frame(&self) -> Rect;

    fn activate_process(&self, pid: Pid) -> Result<(), HintError>;

    /// Mouse down and up at `point`.
    fn post_click(&self, point: Point) -> Result<(), HintError>;

    fn beep(&self);

    fn show_overlay(&self, labels: &[LabelPlacement]);

    /// Dim labels that do not start with `typed`.
    fn narrow_overlay(&self, typed: &str);

    fn hide_overlay(&self);

    /// Call `Orchestrator::on_timer(token)` after `delay`.
    fn schedule(&self, token: TimerToken, delay: Duration);
}

pub type NodeOf<D> = <<D as Desktop>::Ax as Accessibility>::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Scanning,
    Displaying,
    /// Overlay hidden, target activated, waiting for the continuous-mode re-scan.
    Activating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Pressed,
    Clicked,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Pending,
    DeadEnd,
    Dismissed,
    ModeChanged(bool),
    Activated(Activation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub rescan_delay: Duration,
    pub click_suppression: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            rescan_delay: Duration::from_millis(300),
            click_suppression: Duration::from_millis(500),
        }
    }
}

pub struct Orchestrator<D: Desktop> {
    desktop: D,
    alphabet: Alphabet,
    limits: ScanLimits,
    timing: Timing,
    own_pid: Pid,
    phase: Phase,
    result: ScanResult<NodeOf<D>>,
    target_pid: Option<Pid>,
    resolver: InputResolver,
    continuous: bool,
    ignore_clicks: bool,
    timers: TimerSlots,
}

impl<D: Desktop> Orchestrator<D> {
    pub fn new(desktop: D, alphabet: Alphabet, timing: Timing, own_pid: Pid) -> Self {
        Self {
            desktop,
            alphabet,
            limits: ScanLimits::default(),
            timing,
            own_pid,
            phase: Phase::Hidden,
            result: ScanResult::default(),
            target_pid: None,
            resolver: InputResolver::new(),
            continuous: false,
            ignore_clicks: false,
            timers: TimerSlots::new(),
        }
    }

    pub fn with_limits(mut self, limits: ScanLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut D {
        &mut self.desktop
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> &ScanResult<NodeOf<D>> {
        &self.result
    }

    pub fn typed(&self) -> &str {
        self.resolver.buffer()
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
        if !continuous && self.timers.cancel(TimerKind::Rescan).is_some() {
            self.finish();
        }
    }

    pub fn is_ignoring_clicks(&self) -> bool {
        self.ignore_clicks
    }

    /// Hotkey entry point: scan the frontmost application and show hints.
    /// Returns the number of labelled elements.
    pub fn on_activate(&mut self) -> Result<usize, HintError> {
        self.timers.cancel(TimerKind::Rescan);
        self.resolver.reset();
        if self.phase == Phase::Displaying {
            self.desktop.hide_overlay();
        }
        self.phase = Phase::Scanning;

        match self.scan() {
            Ok(result) if !result.is_empty() => {
                let count = result.len();
                self.result = result;
                let labels = placements(&self.result, self.desktop.screen_frame());
                self.desktop.show_overlay(&labels);
                self.phase = Phase::Displaying;
                Ok(count)
            }
            Ok(_) => {
                tracing::info!("no clickable elements found");
                self.finish();
                self.desktop.beep();
                Err(HintError::NoCandidates)
            }
            Err(err) => {
                tracing::warn!(%err, "scan failed");
                self.finish();
                self.desktop.beep();
                Err(err)
            }
        }
    }

    fn resolve_target(&self) -> Result<Pid, HintError> {
        match self.desktop.frontmost_pid() {
            // The overlay itself is frontmost when the hotkey repeats while it is shown.
            Some(pid) if pid == self.own_pid => self.target_pid.ok_or(HintError::NoFrontmostApp),
            Some(pid) => Ok(pid),
            None => Err(HintError::NoFrontmostApp),
        }
    }

    fn scan(&mut self) -> Result<ScanResult<NodeOf<D>>, HintError> {
        if !self.desktop.is_trusted() {
            return Err(HintError::NotTrusted);
        }
        let pid = self.resolve_target()?;
        self.target_pid = Some(pid);

        let started = Instant::now();
        let ax = self.desktop.accessibility();
        let windows = ax
            .application(pid)
            .map(|app| ax.windows(&app))
            .unwrap_or_default();
        if windows.is_empty() {
            return Err(HintError::NoWindows(pid));
        }

        let mut scanner = Scanner::with_limits(ax, self.limits);
        let windows = scanner.describe_windows(windows);
        let candidates = scanner.scan(&windows);
        let stats = scanner.stats();
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            windows = stats.windows,
            visited = stats.visited,
            max_depth = stats.max_depth,
            truncated = stats.truncated_nodes,
            candidates = stats.candidates,
            "traversal finished"
        );

        let phase = Instant::now();
        let deduplicated = deduplicate(candidates);
        tracing::info!(
            elapsed_ms = phase.elapsed().as_millis() as u64,
            remaining = deduplicated.len(),
            "deduplication finished"
        );

        let phase = Instant::now();
        let mut visible = filter_occluded(ax, deduplicated, pid, Some(self.own_pid));
        tracing::info!(
            elapsed_ms = phase.elapsed().as_millis() as u64,
            remaining = visible.len(),
            "occlusion check finished"
        );

        sort_by_distance(&mut visible, self.desktop.screen_frame().center());
        assign_labels(&self.alphabet, &mut visible);
        tracing::info!(
            total_ms = started.elapsed().as_millis() as u64,
            labelled = visible.len(),
            pid,
            "scan finished"
        );

        Ok(ScanResult::new(visible))
    }

    /// Overlay key entry point.
    pub fn handle_key(&mut self, input: KeyInput) -> KeyOutcome {
        if self.phase != Phase::Displaying {
            return KeyOutcome::Ignored;
        }

        match self.resolver.handle(input, self.result.labels()) {
            Resolution::Cancel => {
                self.dismiss();
                KeyOutcome::Dismissed
            }
            Resolution::ToggleMode => {
                self.continuous = !self.continuous;
                tracing::info!(continuous = self.continuous, "mode toggled");
                KeyOutcome::ModeChanged(self.continuous)
            }
            Resolution::Pending => {
                self.desktop.narrow_overlay(self.resolver.buffer());
                KeyOutcome::Pending
            }
            Resolution::DeadEnd => {
                self.desktop.beep();
                self.desktop.narrow_overlay("");
                KeyOutcome::DeadEnd
            }
            Resolution::Activate(index) => KeyOutcome::Activated(self.activate(index)),
        }
    }

    fn activate(&mut self, index: usize) -> Activation {
        let Some(element) = self.result.get(index).cloned() else {
            self.dismiss();
            return Activation::Failed;
        };

        self.phase = Phase::Activating;
        self.desktop.hide_overlay();

        let outcome = match self.desktop.accessibility().press(&element.node) {
            Ok(()) => Activation::Pressed,
            Err(err) => {
                tracing::debug!(%err, role = %element.role, "press unavailable, clicking instead");
                self.synthetic_click(&element)
            }
        };
        tracing::info!(label = %element.label, role = %element.role, ?outcome, "activated");

        if outcome != Activation::Failed && self.continuous {
            self.result = ScanResult::default();
            let token = self.timers.arm(TimerKind::Rescan);
            self.desktop.schedule(token, self.timing.rescan_delay);
        } else {
            self.finish();
        }
        outcome
    }

    fn synthetic_click(&mut self, element: &UIElement<NodeOf<D>>) -> Activation {
        let pid = self
            .desktop
            .accessibility()
            .owner_pid(&element.node)
            .or(self.target_pid);

        self.ignore_clicks = true;
        let token = self.timers.arm(TimerKind::ReleaseClickSuppression);
        self.desktop.schedule(token, self.timing.click_suppression);

        if let Some(pid) = pid {
            if let Err(err) = self.desktop.activate_process(pid) {
                tracing::warn!(%err, "could not bring target to front");
            }
        }

        match self.desktop.post_click(element.center()) {
            Ok(()) => Activation::Clicked,
            Err(err) => {
                tracing::warn!(%err, "synthetic click failed");
                Activation::Failed
            }
        }
    }

    /// Deferred-work entry point. Cancelled or superseded tokens do nothing.
    pub fn on_timer(&mut self, token: TimerToken) {
        if !self.timers.fire(token) {
            tracing::trace!(?token, "ignoring stale timer");
            return;
        }
        match token.kind {
            TimerKind::Rescan => {
                if self.phase == Phase::Activating {
                    // Failures are already logged and signalled inside.
                    let _ = self.on_activate();
                }
            }
            TimerKind::ReleaseClickSuppression => self.ignore_clicks = false,
        }
    }

    /// Close the overlay from any state and cancel a pending re-scan.
    pub fn dismiss(&mut self) {
        self.timers.cancel(TimerKind::Rescan);
        if self.phase != Phase::Hidden {
            self.desktop.hide_overlay();
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.resolver.reset();
        self.result = ScanResult::default();
        self.phase = Phase::Hidden;
    }

    /// A real pointer click anywhere. Returns whether the overlay was dismissed.
    pub fn on_external_click(&mut self) -> bool {
        if self.ignore_clicks {
            tracing::debug!("ignoring self-generated click");
            return false;
        }
        if self.phase == Phase::Hidden {
            return false;
        }
        self.dismiss();
        true
    }

    /// Another application became frontmost. Returns whether the overlay was dismissed.
    pub fn on_app_activated(&mut self, pid: Pid) -> bool {
        if pid == self.own_pid || self.phase == Phase::Hidden {
            return false;
        }
        // Activating the target before a synthetic click lands here too.
        if self.phase == Phase::Activating && Some(pid) == self.target_pid {
            return false;
        }
        tracing::debug!(pid, "frontmost application changed");
        self.dismiss();
        true
    }
}
