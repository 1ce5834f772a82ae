//! Cancelable deferred work owned by the orchestrator.
//!
//! The host fires a token after its delay; the orchestrator only acts on it
//! if the token still occupies its slot. Cancelling empties the slot, so a
//! timer that fires after cancellation (or a second time) is a no-op.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Re-scan after an activation in continuous mode.
    Rescan,
    /// Stop ignoring pointer clicks after a synthetic click.
    ReleaseClickSuppression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub id: u64,
    pub kind: TimerKind,
}

#[derive(Debug, Default)]
pub struct TimerSlots {
    next_id: u64,
    rescan: Option<TimerToken>,
    release_clicks: Option<TimerToken>,
}

impl TimerSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<TimerToken> {
        match kind {
            TimerKind::Rescan => &mut self.rescan,
            TimerKind::ReleaseClickSuppression => &mut self.release_clicks,
        }
    }

    /// Allocate a token for `kind`, replacing (and so cancelling) any pending one.
    pub fn arm(&mut self, kind: TimerKind) -> TimerToken {
        self.next_id += 1;
        let token = TimerToken {
            id: self.next_id,
            kind,
        };
        *self.slot(kind) = Some(token);
        token
    }

    pub fn cancel(&mut self, kind: TimerKind) -> Option<TimerToken> {
        self.slot(kind).take()
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Rescan => self.rescan.is_some(),
            TimerKind::ReleaseClickSuppression => self.release_clicks.is_some(),
        }
    }

    /// Claim a fired token. Returns false for cancelled, superseded or
    /// already-fired tokens.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        let slot = self.slot(token.kind);
        if *slot == Some(token) {
            *slot = None;
            true
        } else {
            false
        }
    }
}
