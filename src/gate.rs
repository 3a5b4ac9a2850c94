//! Deferred re-enable of the double-click shortcut.

use std::time::{Duration, Instant};
use uuid::Uuid;

/// Identity of one draw session.
pub type SessionId = Uuid;

/// Grace delay before the shortcut comes back after finish or cancel.
pub const REENABLE_DELAY: Duration = Duration::from_secs(1);

/// Cancellable deferred re-enable for the double-click shortcut.
///
/// Finishing a way is bound to double-click in the host, so the click that
/// ends a session must not immediately double-fire. The pending deadline is
/// tied to the session that scheduled it and is polled by the host event
/// loop; a new session starting first supersedes it.
#[derive(Debug, Clone)]
pub struct DoubleClickGate {
    enabled: bool,
    pending: Option<(SessionId, Instant)>,
}

impl DoubleClickGate {
    /// Create an enabled gate with nothing pending.
    pub fn new() -> Self {
        Self {
            enabled: true,
            pending: None,
        }
    }

    /// Whether the shortcut is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disable the shortcut for the duration of a session. Cancels any
    /// pending re-enable from an earlier session.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.pending = None;
    }

    /// Schedule the re-enable [`REENABLE_DELAY`] after `now`, on behalf of
    /// `session`.
    pub fn schedule_reenable(&mut self, session: SessionId, now: Instant) {
        self.pending = Some((session, now + REENABLE_DELAY));
    }

    /// Drop a pending re-enable scheduled by `session`, if still pending.
    pub fn cancel(&mut self, session: SessionId) {
        if matches!(self.pending, Some((owner, _)) if owner == session) {
            self.pending = None;
        }
    }

    /// Host event loop tick. Fires the re-enable once the deadline passes;
    /// returns true when the shortcut just came back.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some((_, at)) = self.pending {
            if now >= at {
                self.pending = None;
                self.enabled = true;
                return true;
            }
        }
        false
    }
}

impl Default for DoubleClickGate {
    fn default() -> Self {
        Self::new()
    }
}
