//! Provisional-edit ledger for a draw session.
//!
//! A session's edits stay revocable until explicitly finalized: the
//! transaction counts the entries it has pushed and remembers the history
//! revision it started from, so the whole session can be collapsed into a
//! permanent edit or unwound without trusting stack positions that unrelated
//! actors may have shifted.

use crate::graph::Graph;
use crate::history::{History, Revision};

/// Edits pushed when a session bootstraps: the annotated checkpoint and the
/// provisional-node insertion. The external-undo recovery pops exactly this
/// many entries, so it must track the bootstrap sequence if that ever
/// changes.
pub const SESSION_BOOTSTRAP_EDITS: usize = 2;

/// Tracks the revocable edits a draw session has pushed onto the history.
#[derive(Debug, Clone)]
pub struct DrawTransaction {
    baseline: Revision,
    provisional: usize,
}

impl DrawTransaction {
    /// Open a transaction. `baseline` is the state a rollback returns to;
    /// `None` means the history's current state. Hosts that create the way
    /// itself as part of the same gesture pass the revision from before that
    /// edit, so cancelling leaves no residue.
    pub fn begin(history: &History, baseline: Option<Revision>) -> Self {
        Self {
            baseline: baseline.unwrap_or_else(|| history.revision()),
            provisional: 0,
        }
    }

    /// Number of not-yet-finalized entries owned by this transaction.
    pub fn provisional(&self) -> usize {
        self.provisional
    }

    /// The state a rollback returns to.
    pub fn baseline(&self) -> Revision {
        self.baseline
    }

    /// Push a revocable edit.
    pub fn perform(
        &mut self,
        history: &mut History,
        annotation: Option<&str>,
        edit: impl FnOnce(&mut Graph),
    ) {
        history.perform(annotation, edit);
        self.provisional += 1;
    }

    /// Unwind the provisional entries and apply `edit` as a single permanent
    /// annotated entry in their place.
    pub fn replace_provisional(
        &mut self,
        history: &mut History,
        annotation: &str,
        edit: impl FnOnce(&mut Graph),
    ) {
        history.pop(self.provisional);
        self.provisional = 0;
        history.perform(Some(annotation), edit);
    }

    /// Unwind only the provisional entries, leaving finalized work in place.
    pub fn discard_provisional(&mut self, history: &mut History) {
        history.pop(self.provisional);
        self.provisional = 0;
    }

    /// Unwind everything back to the baseline: first the provisional
    /// entries, then one entry at a time until the baseline revision is on
    /// top again. The entry-by-entry tail also unwinds edits other actors
    /// interleaved during the session.
    pub fn rollback_to_baseline(&mut self, history: &mut History) {
        history.pop(self.provisional);
        self.provisional = 0;
        while history.revision() > self.baseline && history.depth() > 0 {
            history.pop(1);
        }
        if history.revision() != self.baseline {
            log::warn!("rollback could not reach the session baseline");
        }
    }

    /// Recovery after an external undo landed on the session checkpoint:
    /// drop the bootstrap entries outright and forget any stale count.
    pub fn abort_after_undo(&mut self, history: &mut History) {
        history.pop(SESSION_BOOTSTRAP_EDITS);
        self.provisional = 0;
    }
}
