//! Visual feedback surface the host renders from.

use crate::graph::NodeId;

/// Blocking flag plus the active-element marker. The draw session writes
/// these; the rendering layer only reads them.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    blocked: bool,
    active: Option<NodeId>,
}

impl Feedback {
    /// Create a clear feedback surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether commit and finish actions are currently blocked.
    pub fn blocked(&self) -> bool {
        self.blocked
    }

    /// Set or clear the blocking flag.
    pub fn set_blocked(&mut self, blocked: bool) {
        if blocked != self.blocked {
            log::debug!("blocking indicator {}", if blocked { "set" } else { "cleared" });
        }
        self.blocked = blocked;
    }

    /// The element currently marked active, if any.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Mark `node` as the active element.
    pub fn set_active(&mut self, node: NodeId) {
        self.active = Some(node);
    }

    /// Unmark the active element.
    pub fn clear_active(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_flags() {
        let mut feedback = Feedback::new();
        assert!(!feedback.blocked());
        assert_eq!(feedback.active(), None);

        feedback.set_blocked(true);
        assert!(feedback.blocked());

        let id = NodeId::new();
        feedback.set_active(id);
        assert_eq!(feedback.active(), Some(id));

        feedback.clear_active();
        feedback.set_blocked(false);
        assert!(!feedback.blocked());
        assert_eq!(feedback.active(), None);
    }
}
