//! Editor modes as a tagged variant.
//!
//! The session hands one of these back when it closes; the host's mode
//! controller owns the actual switch. No polymorphic mode objects, no shared
//! lifecycle hooks.

use crate::graph::WayId;
use serde::{Deserialize, Serialize};

/// Where the editor goes when a draw session hands control back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Neutral browsing, nothing selected.
    Browse,
    /// A way is selected; `new_feature` marks it as just created.
    Select { way: WayId, new_feature: bool },
    /// Drawing on a way, inserting at `index` (append when `None`).
    Draw { way: WayId, index: Option<usize> },
}

impl Mode {
    /// Whether this mode continues a draw gesture.
    pub fn is_draw(&self) -> bool {
        matches!(self, Mode::Draw { .. })
    }

    /// The way this mode operates on, if any.
    pub fn way(&self) -> Option<WayId> {
        match self {
            Mode::Browse => None,
            Mode::Select { way, .. } | Mode::Draw { way, .. } => Some(*way),
        }
    }
}
