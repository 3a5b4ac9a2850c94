//! Waydraw core: the interactive way-drawing engine of a geometric feature
//! editor.
//!
//! The crate is host-agnostic. A host owns the event loop, hit-testing, and
//! rendering; it feeds pointer and key events into a [`DrawSession`] as
//! [`DrawInput`] values and renders from the [`Graph`] and [`Feedback`]
//! state. Everything the session does goes through the undo-capable
//! [`History`] store, so a half-drawn way can always be unwound without
//! residue.
//!
//! Typical flow:
//!
//! ```
//! use kurbo::Point;
//! use std::time::Instant;
//! use waydraw_core::{
//!     DrawInput, DrawSession, EditContext, Graph, Mode, Node, SessionStatus, Way,
//! };
//!
//! let mut graph = Graph::new();
//! let a = Node::new(Point::new(0.0, 0.0));
//! let b = Node::new(Point::new(10.0, 0.0));
//! let way = Way::from_nodes(vec![a.id, b.id]);
//! let way_id = way.id;
//! graph.insert_node(a);
//! graph.insert_node(b);
//! graph.insert_way(way);
//!
//! let mut ctx = EditContext::new(graph);
//! let mut session = DrawSession::start(
//!     &mut ctx,
//!     way_id,
//!     None,
//!     Mode::Browse,
//!     Point::new(10.0, 0.0),
//!     None,
//! )
//! .unwrap();
//!
//! let now = Instant::now();
//! session.handle(
//!     &mut ctx,
//!     DrawInput::Move {
//!         pointer: Point::new(20.0, 5.0),
//!         target: None,
//!     },
//!     now,
//! );
//! session.handle(
//!     &mut ctx,
//!     DrawInput::Click {
//!         pointer: Point::new(20.0, 5.0),
//!         target: None,
//!     },
//!     now,
//! );
//! let status = session.handle(&mut ctx, DrawInput::Finish, now);
//! assert!(matches!(status, SessionStatus::Closed(Mode::Select { .. })));
//! assert_eq!(ctx.graph().way(way_id).unwrap().nodes.len(), 3);
//! ```

pub mod feedback;
pub mod gate;
pub mod geom;
pub mod graph;
pub mod history;
pub mod mode;
pub mod session;
pub mod snap;
pub mod transaction;
pub mod validity;

pub use feedback::Feedback;
pub use gate::{DoubleClickGate, SessionId, REENABLE_DELAY};
pub use geom::EdgeChoice;
pub use graph::{Graph, Node, NodeId, Way, WayId};
pub use history::{History, Revision};
pub use mode::Mode;
pub use session::{DrawError, DrawInput, DrawSession, EditContext, SessionStatus};
pub use snap::SnapTarget;
pub use transaction::{DrawTransaction, SESSION_BOOTSTRAP_EDITS};
pub use validity::is_invalid_geometry;
