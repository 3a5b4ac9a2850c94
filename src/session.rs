//! The draw-session state machine.
//!
//! One [`DrawSession`] manages the whole interactive gesture of extending a
//! way: the bootstrap edits, pointer tracking with snap and validity
//! feedback, point commits, and the various exits. Every transition except
//! pointer movement is edge-triggered by a single host event and runs to
//! completion before the next event is processed; no two commits can
//! interleave.

use std::time::Instant;

use kurbo::Point;
use thiserror::Error;
use uuid::Uuid;

use crate::feedback::Feedback;
use crate::gate::{DoubleClickGate, SessionId};
use crate::graph::{Graph, Node, NodeId, Way, WayId};
use crate::history::{History, Revision};
use crate::mode::Mode;
use crate::snap::{self, SnapTarget};
use crate::transaction::DrawTransaction;
use crate::validity::is_invalid_geometry;

/// Host programming errors when starting a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    /// The way to draw on does not exist in the current graph.
    #[error("way {0} does not exist")]
    UnknownWay(WayId),
}

/// Mutable collaborators a draw session works against.
#[derive(Debug)]
pub struct EditContext {
    /// The undo-capable entity store.
    pub history: History,
    /// Blocking flag and active-element marker for the rendering layer.
    pub feedback: Feedback,
    /// Double-click shortcut gate.
    pub dblclick: DoubleClickGate,
}

impl EditContext {
    /// Create a context whose store starts at `graph`.
    pub fn new(graph: Graph) -> Self {
        Self {
            history: History::new(graph),
            feedback: Feedback::new(),
            dblclick: DoubleClickGate::new(),
        }
    }

    /// The current graph state.
    pub fn graph(&self) -> &Graph {
        self.history.graph()
    }
}

/// One host-dispatched input event during drawing.
#[derive(Debug, Clone)]
pub enum DrawInput {
    /// Pointer moved; `target` is the hit-tested snap candidate, if any.
    Move {
        pointer: Point,
        target: Option<SnapTarget>,
    },
    /// Primary click on empty space: accept the provisional point.
    Click {
        pointer: Point,
        target: Option<SnapTarget>,
    },
    /// Primary click on an existing node: connect to it.
    ClickNode(NodeId),
    /// Primary click on an existing edge: connect into it.
    ClickWay { loc: Point, edge: (NodeId, NodeId) },
    /// User-requested undo.
    Undo,
    /// Finish request (Enter or double-click in the host).
    Finish,
    /// Cancel request (Esc in the host).
    Cancel,
}

/// What a transition did with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Still drawing.
    Active,
    /// Session closed; the editor should enter the given mode.
    Closed(Mode),
}

fn annotation_for(way: &Way) -> String {
    if way.is_degenerate() {
        "Started a way.".to_owned()
    } else {
        "Continued a way.".to_owned()
    }
}

/// The active drawing context for one way.
///
/// The session owns exactly one provisional node at a time; it is moved in
/// place on every pointer event and either finalized or unwound before the
/// session closes.
#[derive(Debug)]
pub struct DrawSession {
    id: SessionId,
    way_id: WayId,
    index: Option<usize>,
    end: Node,
    annotation: String,
    checkpoint: Revision,
    tx: DrawTransaction,
    return_mode: Mode,
}

impl DrawSession {
    /// Begin drawing on `way_id`, inserting at `index` (append when
    /// `None`). Pushes the annotated undo checkpoint and the provisional
    /// node.
    ///
    /// `baseline` is the state cancellation returns to; hosts that created
    /// the way itself as part of the same gesture pass the revision from
    /// before that edit. `None` means the current state.
    pub fn start(
        ctx: &mut EditContext,
        way_id: WayId,
        index: Option<usize>,
        return_mode: Mode,
        pointer: Point,
        baseline: Option<Revision>,
    ) -> Result<Self, DrawError> {
        let way = ctx
            .history
            .graph()
            .way(way_id)
            .ok_or(DrawError::UnknownWay(way_id))?;
        let annotation = annotation_for(way);
        let end = Node::new(pointer);

        let mut tx = DrawTransaction::begin(&ctx.history, baseline);

        // Annotated checkpoint for undo to land on; removed before the
        // session closes.
        tx.perform(&mut ctx.history, Some(&annotation), |_| {});
        let checkpoint = ctx.history.revision();

        let draw = end.clone();
        tx.perform(&mut ctx.history, None, move |graph| {
            let id = draw.id;
            graph.insert_node(draw);
            if let Some(way) = graph.way_mut(way_id) {
                way.add_node(id, index);
            }
        });

        ctx.dblclick.disable();
        ctx.feedback.set_active(end.id);
        log::debug!("draw session started on way {way_id}");

        Ok(Self {
            id: Uuid::new_v4(),
            way_id,
            index,
            end,
            annotation,
            checkpoint,
            tx,
            return_mode,
        })
    }

    /// Session identity (owns any pending double-click re-enable).
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The way being extended.
    pub fn way_id(&self) -> WayId {
        self.way_id
    }

    /// The provisional node tracking the pointer.
    pub fn active_node(&self) -> NodeId {
        self.end.id
    }

    /// Number of not-yet-finalized edits owned by this session.
    pub fn provisional_edits(&self) -> usize {
        self.tx.provisional()
    }

    /// The store state cancellation returns to.
    pub fn baseline(&self) -> Revision {
        self.tx.baseline()
    }

    /// The undo annotation for this session's edits.
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    /// Route one host event through the state machine. `now` feeds the
    /// double-click gate on the exits that schedule its re-enable.
    pub fn handle(&mut self, ctx: &mut EditContext, input: DrawInput, now: Instant) -> SessionStatus {
        match input {
            DrawInput::Move { pointer, target } => {
                self.pointer_move(ctx, pointer, target.as_ref());
                SessionStatus::Active
            }
            DrawInput::Click { .. } => self.add_point(ctx),
            DrawInput::ClickNode(node) => self.add_existing_node(ctx, node),
            DrawInput::ClickWay { loc, edge } => self.add_way_point(ctx, loc, edge),
            DrawInput::Undo => self.undo(ctx),
            DrawInput::Finish => self.finish(ctx, now),
            DrawInput::Cancel => self.cancel(ctx, now),
        }
    }

    /// Track the pointer: snap, move the provisional node in place, and
    /// re-run the validity gate with the closing segment excluded.
    pub fn pointer_move(&mut self, ctx: &mut EditContext, pointer: Point, target: Option<&SnapTarget>) {
        let loc = snap::resolve(pointer, target, ctx.history.graph(), self.end.id);
        let id = self.end.id;
        ctx.history.replace(move |graph| {
            if let Some(node) = graph.node_mut(id) {
                node.loc = loc;
            }
        });
        self.end.loc = loc;
        self.check_geometry(ctx, true);
    }

    /// Run the validator and surface the result on the blocking flag.
    fn check_geometry(&self, ctx: &mut EditContext, skip_last: bool) -> bool {
        let blocked = is_invalid_geometry(self.end.id, ctx.history.graph(), skip_last);
        ctx.feedback.set_blocked(blocked);
        blocked
    }

    /// Accept the provisional node's position and keep drawing. A no-op
    /// while the blocking flag is set.
    pub fn add_point(&mut self, ctx: &mut EditContext) -> SessionStatus {
        if ctx.feedback.blocked() {
            log::debug!("commit ignored while geometry is blocked");
            return SessionStatus::Active;
        }

        let node = self.end.clone();
        let (way_id, index) = (self.way_id, self.index);
        let annotation = self.annotation.clone();
        self.tx
            .replace_provisional(&mut ctx.history, &annotation, move |graph| {
                let id = node.id;
                graph.insert_node(node);
                if let Some(way) = graph.way_mut(way_id) {
                    way.add_node(id, index);
                }
            });

        let loc = self.end.loc;
        self.check_geometry(ctx, false);
        self.continue_from(ctx, loc);
        SessionStatus::Active
    }

    /// Accept the provisional node at `loc` and splice it into `edge`,
    /// connecting this way to the edge's owners. A no-op while blocked.
    pub fn add_way_point(
        &mut self,
        ctx: &mut EditContext,
        loc: Point,
        edge: (NodeId, NodeId),
    ) -> SessionStatus {
        if ctx.feedback.blocked() {
            log::debug!("commit ignored while geometry is blocked");
            return SessionStatus::Active;
        }

        let mut node = self.end.clone();
        node.loc = loc;
        let (way_id, index) = (self.way_id, self.index);
        let annotation = self.annotation.clone();
        self.tx
            .replace_provisional(&mut ctx.history, &annotation, move |graph| {
                let id = node.id;
                graph.insert_node(node);
                if let Some(way) = graph.way_mut(way_id) {
                    way.add_node(id, index);
                }
                graph.splice_into_edge(id, edge);
            });

        self.end.loc = loc;
        self.check_geometry(ctx, false);
        self.continue_from(ctx, loc);
        SessionStatus::Active
    }

    /// Connect to an existing node instead of minting a new one; the
    /// provisional node is dropped with the bootstrap edits. A no-op while
    /// blocked, or when the node turns out not to exist (a stale hit-test
    /// result, not an error).
    pub fn add_existing_node(&mut self, ctx: &mut EditContext, node_id: NodeId) -> SessionStatus {
        if ctx.feedback.blocked() {
            log::debug!("commit ignored while geometry is blocked");
            return SessionStatus::Active;
        }
        let Some(node) = ctx.history.graph().node(node_id) else {
            log::warn!("clicked node {node_id} does not exist, ignoring");
            return SessionStatus::Active;
        };
        let loc = node.loc;

        let (way_id, index) = (self.way_id, self.index);
        let annotation = self.annotation.clone();
        self.tx
            .replace_provisional(&mut ctx.history, &annotation, move |graph| {
                if let Some(way) = graph.way_mut(way_id) {
                    way.add_node(node_id, index);
                }
            });

        let blocked = is_invalid_geometry(node_id, ctx.history.graph(), false);
        ctx.feedback.set_blocked(blocked);
        self.continue_from(ctx, loc);
        SessionStatus::Active
    }

    /// Bootstrap a fresh provisional node at `loc` for the next segment.
    fn continue_from(&mut self, ctx: &mut EditContext, loc: Point) {
        self.index = self.index.map(|i| i + 1);
        if let Some(way) = ctx.history.graph().way(self.way_id) {
            self.annotation = annotation_for(way);
        }

        let annotation = self.annotation.clone();
        self.tx.perform(&mut ctx.history, Some(&annotation), |_| {});
        self.checkpoint = ctx.history.revision();

        let end = Node::new(loc);
        let draw = end.clone();
        let (way_id, index) = (self.way_id, self.index);
        self.tx.perform(&mut ctx.history, None, move |graph| {
            let id = draw.id;
            graph.insert_node(draw);
            if let Some(way) = graph.way_mut(way_id) {
                way.add_node(id, index);
            }
        });

        ctx.feedback.set_active(end.id);
        self.end = end;
    }

    /// Accept the way as drawn. Blocked geometry keeps the session active;
    /// a way with too few points is discarded as if cancelled. On success
    /// the editor exits to a selection over the new way.
    pub fn finish(&mut self, ctx: &mut EditContext, now: Instant) -> SessionStatus {
        if self.check_geometry(ctx, false) {
            return SessionStatus::Active;
        }

        self.tx.discard_provisional(&mut ctx.history);

        match ctx.history.graph().way(self.way_id) {
            Some(way) if !way.is_degenerate() => {
                ctx.dblclick.schedule_reenable(self.id, now);
                ctx.feedback.clear_active();
                log::debug!("draw session finished on way {}", self.way_id);
                SessionStatus::Closed(Mode::Select {
                    way: self.way_id,
                    new_feature: true,
                })
            }
            _ => {
                log::debug!("way too small to keep, cancelling instead");
                self.cancel(ctx, now)
            }
        }
    }

    /// Discard everything the session drew and return to browsing.
    pub fn cancel(&mut self, ctx: &mut EditContext, now: Instant) -> SessionStatus {
        self.tx.rollback_to_baseline(&mut ctx.history);
        ctx.dblclick.schedule_reenable(self.id, now);

        // Unwinding the store does not touch the feedback surface; clear it
        // explicitly.
        ctx.feedback.set_blocked(false);
        ctx.feedback.clear_active();

        log::debug!("draw session cancelled on way {}", self.way_id);
        SessionStatus::Closed(Mode::Browse)
    }

    /// External interruption: a mode switch not initiated by this session
    /// (geolocate jump, hash change, tool swap). Leaves the store at the
    /// baseline. The double-click gate belongs to the interrupting flow and
    /// is left alone.
    pub fn interrupted(&mut self, ctx: &mut EditContext) {
        if self.tx.provisional() > 0 {
            self.tx.rollback_to_baseline(&mut ctx.history);
        }
        ctx.feedback.clear_active();
        log::debug!("draw session interrupted on way {}", self.way_id);
    }

    /// Route a user undo through the store. When it lands on the session
    /// checkpoint the session is over and control goes back to the prior
    /// mode.
    pub fn undo(&mut self, ctx: &mut EditContext) -> SessionStatus {
        ctx.history.undo();
        if ctx.history.revision() <= self.checkpoint {
            self.history_undone(ctx)
        } else {
            SessionStatus::Active
        }
    }

    /// Recovery after the store's undo reached the session checkpoint from
    /// outside: drop the checkpoint and the entry before it, then resume
    /// the prior editing mode when the way survived, or browsing when it
    /// did not.
    pub fn history_undone(&mut self, ctx: &mut EditContext) -> SessionStatus {
        log::debug!("undo reached the draw checkpoint, closing session");
        self.tx.abort_after_undo(&mut ctx.history);
        ctx.feedback.set_blocked(false);
        ctx.feedback.clear_active();

        if ctx.history.graph().has_way(self.way_id) {
            SessionStatus::Closed(self.return_mode.clone())
        } else {
            SessionStatus::Closed(Mode::Browse)
        }
    }
}
