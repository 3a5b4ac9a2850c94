//! Undo-capable store over the entity graph.
//!
//! A snapshot stack: every performed edit pushes a full copy of the graph,
//! undo pops back to the previous annotated entry. Each entry carries a
//! monotonic [`Revision`] so callers can recognize an earlier state (a
//! session baseline) after an arbitrary number of edits came and went.

use crate::graph::Graph;
use serde::{Deserialize, Serialize};

/// Identity of one stored state. Monotonic and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Revision(u64);

#[derive(Debug, Clone)]
struct HistoryEntry {
    graph: Graph,
    annotation: Option<String>,
    revision: Revision,
}

/// Snapshot-stack edit history.
///
/// The base entry (the state the history was created with) is immutable and
/// can never be popped.
#[derive(Debug, Clone)]
pub struct History {
    stack: Vec<HistoryEntry>,
    next: u64,
}

impl History {
    /// Create a history whose base state is `graph`.
    pub fn new(graph: Graph) -> Self {
        Self {
            stack: vec![HistoryEntry {
                graph,
                annotation: None,
                revision: Revision(0),
            }],
            next: 1,
        }
    }

    /// The current graph state.
    pub fn graph(&self) -> &Graph {
        &self.stack.last().expect("history base entry").graph
    }

    /// Identity of the current state.
    pub fn revision(&self) -> Revision {
        self.stack.last().expect("history base entry").revision
    }

    /// Number of edits above the base state.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Annotation of the current state, if any.
    pub fn annotation(&self) -> Option<&str> {
        self.stack
            .last()
            .and_then(|entry| entry.annotation.as_deref())
    }

    /// Whether an undo would change anything.
    pub fn can_undo(&self) -> bool {
        self.stack.len() > 1
    }

    fn next_revision(&mut self) -> Revision {
        let revision = Revision(self.next);
        self.next += 1;
        revision
    }

    /// Apply `edit` to a copy of the current graph and push the result as a
    /// new entry. Annotated entries are the states undo stops on.
    pub fn perform(&mut self, annotation: Option<&str>, edit: impl FnOnce(&mut Graph)) {
        let mut graph = self.graph().clone();
        edit(&mut graph);
        let revision = self.next_revision();
        self.stack.push(HistoryEntry {
            graph,
            annotation: annotation.map(str::to_owned),
            revision,
        });
    }

    /// Apply `edit` on top of the current state, replacing the top entry
    /// instead of pushing a new one. Dragging the provisional node uses this
    /// so pointer movement does not grow the stack. With no edits above the
    /// base the edit is pushed instead; the base state stays immutable.
    pub fn replace(&mut self, edit: impl FnOnce(&mut Graph)) {
        if self.stack.len() == 1 {
            self.perform(None, edit);
            return;
        }
        let mut graph = self.graph().clone();
        edit(&mut graph);
        let revision = self.next_revision();
        let top = self.stack.last_mut().expect("history base entry");
        top.graph = graph;
        top.revision = revision;
    }

    /// Pop up to `n` entries; the base entry always remains.
    pub fn pop(&mut self, n: usize) {
        for _ in 0..n {
            if self.stack.len() <= 1 {
                log::warn!("history pop reached the base state");
                break;
            }
            self.stack.pop();
        }
    }

    /// One user-level undo: pop back to the previous annotated entry (or the
    /// base state). Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        loop {
            self.stack.pop();
            let top = self.stack.last().expect("history base entry");
            if top.annotation.is_some() || self.stack.len() == 1 {
                break;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, Way};
    use kurbo::Point;

    fn history_with_empty_graph() -> History {
        History::new(Graph::new())
    }

    #[test]
    fn test_perform_and_pop() {
        let mut history = history_with_empty_graph();
        let base = history.revision();

        let node = Node::new(Point::new(1.0, 1.0));
        let id = node.id;
        history.perform(Some("Added a point."), move |graph| graph.insert_node(node));

        assert_eq!(history.depth(), 1);
        assert!(history.graph().node(id).is_some());
        assert_eq!(history.annotation(), Some("Added a point."));
        assert!(history.revision() > base);

        history.pop(1);
        assert_eq!(history.depth(), 0);
        assert!(history.graph().node(id).is_none());
        assert_eq!(history.revision(), base);
    }

    #[test]
    fn test_replace_does_not_grow_stack() {
        let mut history = history_with_empty_graph();
        let node = Node::new(Point::new(0.0, 0.0));
        let id = node.id;
        history.perform(None, move |graph| graph.insert_node(node));
        assert_eq!(history.depth(), 1);

        history.replace(move |graph| {
            if let Some(n) = graph.node_mut(id) {
                n.loc = Point::new(5.0, 5.0);
            }
        });
        assert_eq!(history.depth(), 1);
        assert_eq!(history.graph().node(id).unwrap().loc, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_replace_never_touches_base() {
        let mut history = history_with_empty_graph();
        let node = Node::new(Point::new(0.0, 0.0));
        history.replace(move |graph| graph.insert_node(node));

        // Pushed instead of replacing; popping restores the empty base.
        assert_eq!(history.depth(), 1);
        history.pop(1);
        assert!(history.graph().nodes.is_empty());
    }

    #[test]
    fn test_undo_stops_on_annotated_entry() {
        let mut history = history_with_empty_graph();
        history.perform(Some("Added a way."), |graph| {
            graph.insert_way(Way::new());
        });
        history.perform(None, |_| {});
        history.perform(None, |_| {});

        assert!(history.undo());
        assert_eq!(history.depth(), 1);
        assert_eq!(history.annotation(), Some("Added a way."));
    }

    #[test]
    fn test_undo_on_base_is_a_no_op() {
        let mut history = history_with_empty_graph();
        assert!(!history.can_undo());
        assert!(!history.undo());
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn test_pop_clamps_at_base() {
        let mut history = history_with_empty_graph();
        history.perform(None, |_| {});
        history.pop(10);
        assert_eq!(history.depth(), 0);
    }
}
