//! Snap resolution for pointer input against nearby nodes and edges.

use crate::geom::{choose_edge, EdgeChoice};
use crate::graph::{Graph, NodeId};
use kurbo::Point;

/// A hit-tested candidate under the pointer, as reported by the host's
/// selection surface.
#[derive(Debug, Clone)]
pub enum SnapTarget {
    /// An existing node; its stored location wins outright.
    Node(NodeId),
    /// One or more edge chains, each an ordered node-id list; the closest
    /// location over all of them wins.
    Edges(Vec<Vec<NodeId>>),
}

/// Resolve the drawing location for a pointer position.
///
/// A node target takes precedence without any distance comparison; edge
/// targets compete by distance with the earliest minimum winning; with no
/// usable target the raw pointer location is used. Candidates referencing
/// missing entities are skipped rather than failing, so a stale hit-test
/// result cannot break a move event.
pub fn resolve(pointer: Point, target: Option<&SnapTarget>, graph: &Graph, skip: NodeId) -> Point {
    match target {
        Some(SnapTarget::Node(id)) => match graph.node(*id) {
            Some(node) => node.loc,
            None => {
                log::debug!("snap target node {id} is gone, keeping pointer location");
                pointer
            }
        },
        Some(SnapTarget::Edges(groups)) => {
            let mut best: Option<EdgeChoice> = None;
            for ids in groups {
                let nodes: Vec<_> = ids
                    .iter()
                    .filter_map(|id| graph.node(*id).cloned())
                    .collect();
                if nodes.len() < ids.len() {
                    log::debug!("snap target edge references missing nodes, skipping");
                    continue;
                }
                let Some(choice) = choose_edge(&nodes, pointer, Some(skip)) else {
                    continue;
                };
                if best.as_ref().is_none_or(|b| choice.distance < b.distance) {
                    best = Some(choice);
                }
            }
            best.map_or(pointer, |b| b.loc)
        }
        None => pointer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    fn graph_with_nodes(locs: &[(f64, f64)]) -> (Graph, Vec<NodeId>) {
        let mut graph = Graph::new();
        let mut ids = Vec::new();
        for &(x, y) in locs {
            let node = Node::new(Point::new(x, y));
            ids.push(node.id);
            graph.insert_node(node);
        }
        (graph, ids)
    }

    #[test]
    fn test_node_target_wins_outright() {
        let (mut graph, ids) = graph_with_nodes(&[(50.0, 50.0)]);
        // An edge candidate far closer to the pointer than the node.
        let (g2, edge_ids) = graph_with_nodes(&[(0.0, 0.0), (10.0, 0.0)]);
        graph.nodes.extend(g2.nodes);

        let target = SnapTarget::Node(ids[0]);
        let loc = resolve(Point::new(1.0, 1.0), Some(&target), &graph, NodeId::new());
        assert_eq!(loc, Point::new(50.0, 50.0));

        // The edge target would have won on distance alone.
        let edges = SnapTarget::Edges(vec![edge_ids]);
        let loc = resolve(Point::new(1.0, 1.0), Some(&edges), &graph, NodeId::new());
        assert_eq!(loc, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_closest_edge_wins() {
        // Chain A at distance 5, chain B at distance 3.
        let (graph, ids) = graph_with_nodes(&[(0.0, 5.0), (10.0, 5.0), (0.0, -3.0), (10.0, -3.0)]);
        let target = SnapTarget::Edges(vec![
            vec![ids[0], ids[1]],
            vec![ids[2], ids[3]],
        ]);

        let loc = resolve(Point::new(5.0, 0.0), Some(&target), &graph, NodeId::new());
        assert_eq!(loc, Point::new(5.0, -3.0));
    }

    #[test]
    fn test_edge_excludes_own_provisional_node() {
        // The provisional node sits right under the pointer; without the
        // exclusion it would snap to itself.
        let (graph, ids) = graph_with_nodes(&[(0.0, 0.0), (5.0, 1.0), (10.0, 0.0)]);
        let target = SnapTarget::Edges(vec![vec![ids[0], ids[1], ids[2]]]);

        let loc = resolve(Point::new(5.0, 1.0), Some(&target), &graph, ids[1]);
        assert_eq!(loc, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_malformed_candidates_are_skipped() {
        let (graph, ids) = graph_with_nodes(&[(0.0, 3.0), (10.0, 3.0)]);

        // A group with a dangling id is ignored; the intact group still
        // snaps.
        let target = SnapTarget::Edges(vec![
            vec![NodeId::new(), NodeId::new()],
            vec![ids[0], ids[1]],
        ]);
        let loc = resolve(Point::new(5.0, 0.0), Some(&target), &graph, NodeId::new());
        assert_eq!(loc, Point::new(5.0, 3.0));

        // A node target that no longer resolves falls back to the pointer.
        let gone = SnapTarget::Node(NodeId::new());
        let loc = resolve(Point::new(7.0, 7.0), Some(&gone), &graph, NodeId::new());
        assert_eq!(loc, Point::new(7.0, 7.0));
    }

    #[test]
    fn test_no_target_uses_pointer() {
        let graph = Graph::new();
        let loc = resolve(Point::new(2.0, 4.0), None, &graph, NodeId::new());
        assert_eq!(loc, Point::new(2.0, 4.0));
    }
}
