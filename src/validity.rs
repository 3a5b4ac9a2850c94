//! Self-intersection gate for shapes touched by the provisional node.

use crate::geom::has_self_intersections;
use crate::graph::{Graph, NodeId};

/// Whether committing `node` at its current location would leave any closed
/// parent way self-intersecting.
///
/// Open ways are never flagged. `skip_last` drops the closing node from the
/// sequence before testing; the live preview uses this so the segment the
/// next commit will replace cannot cause a false positive, while commit and
/// finish checks include it.
pub fn is_invalid_geometry(node: NodeId, graph: &Graph, skip_last: bool) -> bool {
    for way in graph.parent_ways(node) {
        if !way.is_closed() {
            continue;
        }
        let mut nodes = graph.way_nodes(way);
        if skip_last {
            nodes.pop();
        }
        if has_self_intersections(&nodes, node) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, Way};
    use kurbo::Point;

    /// Square ring A(0,0) B(10,0) C(10,10) D(0,10) with the drawn node
    /// appended before the closing member, at `loc`.
    fn ring_with_drawn_node(loc: Point) -> (Graph, NodeId) {
        let mut graph = Graph::new();
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let mut ids = Vec::new();
        for loc in corners {
            let node = Node::new(loc);
            ids.push(node.id);
            graph.insert_node(node);
        }
        let drawn = Node::new(loc);
        let drawn_id = drawn.id;
        graph.insert_node(drawn);

        let members = vec![ids[0], ids[1], ids[2], ids[3], drawn_id, ids[0]];
        graph.insert_way(Way::from_nodes(members));
        (graph, drawn_id)
    }

    #[test]
    fn test_crossing_ring_is_invalid() {
        // The drawn node dropped below the bottom edge: the segment from D
        // down to it crosses A-B.
        let (graph, drawn) = ring_with_drawn_node(Point::new(5.0, -5.0));
        assert!(is_invalid_geometry(drawn, &graph, true));
        assert!(is_invalid_geometry(drawn, &graph, false));
    }

    #[test]
    fn test_interior_node_is_valid() {
        let (graph, drawn) = ring_with_drawn_node(Point::new(5.0, 5.0));
        assert!(!is_invalid_geometry(drawn, &graph, true));
        assert!(!is_invalid_geometry(drawn, &graph, false));
    }

    #[test]
    fn test_skip_last_ignores_closing_segment() {
        // Above and to the right of the ring: the segment D -> drawn stays
        // clear, but the closing segment drawn -> A cuts through B-C. Only
        // the full check flags it.
        let (graph, drawn) = ring_with_drawn_node(Point::new(20.0, 12.0));
        assert!(!is_invalid_geometry(drawn, &graph, true));
        assert!(is_invalid_geometry(drawn, &graph, false));
    }

    #[test]
    fn test_open_way_never_flags() {
        let mut graph = Graph::new();
        let a = Node::new(Point::new(0.0, 0.0));
        let b = Node::new(Point::new(10.0, 10.0));
        let c = Node::new(Point::new(0.0, 10.0));
        let d = Node::new(Point::new(10.0, 0.0));
        let ids = [a.id, b.id, c.id, d.id];
        for node in [a, b, c, d] {
            graph.insert_node(node);
        }
        // The open zig-zag crosses itself, but only closed ways are gated.
        graph.insert_way(Way::from_nodes(ids.to_vec()));
        assert!(!is_invalid_geometry(ids[3], &graph, false));
    }
}
