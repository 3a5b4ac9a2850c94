//! Segment math for edge snapping and self-intersection checks.

use crate::graph::{Node, NodeId};
use kurbo::Point;

/// Result of projecting the pointer onto an edge chain.
#[derive(Debug, Clone, Copy)]
pub struct EdgeChoice {
    /// Member index at which a node placed at `loc` would be inserted.
    pub index: usize,
    /// Closest location on the chain.
    pub loc: Point,
    /// Distance from the pointer to `loc`.
    pub distance: f64,
}

/// Closest point on the segment `a`-`b` to `p`.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        // Degenerate segment.
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Pick the location on the chain through `nodes` closest to `point`.
///
/// `skip` removes one node from the chain before projecting; the draw
/// session passes its provisional node so the pointer cannot snap to the
/// segment it is itself dragging.
pub fn choose_edge(nodes: &[Node], point: Point, skip: Option<NodeId>) -> Option<EdgeChoice> {
    let pts: Vec<Point> = nodes
        .iter()
        .filter(|n| Some(n.id) != skip)
        .map(|n| n.loc)
        .collect();
    if pts.len() < 2 {
        return None;
    }

    let mut best: Option<EdgeChoice> = None;
    for i in 0..pts.len() - 1 {
        let loc = project_onto_segment(point, pts[i], pts[i + 1]);
        let distance = (point - loc).hypot();
        if best.as_ref().is_none_or(|b| distance < b.distance) {
            best = Some(EdgeChoice {
                index: i + 1,
                loc,
                distance,
            });
        }
    }
    best
}

/// Intersection of the open segments `a0`-`a1` and `b0`-`b1`, excluding
/// endpoint touches and collinear overlap.
pub fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.cross(s);
    if denom.abs() < f64::EPSILON {
        return None;
    }
    let q = b0 - a0;
    let t = q.cross(s) / denom;
    let u = q.cross(r) / denom;
    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Some(a0 + r * t)
    } else {
        None
    }
}

/// Whether the chain through `nodes` crosses itself at a segment touching
/// the node `active`.
///
/// Only segments with `active` as an endpoint are tested, against every
/// segment that does not share a node with them; sharing is checked by
/// identity, so a ring passing through the same node twice does not count
/// as a crossing at that node.
pub fn has_self_intersections(nodes: &[Node], active: NodeId) -> bool {
    let mut actives = Vec::new();
    let mut inactives = Vec::new();

    for w in nodes.windows(2) {
        let seg = ((w[0].id, w[1].id), (w[0].loc, w[1].loc));
        if w[0].id == active || w[1].id == active {
            actives.push(seg);
        } else {
            inactives.push(seg);
        }
    }

    for ((a_start, a_end), (a0, a1)) in &actives {
        for ((b_start, b_end), (b0, b1)) in &inactives {
            if a_start == b_start || a_start == b_end || a_end == b_start || a_end == b_end {
                continue;
            }
            if segment_intersection(*a0, *a1, *b0, *b1).is_some() {
                return true;
            }
        }
    }
    false
}
