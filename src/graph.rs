//! Entity graph: nodes, ways, and lookups over them.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// Identifier for a node (a point entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Mint a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n:{}", self.0)
    }
}

/// Identifier for a way (an ordered node sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WayId(Uuid);

impl WayId {
    /// Mint a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w:{}", self.0)
    }
}

/// A point entity with a world location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub loc: Point,
}

impl Node {
    /// Create a node at `loc` with a fresh identifier.
    pub fn new(loc: Point) -> Self {
        Self {
            id: NodeId::new(),
            loc,
        }
    }
}

/// An ordered sequence of nodes forming a line or, if closed, an area
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: WayId,
    pub nodes: Vec<NodeId>,
}

impl Way {
    /// Create an empty way.
    pub fn new() -> Self {
        Self {
            id: WayId::new(),
            nodes: Vec::new(),
        }
    }

    /// Create a way over an existing node sequence.
    pub fn from_nodes(nodes: Vec<NodeId>) -> Self {
        Self {
            id: WayId::new(),
            nodes,
        }
    }

    /// A way is closed when it ends on the node it starts with.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.nodes.first() == self.nodes.last()
    }

    /// Too few distinct nodes to be a valid line (2) or closed ring (3).
    pub fn is_degenerate(&self) -> bool {
        let distinct: HashSet<&NodeId> = self.nodes.iter().collect();
        distinct.len() < if self.is_closed() { 3 } else { 2 }
    }

    /// Number of distinct member nodes.
    pub fn distinct_len(&self) -> usize {
        let distinct: HashSet<&NodeId> = self.nodes.iter().collect();
        distinct.len()
    }

    /// Insert a member at `index`, or append when `None`. Appending to a
    /// closed way inserts before the closing node so the ring stays intact.
    pub fn add_node(&mut self, id: NodeId, index: Option<usize>) {
        match index {
            Some(i) => self.nodes.insert(i.min(self.nodes.len()), id),
            None if self.is_closed() => {
                let at = self.nodes.len() - 1;
                self.nodes.insert(at, id);
            }
            None => self.nodes.push(id),
        }
    }

    /// Whether `a` and `b` are consecutive members, in either direction.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes
            .windows(2)
            .any(|w| (w[0] == a && w[1] == b) || (w[0] == b && w[1] == a))
    }
}

impl Default for Way {
    fn default() -> Self {
        Self::new()
    }
}

/// The entity store: all nodes and ways of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: HashMap<NodeId, Node>,
    pub ways: HashMap<WayId, Way>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable node lookup.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Look up a way.
    pub fn way(&self, id: WayId) -> Option<&Way> {
        self.ways.get(&id)
    }

    /// Mutable way lookup.
    pub fn way_mut(&mut self, id: WayId) -> Option<&mut Way> {
        self.ways.get_mut(&id)
    }

    /// Whether the way still exists.
    pub fn has_way(&self, id: WayId) -> bool {
        self.ways.contains_key(&id)
    }

    /// Add or replace a node.
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    /// Add or replace a way.
    pub fn insert_way(&mut self, way: Way) {
        self.ways.insert(way.id, way);
    }

    /// Remove a node entity and strip it from every way's member list.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        for way in self.ways.values_mut() {
            way.nodes.retain(|&n| n != id);
        }
        self.nodes.remove(&id)
    }

    /// Ways that contain `id` as a member.
    pub fn parent_ways(&self, id: NodeId) -> Vec<&Way> {
        self.ways
            .values()
            .filter(|way| way.nodes.contains(&id))
            .collect()
    }

    /// Resolve a way's members to nodes. Members with no backing entity are
    /// skipped rather than failing.
    pub fn way_nodes(&self, way: &Way) -> Vec<Node> {
        way.nodes
            .iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect()
    }

    /// Insert `node` into every way that contains the edge `(a, b)`, in
    /// either direction, splitting that edge in two.
    pub fn splice_into_edge(&mut self, node: NodeId, edge: (NodeId, NodeId)) {
        for way in self.ways.values_mut() {
            let mut i = 0;
            while i + 1 < way.nodes.len() {
                let (p, q) = (way.nodes[i], way.nodes[i + 1]);
                if (p, q) == edge || (q, p) == edge {
                    way.nodes.insert(i + 1, node);
                    i += 2;
                } else {
                    i += 1;
                }
            }
        }
    }

    /// Serialize the graph to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a graph from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
