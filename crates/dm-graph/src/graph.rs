//! Core graph data structures.

use std::collections::HashMap;

use dm_core::NodeId;

/// A node as handed over by the definition loader, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub id: String,
    /// Operation name followed by literal arguments, e.g. `"add 5"`.
    pub operation: String,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operation: operation.into(),
        }
    }
}

/// A transition as handed over by the definition loader, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
}

impl EdgeSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A validated node in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub operation: String,
}

/// An accepted transition: both endpoints exist in the graph.
///
/// The `to` node consumes the output of the `from` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

/// The graph: a validated, immutable collection of nodes and transitions.
///
/// The graph stores:
/// - Nodes in declaration order, plus a lookup from id to position.
/// - Successor and predecessor lists per node (parallel to `nodes`), each in
///   transition declaration order.
///
/// Declaration order is the only iteration order exposed, so everything
/// derived from the graph is reproducible.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) positions: HashMap<NodeId, usize>,
    pub(crate) successors: Vec<Vec<NodeId>>,
    pub(crate) predecessors: Vec<Vec<NodeId>>,
    pub(crate) edges: Vec<Edge>,
}

impl Graph {
    /// Return all nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all accepted transitions in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Declaration position of a node.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Get a node by ID.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.position(id).map(|i| &self.nodes[i])
    }

    /// Nodes consuming the output of `id` (empty for unknown ids).
    pub fn successors(&self, id: &str) -> &[NodeId] {
        match self.position(id) {
            Some(i) => &self.successors[i],
            None => &[],
        }
    }

    /// Nodes whose outputs `id` consumes, in input order (empty for unknown ids).
    pub fn predecessors(&self, id: &str) -> &[NodeId] {
        match self.position(id) {
            Some(i) => &self.predecessors[i],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    #[test]
    fn spec_constructors() {
        let node = NodeSpec::new("R", "add 5");
        assert_eq!(node.id, "R");
        assert_eq!(node.operation, "add 5");

        let edge = EdgeSpec::new("R", "L");
        assert_eq!(edge.from, "R");
        assert_eq!(edge.to, "L");
    }

    #[test]
    fn unknown_ids_have_no_neighbours() {
        let graph = Graph::default();
        assert!(graph.is_empty());
        assert!(graph.successors("nope").is_empty());
        assert!(graph.predecessors("nope").is_empty());
        assert!(graph.node("nope").is_none());
    }

    #[test]
    fn accessors() {
        let mut builder = GraphBuilder::new();
        builder.add_node("R", "add 1").add_node("L", "sum");
        builder.add_transition("R", "L");
        let graph = builder.build().unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.contains("R"));
        assert_eq!(graph.position("L"), Some(1));
        assert_eq!(graph.node("R").unwrap().operation, "add 1");
        assert_eq!(graph.successors("R"), ["L"]);
        assert_eq!(graph.predecessors("L"), ["R"]);
        assert_eq!(graph.edges().len(), 1);
    }
}
