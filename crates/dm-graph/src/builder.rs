//! Graph builder.

use core::fmt;
use std::collections::HashMap;

use dm_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Edge, EdgeSpec, Graph, Node, NodeSpec};

/// Which endpoint(s) of a dropped transition did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownEndpoint {
    From,
    To,
    Both,
}

/// A transition that was dropped because it references an unknown node.
///
/// Non-fatal: the build continues without the transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceWarning {
    pub from: String,
    pub to: String,
    pub unknown: UnknownEndpoint,
}

impl fmt::Display for ReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let which = match self.unknown {
            UnknownEndpoint::From => format!("unknown node '{}'", self.from),
            UnknownEndpoint::To => format!("unknown node '{}'", self.to),
            UnknownEndpoint::Both => {
                format!("unknown nodes '{}' and '{}'", self.from, self.to)
            }
        };
        write!(
            f,
            "transition from '{}' to '{}' references {}",
            self.from, self.to, which
        )
    }
}

/// Builder for constructing a graph from flat node and transition lists.
///
/// Use `add_node` and `add_transition` to collect the definition,
/// then call `build()` to validate and freeze it into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeSpec>,
    transitions: Vec<EdgeSpec>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-filled with the loader's lists.
    pub fn from_specs(nodes: Vec<NodeSpec>, transitions: Vec<EdgeSpec>) -> Self {
        Self { nodes, transitions }
    }

    /// Declare a node. Declaration order is kept.
    pub fn add_node(&mut self, id: impl Into<String>, operation: impl Into<String>) -> &mut Self {
        self.nodes.push(NodeSpec::new(id, operation));
        self
    }

    /// Declare a transition `from -> to`; `to` consumes the output of `from`.
    pub fn add_transition(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.transitions.push(EdgeSpec::new(from, to));
        self
    }

    /// Build the graph, logging and discarding dropped transitions.
    pub fn build(self) -> GraphResult<Graph> {
        self.build_with_report().map(|(graph, _)| graph)
    }

    /// Build the graph and also return the transitions that were dropped.
    ///
    /// Node ids must be non-empty and unique. Transitions whose endpoints do
    /// not resolve are skipped with a warning instead of failing the build.
    pub fn build_with_report(self) -> GraphResult<(Graph, Vec<ReferenceWarning>)> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut positions = HashMap::with_capacity(self.nodes.len());

        for (position, spec) in self.nodes.into_iter().enumerate() {
            let id = NodeId::new(spec.id).map_err(|_| GraphError::EmptyNodeId { position })?;
            if positions.contains_key(&id) {
                return Err(GraphError::DuplicateNode { id });
            }
            positions.insert(id.clone(), position);
            nodes.push(Node {
                id,
                operation: spec.operation,
            });
        }

        let mut successors = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![Vec::new(); nodes.len()];
        let mut edges = Vec::with_capacity(self.transitions.len());
        let mut warnings = Vec::new();

        for transition in self.transitions {
            let from = positions.get(transition.from.as_str()).copied();
            let to = positions.get(transition.to.as_str()).copied();
            let (from, to) = match (from, to) {
                (Some(from), Some(to)) => (from, to),
                (from, to) => {
                    let unknown = match (from, to) {
                        (None, None) => UnknownEndpoint::Both,
                        (None, _) => UnknownEndpoint::From,
                        _ => UnknownEndpoint::To,
                    };
                    let warning = ReferenceWarning {
                        from: transition.from,
                        to: transition.to,
                        unknown,
                    };
                    tracing::warn!("dropping transition: {warning}");
                    warnings.push(warning);
                    continue;
                }
            };

            let from_id = nodes[from].id.clone();
            let to_id = nodes[to].id.clone();
            successors[from].push(to_id.clone());
            predecessors[to].push(from_id.clone());
            edges.push(Edge {
                from: from_id,
                to: to_id,
            });
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            dropped = warnings.len(),
            "graph built"
        );

        let graph = Graph {
            nodes,
            positions,
            successors,
            predecessors,
            edges,
        };
        Ok((graph, warnings))
    }
}

/// Build a graph straight from the loader's lists.
pub fn build(nodes: Vec<NodeSpec>, transitions: Vec<EdgeSpec>) -> GraphResult<Graph> {
    GraphBuilder::from_specs(nodes, transitions).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node("R", "add 1")
            .add_node("A", "multiply 3")
            .add_node("L", "sum");
        builder
            .add_transition("R", "A")
            .add_transition("R", "L")
            .add_transition("A", "L");

        let graph = builder.build().unwrap();
        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["R", "A", "L"]);
        assert_eq!(graph.successors("R"), ["A", "L"]);
        assert_eq!(graph.predecessors("L"), ["R", "A"]);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder.add_node("R", "add 1").add_node("R", "add 2");
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateNode {
                id: NodeId::new("R").unwrap()
            }
        );
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder.add_node("R", "add 1").add_node(" ", "sum");
        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::EmptyNodeId { position: 1 }
        );
    }

    #[test]
    fn dangling_transitions_are_dropped() {
        let mut builder = GraphBuilder::new();
        builder.add_node("R", "add 1").add_node("L", "sum");
        builder
            .add_transition("R", "ghost")
            .add_transition("ghost", "L")
            .add_transition("x", "y")
            .add_transition("R", "L");

        let (graph, warnings) = builder.build_with_report().unwrap();
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.successors("R"), ["L"]);
        assert_eq!(graph.predecessors("L"), ["R"]);

        let kinds: Vec<UnknownEndpoint> = warnings.iter().map(|w| w.unknown).collect();
        assert_eq!(
            kinds,
            [
                UnknownEndpoint::To,
                UnknownEndpoint::From,
                UnknownEndpoint::Both
            ]
        );
        assert_eq!(
            warnings[0].to_string(),
            "transition from 'R' to 'ghost' references unknown node 'ghost'"
        );
    }

    #[test]
    fn duplicate_transitions_are_kept() {
        let graph = build(
            vec![NodeSpec::new("R", "add 1"), NodeSpec::new("L", "sum")],
            vec![EdgeSpec::new("R", "L"), EdgeSpec::new("R", "L")],
        )
        .unwrap();
        assert_eq!(graph.predecessors("L"), ["R", "R"]);
    }
}
