//! Root and leaf resolution.
//!
//! A runnable graph has exactly one entry node (no predecessors), which
//! receives the external starting value, and exactly one exit node (no
//! successors), whose output is the result.

use dm_core::NodeId;

use crate::error::{GraphError, GraphResult, Role};
use crate::graph::Graph;

/// All nodes without predecessors, in declaration order.
pub fn roots(graph: &Graph) -> Vec<&NodeId> {
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(i, _)| graph.predecessors[*i].is_empty())
        .map(|(_, n)| &n.id)
        .collect()
}

/// All nodes without successors, in declaration order.
pub fn leaves(graph: &Graph) -> Vec<&NodeId> {
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(i, _)| graph.successors[*i].is_empty())
        .map(|(_, n)| &n.id)
        .collect()
}

/// The unique root of the graph.
pub fn root(graph: &Graph) -> GraphResult<&NodeId> {
    exactly_one(Role::Root, roots(graph))
}

/// The unique leaf of the graph.
pub fn leaf(graph: &Graph) -> GraphResult<&NodeId> {
    exactly_one(Role::Leaf, leaves(graph))
}

fn exactly_one(role: Role, candidates: Vec<&NodeId>) -> GraphResult<&NodeId> {
    if candidates.len() == 1 {
        return Ok(candidates[0]);
    }
    Err(GraphError::CountMismatch {
        role,
        count: candidates.len(),
        candidates: candidates.into_iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    #[test]
    fn single_node_is_root_and_leaf() {
        let mut builder = GraphBuilder::new();
        builder.add_node("only", "add 1");
        let graph = builder.build().unwrap();

        assert_eq!(root(&graph).unwrap(), "only");
        assert_eq!(leaf(&graph).unwrap(), "only");
    }

    #[test]
    fn empty_graph_has_no_root() {
        let graph = GraphBuilder::new().build().unwrap();
        assert_eq!(
            root(&graph).unwrap_err(),
            GraphError::CountMismatch {
                role: Role::Root,
                count: 0,
                candidates: vec![],
            }
        );
    }

    #[test]
    fn empty_graph_has_no_leaf() {
        let graph = GraphBuilder::new().build().unwrap();
        assert_eq!(
            leaf(&graph).unwrap_err(),
            GraphError::CountMismatch {
                role: Role::Leaf,
                count: 0,
                candidates: vec![],
            }
        );
    }

    #[test]
    fn every_node_with_successors_means_no_leaf() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node("R", "add 1")
            .add_node("A", "sum")
            .add_node("B", "sum");
        builder
            .add_transition("R", "A")
            .add_transition("A", "B")
            .add_transition("B", "A");
        let graph = builder.build().unwrap();

        assert_eq!(root(&graph).unwrap(), "R");
        assert!(leaves(&graph).is_empty());
        assert!(matches!(
            leaf(&graph),
            Err(GraphError::CountMismatch {
                role: Role::Leaf,
                count: 0,
                ..
            })
        ));
    }

    #[test]
    fn two_roots_are_reported() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node("A", "add 1")
            .add_node("B", "add 2")
            .add_node("L", "sum");
        builder.add_transition("A", "L").add_transition("B", "L");
        let graph = builder.build().unwrap();

        match root(&graph).unwrap_err() {
            GraphError::CountMismatch {
                role,
                count,
                candidates,
            } => {
                assert_eq!(role, Role::Root);
                assert_eq!(count, 2);
                assert_eq!(candidates, ["A", "B"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(leaf(&graph).unwrap(), "L");
    }

    #[test]
    fn two_leaves_are_reported() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node("R", "add 1")
            .add_node("X", "sum")
            .add_node("Y", "sum");
        builder.add_transition("R", "X").add_transition("R", "Y");
        let graph = builder.build().unwrap();

        assert!(matches!(
            leaf(&graph),
            Err(GraphError::CountMismatch {
                role: Role::Leaf,
                count: 2,
                ..
            })
        ));
        assert_eq!(leaves(&graph), ["X", "Y"]);
    }
}
