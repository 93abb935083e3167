//! Execution plan: everything about a graph that can fail before a run.

use dm_core::NodeId;
use dm_graph::{Graph, resolve, sort};

use crate::error::ExecResult;

/// A graph together with its execution order, root and leaf.
///
/// Preparing a plan performs every configuration check (cycles, root and
/// leaf cardinality), so a run started from a plan can only fail with
/// execution errors.
#[derive(Debug, Clone)]
pub struct Plan<'g> {
    graph: &'g Graph,
    order: Vec<NodeId>,
    root: NodeId,
    leaf: NodeId,
}

impl<'g> Plan<'g> {
    pub fn prepare(graph: &'g Graph) -> ExecResult<Self> {
        let order = sort::topological_order(graph)?;
        let root = resolve::root(graph)?.clone();
        let leaf = resolve::leaf(graph)?.clone();
        tracing::debug!(nodes = order.len(), %root, %leaf, "plan prepared");
        Ok(Self {
            graph,
            order,
            root,
            leaf,
        })
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn root(&self) -> &NodeId {
        &self.root
    }

    pub fn leaf(&self) -> &NodeId {
        &self.leaf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecError;
    use dm_graph::{GraphBuilder, GraphError, Role};

    #[test]
    fn prepare_resolves_everything() {
        let mut builder = GraphBuilder::new();
        builder.add_node("L", "multiply 2").add_node("R", "add 5");
        builder.add_transition("R", "L");
        let graph = builder.build().unwrap();

        let plan = Plan::prepare(&graph).unwrap();
        assert_eq!(plan.order(), ["R", "L"]);
        assert_eq!(plan.root(), "R");
        assert_eq!(plan.leaf(), "L");
    }

    #[test]
    fn cycle_is_a_configuration_error() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node("R", "add 1")
            .add_node("A", "sum")
            .add_node("L", "sum");
        builder
            .add_transition("R", "A")
            .add_transition("A", "L")
            .add_transition("L", "A");
        let graph = builder.build().unwrap();

        assert!(matches!(
            Plan::prepare(&graph),
            Err(ExecError::Graph(GraphError::Cycle { .. }))
        ));
    }

    #[test]
    fn two_leaves_rejected_before_running() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node("R", "add 1")
            .add_node("X", "sum")
            .add_node("Y", "sum");
        builder.add_transition("R", "X").add_transition("R", "Y");
        let graph = builder.build().unwrap();

        assert!(matches!(
            Plan::prepare(&graph),
            Err(ExecError::Graph(GraphError::CountMismatch {
                role: Role::Leaf,
                count: 2,
                ..
            }))
        ));
    }
}
