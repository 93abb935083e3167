//! Sequential execution engine.

use dm_core::{NodeId, Value};
use dm_graph::{Graph, Node};
use dm_ops::OperationRegistry;
use serde::{Deserialize, Serialize};

use crate::error::{ExecError, ExecResult};
use crate::observer::{NodeEvent, NodeObserver, NoopObserver};
use crate::outputs::Outputs;
use crate::plan::Plan;

/// How a plan is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExecutionMode {
    /// One node at a time, in plan order.
    #[default]
    Sequential,
    /// Independent nodes run concurrently on a rayon pool.
    Parallel {
        /// Worker count; `None` uses rayon's default.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threads: Option<usize>,
    },
}

/// Runtime options for [`Engine::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunOptions {
    #[serde(default)]
    pub mode: ExecutionMode,
}

/// Result of executing a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub outputs: Outputs,
    pub leaf: NodeId,
    /// Output of the leaf node.
    pub result: Value,
}

/// Executes graphs against an operation registry.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: OperationRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl Engine {
    pub fn new(registry: OperationRegistry) -> Self {
        Self { registry }
    }

    /// Engine over the builtin `add`, `multiply` and `sum` operations.
    pub fn with_builtins() -> Self {
        Self::new(OperationRegistry::with_builtins())
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Run `order` over `graph`, feeding `starting_value` to `root`.
    ///
    /// Returns every node's output; callers read the leaf's entry.
    pub fn run(
        &self,
        graph: &Graph,
        order: &[NodeId],
        root: &NodeId,
        starting_value: Value,
    ) -> ExecResult<Outputs> {
        self.run_observed(graph, order, root, starting_value, &NoopObserver)
    }

    /// Same as [`Engine::run`], reporting each executed node to `observer`.
    ///
    /// The walk is a single pass. The first failure aborts the run and no
    /// later node executes.
    pub fn run_observed(
        &self,
        graph: &Graph,
        order: &[NodeId],
        root: &NodeId,
        starting_value: Value,
        observer: &dyn NodeObserver,
    ) -> ExecResult<Outputs> {
        if !graph.contains(root.as_str()) {
            return Err(ExecError::UnknownNode {
                node: root.to_string(),
            });
        }

        let mut outputs = Outputs::with_capacity(order.len());
        for id in order {
            let node = graph
                .node(id.as_str())
                .ok_or_else(|| ExecError::UnknownNode {
                    node: id.to_string(),
                })?;
            if outputs.contains(id.as_str()) {
                return Err(ExecError::AlreadyExecuted { node: id.clone() });
            }

            let inputs = if node.id == *root {
                vec![starting_value]
            } else {
                gather_inputs(graph, node, |dep| outputs.get(dep.as_str()))?
            };
            let output = self.execute_node(node, &inputs)?;
            observer.node_executed(&NodeEvent {
                node: &node.id,
                operation: &node.operation,
                inputs: &inputs,
                output,
            });
            outputs.record(node.id.clone(), output)?;
        }

        tracing::debug!(executed = outputs.len(), "run finished");
        Ok(outputs)
    }

    /// Execute a prepared plan in the configured mode.
    pub fn execute(
        &self,
        plan: &Plan<'_>,
        starting_value: Value,
        options: &RunOptions,
        observer: &dyn NodeObserver,
    ) -> ExecResult<RunOutcome> {
        let outputs = match options.mode {
            ExecutionMode::Sequential => self.run_observed(
                plan.graph(),
                plan.order(),
                plan.root(),
                starting_value,
                observer,
            )?,
            ExecutionMode::Parallel { threads } => self.run_parallel(
                plan.graph(),
                plan.root(),
                starting_value,
                threads,
                observer,
            )?,
        };

        let leaf = plan.leaf().clone();
        let result = outputs
            .get(leaf.as_str())
            .ok_or_else(|| ExecError::MissingResult { node: leaf.clone() })?;
        Ok(RunOutcome {
            outputs,
            leaf,
            result,
        })
    }

    /// Resolve every node's operation and parse its literals without
    /// running anything.
    pub fn check_operations(&self, graph: &Graph) -> ExecResult<()> {
        for node in graph.nodes() {
            self.registry
                .check(&node.operation)
                .map_err(|source| ExecError::Operation {
                    node: node.id.clone(),
                    operation: node.operation.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub(crate) fn execute_node(&self, node: &Node, inputs: &[Value]) -> ExecResult<Value> {
        self.registry
            .invoke(&node.operation, inputs)
            .map_err(|source| ExecError::Operation {
                node: node.id.clone(),
                operation: node.operation.clone(),
                source,
            })
    }
}

/// Collect the outputs of `node`'s predecessors, in predecessor order.
pub(crate) fn gather_inputs(
    graph: &Graph,
    node: &Node,
    output_of: impl Fn(&NodeId) -> Option<Value>,
) -> ExecResult<Vec<Value>> {
    graph
        .predecessors(node.id.as_str())
        .iter()
        .map(|dep| {
            output_of(dep).ok_or_else(|| ExecError::MissingDependency {
                node: node.id.clone(),
                dependency: dep.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_graph::GraphBuilder;
    use dm_ops::OpError;

    fn chain() -> Graph {
        let mut builder = GraphBuilder::new();
        builder.add_node("R", "add 5").add_node("L", "multiply 2");
        builder.add_transition("R", "L");
        builder.build().unwrap()
    }

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn run_chain() {
        let graph = chain();
        let engine = Engine::with_builtins();
        let outputs = engine.run(&graph, &[id("R"), id("L")], &id("R"), 10).unwrap();
        assert_eq!(outputs.get("R"), Some(15));
        assert_eq!(outputs.get("L"), Some(30));
        assert_eq!(outputs.record_order(), ["R", "L"]);
    }

    #[test]
    fn wrong_order_is_missing_dependency() {
        let graph = chain();
        let engine = Engine::with_builtins();
        let err = engine
            .run(&graph, &[id("L"), id("R")], &id("R"), 10)
            .unwrap_err();
        assert_eq!(
            err,
            ExecError::MissingDependency {
                node: id("L"),
                dependency: id("R"),
            }
        );
    }

    #[test]
    fn repeated_node_in_order() {
        let graph = chain();
        let engine = Engine::with_builtins();
        let err = engine
            .run(&graph, &[id("R"), id("R")], &id("R"), 1)
            .unwrap_err();
        assert_eq!(err, ExecError::AlreadyExecuted { node: id("R") });
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let graph = chain();
        let engine = Engine::with_builtins();
        assert!(matches!(
            engine.run(&graph, &[id("R")], &id("ghost"), 1),
            Err(ExecError::UnknownNode { .. })
        ));
        assert!(matches!(
            engine.run(&graph, &[id("R"), id("ghost")], &id("R"), 1),
            Err(ExecError::UnknownNode { node }) if node == "ghost"
        ));
    }

    #[test]
    fn check_operations_reports_node() {
        let mut builder = GraphBuilder::new();
        builder.add_node("R", "add 1").add_node("L", "multiply many");
        builder.add_transition("R", "L");
        let graph = builder.build().unwrap();

        let err = Engine::with_builtins().check_operations(&graph).unwrap_err();
        match err {
            ExecError::Operation {
                node,
                operation,
                source,
            } => {
                assert_eq!(node, id("L"));
                assert_eq!(operation, "multiply many");
                assert!(matches!(source, OpError::InvalidArgument { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn run_options_from_json() {
        let options: RunOptions =
            serde_json::from_str(r#"{"mode":{"type":"Parallel","threads":2}}"#).unwrap();
        assert_eq!(
            options.mode,
            ExecutionMode::Parallel { threads: Some(2) }
        );
        assert_eq!(
            serde_json::from_str::<RunOptions>("{}").unwrap(),
            RunOptions::default()
        );
    }
}
