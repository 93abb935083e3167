//! Error types for graph execution.

use dm_core::NodeId;
use dm_graph::GraphError;
use dm_ops::OpError;
use thiserror::Error;

/// Result type for execution.
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors that abort a run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecError {
    /// The graph cannot be executed as declared (surfaced by [`crate::Plan`]).
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// An id handed to the engine is not part of the graph.
    #[error("Node '{node}' not found in graph")]
    UnknownNode { node: String },

    /// A predecessor had no recorded output when the node was reached.
    #[error("Node '{node}' is missing the output of dependency '{dependency}'")]
    MissingDependency { node: NodeId, dependency: NodeId },

    /// A node was scheduled a second time.
    #[error("Node '{node}' already has a recorded output")]
    AlreadyExecuted { node: NodeId },

    /// The node's operation failed.
    #[error("Node '{node}' ({operation}) failed: {source}")]
    Operation {
        node: NodeId,
        operation: String,
        #[source]
        source: OpError,
    },

    /// The run finished without an output for the leaf.
    ///
    /// A successful run of a prepared [`crate::Plan`] always records the
    /// leaf; this guards `Engine::execute` against an engine walk that
    /// skips it.
    #[error("Leaf '{node}' produced no output")]
    MissingResult { node: NodeId },

    /// Parallel run ended with nodes whose predecessors never completed.
    #[error("{pending} node(s) never became ready")]
    Stalled { pending: usize },

    #[error("Failed to build worker pool: {what}")]
    ThreadPool { what: String },
}

impl ExecError {
    /// The operation error behind an `Operation` failure, if any.
    pub fn operation_error(&self) -> Option<&OpError> {
        match self {
            ExecError::Operation { source, .. } => Some(source),
            _ => None,
        }
    }
}
