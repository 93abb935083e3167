//! Graph-specific error types.
//!
//! Every variant is a configuration error: the graph cannot be executed as
//! declared and nothing has run yet.

use core::fmt;

use dm_core::NodeId;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Which end of the graph a resolution targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Entry node (no predecessors).
    Root,
    /// Exit node (no successors).
    Leaf,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Root => f.write_str("root"),
            Role::Leaf => f.write_str("leaf"),
        }
    }
}

/// Graph construction and validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node was declared with an empty id.
    #[error("Node at position {position} has an empty id")]
    EmptyNodeId { position: usize },

    /// Two nodes share the same id.
    #[error("Duplicate node id '{id}'")]
    DuplicateNode { id: NodeId },

    /// Zero or several candidates for the root or leaf.
    #[error("Expected exactly one {role}, got {count}{}", list_candidates(.candidates))]
    CountMismatch {
        role: Role,
        count: usize,
        candidates: Vec<NodeId>,
    },

    /// The transitions form a cycle; the path repeats its first node at the end.
    #[error("Dependency cycle: {}", join_path(.path))]
    Cycle { path: Vec<NodeId> },

    /// ID not found in the graph.
    #[error("Node '{id}' not found")]
    UnknownNode { id: String },
}

fn list_candidates(candidates: &[NodeId]) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = candidates.iter().map(NodeId::as_str).collect();
    format!(" ({})", names.join(", "))
}

fn join_path(path: &[NodeId]) -> String {
    let names: Vec<&str> = path.iter().map(NodeId::as_str).collect();
    names.join(" -> ")
}
