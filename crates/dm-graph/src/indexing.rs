//! Stable indexing for ordering and scheduling.
//!
//! Provides bidirectional mappings between node ids and contiguous indices
//! (0..N, declaration order) plus index-based adjacency, so algorithms can
//! work on plain vectors instead of hashing ids on every step.

use std::collections::HashMap;

use dm_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Index map providing contiguous indices for graph nodes.
///
/// Index `i` is the node declared at position `i`. Adjacency lists keep
/// transition declaration order and edge multiplicity.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Contiguous list of node IDs (index -> NodeId).
    node_ids: Vec<NodeId>,

    /// Reverse lookup: NodeId -> index.
    node_to_idx: HashMap<NodeId, usize>,

    /// Predecessor indices per node.
    predecessors: Vec<Vec<usize>>,

    /// Successor indices per node.
    successors: Vec<Vec<usize>>,
}

impl IndexMap {
    /// Build an index map from a graph.
    pub fn from_graph(graph: &Graph) -> Self {
        // Positions are already contiguous by construction
        let node_ids: Vec<NodeId> = graph.nodes().iter().map(|n| n.id.clone()).collect();

        let to_indices = |ids: &[NodeId]| -> Vec<usize> {
            ids.iter()
                .filter_map(|id| graph.position(id.as_str()))
                .collect()
        };
        let predecessors = graph.predecessors.iter().map(|p| to_indices(p)).collect();
        let successors = graph.successors.iter().map(|s| to_indices(s)).collect();

        Self {
            node_ids,
            node_to_idx: graph.positions.clone(),
            predecessors,
            successors,
        }
    }

    /// Number of nodes in the index.
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Get the contiguous index for a node ID.
    pub fn node_idx(&self, id: &str) -> GraphResult<usize> {
        self.node_to_idx
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
    }

    /// Get the node ID for a contiguous index (panics if out of bounds).
    pub fn node_id(&self, i: usize) -> &NodeId {
        &self.node_ids[i]
    }

    /// Predecessor indices of node `i`, in input order.
    pub fn predecessors(&self, i: usize) -> &[usize] {
        &self.predecessors[i]
    }

    /// Successor indices of node `i`.
    pub fn successors(&self, i: usize) -> &[usize] {
        &self.successors[i]
    }

    /// Number of incoming transitions per node (counting duplicates).
    pub fn in_degrees(&self) -> Vec<usize> {
        self.predecessors.iter().map(Vec::len).collect()
    }

    /// Iterate over all node IDs in index order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }
}
