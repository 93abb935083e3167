//! dm-graph: graph/model layer for dagman.
//!
//! Provides:
//! - Core graph data structures (NodeSpec, EdgeSpec, Node, Edge, Graph)
//! - Graph builder that validates node ids and drops dangling transitions
//! - Dense indexing used by the sorter and the parallel scheduler
//! - Topological ordering with cycle detection
//! - Root/leaf resolution
//!
//! # Example
//!
//! ```
//! use dm_graph::{GraphBuilder, resolve, sort};
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_node("R", "add 5").add_node("L", "multiply 2");
//! builder.add_transition("R", "L");
//! let graph = builder.build().unwrap();
//!
//! let order = sort::topological_order(&graph).unwrap();
//! assert_eq!(order, ["R", "L"]);
//! assert_eq!(resolve::root(&graph).unwrap(), "R");
//! assert_eq!(resolve::leaf(&graph).unwrap(), "L");
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod resolve;
pub mod sort;

// Re-exports for ergonomics
pub use builder::{GraphBuilder, ReferenceWarning, UnknownEndpoint, build};
pub use error::{GraphError, GraphResult, Role};
pub use graph::{Edge, EdgeSpec, Graph, Node, NodeSpec};
pub use indexing::IndexMap;
