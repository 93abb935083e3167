//! Topological ordering.
//!
//! Dependency-first post-order: a node is emitted once every predecessor has
//! been emitted. The walk uses an explicit stack and three marks per node, so
//! deep chains cannot overflow the call stack and cycles are reported instead
//! of looping.
//!
//! Seeds are taken in node declaration order and predecessors in transition
//! declaration order, which makes the result identical from run to run.

use dm_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::indexing::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Compute an execution order in which every node follows all of its
/// transitive predecessors.
///
/// Returns `GraphError::Cycle` with the offending path if the transitions
/// are not acyclic.
pub fn topological_order(graph: &Graph) -> GraphResult<Vec<NodeId>> {
    let index = IndexMap::from_graph(graph);
    topological_indices(&index).map(|order| {
        order
            .into_iter()
            .map(|i| index.node_id(i).clone())
            .collect()
    })
}

/// Same as [`topological_order`], on dense indices.
pub fn topological_indices(index: &IndexMap) -> GraphResult<Vec<usize>> {
    let n = index.node_count();
    let mut marks = vec![Mark::Unvisited; n];
    let mut order = Vec::with_capacity(n);
    // (node, next predecessor to look at)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for seed in 0..n {
        if marks[seed] != Mark::Unvisited {
            continue;
        }
        marks[seed] = Mark::InProgress;
        stack.push((seed, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            match index.predecessors(node).get(cursor).copied() {
                Some(pred) => {
                    frame.1 += 1;
                    match marks[pred] {
                        Mark::Unvisited => {
                            marks[pred] = Mark::InProgress;
                            stack.push((pred, 0));
                        }
                        Mark::InProgress => return Err(cycle_error(index, &stack, pred)),
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    order.push(node);
                    stack.pop();
                }
            }
        }
    }

    Ok(order)
}

/// Rebuild the cycle from the in-progress part of the stack.
///
/// Each stack frame depends on the frame above it, so reading the frames
/// from the top down gives the cycle in transition direction.
fn cycle_error(index: &IndexMap, stack: &[(usize, usize)], closing: usize) -> GraphError {
    let start = stack
        .iter()
        .position(|&(node, _)| node == closing)
        .unwrap_or(0);
    let mut path = Vec::with_capacity(stack.len() - start + 1);
    path.push(index.node_id(closing).clone());
    for &(node, _) in stack[start + 1..].iter().rev() {
        path.push(index.node_id(node).clone());
    }
    path.push(index.node_id(closing).clone());
    GraphError::Cycle { path }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::builder::GraphBuilder;
    use proptest::prelude::*;

    /// Random DAGs: edges only go from a lower to a higher index, then the
    /// node declaration order is shuffled by `rotation`.
    fn dag() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, usize)> {
        (1usize..24).prop_flat_map(|n| {
            let edges = prop::collection::vec((0..n, 0..n), 0..n * 2).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| (a.min(b), a.max(b)))
                    .collect::<Vec<_>>()
            });
            (Just(n), edges, 0..n)
        })
    }

    proptest! {
        #[test]
        fn every_node_once_and_edges_respected((n, edges, rotation) in dag()) {
            let mut builder = GraphBuilder::new();
            for k in 0..n {
                let i = (k + rotation) % n;
                builder.add_node(format!("n{i}"), "sum");
            }
            for (a, b) in &edges {
                builder.add_transition(format!("n{a}"), format!("n{b}"));
            }
            let graph = builder.build().unwrap();

            let order = topological_order(&graph).unwrap();
            prop_assert_eq!(order.len(), n);

            let position = |id: &NodeId| order.iter().position(|o| o == id);
            for node in graph.nodes() {
                prop_assert!(position(&node.id).is_some());
            }
            for edge in graph.edges() {
                prop_assert!(position(&edge.from) < position(&edge.to));
            }
        }
    }
}
