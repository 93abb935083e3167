//! Parallel execution.
//!
//! Each node carries a counter of predecessor outputs it is still waiting
//! for. A finished node decrements the counters of its successors and
//! spawns every successor whose counter reaches zero. Outputs go into one
//! write-once slot per node, so a node's value is published exactly once and
//! is visible to every dependent that gets dispatched afterwards.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use dm_core::{NodeId, Value};
use dm_graph::{Graph, IndexMap};

use crate::engine::{Engine, gather_inputs};
use crate::error::{ExecError, ExecResult};
use crate::observer::{NodeEvent, NodeObserver};
use crate::outputs::Outputs;

impl Engine {
    /// Run `graph` with independent nodes executing concurrently.
    ///
    /// Nodes without predecessors are seeded in declaration order; `root`
    /// receives `starting_value`. `threads` sizes a dedicated rayon pool
    /// (`None` uses rayon's default). On failure the first error is returned
    /// and no further node is dispatched; siblings already running may still
    /// finish.
    pub fn run_parallel(
        &self,
        graph: &Graph,
        root: &NodeId,
        starting_value: Value,
        threads: Option<usize>,
        observer: &dyn NodeObserver,
    ) -> ExecResult<Outputs> {
        let index = IndexMap::from_graph(graph);
        let root = index
            .node_idx(root.as_str())
            .map_err(|_| ExecError::UnknownNode {
                node: root.to_string(),
            })?;

        let scheduler = Scheduler::new(self, graph, index, root, starting_value, observer);
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build().map_err(|e| ExecError::ThreadPool {
            what: e.to_string(),
        })?;

        pool.install(|| {
            rayon::scope(|scope| {
                for seed in scheduler.seeds() {
                    scheduler.dispatch(scope, seed);
                }
            })
        });

        scheduler.finish()
    }
}

struct Scheduler<'a> {
    engine: &'a Engine,
    graph: &'a Graph,
    index: IndexMap,
    observer: &'a dyn NodeObserver,
    root: usize,
    starting_value: Value,
    /// Predecessor outputs each node is still waiting for.
    pending: Vec<AtomicUsize>,
    slots: Vec<OnceLock<Value>>,
    completed: Mutex<Vec<usize>>,
    failure: Mutex<Option<ExecError>>,
    aborted: AtomicBool,
}

impl<'a> Scheduler<'a> {
    fn new(
        engine: &'a Engine,
        graph: &'a Graph,
        index: IndexMap,
        root: usize,
        starting_value: Value,
        observer: &'a dyn NodeObserver,
    ) -> Self {
        let pending = index.in_degrees().into_iter().map(AtomicUsize::new).collect();
        let slots = (0..index.node_count()).map(|_| OnceLock::new()).collect();
        Self {
            engine,
            graph,
            completed: Mutex::new(Vec::with_capacity(index.node_count())),
            index,
            observer,
            root,
            starting_value,
            pending,
            slots,
            failure: Mutex::new(None),
            aborted: AtomicBool::new(false),
        }
    }

    fn seeds(&self) -> Vec<usize> {
        (0..self.index.node_count())
            .filter(|&i| self.index.predecessors(i).is_empty())
            .collect()
    }

    fn dispatch<'s>(&'s self, scope: &rayon::Scope<'s>, node: usize) {
        scope.spawn(move |scope| self.execute(scope, node));
    }

    fn execute<'s>(&'s self, scope: &rayon::Scope<'s>, node: usize) {
        if self.aborted.load(Ordering::Acquire) {
            return;
        }
        if let Err(err) = self.compute(node) {
            self.fail(err);
            return;
        }
        for &next in self.index.successors(node) {
            if self.pending[next].fetch_sub(1, Ordering::AcqRel) == 1 {
                self.dispatch(scope, next);
            }
        }
    }

    fn compute(&self, i: usize) -> ExecResult<()> {
        let id = self.index.node_id(i);
        let node = self
            .graph
            .node(id.as_str())
            .ok_or_else(|| ExecError::UnknownNode {
                node: id.to_string(),
            })?;

        let inputs = if i == self.root {
            vec![self.starting_value]
        } else {
            gather_inputs(self.graph, node, |dep| {
                let j = self.graph.position(dep.as_str())?;
                self.slots[j].get().copied()
            })?
        };
        let output = self.engine.execute_node(node, &inputs)?;
        self.slots[i]
            .set(output)
            .map_err(|_| ExecError::AlreadyExecuted {
                node: node.id.clone(),
            })?;
        self.observer.node_executed(&NodeEvent {
            node: &node.id,
            operation: &node.operation,
            inputs: &inputs,
            output,
        });
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(i);
        Ok(())
    }

    fn fail(&self, err: ExecError) {
        self.aborted.store(true, Ordering::Release);
        let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if failure.is_none() {
            tracing::debug!(error = %err, "parallel run aborted");
            *failure = Some(err);
        }
    }

    fn finish(self) -> ExecResult<Outputs> {
        if let Some(err) = self
            .failure
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
        {
            return Err(err);
        }

        let completed = self
            .completed
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let pending = self.index.node_count() - completed.len();
        if pending > 0 {
            return Err(ExecError::Stalled { pending });
        }

        let mut outputs = Outputs::with_capacity(completed.len());
        for i in completed {
            if let Some(&value) = self.slots[i].get() {
                outputs.record(self.index.node_id(i).clone(), value)?;
            }
        }
        tracing::debug!(executed = outputs.len(), "parallel run finished");
        Ok(outputs)
    }
}
