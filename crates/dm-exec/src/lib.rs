//! Execution engine for dagman graphs.
//!
//! Walks a graph in dependency order, feeds each node the outputs of its
//! predecessors (the root gets the external starting value) and records the
//! node's result.
//!
//! # Architecture
//!
//! - [`Plan`] resolves order, root and leaf up front so configuration errors
//!   surface before anything runs
//! - [`Engine::run`] is the sequential reference walk over an explicit order
//! - [`Engine::run_parallel`] dispatches nodes on a rayon pool as soon as all
//!   of their predecessors have produced a value
//! - [`NodeObserver`] receives one event per executed node
//!
//! Both modes produce identical values; only the record order of
//! [`Outputs`] may differ.

pub mod engine;
pub mod error;
pub mod observer;
pub mod outputs;
pub mod parallel;
pub mod plan;

pub use engine::{Engine, ExecutionMode, RunOptions, RunOutcome};
pub use error::{ExecError, ExecResult};
pub use observer::{NodeEvent, NodeObserver, NoopObserver, TracingObserver};
pub use outputs::Outputs;
pub use plan::Plan;
