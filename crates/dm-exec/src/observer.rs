//! Per-node diagnostic hook.

use dm_core::{NodeId, Value};

/// One executed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEvent<'a> {
    pub node: &'a NodeId,
    pub operation: &'a str,
    pub inputs: &'a [Value],
    pub output: Value,
}

/// Receives an event after every successfully executed node.
///
/// `Sync` because the parallel engine calls it from worker threads.
pub trait NodeObserver: Sync {
    fn node_executed(&self, event: &NodeEvent<'_>);
}

impl<F> NodeObserver for F
where
    F: Fn(&NodeEvent<'_>) + Sync,
{
    fn node_executed(&self, event: &NodeEvent<'_>) {
        self(event)
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl NodeObserver for NoopObserver {
    fn node_executed(&self, _event: &NodeEvent<'_>) {}
}

/// Emits an `info` tracing event per node.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl NodeObserver for TracingObserver {
    fn node_executed(&self, event: &NodeEvent<'_>) {
        tracing::info!(
            node = %event.node,
            operation = event.operation,
            inputs = ?event.inputs,
            output = event.output,
            "executed node"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_graph::GraphBuilder;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[test]
    fn closures_are_observers() {
        let seen = Mutex::new(Vec::new());
        let observer = |event: &NodeEvent<'_>| {
            seen.lock().unwrap().push((event.node.to_string(), event.output));
        };

        let node = NodeId::new("R").unwrap();
        observer.node_executed(&NodeEvent {
            node: &node,
            operation: "add 5",
            inputs: &[10],
            output: 15,
        });

        assert_eq!(seen.into_inner().unwrap(), [("R".to_string(), 15)]);
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn tracing_observer_logs_every_node() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node("R", "add 1")
            .add_node("A", "multiply 3")
            .add_node("L", "sum");
        builder
            .add_transition("R", "A")
            .add_transition("R", "L")
            .add_transition("A", "L");
        let graph = builder.build().unwrap();
        let order = dm_graph::sort::topological_order(&graph).unwrap();

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let outputs = tracing::subscriber::with_default(subscriber, || {
            crate::Engine::with_builtins().run_observed(
                &graph,
                &order,
                &NodeId::new("R").unwrap(),
                2,
                &TracingObserver,
            )
        })
        .unwrap();
        assert_eq!(outputs.get("L"), Some(12));

        let log = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = log.lines().filter(|l| l.contains("executed node")).collect();
        assert_eq!(lines.len(), 3, "{log}");
        assert!(lines[0].contains("node=R"), "{log}");
        assert!(lines[2].contains("node=L"), "{log}");
        assert!(lines[2].contains("inputs=[3, 9]"), "{log}");
        assert!(lines[2].contains("output=12"), "{log}");
    }
}
