//! Per-run output store.

use std::collections::HashMap;

use dm_core::{NodeId, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{ExecError, ExecResult};

/// Outputs of one run, keyed by node id.
///
/// Append-only: each node is recorded at most once. Iteration follows record
/// order. Equality compares values only, so a sequential and a parallel run of
/// the same graph compare equal.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    values: HashMap<NodeId, Value>,
    order: Vec<NodeId>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Record the output of `node`; fails if it was already recorded.
    pub fn record(&mut self, node: NodeId, value: Value) -> ExecResult<()> {
        if self.values.contains_key(&node) {
            return Err(ExecError::AlreadyExecuted { node });
        }
        self.values.insert(node.clone(), value);
        self.order.push(node);
        Ok(())
    }

    pub fn get(&self, node: &str) -> Option<Value> {
        self.values.get(node).copied()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.values.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node ids in the order their outputs were recorded.
    pub fn record_order(&self) -> &[NodeId] {
        &self.order
    }

    /// `(node, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Value)> + '_ {
        self.order.iter().map(|id| (id, self.values[id]))
    }
}

impl PartialEq for Outputs {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Outputs {}

impl Serialize for Outputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, value) in self.iter() {
            map.serialize_entry(id, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn record_is_write_once() {
        let mut outputs = Outputs::new();
        outputs.record(id("R"), 15).unwrap();
        assert_eq!(
            outputs.record(id("R"), 16),
            Err(ExecError::AlreadyExecuted { node: id("R") })
        );
        assert_eq!(outputs.get("R"), Some(15));
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn equality_ignores_record_order() {
        let mut a = Outputs::new();
        a.record(id("x"), 1).unwrap();
        a.record(id("y"), 2).unwrap();
        let mut b = Outputs::new();
        b.record(id("y"), 2).unwrap();
        b.record(id("x"), 1).unwrap();

        assert_eq!(a, b);
        assert_ne!(a.record_order(), b.record_order());
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut outputs = Outputs::new();
        outputs.record(id("R"), 15).unwrap();
        outputs.record(id("L"), 30).unwrap();

        let json = serde_json::to_string(&outputs).unwrap();
        assert_eq!(json, r#"{"R":15,"L":30}"#);
    }
}
