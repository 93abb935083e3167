//! Name -> handler registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dm_core::Value;

use crate::builtin::{Add, Multiply, Sum};
use crate::error::{OpError, OpResult};
use crate::operation::{Invocation, Literal, Operation};

/// Registry of named operations.
///
/// Cloning is cheap: handlers are shared.
#[derive(Clone, Default)]
pub struct OperationRegistry {
    ops: HashMap<String, Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `add`, `multiply` and `sum`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("add", Add);
        registry.register("multiply", Multiply);
        registry.register("sum", Sum);
        registry
    }

    /// Register a handler, returning the one it replaces.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        op: impl Operation + 'static,
    ) -> Option<Arc<dyn Operation>> {
        self.ops.insert(name.into(), Arc::new(op))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Operation> {
        self.ops.get(name).map(|op| op.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ops.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Apply operation `name` to raw literal `args` and upstream `inputs`.
    pub fn apply(&self, name: &str, args: &[&str], inputs: &[Value]) -> OpResult<Value> {
        let op = self.lookup(name)?;
        let literals = Self::parse_args(name, op, args)?;
        let arity = op.inputs();
        if !arity.accepts(inputs.len()) {
            return Err(OpError::InputCount {
                name: name.to_string(),
                expected: arity,
                got: inputs.len(),
            });
        }
        op.apply(&literals, inputs)
    }

    /// Parse operation text such as `"add 5"` and apply it.
    pub fn invoke(&self, text: &str, inputs: &[Value]) -> OpResult<Value> {
        let invocation = Invocation::parse(text)?;
        self.apply(invocation.name, &invocation.args, inputs)
    }

    /// Check that operation text resolves and its literals parse,
    /// without evaluating anything.
    pub fn check(&self, text: &str) -> OpResult<()> {
        let invocation = Invocation::parse(text)?;
        let op = self.lookup(invocation.name)?;
        Self::parse_args(invocation.name, op, &invocation.args).map(|_| ())
    }

    fn lookup(&self, name: &str) -> OpResult<&dyn Operation> {
        self.get(name).ok_or_else(|| OpError::UnknownOperation {
            name: name.to_string(),
        })
    }

    fn parse_args(name: &str, op: &dyn Operation, args: &[&str]) -> OpResult<Vec<Literal>> {
        let kinds = op.arguments();
        if kinds.len() != args.len() {
            return Err(OpError::ArgumentCount {
                name: name.to_string(),
                expected: kinds.len(),
                got: args.len(),
            });
        }
        kinds
            .iter()
            .zip(args)
            .map(|(kind, raw)| kind.parse(raw))
            .collect()
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("ops", &self.names())
            .finish()
    }
}
