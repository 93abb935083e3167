//! Operation abstraction and the pieces a handler declares.

use core::fmt;

use dm_core::Value;

use crate::error::{OpError, OpResult};

/// How many upstream inputs an operation consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Numeric kind of a literal argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Integer,
    Float,
}

impl ArgKind {
    /// Parse a raw literal as this kind.
    pub fn parse(self, raw: &str) -> OpResult<Literal> {
        let invalid = || OpError::InvalidArgument {
            raw: raw.to_string(),
            expected: self,
        };
        match self {
            ArgKind::Integer => raw.parse().map(Literal::Integer).map_err(|_| invalid()),
            ArgKind::Float => raw.parse().map(Literal::Float).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Integer => f.write_str("integer"),
            ArgKind::Float => f.write_str("float"),
        }
    }
}

/// A parsed literal argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(Value),
    Float(f64),
}

impl Literal {
    /// Read the integer literal at `index`.
    pub fn integer(args: &[Literal], index: usize) -> OpResult<Value> {
        match args.get(index) {
            Some(Literal::Integer(v)) => Ok(*v),
            _ => Err(OpError::MissingArgument {
                index,
                expected: ArgKind::Integer,
            }),
        }
    }

    /// Read the float literal at `index`.
    pub fn float(args: &[Literal], index: usize) -> OpResult<f64> {
        match args.get(index) {
            Some(Literal::Float(v)) => Ok(*v),
            _ => Err(OpError::MissingArgument {
                index,
                expected: ArgKind::Float,
            }),
        }
    }
}

/// Operation text split into its name and raw literal arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> Invocation<'a> {
    /// Split `"multiply 2.5"` into `multiply` and `["2.5"]`.
    pub fn parse(text: &'a str) -> OpResult<Self> {
        let mut parts = text.split_whitespace();
        let name = parts.next().ok_or(OpError::Empty)?;
        Ok(Self {
            name,
            args: parts.collect(),
        })
    }
}

/// A named, pure computation a node can run.
///
/// Handlers declare their input arity and literal argument kinds; the
/// registry enforces both before `apply` is called, so `apply` only deals
/// with the arithmetic.
pub trait Operation: Send + Sync {
    /// Number of upstream values consumed.
    fn inputs(&self) -> Arity;

    /// Kinds of the literal arguments, in order.
    fn arguments(&self) -> &[ArgKind] {
        &[]
    }

    /// Compute the node output.
    fn apply(&self, args: &[Literal], inputs: &[Value]) -> OpResult<Value>;
}
