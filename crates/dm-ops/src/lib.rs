//! Operation registry for dagman nodes.
//!
//! Every node carries an operation text such as `"add 5"`: an operation name
//! followed by whitespace-separated literal arguments. The registry maps the
//! name to a handler, checks the literals and the number of upstream inputs
//! against what the handler declares, and then applies it.
//!
//! # Builtins
//!
//! - `add <integer>`: first input plus the literal
//! - `multiply <float>`: first input times the literal, truncated toward zero
//! - `sum`: sum of all inputs
//!
//! New operations implement [`Operation`] and are added with
//! [`OperationRegistry::register`]; the engine never needs to change.

pub mod builtin;
pub mod error;
pub mod operation;
pub mod registry;

pub use builtin::{Add, Multiply, Sum};
pub use error::{OpError, OpResult};
pub use operation::{ArgKind, Arity, Invocation, Literal, Operation};
pub use registry::OperationRegistry;
