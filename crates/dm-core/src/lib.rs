//! dm-core: stable foundation for dagman.
//!
//! Contains:
//! - ids (node identifiers shared by every crate)
//! - value (the integer type carried along edges + float narrowing)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod value;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::NodeId;
pub use value::*;
