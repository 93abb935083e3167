//! Builtin arithmetic operations.
//!
//! `add` and `multiply` read only the first input; any further inputs are
//! ignored. `sum` folds over every input, including the root's single
//! starting value.

use dm_core::{Value, truncate_to_value};

use crate::error::{OpError, OpResult};
use crate::operation::{ArgKind, Arity, Literal, Operation};

/// `add <integer>`: first input plus the literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl Operation for Add {
    fn inputs(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn arguments(&self) -> &[ArgKind] {
        &[ArgKind::Integer]
    }

    fn apply(&self, args: &[Literal], inputs: &[Value]) -> OpResult<Value> {
        let amount = Literal::integer(args, 0)?;
        first(inputs, "add")?
            .checked_add(amount)
            .ok_or(OpError::Overflow { what: "add" })
    }
}

/// `multiply <float>`: first input times the literal, truncated toward zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply;

impl Operation for Multiply {
    fn inputs(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn arguments(&self) -> &[ArgKind] {
        &[ArgKind::Float]
    }

    fn apply(&self, args: &[Literal], inputs: &[Value]) -> OpResult<Value> {
        let factor = Literal::float(args, 0)?;
        let product = first(inputs, "multiply")? as f64 * factor;
        Ok(truncate_to_value(product, "multiply")?)
    }
}

/// `sum`: sum of all inputs (0 when there are none).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Operation for Sum {
    fn inputs(&self) -> Arity {
        Arity::AtLeast(0)
    }

    fn apply(&self, _args: &[Literal], inputs: &[Value]) -> OpResult<Value> {
        inputs
            .iter()
            .try_fold(0 as Value, |acc, &v| acc.checked_add(v))
            .ok_or(OpError::Overflow { what: "sum" })
    }
}

fn first(inputs: &[Value], name: &str) -> OpResult<Value> {
    inputs.first().copied().ok_or_else(|| OpError::InputCount {
        name: name.to_string(),
        expected: Arity::AtLeast(1),
        got: 0,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sum_matches_wide_addition(values in prop::collection::vec(-1_000_000_i64..1_000_000, 0..16)) {
            let expected: i128 = values.iter().map(|&v| v as i128).sum();
            prop_assert_eq!(Sum.apply(&[], &values).unwrap() as i128, expected);
        }

        #[test]
        fn multiply_by_integer_factor_is_exact(x in -1_000_000_i64..1_000_000, k in -100_i64..100) {
            let out = Multiply.apply(&[Literal::Float(k as f64)], &[x]).unwrap();
            prop_assert_eq!(out, x * k);
        }
    }
}
