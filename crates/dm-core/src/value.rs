use crate::CoreError;

/// Integer type carried along every edge of the graph.
pub type Value = i64;

/// 2^63, the first float that no longer fits into `Value`.
const VALUE_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Narrow a float to `Value`, truncating toward zero.
///
/// Fails instead of saturating when `v` is NaN, infinite, or outside the
/// range of `Value` after truncation.
pub fn truncate_to_value(v: f64, what: &'static str) -> Result<Value, CoreError> {
    if !v.is_finite() {
        return Err(CoreError::NonFinite { what, value: v });
    }
    let t = v.trunc();
    if t < -VALUE_LIMIT || t >= VALUE_LIMIT {
        return Err(CoreError::OutOfRange { what, value: v });
    }
    Ok(t as Value)
}
