//! Value model shared by every engine operation.
//!
//! Configuration trees are plain `serde_json` values. The crate enables
//! `preserve_order`, so object keys keep insertion order; that order drives
//! diff output and the key order of canonical trees. An absent key is the
//! only notion of "undefined"; `null` is a present value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{ReconcileError, Result};

/// An object-shaped configuration tree.
pub type ConfigTree = Map<String, Value>;

/// Field name to declared default, read from a schema's top-level properties.
pub type DefaultsMap = ConfigTree;

/// Ordered, de-duplicated list of field names a schema marks mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredFields(Vec<String>);

impl RequiredFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    /// Add a field unless it is already listed.
    pub fn insert(&mut self, field: impl Into<String>) {
        let field = field.into();
        if !self.contains(&field) {
            self.0.push(field);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RequiredFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut fields = Self::new();
        for field in iter {
            fields.insert(field);
        }
        fields
    }
}

/// How two values are compared when deciding "equals the default" or
/// "unchanged between versions".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqualityMode {
    /// Deep comparison: object key order is ignored, arrays compare
    /// element-wise, numbers compare by numeric value.
    #[default]
    Structural,
    /// Compare compact JSON serialisations. Key-order-sensitive; kept for
    /// callers that depend on the legacy behaviour. Whole-valued floats are
    /// written as integers first, so `1` and `1.0` still match.
    Serialized,
}

/// `null`, `""`, `[]` and `{}` are empty. `false` and `0` are not.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Objects only; arrays are never treated as mergeable maps.
pub fn is_plain_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Short type name for messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Compare two values under the given mode.
pub fn values_equal(a: &Value, b: &Value, mode: EqualityMode) -> bool {
    match mode {
        EqualityMode::Structural => structurally_equal(a, b),
        EqualityMode::Serialized => {
            match (serde_json::to_string(&integral_floats(a)), serde_json::to_string(&integral_floats(b))) {
                (Ok(left), Ok(right)) => left == right,
                _ => false,
            }
        }
    }
}

// Largest magnitude below which every whole f64 is an exact integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Copy of `value` with whole-valued floats rewritten as integers, matching
/// how JavaScript prints numbers.
fn integral_floats(value: &Value) -> Value {
    match value {
        Value::Number(n) if !n.is_i64() && !n.is_u64() => match n.as_f64() {
            Some(x) if x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER => Value::from(x as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(integral_floats).collect()),
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), integral_floats(v))).collect()),
        _ => value.clone(),
    }
}

/// Order-insensitive deep equality, walked with an explicit stack so that
/// arbitrarily deep trees cannot overflow the call stack.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    let mut pending = vec![(a, b)];
    while let Some((left, right)) = pending.pop() {
        match (left, right) {
            (Value::Null, Value::Null) => {}
            (Value::Bool(x), Value::Bool(y)) => {
                if x != y {
                    return false;
                }
            }
            (Value::Number(x), Value::Number(y)) => {
                if !numbers_equal(x, y) {
                    return false;
                }
            }
            (Value::String(x), Value::String(y)) => {
                if x != y {
                    return false;
                }
            }
            (Value::Array(xs), Value::Array(ys)) => {
                if xs.len() != ys.len() {
                    return false;
                }
                pending.extend(xs.iter().zip(ys.iter()));
            }
            (Value::Object(xs), Value::Object(ys)) => {
                if xs.len() != ys.len() {
                    return false;
                }
                for (key, x) in xs {
                    match ys.get(key) {
                        Some(y) => pending.push((x, y)),
                        None => return false,
                    }
                }
            }
            _ => return false,
        }
    }
    true
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Step one nesting level down, failing once `limit` is passed.
pub(crate) fn descend(depth: usize, limit: usize) -> Result<usize> {
    let next = depth + 1;
    if next > limit {
        return Err(ReconcileError::DepthExceeded { limit });
    }
    Ok(next)
}
