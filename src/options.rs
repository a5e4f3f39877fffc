//! Engine options.

use serde::{Deserialize, Serialize};

use crate::value::EqualityMode;

/// Matches serde_json's own parser recursion limit, so any tree produced by
/// parsing JSON text fits.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Tunables shared by every engine operation.
///
/// Callers load these however they like (they are serde-deserialisable with
/// per-field defaults); the engine itself reads no environment or files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Maximum object/array nesting the recursive operations will descend.
    pub max_depth: usize,
    /// How "equals the default" and "old equals new" are decided.
    pub equality: EqualityMode,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            equality: EqualityMode::Structural,
        }
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the equality mode.
    pub fn with_equality(mut self, equality: EqualityMode) -> Self {
        self.equality = equality;
        self
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ReconcileOptions::default();
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(opts.equality, EqualityMode::Structural);
    }

    #[test]
    fn test_builder() {
        let opts = ReconcileOptions::new()
            .with_max_depth(8)
            .with_equality(EqualityMode::Serialized);
        assert_eq!(opts.max_depth, 8);
        assert_eq!(opts.equality, EqualityMode::Serialized);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let opts: ReconcileOptions = serde_json::from_str(r#"{"max_depth": 16}"#).unwrap();
        assert_eq!(opts.max_depth, 16);
        assert_eq!(opts.equality, EqualityMode::Structural);
    }

    #[test]
    fn test_equality_mode_deserialization() {
        let opts: ReconcileOptions = serde_json::from_str(r#"{"equality": "serialized"}"#).unwrap();
        assert_eq!(opts.equality, EqualityMode::Serialized);
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
    }
}
