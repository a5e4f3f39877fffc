//! Error types for configuration reconciliation.

use thiserror::Error;

/// Errors raised by the reconciliation engine and the editor surface.
///
/// Merge, filter, reconcile and diff never fail on data facts such as type
/// mismatches; the only engine failure is pathological nesting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Input nesting went deeper than the configured limit.
    #[error("[Config Reconcile] Nesting depth exceeded limit of {limit}")]
    DepthExceeded { limit: usize },

    /// Editor text is not valid JSON.
    #[error("[Config Reconcile] Invalid JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Editor text parsed, but the top level is not an object.
    #[error("[Config Reconcile] Expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
}

impl ReconcileError {
    /// Build a parse error from a `serde_json` failure, keeping its position.
    pub fn from_json(err: &serde_json::Error) -> Self {
        Self::Parse {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
