//! Suggestion reconciliation ("smart merge").
//!
//! Merges a suggested configuration (from an assistant, a bulk import or a
//! template) into what the user already has. Suggested values win where they
//! say something; they never plant empty strings and never erase fields the
//! suggestion does not mention.

use serde_json::Value;
use tracing::{instrument, trace};

use crate::error::Result;
use crate::options::ReconcileOptions;
use crate::value::{descend, ConfigTree};

/// Merge `suggestion` into `user`.
///
/// - A suggested `""` is skipped entirely.
/// - A suggested object is stripped of empty strings first and skipped if
///   nothing is left; it then recurses into a user object, or replaces
///   whatever the user had there.
/// - Any other suggested value (scalar, `null`, array) overwrites.
/// - Keys only the user has are kept verbatim.
pub fn reconcile(user: &ConfigTree, suggestion: &ConfigTree) -> Result<ConfigTree> {
    reconcile_with(user, suggestion, &ReconcileOptions::default())
}

/// [`reconcile`] with explicit options.
#[instrument(level = "trace", name = "reconcile", skip_all, fields(user = user.len(), suggestion = suggestion.len()))]
pub fn reconcile_with(user: &ConfigTree, suggestion: &ConfigTree, options: &ReconcileOptions) -> Result<ConfigTree> {
    reconcile_level(user, suggestion, 0, options.max_depth)
}

fn reconcile_level(user: &ConfigTree, suggestion: &ConfigTree, depth: usize, limit: usize) -> Result<ConfigTree> {
    let mut result = user.clone();

    for (key, suggested) in suggestion {
        match suggested {
            Value::String(s) if s.is_empty() => {
                trace!(key = %key, "skipping empty suggested string");
            }
            Value::Object(suggested_map) => {
                let next = descend(depth, limit)?;
                let stripped = strip_level(suggested_map, next, limit)?;
                if stripped.is_empty() {
                    trace!(key = %key, "skipping suggested object with no content");
                    continue;
                }
                let merged = match result.get(key) {
                    Some(Value::Object(user_map)) => reconcile_level(user_map, &stripped, next, limit)?,
                    _ => stripped,
                };
                result.insert(key.clone(), Value::Object(merged));
            }
            other => {
                result.insert(key.clone(), other.clone());
            }
        }
    }

    Ok(result)
}

/// Recursively drop `""` leaves, and any nested object that ends up empty.
///
/// Arrays are opaque values and pass through untouched.
pub fn strip_empty_strings(tree: &ConfigTree) -> Result<ConfigTree> {
    strip_empty_strings_with(tree, &ReconcileOptions::default())
}

/// [`strip_empty_strings`] with explicit options.
pub fn strip_empty_strings_with(tree: &ConfigTree, options: &ReconcileOptions) -> Result<ConfigTree> {
    strip_level(tree, 0, options.max_depth)
}

fn strip_level(tree: &ConfigTree, depth: usize, limit: usize) -> Result<ConfigTree> {
    let mut result = ConfigTree::new();
    for (key, value) in tree {
        match value {
            Value::String(s) if s.is_empty() => {}
            Value::Object(map) => {
                let stripped = strip_level(map, descend(depth, limit)?, limit)?;
                if !stripped.is_empty() {
                    result.insert(key.clone(), Value::Object(stripped));
                }
            }
            other => {
                result.insert(key.clone(), other.clone());
            }
        }
    }
    Ok(result)
}
