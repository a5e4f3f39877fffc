//! Deep merge of user edits over schema defaults.

use serde_json::Value;
use tracing::{instrument, trace};

use crate::error::Result;
use crate::options::ReconcileOptions;
use crate::value::{descend, ConfigTree, DefaultsMap};

/// Overlay `user` on top of `defaults`, producing the display tree.
///
/// Objects on both sides recurse, so fields a user adds inside a defaulted
/// object survive. Anything else (arrays, scalars, `null`, type mismatches)
/// from the user replaces the default outright. Every defaulted key and every
/// user key is present in the result.
pub fn merge_defaults(defaults: &DefaultsMap, user: &ConfigTree) -> Result<ConfigTree> {
    merge_defaults_with(defaults, user, &ReconcileOptions::default())
}

/// [`merge_defaults`] with explicit options.
#[instrument(level = "trace", name = "merge_defaults", skip_all, fields(defaults = defaults.len(), user = user.len()))]
pub fn merge_defaults_with(defaults: &DefaultsMap, user: &ConfigTree, options: &ReconcileOptions) -> Result<ConfigTree> {
    merge_level(defaults, user, 0, options.max_depth)
}

fn merge_level(defaults: &ConfigTree, user: &ConfigTree, depth: usize, limit: usize) -> Result<ConfigTree> {
    let mut result = defaults.clone();

    for (key, user_value) in user {
        let merged = match (result.get(key), user_value) {
            (Some(Value::Object(default_map)), Value::Object(user_map)) => {
                trace!(key = %key, "merging nested object");
                Value::Object(merge_level(default_map, user_map, descend(depth, limit)?, limit)?)
            }
            _ => user_value.clone(),
        };
        result.insert(key.clone(), merged);
    }

    Ok(result)
}
