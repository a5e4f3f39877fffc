//! Canonical filtering: reduce a configuration tree to what is worth storing.
//!
//! The canonical tree drops everything that is empty or restates a schema
//! default, so re-merging it with the defaults rebuilds an equivalent display
//! tree. Required fields are the exception: they are always emitted, even
//! when empty, so consumers can surface the validation gap.

use serde_json::Value;
use tracing::{instrument, trace};

use crate::error::Result;
use crate::options::ReconcileOptions;
use crate::value::{descend, is_empty_value, is_plain_object, values_equal, ConfigTree, DefaultsMap, RequiredFields};

/// Strip empty and default-equal values from `data`, keeping `required`.
///
/// Output order is the required fields first (in list order, `""` standing
/// in for absent ones), then every other kept key in `data` order.
pub fn canonicalize(data: &ConfigTree, defaults: &DefaultsMap, required: &RequiredFields) -> Result<ConfigTree> {
    canonicalize_with(data, defaults, required, &ReconcileOptions::default())
}

/// [`canonicalize`] with explicit options.
#[instrument(level = "trace", name = "canonicalize", skip_all, fields(keys = data.len(), required = required.len()))]
pub fn canonicalize_with(
    data: &ConfigTree,
    defaults: &DefaultsMap,
    required: &RequiredFields,
    options: &ReconcileOptions,
) -> Result<ConfigTree> {
    let mut result = ConfigTree::new();

    for field in required.iter() {
        let value = data.get(field).cloned().unwrap_or_else(|| Value::String(String::new()));
        result.insert(field.to_string(), value);
    }

    for (key, value) in data {
        if required.contains(key) {
            continue;
        }
        if let Some(kept) = canonical_value(key, value, defaults, 0, options)? {
            result.insert(key.clone(), kept);
        }
    }

    Ok(result)
}

fn canonical_level(data: &ConfigTree, defaults: &ConfigTree, depth: usize, options: &ReconcileOptions) -> Result<ConfigTree> {
    let mut result = ConfigTree::new();
    for (key, value) in data {
        if let Some(kept) = canonical_value(key, value, defaults, depth, options)? {
            result.insert(key.clone(), kept);
        }
    }
    Ok(result)
}

/// Decide what, if anything, survives for one key.
fn canonical_value(
    key: &str,
    value: &Value,
    defaults: &ConfigTree,
    depth: usize,
    options: &ReconcileOptions,
) -> Result<Option<Value>> {
    if is_blank(value) {
        return Ok(None);
    }

    if let Value::Object(map) = value {
        let empty = ConfigTree::new();
        let nested_defaults = match defaults.get(key) {
            Some(Value::Object(nested)) => nested,
            _ => &empty,
        };
        let filtered = canonical_level(map, nested_defaults, descend(depth, options.max_depth)?, options)?;
        if filtered.is_empty() {
            trace!(key = %key, "dropping object left empty after filtering");
            return Ok(None);
        }
        return Ok(Some(Value::Object(filtered)));
    }

    if let Some(default) = defaults.get(key) {
        if values_equal(value, default, options.equality) {
            trace!(key = %key, "dropping value equal to default");
            return Ok(None);
        }
    }

    Ok(Some(value.clone()))
}

/// Drop empty values without consulting defaults.
///
/// `null`, `""` and `[]` go, objects are filtered recursively and dropped when
/// nothing is left. Required keys present in `data` are kept verbatim; absent
/// ones are not invented. `false` and `0` always survive.
pub fn filter_empty_values(data: &ConfigTree, required: &RequiredFields) -> Result<ConfigTree> {
    filter_empty_values_with(data, required, &ReconcileOptions::default())
}

/// [`filter_empty_values`] with explicit options.
#[instrument(level = "trace", name = "filter_empty_values", skip_all, fields(keys = data.len()))]
pub fn filter_empty_values_with(
    data: &ConfigTree,
    required: &RequiredFields,
    options: &ReconcileOptions,
) -> Result<ConfigTree> {
    filter_level(data, Some(required), 0, options.max_depth)
}

fn filter_level(data: &ConfigTree, required: Option<&RequiredFields>, depth: usize, limit: usize) -> Result<ConfigTree> {
    let mut result = ConfigTree::new();
    for (key, value) in data {
        if required.is_some_and(|r| r.contains(key)) {
            result.insert(key.clone(), value.clone());
            continue;
        }
        if is_blank(value) {
            continue;
        }
        if let Value::Object(map) = value {
            let filtered = filter_level(map, None, descend(depth, limit)?, limit)?;
            if !filtered.is_empty() {
                result.insert(key.clone(), Value::Object(filtered));
            }
            continue;
        }
        result.insert(key.clone(), value.clone());
    }
    Ok(result)
}

// Objects are not blank here; they are judged after their own filtering.
fn is_blank(value: &Value) -> bool {
    !is_plain_object(value) && is_empty_value(value)
}
