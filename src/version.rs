//! Configuration snapshots taken from stored resource versions.
//!
//! A stored version keeps the generated module code, shaped like
//! `{"module": {"<name>": [{"source": "...", ...inputs}]}}`, either as a JSON
//! value or as JSON text. Older versions use `modules` instead of `module`.
//! The inputs of the first module block are the snapshot that gets diffed.

use serde_json::Value;
use tracing::debug;

use crate::diff::{diff, DiffField};
use crate::value::ConfigTree;

/// Pull the module inputs out of a version's generated code.
///
/// Uses the first module entry and its first block, minus the `source` key.
/// A string is decoded as JSON first. Anything missing, mis-shaped or
/// undecodable yields an empty tree.
pub fn module_config_from_code(code: &Value) -> ConfigTree {
    if let Value::String(text) = code {
        return match serde_json::from_str::<Value>(text) {
            Ok(decoded) => module_config_from_code(&decoded),
            Err(err) => {
                debug!(error = %err, "version code is not valid JSON, treating snapshot as empty");
                ConfigTree::new()
            }
        };
    }

    let block = code
        .get("module")
        .or_else(|| code.get("modules"))
        .and_then(Value::as_object)
        .and_then(|modules| modules.values().next())
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first())
        .and_then(Value::as_object);

    match block {
        Some(block) => block
            .iter()
            .filter(|(key, _)| key.as_str() != "source")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => {
            debug!("version code has no module block, treating snapshot as empty");
            ConfigTree::new()
        }
    }
}

/// Diff the module inputs of two stored versions.
pub fn diff_versions(old_code: &Value, new_code: &Value) -> Vec<DiffField> {
    diff(&module_config_from_code(old_code), &module_config_from_code(new_code))
}
