//! Raw JSON editing surface over a configuration tree.

use serde_json::Value;
use tracing::debug;

use crate::error::{ReconcileError, Result};
use crate::value::{value_type_name, ConfigTree};

/// Holds the last valid tree behind a free-text JSON editor.
///
/// Invalid text never replaces the tree; the error is kept for an inline
/// indicator until a valid edit clears it.
#[derive(Debug, Clone, Default)]
pub struct JsonEditor {
    tree: ConfigTree,
    last_error: Option<ReconcileError>,
}

impl JsonEditor {
    pub fn new(tree: ConfigTree) -> Self {
        Self { tree, last_error: None }
    }

    /// The last valid tree.
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Error from the most recent rejected edit, if the latest edit failed.
    pub fn last_error(&self) -> Option<&ReconcileError> {
        self.last_error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.last_error.is_none()
    }

    /// Replace the tree programmatically, e.g. after a form edit.
    pub fn set_tree(&mut self, tree: ConfigTree) {
        self.tree = tree;
        self.last_error = None;
    }

    /// Pretty-printed text for the current tree.
    pub fn text(&self) -> String {
        serde_json::to_string_pretty(&self.tree).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse editor text and adopt it when it is a JSON object.
    pub fn apply_text(&mut self, text: &str) -> Result<&ConfigTree> {
        match parse_tree(text) {
            Ok(tree) => {
                self.tree = tree;
                self.last_error = None;
                Ok(&self.tree)
            }
            Err(err) => {
                debug!(error = %err, "rejecting editor text, keeping last valid tree");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

/// Parse text into an object tree, with line/column on failure.
pub fn parse_tree(text: &str) -> Result<ConfigTree> {
    let value: Value = serde_json::from_str(text).map_err(|e| ReconcileError::from_json(&e))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ReconcileError::NotAnObject {
            found: value_type_name(&other),
        }),
    }
}
