//! One entry point per schema for the whole reconciliation pipeline.
//!
//! Holds the schema-derived defaults and required fields (read-only after
//! construction) plus options, and runs:
//!
//! - display: defaults merged under user edits
//! - canonical: user edits minus empty and default-equal noise
//! - accept_suggestion: suggestion reconciled into the display tree
//! - diff: field-level comparison of two canonical snapshots
//!
//! The engine is `Send + Sync` and holds no mutable state, so one instance
//! can serve any number of threads.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::canonical::{canonicalize_with, filter_empty_values_with};
use crate::diff::{diff_with, DiffField};
use crate::error::Result;
use crate::merge::merge_defaults_with;
use crate::options::ReconcileOptions;
use crate::reconcile::reconcile_with;
use crate::schema::SchemaDefaults;
use crate::value::{ConfigTree, DefaultsMap, RequiredFields};

#[derive(Debug, Clone, Default)]
pub struct ConfigEngine {
    schema: SchemaDefaults,
    options: ReconcileOptions,
}

impl ConfigEngine {
    pub fn new(schema: SchemaDefaults) -> Self {
        Self {
            schema,
            options: ReconcileOptions::default(),
        }
    }

    /// Build from a raw module schema; a missing schema gives an engine that
    /// treats every field as significant.
    pub fn from_schema(schema: &Value) -> Self {
        let extracted = SchemaDefaults::from_schema(schema);
        if extracted.is_empty() {
            debug!("no defaults or required fields known, filtering only empty values");
        }
        Self::new(extracted)
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn defaults(&self) -> &DefaultsMap {
        &self.schema.defaults
    }

    pub fn required(&self) -> &RequiredFields {
        &self.schema.required
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Full tree for rendering forms and giving suggestion sources context.
    #[instrument(level = "trace", skip_all)]
    pub fn display(&self, user: &ConfigTree) -> Result<ConfigTree> {
        merge_defaults_with(&self.schema.defaults, user, &self.options)
    }

    /// Minimal tree for persistence and the JSON view.
    #[instrument(level = "trace", skip_all)]
    pub fn canonical(&self, user: &ConfigTree) -> Result<ConfigTree> {
        canonicalize_with(user, &self.schema.defaults, &self.schema.required, &self.options)
    }

    /// Tree with empty values dropped but defaults left in place.
    pub fn without_empty(&self, user: &ConfigTree) -> Result<ConfigTree> {
        filter_empty_values_with(user, &self.schema.required, &self.options)
    }

    /// Accept a suggestion against what the user currently sees.
    ///
    /// The suggestion is reconciled into the display tree, so defaulted
    /// fields the suggestion does not mention stay visible and user-added
    /// nested fields survive. Run [`Self::canonical`] on the result before
    /// storing it.
    #[instrument(level = "trace", skip_all)]
    pub fn accept_suggestion(&self, user: &ConfigTree, suggestion: &ConfigTree) -> Result<ConfigTree> {
        let display = self.display(user)?;
        reconcile_with(&display, suggestion, &self.options)
    }

    /// Compare two canonical snapshots.
    pub fn diff(&self, old: &ConfigTree, new: &ConfigTree) -> Vec<DiffField> {
        diff_with(old, new, self.options.equality)
    }
}
