//! Configuration reconciliation engine.
//!
//! Reconciles three sources of configuration values (schema defaults, user
//! edits and machine suggestions) into display and canonical trees, and
//! diffs canonical snapshots for review. Every operation is a pure function
//! over `serde_json` trees.

pub mod canonical;
pub mod diff;
pub mod editor;
pub mod engine;
pub mod error;
pub mod merge;
pub mod options;
pub mod reconcile;
pub mod schema;
pub mod value;
pub mod version;

pub use canonical::{canonicalize, filter_empty_values};
pub use diff::{deep_diff, diff, sort_by_kind, DiffField, DiffKind, DiffSummary, PathDiff};
pub use editor::JsonEditor;
pub use engine::ConfigEngine;
pub use error::{ReconcileError, Result};
pub use merge::merge_defaults;
pub use options::ReconcileOptions;
pub use reconcile::{reconcile, strip_empty_strings};
pub use schema::{extract_defaults, extract_required, SchemaDefaults};
pub use value::{ConfigTree, DefaultsMap, EqualityMode, RequiredFields};
pub use version::{diff_versions, module_config_from_code};
