//! Field-level and path-level diffs between configuration snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::options::ReconcileOptions;
use crate::value::{descend, values_equal, ConfigTree, EqualityMode};

/// Classification of one key (or path) between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl DiffKind {
    /// Marker used in review listings.
    pub fn symbol(self) -> char {
        match self {
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
            DiffKind::Modified => '~',
            DiffKind::Unchanged => '=',
        }
    }

    fn rank(self) -> u8 {
        match self {
            DiffKind::Added => 1,
            DiffKind::Removed => 2,
            DiffKind::Modified => 3,
            DiffKind::Unchanged => 4,
        }
    }
}

/// One top-level key's classification.
///
/// `old_value` is set for removed, modified and unchanged fields;
/// `new_value` for added, modified and unchanged fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffField {
    pub field: String,
    pub kind: DiffKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Compare two canonical trees key by key.
///
/// Every key of either tree is classified exactly once, in old-tree order
/// followed by keys only the new tree has. Nested objects are compared whole:
/// any change inside reports the top-level key as modified with both full
/// sub-trees attached.
pub fn diff(old: &ConfigTree, new: &ConfigTree) -> Vec<DiffField> {
    diff_with(old, new, EqualityMode::default())
}

/// [`diff`] where either side may be missing; a missing side is empty.
pub fn diff_optional(old: Option<&ConfigTree>, new: Option<&ConfigTree>) -> Vec<DiffField> {
    let empty = ConfigTree::new();
    diff(old.unwrap_or(&empty), new.unwrap_or(&empty))
}

/// [`diff`] with an explicit equality mode.
#[instrument(level = "trace", name = "diff", skip_all, fields(old = old.len(), new = new.len()))]
pub fn diff_with(old: &ConfigTree, new: &ConfigTree, equality: EqualityMode) -> Vec<DiffField> {
    let mut fields = Vec::with_capacity(old.len() + new.len());

    for (key, old_value) in old {
        let field = match new.get(key) {
            None => DiffField {
                field: key.clone(),
                kind: DiffKind::Removed,
                old_value: Some(old_value.clone()),
                new_value: None,
            },
            Some(new_value) => {
                let kind = if values_equal(old_value, new_value, equality) {
                    DiffKind::Unchanged
                } else {
                    DiffKind::Modified
                };
                DiffField {
                    field: key.clone(),
                    kind,
                    old_value: Some(old_value.clone()),
                    new_value: Some(new_value.clone()),
                }
            }
        };
        fields.push(field);
    }

    for (key, new_value) in new {
        if !old.contains_key(key) {
            fields.push(DiffField {
                field: key.clone(),
                kind: DiffKind::Added,
                old_value: None,
                new_value: Some(new_value.clone()),
            });
        }
    }

    fields
}

/// Stable reorder: added, removed, modified, then unchanged.
pub fn sort_by_kind(fields: &mut [DiffField]) {
    fields.sort_by_key(|f| f.kind.rank());
}

/// Per-kind counts of a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn from_fields(fields: &[DiffField]) -> Self {
        Self::from_kinds(fields.iter().map(|f| f.kind))
    }

    pub fn from_paths(paths: &[PathDiff]) -> Self {
        Self::from_kinds(paths.iter().map(|p| p.kind))
    }

    fn from_kinds(kinds: impl Iterator<Item = DiffKind>) -> Self {
        let mut summary = Self::default();
        for kind in kinds {
            match kind {
                DiffKind::Added => summary.added += 1,
                DiffKind::Removed => summary.removed += 1,
                DiffKind::Modified => summary.modified += 1,
                DiffKind::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }

    pub fn has_changes(&self) -> bool {
        self.added + self.removed + self.modified > 0
    }
}

/// One changed leaf or subtree found by [`deep_diff`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDiff {
    /// Dotted object path with `[i]` array indices; empty for the root.
    pub path: String,
    pub kind: DiffKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// Walk both values in step and report every differing path.
///
/// Objects and arrays recurse; `null` on one side reports the other side as
/// added or removed; mismatched types or unequal scalars are modified. Equal
/// leaves are not reported.
pub fn deep_diff(old: &Value, new: &Value) -> Result<Vec<PathDiff>> {
    deep_diff_with(old, new, &ReconcileOptions::default())
}

/// [`deep_diff`] with explicit options.
#[instrument(level = "trace", name = "deep_diff", skip_all)]
pub fn deep_diff_with(old: &Value, new: &Value, options: &ReconcileOptions) -> Result<Vec<PathDiff>> {
    let mut out = Vec::new();
    walk(old, new, String::new(), 0, options, &mut out)?;
    Ok(out)
}

fn walk(
    old: &Value,
    new: &Value,
    path: String,
    depth: usize,
    options: &ReconcileOptions,
    out: &mut Vec<PathDiff>,
) -> Result<()> {
    match (old, new) {
        (Value::Null, Value::Null) => {}
        (Value::Null, _) => out.push(PathDiff {
            path,
            kind: DiffKind::Added,
            old_value: None,
            new_value: Some(new.clone()),
        }),
        (_, Value::Null) => out.push(PathDiff {
            path,
            kind: DiffKind::Removed,
            old_value: Some(old.clone()),
            new_value: None,
        }),
        (Value::Array(olds), Value::Array(news)) => {
            let next = descend(depth, options.max_depth)?;
            for i in 0..olds.len().max(news.len()) {
                let item_path = format!("{path}[{i}]");
                match (olds.get(i), news.get(i)) {
                    (Some(o), Some(n)) => walk(o, n, item_path, next, options, out)?,
                    (None, Some(n)) => out.push(PathDiff {
                        path: item_path,
                        kind: DiffKind::Added,
                        old_value: None,
                        new_value: Some(n.clone()),
                    }),
                    (Some(o), None) => out.push(PathDiff {
                        path: item_path,
                        kind: DiffKind::Removed,
                        old_value: Some(o.clone()),
                        new_value: None,
                    }),
                    (None, None) => {}
                }
            }
        }
        (Value::Object(olds), Value::Object(news)) => {
            let next = descend(depth, options.max_depth)?;
            for (key, o) in olds {
                let key_path = join_key(&path, key);
                match news.get(key) {
                    Some(n) => walk(o, n, key_path, next, options, out)?,
                    None => out.push(PathDiff {
                        path: key_path,
                        kind: DiffKind::Removed,
                        old_value: Some(o.clone()),
                        new_value: None,
                    }),
                }
            }
            for (key, n) in news {
                if !olds.contains_key(key) {
                    out.push(PathDiff {
                        path: join_key(&path, key),
                        kind: DiffKind::Added,
                        old_value: None,
                        new_value: Some(n.clone()),
                    });
                }
            }
        }
        _ => {
            if !values_equal(old, new, options.equality) {
                out.push(PathDiff {
                    path,
                    kind: DiffKind::Modified,
                    old_value: Some(old.clone()),
                    new_value: Some(new.clone()),
                });
            }
        }
    }
    Ok(())
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Render a value for a review listing: strings quoted, containers
/// pretty-printed.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}
