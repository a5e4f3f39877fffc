//! Full pipeline tests: schema, display, suggestion, storage and review.

use std::collections::BTreeMap;

use config_reconcile::schema::module_schema_for;
use config_reconcile::{
    canonicalize, deep_diff, diff, merge_defaults, reconcile, sort_by_kind, ConfigEngine, ConfigTree, DiffKind,
    DiffSummary, JsonEditor, ReconcileError, SchemaDefaults,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

fn tree(value: Value) -> ConfigTree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn bucket_schema() -> Value {
    json!({
        "openapi_schema": {
            "components": {
                "schemas": {
                    "ModuleInput": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": {"type": "string"},
                            "region": {"type": "string", "default": "us-east-1"},
                            "versioning": {"type": "boolean", "default": false},
                            "lifecycle_days": {"type": "integer", "default": 30},
                            "tags": {"type": "object", "default": {}},
                            "cors": {"type": "array", "default": []}
                        }
                    }
                }
            }
        }
    })
}

// --- Canonical storage ---

#[test]
fn test_canonical_drops_defaults_and_keeps_required() {
    let schema = SchemaDefaults::from_schema(&json!({
        "openapi_schema": {"components": {"schemas": {"ModuleInput": {
            "required": ["name"],
            "properties": {"region": {"default": "us-east-1"}, "tags": {"default": {}}}
        }}}}
    }));
    let user = tree(json!({"region": "us-east-1", "name": "x"}));
    let canonical = canonicalize(&user, &schema.defaults, &schema.required).unwrap();
    assert_eq!(Value::Object(canonical), json!({"name": "x"}));
}

#[test]
fn test_canonical_fills_missing_required() {
    let schema = SchemaDefaults::from_schema(&bucket_schema());
    let canonical = canonicalize(&ConfigTree::new(), &schema.defaults, &schema.required).unwrap();
    assert_eq!(Value::Object(canonical), json!({"name": ""}));
}

#[test]
fn test_display_then_canonical_restores_user_intent() {
    let engine = ConfigEngine::from_schema(&bucket_schema());
    let user = tree(json!({"name": "logs", "versioning": true, "tags": {"env": "prod"}}));

    let display = engine.display(&user).unwrap();
    for key in ["name", "region", "versioning", "lifecycle_days", "tags", "cors"] {
        assert!(display.contains_key(key), "display is missing {key}");
    }

    let canonical = engine.canonical(&display).unwrap();
    assert_eq!(
        Value::Object(canonical),
        json!({"name": "logs", "versioning": true, "tags": {"env": "prod"}})
    );
}

// --- Suggestions ---

#[test]
fn test_suggestion_blank_does_not_clobber_user_value() {
    let user = tree(json!({"tags": {"env": "prod"}}));
    let suggestion = tree(json!({"tags": {"env": "", "owner": "team-a"}}));
    let merged = reconcile(&user, &suggestion).unwrap();
    assert_eq!(Value::Object(merged), json!({"tags": {"env": "prod", "owner": "team-a"}}));
}

#[test]
fn test_suggestion_flow_through_engine() {
    let engine = ConfigEngine::from_schema(&bucket_schema());
    let user = tree(json!({"name": "logs", "custom_field": "mine"}));
    let suggestion = tree(json!({
        "name": "",
        "versioning": true,
        "lifecycle_days": 90,
        "cors": [{"origin": "*"}],
        "tags": {"env": "prod", "cost-center": ""}
    }));

    let accepted = engine.accept_suggestion(&user, &suggestion).unwrap();
    assert_eq!(accepted["name"], json!("logs"));
    assert_eq!(accepted["custom_field"], json!("mine"));
    assert_eq!(accepted["region"], json!("us-east-1"));

    let stored = engine.canonical(&accepted).unwrap();
    assert_eq!(
        Value::Object(stored),
        json!({
            "name": "logs",
            "versioning": true,
            "lifecycle_days": 90,
            "tags": {"env": "prod"},
            "cors": [{"origin": "*"}],
            "custom_field": "mine"
        })
    );
}

// --- Version review ---

#[test]
fn test_diff_between_snapshots() {
    let old = tree(json!({"a": 1, "b": {"x": 1}}));
    let new = tree(json!({"b": {"x": 2}, "c": 3}));
    let fields = diff(&old, &new);

    let listed: Vec<(&str, DiffKind)> = fields.iter().map(|f| (f.field.as_str(), f.kind)).collect();
    assert_eq!(
        listed,
        vec![("a", DiffKind::Removed), ("b", DiffKind::Modified), ("c", DiffKind::Added)]
    );
    assert_eq!(fields[0].old_value, Some(json!(1)));
    assert_eq!(fields[1].old_value, Some(json!({"x": 1})));
    assert_eq!(fields[1].new_value, Some(json!({"x": 2})));
    assert_eq!(fields[2].new_value, Some(json!(3)));
}

#[test]
fn test_review_listing_of_stored_versions() {
    let engine = ConfigEngine::from_schema(&bucket_schema());
    let v1 = engine
        .canonical(&tree(json!({"name": "logs", "region": "us-east-1", "tags": {"env": "dev"}})))
        .unwrap();
    let v2 = engine
        .canonical(&tree(json!({"name": "logs", "region": "eu-west-1", "versioning": true})))
        .unwrap();

    let mut fields = engine.diff(&v1, &v2);
    sort_by_kind(&mut fields);
    let listed: Vec<(&str, DiffKind)> = fields.iter().map(|f| (f.field.as_str(), f.kind)).collect();
    assert_eq!(
        listed,
        vec![
            ("region", DiffKind::Added),
            ("versioning", DiffKind::Added),
            ("tags", DiffKind::Removed),
            ("name", DiffKind::Unchanged),
        ]
    );

    let summary = DiffSummary::from_fields(&fields);
    assert_eq!((summary.added, summary.removed, summary.modified, summary.unchanged), (2, 1, 0, 1));

    let paths = deep_diff(&Value::Object(v1), &Value::Object(v2)).unwrap();
    let listed: Vec<&str> = paths.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(listed, vec!["tags", "region", "versioning"]);
}

// --- Editor surface ---

#[test]
fn test_editor_rejects_invalid_json_and_keeps_tree() {
    let engine = ConfigEngine::from_schema(&bucket_schema());
    let mut editor = JsonEditor::new(tree(json!({"name": "logs"})));

    let err = editor.apply_text(r#"{"name": "logs", "region": }"#).unwrap_err();
    assert!(matches!(err, ReconcileError::Parse { line: 1, .. }));
    assert_eq!(Value::Object(editor.tree().clone()), json!({"name": "logs"}));

    editor.apply_text(r#"{"name": "logs", "region": "ap-south-1"}"#).unwrap();
    let stored = engine.canonical(editor.tree()).unwrap();
    assert_eq!(Value::Object(stored), json!({"name": "logs", "region": "ap-south-1"}));
}

// --- Typed schemas ---

#[derive(Serialize, Deserialize, JsonSchema)]
struct QueueInput {
    name: String,
    #[serde(default = "default_retention")]
    retention_seconds: u32,
    #[serde(default)]
    fifo: bool,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

fn default_retention() -> u32 {
    345_600
}

#[test]
fn test_typed_schema_drives_the_pipeline() {
    let engine = ConfigEngine::from_schema(&module_schema_for::<QueueInput>());
    assert!(engine.required().contains("name"));
    assert_eq!(engine.defaults()["retention_seconds"], json!(345_600));

    let user = tree(json!({"name": "jobs", "retention_seconds": 345_600, "fifo": true}));
    let stored = engine.canonical(&user).unwrap();
    assert_eq!(Value::Object(stored), json!({"name": "jobs", "fifo": true}));
}

// --- Pathological input ---

#[test]
fn test_deep_nesting_reports_depth_exceeded() {
    let mut nested = json!("leaf");
    for _ in 0..200 {
        let mut level = ConfigTree::new();
        level.insert("n".to_string(), nested);
        nested = Value::Object(level);
    }
    let mut user = ConfigTree::new();
    user.insert("root".to_string(), nested);
    let defaults = tree(json!({}));

    assert!(matches!(
        canonicalize(&user, &defaults, &Default::default()),
        Err(ReconcileError::DepthExceeded { .. })
    ));
    assert!(matches!(
        reconcile(&ConfigTree::new(), &user),
        Err(ReconcileError::DepthExceeded { .. })
    ));
    // Merge only descends where both sides are objects.
    assert!(merge_defaults(&defaults, &user).is_ok());
    assert!(matches!(
        merge_defaults(&user, &user),
        Err(ReconcileError::DepthExceeded { .. })
    ));
}
