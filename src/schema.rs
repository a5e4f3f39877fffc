//! Default and required-field extraction from module schemas.
//!
//! A module schema carries its input definition at
//! `openapi_schema.components.schemas.ModuleInput`, with a flat `properties`
//! map and a `required` list. Only that top level is read; nested object
//! defaults are reached later through the deep merge.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::value::{ConfigTree, DefaultsMap, RequiredFields};

/// JSON pointer to the module input definition inside a module schema.
pub const MODULE_INPUT_POINTER: &str = "/openapi_schema/components/schemas/ModuleInput";

/// Defaults and required fields read from one schema version.
///
/// Callers cache this per schema version and hand it to every operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefaults {
    pub defaults: DefaultsMap,
    pub required: RequiredFields,
}

impl SchemaDefaults {
    /// The "no schema yet" state: nothing is defaulted, nothing is required.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_schema(schema: &Value) -> Self {
        Self {
            defaults: extract_defaults(schema),
            required: extract_required(schema),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.required.is_empty()
    }
}

/// Collect every top-level property that declares a `default`.
///
/// Presence decides, not truthiness: `false`, `0`, `""` and `null` defaults
/// are all recorded. A missing or malformed schema yields an empty map.
pub fn extract_defaults(schema: &Value) -> DefaultsMap {
    let mut defaults = DefaultsMap::new();

    let Some(properties) = module_input(schema)
        .and_then(|input| input.get("properties"))
        .and_then(Value::as_object)
    else {
        debug!("schema has no module input properties, no defaults known");
        return defaults;
    };

    for (name, property) in properties {
        if let Some(default) = property.as_object().and_then(|p| p.get("default")) {
            defaults.insert(name.clone(), default.clone());
        }
    }

    defaults
}

/// Read the module input's `required` list, skipping non-string entries.
pub fn extract_required(schema: &Value) -> RequiredFields {
    let Some(required) = module_input(schema)
        .and_then(|input| input.get("required"))
        .and_then(Value::as_array)
    else {
        debug!("schema has no module input required list");
        return RequiredFields::new();
    };

    required.iter().filter_map(Value::as_str).collect()
}

fn module_input(schema: &Value) -> Option<&ConfigTree> {
    schema.pointer(MODULE_INPUT_POINTER).and_then(Value::as_object)
}

/// Build a module schema from a Rust input type.
///
/// The type's JSON Schema (generated by `schemars`) becomes the module input
/// definition, so `#[serde(default)]` fields surface as defaults and fields
/// without a default surface as required.
///
/// ```
/// use config_reconcile::schema::{module_schema_for, SchemaDefaults};
/// use schemars::JsonSchema;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, JsonSchema)]
/// struct QueueInput {
///     name: String,
///     #[serde(default)]
///     fifo: bool,
/// }
///
/// let schema = module_schema_for::<QueueInput>();
/// let extracted = SchemaDefaults::from_schema(&schema);
/// assert!(extracted.required.contains("name"));
/// assert_eq!(extracted.defaults["fifo"], false);
/// ```
pub fn module_schema_for<T: JsonSchema>() -> Value {
    let root = schemars::schema_for!(T);
    let input = serde_json::to_value(&root).unwrap_or_default();
    json!({
        "openapi_schema": {
            "components": {
                "schemas": {
                    "ModuleInput": input
                }
            }
        }
    })
}
