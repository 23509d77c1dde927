//! Load the resource definition from a built-in preset or a JSON file.

use crate::config::{validate, FieldConfig, FieldKind, ResourceDefinition};
use crate::error::ConfigError;
use std::path::Path;

/// Blog posts: required title and content.
pub fn posts() -> ResourceDefinition {
    ResourceDefinition {
        name: "post".into(),
        path_segment: "posts".into(),
        table: "posts".into(),
        fields: vec![
            FieldConfig::new("title", FieldKind::Text, true),
            FieldConfig::new("content", FieldKind::Text, true),
        ],
    }
}

/// Todo list items: required title and completion flag.
pub fn todos() -> ResourceDefinition {
    ResourceDefinition {
        name: "todo".into(),
        path_segment: "todos".into(),
        table: "todos".into(),
        fields: vec![
            FieldConfig::new("title", FieldKind::Text, true),
            FieldConfig::new("completed", FieldKind::Boolean, true),
        ],
    }
}

pub fn preset(name: &str) -> Option<ResourceDefinition> {
    match name {
        "posts" => Some(posts()),
        "todos" => Some(todos()),
        _ => None,
    }
}

/// Resolve `source` as a preset name, otherwise as a path to a JSON definition. Validates the result.
pub async fn load_definition(source: &str) -> Result<ResourceDefinition, ConfigError> {
    let def = match preset(source) {
        Some(def) => def,
        None => load_definition_file(Path::new(source)).await?,
    };
    validate(&def)?;
    tracing::debug!(resource = %def.name, table = %def.table, fields = def.fields.len(), "resource definition loaded");
    Ok(def)
}

async fn load_definition_file(path: &Path) -> Result<ResourceDefinition, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}
