//! Resource definition types matching the JSON definition file.

use crate::case::to_camel_case;
use serde::{Deserialize, Serialize};

/// Column kind of a declared field. Decides both JSON type checks and the PostgreSQL column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
}

impl FieldKind {
    pub fn pg_type(self) -> &'static str {
        match self {
            FieldKind::Text => "TEXT",
            FieldKind::Integer => "BIGINT",
            FieldKind::Float => "DOUBLE PRECISION",
            FieldKind::Boolean => "BOOLEAN",
        }
    }

    /// Phrase used in validation messages ("must be a string").
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Float => "a number",
            FieldKind::Boolean => "a boolean",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// snake_case column name; exposed as camelCase on the wire.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub rules: ValidationRule,
}

impl FieldConfig {
    pub fn new(name: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required,
            rules: ValidationRule::default(),
        }
    }

    /// Key used in response bodies and validation details, e.g. "due_date" -> "dueDate".
    pub fn wire_name(&self) -> String {
        to_camel_case(&self.name)
    }
}

/// The single resource type a service instance manages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Singular name used in logs and messages, e.g. "post".
    pub name: String,
    /// URL path segment, e.g. "posts".
    pub path_segment: String,
    pub table: String,
    pub fields: Vec<FieldConfig>,
}

impl ResourceDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }
}
