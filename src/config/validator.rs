//! Definition validation: identifiers, reserved names, rule consistency.

use crate::config::ResourceDefinition;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Columns the store manages itself; a definition may not declare them.
pub const RESERVED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Lowercase SQL identifier: letter or underscore, then letters, digits, underscores.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_path_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

pub fn validate(def: &ResourceDefinition) -> Result<(), ConfigError> {
    if def.name.trim().is_empty() {
        return Err(ConfigError::Validation("resource name must not be empty".into()));
    }
    if !is_path_segment(&def.path_segment) {
        return Err(ConfigError::InvalidIdentifier(def.path_segment.clone()));
    }
    if !is_identifier(&def.table) {
        return Err(ConfigError::InvalidIdentifier(def.table.clone()));
    }
    if def.fields.is_empty() {
        return Err(ConfigError::Validation(format!(
            "resource '{}' declares no fields",
            def.name
        )));
    }

    let mut seen = HashSet::new();
    // Keys a request may use for a field: its column name and its camelCase name.
    let mut keys: HashMap<String, &str> = HashMap::new();
    for f in &def.fields {
        if !is_identifier(&f.name) {
            return Err(ConfigError::InvalidIdentifier(f.name.clone()));
        }
        if RESERVED_FIELDS.contains(&f.name.as_str()) {
            return Err(ConfigError::ReservedField(f.name.clone()));
        }
        if !seen.insert(f.name.as_str()) {
            return Err(ConfigError::DuplicateField(f.name.clone()));
        }
        for key in [f.name.clone(), f.wire_name()] {
            if let Some(owner) = keys.insert(key, f.name.as_str()) {
                if owner != f.name {
                    return Err(ConfigError::DuplicateField(f.name.clone()));
                }
            }
        }
        if let Some(pattern) = &f.rules.pattern {
            Regex::new(pattern).map_err(|e| {
                ConfigError::Validation(format!("invalid pattern for {}: {}", f.name, e))
            })?;
        }
        if let Some(format) = &f.rules.format {
            if !matches!(format.to_lowercase().as_str(), "email" | "uuid") {
                return Err(ConfigError::Validation(format!(
                    "unknown format '{}' for {}",
                    format, f.name
                )));
            }
        }
        if let (Some(min), Some(max)) = (f.rules.min_length, f.rules.max_length) {
            if min > max {
                return Err(ConfigError::Validation(format!(
                    "{}: min_length {} exceeds max_length {}",
                    f.name, min, max
                )));
            }
        }
        if let (Some(min), Some(max)) = (f.rules.minimum, f.rules.maximum) {
            if min > max {
                return Err(ConfigError::Validation(format!(
                    "{}: minimum {} exceeds maximum {}",
                    f.name, min, max
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{posts, FieldConfig, FieldKind};

    #[test]
    fn presets_are_valid() {
        validate(&posts()).unwrap();
        validate(&crate::config::todos()).unwrap();
    }

    #[test]
    fn rejects_reserved_and_duplicate_fields() {
        let mut def = posts();
        def.fields.push(FieldConfig::new("created_at", FieldKind::Text, false));
        assert!(matches!(validate(&def), Err(ConfigError::ReservedField(f)) if f == "created_at"));

        let mut def = posts();
        def.fields.push(FieldConfig::new("title", FieldKind::Text, false));
        assert!(matches!(validate(&def), Err(ConfigError::DuplicateField(f)) if f == "title"));
    }

    #[test]
    fn rejects_fields_sharing_a_wire_key() {
        let mut def = posts();
        def.fields.push(FieldConfig::new("line_1", FieldKind::Text, false));
        validate(&def).unwrap();

        def.fields.push(FieldConfig::new("line1", FieldKind::Text, false));
        assert!(matches!(validate(&def), Err(ConfigError::DuplicateField(f)) if f == "line1"));
    }

    #[test]
    fn rejects_unsafe_identifiers() {
        let mut def = posts();
        def.table = "posts; DROP TABLE x".into();
        assert!(matches!(validate(&def), Err(ConfigError::InvalidIdentifier(_))));

        let mut def = posts();
        def.fields[0].name = "Title".into();
        assert!(matches!(validate(&def), Err(ConfigError::InvalidIdentifier(_))));
    }

    #[test]
    fn rejects_bad_rules() {
        let mut def = posts();
        def.fields[0].rules.pattern = Some("([a-z".into());
        assert!(matches!(validate(&def), Err(ConfigError::Validation(_))));

        let mut def = posts();
        def.fields[0].rules.min_length = Some(10);
        def.fields[0].rules.max_length = Some(3);
        assert!(matches!(validate(&def), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_empty_field_list() {
        let mut def = posts();
        def.fields.clear();
        assert!(validate(&def).is_err());
    }
}
