//! Payload validation from the resource definition's field rules.

use crate::config::{FieldConfig, FieldKind, ResourceDefinition, ValidationRule};
use crate::error::FieldError;
use crate::resource::Fields;
use regex::Regex;
use serde_json::Value;

pub struct RequestValidator;

impl RequestValidator {
    /// Check every declared field of `candidate`. Collects all violations in declaration order.
    /// Create and update run exactly this check.
    pub fn validate(def: &ResourceDefinition, candidate: &Fields) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        for field in &def.fields {
            let val = candidate.get(&field.name).unwrap_or(&Value::Null);
            validate_field(field, val, &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Violations name the field by its wire key, the spelling clients see in responses.
fn validate_field(field: &FieldConfig, v: &Value, errors: &mut Vec<FieldError>) {
    let key = field.wire_name();
    let col = key.as_str();
    if v.is_null() {
        if field.required {
            errors.push(FieldError::new(col, "is required"));
        }
        return;
    }
    if !kind_matches(field.kind, v) {
        errors.push(FieldError::new(col, format!("must be {}", field.kind.describe())));
        return;
    }
    if let Some(s) = v.as_str() {
        if field.required && s.trim().is_empty() {
            errors.push(FieldError::new(col, "must not be empty"));
            return;
        }
    }
    validate_rules(col, v, &field.rules, errors);
}

fn kind_matches(kind: FieldKind, v: &Value) -> bool {
    match kind {
        FieldKind::Text => v.is_string(),
        FieldKind::Integer => v.is_i64(),
        FieldKind::Float => v.is_number(),
        FieldKind::Boolean => v.is_boolean(),
    }
}

fn validate_rules(col: &str, v: &Value, rule: &ValidationRule, errors: &mut Vec<FieldError>) {
    if let Some(format) = &rule.format {
        if let Some(message) = check_format(v, format) {
            errors.push(FieldError::new(col, message));
        }
    }
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max as usize {
                errors.push(FieldError::new(col, format!("must be at most {} characters", max)));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min as usize {
                errors.push(FieldError::new(col, format!("must be at least {} characters", min)));
            }
        }
        if let Some(pattern) = &rule.pattern {
            match Regex::new(pattern) {
                Ok(re) if re.is_match(s) => {}
                Ok(_) => errors.push(FieldError::new(col, "does not match required pattern")),
                Err(_) => errors.push(FieldError::new(col, "has an invalid pattern rule")),
            }
        }
    }
    if let Some(allowed) = &rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            errors.push(FieldError::new(
                col,
                format!(
                    "must be one of: {:?}",
                    allowed.iter().take(5).collect::<Vec<_>>()
                ),
            ));
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                errors.push(FieldError::new(col, format!("must be at least {}", min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                errors.push(FieldError::new(col, format!("must be at most {}", max)));
            }
        }
    }
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn check_format(v: &Value, format: &str) -> Option<&'static str> {
    let s = v.as_str()?;
    match format.to_lowercase().as_str() {
        "email" if !s.contains('@') || s.len() < 3 => Some("must be a valid email"),
        "uuid" if uuid::Uuid::parse_str(s).is_err() => Some("must be a valid UUID"),
        _ => None,
    }
}
