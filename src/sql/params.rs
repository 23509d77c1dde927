//! Convert declared field values (serde_json::Value) to types that sqlx can bind.

use crate::config::{FieldConfig, FieldKind};
use crate::error::StoreError;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value that can be bound to a PostgreSQL query. Nulls remember their column kind so the
/// parameter is typed correctly.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null(FieldKind),
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl PgBindValue {
    pub fn from_field(field: &FieldConfig, v: &Value) -> Result<Self, StoreError> {
        let mismatch = || StoreError::Encode {
            field: field.name.clone(),
            message: format!("expected {}, got {}", field.kind.describe(), v),
        };
        Ok(match (field.kind, v) {
            (kind, Value::Null) => PgBindValue::Null(kind),
            (FieldKind::Text, Value::String(s)) => PgBindValue::String(s.clone()),
            (FieldKind::Integer, Value::Number(n)) => {
                PgBindValue::I64(n.as_i64().ok_or_else(mismatch)?)
            }
            (FieldKind::Float, Value::Number(n)) => {
                PgBindValue::F64(n.as_f64().ok_or_else(mismatch)?)
            }
            (FieldKind::Boolean, Value::Bool(b)) => PgBindValue::Bool(*b),
            _ => return Err(mismatch()),
        })
    }

    fn pg_type_name(&self) -> &'static str {
        let kind = match self {
            PgBindValue::Null(kind) => *kind,
            PgBindValue::Bool(_) => FieldKind::Boolean,
            PgBindValue::I64(_) => FieldKind::Integer,
            PgBindValue::F64(_) => FieldKind::Float,
            PgBindValue::String(_) => FieldKind::Text,
        };
        match kind {
            FieldKind::Text => "TEXT",
            FieldKind::Integer => "INT8",
            FieldKind::Float => "FLOAT8",
            FieldKind::Boolean => "BOOL",
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null(_) => IsNull::Yes,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(PgTypeInfo::with_name(self.pg_type_name()))
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_by_declared_kind() {
        let count = FieldConfig::new("count", FieldKind::Integer, true);
        assert_eq!(PgBindValue::from_field(&count, &json!(4)).unwrap(), PgBindValue::I64(4));
        assert_eq!(
            PgBindValue::from_field(&count, &Value::Null).unwrap(),
            PgBindValue::Null(FieldKind::Integer)
        );
        assert!(matches!(
            PgBindValue::from_field(&count, &json!("4")),
            Err(StoreError::Encode { .. })
        ));

        let ratio = FieldConfig::new("ratio", FieldKind::Float, false);
        assert_eq!(PgBindValue::from_field(&ratio, &json!(2)).unwrap(), PgBindValue::F64(2.0));
    }

    #[test]
    fn null_keeps_column_type() {
        assert_eq!(PgBindValue::Null(FieldKind::Boolean).pg_type_name(), "BOOL");
        assert_eq!(PgBindValue::String("x".into()).pg_type_name(), "TEXT");
    }
}
