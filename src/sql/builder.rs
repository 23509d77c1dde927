//! Builds parameterized DDL, SELECT, INSERT, UPDATE, DELETE from the resource definition.

use crate::config::ResourceDefinition;
use crate::error::StoreError;
use crate::resource::Fields;
use crate::sql::PgBindValue;
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from validated config).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// id, declared fields in order, timestamps.
fn select_column_list(def: &ResourceDefinition) -> String {
    std::iter::once("id")
        .chain(def.fields.iter().map(|f| f.name.as_str()))
        .chain(["created_at", "updated_at"])
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn create_table(def: &ResourceDefinition) -> String {
    let mut col_defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted("id"))];
    for f in &def.fields {
        let not_null = if f.required { " NOT NULL" } else { "" };
        col_defs.push(format!("{} {}{}", quoted(&f.name), f.kind.pg_type(), not_null));
    }
    for ts in ["created_at", "updated_at"] {
        col_defs.push(format!("{} TIMESTAMPTZ NOT NULL DEFAULT NOW()", quoted(ts)));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(&def.table),
        col_defs.join(", ")
    )
}

/// All rows ordered by id.
pub fn select_all(def: &ResourceDefinition) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(def),
        quoted(&def.table),
        quoted("id")
    );
    q
}

pub fn select_by_id(def: &ResourceDefinition, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(def),
        quoted(&def.table),
        quoted("id"),
        n
    );
    q
}

/// INSERT every declared field; id and timestamps come from column defaults.
pub fn insert(def: &ResourceDefinition, candidate: &Fields) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(def.fields.len());
    let mut placeholders = Vec::with_capacity(def.fields.len());
    for f in &def.fields {
        let val = candidate.get(&f.name).unwrap_or(&Value::Null);
        let n = q.push_param(PgBindValue::from_field(f, val)?);
        cols.push(quoted(&f.name));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(&def.table),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(def)
    );
    Ok(q)
}

/// Full-record overwrite by id. Leaves created_at alone and refreshes updated_at.
pub fn replace(def: &ResourceDefinition, id: i64, candidate: &Fields) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(def.fields.len() + 1);
    for f in &def.fields {
        let val = candidate.get(&f.name).unwrap_or(&Value::Null);
        let n = q.push_param(PgBindValue::from_field(f, val)?);
        sets.push(format!("{} = ${}", quoted(&f.name), n));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let id_param = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(&def.table),
        sets.join(", "),
        quoted("id"),
        id_param,
        select_column_list(def)
    );
    Ok(q)
}

pub fn delete(def: &ResourceDefinition, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(&def.table),
        quoted("id"),
        n
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{posts, todos, FieldKind};
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn ddl() {
        assert_eq!(
            create_table(&todos()),
            "CREATE TABLE IF NOT EXISTS \"todos\" (\"id\" BIGSERIAL PRIMARY KEY, \"title\" TEXT NOT NULL, \
             \"completed\" BOOLEAN NOT NULL, \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
             \"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW())"
        );
    }

    #[test]
    fn select_queries() {
        let def = posts();
        assert_eq!(
            select_all(&def).sql,
            "SELECT \"id\", \"title\", \"content\", \"created_at\", \"updated_at\" FROM \"posts\" ORDER BY \"id\""
        );
        let q = select_by_id(&def, 9);
        assert!(q.sql.ends_with("WHERE \"id\" = $1"));
        assert_eq!(q.params, vec![PgBindValue::I64(9)]);
    }

    #[test]
    fn insert_binds_every_declared_field() {
        let q = insert(&posts(), &fields(json!({"title": "A", "content": "B"}))).unwrap();
        assert!(q.sql.starts_with("INSERT INTO \"posts\" (\"title\", \"content\") VALUES ($1, $2) RETURNING \"id\""));
        assert_eq!(
            q.params,
            vec![PgBindValue::String("A".into()), PgBindValue::String("B".into())]
        );
    }

    #[test]
    fn replace_sets_fields_then_id() {
        let q = replace(&todos(), 4, &fields(json!({"title": "T"}))).unwrap();
        assert!(q.sql.starts_with(
            "UPDATE \"todos\" SET \"title\" = $1, \"completed\" = $2, \"updated_at\" = NOW() WHERE \"id\" = $3"
        ));
        assert_eq!(
            q.params,
            vec![
                PgBindValue::String("T".into()),
                PgBindValue::Null(FieldKind::Boolean),
                PgBindValue::I64(4)
            ]
        );
    }

    #[test]
    fn delete_by_id() {
        let q = delete(&posts(), 2);
        assert_eq!(q.sql, "DELETE FROM \"posts\" WHERE \"id\" = $1");
    }
}
