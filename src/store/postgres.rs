//! PostgreSQL store: one table per resource type, one statement per operation.
//!
//! Uses dynamic queries (sqlx::query) so the crate builds without DATABASE_URL.

use crate::config::{FieldKind, ResourceDefinition};
use crate::error::StoreError;
use crate::resource::{Fields, Resource};
use crate::sql::{delete, insert, replace, select_all, select_by_id, QueryBuf};
use crate::store::ResourceStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

pub struct PgStore {
    pool: PgPool,
    definition: Arc<ResourceDefinition>,
}

impl PgStore {
    /// The pool is shared by all in-flight requests; sqlx hands out connections.
    pub fn new(pool: PgPool, definition: Arc<ResourceDefinition>) -> Self {
        Self { pool, definition }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    async fn fetch_optional(&self, q: QueryBuf) -> Result<Option<Resource>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| row_to_resource(&self.definition, &r)).transpose()
    }
}

/// Ids beyond i64::MAX cannot exist in a BIGSERIAL column.
fn db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn find_all(&self) -> Result<Vec<Resource>, StoreError> {
        let q = select_all(&self.definition);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query(&q.sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| row_to_resource(&self.definition, r))
            .collect()
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Resource>, StoreError> {
        let Some(id) = db_id(id) else { return Ok(None) };
        self.fetch_optional(select_by_id(&self.definition, id)).await
    }

    async fn insert(&self, candidate: &Fields) -> Result<Resource, StoreError> {
        let q = insert(&self.definition, candidate)?;
        self.fetch_optional(q)
            .await?
            .ok_or_else(|| StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn replace(&self, id: u64, candidate: &Fields) -> Result<Option<Resource>, StoreError> {
        let Some(id) = db_id(id) else { return Ok(None) };
        let q = replace(&self.definition, id, candidate)?;
        self.fetch_optional(q).await
    }

    async fn delete_by_id(&self, id: u64) -> Result<u64, StoreError> {
        let Some(id) = db_id(id) else { return Ok(0) };
        let q = delete(&self.definition, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn row_to_resource(def: &ResourceDefinition, row: &PgRow) -> Result<Resource, StoreError> {
    let id: i64 = row.try_get("id")?;
    let id = u64::try_from(id).map_err(|_| StoreError::Corrupt(format!("negative id {}", id)))?;
    let mut fields = Fields::new();
    for f in &def.fields {
        let name = f.name.as_str();
        let v = match f.kind {
            FieldKind::Text => row.try_get::<Option<String>, _>(name)?.map(Value::String),
            FieldKind::Integer => row.try_get::<Option<i64>, _>(name)?.map(Value::from),
            FieldKind::Float => row
                .try_get::<Option<f64>, _>(name)?
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            FieldKind::Boolean => row.try_get::<Option<bool>, _>(name)?.map(Value::Bool),
        };
        fields.insert(f.name.clone(), v.unwrap_or(Value::Null));
    }
    Ok(Resource {
        id,
        fields,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
