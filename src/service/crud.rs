//! The five CRUD operations: validation in front of the injected store.

use crate::config::ResourceDefinition;
use crate::error::{FieldError, ServiceError};
use crate::resource::{Fields, Resource};
use crate::service::RequestValidator;
use crate::store::ResourceStore;
use serde_json::Value;
use std::sync::Arc;

/// Stateless per request; all state lives in the store.
#[derive(Clone)]
pub struct CrudService {
    store: Arc<dyn ResourceStore>,
    definition: Arc<ResourceDefinition>,
}

impl CrudService {
    pub fn new(store: Arc<dyn ResourceStore>, definition: Arc<ResourceDefinition>) -> Self {
        Self { store, definition }
    }

    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }

    pub async fn list(&self) -> Result<Vec<Resource>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn read(&self, id: &str) -> Result<Resource, ServiceError> {
        let id = parse_id(id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Keep declared fields from `body`, validate, insert.
    pub async fn create(&self, body: Value) -> Result<Resource, ServiceError> {
        let payload = body_to_map(body)?;
        let candidate = candidate_from(&self.definition, Fields::new(), payload);
        self.check(&candidate)?;
        let created = self.store.insert(&candidate).await?;
        tracing::debug!(resource = %self.definition.name, id = created.id, "created");
        Ok(created)
    }

    /// Existence is checked before the body is looked at, so a bad payload for a missing id is NotFound.
    /// Keys present in `body` overwrite the stored values; omitted keys keep them.
    pub async fn update(&self, id: &str, body: Value) -> Result<Resource, ServiceError> {
        let id = parse_id(id)?;
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        let payload = body_to_map(body)?;
        let candidate = candidate_from(&self.definition, existing.fields, payload);
        self.check(&candidate)?;
        let updated = self
            .store
            .replace(id, &candidate)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        tracing::debug!(resource = %self.definition.name, id, "updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        match self.store.delete_by_id(id).await? {
            0 => Err(ServiceError::NotFound(id)),
            _ => {
                tracing::debug!(resource = %self.definition.name, id, "deleted");
                Ok(())
            }
        }
    }

    fn check(&self, candidate: &Fields) -> Result<(), ServiceError> {
        RequestValidator::validate(&self.definition, candidate).map_err(|reasons| {
            tracing::debug!(resource = %self.definition.name, ?reasons, "payload rejected");
            ServiceError::ValidationFailed(reasons)
        })
    }
}

/// Base-10 digits only; no sign, no whitespace.
fn parse_id(raw: &str) -> Result<u64, ServiceError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServiceError::MalformedId(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| ServiceError::MalformedId(raw.to_string()))
}

fn body_to_map(value: Value) -> Result<Fields, ServiceError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(ServiceError::ValidationFailed(vec![FieldError::new(
            "body",
            "must be a JSON object",
        )])),
    }
}

/// Overlay declared keys of `payload` onto `base`. A field may be sent under its column name or
/// its camelCase wire name; the column name wins when both are present. Unknown and store-managed
/// keys are dropped; every declared field ends up present (Null when absent from both).
fn candidate_from(def: &ResourceDefinition, mut base: Fields, mut payload: Fields) -> Fields {
    let mut out = Fields::with_capacity(def.fields.len());
    for f in &def.fields {
        let sent = payload.remove(&f.name);
        let sent_camel = payload.remove(&f.wire_name());
        let v = sent
            .or(sent_camel)
            .or_else(|| base.remove(&f.name))
            .unwrap_or(Value::Null);
        out.insert(f.name.clone(), v);
    }
    out
}
