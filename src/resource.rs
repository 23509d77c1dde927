//! The managed record and the field map handed to stores.

use crate::case::to_camel_case;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Declared field values keyed by snake_case column name, in declaration order. A candidate
/// always carries every declared field; absent optional values are `Value::Null`.
pub type Fields = Map<String, Value>;

/// A persisted resource. `id` and both timestamps are owned by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    pub id: u64,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Flat wire shape: `id`, the declared fields in camelCase, then `createdAt` / `updatedAt`.
impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry("id", &self.id)?;
        for (k, v) in &self.fields {
            map.serialize_entry(&to_camel_case(k), v)?;
        }
        map.serialize_entry("createdAt", &self.created_at)?;
        map.serialize_entry("updatedAt", &self.updated_at)?;
        map.end()
    }
}
