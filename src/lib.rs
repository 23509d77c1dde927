//! Resource API: CRUD over a single resource type with PostgreSQL or in-memory storage.

pub mod case;
pub mod config;
pub mod error;
pub mod migration;
pub mod resource;
pub mod response;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::{load_definition, FieldConfig, FieldKind, ResourceDefinition, Settings, StoreKind};
pub use error::{AppError, ConfigError, FieldError, ServiceError, StoreError};
pub use migration::{ensure_database_exists, ensure_resource_table};
pub use resource::{Fields, Resource};
pub use routes::{app, common_routes, resource_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{MemoryStore, PgStore, ResourceStore};
