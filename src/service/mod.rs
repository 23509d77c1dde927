//! CrudService: resource CRUD over an injected store.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::RequestValidator;
