//! Resource CRUD routes under the definition's path segment.

use crate::handlers::resource::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    let segment = state.service.definition().path_segment.clone();
    Router::new()
        .route(&format!("/{}", segment), get(list).post(create))
        .route(
            &format!("/{}/:id", segment),
            get(read).put(update).delete(delete_handler),
        )
        .with_state(state)
}
