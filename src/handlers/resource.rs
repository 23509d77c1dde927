//! Resource CRUD handlers: list, create, read, update, delete.

use crate::error::AppError;
use crate::response::{created, no_content, ok, ok_many};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.service.list().await?;
    Ok(ok_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let row = state.service.create(body).await?;
    Ok(created(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.service.read(&id).await?;
    Ok(ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            // An unreadable body for a missing or malformed id still reports the id problem first.
            state.service.read(&id).await?;
            return Err(rejection.into());
        }
    };
    let row = state.service.update(&id, body).await?;
    Ok(ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.service.delete(&id).await?;
    Ok(no_content())
}
