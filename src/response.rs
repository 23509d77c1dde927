//! Success responses. Bodies are the bare resource (or array of resources).

use crate::resource::Resource;
use axum::{http::StatusCode, Json};

pub fn created(resource: Resource) -> (StatusCode, Json<Resource>) {
    (StatusCode::CREATED, Json(resource))
}

pub fn ok(resource: Resource) -> (StatusCode, Json<Resource>) {
    (StatusCode::OK, Json(resource))
}

pub fn ok_many(resources: Vec<Resource>) -> (StatusCode, Json<Vec<Resource>>) {
    (StatusCode::OK, Json(resources))
}

pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
