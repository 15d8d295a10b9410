use crate::api::error::{ok, ApiError, ApiResult};
use axum::response::Response;
use serde_json::json;

pub async fn health() -> ApiResult<Response> {
    ok(&json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
