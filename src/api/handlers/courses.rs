use super::json_body;
use crate::aggregate;
use crate::api::error::{created, ok, ApiError, ApiResult};
use crate::api::types::AppState;
use crate::validate::validate_course;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::Value;

/// Courses with their enrollment counts, not the raw records.
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let courses = aggregate::course_view(&state.store)?;
    ok(&courses)
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let payload = json_body(body)?;
    let new = validate_course(&payload).map_err(|e| ApiError::rejected(e, &state.options))?;
    let course = state.store.insert_course(&new)?;
    tracing::info!(id = %course.id, "course created");
    created(&course)
}
