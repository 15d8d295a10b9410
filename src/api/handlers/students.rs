use super::json_body;
use crate::api::error::{created, ok, ApiError, ApiResult};
use crate::api::types::AppState;
use crate::validate::validate_student;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let students = state.store.list_students()?;
    ok(&students)
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let payload = json_body(body)?;
    let new = validate_student(&payload).map_err(|e| ApiError::rejected(e, &state.options))?;
    let student = state.store.insert_student(&new)?;
    tracing::info!(id = %student.id, "student created");
    created(&student)
}
