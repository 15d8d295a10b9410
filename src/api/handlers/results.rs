use super::json_body;
use crate::aggregate;
use crate::api::error::{created, ok, ApiError, ApiResult};
use crate::api::types::AppState;
use crate::validate::{check_references, validate_result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::Value;

/// Results joined with student and course names.
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let rows = aggregate::result_view(&state.store, state.options.missing_reference_policy)?;
    ok(&rows)
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let payload = json_body(body)?;
    let new = validate_result(&payload).map_err(|e| ApiError::rejected(e, &state.options))?;
    if state.options.strict_references {
        if let Some(e) = check_references(state.store.as_ref(), &new)? {
            return Err(ApiError::rejected(e, &state.options));
        }
    }
    let result = state.store.insert_result(&new)?;
    tracing::info!(
        id = %result.id,
        student_ref = %result.student_ref,
        course_ref = %result.course_ref,
        "result created"
    );
    created(&result)
}
