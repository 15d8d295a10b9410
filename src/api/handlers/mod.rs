pub mod core;
pub mod courses;
pub mod results;
pub mod students;

use super::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

/// Unwraps a JSON body, turning axum's rejection into the `{"message"}` shape.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}
