use crate::config::Options;
use crate::model::EntityKind;
use crate::validate::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A validation failure answered with 500, as older deployments did for
    /// students.
    #[error("{0}")]
    LegacyValidation(ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Picks the status a rejected write is reported with.
    pub fn rejected(err: ValidationError, options: &Options) -> Self {
        if options.legacy_status_codes && err.kind() == EntityKind::Student {
            ApiError::LegacyValidation(err)
        } else {
            ApiError::Validation(err)
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::LegacyValidation(_) | ApiError::Serialize(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Serialize(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn ok<T: Serialize>(data: &T) -> ApiResult<Response> {
    respond(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: &T) -> ApiResult<Response> {
    respond(StatusCode::CREATED, data)
}

fn respond<T: Serialize>(status: StatusCode, data: &T) -> ApiResult<Response> {
    let data = serde_json::to_value(data)?;
    Ok((status, Json(json!({ "data": data }))).into_response())
}
