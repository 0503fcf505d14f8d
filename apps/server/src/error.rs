use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pocketledger_core::errors::{DatabaseError, Error as CoreError, FieldViolation};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldViolation>,
}

impl ErrorBody {
    pub(crate) fn response(
        status: StatusCode,
        message: String,
        details: Vec<FieldViolation>,
    ) -> Response {
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
            details,
        });
        (status, body).into_response()
    }
}

fn internal(err: &dyn std::fmt::Display) -> (StatusCode, String, Vec<FieldViolation>) {
    tracing::error!("Request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_MESSAGE.to_string(),
        Vec::new(),
    )
}

fn classify(err: &CoreError) -> (StatusCode, String, Vec<FieldViolation>) {
    match err {
        CoreError::Validation(validation) => {
            let details = validation.violations();
            let message = if details.is_empty() {
                validation.to_string()
            } else {
                "Validation failed".to_string()
            };
            (StatusCode::BAD_REQUEST, message, details)
        }
        CoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string(), Vec::new()),
        CoreError::Database(DatabaseError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Not found".to_string(), Vec::new())
        }
        CoreError::Database(DatabaseError::UniqueViolation(_)) => (
            StatusCode::CONFLICT,
            "Resource already exists".to_string(),
            Vec::new(),
        ),
        CoreError::ConstraintViolation(_) => (StatusCode::CONFLICT, err.to_string(), Vec::new()),
        other => internal(other),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            ApiError::Core(e) => classify(e),
            ApiError::Auth(e) => return e.to_response(),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone(), Vec::new()),
            ApiError::Anyhow(e) => internal(e),
        };
        ErrorBody::response(status, message, details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections use the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
