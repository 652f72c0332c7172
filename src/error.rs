use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::calculations::operations::ArithmeticError;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

pub const USER_NOT_FOUND: &str = "User not found";
pub const CALCULATION_NOT_FOUND: &str = "Calculation not found";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const EMAIL_TAKEN: &str = "Email already exists";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Duplicate(&'static str),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::Duplicate(_)
            | ApiError::Arithmetic(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateUsername => ApiError::Duplicate(USERNAME_TAKEN),
            StoreError::DuplicateEmail => ApiError::Duplicate(EMAIL_TAKEN),
            StoreError::MissingUser => ApiError::NotFound(USER_NOT_FOUND),
            other => ApiError::Internal(anyhow::Error::new(other).context("storage failure")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = ?e, "request failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
