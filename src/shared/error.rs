use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Machine-readable codes attached to 401 responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidCredentials,
    RefreshTokenMissing,
    InvalidRefreshToken,
    RefreshTokenExpired,
    UserNotFound,
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthErrorCode::RefreshTokenMissing => "REFRESH_TOKEN_MISSING",
            AuthErrorCode::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthErrorCode::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            AuthErrorCode::UserNotFound => "USER_NOT_FOUND",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{message}")]
    Unauthorized {
        message: String,
        code: Option<AuthErrorCode>,
    },
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
            code: None,
        }
    }

    pub fn auth(code: AuthErrorCode, message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
            code: Some(code),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(format!("{} not found", what.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::Unauthorized { message, code } => (
                StatusCode::UNAUTHORIZED,
                message,
                code.map(|c| c.as_str()),
            ),
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                    Some("SERVER_ERROR"),
                )
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                    Some("SERVER_ERROR"),
                )
            }
        };

        let body = match code {
            Some(code) => json!({
                "success": false,
                "message": message,
                "code": code
            }),
            None => json!({
                "success": false,
                "message": message
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Error body schema for API documentation
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Invalid credentials")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "INVALID_CREDENTIALS")]
    pub code: Option<String>,
}
