//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode, web};
use quill_core::error::{DomainError, RepoError};
use quill_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed on `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn required(field: &'static str) -> Self {
        AppError::Validation {
            field,
            message: "This field is required.".to_string(),
        }
    }

    pub fn not_null(field: &'static str) -> Self {
        AppError::Validation {
            field,
            message: "This field may not be null.".to_string(),
        }
    }
}

/// Unwrap a body field that must be present and non-null.
pub fn required_value<T>(field: &'static str, value: Option<Option<T>>) -> AppResult<T> {
    match value {
        Some(Some(value)) => Ok(value),
        Some(None) => Err(AppError::not_null(field)),
        None => Err(AppError::required(field)),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Validation { field, message } => ErrorResponse::validation(*field, message),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{entity_type} with id {id} not found"))
            }
            DomainError::Validation { field, message } => AppError::Validation { field, message },
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthenticated => AppError::Unauthorized,
            DomainError::PermissionDenied => AppError::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Reference(msg) => {
                tracing::error!("Dangling reference: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Malformed JSON bodies become RFC 7807 `400`s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        tracing::debug!(error = %err, "Rejected request body");
        error::Error::from(AppError::BadRequest(err.to_string()))
    })
}

/// Non-numeric ids in the path name no resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        tracing::debug!(error = %err, "Rejected path parameters");
        error::Error::from(AppError::NotFound("Resource not found".to_string()))
    })
}
