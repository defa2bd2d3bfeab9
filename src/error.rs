use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use std::fmt;
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::models::ErrorResponse;
use crate::services::{GenerationError, StoreError};

/// Errors returned by HTTP handlers, rendered as `ErrorResponse` JSON
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_failed",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_error",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(errors) => errors
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |e| {
                        format!(
                            "{}: {}",
                            field,
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        )
                    })
                })
                .collect::<Vec<_>>()
                .join("; "),
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(msg) => write!(f, "{}: {}", self.kind(), msg),
            _ => write!(f, "{}: {}", self.kind(), self.message()),
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if let Self::Internal(msg) = self {
            tracing::error!("Internal server error: {}", msg);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.message(),
            status_code: status.as_u16(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(format!("{} not found", what)),
            StoreError::InvalidInput(msg) => Self::BadRequest(msg),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Capacity(e) => Self::Conflict(e.to_string()),
            other if other.is_unique_violation() => Self::Conflict("Resource already exists".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::EventNotFound(_) => Self::NotFound(err.to_string()),
            GenerationError::Forbidden => Self::Forbidden(err.to_string()),
            GenerationError::EventClosed(_) => Self::Conflict(err.to_string()),
            GenerationError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}

/// Handle malformed path segments such as a non-UUID id
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid path: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CapacityError;
    use actix_web::ResponseError;
    use uuid::Uuid;

    #[test]
    fn test_store_errors_map_to_status() {
        let not_found: ApiError = StoreError::NotFound("Venue").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message(), "Venue not found");

        let full: ApiError = StoreError::Capacity(CapacityError::Exhausted(Uuid::nil())).into();
        assert_eq!(full.status_code(), StatusCode::CONFLICT);

        let db: ApiError = StoreError::SqlxError(sqlx::Error::PoolTimedOut).into();
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.message(), "An internal error occurred");
    }

    #[test]
    fn test_generation_errors_map_to_status() {
        let forbidden: ApiError = GenerationError::Forbidden.into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let closed: ApiError = GenerationError::EventClosed(crate::models::EventStatus::Cancelled).into();
        assert_eq!(closed.status_code(), StatusCode::CONFLICT);
    }
}
