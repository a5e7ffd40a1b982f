use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::loyalty::errors::CardError;

/// HTTP-facing error: a status plus the service-layer code and message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: u16, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, 1000, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, 1001, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, 1004, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "request failed");
        }
        let body = serde_json::json!({"error": {"code": self.code, "message": self.message}});
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = match &e {
            AuthError::Validation(_) | AuthError::Conflict => StatusCode::BAD_REQUEST,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials
            | AuthError::ExpiredToken
            | AuthError::MalformedToken
            | AuthError::MissingClaim => StatusCode::UNAUTHORIZED,
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, e.code(), e.to_string())
    }
}

impl From<CardError> for ApiError {
    fn from(e: CardError) -> Self {
        let status = match &e {
            CardError::InvalidInput(_)
            | CardError::Conflict(_)
            | CardError::InsufficientPunches => StatusCode::BAD_REQUEST,
            CardError::NotFound(_) => StatusCode::NOT_FOUND,
            CardError::Forbidden(_) => StatusCode::FORBIDDEN,
            CardError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.code(), e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Db(_) | ServiceError::Enrollment(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Model(m) => match m {
                ModelError::Validation(_) | ModelError::Conflict(_) => StatusCode::BAD_REQUEST,
                ModelError::NotFound(_) => StatusCode::NOT_FOUND,
                ModelError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };
        Self::new(status, 1100, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        assert_eq!(ApiError::from(AuthError::Conflict).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::ExpiredToken).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::NotFound).status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn card_errors_map_to_expected_statuses() {
        assert_eq!(
            ApiError::from(CardError::Conflict("x".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(CardError::InsufficientPunches).status, StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(CardError::Forbidden("x".into())).status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::from(CardError::NotFound("card")).status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn model_row_gone_mid_request_is_not_found() {
        // A row deleted between the pre-read and the write surfaces as 404
        let e = ServiceError::Model(ModelError::NotFound("customer"));
        assert_eq!(ApiError::from(e).status, StatusCode::NOT_FOUND);
    }
}
