use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("email already registered")]
    Conflict,
    #[error("vendor not found")]
    NotFound,
    /// Deliberately covers both "no such email" and "wrong password" so the
    /// login endpoint cannot be used for account enumeration.
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("token expired")]
    ExpiredToken,
    #[error("invalid token")]
    MalformedToken,
    #[error("token missing vendor claim")]
    MissingClaim,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::NotFound => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::ExpiredToken => 1011,
            AuthError::MalformedToken => 1012,
            AuthError::MissingClaim => 1013,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}
