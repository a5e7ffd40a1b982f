use thiserror::Error;

/// Business errors for the card engine
#[derive(Debug, Error)]
pub enum CardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("not authorized: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not enough punches to redeem reward")]
    InsufficientPunches,
    #[error("repository error: {0}")]
    Repository(String),
}

impl CardError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            CardError::InvalidInput(_) => 2001,
            CardError::NotFound(_) => 2002,
            CardError::Forbidden(_) => 2003,
            CardError::Conflict(_) => 2004,
            CardError::InsufficientPunches => 2005,
            CardError::Repository(_) => 2200,
        }
    }
}
