use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the debt engine.
#[derive(Debug, Error)]
pub enum DebtError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Consistency violation: {0}")]
    Consistency(String),
    #[error("Debt not found: {0}")]
    DebtNotFound(Uuid),
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, DebtError>;

impl From<std::io::Error> for DebtError {
    fn from(err: std::io::Error) -> Self {
        DebtError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DebtError {
    fn from(err: serde_json::Error) -> Self {
        DebtError::Storage(err.to_string())
    }
}
