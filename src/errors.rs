use std::result::Result as StdResult;

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Unified error type for the domain, validation, form and storage layers.
#[derive(Error, Debug)]
pub enum BankFormError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Record not found: {0}")]
    RecordNotFound(u64),
    #[error("Persistence error: {0}")]
    StorageFailure(String),
    #[error("Address change refused: {0}")]
    AddressPolicyViolation(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, BankFormError>;

impl From<std::io::Error> for BankFormError {
    fn from(err: std::io::Error) -> Self {
        BankFormError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for BankFormError {
    fn from(err: serde_json::Error) -> Self {
        BankFormError::StorageFailure(err.to_string())
    }
}

impl From<regex::Error> for BankFormError {
    fn from(err: regex::Error) -> Self {
        BankFormError::Config(err.to_string())
    }
}

impl From<ValidationErrors> for BankFormError {
    fn from(errors: ValidationErrors) -> Self {
        BankFormError::Validation(errors)
    }
}

impl BankFormError {
    /// Returns the field errors when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            BankFormError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
