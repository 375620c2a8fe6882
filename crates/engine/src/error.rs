//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`NotFound`] thrown when a row does not exist or is not owned by the
//!   caller. Both cases share the variant so existence never leaks across
//!   users.
//! - [`InvalidInput`] thrown by validation, before anything is written.
//! - [`InsufficientFunds`] thrown when a transfer would overdraw its source.
//! - [`Conflict`] thrown on uniqueness violations.
//! - [`Database`] wraps store failures; the unit of work has been rolled back.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`Conflict`]: EngineError::Conflict
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" already present!")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn not_found(what: &str) -> Self {
        Self::NotFound(what.to_string())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// `true` for errors raised by validation (no write was attempted).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_not_client_errors() {
        let err = EngineError::from(DbErr::Custom("boom".to_string()));
        assert!(!err.is_client_error());
        assert!(EngineError::not_found("account").is_client_error());
    }

    #[test]
    fn display_keeps_identifiers() {
        let err = EngineError::not_found("account 7");
        assert_eq!(err.to_string(), "\"account 7\" not found!");
    }
}
