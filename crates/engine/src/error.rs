//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`Validation`] returned when caller input is missing or malformed.
//! - [`NotFound`] returned when a user, category or transaction does not
//!   exist or is not owned by the caller.
//! - [`Database`] wraps any storage fault.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
///
/// The `String` payloads are user-facing messages and are returned verbatim
/// by the HTTP layer.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
