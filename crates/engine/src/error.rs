//! The module contains the error the engine can throw.
//!
//! Validation failures (`InvalidAmount`, `OdometerRegression`, `InvalidUnit`)
//! only happen at the write boundary; the read-side aggregators never fail on
//! well-formed or even malformed stored data.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Odometer regression: {0}")]
    OdometerRegression(String),
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::OdometerRegression(a), Self::OdometerRegression(b)) => a == b,
            (Self::InvalidUnit(a), Self::InvalidUnit(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
