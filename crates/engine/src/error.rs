//! The module contains the errors the engine can return.
//!
//! Bad user input never surfaces here: the normalizer repairs it and reports
//! warnings instead. Errors are reserved for:
//!
//! - [`KeyNotFound`] thrown when a category name is unknown.
//! - [`InvalidAmount`] / [`InvalidDate`] thrown by strict parsers.
//! - [`InvalidCsv`] thrown when a stored or exported CSV does not match the
//!   category layout.
//! - [`Export`] thrown when a report cannot be rendered.
//! - [`Store`] thrown when the persistence directory is unusable.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidCsv`]: EngineError::InvalidCsv
//!  [`Export`]: EngineError::Export
//!  [`Store`]: EngineError::Store
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid csv: {0}")]
    InvalidCsv(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidCsv(a), Self::InvalidCsv(b)) => a == b,
            (Self::Export(a), Self::Export(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Pdf(a), Self::Pdf(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
