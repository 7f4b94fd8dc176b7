//! Error types and result types for store adapter operations.
//!
//! This module provides error handling for all adapter operations.
//! Use [`StoreResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a store adapter.
///
/// Driver errors are opaque: the adapter performs no translation or classification
/// of them and surfaces the driver's message unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Serialization/deserialization error when converting between payload formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during driver construction or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The supplied identifier could not be converted to the driver's native representation.
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    /// The request payload does not have the shape the operation requires.
    #[error("Invalid request data: {0}")]
    InvalidData(String),
    /// An error reported by the underlying driver, passed through unchanged.
    #[error("Driver error: {0}")]
    Driver(String),
}

/// A specialized `Result` type for store adapter operations.
///
/// This type alias is used throughout the crate to indicate operations that may fail
/// with a [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
