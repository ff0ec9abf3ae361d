//! Error types for the Pilum library.
//!
//! All errors are represented by the [`PilumError`] enum. The first four
//! variants are the validation failures every collection operation can report;
//! the rest cover mapping, argument and I/O problems.
//!
//! # Examples
//!
//! ```
//! use pilum::error::{PilumError, Result};
//!
//! fn lookup(name: &str) -> Result<()> {
//!     Err(PilumError::unknown_collection(name))
//! }
//!
//! match lookup("brands") {
//!     Err(PilumError::UnknownCollection(name)) => assert_eq!(name, "brands"),
//!     _ => unreachable!(),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Pilum operations.
#[derive(Error, Debug)]
pub enum PilumError {
    /// The named collection does not exist.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// A field is not declared in the collection's mapping.
    #[error("Unknown field '{field}' in collection '{collection}'")]
    UnknownField { collection: String, field: String },

    /// The collection has been closed.
    #[error("Collection is closed: {0}")]
    ClosedCollection(String),

    /// A collection with the same name already exists.
    #[error("Collection already exists: {0}")]
    DuplicateCollection(String),

    /// A value or query does not fit the mapped field type.
    #[error("Field '{field}' expected {expected}, got {actual}")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Mapping or schema errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid argument passed by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine has been closed
    #[error("Engine is closed")]
    EngineClosed,

    /// I/O errors (config files, CLI input)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors carrying context from the CLI loaders
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PilumError.
pub type Result<T> = std::result::Result<T, PilumError>;

impl PilumError {
    /// Create a new unknown collection error.
    pub fn unknown_collection<S: Into<String>>(name: S) -> Self {
        PilumError::UnknownCollection(name.into())
    }

    /// Create a new unknown field error.
    pub fn unknown_field<C: Into<String>, F: Into<String>>(collection: C, field: F) -> Self {
        PilumError::UnknownField {
            collection: collection.into(),
            field: field.into(),
        }
    }

    /// Create a new closed collection error.
    pub fn closed<S: Into<String>>(name: S) -> Self {
        PilumError::ClosedCollection(name.into())
    }

    /// Create a new duplicate collection error.
    pub fn duplicate<S: Into<String>>(name: S) -> Self {
        PilumError::DuplicateCollection(name.into())
    }

    /// Create a new field type mismatch error.
    pub fn type_mismatch<F, E, A>(field: F, expected: E, actual: A) -> Self
    where
        F: Into<String>,
        E: ToString,
        A: ToString,
    {
        PilumError::FieldTypeMismatch {
            field: field.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        PilumError::Schema(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PilumError::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PilumError::unknown_collection("brands");
        assert_eq!(error.to_string(), "Unknown collection: brands");

        let error = PilumError::unknown_field("brands", "color");
        assert_eq!(
            error.to_string(),
            "Unknown field 'color' in collection 'brands'"
        );

        let error = PilumError::type_mismatch("name", "completion", "text");
        assert_eq!(
            error.to_string(),
            "Field 'name' expected completion, got text"
        );

        let error = PilumError::schema("Test schema error");
        assert_eq!(error.to_string(), "Schema error: Test schema error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let pilum_error = PilumError::from(io_error);

        match pilum_error {
            PilumError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_anyhow_context_is_kept() {
        let inner = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let error = PilumError::from(anyhow::Error::new(inner).context("failed to load mapping"));

        assert_eq!(error.to_string(), "failed to load mapping: no such file");
    }
}
