//! Database error types
//!
//! This module defines the errors surfaced by the MongoDB adapter. Driver
//! failures travel unmodified inside `DatabaseError::Driver`; callers that
//! want a more specific view can ask for [`DatabaseError::classify`].

use mongodb::error::{
    Error as MongoError, ErrorKind, WriteFailure, TRANSIENT_TRANSACTION_ERROR,
    UNKNOWN_TRANSACTION_COMMIT_RESULT,
};
use repo_kernel::CoreError;
use thiserror::Error;

/// Server error code for unique index violations
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to reach the deployment
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Unique index violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// A write was rejected by the server
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// A server command returned an error
    #[error("Command failed with code {code}: {message}")]
    CommandFailed { code: i32, message: String },

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// BSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Connection settings could not be applied
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Registry or naming error from the kernel
    #[error(transparent)]
    Registry(#[from] CoreError),

    /// Unclassified driver error, passed through as-is
    #[error("MongoDB error: {0}")]
    Driver(#[from] MongoError),
}

impl DatabaseError {
    /// Maps a driver error onto the most specific variant
    pub fn classify(error: &MongoError) -> Self {
        DatabaseError::from(error)
    }

    /// Checks if this error is a unique index violation
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            DatabaseError::DuplicateEntry(_) => true,
            DatabaseError::Driver(e) => matches!(Self::classify(e), DatabaseError::DuplicateEntry(_)),
            _ => false,
        }
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        match self {
            DatabaseError::ConnectionFailed(_) => true,
            DatabaseError::Driver(e) => matches!(Self::classify(e), DatabaseError::ConnectionFailed(_)),
            _ => false,
        }
    }

    /// Checks if retrying the surrounding transaction may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            DatabaseError::Driver(e) => {
                e.contains_label(TRANSIENT_TRANSACTION_ERROR)
                    || e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
                    || self.is_connection_error()
            }
            DatabaseError::ConnectionFailed(_) => true,
            _ => false,
        }
    }
}

impl From<&MongoError> for DatabaseError {
    fn from(error: &MongoError) -> Self {
        match error.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                if write_error.code == DUPLICATE_KEY_CODE {
                    DatabaseError::DuplicateEntry(write_error.message.clone())
                } else {
                    DatabaseError::WriteFailed(write_error.message.clone())
                }
            }
            ErrorKind::Write(WriteFailure::WriteConcernError(concern)) => {
                DatabaseError::WriteFailed(concern.message.clone())
            }
            ErrorKind::Command(command) => {
                if command.code == DUPLICATE_KEY_CODE {
                    DatabaseError::DuplicateEntry(command.message.clone())
                } else {
                    DatabaseError::CommandFailed {
                        code: command.code,
                        message: command.message.clone(),
                    }
                }
            }
            ErrorKind::ServerSelection { message, .. } => DatabaseError::ConnectionFailed(message.clone()),
            ErrorKind::Io(io) => DatabaseError::ConnectionFailed(io.to_string()),
            ErrorKind::ConnectionPoolCleared { message, .. } => DatabaseError::ConnectionFailed(message.clone()),
            ErrorKind::Authentication { message, .. } => DatabaseError::Authentication(message.clone()),
            ErrorKind::Transaction { message, .. } => DatabaseError::TransactionFailed(message.clone()),
            ErrorKind::BsonSerialization(e) => DatabaseError::SerializationError(e.to_string()),
            ErrorKind::BsonDeserialization(e) => DatabaseError::SerializationError(e.to_string()),
            ErrorKind::InvalidArgument { message, .. } => DatabaseError::InvalidConfiguration(message.clone()),
            _ => DatabaseError::Driver(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_error() -> MongoError {
        MongoError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
    }

    #[test]
    fn test_io_errors_are_connection_errors() {
        let error = DatabaseError::from(io_error());

        assert!(error.is_connection_error());
        assert!(error.is_transient());
        assert!(!error.is_duplicate_key());
        assert!(matches!(DatabaseError::classify(&io_error()), DatabaseError::ConnectionFailed(_)));
    }

    #[test]
    fn test_registry_errors_are_not_transient() {
        let error = DatabaseError::from(CoreError::not_registered("Customer"));

        assert!(!error.is_transient());
        assert!(!error.is_connection_error());
        assert_eq!(error.to_string(), "No collection registered for entity Customer");
    }

    #[test]
    fn test_duplicate_entry_variant() {
        let error = DatabaseError::DuplicateEntry("E11000 duplicate key".to_string());
        assert!(error.is_duplicate_key());
        assert!(!error.is_transient());
    }
}
