//! Core error types used across the repository layer

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("No collection registered for entity {0}")]
    NotRegistered(String),

    #[error("Entity {entity} is already registered to collection '{collection}'")]
    AlreadyRegistered { entity: String, collection: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

impl CoreError {
    pub fn not_registered(entity: impl Into<String>) -> Self {
        CoreError::NotRegistered(entity.into())
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
