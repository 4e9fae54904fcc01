use thiserror::Error;

use crate::contract::model::Role;
use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PvzError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{operation} requires role '{required}'")]
    Forbidden {
        operation: &'static str,
        required: Role,
    },

    #[error("Internal error")]
    Internal,
}

impl PvzError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn forbidden(operation: &'static str, required: Role) -> Self {
        Self::Forbidden {
            operation,
            required,
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for PvzError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::CityNotFound { .. } => PvzError::validation(message),
            DomainError::PointNotFound { .. } | DomainError::ProductNotFound { .. } => {
                PvzError::not_found(message)
            }
            DomainError::ActiveReceptionNotFound { .. } => PvzError::validation(message),
            DomainError::ReceptionAlreadyOpened { .. }
            | DomainError::ProductAlreadyDeleted { .. }
            | DomainError::InvalidTransition { .. } => PvzError::conflict(message),
            DomainError::Unavailable { .. } => PvzError::internal(),
        }
    }
}
