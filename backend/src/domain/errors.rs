//! Error taxonomy shared by every domain service.

use thiserror::Error;

pub type DomainResult<T> = std::result::Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing, malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// An id that does not resolve
    #[error("{0}")]
    NotFound(String),

    /// Dangling category reference, or a delete blocked by dependents
    #[error("{message}")]
    Referential {
        message: String,
        expense_count: Option<usize>,
    },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn invalid_category() -> Self {
        DomainError::Referential {
            message: "Invalid category".to_string(),
            expense_count: None,
        }
    }

    pub fn blocked_by_expenses(message: impl Into<String>, expense_count: usize) -> Self {
        DomainError::Referential {
            message: message.into(),
            expense_count: Some(expense_count),
        }
    }
}
