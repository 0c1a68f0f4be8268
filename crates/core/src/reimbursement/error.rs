//! Reimbursement error types.
//!
//! Every variant is a synchronous validation failure surfaced to the caller.
//! None are retried; once one is raised the repository is not written.

use reimburse_shared::AppError;
use reimburse_shared::types::ReimbursementId;
use thiserror::Error;

use crate::reimbursement::types::{ReimbursementCategory, StatusKind};

/// Errors that can occur during reimbursement operations.
#[derive(Debug, Error)]
pub enum ReimbursementError {
    /// No record exists for the requested id.
    #[error("Reimbursement not found")]
    NotFound(ReimbursementId),

    /// The record is not in the status the operation confirms.
    #[error("Reimbursement is not {}", .expected.label())]
    InvalidStateTransition {
        /// Status the record is in.
        current: StatusKind,
        /// Status the operation requires.
        expected: StatusKind,
    },

    /// Metadata belongs to a different category than the record.
    #[error("Metadata category {actual} does not match reimbursement category {expected}")]
    CategoryMismatch {
        /// The record's category.
        expected: ReimbursementCategory,
        /// The supplied metadata's category.
        actual: ReimbursementCategory,
    },

    /// Metadata violates a field constraint.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The repository collaborator failed.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl ReimbursementError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidStateTransition { .. }
            | Self::CategoryMismatch { .. }
            | Self::InvalidMetadata(_) => 400,
            Self::NotFound(_) => 404,
            Self::Repository(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "REIMBURSEMENT_NOT_FOUND",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::CategoryMismatch { .. } => "CATEGORY_MISMATCH",
            Self::InvalidMetadata(_) => "INVALID_METADATA",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

impl From<ReimbursementError> for AppError {
    fn from(err: ReimbursementError) -> Self {
        let message = err.to_string();
        match err {
            ReimbursementError::NotFound(_) => Self::NotFound(message),
            ReimbursementError::InvalidStateTransition { .. } => Self::BusinessRule(message),
            ReimbursementError::CategoryMismatch { .. } | ReimbursementError::InvalidMetadata(_) => {
                Self::Validation(message)
            }
            ReimbursementError::Repository(_) => Self::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ReimbursementError::NotFound(ReimbursementId::new());
        assert_eq!(err.to_string(), "Reimbursement not found");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "REIMBURSEMENT_NOT_FOUND");
    }

    #[test]
    fn test_invalid_state_transition_messages() {
        let not_approved = ReimbursementError::InvalidStateTransition {
            current: StatusKind::Rejected,
            expected: StatusKind::Approved,
        };
        assert_eq!(not_approved.to_string(), "Reimbursement is not approved");
        assert_eq!(not_approved.status_code(), 400);

        let not_rejected = ReimbursementError::InvalidStateTransition {
            current: StatusKind::Pending,
            expected: StatusKind::Rejected,
        };
        assert_eq!(not_rejected.to_string(), "Reimbursement is not rejected");
        assert_eq!(not_rejected.error_code(), "INVALID_STATE_TRANSITION");
    }

    #[test]
    fn test_category_mismatch_error() {
        let err = ReimbursementError::CategoryMismatch {
            expected: ReimbursementCategory::Travel,
            actual: ReimbursementCategory::Meals,
        };
        assert!(err.to_string().contains("MEALS"));
        assert!(err.to_string().contains("TRAVEL"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_repository_error() {
        let err = ReimbursementError::repository("connection reset");
        assert_eq!(err.to_string(), "Repository error: connection reset");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "REPOSITORY_ERROR");
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = ReimbursementError::NotFound(ReimbursementId::new()).into();
        assert!(matches!(app, AppError::NotFound(ref msg) if msg == "Reimbursement not found"));

        let app: AppError = ReimbursementError::InvalidStateTransition {
            current: StatusKind::Pending,
            expected: StatusKind::Approved,
        }
        .into();
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");

        let app: AppError = ReimbursementError::InvalidMetadata("participants".into()).into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = ReimbursementError::repository("down").into();
        assert_eq!(app.error_code(), "DATABASE_ERROR");
    }
}
