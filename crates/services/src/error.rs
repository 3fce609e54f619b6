//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use weekly_core::model::{GoalError, GoalId, ProgressError};

use crate::progress_service::{MAX_HISTORY_WEEKS, MIN_HISTORY_WEEKS};

/// How a service failure should be surfaced to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced goal does not exist.
    NotFound,
    /// The request itself is malformed or does not fit the goal.
    InvalidInput,
    /// The store failed; details are for logs, not for callers.
    StoreFailure,
}

/// Errors emitted by `GoalService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GoalServiceError {
    #[error("Goal not found")]
    NotFound(GoalId),
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GoalServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GoalServiceError::NotFound(_) => ErrorKind::NotFound,
            GoalServiceError::Goal(_) => ErrorKind::InvalidInput,
            GoalServiceError::Storage(_) => ErrorKind::StoreFailure,
        }
    }
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("Goal not found")]
    GoalNotFound(GoalId),
    #[error("Weeks must be between {} and {}", MIN_HISTORY_WEEKS, MAX_HISTORY_WEEKS)]
    InvalidWeeks(u32),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProgressServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressServiceError::GoalNotFound(_) => ErrorKind::NotFound,
            ProgressServiceError::InvalidWeeks(_) | ProgressServiceError::Progress(_) => {
                ErrorKind::InvalidInput
            }
            ProgressServiceError::Storage(_) => ErrorKind::StoreFailure,
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_failure_source() {
        assert_eq!(
            GoalServiceError::NotFound(GoalId::new(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            GoalServiceError::from(GoalError::EmptyTitle).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ProgressServiceError::from(StorageError::Connection("gone".into())).kind(),
            ErrorKind::StoreFailure
        );
        assert_eq!(
            ProgressServiceError::from(ProgressError::MissingValue).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn invalid_weeks_message_names_the_range() {
        assert_eq!(
            ProgressServiceError::InvalidWeeks(0).to_string(),
            "Weeks must be between 1 and 52"
        );
    }
}
