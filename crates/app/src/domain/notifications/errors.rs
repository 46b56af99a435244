//! Notifications service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::database::is_timeout;

#[derive(Debug, Error)]
pub enum NotificationsServiceError {
    #[error("notification not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("storage timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for NotificationsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_timeout(&error) {
            return Self::Timeout;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
