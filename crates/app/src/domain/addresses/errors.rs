//! Addresses service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::database::is_timeout;

#[derive(Debug, Error)]
pub enum AddressesServiceError {
    #[error("address already exists")]
    AlreadyExists,

    #[error("address not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("storage timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AddressesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_timeout(&error) {
            return Self::Timeout;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
