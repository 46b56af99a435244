//! Catalog service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::database::is_timeout;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("catalog entry already exists")]
    AlreadyExists,

    #[error("catalog entry not found")]
    NotFound,

    #[error("parent catalog entry not found")]
    InvalidReference,

    #[error("{0}")]
    Validation(String),

    #[error("storage timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CatalogServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_timeout(&error) {
            return Self::Timeout;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
