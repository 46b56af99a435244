//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{auth::ApiTokenError, database::is_timeout};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token not found")]
    NotFound,

    #[error("storage timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] ApiTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if is_timeout(&error) {
            return Self::Timeout;
        }

        Self::Sql(error)
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}
