//! Payments service errors.

use dukkan::orders::TransitionError;
use sqlx::Error;
use thiserror::Error;

use crate::{
    database::is_timeout,
    domain::payments::{GatewayError, WebhookError},
};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("order not found")]
    NotFound,

    #[error(transparent)]
    Conflict(#[from] TransitionError),

    #[error("order has no gateway invoice")]
    MissingInvoice,

    #[error("payment gateway failed")]
    Gateway(#[source] GatewayError),

    #[error("payment gateway timed out")]
    GatewayTimeout,

    #[error("webhook rejected")]
    InvalidSignature(#[source] WebhookError),

    #[error("webhook payload is invalid")]
    InvalidPayload,

    #[error("storage timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_timeout(&error) {
            return Self::Timeout;
        }

        Self::Sql(error)
    }
}

impl From<GatewayError> for PaymentsServiceError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Timeout => Self::GatewayTimeout,
            other => Self::Gateway(other),
        }
    }
}

impl From<WebhookError> for PaymentsServiceError {
    fn from(error: WebhookError) -> Self {
        match error {
            WebhookError::InvalidPayload => Self::InvalidPayload,
            WebhookError::MalformedSignature | WebhookError::SignatureMismatch => {
                Self::InvalidSignature(error)
            }
        }
    }
}
