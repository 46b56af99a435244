//! Orders service errors.

use dukkan::{discounts::DiscountError, orders::TransitionError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    database::is_timeout,
    domain::{carts::CartsServiceError, payments::GatewayError},
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order belongs to another user")]
    Forbidden,

    #[error("address not found")]
    AddressNotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("{0}")]
    CouponRejected(String),

    #[error("only {available} in stock, {requested} requested")]
    InsufficientStock { requested: u32, available: u32 },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("invalid data")]
    InvalidData,

    #[error("payment gateway failed")]
    Gateway(#[source] GatewayError),

    #[error("pricing failed")]
    Pricing(#[from] DiscountError),

    #[error("storage timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_timeout(&error) {
            return Self::Timeout;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<GatewayError> for OrdersServiceError {
    fn from(error: GatewayError) -> Self {
        Self::Gateway(error)
    }
}

impl From<CartsServiceError> for OrdersServiceError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::NotFound => Self::EmptyCart,
            CartsServiceError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            CartsServiceError::Pricing(error) => Self::Pricing(error),
            CartsServiceError::Timeout => Self::Timeout,
            CartsServiceError::Sql(error) => Self::Sql(error),
            CartsServiceError::ItemNotFound
            | CartsServiceError::ProductNotFound
            | CartsServiceError::InvalidQuantity
            | CartsServiceError::InvalidReference => Self::InvalidData,
        }
    }
}
