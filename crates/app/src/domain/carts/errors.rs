//! Carts service errors.

use dukkan::{carts::CartError, discounts::DiscountError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::database::is_timeout;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("only {available} in stock, {requested} requested")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("related resource not found")]
    InvalidReference,

    #[error("pricing failed")]
    Pricing(#[source] DiscountError),

    #[error("storage timed out")]
    Timeout,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
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

impl From<DiscountError> for CartsServiceError {
    fn from(error: DiscountError) -> Self {
        Self::Pricing(error)
    }
}

impl From<CartError> for CartsServiceError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::InvalidQuantity => Self::InvalidQuantity,
            CartError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            CartError::LineNotFound => Self::ItemNotFound,
            CartError::Discount(error) => Self::Pricing(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_errors_keep_their_numbers() {
        let error = CartsServiceError::from(CartError::InsufficientStock {
            requested: 5,
            available: 2,
        });

        assert_eq!(error.to_string(), "only 2 in stock, 5 requested");
    }
}
