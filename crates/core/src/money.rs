//! Money
//!
//! Prices are [`Money`] in Kuwaiti Dinar. Stored records and API payloads
//! carry whole fils (1 KWD = 1000 fils) as `u64`, converted at the edge with
//! [`from_fils`] and [`to_fils`].
//!
//! Percentages are [`Percentage`] fractions. Offers store and exchange them
//! as percentage points, see [`points`].

use std::num::TryFromIntError;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// The storefront currency.
pub const CURRENCY: &Currency = iso::KWD;

/// Fils amount that cannot be represented as money.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// Minor units do not fit the target integer, or are negative.
    #[error("amount is out of range")]
    OutOfRange(#[from] TryFromIntError),
}

/// Zero KWD.
pub fn zero() -> Money<'static, Currency> {
    Money::from_minor(0, CURRENCY)
}

/// Money for a stored fils amount.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] when `fils` exceeds `i64::MAX`.
pub fn from_fils(fils: u64) -> Result<Money<'static, Currency>, AmountError> {
    Ok(Money::from_minor(i64::try_from(fils)?, CURRENCY))
}

/// Whole fils for storage.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] for negative amounts.
pub fn to_fils(money: &Money<'_, Currency>) -> Result<u64, AmountError> {
    Ok(u64::try_from(money.to_minor_units())?)
}

/// Percentage from percentage points, `10` being 10%.
pub fn from_points(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Percentage points of a percentage.
pub fn to_points(percent: Percentage) -> Decimal {
    (percent * Decimal::ONE_HUNDRED).normalize()
}

/// Serde adapter writing a [`Percentage`] as a percentage-points decimal.
pub mod points {
    use decimal_percentage::Percentage;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize as points.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(percent: &Percentage, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serialize::serialize(&super::to_points(*percent), serializer)
    }

    /// Deserialize from points.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Percentage, D::Error>
    where
        D: Deserializer<'de>,
    {
        <Decimal as Deserialize>::deserialize(deserializer).map(super::from_points)
    }
}
