//! Dukkan
//!
//! Pricing core for the Dukkan storefront: offer resolution, line discounts,
//! cart aggregation, order totals and the order/payment state machines.
//!
//! Everything in this crate is pure. Money is integer fils (1 KWD = 1000 fils)
//! and instants are UTC [`jiff::Timestamp`]s.

pub mod carts;
pub mod discounts;
pub mod money;
pub mod offers;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shipping;

#[cfg(test)]
pub(crate) mod fixtures;
