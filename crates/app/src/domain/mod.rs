//! Dukkan Domain Concerns

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod notifications;
pub mod offers;
pub mod orders;
pub mod payments;
pub(crate) mod pricing;
pub mod products;
pub mod shipping;
