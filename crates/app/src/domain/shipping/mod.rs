//! Shipping rates

pub mod errors;
pub(crate) mod repository;
mod service;

pub use errors::ShippingServiceError;
pub use service::*;
