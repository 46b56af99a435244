//! Offers

pub mod errors;
pub mod models;
pub(crate) mod repository;
mod service;

pub use errors::OffersServiceError;
pub use service::*;
