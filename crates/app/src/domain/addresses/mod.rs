//! Address book

pub mod errors;
pub mod models;
pub(crate) mod repository;
mod service;

pub use errors::AddressesServiceError;
pub use service::*;
