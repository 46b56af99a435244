//! Carts

pub mod errors;
pub mod models;
pub(crate) mod repositories;
mod service;
pub(crate) mod store;

pub use errors::CartsServiceError;
pub use service::*;
