//! Orders

pub mod errors;
pub mod models;
pub(crate) mod repository;
mod service;

pub use errors::OrdersServiceError;
pub use service::*;
