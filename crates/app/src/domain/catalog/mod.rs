//! Catalog hierarchy

pub mod errors;
pub mod models;
mod repository;
mod service;

pub use errors::CatalogServiceError;
pub use service::*;
