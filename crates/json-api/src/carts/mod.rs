//! Carts

mod errors;
mod handlers;
mod models;

pub(crate) use handlers::*;
pub(crate) use models::LineResponse;
