//! Payment Handlers

pub(crate) mod callback;
pub(crate) mod methods;
pub(crate) mod webhook;
