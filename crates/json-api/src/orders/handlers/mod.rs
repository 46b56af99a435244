//! Order Handlers

pub(crate) mod checkout;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod refund;
pub(crate) mod status;
