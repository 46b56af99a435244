//! Payments
//!
//! Gateway client, webhook verification and the service that applies
//! gateway reports and refunds to orders.

pub mod errors;
mod gateway;
mod service;
mod webhook;

pub use errors::PaymentsServiceError;
pub use gateway::*;
pub use service::*;
pub use webhook::*;
