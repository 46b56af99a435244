//! In-app notifications
//!
//! Notifications are stored first, then pushed to the recipient's live
//! stream when the presence registry knows one.

mod dispatcher;
pub mod errors;
pub mod models;
mod presence;
mod repository;
mod service;

pub use dispatcher::NotificationDispatcher;
pub use errors::NotificationsServiceError;
pub use presence::*;
pub use service::*;
