//! Errors

use dukkan_app::domain::notifications::NotificationsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: NotificationsServiceError) -> StatusError {
    match error {
        NotificationsServiceError::NotFound => {
            StatusError::not_found().brief("Notification not found")
        }
        NotificationsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown user or order")
        }
        NotificationsServiceError::Timeout => {
            error!("notifications storage timed out");

            StatusError::gateway_timeout()
        }
        NotificationsServiceError::Sql(source) => {
            error!("notifications storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
