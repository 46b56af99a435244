//! Errors

use dukkan_app::domain::catalog::CatalogServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => StatusError::not_found().brief("Catalog entry not found"),
        CatalogServiceError::AlreadyExists => {
            StatusError::conflict().brief("Catalog entry already exists")
        }
        CatalogServiceError::InvalidReference => {
            StatusError::bad_request().brief("Parent entry does not exist")
        }
        CatalogServiceError::Validation(reason) => StatusError::bad_request().brief(reason),
        CatalogServiceError::Timeout => {
            error!("catalog storage timed out");

            StatusError::gateway_timeout()
        }
        CatalogServiceError::Sql(source) => {
            error!("catalog storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
