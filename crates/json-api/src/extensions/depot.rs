//! Depot helper extensions.

use std::{any::Any, sync::Arc};

use dukkan_app::context::AppContext;
use salvo::prelude::{Depot, StatusError};

use crate::state::State;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Services injected with the server state.
    fn app(&self) -> Result<&AppContext, StatusError> {
        Ok(&self.obtain_or_500::<Arc<State>>()?.app)
    }
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error().brief("server state missing"))
    }
}
