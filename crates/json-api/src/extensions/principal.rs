//! Authenticated caller stored in the depot.

use dukkan_app::auth::Principal;
use salvo::prelude::{Depot, StatusError};

const PRINCIPAL_DEPOT_KEY: &str = "principal";

/// Store and retrieve the caller resolved by the auth middleware.
pub(crate) trait PrincipalExt {
    fn insert_principal(&mut self, principal: Principal);

    fn principal(&self) -> Option<Principal>;

    /// The caller, or 401 when the route was reached unauthenticated.
    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.principal()
            .ok_or_else(|| StatusError::unauthorized().brief("Authentication required"))
    }

    /// The caller when they are an admin, 403 otherwise.
    fn admin_or_403(&self) -> Result<Principal, StatusError> {
        let principal = self.principal_or_401()?;

        if principal.is_admin() {
            Ok(principal)
        } else {
            Err(StatusError::forbidden().brief("Admin role required"))
        }
    }
}

impl PrincipalExt for Depot {
    fn insert_principal(&mut self, principal: Principal) {
        self.insert(PRINCIPAL_DEPOT_KEY, principal);
    }

    fn principal(&self) -> Option<Principal> {
        self.get::<Principal>(PRINCIPAL_DEPOT_KEY).ok().copied()
    }
}
