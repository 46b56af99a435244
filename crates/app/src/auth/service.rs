//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenSecret, AuthServiceError, IssuedApiToken, Principal, Role, UserUuid,
        format_api_token, hash_api_token, parse_api_token, repository::PgAuthRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Issue a new API token, creating or re-roling the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    #[tracing::instrument(name = "auth.service.issue_api_token", skip(self), err)]
    pub async fn issue_api_token(
        &self,
        user_uuid: UserUuid,
        role: Role,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let secret = ApiTokenSecret::generate();
        let token = format_api_token(token_uuid, &secret);
        let token_hash = hash_api_token(token_uuid, &secret);

        let mut tx = self.db.begin().await?;

        self.repository.ensure_user(&mut tx, user_uuid, role).await?;

        let metadata = self
            .repository
            .create_api_token(&mut tx, token_uuid, user_uuid, &token_hash)
            .await?;

        tx.commit().await?;

        info!(token_uuid = %metadata.uuid, "issued api token");

        Ok(IssuedApiToken {
            token,
            role,
            metadata,
        })
    }

    /// Revoke a token by UUID.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotFound`] if the token is unknown or
    /// already revoked.
    #[tracing::instrument(name = "auth.service.revoke_api_token", skip(self), err)]
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<(), AuthServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .revoke_api_token(&mut tx, token_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed = parse_api_token(bearer_token)?;

        let mut tx = self.db.begin().await?;

        let token = self
            .repository
            .find_active_api_token(&mut tx, parsed.token_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let expected = hash_api_token(parsed.token_uuid, &parsed.secret);

        if !hashes_match(&expected, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(error) = self
            .repository
            .touch_api_token(&mut tx, parsed.token_uuid)
            .await
        {
            warn!(%error, "failed to record api token use");
        }

        tx.commit().await?;

        Ok(Principal {
            user_uuid: token.user_uuid,
            role: token.role,
        })
    }
}

/// Compare two hex verifiers by digest so timing does not leak a prefix.
fn hashes_match(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the caller it belongs to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}
