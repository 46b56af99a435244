//! API token formatting, parsing and hashing.
//!
//! Tokens look like `dk_<token uuid>.<secret>`, where the secret is 32
//! random bytes in unpadded URL-safe base64. Only a SHA-256 verifier of the
//! secret is stored.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "dk";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Clone)]
pub struct ApiTokenSecret {
    bytes: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
    pub secret: ApiTokenSecret,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn format_api_token(token_uuid: Uuid, secret: &ApiTokenSecret) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}.{}",
        token_uuid.simple(),
        URL_SAFE_NO_PAD.encode(&secret.bytes)
    )
}

/// Split a bearer token into its UUID and secret.
///
/// # Errors
///
/// Returns an error when the prefix, UUID or secret are malformed.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (id, encoded_secret) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let token_uuid = id
        .strip_prefix(API_TOKEN_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|uuid| Uuid::try_parse(uuid).ok())
        .ok_or(ApiTokenError::InvalidFormat)?;

    let mut decoded = URL_SAFE_NO_PAD
        .decode(encoded_secret)
        .map_err(|_source| ApiTokenError::InvalidSecretEncoding)?;

    let bytes: Result<[u8; API_TOKEN_SECRET_BYTES], _> = decoded.as_slice().try_into();

    decoded.zeroize();

    let bytes = bytes.map_err(|_source| ApiTokenError::InvalidSecretEncoding)?;

    Ok(ParsedApiToken {
        token_uuid,
        secret: ApiTokenSecret::from_bytes(bytes),
    })
}

/// Stored verifier: hex SHA-256 over the token UUID and secret.
#[must_use]
pub fn hash_api_token(token_uuid: Uuid, secret: &ApiTokenSecret) -> String {
    let mut hasher = Sha256::new();

    hasher.update(token_uuid.as_bytes());
    hasher.update(&secret.bytes);

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formatted_token_parses_back() -> TestResult {
        let token_uuid = Uuid::now_v7();
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);

        let parsed = parse_api_token(&format_api_token(token_uuid, &secret))?;

        assert_eq!(parsed.token_uuid, token_uuid);
        assert_eq!(
            hash_api_token(parsed.token_uuid, &parsed.secret),
            hash_api_token(token_uuid, &secret)
        );

        Ok(())
    }

    #[test]
    fn rejects_foreign_prefix() {
        let result = parse_api_token("lt_0190b3c45e6f7a8b9c0d1e2f3a4b5c6d.AAAA");

        assert_eq!(result.err(), Some(ApiTokenError::InvalidFormat));
    }

    #[test]
    fn rejects_short_secret() {
        let token = format!("dk_{}.AAAA", Uuid::nil().simple());

        assert_eq!(
            parse_api_token(&token).err(),
            Some(ApiTokenError::InvalidSecretEncoding)
        );
    }

    #[test]
    fn different_secrets_hash_differently() {
        let token_uuid = Uuid::nil();
        let a = ApiTokenSecret::from_bytes([1; API_TOKEN_SECRET_BYTES]);
        let b = ApiTokenSecret::from_bytes([2; API_TOKEN_SECRET_BYTES]);

        assert_ne!(hash_api_token(token_uuid, &a), hash_api_token(token_uuid, &b));
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = ApiTokenSecret::generate();

        assert_eq!(format!("{secret:?}"), "ApiTokenSecret(**redacted**)");
    }
}
