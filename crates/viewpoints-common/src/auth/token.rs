//! Identity-provider session tokens
//!
//! Users sign in with the hosted identity provider, which hands the browser
//! a short-lived HS256 JWT. The API never issues credentials of its own; it
//! only verifies those tokens and reads the user id from `sub`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried by a provider session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (provider user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// The authenticated user id
    ///
    /// # Errors
    /// Returns `InvalidToken` if the subject is blank
    pub fn user_id(&self) -> Result<&str, AppError> {
        let sub = self.sub.trim();
        if sub.is_empty() {
            Err(AppError::InvalidToken)
        } else {
            Ok(sub)
        }
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Verifies (and, for tests and local tooling, mints) provider tokens
#[derive(Clone)]
pub struct IdentityTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl IdentityTokenService {
    /// Create a new token service from the shared secret
    #[must_use]
    pub fn new(secret: &str, issuer: Option<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Mint a token for `user_id` valid for `ttl_seconds`
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, user_id: &str, ttl_seconds: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode token: {e}")))
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns `TokenExpired` for expired tokens and `InvalidToken` otherwise
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }

    /// Verify a token and return the user id it names
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or has no subject
    pub fn verify_user_id(&self, token: &str) -> Result<String, AppError> {
        let claims = self.verify(token)?;
        claims.user_id().map(str::to_string)
    }
}

impl std::fmt::Debug for IdentityTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityTokenService")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
