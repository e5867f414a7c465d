//! Bearer token issuance and validation
//!
//! Tokens are HS256 JWTs carrying a `username` claim and an expiry. They are
//! stateless: nothing is stored server side, so a token stays valid until it
//! expires or the signing secret changes. There is no revocation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Default token lifetime in seconds (24 hours)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Failure to issue a token
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expiry is outside the supported time range")]
    ExpiryOverflow,

    #[error("Failed to encode token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Process-wide secret used to sign and verify tokens
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Returns `None` for an empty secret
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub username: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Username resolved from a valid token, scoped to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Initialize a new token service with the given secret and default TTL
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Lifetime applied by [`TokenService::issue`]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `username` valid for the configured TTL
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, Utc::now(), self.ttl)
    }

    /// Issue a token for `username` with an explicit issue time and lifetime
    pub fn issue_at(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::ExpiryOverflow)?;

        let claims = Claims {
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Validate a token against the current time
    pub fn validate(&self, token: &str) -> Option<Identity> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    ///
    /// Malformed tokens, bad signatures and expired tokens all yield `None`;
    /// the reason is only visible in debug logs.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<Identity> {
        let token_data = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                debug!("Rejected token: {}", e);
                return None;
            }
        };

        if now.timestamp() >= token_data.claims.exp {
            debug!("Rejected token: expired");
            return None;
        }

        Some(Identity::new(token_data.claims.username))
    }
}
