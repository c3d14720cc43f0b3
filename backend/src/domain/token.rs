//! Bearer token issue and verification.
//!
//! Access tokens are HS256 JWTs carrying only the subject user id and an
//! absolute expiry instant. Verification yields an enumerated error rather
//! than a generic parse failure so the authorization gate can coarsen all
//! variants into one caller-facing rejection.

use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Failure modes of [`TokenCodec::verify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature or structural validation failed.
    #[error("token is invalid")]
    Invalid,
    /// The expiry instant has passed.
    #[error("token has expired")]
    Expired,
    /// The embedded subject is not a valid user identifier.
    #[error("token subject is malformed")]
    MalformedSubject,
}

/// Signed token payload: subject id and absolute expiry (unix seconds).
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Signs and verifies access tokens with a process-lifetime secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    /// Build a codec from the configured signing secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `subject` expiring `ttl` from now.
    pub fn issue(&self, subject: UserId, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Validate signature and expiry, returning the embedded subject.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;
        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::MalformedSubject)
    }
}
