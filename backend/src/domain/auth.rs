//! Authorization gate: token-to-identity resolution and access decisions.
//!
//! Every rejection on the token path collapses into one generic message so
//! callers cannot distinguish a bad signature from an expired token or a
//! deleted user.

use zeroize::Zeroizing;

use super::error::Error;
use super::store::IdentityStore;
use super::token::TokenCodec;
use super::user::{User, UserId};

/// Single caller-facing message for every token-path rejection.
pub const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

/// Validation errors for [`LoginCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and kept in zeroizing storage.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the user lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password exactly as the caller provided it.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Resolve a presented bearer token to an authenticated user.
///
/// A token for a deleted user is indistinguishable from a malformed one:
/// both yield the same `Unauthorized` error.
pub fn resolve_bearer(
    store: &IdentityStore,
    codec: &TokenCodec,
    token: &str,
) -> Result<User, Error> {
    let subject = codec
        .verify(token)
        .map_err(|_| Error::unauthorized(CREDENTIALS_MESSAGE))?;
    store
        .get_user(subject)
        .ok_or_else(|| Error::unauthorized(CREDENTIALS_MESSAGE))
}

/// Pass only superusers.
pub fn require_superuser(user: &User) -> Result<(), Error> {
    if user.is_superuser() {
        Ok(())
    } else {
        Err(Error::forbidden("The user doesn't have enough privileges"))
    }
}

/// True iff `user` is a superuser or owns the resource.
pub fn can_access(user: &User, resource_owner: UserId) -> bool {
    user.is_superuser() || user.id() == resource_owner
}
