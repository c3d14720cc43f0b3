//! User entity and its update payloads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patch::Patch;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Validation errors for [`Email`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Address is empty once trimmed.
    #[error("email must not be empty")]
    Empty,
    /// Address is missing an `@` or has surrounding whitespace.
    #[error("email is not a valid address")]
    Malformed,
}

/// Email address stored as provided but compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(value: impl Into<String>) -> Result<Self, EmailValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if value.trim() != value || !value.contains('@') {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(value))
    }

    /// Address exactly as the caller supplied it.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lowercased form used for uniqueness and lookup comparisons.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive equality against another address.
    pub fn matches(&self, other: &Email) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` and `created_at` are immutable after creation.
/// - `hashed_password` is opaque credential material and is never exposed
///   through public payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: Email,
    full_name: Option<String>,
    is_active: bool,
    is_superuser: bool,
    hashed_password: String,
    created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        email: Email,
        full_name: Option<String>,
        is_active: bool,
        is_superuser: bool,
        hashed_password: String,
    ) -> Self {
        Self {
            id: UserId::random(),
            email,
            full_name,
            is_active,
            is_superuser,
            hashed_password,
            created_at: Utc::now(),
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Email address as provided at creation or last update.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Optional display name.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Inactive users cannot authenticate.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Superusers bypass ownership checks on every resource.
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Opaque credential material; only the credential engine interprets it.
    pub(crate) fn hashed_password(&self) -> &str {
        self.hashed_password.as_str()
    }

    /// Creation instant; the sole ordering key for listings.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn set_email(&mut self, email: Email) {
        self.email = email;
    }

    pub(crate) fn set_full_name(&mut self, full_name: Option<String>) {
        self.full_name = full_name;
    }

    pub(crate) fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    pub(crate) fn set_superuser(&mut self, is_superuser: bool) {
        self.is_superuser = is_superuser;
    }

    pub(crate) fn set_hashed_password(&mut self, hashed_password: String) {
        self.hashed_password = hashed_password;
    }
}

/// Validated inputs for creating a user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: Email,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub password: String,
}

/// Partial update applied by the admin user-update operation.
///
/// Field policy: a present-null `email`, `is_active`, `is_superuser`, or
/// `password` is ignored, while a present-null `full_name` clears the
/// display name.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Patch<Email>,
    pub full_name: Patch<String>,
    pub password: Patch<String>,
    pub is_active: Patch<bool>,
    pub is_superuser: Patch<bool>,
}

/// Partial update applied by the self-service profile operation.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateMe {
    pub email: Patch<Email>,
    pub full_name: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("no-at-sign", EmailValidationError::Malformed)]
    #[case(" padded@example.com", EmailValidationError::Malformed)]
    fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: EmailValidationError) {
        assert_eq!(Email::new(raw).expect_err("must fail"), expected);
    }

    #[rstest]
    fn email_comparison_is_case_insensitive() {
        let lower = Email::new("bob@example.com").expect("valid");
        let upper = Email::new("BOB@Example.COM").expect("valid");
        assert!(lower.matches(&upper));
        // The stored form keeps the caller's casing.
        assert_eq!(upper.as_str(), "BOB@Example.COM");
    }

    #[rstest]
    fn user_ids_are_unique() {
        assert_ne!(UserId::random(), UserId::random());
    }
}
