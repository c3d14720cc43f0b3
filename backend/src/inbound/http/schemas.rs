//! Request and response payloads for the REST surface.
//!
//! Request DTOs carry raw wire shapes and convert into validated domain
//! inputs via `TryFrom`; shape checks that belong to the transport
//! (password length, title bounds via the newtypes, pagination limits)
//! happen here so the domain only ever sees well-formed values. Response
//! DTOs never expose credential material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Email, Error, Item, ItemCreate, ItemId, ItemTitle, ItemUpdate, Patch, User, UserCreate,
    UserId, UserUpdate, UserUpdateMe,
};

/// Password length bounds enforced at the boundary.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length in characters.
pub const PASSWORD_MAX: usize = 40;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 100;

fn validate_password(password: &str) -> Result<(), Error> {
    let length = password.chars().count();
    if length < PASSWORD_MIN || length > PASSWORD_MAX {
        return Err(Error::invalid_request(format!(
            "password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
        ))
        .with_details(json!({ "field": "password", "code": "invalid_length" })));
    }
    Ok(())
}

fn parse_email(raw: String) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" }))
    })
}

fn parse_title(raw: String) -> Result<ItemTitle, Error> {
    ItemTitle::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "title", "code": "invalid_title" }))
    })
}

/// Lift a fallible conversion over a [`Patch`], preserving presence.
fn try_map_patch<T, U>(
    patch: Patch<T>,
    f: impl FnOnce(T) -> Result<U, Error>,
) -> Result<Patch<U>, Error> {
    match patch {
        Patch::Absent => Ok(Patch::Absent),
        Patch::Null => Ok(Patch::Null),
        Patch::Value(value) => f(value).map(Patch::Value),
    }
}

// ------------------------- responses -------------------------

/// Issued access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    /// Wrap a signed token in the standard bearer envelope.
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User representation safe for public payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().as_str().to_owned(),
            full_name: user.full_name().map(str::to_owned),
            is_active: user.is_active(),
            is_superuser: user.is_superuser(),
            created_at: user.created_at(),
        }
    }
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Page of users plus the unfiltered total.
#[derive(Debug, Serialize, Deserialize)]
pub struct UsersPublic {
    pub data: Vec<UserPublic>,
    pub count: usize,
}

/// Item representation for public payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPublic {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<&Item> for ItemPublic {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id(),
            title: item.title().as_str().to_owned(),
            description: item.description().map(str::to_owned),
            owner_id: item.owner_id(),
            created_at: item.created_at(),
        }
    }
}

impl From<Item> for ItemPublic {
    fn from(item: Item) -> Self {
        Self::from(&item)
    }
}

/// Page of items plus the visible total.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsPublic {
    pub data: Vec<ItemPublic>,
    pub count: usize,
}

/// Record counts for the whole store.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreCounts {
    pub users: usize,
    pub items: usize,
}

// ------------------------- queries -------------------------

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Pagination query string (`?skip=0&limit=100`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl ListQuery {
    /// Enforce the limit bounds (`1..=100`).
    pub fn validate(self) -> Result<Self, Error> {
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(Error::invalid_request(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            ))
            .with_details(json!({ "field": "limit", "code": "invalid_limit" })));
        }
        Ok(self)
    }
}

// ------------------------- requests -------------------------

fn default_true() -> bool {
    true
}

/// Body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct UserCreateRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl TryFrom<UserCreateRequest> for UserCreate {
    type Error = Error;

    fn try_from(value: UserCreateRequest) -> Result<Self, Self::Error> {
        validate_password(&value.password)?;
        Ok(Self {
            email: parse_email(value.email)?,
            full_name: value.full_name,
            is_active: value.is_active,
            is_superuser: value.is_superuser,
            password: value.password,
        })
    }
}

/// Body for `PATCH /users/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdateRequest {
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub full_name: Patch<String>,
    #[serde(default)]
    pub password: Patch<String>,
    #[serde(default)]
    pub is_active: Patch<bool>,
    #[serde(default)]
    pub is_superuser: Patch<bool>,
}

impl TryFrom<UserUpdateRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UserUpdateRequest) -> Result<Self, Self::Error> {
        if let Some(password) = value.password.as_value() {
            validate_password(password)?;
        }
        Ok(Self {
            email: try_map_patch(value.email, parse_email)?,
            full_name: value.full_name,
            password: value.password,
            is_active: value.is_active,
            is_superuser: value.is_superuser,
        })
    }
}

/// Body for `PATCH /users/me`.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdateMeRequest {
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub full_name: Patch<String>,
}

impl TryFrom<UserUpdateMeRequest> for UserUpdateMe {
    type Error = Error;

    fn try_from(value: UserUpdateMeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: try_map_patch(value.email, parse_email)?,
            full_name: value.full_name,
        })
    }
}

/// Body for `PATCH /users/me/password`.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl UpdatePasswordRequest {
    /// Boundary shape check; the current-password match is a domain rule.
    pub fn validate(&self) -> Result<(), Error> {
        validate_password(&self.new_password)
    }
}

/// Body for `POST /items`.
#[derive(Debug, Deserialize)]
pub struct ItemCreateRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<ItemCreateRequest> for ItemCreate {
    type Error = Error;

    fn try_from(value: ItemCreateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: parse_title(value.title)?,
            description: value.description,
        })
    }
}

/// Body for `PATCH /items/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ItemUpdateRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl TryFrom<ItemUpdateRequest> for ItemUpdate {
    type Error = Error;

    fn try_from(value: ItemUpdateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: try_map_patch(value.title, parse_title)?,
            description: value.description,
        })
    }
}
