//! Domain core: entities, credential handling, and resource operations.
//!
//! Purpose: keep every business rule — validation, uniqueness, ownership,
//! authorization, the partial-update field policy — transport agnostic and
//! testable without a running server. The HTTP adapter under
//! `crate::inbound` only translates payloads and maps [`Error`] onto status
//! codes.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — failure category plus caller-facing message.
//! - [`User`] / [`Item`] — the two aggregates, with validating newtypes for
//!   their identifiers, email, and title.
//! - [`IdentityStore`] — process-lifetime in-memory store.
//! - [`TokenCodec`] — access-token issue/verify.
//! - [`ops`] — the resource operations handlers delegate to.

pub mod auth;
pub mod error;
pub mod item;
pub mod ops;
pub mod password;
pub mod patch;
pub mod seed;
pub mod store;
pub mod token;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError, CREDENTIALS_MESSAGE};
pub use self::error::{Error, ErrorCode};
pub use self::item::{Item, ItemCreate, ItemId, ItemTitle, ItemUpdate, TitleValidationError};
pub use self::patch::Patch;
pub use self::seed::SeedPasswords;
pub use self::store::{IdentityStore, Page};
pub use self::token::{TokenCodec, TokenError};
pub use self::user::{
    Email, EmailValidationError, User, UserCreate, UserId, UserUpdate, UserUpdateMe,
};

/// Convenient result alias for operations returning a domain [`Error`].
pub type ApiResult<T> = Result<T, Error>;
