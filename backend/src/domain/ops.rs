//! Resource operations: the application rules between the HTTP adapter and
//! the store.
//!
//! Handlers stay thin; every authorization decision, ownership check, and
//! caller-facing message lives here so the rules are testable without a
//! running server.

use chrono::Duration;

use super::auth::{self, LoginCredentials};
use super::error::Error;
use super::item::{Item, ItemCreate, ItemId, ItemUpdate};
use super::password;
use super::patch::Patch;
use super::store::{IdentityStore, Page};
use super::token::TokenCodec;
use super::user::{User, UserCreate, UserId, UserUpdate, UserUpdateMe};

const ITEM_PERMISSION_MESSAGE: &str = "Not enough permissions";

/// Exchange credentials for a signed access token.
///
/// An unknown email, a wrong password, and an inactive account all collapse
/// into one `InvalidCredentials` rejection so the response does not reveal
/// which check failed.
pub fn login(
    store: &IdentityStore,
    codec: &TokenCodec,
    credentials: &LoginCredentials,
    ttl: Duration,
) -> Result<String, Error> {
    let rejection = || Error::invalid_credentials("Incorrect email or password");
    let user = store
        .get_user_by_email(credentials.email())
        .ok_or_else(rejection)?;
    if !password::verify(credentials.password(), user.hashed_password()) {
        return Err(rejection());
    }
    if !user.is_active() {
        return Err(rejection());
    }
    codec
        .issue(user.id(), ttl)
        .map_err(|err| Error::internal(format!("token signing failed: {err}")))
}

// ------------------------- self-service -------------------------

/// Update the requester's own email and display name.
pub fn update_me(
    store: &IdentityStore,
    requester: &User,
    update: UserUpdateMe,
) -> Result<User, Error> {
    if let Patch::Value(email) = &update.email {
        let taken = store
            .get_user_by_email(email.as_str())
            .is_some_and(|existing| existing.id() != requester.id());
        if taken {
            return Err(Error::conflict("Email already exists"));
        }
    }
    store.update_user(
        requester.id(),
        UserUpdate {
            email: update.email,
            full_name: update.full_name,
            ..UserUpdate::default()
        },
    )
}

/// Change the requester's own password.
///
/// Requires the current password and refuses a no-op change.
pub fn change_password(
    store: &IdentityStore,
    requester: &User,
    current_password: &str,
    new_password: &str,
) -> Result<(), Error> {
    if !password::verify(current_password, requester.hashed_password()) {
        return Err(Error::invalid_credentials("Incorrect password"));
    }
    if current_password == new_password {
        return Err(Error::invalid_request(
            "New password cannot be the same as the current one",
        ));
    }
    store
        .update_user_password(requester.id(), new_password)
        .map(|_| ())
}

// ------------------------- admin user management -------------------------

/// List users, newest first. Superuser only.
pub fn list_users(
    store: &IdentityStore,
    requester: &User,
    skip: usize,
    limit: usize,
) -> Result<Page<User>, Error> {
    auth::require_superuser(requester)?;
    Ok(store.list_users(skip, limit))
}

/// Fetch a user by id. Superuser only, own id included.
pub fn read_user(store: &IdentityStore, requester: &User, id: UserId) -> Result<User, Error> {
    auth::require_superuser(requester)?;
    store
        .get_user(id)
        .ok_or_else(|| Error::not_found("User not found"))
}

/// Create a user with explicit flags. Superuser only.
pub fn create_user(
    store: &IdentityStore,
    requester: &User,
    create: UserCreate,
) -> Result<User, Error> {
    auth::require_superuser(requester)?;
    store.create_user(create)
}

/// Apply a partial update to any user. Superuser only.
pub fn update_user(
    store: &IdentityStore,
    requester: &User,
    id: UserId,
    update: UserUpdate,
) -> Result<User, Error> {
    auth::require_superuser(requester)?;
    store.update_user(id, update)
}

/// Delete a user and cascade their items. Superuser only.
///
/// Self-deletion through this operation is refused so an instance always
/// keeps at least the acting superuser.
pub fn delete_user(store: &IdentityStore, requester: &User, id: UserId) -> Result<(), Error> {
    auth::require_superuser(requester)?;
    if id == requester.id() {
        return Err(Error::forbidden(
            "Superusers are not allowed to delete themselves",
        ));
    }
    store.delete_user(id, true)
}

// ------------------------- items -------------------------

/// List items visible to the requester, newest first.
///
/// Superusers see every item; everyone else sees only their own. The count
/// matches the visible set, not the whole collection.
pub fn list_items(
    store: &IdentityStore,
    requester: &User,
    skip: usize,
    limit: usize,
) -> Page<Item> {
    if requester.is_superuser() {
        store.list_items(skip, limit)
    } else {
        store.list_items_by_owner(requester.id(), skip, limit)
    }
}

/// Create an item owned by the requester.
pub fn create_item(store: &IdentityStore, requester: &User, create: ItemCreate) -> Item {
    store.create_item(create, requester.id())
}

/// Fetch one item.
///
/// Existence is checked before access, so a missing item is `NotFound` even
/// for callers who could never have seen it.
pub fn read_item(store: &IdentityStore, requester: &User, id: ItemId) -> Result<Item, Error> {
    let item = store
        .get_item(id)
        .ok_or_else(|| Error::not_found("Item not found"))?;
    if !auth::can_access(requester, item.owner_id()) {
        return Err(Error::forbidden(ITEM_PERMISSION_MESSAGE));
    }
    Ok(item)
}

/// Apply a partial update to an item the requester can access.
pub fn update_item(
    store: &IdentityStore,
    requester: &User,
    id: ItemId,
    update: ItemUpdate,
) -> Result<Item, Error> {
    read_item(store, requester, id)?;
    store.update_item(id, update)
}

/// Delete an item the requester can access.
pub fn delete_item(store: &IdentityStore, requester: &User, id: ItemId) -> Result<(), Error> {
    read_item(store, requester, id)?;
    store.delete_item(id)
}
