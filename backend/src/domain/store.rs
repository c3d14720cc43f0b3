//! In-memory identity store owning the user and item collections.
//!
//! Both collections live behind a single `RwLock` so compound mutations
//! (the email check-then-insert, the owner cascade delete) are atomic as a
//! unit. Reads share the lock and never observe a partially applied
//! mutation. No component outside this module touches the raw maps.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::Error;
use super::item::{Item, ItemCreate, ItemId, ItemUpdate};
use super::password;
use super::patch::Patch;
use super::user::{User, UserCreate, UserId, UserUpdate};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    items: HashMap<Uuid, Item>,
}

/// Process-lifetime store for users and items.
#[derive(Default)]
pub struct IdentityStore {
    inner: RwLock<Collections>,
}

/// Page of records plus the unfiltered collection size.
pub type Page<T> = (Vec<T>, usize);

/// Sort newest-first, then paginate. The id tiebreak keeps the order total
/// so adjacent pages partition the collection even when timestamps collide.
fn page_newest_first<T>(
    mut records: Vec<T>,
    key: impl Fn(&T) -> (DateTime<Utc>, Uuid),
    skip: usize,
    limit: usize,
) -> Page<T> {
    records.sort_by(|a, b| {
        let (created_a, id_a) = key(a);
        let (created_b, id_b) = key(b);
        created_b.cmp(&created_a).then_with(|| id_a.cmp(&id_b))
    });
    let total = records.len();
    let page = records.into_iter().skip(skip).take(limit).collect();
    (page, total)
}

impl IdentityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------- users -------------------------

    /// Insert a new user, hashing the password.
    ///
    /// Fails with `Conflict` when another user already holds the same
    /// normalized email. The uniqueness check and the insert happen under
    /// one write lock.
    pub fn create_user(&self, create: UserCreate) -> Result<User, Error> {
        let hashed = password::hash(&create.password)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        let mut inner = self.inner.write().expect("store lock poisoned");
        let normalized = create.email.normalized();
        if inner
            .users
            .values()
            .any(|u| u.email().normalized() == normalized)
        {
            return Err(Error::conflict("A user with this email already exists"));
        }
        let user = User::new(
            create.email,
            create.full_name,
            create.is_active,
            create.is_superuser,
            hashed,
        );
        inner.users.insert(*user.id().as_uuid(), user.clone());
        Ok(user)
    }

    /// Fetch a user by id.
    pub fn get_user(&self, id: UserId) -> Option<User> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.users.get(id.as_uuid()).cloned()
    }

    /// Case-insensitive exact-match lookup by email.
    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        let normalized = email.to_lowercase();
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .users
            .values()
            .find(|u| u.email().normalized() == normalized)
            .cloned()
    }

    /// Users sorted newest-first, paginated after the sort.
    pub fn list_users(&self, skip: usize, limit: usize) -> Page<User> {
        let records: Vec<_> = {
            let inner = self.inner.read().expect("store lock poisoned");
            inner.users.values().cloned().collect()
        };
        page_newest_first(
            records,
            |u| (u.created_at(), *u.id().as_uuid()),
            skip,
            limit,
        )
    }

    /// Apply a partial update to a user.
    ///
    /// Present-null `email`/`is_active`/`is_superuser`/`password` fields are
    /// ignored; a present-null `full_name` clears the display name. A
    /// changed email colliding with a different user fails with `Conflict`;
    /// the check and the write share one lock acquisition.
    pub fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, Error> {
        // Hash before taking the lock: the new hash only lands if the rest
        // of the update is valid, and hashing is the slow step.
        let hashed = match &update.password {
            Patch::Value(pw) => Some(
                password::hash(pw)
                    .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?,
            ),
            _ => None,
        };

        let mut inner = self.inner.write().expect("store lock poisoned");
        // Existence is checked first so a missing user is reported as
        // `NotFound` even when the payload email would collide.
        if !inner.users.contains_key(id.as_uuid()) {
            return Err(Error::not_found("User not found"));
        }
        if let Patch::Value(email) = &update.email {
            let normalized = email.normalized();
            let collision = inner
                .users
                .values()
                .any(|u| u.id() != id && u.email().normalized() == normalized);
            if collision {
                return Err(Error::conflict("A user with this email already exists"));
            }
        }
        let user = inner
            .users
            .get_mut(id.as_uuid())
            .ok_or_else(|| Error::not_found("User not found"))?;

        if let Patch::Value(email) = update.email {
            user.set_email(email);
        }
        match update.full_name {
            Patch::Value(name) => user.set_full_name(Some(name)),
            Patch::Null => user.set_full_name(None),
            Patch::Absent => {}
        }
        if let Patch::Value(active) = update.is_active {
            user.set_active(active);
        }
        if let Patch::Value(superuser) = update.is_superuser {
            user.set_superuser(superuser);
        }
        if let Some(hashed) = hashed {
            user.set_hashed_password(hashed);
        }
        Ok(user.clone())
    }

    /// Replace a user's password hash after the caller verified the old one.
    pub fn update_user_password(&self, id: UserId, new_password: &str) -> Result<User, Error> {
        let hashed = password::hash(new_password)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        let mut inner = self.inner.write().expect("store lock poisoned");
        let user = inner
            .users
            .get_mut(id.as_uuid())
            .ok_or_else(|| Error::not_found("User not found"))?;
        user.set_hashed_password(hashed);
        Ok(user.clone())
    }

    /// Remove a user, optionally cascading to every item they own.
    ///
    /// The cascade and the user removal happen under one write lock so a
    /// concurrent create for the same owner cannot leave an orphan.
    pub fn delete_user(&self, id: UserId, cascade_items: bool) -> Result<(), Error> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if !inner.users.contains_key(id.as_uuid()) {
            return Err(Error::not_found("User not found"));
        }
        if cascade_items {
            inner.items.retain(|_, item| item.owner_id() != id);
        }
        inner.users.remove(id.as_uuid());
        Ok(())
    }

    // ------------------------- items -------------------------

    /// Insert a new item for `owner_id`.
    ///
    /// Callers are responsible for having resolved the owner; the store
    /// does not re-validate foreign references on insert.
    pub fn create_item(&self, create: ItemCreate, owner_id: UserId) -> Item {
        let item = Item::new(create.title, create.description, owner_id);
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.items.insert(*item.id().as_uuid(), item.clone());
        item
    }

    /// Fetch an item by id.
    pub fn get_item(&self, id: ItemId) -> Option<Item> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.items.get(id.as_uuid()).cloned()
    }

    /// All items sorted newest-first, paginated after the sort.
    pub fn list_items(&self, skip: usize, limit: usize) -> Page<Item> {
        self.list_items_filtered(None, skip, limit)
    }

    /// Items owned by `owner_id`, same sort and pagination policy.
    pub fn list_items_by_owner(&self, owner_id: UserId, skip: usize, limit: usize) -> Page<Item> {
        self.list_items_filtered(Some(owner_id), skip, limit)
    }

    fn list_items_filtered(&self, owner: Option<UserId>, skip: usize, limit: usize) -> Page<Item> {
        let records: Vec<_> = {
            let inner = self.inner.read().expect("store lock poisoned");
            inner
                .items
                .values()
                .filter(|item| owner.map_or(true, |o| item.owner_id() == o))
                .cloned()
                .collect()
        };
        page_newest_first(
            records,
            |i| (i.created_at(), *i.id().as_uuid()),
            skip,
            limit,
        )
    }

    /// Apply a partial update to an item.
    ///
    /// A present-null `title` is ignored; a present-null `description`
    /// clears the field.
    pub fn update_item(&self, id: ItemId, update: ItemUpdate) -> Result<Item, Error> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let item = inner
            .items
            .get_mut(id.as_uuid())
            .ok_or_else(|| Error::not_found("Item not found"))?;
        if let Patch::Value(title) = update.title {
            item.set_title(title);
        }
        match update.description {
            Patch::Value(description) => item.set_description(Some(description)),
            Patch::Null => item.set_description(None),
            Patch::Absent => {}
        }
        Ok(item.clone())
    }

    /// Remove an item by id.
    pub fn delete_item(&self, id: ItemId) -> Result<(), Error> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner
            .items
            .remove(id.as_uuid())
            .map(|_| ())
            .ok_or_else(|| Error::not_found("Item not found"))
    }

    // ------------------------- introspection -------------------------

    /// Snapshot of every user, unordered. Local-environment tooling only.
    pub fn all_users(&self) -> Vec<User> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.users.values().cloned().collect()
    }

    /// Snapshot of every item, unordered. Local-environment tooling only.
    pub fn all_items(&self) -> Vec<Item> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.items.values().cloned().collect()
    }

    /// Whether any users exist; used to keep seeding idempotent.
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.users.is_empty()
    }

    /// Drop every record. Only the reset path uses this.
    pub(crate) fn clear(&self) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.users.clear();
        inner.items.clear();
    }
}
