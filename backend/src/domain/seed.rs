//! Fixed development fixture: two users, three items.
//!
//! Seeding is an explicit call made once at startup (local environment
//! only) and again by the reset endpoint. It is idempotent: a populated
//! store is left untouched.

use super::error::Error;
use super::item::{ItemCreate, ItemTitle};
use super::store::IdentityStore;
use super::user::{Email, UserCreate};

/// Passwords for the fixture accounts, supplied by configuration.
#[derive(Debug, Clone)]
pub struct SeedPasswords {
    /// Password for the superuser account.
    pub admin: String,
    /// Password for the regular account.
    pub user: String,
}

impl Default for SeedPasswords {
    fn default() -> Self {
        Self {
            admin: "changethis123".into(),
            user: "password123".into(),
        }
    }
}

fn fixture_user(email: &str, name: &str, superuser: bool, password: &str) -> Result<UserCreate, Error> {
    Ok(UserCreate {
        email: Email::new(email)
            .map_err(|err| Error::internal(format!("seed fixture email invalid: {err}")))?,
        full_name: Some(name.into()),
        is_active: true,
        is_superuser: superuser,
        password: password.into(),
    })
}

fn fixture_item(title: &str, description: &str) -> Result<ItemCreate, Error> {
    Ok(ItemCreate {
        title: ItemTitle::new(title)
            .map_err(|err| Error::internal(format!("seed fixture title invalid: {err}")))?,
        description: Some(description.into()),
    })
}

impl IdentityStore {
    /// Populate the fixture if the store is empty; no-op otherwise.
    pub fn initialize(&self, passwords: &SeedPasswords) -> Result<(), Error> {
        if !self.is_empty() {
            return Ok(());
        }

        let admin = self.create_user(fixture_user(
            "admin@example.com",
            "Admin User",
            true,
            &passwords.admin,
        )?)?;
        let alice = self.create_user(fixture_user(
            "alice@example.com",
            "Alice",
            false,
            &passwords.user,
        )?)?;

        self.create_item(
            fixture_item("Camping Tent", "2-person tent, lightweight")?,
            alice.id(),
        );
        self.create_item(
            fixture_item("Portable Stove", "Small gas camping stove")?,
            alice.id(),
        );
        self.create_item(
            fixture_item("Admin Test Item", "Seed item owned by admin")?,
            admin.id(),
        );
        Ok(())
    }

    /// Clear everything and restore the fixture.
    pub fn reset(&self, passwords: &SeedPasswords) -> Result<(), Error> {
        self.clear();
        self.initialize(passwords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn passwords() -> SeedPasswords {
        SeedPasswords::default()
    }

    #[rstest]
    fn seeds_two_users_and_three_items(passwords: SeedPasswords) {
        let store = IdentityStore::new();
        store.initialize(&passwords).expect("seed");
        assert_eq!(store.all_users().len(), 2);
        assert_eq!(store.all_items().len(), 3);
        let admin = store.get_user_by_email("admin@example.com").expect("admin");
        assert!(admin.is_superuser());
        let alice = store.get_user_by_email("alice@example.com").expect("alice");
        assert!(!alice.is_superuser());
        let (alice_items, total) = store.list_items_by_owner(alice.id(), 0, 100);
        assert_eq!(total, 2);
        assert!(alice_items.iter().all(|i| i.owner_id() == alice.id()));
    }

    #[rstest]
    fn initialize_is_idempotent(passwords: SeedPasswords) {
        let store = IdentityStore::new();
        store.initialize(&passwords).expect("first seed");
        store.initialize(&passwords).expect("second seed");
        assert_eq!(store.all_users().len(), 2);
        assert_eq!(store.all_items().len(), 3);
    }

    #[rstest]
    fn reset_discards_later_records(passwords: SeedPasswords) {
        let store = IdentityStore::new();
        store.initialize(&passwords).expect("seed");
        let alice = store.get_user_by_email("alice@example.com").expect("alice");
        store.create_item(
            fixture_item("Extra", "not part of the fixture").expect("fixture"),
            alice.id(),
        );
        store.reset(&passwords).expect("reset");
        assert_eq!(store.all_items().len(), 3);
    }
}
