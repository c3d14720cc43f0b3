//! Item entity and its update payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patch::Patch;
use super::user::UserId;

/// Bounds on item titles.
pub const TITLE_MIN: usize = 1;
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 255;

/// Stable item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ItemId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Validation errors for [`ItemTitle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleValidationError {
    /// Title is empty.
    #[error("title must be at least {TITLE_MIN} character")]
    TooShort,
    /// Title exceeds the maximum length.
    #[error("title must be at most {TITLE_MAX} characters")]
    TooLong,
}

/// Item title constrained to 1–255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemTitle(String);

impl ItemTitle {
    /// Validate and construct an [`ItemTitle`].
    pub fn new(value: impl Into<String>) -> Result<Self, TitleValidationError> {
        let value = value.into();
        let length = value.chars().count();
        if length < TITLE_MIN {
            return Err(TitleValidationError::TooShort);
        }
        if length > TITLE_MAX {
            return Err(TitleValidationError::TooLong);
        }
        Ok(Self(value))
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ItemTitle> for String {
    fn from(value: ItemTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemTitle {
    type Error = TitleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Item owned by exactly one user.
///
/// ## Invariants
/// - `id`, `owner_id`, and `created_at` are immutable after creation.
/// - The owner must exist when the item is created; the item is removed by
///   cascade when the owner is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    title: ItemTitle,
    description: Option<String>,
    owner_id: UserId,
    created_at: DateTime<Utc>,
}

impl Item {
    pub(crate) fn new(title: ItemTitle, description: Option<String>, owner_id: UserId) -> Self {
        Self {
            id: ItemId::random(),
            title,
            description,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Stable item identifier.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Required display title.
    pub fn title(&self) -> &ItemTitle {
        &self.title
    }

    /// Optional free-form description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Owning user; immutable for the item's lifetime.
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Creation instant; the sole ordering key for listings.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn set_title(&mut self, title: ItemTitle) {
        self.title = title;
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }
}

/// Validated inputs for creating an item.
#[derive(Debug, Clone)]
pub struct ItemCreate {
    pub title: ItemTitle,
    pub description: Option<String>,
}

/// Partial update for an item.
///
/// A present-null `title` is ignored; a present-null `description` clears
/// the field. This asymmetry matches the user-update policy table.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub title: Patch<ItemTitle>,
    pub description: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn title_rejects_empty() {
        assert_eq!(
            ItemTitle::new("").expect_err("must fail"),
            TitleValidationError::TooShort
        );
    }

    #[rstest]
    fn title_rejects_oversized() {
        let long = "x".repeat(TITLE_MAX + 1);
        assert_eq!(
            ItemTitle::new(long).expect_err("must fail"),
            TitleValidationError::TooLong
        );
    }

    #[rstest]
    #[case("T")]
    #[case("Camping Tent")]
    fn title_accepts_valid_lengths(#[case] raw: &str) {
        assert_eq!(ItemTitle::new(raw).expect("valid").as_str(), raw);
    }
}
