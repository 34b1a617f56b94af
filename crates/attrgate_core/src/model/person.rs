//! Person entity.
//!
//! People form a tree through `parent_id`. The tree is acyclic by convention
//! only; nothing here rejects a cycle.

use serde::{Deserialize, Serialize};

pub type PersonId = i64;

/// Stored person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    /// `None` for top-level people.
    pub parent_id: Option<PersonId>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Searchable, never sortable.
    pub only_search: Option<String>,
    /// Sortable, never searchable.
    pub only_sort: Option<String>,
    /// Visible to the admin role only.
    pub only_admin: Option<String>,
    pub salary: Option<i64>,
    pub awesome: bool,
    /// Epoch milliseconds, assigned by the store.
    pub created_at: i64,
    pub updated_at: i64,
}

/// Creation payload for [`Person`]. `Default` yields an all-defaulted person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub parent_id: Option<PersonId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub only_search: Option<String>,
    pub only_sort: Option<String>,
    pub only_admin: Option<String>,
    pub salary: Option<i64>,
    pub awesome: bool,
}

impl NewPerson {
    /// Person attached under `parent_id`.
    pub fn child_of(parent_id: PersonId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}
