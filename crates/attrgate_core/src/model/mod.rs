//! Entity model for the search/sort fixture schema.
//!
//! # Responsibility
//! - Define the people/articles/comments/notes/tags records and their
//!   creation payloads.
//! - Name every concrete entity type once, so polymorphic references and
//!   error reports share the same type tags.
//!
//! # Invariants
//! - Identifiers are assigned by the store, never by callers.
//! - A person's children are derived from `parent_id`; there is no second
//!   owning pointer to keep in sync.

pub mod article;
pub mod comment;
pub mod note;
pub mod person;
pub mod tag;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Concrete entity types known by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Article,
    /// `Namespace::Article`; same storage and fields as `Article`, distinct type tag.
    NamespacedArticle,
    Comment,
    Tag,
    Note,
}

impl EntityKind {
    /// Stable type tag used for polymorphic references.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Article => "Article",
            Self::NamespacedArticle => "Namespace::Article",
            Self::Comment => "Comment",
            Self::Tag => "Tag",
            Self::Note => "Note",
        }
    }

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Person => "people",
            Self::Article | Self::NamespacedArticle => "articles",
            Self::Comment => "comments",
            Self::Tag => "tags",
            Self::Note => "notes",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}
