//! Note entity and its polymorphic owner reference.
//!
//! # Invariants
//! - The owner type tag and owner id are one value (`Notable`); they cannot
//!   be set independently.
//! - Type tags resolve to storage through [`NOTABLE_TARGETS`] only.

use super::article::{Article, ArticleId, ArticleKind};
use super::person::{Person, PersonId};
use super::EntityKind;
use serde::{Deserialize, Serialize};

pub type NoteId = i64;

/// Polymorphic owner of a note, as `(notable_type, notable_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "notable_type", content = "notable_id")]
pub enum Notable {
    #[serde(rename = "Person")]
    Person(PersonId),
    #[serde(rename = "Article")]
    Article(ArticleId),
    #[serde(rename = "Namespace::Article")]
    NamespacedArticle(ArticleId),
}

impl Notable {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Person(_) => EntityKind::Person,
            Self::Article(_) => EntityKind::Article,
            Self::NamespacedArticle(_) => EntityKind::NamespacedArticle,
        }
    }

    pub fn type_name(self) -> &'static str {
        self.kind().type_name()
    }

    pub fn id(self) -> i64 {
        match self {
            Self::Person(id) | Self::Article(id) | Self::NamespacedArticle(id) => id,
        }
    }

    /// Rebuilds an owner reference from its stored columns.
    ///
    /// Returns `None` when `type_name` is not a notable type.
    pub fn from_parts(type_name: &str, id: i64) -> Option<Self> {
        let target = notable_target(type_name)?;
        match target.kind {
            EntityKind::Person => Some(Self::Person(id)),
            EntityKind::Article => Some(Self::Article(id)),
            EntityKind::NamespacedArticle => Some(Self::NamespacedArticle(id)),
            EntityKind::Comment | EntityKind::Tag | EntityKind::Note => None,
        }
    }

    /// Storage location of the owner.
    pub fn target(self) -> &'static NotableTarget {
        match self {
            Self::Person(_) => &NOTABLE_TARGETS[0],
            Self::Article(_) => &NOTABLE_TARGETS[1],
            Self::NamespacedArticle(_) => &NOTABLE_TARGETS[2],
        }
    }
}

impl From<&Person> for Notable {
    fn from(person: &Person) -> Self {
        Self::Person(person.id)
    }
}

impl From<&Article> for Notable {
    fn from(article: &Article) -> Self {
        match article.kind {
            ArticleKind::Base => Self::Article(article.id),
            ArticleKind::Namespaced => Self::NamespacedArticle(article.id),
        }
    }
}

/// Where rows of one notable type live.
#[derive(Debug, PartialEq, Eq)]
pub struct NotableTarget {
    pub kind: EntityKind,
    pub table: &'static str,
    /// Required value of the table's `type` column, for shared tables.
    pub discriminator: Option<&'static str>,
}

/// Type-to-table lookup for every entity a note may attach to.
pub const NOTABLE_TARGETS: &[NotableTarget] = &[
    NotableTarget {
        kind: EntityKind::Person,
        table: "people",
        discriminator: None,
    },
    NotableTarget {
        kind: EntityKind::Article,
        table: "articles",
        discriminator: Some("Article"),
    },
    NotableTarget {
        kind: EntityKind::NamespacedArticle,
        table: "articles",
        discriminator: Some("Namespace::Article"),
    },
];

pub fn notable_target(type_name: &str) -> Option<&'static NotableTarget> {
    NOTABLE_TARGETS
        .iter()
        .find(|target| target.kind.type_name() == type_name)
}

/// Stored note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub notable: Notable,
    pub note: Option<String>,
}

/// Creation payload for [`Note`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub notable: Notable,
    pub note: Option<String>,
}

impl NewNote {
    pub fn on(notable: Notable) -> Self {
        Self {
            notable,
            note: None,
        }
    }

    pub fn with_text(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A resolved note owner, loaded as its concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotableRecord {
    Person(Person),
    Article(Article),
}

impl NotableRecord {
    /// The owner reference this record answers to.
    pub fn notable(&self) -> Notable {
        match self {
            Self::Person(person) => Notable::from(person),
            Self::Article(article) => Notable::from(article),
        }
    }
}
