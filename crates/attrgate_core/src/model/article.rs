//! Article entity and its namespaced variant.
//!
//! Both variants share one table; the `type` column is the discriminator.

use super::person::PersonId;
use super::EntityKind;
use serde::{Deserialize, Serialize};

pub type ArticleId = i64;

/// Concrete article type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleKind {
    #[default]
    Base,
    /// `Namespace::Article`. No extra fields or behavior.
    Namespaced,
}

impl ArticleKind {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            Self::Base => EntityKind::Article,
            Self::Namespaced => EntityKind::NamespacedArticle,
        }
    }

    /// Discriminator stored in `articles.type`.
    pub fn type_name(self) -> &'static str {
        self.entity_kind().type_name()
    }

    pub fn from_type_name(value: &str) -> Option<Self> {
        match value {
            "Article" => Some(Self::Base),
            "Namespace::Article" => Some(Self::Namespaced),
            _ => None,
        }
    }
}

/// Stored article record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub kind: ArticleKind,
    /// Owning person; `None` for unowned articles.
    pub person_id: Option<PersonId>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Creation payload for [`Article`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub kind: ArticleKind,
    pub person_id: Option<PersonId>,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl NewArticle {
    pub fn owned_by(person_id: PersonId) -> Self {
        Self {
            person_id: Some(person_id),
            ..Self::default()
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn namespaced(mut self) -> Self {
        self.kind = ArticleKind::Namespaced;
        self
    }
}
