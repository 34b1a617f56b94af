//! Comment entity.

use super::article::ArticleId;
use super::person::PersonId;
use serde::{Deserialize, Serialize};

pub type CommentId = i64;

/// Stored comment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    /// Author; `None` for anonymous comments.
    pub person_id: Option<PersonId>,
    pub body: Option<String>,
}

/// Creation payload for [`Comment`]. The article reference is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub article_id: ArticleId,
    pub person_id: Option<PersonId>,
    pub body: Option<String>,
}

impl NewComment {
    pub fn on(article_id: ArticleId) -> Self {
        Self {
            article_id,
            person_id: None,
            body: None,
        }
    }

    pub fn by(mut self, person_id: PersonId) -> Self {
        self.person_id = Some(person_id);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}
