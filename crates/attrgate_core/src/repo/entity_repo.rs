//! Entity store contracts, query parameters and repository errors.

use crate::db::DbError;
use crate::model::article::{Article, ArticleId, NewArticle};
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::note::{NewNote, Notable, NotableRecord, Note, NoteId};
use crate::model::person::{NewPerson, Person, PersonId};
use crate::model::tag::{NewTag, Tag, TagId};
use crate::model::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A required reference is missing or points at the wrong type.
    ConstraintViolation { entity: EntityKind, reason: String },
    NotFound { entity: EntityKind, id: i64 },
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
}

impl RepoError {
    pub fn constraint(entity: EntityKind, reason: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            entity,
            reason: reason.into(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ConstraintViolation { entity, reason } => {
                write!(f, "constraint violation creating {entity}: {reason}")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "entity store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ConstraintViolation { .. } => None,
            Self::NotFound { .. } => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Ordering for list queries.
///
/// Callers that do not choose get reverse insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    #[default]
    IdDesc,
    IdAsc,
}

impl ListOrder {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::IdDesc => " ORDER BY id DESC",
            Self::IdAsc => " ORDER BY id ASC",
        }
    }
}

/// Which people a list query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonScope {
    All,
    /// People without a parent.
    TopLevel,
    ChildrenOf(PersonId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleScope {
    All,
    OwnedBy(PersonId),
    /// Articles with no owning person.
    Unowned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentScope {
    All,
    OnArticle(ArticleId),
    AuthoredBy(PersonId),
    /// Comments with no author.
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteScope {
    All,
    AttachedTo(Notable),
}

/// Create operations the fixture builder depends on.
///
/// Each call persists one entity and returns its store-assigned id.
pub trait EntityStore {
    fn create_person(&self, person: &NewPerson) -> RepoResult<PersonId>;
    fn create_article(&self, article: &NewArticle) -> RepoResult<ArticleId>;
    fn create_comment(&self, comment: &NewComment) -> RepoResult<CommentId>;
    fn create_note(&self, note: &NewNote) -> RepoResult<NoteId>;
    fn create_tag(&self, tag: &NewTag) -> RepoResult<TagId>;
}

/// Read access over stored entities and their associations.
pub trait EntityReader {
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn list_people(&self, scope: PersonScope, order: ListOrder) -> RepoResult<Vec<Person>>;
    /// Parent of `id`; `NotFound` when `id` itself does not exist.
    fn parent_of(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    fn list_articles(&self, scope: ArticleScope, order: ListOrder) -> RepoResult<Vec<Article>>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    fn list_comments(&self, scope: CommentScope, order: ListOrder) -> RepoResult<Vec<Comment>>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes(&self, scope: NoteScope, order: ListOrder) -> RepoResult<Vec<Note>>;
    /// Loads a note owner as its concrete type; `None` when the owner is gone
    /// or stored under a different type tag.
    fn resolve_notable(&self, notable: Notable) -> RepoResult<Option<NotableRecord>>;
    fn list_tags(&self, order: ListOrder) -> RepoResult<Vec<Tag>>;
}
