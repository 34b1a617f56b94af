//! Role-scoped search/sort attribute authorization and the fixture graph
//! used to exercise it.

pub mod config;
pub mod db;
pub mod fixture;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use config::{default_log_level, FixtureShape, LoggingConfig};
pub use fixture::builder::{
    BuildStep, FixtureError, FixtureGraphBuilder, FixtureSummary, STANDALONE_ARTICLE_TITLE,
    STANDALONE_COMMENT_BODY,
};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::article::{Article, ArticleId, ArticleKind, NewArticle};
pub use model::comment::{Comment, CommentId, NewComment};
pub use model::note::{NewNote, Notable, NotableRecord, Note, NoteId};
pub use model::person::{NewPerson, Person, PersonId};
pub use model::tag::{NewTag, Tag, TagId};
pub use model::EntityKind;
pub use policy::attribute_policy::{
    searchable, sortable, AttributeOperation, AttributeSet, ONLY_ADMIN, ONLY_SEARCH, ONLY_SORT,
};
pub use policy::role::Role;
pub use policy::schema::{
    DeclaredScope, DerivedAttribute, EntitySchema, SchemaError, REVERSED_NAME,
};
pub use repo::entity_repo::{
    ArticleScope, CommentScope, EntityReader, EntityStore, ListOrder, NoteScope, PersonScope,
    RepoError, RepoResult,
};
pub use repo::sqlite_store::SqliteEntityStore;
pub use service::search_gate::{
    Condition, GatedSearch, SearchGate, SearchRequest, SortDirection, SortKey,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
