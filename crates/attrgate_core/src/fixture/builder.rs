//! Fixture graph builder.
//!
//! Creation order per person: Person, Note(person), then for each article:
//! Article, Note(article), Comments. After all people, one unowned article
//! titled [`STANDALONE_ARTICLE_TITLE`] with one anonymous comment.

use crate::config::FixtureShape;
use crate::model::article::{ArticleId, NewArticle};
use crate::model::comment::{CommentId, NewComment};
use crate::model::note::{NewNote, Notable, NoteId};
use crate::model::person::{NewPerson, PersonId};
use crate::model::EntityKind;
use crate::repo::entity_repo::{EntityStore, RepoError, RepoResult};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub const STANDALONE_ARTICLE_TITLE: &str = "Hello, world!";
pub const STANDALONE_COMMENT_BODY: &str = "First post!";

/// Position of one create call within a build.
///
/// Loop indices are 0-based and `None` outside the corresponding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStep {
    pub entity: EntityKind,
    /// 1-based count of create calls in this run, the failing one included.
    pub sequence: usize,
    pub person_index: Option<usize>,
    pub article_index: Option<usize>,
    pub comment_index: Option<usize>,
}

impl Display for BuildStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({})", self.sequence, self.entity)?;
        if let Some(person) = self.person_index {
            write!(f, " person={person}")?;
        }
        if let Some(article) = self.article_index {
            write!(f, " article={article}")?;
        }
        if let Some(comment) = self.comment_index {
            write!(f, " comment={comment}")?;
        }
        Ok(())
    }
}

/// A build aborted at `step` because the store refused the create.
#[derive(Debug)]
pub struct FixtureError {
    pub step: BuildStep,
    pub source: RepoError,
}

impl Display for FixtureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "fixture build failed at {}: {}", self.step, self.source)
    }
}

impl Error for FixtureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Ids created by one successful build, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSummary {
    pub people: Vec<PersonId>,
    pub person_notes: Vec<NoteId>,
    pub articles: Vec<ArticleId>,
    pub article_notes: Vec<NoteId>,
    pub comments: Vec<CommentId>,
    pub standalone_article: ArticleId,
    pub standalone_comment: CommentId,
}

impl FixtureSummary {
    pub fn total_created(&self) -> usize {
        self.people.len()
            + self.person_notes.len()
            + self.articles.len()
            + self.article_notes.len()
            + self.comments.len()
            + 2
    }
}

/// Tracks where in the traversal the build currently is.
#[derive(Debug, Default)]
struct Cursor {
    sequence: usize,
    person_index: Option<usize>,
    article_index: Option<usize>,
    comment_index: Option<usize>,
}

impl Cursor {
    fn create<T>(
        &mut self,
        entity: EntityKind,
        create: impl FnOnce() -> RepoResult<T>,
    ) -> Result<T, FixtureError> {
        self.sequence += 1;
        create().map_err(|source| FixtureError {
            step: BuildStep {
                entity,
                sequence: self.sequence,
                person_index: self.person_index,
                article_index: self.article_index,
                comment_index: self.comment_index,
            },
            source,
        })
    }
}

/// Builds the fixture graph through an [`EntityStore`].
///
/// Not idempotent: every `build` call creates a fresh, independent graph.
pub struct FixtureGraphBuilder<'s, S: EntityStore + ?Sized> {
    store: &'s S,
    shape: FixtureShape,
}

impl<'s, S: EntityStore + ?Sized> FixtureGraphBuilder<'s, S> {
    /// Builder with the canonical shape.
    pub fn new(store: &'s S) -> Self {
        Self::with_shape(store, FixtureShape::default())
    }

    pub fn with_shape(store: &'s S, shape: FixtureShape) -> Self {
        Self { store, shape }
    }

    pub fn shape(&self) -> FixtureShape {
        self.shape
    }

    /// Runs the whole build.
    ///
    /// # Errors
    /// Returns the first store failure wrapped with the step that produced
    /// it. Entities created before the failure are left in place.
    pub fn build(&self) -> Result<FixtureSummary, FixtureError> {
        let started_at = Instant::now();
        info!(
            "event=fixture_build module=fixture status=start people={} articles_per_person={} comments_per_article={}",
            self.shape.people, self.shape.articles_per_person, self.shape.comments_per_article
        );

        match self.run() {
            Ok(summary) => {
                info!(
                    "event=fixture_build module=fixture status=ok created={} duration_ms={}",
                    summary.total_created(),
                    started_at.elapsed().as_millis()
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=fixture_build module=fixture status=error entity={} sequence={} duration_ms={} error={}",
                    err.step.entity,
                    err.step.sequence,
                    started_at.elapsed().as_millis(),
                    err.source
                );
                Err(err)
            }
        }
    }

    fn run(&self) -> Result<FixtureSummary, FixtureError> {
        let store = self.store;
        let mut cursor = Cursor::default();
        let mut summary = FixtureSummary::default();

        for person_index in 0..self.shape.people {
            cursor.person_index = Some(person_index);
            cursor.article_index = None;
            cursor.comment_index = None;

            let person_id =
                cursor.create(EntityKind::Person, || store.create_person(&NewPerson::default()))?;
            summary.people.push(person_id);

            let note_id = cursor.create(EntityKind::Note, || {
                store.create_note(&NewNote::on(Notable::Person(person_id)))
            })?;
            summary.person_notes.push(note_id);

            for article_index in 0..self.shape.articles_per_person {
                cursor.article_index = Some(article_index);
                cursor.comment_index = None;

                let article_id = cursor.create(EntityKind::Article, || {
                    store.create_article(&NewArticle::owned_by(person_id))
                })?;
                summary.articles.push(article_id);

                let note_id = cursor.create(EntityKind::Note, || {
                    store.create_note(&NewNote::on(Notable::Article(article_id)))
                })?;
                summary.article_notes.push(note_id);

                for comment_index in 0..self.shape.comments_per_article {
                    cursor.comment_index = Some(comment_index);
                    let comment_id = cursor.create(EntityKind::Comment, || {
                        store.create_comment(&NewComment::on(article_id).by(person_id))
                    })?;
                    summary.comments.push(comment_id);
                }
            }
            debug!(
                "event=fixture_person module=fixture status=ok person_index={person_index} person_id={person_id}"
            );
        }

        cursor.person_index = None;
        cursor.article_index = None;
        cursor.comment_index = None;

        summary.standalone_article = cursor.create(EntityKind::Article, || {
            store.create_article(&NewArticle::titled(STANDALONE_ARTICLE_TITLE))
        })?;
        let standalone_article = summary.standalone_article;
        summary.standalone_comment = cursor.create(EntityKind::Comment, || {
            store.create_comment(
                &NewComment::on(standalone_article).with_body(STANDALONE_COMMENT_BODY),
            )
        })?;

        Ok(summary)
    }
}
