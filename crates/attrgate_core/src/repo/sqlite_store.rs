//! SQLite-backed entity store.
//!
//! # Invariants
//! - References are checked before each insert, so a violation is reported
//!   against the entity being created rather than as a bare SQLite error.
//! - Polymorphic note owners are checked through the notable type lookup,
//!   including the article `type` discriminator.
//! - Read paths reject malformed rows instead of masking them.

use crate::db::migrations::{current_version, latest_version};
use crate::model::article::{Article, ArticleId, ArticleKind, NewArticle};
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::model::note::{NewNote, Notable, NotableRecord, Note, NoteId};
use crate::model::person::{NewPerson, Person, PersonId};
use crate::model::tag::{NewTag, Tag, TagId};
use crate::model::EntityKind;
use crate::repo::entity_repo::{
    ArticleScope, CommentScope, EntityReader, EntityStore, ListOrder, NoteScope, PersonScope,
    RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Params, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    parent_id,
    name,
    email,
    only_search,
    only_sort,
    only_admin,
    salary,
    awesome,
    created_at,
    updated_at
FROM people";

const ARTICLE_SELECT_SQL: &str = "SELECT id, type, person_id, title, body FROM articles";
const COMMENT_SELECT_SQL: &str = "SELECT id, article_id, person_id, body FROM comments";
const NOTE_SELECT_SQL: &str = "SELECT id, notable_type, notable_id, note FROM notes";
const TAG_SELECT_SQL: &str = "SELECT id, name FROM tags";

type RowParser<T> = fn(&Row<'_>) -> RepoResult<T>;

/// Entity store over a migrated SQLite connection.
pub struct SqliteEntityStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntityStore<'conn> {
    /// Wraps a connection whose schema is at the latest migration.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn row_exists(&self, table: &str, id: i64, discriminator: Option<&str>) -> RepoResult<bool> {
        let exists: i64 = match discriminator {
            Some(type_name) => self.conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1 AND type = ?2);"),
                params![id, type_name],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
                [id],
                |row| row.get(0),
            )?,
        };
        Ok(exists == 1)
    }

    /// Fails with a constraint violation on `creating` unless `referenced` row `id` exists.
    fn require(&self, creating: EntityKind, referenced: EntityKind, id: i64) -> RepoResult<()> {
        if self.row_exists(referenced.table(), id, None)? {
            return Ok(());
        }
        Err(RepoError::constraint(
            creating,
            format!("referenced {referenced} {id} does not exist"),
        ))
    }

    fn insert(&self, entity: EntityKind, sql: &str, params: impl Params) -> RepoResult<i64> {
        self.conn
            .execute(sql, params)
            .map_err(|err| map_write_error(entity, err))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn query_one<T>(&self, select_sql: &str, id: i64, parse: RowParser<T>) -> RepoResult<Option<T>> {
        let mut stmt = self.conn.prepare(&format!("{select_sql} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse(row)?)),
            None => Ok(None),
        }
    }

    fn query_list<T>(
        &self,
        select_sql: &str,
        filter: Option<(&str, Vec<Value>)>,
        order: ListOrder,
        parse: RowParser<T>,
    ) -> RepoResult<Vec<T>> {
        let mut sql = select_sql.to_string();
        let mut bind_values = Vec::new();
        if let Some((clause, values)) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
            bind_values = values;
        }
        sql.push_str(order.sql());

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse(row)?);
        }
        Ok(records)
    }
}

impl EntityStore for SqliteEntityStore<'_> {
    fn create_person(&self, person: &NewPerson) -> RepoResult<PersonId> {
        if let Some(parent_id) = person.parent_id {
            self.require(EntityKind::Person, EntityKind::Person, parent_id)?;
        }

        self.insert(
            EntityKind::Person,
            "INSERT INTO people (
                parent_id,
                name,
                email,
                only_search,
                only_sort,
                only_admin,
                salary,
                awesome
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                person.parent_id,
                person.name.as_deref(),
                person.email.as_deref(),
                person.only_search.as_deref(),
                person.only_sort.as_deref(),
                person.only_admin.as_deref(),
                person.salary,
                bool_to_int(person.awesome),
            ],
        )
    }

    fn create_article(&self, article: &NewArticle) -> RepoResult<ArticleId> {
        let entity = article.kind.entity_kind();
        if let Some(person_id) = article.person_id {
            self.require(entity, EntityKind::Person, person_id)?;
        }

        self.insert(
            entity,
            "INSERT INTO articles (type, person_id, title, body) VALUES (?1, ?2, ?3, ?4);",
            params![
                article.kind.type_name(),
                article.person_id,
                article.title.as_deref(),
                article.body.as_deref(),
            ],
        )
    }

    fn create_comment(&self, comment: &NewComment) -> RepoResult<CommentId> {
        self.require(EntityKind::Comment, EntityKind::Article, comment.article_id)?;
        if let Some(person_id) = comment.person_id {
            self.require(EntityKind::Comment, EntityKind::Person, person_id)?;
        }

        self.insert(
            EntityKind::Comment,
            "INSERT INTO comments (article_id, person_id, body) VALUES (?1, ?2, ?3);",
            params![
                comment.article_id,
                comment.person_id,
                comment.body.as_deref(),
            ],
        )
    }

    fn create_note(&self, note: &NewNote) -> RepoResult<NoteId> {
        let target = note.notable.target();
        if !self.row_exists(target.table, note.notable.id(), target.discriminator)? {
            return Err(RepoError::constraint(
                EntityKind::Note,
                format!(
                    "notable {} {} does not exist",
                    note.notable.type_name(),
                    note.notable.id()
                ),
            ));
        }

        self.insert(
            EntityKind::Note,
            "INSERT INTO notes (notable_type, notable_id, note) VALUES (?1, ?2, ?3);",
            params![
                note.notable.type_name(),
                note.notable.id(),
                note.note.as_deref(),
            ],
        )
    }

    fn create_tag(&self, tag: &NewTag) -> RepoResult<TagId> {
        self.insert(
            EntityKind::Tag,
            "INSERT INTO tags (name) VALUES (?1);",
            [tag.name.as_deref()],
        )
    }
}

impl EntityReader for SqliteEntityStore<'_> {
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        self.query_one(PERSON_SELECT_SQL, id, parse_person_row)
    }

    fn list_people(&self, scope: PersonScope, order: ListOrder) -> RepoResult<Vec<Person>> {
        let filter = match scope {
            PersonScope::All => None,
            PersonScope::TopLevel => Some(("parent_id IS NULL", Vec::new())),
            PersonScope::ChildrenOf(parent_id) => {
                Some(("parent_id = ?", vec![Value::Integer(parent_id)]))
            }
        };
        self.query_list(PERSON_SELECT_SQL, filter, order, parse_person_row)
    }

    fn parent_of(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let person = self.get_person(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Person,
            id,
        })?;
        match person.parent_id {
            Some(parent_id) => self.get_person(parent_id),
            None => Ok(None),
        }
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        self.query_one(ARTICLE_SELECT_SQL, id, parse_article_row)
    }

    fn list_articles(&self, scope: ArticleScope, order: ListOrder) -> RepoResult<Vec<Article>> {
        let filter = match scope {
            ArticleScope::All => None,
            ArticleScope::OwnedBy(person_id) => {
                Some(("person_id = ?", vec![Value::Integer(person_id)]))
            }
            ArticleScope::Unowned => Some(("person_id IS NULL", Vec::new())),
        };
        self.query_list(ARTICLE_SELECT_SQL, filter, order, parse_article_row)
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        self.query_one(COMMENT_SELECT_SQL, id, parse_comment_row)
    }

    fn list_comments(&self, scope: CommentScope, order: ListOrder) -> RepoResult<Vec<Comment>> {
        let filter = match scope {
            CommentScope::All => None,
            CommentScope::OnArticle(article_id) => {
                Some(("article_id = ?", vec![Value::Integer(article_id)]))
            }
            CommentScope::AuthoredBy(person_id) => {
                Some(("person_id = ?", vec![Value::Integer(person_id)]))
            }
            CommentScope::Anonymous => Some(("person_id IS NULL", Vec::new())),
        };
        self.query_list(COMMENT_SELECT_SQL, filter, order, parse_comment_row)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.query_one(NOTE_SELECT_SQL, id, parse_note_row)
    }

    fn list_notes(&self, scope: NoteScope, order: ListOrder) -> RepoResult<Vec<Note>> {
        let filter = match scope {
            NoteScope::All => None,
            NoteScope::AttachedTo(notable) => Some((
                "notable_type = ? AND notable_id = ?",
                vec![
                    Value::Text(notable.type_name().to_string()),
                    Value::Integer(notable.id()),
                ],
            )),
        };
        self.query_list(NOTE_SELECT_SQL, filter, order, parse_note_row)
    }

    fn resolve_notable(&self, notable: Notable) -> RepoResult<Option<NotableRecord>> {
        match notable {
            Notable::Person(id) => Ok(self.get_person(id)?.map(NotableRecord::Person)),
            Notable::Article(id) | Notable::NamespacedArticle(id) => Ok(self
                .get_article(id)?
                .filter(|article| article.kind.entity_kind() == notable.kind())
                .map(NotableRecord::Article)),
        }
    }

    fn list_tags(&self, order: ListOrder) -> RepoResult<Vec<Tag>> {
        self.query_list(TAG_SELECT_SQL, None, order, parse_tag_row)
    }
}

fn map_write_error(entity: EntityKind, err: rusqlite::Error) -> RepoError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        return RepoError::constraint(entity, err.to_string());
    }
    err.into()
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let awesome = match row.get::<_, i64>("awesome")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid awesome value `{other}` in people.awesome"
            )));
        }
    };

    Ok(Person {
        id: row.get("id")?,
        parent_id: row.get("parent_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        only_search: row.get("only_search")?,
        only_sort: row.get("only_sort")?,
        only_admin: row.get("only_admin")?,
        salary: row.get("salary")?,
        awesome,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let type_text: String = row.get("type")?;
    let kind = ArticleKind::from_type_name(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid article type `{type_text}` in articles.type"))
    })?;

    Ok(Article {
        id: row.get("id")?,
        kind,
        person_id: row.get("person_id")?,
        title: row.get("title")?,
        body: row.get("body")?,
    })
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        article_id: row.get("article_id")?,
        person_id: row.get("person_id")?,
        body: row.get("body")?,
    })
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let type_text: String = row.get("notable_type")?;
    let notable_id: i64 = row.get("notable_id")?;
    let notable = Notable::from_parts(&type_text, notable_id).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid notable type `{type_text}` in notes.notable_type"
        ))
    })?;

    Ok(Note {
        id: row.get("id")?,
        notable,
        note: row.get("note")?,
    })
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
