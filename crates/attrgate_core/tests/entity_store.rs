use attrgate_core::db::open_db_in_memory;
use attrgate_core::{
    ArticleKind, ArticleScope, CommentScope, EntityKind, EntityReader, EntityStore, ListOrder,
    NewArticle, NewComment, NewNote, NewPerson, NewTag, Notable, NotableRecord, NoteScope,
    PersonScope, RepoError, SqliteEntityStore,
};
use rusqlite::Connection;
use std::time::{SystemTime, UNIX_EPOCH};

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn created_person_has_defaulted_fields() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let id = store.create_person(&NewPerson::default()).unwrap();
    let person = store.get_person(id).unwrap().unwrap();

    assert_eq!(person.id, id);
    assert_eq!(person.parent_id, None);
    assert_eq!(person.name, None);
    assert_eq!(person.salary, None);
    assert!(!person.awesome);
    assert!(person.created_at > 0);
    assert_eq!(person.created_at, person.updated_at);
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

#[test]
fn person_timestamps_are_epoch_milliseconds() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let before = now_epoch_ms();
    let id = store.create_person(&NewPerson::default()).unwrap();
    let after = now_epoch_ms();
    let person = store.get_person(id).unwrap().unwrap();

    // julianday rounding can land a millisecond either side
    assert!(person.created_at >= before - 1, "{} < {before}", person.created_at);
    assert!(person.created_at <= after + 1, "{} > {after}", person.created_at);
}

#[test]
fn person_fields_are_persisted() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let id = store
        .create_person(&NewPerson {
            name: Some("Aric Smith".to_string()),
            email: Some("aric@example.com".to_string()),
            only_search: Some("s".to_string()),
            only_sort: Some("o".to_string()),
            only_admin: Some("a".to_string()),
            salary: Some(31000),
            awesome: true,
            ..NewPerson::default()
        })
        .unwrap();

    let person = store.get_person(id).unwrap().unwrap();
    assert_eq!(person.name.as_deref(), Some("Aric Smith"));
    assert_eq!(person.email.as_deref(), Some("aric@example.com"));
    assert_eq!(person.only_admin.as_deref(), Some("a"));
    assert_eq!(person.salary, Some(31000));
    assert!(person.awesome);
}

#[test]
fn parent_and_children_stay_consistent() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let parent = store.create_person(&NewPerson::named("parent")).unwrap();
    let first = store.create_person(&NewPerson::child_of(parent)).unwrap();
    let second = store.create_person(&NewPerson::child_of(parent)).unwrap();
    let grandchild = store.create_person(&NewPerson::child_of(first)).unwrap();

    let children = store
        .list_people(PersonScope::ChildrenOf(parent), ListOrder::IdAsc)
        .unwrap();
    let child_ids: Vec<_> = children.iter().map(|person| person.id).collect();
    assert_eq!(child_ids, vec![first, second]);

    for child in &children {
        let back = store.parent_of(child.id).unwrap().unwrap();
        assert_eq!(back.id, parent);
    }
    assert_eq!(store.parent_of(grandchild).unwrap().unwrap().id, first);
    assert!(store.parent_of(parent).unwrap().is_none());

    let top_level = store
        .list_people(PersonScope::TopLevel, ListOrder::default())
        .unwrap();
    assert_eq!(top_level.len(), 1);
    assert_eq!(top_level[0].id, parent);
}

#[test]
fn parent_of_missing_person_is_not_found() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let err = store.parent_of(404).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Person,
            id: 404
        }
    ));
}

#[test]
fn child_of_missing_parent_is_a_constraint_violation() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let err = store.create_person(&NewPerson::child_of(99)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            entity: EntityKind::Person,
            ..
        }
    ));
    assert!(store
        .list_people(PersonScope::All, ListOrder::default())
        .unwrap()
        .is_empty());
}

#[test]
fn default_listing_is_reverse_insertion_order() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let ids: Vec<_> = (0..4)
        .map(|_| store.create_person(&NewPerson::default()).unwrap())
        .collect();

    let listed: Vec<_> = store
        .list_people(PersonScope::All, ListOrder::default())
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);

    let ascending: Vec<_> = store
        .list_people(PersonScope::All, ListOrder::IdAsc)
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect();
    assert_eq!(ascending, ids);
}

#[test]
fn article_and_comment_associations_resolve_both_ways() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let author = store.create_person(&NewPerson::default()).unwrap();
    let article = store.create_article(&NewArticle::owned_by(author)).unwrap();
    let comment = store
        .create_comment(&NewComment::on(article).by(author).with_body("nice"))
        .unwrap();

    let loaded_article = store.get_article(article).unwrap().unwrap();
    assert_eq!(loaded_article.person_id, Some(author));
    assert_eq!(loaded_article.kind, ArticleKind::Base);

    let owned = store
        .list_articles(ArticleScope::OwnedBy(author), ListOrder::default())
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, article);

    let loaded_comment = store.get_comment(comment).unwrap().unwrap();
    assert_eq!(loaded_comment.article_id, article);
    assert_eq!(loaded_comment.person_id, Some(author));
    assert_eq!(loaded_comment.body.as_deref(), Some("nice"));

    for scope in [
        CommentScope::OnArticle(article),
        CommentScope::AuthoredBy(author),
    ] {
        let comments = store.list_comments(scope, ListOrder::default()).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, comment);
    }
}

#[test]
fn unowned_article_and_anonymous_comment_are_allowed() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let article = store
        .create_article(&NewArticle::titled("Hello, world!"))
        .unwrap();
    let comment = store
        .create_comment(&NewComment::on(article).with_body("First post!"))
        .unwrap();

    let unowned = store
        .list_articles(ArticleScope::Unowned, ListOrder::default())
        .unwrap();
    assert_eq!(unowned.len(), 1);
    assert_eq!(unowned[0].person_id, None);

    let anonymous = store
        .list_comments(CommentScope::Anonymous, ListOrder::default())
        .unwrap();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].id, comment);
}

#[test]
fn comment_references_must_exist() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let err = store.create_comment(&NewComment::on(1)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            entity: EntityKind::Comment,
            ..
        }
    ));

    let article = store.create_article(&NewArticle::default()).unwrap();
    let err = store
        .create_comment(&NewComment::on(article).by(77))
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation { .. }));

    assert!(store
        .list_comments(CommentScope::All, ListOrder::default())
        .unwrap()
        .is_empty());
}

#[test]
fn article_owner_must_exist() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let err = store
        .create_article(&NewArticle::owned_by(5).namespaced())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            entity: EntityKind::NamespacedArticle,
            ..
        }
    ));
}

#[test]
fn notes_resolve_back_to_their_concrete_owner_type() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let person = store.create_person(&NewPerson::default()).unwrap();
    let article = store.create_article(&NewArticle::owned_by(person)).unwrap();
    let namespaced = store
        .create_article(&NewArticle::owned_by(person).namespaced())
        .unwrap();

    let owners = [
        Notable::Person(person),
        Notable::Article(article),
        Notable::NamespacedArticle(namespaced),
    ];
    for owner in owners {
        let note_id = store
            .create_note(&NewNote::on(owner).with_text("remember"))
            .unwrap();
        let note = store.get_note(note_id).unwrap().unwrap();
        assert_eq!(note.notable, owner);
        assert_eq!(note.note.as_deref(), Some("remember"));

        let record = store.resolve_notable(note.notable).unwrap().unwrap();
        assert_eq!(record.notable(), owner);
        assert_eq!(record.notable().type_name(), owner.type_name());
    }

    let stored_types: Vec<String> = {
        let mut stmt = conn
            .prepare("SELECT notable_type FROM notes ORDER BY id ASC;")
            .unwrap();
        let rows = stmt.query_map([], |row| row.get(0)).unwrap();
        rows.map(|row| row.unwrap()).collect()
    };
    assert_eq!(
        stored_types,
        vec!["Person", "Article", "Namespace::Article"]
    );

    match store
        .resolve_notable(Notable::NamespacedArticle(namespaced))
        .unwrap()
        .unwrap()
    {
        NotableRecord::Article(loaded) => assert_eq!(loaded.kind, ArticleKind::Namespaced),
        other => panic!("unexpected owner: {other:?}"),
    }
}

#[test]
fn note_owner_type_must_match_stored_type() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let namespaced = store
        .create_article(&NewArticle::default().namespaced())
        .unwrap();

    let err = store
        .create_note(&NewNote::on(Notable::Article(namespaced)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation {
            entity: EntityKind::Note,
            ..
        }
    ));

    let err = store
        .create_note(&NewNote::on(Notable::Person(namespaced)))
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation { .. }));

    assert!(store
        .resolve_notable(Notable::Article(namespaced))
        .unwrap()
        .is_none());
}

#[test]
fn list_notes_filters_by_owner() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let first = store.create_person(&NewPerson::default()).unwrap();
    let second = store.create_person(&NewPerson::default()).unwrap();
    store
        .create_note(&NewNote::on(Notable::Person(first)))
        .unwrap();
    store
        .create_note(&NewNote::on(Notable::Person(second)))
        .unwrap();
    store
        .create_note(&NewNote::on(Notable::Person(second)))
        .unwrap();

    let notes = store
        .list_notes(
            NoteScope::AttachedTo(Notable::Person(second)),
            ListOrder::default(),
        )
        .unwrap();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|note| note.notable == Notable::Person(second)));
    assert!(notes[0].id > notes[1].id);

    let all = store
        .list_notes(NoteScope::All, ListOrder::default())
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn tags_are_standalone_records() {
    let conn = setup();
    let store = SqliteEntityStore::try_new(&conn).unwrap();

    let id = store
        .create_tag(&NewTag {
            name: Some("rust".to_string()),
        })
        .unwrap();
    let tags = store.list_tags(ListOrder::default()).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, id);
    assert_eq!(tags[0].name.as_deref(), Some("rust"));
}
