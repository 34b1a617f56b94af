use attrgate_core::{
    searchable, sortable, AttributeSet, EntitySchema, Role, ONLY_ADMIN, ONLY_SEARCH, ONLY_SORT,
    REVERSED_NAME,
};

fn set(names: &[&str]) -> AttributeSet {
    names.iter().map(|name| name.to_string()).collect()
}

fn person_attributes() -> AttributeSet {
    set(&[
        "id",
        "name",
        "email",
        "only_search",
        "only_sort",
        "only_admin",
        "salary",
        "awesome",
        "reversed_name",
    ])
}

fn sample_sets() -> Vec<AttributeSet> {
    vec![
        AttributeSet::new(),
        set(&["id"]),
        set(&[ONLY_SORT]),
        set(&[ONLY_SEARCH, ONLY_ADMIN]),
        set(&["title", "body", ONLY_ADMIN]),
        person_attributes(),
        EntitySchema::person().all_attributes(),
    ]
}

fn without(all: &AttributeSet, excluded: &[&str]) -> AttributeSet {
    all.iter()
        .filter(|name| !excluded.contains(&name.as_str()))
        .cloned()
        .collect()
}

#[test]
fn searchable_never_contains_only_sort() {
    for all in sample_sets() {
        for role in [Role::Default, Role::Admin] {
            assert!(!searchable(&all, role).contains(ONLY_SORT));
        }
        assert!(!searchable(&all, Role::Default).contains(ONLY_ADMIN));
    }
}

#[test]
fn sortable_never_contains_only_search() {
    for all in sample_sets() {
        for role in [Role::Default, Role::Admin] {
            assert!(!sortable(&all, role).contains(ONLY_SEARCH));
        }
        assert!(!sortable(&all, Role::Default).contains(ONLY_ADMIN));
    }
}

#[test]
fn admin_results_are_supersets_of_default_results() {
    for all in sample_sets() {
        assert!(searchable(&all, Role::Admin).is_superset(&searchable(&all, Role::Default)));
        assert!(sortable(&all, Role::Admin).is_superset(&sortable(&all, Role::Default)));
    }
}

#[test]
fn results_are_subsets_of_input() {
    for all in sample_sets() {
        for role in [Role::Default, Role::Admin] {
            assert!(searchable(&all, role).is_subset(&all));
            assert!(sortable(&all, role).is_subset(&all));
        }
    }
}

#[test]
fn repeated_calls_return_identical_results() {
    let all = person_attributes();
    for role in [Role::Default, Role::Admin] {
        assert_eq!(searchable(&all, role), searchable(&all, role));
        assert_eq!(sortable(&all, role), sortable(&all, role));
    }
}

#[test]
fn default_role_scenario() {
    let all = person_attributes();

    assert_eq!(
        searchable(&all, Role::Default),
        without(&all, &[ONLY_SORT, ONLY_ADMIN])
    );
    assert_eq!(
        sortable(&all, Role::Default),
        without(&all, &[ONLY_SEARCH, ONLY_ADMIN])
    );
    assert!(searchable(&all, Role::Default).contains(REVERSED_NAME));
    assert!(sortable(&all, Role::Default).contains(REVERSED_NAME));
}

#[test]
fn admin_role_scenario() {
    let all = person_attributes();

    assert_eq!(searchable(&all, Role::Admin), without(&all, &[ONLY_SORT]));
    assert_eq!(sortable(&all, Role::Admin), without(&all, &[ONLY_SEARCH]));
}

#[test]
fn unknown_role_tokens_degrade_to_default_rules() {
    let all = person_attributes();
    for token in [None, Some("guest"), Some("ADMIN"), Some(""), Some(" admin\n")] {
        let role = Role::from_token(token);
        assert_eq!(searchable(&all, role), searchable(&all, Role::Default));
        assert_eq!(sortable(&all, role), sortable(&all, Role::Default));
    }
    let admin = Role::from_token(Some("admin"));
    assert_eq!(searchable(&all, admin), without(&all, &[ONLY_SORT]));
}

#[test]
fn person_schema_feeds_columns_and_derived_attributes_to_policy() {
    let schema = EntitySchema::person();
    let searchable_default = schema.searchable(Role::Default);

    for name in ["id", "name", "email", "salary", "awesome", "parent_id", REVERSED_NAME] {
        assert!(searchable_default.contains(name), "{name} should be searchable");
    }
    assert!(searchable_default.contains(ONLY_SEARCH));
    assert!(!searchable_default.contains(ONLY_SORT));
    assert!(!searchable_default.contains(ONLY_ADMIN));

    let sortable_admin = schema.sortable(Role::Admin);
    assert!(sortable_admin.contains(ONLY_SORT));
    assert!(sortable_admin.contains(ONLY_ADMIN));
    assert!(!sortable_admin.contains(ONLY_SEARCH));
}

#[test]
fn policy_is_safe_to_share_across_threads() {
    let all = std::sync::Arc::new(person_attributes());
    let expected = searchable(&all, Role::Default);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let all = std::sync::Arc::clone(&all);
            std::thread::spawn(move || searchable(&all, Role::Default))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
