//! Per-entity attribute declarations.
//!
//! An [`EntitySchema`] lists the stored columns of one entity plus any derived
//! attributes (virtual names computed from a column). Together they form the
//! full attribute set handed to the policy.

use super::attribute_policy::{self, AttributeOperation, AttributeSet};
use super::role::Role;
use crate::model::EntityKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

static ATTRIBUTE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid attribute name regex"));

const PERSON_COLUMNS: &[&str] = &[
    "id",
    "name",
    "email",
    "only_search",
    "only_sort",
    "only_admin",
    "salary",
    "awesome",
    "parent_id",
    "created_at",
    "updated_at",
];
const ARTICLE_COLUMNS: &[&str] = &["id", "person_id", "title", "body"];
const COMMENT_COLUMNS: &[&str] = &["id", "article_id", "person_id", "body"];
const TAG_COLUMNS: &[&str] = &["id", "name"];
const NOTE_COLUMNS: &[&str] = &["id", "notable_id", "notable_type", "note"];

/// Named filters declared on the person entity, with their argument counts.
const PERSON_SCOPES: &[(&str, usize)] = &[("restricted", 0), ("active", 0), ("over_age", 1)];

/// Name of the person's reversed-name derived attribute.
pub const REVERSED_NAME: &str = "reversed_name";

/// Transforms a caller-supplied value before it is compared to the source column.
pub type ValueFormatter = fn(&str) -> String;

/// Schema declaration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidAttributeName(String),
    DuplicateAttribute(String),
    UnknownSourceColumn { attribute: String, column: String },
    DuplicateScope(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAttributeName(name) => write!(f, "invalid attribute name `{name}`"),
            Self::DuplicateAttribute(name) => write!(f, "attribute declared twice: `{name}`"),
            Self::UnknownSourceColumn { attribute, column } => write!(
                f,
                "derived attribute `{attribute}` reads unknown column `{column}`"
            ),
            Self::DuplicateScope(name) => write!(f, "scope declared twice: `{name}`"),
        }
    }
}

impl Error for SchemaError {}

/// Named filter an entity declares. Only the declaration is kept; executing
/// it belongs to the query layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredScope {
    name: String,
    arity: usize,
}

impl DeclaredScope {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments the scope takes.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for DeclaredScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Virtual attribute computed from one stored column.
#[derive(Clone)]
pub struct DerivedAttribute {
    name: String,
    source_column: String,
    formatter: Option<ValueFormatter>,
}

impl DerivedAttribute {
    pub fn new(name: impl Into<String>, source_column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_column: source_column.into(),
            formatter: None,
        }
    }

    pub fn with_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_column(&self) -> &str {
        &self.source_column
    }

    /// Applies the formatter, or returns `value` unchanged when there is none.
    pub fn format_value(&self, value: &str) -> String {
        match self.formatter {
            Some(formatter) => formatter(value),
            None => value.to_string(),
        }
    }
}

impl Debug for DerivedAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedAttribute")
            .field("name", &self.name)
            .field("source_column", &self.source_column)
            .field("formatted", &self.formatter.is_some())
            .finish()
    }
}

fn reverse_value(value: &str) -> String {
    value.chars().rev().collect()
}

/// Attribute declaration for one entity type.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    kind: EntityKind,
    columns: Vec<String>,
    derived: Vec<DerivedAttribute>,
    scopes: Vec<DeclaredScope>,
}

impl EntitySchema {
    /// Declares a schema from column names, validating each one.
    pub fn new<I, S>(kind: EntityKind, columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self {
            kind,
            columns: Vec::new(),
            derived: Vec::new(),
            scopes: Vec::new(),
        };
        for column in columns {
            let column = column.into();
            schema.check_new_name(&column)?;
            schema.columns.push(column);
        }
        Ok(schema)
    }

    /// Registers a derived attribute; its source column must already exist.
    pub fn with_derived(mut self, attribute: DerivedAttribute) -> Result<Self, SchemaError> {
        self.check_new_name(attribute.name())?;
        if !self.has_column(attribute.source_column()) {
            return Err(SchemaError::UnknownSourceColumn {
                attribute: attribute.name().to_string(),
                column: attribute.source_column().to_string(),
            });
        }
        self.derived.push(attribute);
        Ok(self)
    }

    /// Declares a named scope. Scope names share the attribute naming rule
    /// but live in their own namespace.
    pub fn with_scope(mut self, scope: DeclaredScope) -> Result<Self, SchemaError> {
        if !ATTRIBUTE_NAME_RE.is_match(scope.name()) {
            return Err(SchemaError::InvalidAttributeName(scope.name().to_string()));
        }
        if self.scope(scope.name()).is_some() {
            return Err(SchemaError::DuplicateScope(scope.name().to_string()));
        }
        self.scopes.push(scope);
        Ok(self)
    }

    pub fn person() -> Self {
        let mut schema = Self::declared(EntityKind::Person, PERSON_COLUMNS);
        schema
            .derived
            .push(DerivedAttribute::new(REVERSED_NAME, "name").with_formatter(reverse_value));
        schema.scopes = PERSON_SCOPES
            .iter()
            .map(|(name, arity)| DeclaredScope::new(*name, *arity))
            .collect();
        schema
    }

    pub fn article() -> Self {
        Self::declared(EntityKind::Article, ARTICLE_COLUMNS)
    }

    /// Same attributes as [`EntitySchema::article`] under the namespaced type tag.
    pub fn namespaced_article() -> Self {
        Self::declared(EntityKind::NamespacedArticle, ARTICLE_COLUMNS)
    }

    pub fn comment() -> Self {
        Self::declared(EntityKind::Comment, COMMENT_COLUMNS)
    }

    pub fn tag() -> Self {
        Self::declared(EntityKind::Tag, TAG_COLUMNS)
    }

    pub fn note() -> Self {
        Self::declared(EntityKind::Note, NOTE_COLUMNS)
    }

    /// Built-in schema for `kind`.
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Person => Self::person(),
            EntityKind::Article => Self::article(),
            EntityKind::NamespacedArticle => Self::namespaced_article(),
            EntityKind::Comment => Self::comment(),
            EntityKind::Tag => Self::tag(),
            EntityKind::Note => Self::note(),
        }
    }

    fn declared(kind: EntityKind, columns: &[&str]) -> Self {
        Self {
            kind,
            columns: columns.iter().map(|column| column.to_string()).collect(),
            derived: Vec::new(),
            scopes: Vec::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn derived_attributes(&self) -> &[DerivedAttribute] {
        &self.derived
    }

    pub fn derived(&self, name: &str) -> Option<&DerivedAttribute> {
        self.derived.iter().find(|attribute| attribute.name() == name)
    }

    pub fn scopes(&self) -> &[DeclaredScope] {
        &self.scopes
    }

    pub fn scope(&self, name: &str) -> Option<&DeclaredScope> {
        self.scopes.iter().find(|scope| scope.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Whether `name` is a column or a derived attribute of this entity.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.has_column(name) || self.derived(name).is_some()
    }

    /// Columns plus derived attribute names.
    pub fn all_attributes(&self) -> AttributeSet {
        self.columns
            .iter()
            .cloned()
            .chain(self.derived.iter().map(|attribute| attribute.name.clone()))
            .collect()
    }

    pub fn searchable(&self, role: Role) -> AttributeSet {
        attribute_policy::searchable(&self.all_attributes(), role)
    }

    pub fn sortable(&self, role: Role) -> AttributeSet {
        attribute_policy::sortable(&self.all_attributes(), role)
    }

    /// Whether `attribute` exists on this entity and may be used for `operation`.
    pub fn permits(&self, attribute: &str, operation: AttributeOperation, role: Role) -> bool {
        self.has_attribute(attribute) && attribute_policy::is_permitted(attribute, operation, role)
    }

    pub fn permits_search(&self, attribute: &str, role: Role) -> bool {
        self.permits(attribute, AttributeOperation::Search, role)
    }

    pub fn permits_sort(&self, attribute: &str, role: Role) -> bool {
        self.permits(attribute, AttributeOperation::Sort, role)
    }

    /// Re-checks every declared name. Built-in schemas always pass.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = AttributeSet::new();
        let names = self
            .columns
            .iter()
            .chain(self.derived.iter().map(|attribute| &attribute.name));
        for name in names {
            if !ATTRIBUTE_NAME_RE.is_match(name) {
                return Err(SchemaError::InvalidAttributeName(name.clone()));
            }
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateAttribute(name.clone()));
            }
        }
        let mut seen_scopes = AttributeSet::new();
        for scope in &self.scopes {
            if !ATTRIBUTE_NAME_RE.is_match(scope.name()) {
                return Err(SchemaError::InvalidAttributeName(scope.name().to_string()));
            }
            if !seen_scopes.insert(scope.name().to_string()) {
                return Err(SchemaError::DuplicateScope(scope.name().to_string()));
            }
        }
        Ok(())
    }

    fn check_new_name(&self, name: &str) -> Result<(), SchemaError> {
        if !ATTRIBUTE_NAME_RE.is_match(name) {
            return Err(SchemaError::InvalidAttributeName(name.to_string()));
        }
        if self.has_attribute(name) {
            return Err(SchemaError::DuplicateAttribute(name.to_string()));
        }
        Ok(())
    }
}
