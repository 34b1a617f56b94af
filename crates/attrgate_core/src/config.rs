//! Typed configuration for logging and fixture generation.
//!
//! Both structs deserialize with serde and fall back to their `Default`
//! for any missing field.

use serde::{Deserialize, Serialize};

/// Logging backend settings consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error` (case-insensitive).
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: std::env::temp_dir()
                .join("attrgate-logs")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
        }
    }
}

/// Returns the default log level for the current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Cardinalities of the generated fixture graph.
///
/// The default is the canonical shape: 10 people, 3 articles each, 10
/// comments per article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureShape {
    pub people: usize,
    pub articles_per_person: usize,
    pub comments_per_article: usize,
}

impl Default for FixtureShape {
    fn default() -> Self {
        Self {
            people: 10,
            articles_per_person: 3,
            comments_per_article: 10,
        }
    }
}

impl FixtureShape {
    /// Person-owned articles, excluding the standalone one.
    pub fn owned_articles(&self) -> usize {
        self.people * self.articles_per_person
    }

    /// Person-linked comments, excluding the standalone one.
    pub fn linked_comments(&self) -> usize {
        self.owned_articles() * self.comments_per_article
    }

    /// Every entity a build creates, standalone article and comment included.
    pub fn total_entities(&self) -> usize {
        let person_and_note = self.people * 2;
        let article_and_note = self.owned_articles() * 2;
        person_and_note + article_and_note + self.linked_comments() + 2
    }
}
