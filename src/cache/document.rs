//! Cached detail popup document

use scraper::Html;
use std::sync::Arc;

/// A fetched detail popup for one movie
///
/// Holds the popup markup behind an `Arc`, so clones handed out by the cache
/// are cheap. `scraper::Html` is not `Send`, so the parsed tree is produced
/// on demand by [`DetailDocument::html`] inside synchronous decoder code.
#[derive(Debug, Clone)]
pub struct DetailDocument {
    code: u32,
    body: Arc<str>,
}

impl DetailDocument {
    pub fn new(code: u32, body: impl Into<Arc<str>>) -> Self {
        Self {
            code,
            body: body.into(),
        }
    }

    /// Movie code the popup belongs to
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Parsed popup tree
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Whether two handles share the same stored markup
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}
