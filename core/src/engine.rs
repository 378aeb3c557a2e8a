use crate::document::{Document, DocumentStore, Registration};
use crate::error::QueryError;
use crate::index::{InvertedIndex, Section};
use crate::parser::Syntax;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Literal command that lists every registered page instead of running a query.
pub const ALL_COMMAND: &str = "/all";

pub fn is_all_command(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(ALL_COMMAND)
}

/// What a query surface hands back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    All { urls: Vec<String> },
    Matches {
        /// Canonical prefix rendering of the parsed query.
        query: String,
        head: Vec<String>,
        body: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub head_terms: usize,
    pub body_terms: usize,
}

struct Inner {
    store: DocumentStore,
    head: InvertedIndex,
    body: InvertedIndex,
}

/// Document store plus head and body indexes behind one lock.
///
/// Registration is a single write-locked unit (tokenize, store, index head,
/// index body), so readers never see a document in only one index.
pub struct PageIndex {
    inner: RwLock<Inner>,
}

impl Default for PageIndex {
    fn default() -> Self { Self::new() }
}

impl PageIndex {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                store: DocumentStore::new(),
                head: InvertedIndex::new(Section::Head),
                body: InvertedIndex::new(Section::Body),
            }),
        }
    }

    /// Report a successfully loaded page. Repeated reports of a URL are no-ops.
    pub fn on_page_loaded(&self, url: &str, head_text: &str, body_text: &str) -> Registration {
        if let Some(existing) = self.inner.read().store.lookup(url) {
            tracing::debug!(url, "page already indexed");
            return Registration { document: existing.clone(), inserted: false };
        }

        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let registration = inner.store.register(url, head_text, body_text);
        if registration.inserted {
            inner.head.add(&registration.document);
            inner.body.add(&registration.document);
            tracing::info!(
                url,
                head_words = registration.document.head_words.len(),
                body_words = registration.document.body_words.len(),
                "indexed page"
            );
        }
        registration
    }

    /// Run a query in the given syntax against both indexes, or list everything for `/all`.
    pub fn query(&self, syntax: Syntax, text: &str) -> Result<QueryOutcome, QueryError> {
        if is_all_command(text) {
            return Ok(QueryOutcome::All { urls: self.all_urls() });
        }
        let node = syntax.parse(text).map_err(|err| {
            tracing::debug!(%syntax, text, %err, "rejected query");
            err
        })?;
        tracing::debug!(%syntax, query = %node, terms = ?node.terms(), "parsed query");

        let inner = self.inner.read();
        let urls = |section: &InvertedIndex| -> Vec<String> {
            inner.store.materialize(&node.evaluate(section)).iter().map(|d| d.url.clone()).collect()
        };
        Ok(QueryOutcome::Matches { query: node.to_string(), head: urls(&inner.head), body: urls(&inner.body) })
    }

    pub fn prefix_query(&self, text: &str) -> Result<QueryOutcome, QueryError> {
        self.query(Syntax::Prefix, text)
    }

    pub fn infix_query(&self, text: &str) -> Result<QueryOutcome, QueryError> {
        self.query(Syntax::Infix, text)
    }

    /// Every registered URL in ascending order.
    pub fn all_urls(&self) -> Vec<String> {
        self.inner.read().store.all_documents().iter().map(|d| d.url.clone()).collect()
    }

    pub fn document(&self, url: &str) -> Option<Arc<Document>> {
        self.inner.read().store.lookup(url).cloned()
    }

    /// Documents in the order their pages were first loaded.
    pub fn history(&self) -> Vec<Arc<Document>> {
        self.inner.read().store.history().cloned().collect()
    }

    pub fn stats(&self) -> IndexStats {
        let inner = self.inner.read();
        IndexStats {
            documents: inner.store.len(),
            head_terms: inner.head.num_terms(),
            body_terms: inner.body.num_terms(),
        }
    }

    pub fn len(&self) -> usize { self.inner.read().store.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
