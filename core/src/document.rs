use crate::index::Section;
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;

/// Position of a document in registration order.
pub type DocId = usize;

/// A visited page, tokenized once at registration and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub url: String,
    pub head_words: Vec<String>,
    pub body_words: Vec<String>,
    /// RFC 3339 registration time, empty if formatting failed.
    pub visited_at: String,
}

impl Document {
    pub fn words(&self, section: Section) -> &[String] {
        match section {
            Section::Head => &self.head_words,
            Section::Body => &self.body_words,
        }
    }

    /// Detail text shown when a result is selected.
    pub fn summary(&self) -> String {
        format!(
            "[Words In Head:]\n{}\n\n[Words In Body:]\n{}",
            self.head_words.join(" "),
            self.body_words.join(" ")
        )
    }
}

/// Outcome of [`DocumentStore::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub document: Arc<Document>,
    /// False when the URL was already known and the existing document was returned.
    pub inserted: bool,
}

/// Owner of every indexed document, deduplicated by URL.
///
/// Ids are dense and handed out in registration order, so `docs[id]` is the
/// document with that id and iterating `docs` replays the visit history.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Arc<Document>>,
    by_url: HashMap<String, DocId>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Register a page. Known URLs return the stored document without re-tokenizing.
    pub fn register(&mut self, url: &str, head_text: &str, body_text: &str) -> Registration {
        if let Some(existing) = self.lookup(url) {
            return Registration { document: existing.clone(), inserted: false };
        }
        let id = self.docs.len();
        let document = Arc::new(Document {
            id,
            url: url.to_string(),
            head_words: tokenize(head_text),
            body_words: tokenize(body_text),
            visited_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        });
        self.by_url.insert(url.to_string(), id);
        self.docs.push(document.clone());
        Registration { document, inserted: true }
    }

    pub fn lookup(&self, url: &str) -> Option<&Arc<Document>> {
        self.by_url.get(url).and_then(|id| self.get(*id))
    }

    pub fn get(&self, id: DocId) -> Option<&Arc<Document>> {
        self.docs.get(id)
    }

    /// Every document, sorted by URL.
    pub fn all_documents(&self) -> Vec<Arc<Document>> {
        let mut all = self.docs.clone();
        all.sort_by(|a, b| a.url.cmp(&b.url));
        all
    }

    /// Every document in the order it was first registered.
    pub fn history(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.docs.iter()
    }

    /// Resolve a result set to documents sorted by URL. Unknown ids are skipped.
    pub fn materialize(&self, ids: &HashSet<DocId>) -> Vec<Arc<Document>> {
        let mut out: Vec<Arc<Document>> = ids.iter().filter_map(|id| self.get(*id).cloned()).collect();
        out.sort_by(|a, b| a.url.cmp(&b.url));
        out
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_dedups_by_url() {
        let mut store = DocumentStore::new();
        let first = store.register("http://a.example", "Hello World", "foo");
        let second = store.register("http://a.example", "Other", "text");
        assert!(first.inserted);
        assert!(!second.inserted);
        assert_eq!(store.len(), 1);
        assert_eq!(second.document.head_words, vec!["hello", "world"]);
    }

    #[test]
    fn ids_follow_registration_order() {
        let mut store = DocumentStore::new();
        let urls = ["http://c.example", "http://a.example", "http://b.example"];
        for url in urls {
            store.register(url, "", "");
        }
        for (pos, url) in urls.iter().enumerate() {
            let doc = store.lookup(url).unwrap();
            assert_eq!(doc.id, pos);
            assert_eq!(store.get(doc.id).unwrap().url, *url);
        }
        assert!(store.get(urls.len()).is_none());
    }

    #[test]
    fn urls_are_case_sensitive() {
        let mut store = DocumentStore::new();
        store.register("http://a.example/Page", "", "");
        store.register("http://a.example/page", "", "");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn listing_is_sorted_and_history_keeps_visit_order() {
        let mut store = DocumentStore::new();
        store.register("http://b.example", "", "");
        store.register("http://a.example", "", "");
        let sorted: Vec<_> = store.all_documents().iter().map(|d| d.url.clone()).collect();
        assert_eq!(sorted, vec!["http://a.example", "http://b.example"]);
        let visited: Vec<_> = store.history().map(|d| d.url.as_str()).collect();
        assert_eq!(visited, vec!["http://b.example", "http://a.example"]);
    }

    #[test]
    fn summary_lists_both_sections() {
        let mut store = DocumentStore::new();
        let reg = store.register("http://a.example", "Hello World", "foo bar");
        assert_eq!(reg.document.summary(), "[Words In Head:]\nhello world\n\n[Words In Body:]\nfoo bar");
    }
}
