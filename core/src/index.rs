use crate::document::{DocId, Document};
use crate::tokenizer::normalize_term;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Which part of a page an index instance covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Head,
    Body,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Head => f.write_str("head"),
            Section::Body => f.write_str("body"),
        }
    }
}

/// Word -> documents containing that word in one section.
///
/// Postings hold document ids only; the documents themselves live in the
/// [`DocumentStore`](crate::DocumentStore).
#[derive(Debug)]
pub struct InvertedIndex {
    section: Section,
    postings: HashMap<String, HashSet<DocId>>,
    indexed: HashSet<DocId>,
}

impl InvertedIndex {
    pub fn new(section: Section) -> Self {
        Self { section, postings: HashMap::new(), indexed: HashSet::new() }
    }

    pub fn section(&self) -> Section { self.section }

    /// Index every distinct word of the document's section. Returns false if the
    /// document was already indexed, in which case nothing changes.
    pub fn add(&mut self, doc: &Document) -> bool {
        if !self.indexed.insert(doc.id) {
            return false;
        }
        let distinct: HashSet<&str> = doc.words(self.section).iter().map(String::as_str).collect();
        for word in distinct {
            self.postings.entry(word.to_string()).or_default().insert(doc.id);
        }
        true
    }

    /// Exact, case-insensitive word lookup. Anything that does not normalize to a
    /// single word matches nothing.
    pub fn term_matches(&self, word: &str) -> HashSet<DocId> {
        normalize_term(word)
            .ok()
            .and_then(|w| self.postings.get(&w).cloned())
            .unwrap_or_default()
    }

    pub fn contains_term(&self, word: &str) -> bool {
        normalize_term(word).map(|w| self.postings.contains_key(&w)).unwrap_or(false)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn num_documents(&self) -> usize { self.indexed.len() }
}
