//! Inverted index and boolean query engine for visited web pages.

pub mod document;
pub mod engine;
pub mod error;
pub mod feed;
pub mod index;
pub mod parser;
pub mod query;
pub mod session;
pub mod tokenizer;

pub use document::{DocId, Document, DocumentStore, Registration};
pub use engine::{is_all_command, IndexStats, PageIndex, QueryOutcome, ALL_COMMAND};
pub use error::QueryError;
pub use index::{InvertedIndex, Section};
pub use parser::{parse_infix, parse_prefix, Syntax};
pub use query::{evaluate, LogicalOp, QueryNode};
pub use session::ResultPanel;
