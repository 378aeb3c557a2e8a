use crate::error::QueryError;
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}][\p{L}\p{M}\p{N}]*").expect("valid regex");
}

/// Tokenize text into normalized words using NFKC normalization and lowercasing.
///
/// Anything outside letters, digits and combining marks separates words. Repeated
/// words are kept in source order; callers that need set semantics dedup themselves.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&normalized)
        .map(|mat| mat.as_str().to_string())
        .collect()
}

/// Normalize a single query term. The term must reduce to exactly one word.
pub fn normalize_term(raw: &str) -> Result<String, QueryError> {
    let mut words = tokenize(raw);
    match words.len() {
        0 => Err(QueryError::EmptyTerm(raw.trim().to_string())),
        1 => Ok(words.remove(0)),
        _ => Err(QueryError::MultiWordTerm(raw.trim().to_string())),
    }
}
