use crate::query::LogicalOp;
use thiserror::Error;

/// Syntax errors raised while parsing prefix or infix query text.
///
/// Parsing happens before any index access, so a failed query never touches
/// index state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("`{0}(...)` needs at least one argument")]
    EmptyCall(LogicalOp),

    #[error("argument {position} of `{op}(...)` is empty")]
    EmptyArgument { op: LogicalOp, position: usize },

    #[error("unexpected input after closing parenthesis: `{0}`")]
    TrailingInput(String),

    #[error("term `{0}` contains a reserved character")]
    InvalidTerm(String),

    #[error("term `{0}` has no searchable characters")]
    EmptyTerm(String),

    #[error("term `{0}` normalizes to more than one word")]
    MultiWordTerm(String),

    #[error("query starts with operator `{0}`")]
    LeadingOperator(String),

    #[error("query ends with operator `{0}`")]
    TrailingOperator(String),

    #[error("operator `{1}` follows operator `{0}`")]
    ConsecutiveOperators(String, String),

    #[error("missing operator between `{0}` and `{1}`")]
    MissingOperator(String, String),
}
