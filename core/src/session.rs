use crate::engine::{PageIndex, QueryOutcome};
use crate::error::QueryError;
use crate::parser::Syntax;

/// The currently displayed query result. A rejected query leaves it as it was.
#[derive(Debug, Default)]
pub struct ResultPanel {
    current: Option<QueryOutcome>,
}

impl ResultPanel {
    pub fn new() -> Self { Self::default() }

    pub fn submit(&mut self, index: &PageIndex, syntax: Syntax, text: &str) -> Result<&QueryOutcome, QueryError> {
        let outcome = index.query(syntax, text)?;
        let shown: &QueryOutcome = self.current.insert(outcome);
        Ok(shown)
    }

    pub fn current(&self) -> Option<&QueryOutcome> {
        self.current.as_ref()
    }
}
