//! Prefix (`and(a,or(b,c))`) and infix (`a AND b OR c`) query syntaxes.
//!
//! Both compile to the same [`QueryNode`] tree.

use crate::error::QueryError;
use crate::query::{LogicalOp, QueryNode};
use crate::tokenizer::normalize_term;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    #[default]
    Prefix,
    Infix,
}

impl Syntax {
    pub fn parse(self, input: &str) -> Result<QueryNode, QueryError> {
        match self {
            Syntax::Prefix => parse_prefix(input),
            Syntax::Infix => parse_infix(input),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::Prefix => f.write_str("prefix"),
            Syntax::Infix => f.write_str("infix"),
        }
    }
}

impl FromStr for Syntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(Syntax::Prefix),
            "infix" => Ok(Syntax::Infix),
            other => Err(format!("unknown query syntax `{other}` (expected prefix or infix)")),
        }
    }
}

/// Parse the functional form: `term`, `and(q, ...)` or `or(q, ...)`.
pub fn parse_prefix(input: &str) -> Result<QueryNode, QueryError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(QueryError::Empty);
    }
    check_balanced(text)?;
    parse_prefix_expr(text)
}

fn check_balanced(text: &str) -> Result<(), QueryError> {
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or(QueryError::UnbalancedParens)?,
            _ => {}
        }
    }
    if depth == 0 { Ok(()) } else { Err(QueryError::UnbalancedParens) }
}

fn parse_prefix_expr(text: &str) -> Result<QueryNode, QueryError> {
    let text = text.trim();
    let Some((op, rest)) = strip_call(text) else {
        return parse_term(text);
    };

    let close = matching_close(rest)?;
    let trailing = rest[close + 1..].trim();
    if !trailing.is_empty() {
        return Err(QueryError::TrailingInput(trailing.to_string()));
    }
    let inner = &rest[..close];
    if inner.trim().is_empty() {
        return Err(QueryError::EmptyCall(op));
    }

    let mut children = Vec::new();
    for (i, arg) in split_top_level(inner).into_iter().enumerate() {
        if arg.trim().is_empty() {
            return Err(QueryError::EmptyArgument { op, position: i + 1 });
        }
        children.push(parse_prefix_expr(arg)?);
    }
    Ok(op.node(children))
}

/// Match a leading `and(` / `or(` keyword, returning the text after the open paren.
fn strip_call(text: &str) -> Option<(LogicalOp, &str)> {
    for op in [LogicalOp::And, LogicalOp::Or] {
        let len = op.keyword().len() + 1;
        if let Some(head) = text.get(..len) {
            if head.ends_with('(') && head[..len - 1].eq_ignore_ascii_case(op.keyword()) {
                return Some((op, &text[len..]));
            }
        }
    }
    None
}

/// Byte offset of the `)` closing the call whose `(` was just consumed.
fn matching_close(rest: &str) -> Result<usize, QueryError> {
    let mut depth = 0usize;
    for (pos, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return Ok(pos),
            ')' => depth -= 1,
            _ => {}
        }
    }
    Err(QueryError::UnbalancedParens)
}

/// Split call arguments on commas at nesting depth zero.
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (pos, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

/// A bare term. Parentheses and commas are never part of a word, in either syntax.
fn parse_term(text: &str) -> Result<QueryNode, QueryError> {
    if text.contains(['(', ')', ',']) {
        return Err(QueryError::InvalidTerm(text.to_string()));
    }
    Ok(QueryNode::Term(normalize_term(text)?))
}

fn infix_operator(token: &str) -> Option<LogicalOp> {
    if token.eq_ignore_ascii_case("and") {
        Some(LogicalOp::And)
    } else if token.eq_ignore_ascii_case("or") {
        Some(LogicalOp::Or)
    } else {
        None
    }
}

/// Parse the flat infix form `term ((AND|OR) term)*`.
///
/// AND binds tighter than OR: runs of AND-joined terms are grouped first and the
/// groups are then OR-ed, so `a AND b OR c` is `or(and(a,b),c)`. There is no
/// grouping; a token carrying `(`, `)` or `,` is rejected as `InvalidTerm`.
pub fn parse_infix(input: &str) -> Result<QueryNode, QueryError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(QueryError::Empty);
    }

    let mut groups: Vec<Vec<QueryNode>> = vec![Vec::new()];
    let mut expect_term = true;
    let mut prev = "";
    for &token in &tokens {
        match (expect_term, infix_operator(token)) {
            (true, Some(_)) if prev.is_empty() => {
                return Err(QueryError::LeadingOperator(token.to_string()));
            }
            (true, Some(_)) => {
                return Err(QueryError::ConsecutiveOperators(prev.to_string(), token.to_string()));
            }
            (true, None) => {
                let term = parse_term(token)?;
                if let Some(group) = groups.last_mut() {
                    group.push(term);
                }
                expect_term = false;
            }
            (false, Some(LogicalOp::And)) => expect_term = true,
            (false, Some(LogicalOp::Or)) => {
                groups.push(Vec::new());
                expect_term = true;
            }
            (false, None) => {
                return Err(QueryError::MissingOperator(prev.to_string(), token.to_string()));
            }
        }
        prev = token;
    }
    if expect_term {
        return Err(QueryError::TrailingOperator(prev.to_string()));
    }

    let mut ors: Vec<QueryNode> = groups.into_iter().map(collapse(LogicalOp::And)).collect();
    Ok(if ors.len() == 1 { ors.remove(0) } else { QueryNode::Or(ors) })
}

fn collapse(op: LogicalOp) -> impl Fn(Vec<QueryNode>) -> QueryNode {
    move |mut nodes| if nodes.len() == 1 { nodes.remove(0) } else { op.node(nodes) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(w: &str) -> QueryNode { QueryNode::Term(w.to_string()) }

    #[test]
    fn prefix_splits_only_at_top_level() {
        let q = parse_prefix("and(a,or(b,c))").unwrap();
        assert_eq!(q, QueryNode::And(vec![term("a"), QueryNode::Or(vec![term("b"), term("c")])]));
    }

    #[test]
    fn infix_and_binds_tighter() {
        let q = parse_infix("hello AND world OR baz").unwrap();
        assert_eq!(q.to_string(), "or(and(hello,world),baz)");
    }

    #[test]
    fn syntax_from_str() {
        assert_eq!("Infix".parse::<Syntax>().unwrap(), Syntax::Infix);
        assert!("postfix".parse::<Syntax>().is_err());
    }
}
