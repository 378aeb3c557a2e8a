use crate::document::DocId;
use crate::index::InvertedIndex;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }

    /// Build a node of this kind over `children`.
    pub fn node(self, children: Vec<QueryNode>) -> QueryNode {
        match self {
            LogicalOp::And => QueryNode::And(children),
            LogicalOp::Or => QueryNode::Or(children),
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Parsed boolean query. `And`/`Or` always carry at least one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    Term(String),
    And(Vec<QueryNode>),
    Or(Vec<QueryNode>),
}

impl QueryNode {
    pub fn evaluate(&self, index: &InvertedIndex) -> HashSet<DocId> {
        evaluate(self, index)
    }

    /// Leaf words in left-to-right order.
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            QueryNode::Term(word) => out.push(word),
            QueryNode::And(children) | QueryNode::Or(children) => {
                for child in children {
                    child.collect_terms(out);
                }
            }
        }
    }
}

/// Canonical prefix rendering, e.g. `or(and(hello,world),baz)`.
impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, children) = match self {
            QueryNode::Term(word) => return f.write_str(word),
            QueryNode::And(children) => (LogicalOp::And, children),
            QueryNode::Or(children) => (LogicalOp::Or, children),
        };
        write!(f, "{op}(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}

/// Evaluate a query tree against one index.
pub fn evaluate(node: &QueryNode, index: &InvertedIndex) -> HashSet<DocId> {
    match node {
        QueryNode::Term(word) => index.term_matches(word),
        QueryNode::And(children) => {
            let mut sets: Vec<HashSet<DocId>> = children.iter().map(|c| evaluate(c, index)).collect();
            // smallest first keeps the running intersection small
            sets.sort_by_key(|s| s.len());
            let mut rest = sets.into_iter();
            let Some(mut acc) = rest.next() else { return HashSet::new() };
            for set in rest {
                if acc.is_empty() {
                    break;
                }
                acc.retain(|id| set.contains(id));
            }
            acc
        }
        QueryNode::Or(children) => children.iter().flat_map(|c| evaluate(c, index)).collect(),
    }
}
