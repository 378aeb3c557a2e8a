use pagetrail_core::{parse_infix, parse_prefix, LogicalOp, QueryError, QueryNode, Syntax};

fn term(w: &str) -> QueryNode { QueryNode::Term(w.to_string()) }

#[test]
fn prefix_bare_term_is_normalized() {
    assert_eq!(parse_prefix("  Hello ").unwrap(), term("hello"));
}

#[test]
fn prefix_nested_calls() {
    let q = parse_prefix("or(and(a, b), or(c,d), e)").unwrap();
    assert_eq!(
        q,
        QueryNode::Or(vec![
            QueryNode::And(vec![term("a"), term("b")]),
            QueryNode::Or(vec![term("c"), term("d")]),
            term("e"),
        ])
    );
}

#[test]
fn prefix_keywords_are_case_insensitive() {
    assert_eq!(parse_prefix("AND(x,Or(y,z))").unwrap().to_string(), "and(x,or(y,z))");
}

#[test]
fn prefix_single_argument_call() {
    assert_eq!(parse_prefix("and(solo)").unwrap(), QueryNode::And(vec![term("solo")]));
}

#[test]
fn prefix_keyword_without_paren_is_a_term() {
    assert_eq!(parse_prefix("and").unwrap(), term("and"));
    assert_eq!(parse_prefix("orange").unwrap(), term("orange"));
}

#[test]
fn prefix_rendering_round_trips() {
    let q = parse_prefix("or(and(hello, world), baz)").unwrap();
    assert_eq!(parse_prefix(&q.to_string()).unwrap(), q);
}

#[test]
fn prefix_syntax_errors() {
    assert_eq!(parse_prefix(""), Err(QueryError::Empty));
    assert_eq!(parse_prefix("   "), Err(QueryError::Empty));
    assert_eq!(parse_prefix("and(hello"), Err(QueryError::UnbalancedParens));
    assert_eq!(parse_prefix("hello)"), Err(QueryError::UnbalancedParens));
    assert_eq!(parse_prefix("and()"), Err(QueryError::EmptyCall(LogicalOp::And)));
    assert_eq!(parse_prefix("or( )"), Err(QueryError::EmptyCall(LogicalOp::Or)));
    assert_eq!(
        parse_prefix("and(a,,b)"),
        Err(QueryError::EmptyArgument { op: LogicalOp::And, position: 2 })
    );
    assert_eq!(
        parse_prefix("or(a,)"),
        Err(QueryError::EmptyArgument { op: LogicalOp::Or, position: 2 })
    );
    assert_eq!(parse_prefix("and(a,b) c"), Err(QueryError::TrailingInput("c".into())));
    assert_eq!(parse_prefix("a,b"), Err(QueryError::InvalidTerm("a,b".into())));
    assert_eq!(parse_prefix("not(a)"), Err(QueryError::InvalidTerm("not(a)".into())));
    assert_eq!(parse_prefix("and(a,!!)"), Err(QueryError::EmptyTerm("!!".into())));
    assert_eq!(parse_prefix("and(hello world)"), Err(QueryError::MultiWordTerm("hello world".into())));
}

#[test]
fn prefix_handles_multibyte_terms() {
    assert_eq!(parse_prefix("or(é,ü)").unwrap(), QueryNode::Or(vec![term("é"), term("ü")]));
}

#[test]
fn infix_single_term() {
    assert_eq!(parse_infix("Rust").unwrap(), term("rust"));
}

#[test]
fn infix_precedence_groups_and_runs() {
    let q = parse_infix("a AND b OR c AND d AND e OR f").unwrap();
    assert_eq!(
        q,
        QueryNode::Or(vec![
            QueryNode::And(vec![term("a"), term("b")]),
            QueryNode::And(vec![term("c"), term("d"), term("e")]),
            term("f"),
        ])
    );
}

#[test]
fn infix_operators_are_case_insensitive() {
    assert_eq!(parse_infix("x and y Or z").unwrap().to_string(), "or(and(x,y),z)");
}

#[test]
fn infix_syntax_errors() {
    assert_eq!(parse_infix(""), Err(QueryError::Empty));
    assert_eq!(parse_infix("AND a"), Err(QueryError::LeadingOperator("AND".into())));
    assert_eq!(parse_infix("a OR"), Err(QueryError::TrailingOperator("OR".into())));
    assert_eq!(parse_infix("a AND OR b"), Err(QueryError::ConsecutiveOperators("AND".into(), "OR".into())));
    assert_eq!(parse_infix("a b"), Err(QueryError::MissingOperator("a".into(), "b".into())));
    assert_eq!(parse_infix("a AND ???"), Err(QueryError::EmptyTerm("???".into())));
    assert_eq!(parse_infix("a AND (b OR c)"), Err(QueryError::InvalidTerm("(b".into())));
    assert_eq!(parse_infix("a OR b,c"), Err(QueryError::InvalidTerm("b,c".into())));
}

#[test]
fn syntax_dispatch() {
    assert_eq!(Syntax::Prefix.parse("or(a,b)").unwrap(), Syntax::Infix.parse("a OR b").unwrap());
}
