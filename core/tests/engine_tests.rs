use pagetrail_core::{PageIndex, QueryError, QueryOutcome, Syntax};
use std::sync::Arc;
use std::thread;

fn scenario() -> PageIndex {
    let index = PageIndex::new();
    index.on_page_loaded("http://a.example", "Hello World", "foo bar hello");
    index.on_page_loaded("http://b.example", "Hello there", "baz");
    index
}

fn matches(outcome: QueryOutcome) -> (Vec<String>, Vec<String>) {
    match outcome {
        QueryOutcome::Matches { head, body, .. } => (head, body),
        other => panic!("expected matches, got {other:?}"),
    }
}

#[test]
fn and_over_head_index() {
    let (head, body) = matches(scenario().prefix_query("and(hello,world)").unwrap());
    assert_eq!(head, vec!["http://a.example"]);
    assert!(body.is_empty());
}

#[test]
fn or_is_evaluated_per_index() {
    let (head, body) = matches(scenario().prefix_query("or(hello,baz)").unwrap());
    assert_eq!(head, vec!["http://a.example", "http://b.example"]);
    assert_eq!(body, vec!["http://a.example", "http://b.example"]);
}

#[test]
fn infix_groups_and_before_or() {
    let outcome = scenario().infix_query("hello AND world OR baz").unwrap();
    assert_eq!(
        outcome,
        QueryOutcome::Matches {
            query: "or(and(hello,world),baz)".into(),
            head: vec!["http://a.example".into()],
            body: vec!["http://b.example".into()],
        }
    );
}

#[test]
fn unknown_terms_compose_as_empty() {
    let (head, body) = matches(scenario().prefix_query("or(nothing,there)").unwrap());
    assert_eq!(head, vec!["http://b.example"]);
    assert!(body.is_empty());
    let (head, _) = matches(scenario().prefix_query("and(nothing,hello)").unwrap());
    assert!(head.is_empty());
}

#[test]
fn syntax_error_is_reported_without_changes() {
    let index = scenario();
    assert_eq!(index.prefix_query("and(hello"), Err(QueryError::UnbalancedParens));
    assert_eq!(index.len(), 2);
}

#[test]
fn infix_parentheses_are_rejected_not_ignored() {
    let index = PageIndex::new();
    index.on_page_loaded("http://x.example", "", "c");
    assert_eq!(index.infix_query("a AND (b OR c)"), Err(QueryError::InvalidTerm("(b".into())));
    let (head, body) = matches(index.infix_query("a AND b OR c").unwrap());
    assert!(head.is_empty());
    assert_eq!(body, vec!["http://x.example"]);
}

#[test]
fn all_command_bypasses_parsing() {
    let index = scenario();
    let expected = QueryOutcome::All { urls: vec!["http://a.example".into(), "http://b.example".into()] };
    assert_eq!(index.query(Syntax::Prefix, " /ALL ").unwrap(), expected);
    assert_eq!(index.query(Syntax::Infix, "/all").unwrap(), expected);
}

#[test]
fn duplicate_registration_is_idempotent() {
    let index = scenario();
    let again = index.on_page_loaded("http://a.example", "completely different", "text");
    assert!(!again.inserted);
    assert_eq!(index.len(), 2);
    let (head, body) = matches(index.prefix_query("or(completely,different,text)").unwrap());
    assert!(head.is_empty() && body.is_empty());
}

#[test]
fn document_detail_and_history() {
    let index = scenario();
    let doc = index.document("http://a.example").unwrap();
    assert_eq!(doc.head_words, vec!["hello", "world"]);
    assert_eq!(doc.body_words, vec!["foo", "bar", "hello"]);
    assert!(index.document("http://missing.example").is_none());
    let visited: Vec<String> = index.history().iter().map(|d| d.url.clone()).collect();
    assert_eq!(visited, vec!["http://a.example", "http://b.example"]);
}

#[test]
fn concurrent_page_loads_register_each_url_once() {
    let index = Arc::new(PageIndex::new());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let index = index.clone();
            thread::spawn(move || {
                for n in 0..50 {
                    // neighbouring workers overlap on half of their URLs
                    let url = format!("http://site{}.example", (n + worker * 25) % 100);
                    index.on_page_loaded(&url, "shared head", &format!("page{n}"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let stats = index.stats();
    assert_eq!(stats.documents, 100);
    assert_eq!(index.all_urls().len(), 100);
    let (head, _) = matches(index.prefix_query("and(shared,head)").unwrap());
    assert_eq!(head.len(), 100);
}
