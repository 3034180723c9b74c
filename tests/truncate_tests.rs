use std::cell::Cell;

use sql_query_inspector::{
    deparse::{Deparse, SqlDeparser},
    error::{AppResult, deparse_error},
    node::{ColumnRef, InsertInto, Node, RangeVar, ResTarget, Select, Slot, Step},
    query::{SqlDialect, parse_statements},
    truncate::{TruncationKind, hard_cut, possible_truncations, truncate}
};

fn parse(sql: &str) -> Vec<Node> {
    parse_statements(sql, SqlDialect::Generic).unwrap()
}

fn contains_marker(statements: &[Node]) -> bool {
    let mut found = false;
    for statement in statements {
        statement.walk(&mut |node| found |= matches!(node, Node::Truncated));
    }
    found
}

const WIDE_SELECT: &str = "SELECT alpha, beta, gamma, delta FROM accounts WHERE id = 1";

const CTE_SELECT: &str =
    "WITH recent AS (SELECT id FROM orders WHERE total > 100) SELECT id FROM recent";

#[test]
fn test_fast_path_returns_rendering_unchanged() {
    let statements = parse(WIDE_SELECT);
    let rendered = SqlDeparser.deparse(&statements).unwrap();
    assert_eq!(rendered, WIDE_SELECT);

    let exact = truncate(&statements, rendered.len(), &SqlDeparser).unwrap();
    assert_eq!(exact, rendered);
    let roomy = truncate(&statements, 1000, &SqlDeparser).unwrap();
    assert_eq!(roomy, rendered);
}

#[test]
fn test_target_list_replaced_first() {
    let statements = parse(WIDE_SELECT);
    let result = truncate(&statements, 40, &SqlDeparser).unwrap();
    assert_eq!(result, "SELECT ... FROM accounts WHERE id = 1");
    assert!(result.chars().count() <= 40);
}

#[test]
fn test_replacements_accumulate() {
    let statements = parse(WIDE_SELECT);
    let result = truncate(&statements, 34, &SqlDeparser).unwrap();
    assert_eq!(result, "SELECT ... FROM accounts WHERE ...");
}

#[test]
fn test_hard_cut_fallback() {
    let statements = parse(WIDE_SELECT);
    let result = truncate(&statements, 20, &SqlDeparser).unwrap();
    assert_eq!(result.chars().count(), 20);
    assert_eq!(result, "SELECT alpha, bet...");
    assert!(result.starts_with(&WIDE_SELECT[..17]));
    assert!(result.ends_with("..."));
}

#[test]
fn test_deepest_candidate_first() {
    let statements = parse(CTE_SELECT);
    let full = SqlDeparser.deparse(&statements).unwrap();
    assert_eq!(full, CTE_SELECT);

    let result = truncate(&statements, 70, &SqlDeparser).unwrap();
    assert_eq!(
        result,
        "WITH recent AS (SELECT id FROM orders WHERE ...) SELECT id FROM recent"
    );
}

#[test]
fn test_cte_query_replaced_after_deeper_candidates() {
    let statements = parse(CTE_SELECT);
    let result = truncate(&statements, 60, &SqlDeparser).unwrap();
    assert_eq!(result, "WITH recent AS (...) SELECT id FROM recent");
}

#[test]
fn test_short_candidates_never_applied() {
    // Any rendering that contains the marker is rejected, so a successful
    // result proves the two-character target list was skipped
    let renders_marker_free = |statements: &[Node]| -> AppResult<String> {
        if contains_marker(statements) {
            return Err(deparse_error("marker applied"));
        }
        SqlDeparser.deparse(statements)
    };
    let statements = parse("SELECT ab FROM t");
    let candidates = possible_truncations(&statements, &SqlDeparser).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].length, 2);

    let result = truncate(&statements, 10, &renders_marker_free).unwrap();
    assert_eq!(result, "SELECT ...");
}

#[test]
fn test_caller_tree_not_modified() {
    let statements = parse(WIDE_SELECT);
    let before = statements.clone();
    truncate(&statements, 20, &SqlDeparser).unwrap();
    assert_eq!(statements, before);
    assert!(!contains_marker(&statements));
}

#[test]
fn test_deterministic() {
    let statements = parse(CTE_SELECT);
    let first = truncate(&statements, 60, &SqlDeparser).unwrap();
    let second = truncate(&statements, 60, &SqlDeparser).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_render_calls_bounded() {
    let calls = Cell::new(0usize);
    let counting = |statements: &[Node]| -> AppResult<String> {
        calls.set(calls.get() + 1);
        SqlDeparser.deparse(statements)
    };
    let statements = parse(WIDE_SELECT);
    let candidates = possible_truncations(&statements, &SqlDeparser).unwrap();

    calls.set(0);
    truncate(&statements, 20, &counting).unwrap();
    // full render, one measurement per candidate, one render per applied candidate
    assert!(calls.get() <= 1 + 2 * candidates.len());
}

#[test]
fn test_deparse_failure_propagates() {
    let failing = |_: &[Node]| -> AppResult<String> { Err(deparse_error("renderer offline")) };
    let statements = parse(WIDE_SELECT);
    let err = truncate(&statements, 20, &failing).unwrap_err();
    assert!(format!("{:?}", err).contains("renderer offline"));
}

#[test]
fn test_candidates_collected() {
    let statements = parse(CTE_SELECT);
    let candidates = possible_truncations(&statements, &SqlDeparser).unwrap();
    let kinds: Vec<_> = candidates.iter().map(|c| c.kind).collect();
    assert!(kinds.contains(&TruncationKind::CteQuery));
    assert!(kinds.contains(&TruncationKind::WhereClause));
    assert_eq!(
        kinds
            .iter()
            .filter(|k| **k == TruncationKind::TargetList)
            .count(),
        2
    );

    let cte = candidates
        .iter()
        .find(|c| c.kind == TruncationKind::CteQuery)
        .unwrap();
    assert_eq!(cte.length, "SELECT id FROM orders WHERE total > 100".len());
    assert!(!cte.is_sequence);
    assert_eq!(cte.location.to_string(), "[0].withClause.ctes[0].ctequery");

    let inner_where = candidates
        .iter()
        .find(|c| c.kind == TruncationKind::WhereClause)
        .unwrap();
    assert_eq!(inner_where.length, "SELECT WHERE total > 100".len());
    assert_eq!(inner_where.location.len(), 4);
}

#[test]
fn test_target_list_length_excludes_keyword() {
    let statements = parse("SELECT alpha, beta FROM t");
    let candidates = possible_truncations(&statements, &SqlDeparser).unwrap();
    assert_eq!(candidates[0].kind, TruncationKind::TargetList);
    assert_eq!(candidates[0].length, "alpha, beta".len());
    assert!(candidates[0].is_sequence);
    assert_eq!(
        candidates[0].location.steps.as_slice(),
        &[Step {
            slot:  Slot::TargetList,
            index: None
        }]
    );
}

#[test]
fn test_insert_columns_truncated() {
    let cols = ["first_name", "last_name", "email", "phone"]
        .into_iter()
        .map(|name| {
            Node::ResTarget(Box::new(ResTarget {
                name: Some(name.into()),
                val:  None
            }))
        })
        .collect();
    let statements = vec![Node::InsertInto(Box::new(InsertInto {
        relation: Box::new(RangeVar::new("people").into()),
        cols,
        select_stmt: None
    }))];
    let full = SqlDeparser.deparse(&statements).unwrap();
    assert_eq!(
        full,
        "INSERT INTO people (first_name, last_name, email, phone) DEFAULT VALUES"
    );

    let candidates = possible_truncations(&statements, &SqlDeparser).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].kind, TruncationKind::Cols);

    let result = truncate(&statements, 40, &SqlDeparser).unwrap();
    assert_eq!(result, "INSERT INTO people (...) DEFAULT VALUES");
}

#[test]
fn test_multiple_statements_share_budget() {
    let statements = parse("SELECT alpha, beta, gamma FROM a; SELECT delta, epsilon FROM b");
    let result = truncate(&statements, 45, &SqlDeparser).unwrap();
    assert!(result.chars().count() <= 45);
    assert!(result.contains("; "));
}

#[test]
fn test_hard_cut_counts_characters() {
    let cut = hard_cut("SELECT 'äöüß' FROM t", 10);
    assert_eq!(cut, "SELECT ...");
    let cut = hard_cut("SELECT 'äöüßäöüß'", 12);
    assert_eq!(cut, "SELECT 'ä...");
    assert_eq!(cut.chars().count(), 12);
}

#[test]
fn test_hard_cut_tiny_budget() {
    assert_eq!(hard_cut("SELECT 1", 2), "...");
    assert_eq!(hard_cut("SELECT 1", 0), "...");
}

#[test]
fn test_select_without_from() {
    let statements = vec![Node::from(Select {
        target_list: vec![Node::ResTarget(Box::new(ResTarget {
            name: None,
            val:  Some(Box::new(
                ColumnRef::new(["a_really_long_column_name_here"]).into()
            ))
        }))],
        ..Default::default()
    })];
    let result = truncate(&statements, 12, &SqlDeparser).unwrap();
    assert_eq!(result, "SELECT ...");
}
