//! Columns a query filters by.
//!
//! Covers WHERE clauses, JOIN ... ON conditions and the test expressions of
//! subqueries used as predicates, across sub-selects in FROM, CTE bodies and
//! both arms of set operations. The SELECT target list is not included.
//!
//! Function call arguments are reported as plain filter columns; the call
//! itself is not tracked.

use std::collections::VecDeque;

use compact_str::CompactString;
use indexmap::IndexSet;
use log::trace;
use serde::Serialize;

use crate::{aliases::AliasMap, node::Node};

/// A column in filtering position, with its table resolved through the alias
/// map when the reference is qualified
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterColumn {
    pub table:  Option<CompactString>,
    pub column: CompactString
}

impl FilterColumn {
    pub fn new(table: Option<&str>, column: &str) -> Self {
        Self {
            table:  table.map(Into::into),
            column: column.into()
        }
    }
}

impl std::fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column),
            None => write!(f, "{}", self.column)
        }
    }
}

/// Deduplicated filter columns of `statements`, in first-seen order
pub fn filter_columns(statements: &[Node], aliases: &AliasMap) -> Vec<FilterColumn> {
    let mut walk = FilterWalk {
        aliases,
        statements: statements.iter().collect(),
        conditions: VecDeque::new(),
        columns: IndexSet::new()
    };
    walk.run();
    walk.columns.into_iter().collect()
}

struct FilterWalk<'a> {
    aliases:    &'a AliasMap,
    statements: VecDeque<&'a Node>,
    conditions: VecDeque<&'a Node>,
    columns:    IndexSet<FilterColumn>
}

impl<'a> FilterWalk<'a> {
    /// One statement and one condition per round until both queues drain
    fn run(&mut self) {
        loop {
            if let Some(statement) = self.statements.pop_front() {
                self.visit_statement(statement);
            }
            if let Some(condition) = self.conditions.pop_front() {
                self.visit_condition(condition);
            }
            if self.statements.is_empty() && self.conditions.is_empty() {
                break;
            }
        }
    }

    fn visit_statement(&mut self, statement: &'a Node) {
        match statement {
            Node::Select(select) if !select.is_set_operation() => {
                for item in &select.from_clause {
                    if let Node::RangeSubselect(sub) = item {
                        self.statements.push_back(&sub.subquery);
                    }
                }
                self.conditions
                    .extend(join_conditions(&select.from_clause));
                if let Some(clause) = &select.where_clause {
                    self.conditions.push_back(clause);
                }
                if let Some(Node::WithClause(with)) = select.with_clause.as_deref() {
                    for cte in &with.ctes {
                        if let Node::CommonTableExpr(cte) = cte {
                            self.statements.push_back(&cte.ctequery);
                        }
                    }
                }
            }
            Node::Select(select) => {
                if let Some(larg) = &select.larg {
                    self.statements.push_back(larg);
                }
                if let Some(rarg) = &select.rarg {
                    self.statements.push_back(rarg);
                }
            }
            Node::Update(update) => {
                if let Some(clause) = &update.where_clause {
                    self.conditions.push_back(clause);
                }
            }
            Node::DeleteFrom(delete) => {
                if let Some(clause) = &delete.where_clause {
                    self.conditions.push_back(clause);
                }
            }
            other => trace!("no filter columns in {} statement", other.kind_name())
        }
    }

    fn visit_condition(&mut self, condition: &'a Node) {
        match condition {
            Node::AExpr(expr) => {
                for side in [&expr.lexpr, &expr.rexpr].into_iter().flatten() {
                    self.conditions.push_back(side);
                }
            }
            Node::Row(row) => self.conditions.extend(&row.args),
            Node::ColumnRef(column_ref) => {
                let Some(column) = column_ref.column() else {
                    return;
                };
                let table = column_ref
                    .qualifier()
                    .map(|qualifier| self.aliases.resolve(qualifier).unwrap_or(qualifier));
                self.columns.insert(FilterColumn::new(table, column));
            }
            Node::NullTest(test) => self.conditions.push_back(&test.arg),
            Node::FuncCall(call) => self.conditions.extend(&call.args),
            Node::SubLink(link) => {
                if let Some(testexpr) = &link.testexpr {
                    self.conditions.push_back(testexpr);
                }
                self.statements.push_back(&link.subselect);
            }
            other => trace!("skipping {} in filter position", other.kind_name())
        }
    }
}

/// ON conditions of every join in a FROM list, nested join arms included
fn join_conditions(from_clause: &[Node]) -> Vec<&Node> {
    let mut conditions = Vec::new();
    for item in from_clause {
        let Node::JoinExpr(join) = item else {
            continue;
        };
        let mut joins = VecDeque::from([join]);
        while let Some(join) = joins.pop_front() {
            if let Some(quals) = &join.quals {
                conditions.push(quals.as_ref());
            }
            for side in [&join.larg, &join.rarg] {
                if let Node::JoinExpr(nested) = side.as_ref() {
                    joins.push_back(nested);
                }
            }
        }
    }
    conditions
}
