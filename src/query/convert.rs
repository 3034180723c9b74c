//! Conversion from `sqlparser` statements into the node model.
//!
//! Conversion never fails: anything without a node kind of its own becomes
//! [`Node::Other`] carrying its SQL text.

mod expr;
mod set_expr;
mod table;

pub use expr::convert_expr;
pub use set_expr::convert_query;
use sqlparser::ast::{
    AssignmentTarget, Delete, FromTable, Insert, Statement, TableObject, Update,
    UpdateTableFromKind
};
pub use table::{convert_table_factor, range_var};

use self::{expr::ident_name, table::convert_table_with_joins};
use crate::node::{self, DeleteFrom, InsertInto, Node, ResTarget};

/// Convert one parsed statement
pub fn convert_statement(stmt: &Statement) -> Node {
    match stmt {
        Statement::Query(query) => convert_query(query),
        Statement::Insert(insert) => convert_insert(insert),
        Statement::Update(update) => convert_update(update),
        Statement::Delete(delete) => convert_delete(delete),
        _ => Node::other("Statement", stmt.to_string())
    }
}

fn convert_insert(insert: &Insert) -> Node {
    let unmodelled = || Node::other("Insert", insert.to_string());
    let TableObject::TableName(name) = &insert.table else {
        return unmodelled();
    };
    let plain = insert.or.is_none()
        && !insert.ignore
        && insert.table_alias.is_none()
        && !insert.overwrite
        && insert.assignments.is_empty()
        && insert.partitioned.is_none()
        && insert.after_columns.is_empty()
        && !insert.has_table_keyword
        && insert.on.is_none()
        && insert.returning.is_none()
        && !insert.replace_into
        && insert.priority.is_none()
        && insert.insert_alias.is_none()
        && insert.settings.is_none()
        && insert.format_clause.is_none();
    let Some(relation) = range_var(name).filter(|_| plain) else {
        return unmodelled();
    };
    let cols = insert
        .columns
        .iter()
        .map(|col| {
            Node::ResTarget(Box::new(ResTarget {
                name: Some(ident_name(col)),
                val:  None
            }))
        })
        .collect();
    Node::InsertInto(Box::new(InsertInto {
        relation: Box::new(relation.into()),
        cols,
        select_stmt: insert
            .source
            .as_ref()
            .map(|source| Box::new(convert_query(source)))
    }))
}

/// `UPDATE ... FROM` keeps its FROM list; RETURNING, LIMIT, `OR` conflict
/// clauses and joined targets keep their SQL text
fn convert_update(update: &Update) -> Node {
    let unmodelled = || Node::other("Update", update.to_string());
    if !update.table.joins.is_empty()
        || update.returning.is_some()
        || update.or.is_some()
        || update.limit.is_some()
    {
        return unmodelled();
    }
    let from_clause = match &update.from {
        None => Vec::new(),
        Some(UpdateTableFromKind::AfterSet(tables)) => {
            tables.iter().map(convert_table_with_joins).collect()
        }
        Some(UpdateTableFromKind::BeforeSet(_)) => return unmodelled()
    };

    let mut target_list = Vec::with_capacity(update.assignments.len());
    for assignment in &update.assignments {
        let name = match &assignment.target {
            AssignmentTarget::ColumnName(name) => match name.0.as_slice() {
                [part] => part.as_ident().map(ident_name),
                _ => None
            },
            AssignmentTarget::Tuple(_) => None
        };
        let Some(name) = name else {
            return unmodelled();
        };
        target_list.push(Node::ResTarget(Box::new(ResTarget {
            name: Some(name),
            val:  Some(Box::new(convert_expr(&assignment.value)))
        })));
    }

    Node::Update(Box::new(node::Update {
        relation: Box::new(convert_table_factor(&update.table.relation)),
        target_list,
        from_clause,
        where_clause: update.selection.as_ref().map(|e| Box::new(convert_expr(e)))
    }))
}

fn convert_delete(delete: &Delete) -> Node {
    let unmodelled = || Node::other("Delete", delete.to_string());
    let (FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables)) = &delete.from;
    let plain = delete.tables.is_empty()
        && delete.using.is_none()
        && delete.returning.is_none()
        && delete.order_by.is_empty()
        && delete.limit.is_none();
    match tables.as_slice() {
        [table] if plain && table.joins.is_empty() => Node::DeleteFrom(Box::new(DeleteFrom {
            relation:     Box::new(convert_table_factor(&table.relation)),
            where_clause: delete
                .selection
                .as_ref()
                .map(|e| Box::new(convert_expr(e)))
        })),
        _ => unmodelled()
    }
}
