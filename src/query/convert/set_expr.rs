use sqlparser::ast::{
    Cte, Distinct, Expr, GroupByExpr, LimitClause, OffsetRows, OrderByKind, Query, SelectFlavor,
    SelectItem, SetExpr, SetOperator, SetQuantifier
};

use super::{
    expr::{convert_expr, convert_sort_by, ident_name},
    table::convert_table_with_joins
};
use crate::node::{ColumnRef, CommonTableExpr, Node, ResTarget, Select, SetOp, WithClause};

/// Convert a query, attaching WITH, ORDER BY and LIMIT/OFFSET to its body.
///
/// Falls back to [`Node::Other`] when the body is not a select, when a
/// parenthesized body already carries its own ORDER BY/LIMIT, or when the
/// query uses a clause the node model has no slot for.
pub fn convert_query(query: &Query) -> Node {
    if has_unmodelled_clause(query) {
        return Node::other("Query", query.to_string());
    }
    let mut node = convert_set_expr(&query.body);
    let Node::Select(select) = &mut node else {
        return Node::other("Query", query.to_string());
    };

    let sort_clause = convert_order_by(query);
    let (limit_count, limit_offset) = convert_limit(query);
    let clashes = (query.with.is_some() && select.with_clause.is_some())
        || (!sort_clause.is_empty() && !select.sort_clause.is_empty())
        || ((limit_count.is_some() || limit_offset.is_some())
            && (select.limit_count.is_some() || select.limit_offset.is_some()));
    if clashes {
        return Node::other("Query", query.to_string());
    }

    if let Some(with) = &query.with {
        let ctes = with.cte_tables.iter().map(convert_cte).collect();
        select.with_clause = Some(Box::new(Node::WithClause(WithClause {
            recursive: with.recursive,
            ctes
        })));
    }
    if !sort_clause.is_empty() {
        select.sort_clause = sort_clause;
    }
    if limit_count.is_some() || limit_offset.is_some() {
        select.limit_count = limit_count;
        select.limit_offset = limit_offset;
    }
    node
}

fn has_unmodelled_clause(query: &Query) -> bool {
    let order_by_extras = query
        .order_by
        .as_ref()
        .is_some_and(|order_by| order_by.interpolate.is_some());
    let limit_extras = match &query.limit_clause {
        Some(LimitClause::LimitOffset {
            offset,
            limit_by,
            ..
        }) => {
            !limit_by.is_empty()
                || offset
                    .as_ref()
                    .is_some_and(|o| !matches!(o.rows, OffsetRows::None))
        }
        _ => false
    };
    order_by_extras
        || limit_extras
        || query.fetch.is_some()
        || !query.locks.is_empty()
        || query.for_clause.is_some()
        || query.settings.is_some()
        || query.format_clause.is_some()
        || !query.pipe_operators.is_empty()
}

fn convert_cte(cte: &Cte) -> Node {
    let typed_columns = cte.alias.columns.iter().any(|c| c.data_type.is_some());
    if typed_columns || cte.from.is_some() || cte.materialized.is_some() {
        return Node::other("Cte", cte.to_string());
    }
    Node::CommonTableExpr(Box::new(CommonTableExpr {
        ctename:       ident_name(&cte.alias.name),
        aliascolnames: cte.alias.columns.iter().map(|c| ident_name(&c.name)).collect(),
        ctequery:      Box::new(convert_query(&cte.query))
    }))
}

fn convert_order_by(query: &Query) -> Vec<Node> {
    let Some(order_by) = &query.order_by else {
        return Vec::new();
    };
    let OrderByKind::Expressions(exprs) = &order_by.kind else {
        return vec![Node::other("OrderBy", order_by.to_string())];
    };
    exprs.iter().map(convert_sort_by).collect()
}

fn convert_limit(query: &Query) -> (Option<Box<Node>>, Option<Box<Node>>) {
    let boxed = |expr: &Expr| Some(Box::new(convert_expr(expr)));
    match &query.limit_clause {
        Some(LimitClause::LimitOffset {
            limit,
            offset,
            ..
        }) => (
            limit.as_ref().and_then(boxed),
            offset.as_ref().and_then(|o| boxed(&o.value))
        ),
        Some(LimitClause::OffsetCommaLimit {
            offset,
            limit
        }) => (boxed(limit), boxed(offset)),
        None => (None, None)
    }
}

fn convert_set_expr(set_expr: &SetExpr) -> Node {
    match set_expr {
        SetExpr::Select(select) => convert_select(select),
        SetExpr::SetOperation {
            set_quantifier:
                SetQuantifier::ByName | SetQuantifier::AllByName | SetQuantifier::DistinctByName,
            ..
        } => Node::other("SetExpr", set_expr.to_string()),
        SetExpr::SetOperation {
            op,
            set_quantifier,
            left,
            right,
            ..
        } => Node::from(Select {
            op: match op {
                SetOperator::Union => SetOp::Union,
                SetOperator::Intersect => SetOp::Intersect,
                _ => SetOp::Except
            },
            all: matches!(set_quantifier, SetQuantifier::All),
            larg: Some(Box::new(convert_set_expr(left))),
            rarg: Some(Box::new(convert_set_expr(right))),
            ..Default::default()
        }),
        SetExpr::Query(query) => convert_query(query),
        other => Node::other("SetExpr", other.to_string())
    }
}

fn convert_select(select: &sqlparser::ast::Select) -> Node {
    let group_clause = match &select.group_by {
        GroupByExpr::Expressions(exprs, modifiers) if modifiers.is_empty() => {
            exprs.iter().map(convert_expr).collect()
        }
        _ => return Node::other("Select", select.to_string())
    };
    let unmodelled = select.top.is_some()
        || select.exclude.is_some()
        || select.into.is_some()
        || !select.lateral_views.is_empty()
        || select.prewhere.is_some()
        || !select.cluster_by.is_empty()
        || !select.distribute_by.is_empty()
        || !select.sort_by.is_empty()
        || !select.named_window.is_empty()
        || select.qualify.is_some()
        || select.value_table_mode.is_some()
        || select.connect_by.is_some()
        || !matches!(select.flavor, SelectFlavor::Standard);
    if unmodelled {
        return Node::other("Select", select.to_string());
    }

    let distinct_clause = match &select.distinct {
        Some(Distinct::On(exprs)) => exprs.iter().map(convert_expr).collect(),
        _ => Vec::new()
    };
    let target_list = select.projection.iter().map(convert_select_item).collect();
    let from_clause = select.from.iter().map(convert_table_with_joins).collect();
    Node::from(Select {
        distinct: select.distinct.is_some(),
        distinct_clause,
        target_list,
        from_clause,
        where_clause: select.selection.as_ref().map(|e| Box::new(convert_expr(e))),
        group_clause,
        having_clause: select.having.as_ref().map(|e| Box::new(convert_expr(e))),
        ..Default::default()
    })
}

fn convert_select_item(item: &SelectItem) -> Node {
    let target = match item {
        SelectItem::UnnamedExpr(expr) => ResTarget {
            name: None,
            val:  Some(Box::new(convert_expr(expr)))
        },
        SelectItem::ExprWithAlias {
            expr,
            alias,
            ..
        } => ResTarget {
            name: Some(ident_name(alias)),
            val:  Some(Box::new(convert_expr(expr)))
        },
        SelectItem::Wildcard(_) => ResTarget {
            name: None,
            val:  Some(Box::new(ColumnRef::new(["*"]).into()))
        },
        other => ResTarget {
            name: None,
            val:  Some(Box::new(Node::other("SelectItem", other.to_string())))
        }
    };
    Node::ResTarget(Box::new(target))
}
