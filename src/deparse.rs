//! Rendering node trees back into SQL text.
//!
//! [`Deparse`] is the rendering seam used by the truncation planner. Any
//! function `Fn(&[Node]) -> AppResult<String>` implements it, so callers can
//! plug in their own deparser; [`SqlDeparser`] is the built-in one for this
//! crate's node model.

use std::borrow::Cow;

use compact_str::CompactString;

use crate::{
    error::{AppResult, deparse_error},
    node::{
        AConst, AExpr, AExprKind, CommonTableExpr, DeleteFrom, FuncCall, InsertInto, JoinExpr,
        JoinType, Node, NullTestType, RangeVar, ResTarget, Select, SortDir, SubLink, SubLinkType,
        Update, WithClause
    }
};

/// Text the [`Node::Truncated`] marker renders as
pub const TRUNCATED_MARKER: &str = "...";

/// Keywords that cannot appear as a bare identifier
const RESERVED_KEYWORDS: &[&str] = &[
    "ALL", "ANALYSE", "ANALYZE", "AND", "ANY", "ARRAY", "AS", "ASC", "ASYMMETRIC",
    "AUTHORIZATION", "BINARY", "BOTH", "CASE", "CAST", "CHECK", "COLLATE", "COLLATION", "COLUMN",
    "CONCURRENTLY", "CONSTRAINT", "CREATE", "CROSS", "CURRENT_CATALOG", "CURRENT_DATE",
    "CURRENT_ROLE", "CURRENT_SCHEMA", "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER",
    "DEFAULT", "DEFERRABLE", "DESC", "DISTINCT", "DO", "ELSE", "END", "EXCEPT", "FALSE", "FETCH",
    "FOR", "FOREIGN", "FREEZE", "FROM", "FULL", "GRANT", "GROUP", "HAVING", "ILIKE", "IN",
    "INITIALLY", "INNER", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN", "LATERAL", "LEADING",
    "LEFT", "LIKE", "LIMIT", "LOCALTIME", "LOCALTIMESTAMP", "NATURAL", "NOT", "NOTNULL", "NULL",
    "OFFSET", "ON", "ONLY", "OR", "ORDER", "OUTER", "OVERLAPS", "PLACING", "PRIMARY",
    "REFERENCES", "RETURNING", "RIGHT", "SELECT", "SESSION_USER", "SIMILAR", "SOME", "SYMMETRIC",
    "SYSTEM_USER", "TABLE", "TABLESAMPLE", "THEN", "TO", "TRAILING", "TRUE", "UNION", "UNIQUE",
    "USER", "USING", "VARIADIC", "VERBOSE", "WHEN", "WHERE", "WINDOW", "WITH"
];

/// Renders a statement list (or an ad-hoc wrapper around a single clause)
/// into SQL text
pub trait Deparse {
    fn deparse(&self, statements: &[Node]) -> AppResult<String>;
}

impl<F> Deparse for F
where
    F: Fn(&[Node]) -> AppResult<String>
{
    fn deparse(&self, statements: &[Node]) -> AppResult<String> {
        self(statements)
    }
}

/// PostgreSQL-flavoured renderer for the node model
///
/// Statements are joined with `"; "`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlDeparser;

impl Deparse for SqlDeparser {
    fn deparse(&self, statements: &[Node]) -> AppResult<String> {
        deparse_list(statements, "; ")
    }
}

/// Render a single node
pub fn deparse_node(node: &Node) -> AppResult<String> {
    match node {
        Node::Select(select) => deparse_select(select),
        Node::Update(update) => deparse_update(update),
        Node::DeleteFrom(delete) => deparse_delete(delete),
        Node::InsertInto(insert) => deparse_insert(insert),
        Node::RangeVar(range_var) => Ok(deparse_range_var(range_var)),
        Node::RangeSubselect(sub) => {
            let mut out = String::new();
            if sub.lateral {
                out.push_str("LATERAL ");
            }
            out.push('(');
            out.push_str(&deparse_node(&sub.subquery)?);
            out.push(')');
            if let Some(alias) = &sub.alias {
                out.push(' ');
                out.push_str(&quote_ident(alias));
            }
            Ok(out)
        }
        Node::JoinExpr(join) => deparse_join(join),
        Node::WithClause(with) => deparse_with(with),
        Node::CommonTableExpr(cte) => deparse_cte(cte),
        Node::ResTarget(target) => deparse_res_target(target),
        Node::AExpr(expr) => deparse_a_expr(expr),
        Node::Row(row) => Ok(format!("({})", deparse_list(&row.args, ", ")?)),
        Node::NullTest(test) => {
            let arg = deparse_operand(&test.arg)?;
            Ok(match test.nulltesttype {
                NullTestType::IsNull => format!("{} IS NULL", arg),
                NullTestType::IsNotNull => format!("{} IS NOT NULL", arg)
            })
        }
        Node::FuncCall(call) => deparse_func_call(call),
        Node::SubLink(link) => deparse_sub_link(link),
        Node::ColumnRef(column) => {
            if column.fields.is_empty() {
                return Err(deparse_error("column reference without fields"));
            }
            let fields: Vec<_> = column
                .fields
                .iter()
                .map(|field| match field.as_str() {
                    "*" => Cow::Borrowed("*"),
                    name => quote_ident(name)
                })
                .collect();
            Ok(fields.join("."))
        }
        Node::AConst(value) => Ok(deparse_const(value)),
        Node::AStar => Ok("*".to_string()),
        Node::SortBy(sort) => {
            let mut out = deparse_node(&sort.node)?;
            match sort.dir {
                SortDir::Asc => out.push_str(" ASC"),
                SortDir::Desc => out.push_str(" DESC"),
                SortDir::Default => {}
            }
            match sort.nulls_first {
                Some(true) => out.push_str(" NULLS FIRST"),
                Some(false) => out.push_str(" NULLS LAST"),
                None => {}
            }
            Ok(out)
        }
        Node::Truncated => Ok(TRUNCATED_MARKER.to_string()),
        Node::Other(opaque) => opaque
            .sql
            .clone()
            .ok_or_else(|| deparse_error(format!("no SQL text for {} node", opaque.kind)))
    }
}

fn deparse_list(nodes: &[Node], separator: &str) -> AppResult<String> {
    let parts = nodes
        .iter()
        .map(deparse_node)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(parts.join(separator))
}

fn deparse_select(select: &Select) -> AppResult<String> {
    let mut parts = Vec::new();
    if let Some(with) = &select.with_clause {
        parts.push(deparse_node(with)?);
    }
    if select.is_set_operation() {
        let larg = select
            .larg
            .as_deref()
            .ok_or_else(|| deparse_error(format!("{} without left operand", select.op)))?;
        let rarg = select
            .rarg
            .as_deref()
            .ok_or_else(|| deparse_error(format!("{} without right operand", select.op)))?;
        parts.push(deparse_set_operand(larg)?);
        if select.all {
            parts.push(format!("{} ALL", select.op));
        } else {
            parts.push(select.op.to_string());
        }
        parts.push(deparse_set_operand(rarg)?);
    } else {
        match (select.distinct, select.distinct_clause.is_empty()) {
            (false, _) => parts.push("SELECT".to_string()),
            (true, true) => parts.push("SELECT DISTINCT".to_string()),
            (true, false) => parts.push(format!(
                "SELECT DISTINCT ON ({})",
                deparse_list(&select.distinct_clause, ", ")?
            ))
        }
        if !select.target_list.is_empty() {
            parts.push(deparse_list(&select.target_list, ", ")?);
        }
        if !select.from_clause.is_empty() {
            parts.push(format!("FROM {}", deparse_list(&select.from_clause, ", ")?));
        }
        if let Some(clause) = &select.where_clause {
            parts.push(format!("WHERE {}", deparse_node(clause)?));
        }
        if !select.group_clause.is_empty() {
            parts.push(format!(
                "GROUP BY {}",
                deparse_list(&select.group_clause, ", ")?
            ));
        }
        if let Some(having) = &select.having_clause {
            parts.push(format!("HAVING {}", deparse_node(having)?));
        }
    }
    if !select.sort_clause.is_empty() {
        parts.push(format!(
            "ORDER BY {}",
            deparse_list(&select.sort_clause, ", ")?
        ));
    }
    if let Some(limit) = &select.limit_count {
        parts.push(format!("LIMIT {}", deparse_node(limit)?));
    }
    if let Some(offset) = &select.limit_offset {
        parts.push(format!("OFFSET {}", deparse_node(offset)?));
    }
    Ok(parts.join(" "))
}

fn deparse_set_operand(node: &Node) -> AppResult<String> {
    let sql = deparse_node(node)?;
    let needs_parens = match node {
        Node::Select(select) => {
            select.is_set_operation()
                || select.with_clause.is_some()
                || !select.sort_clause.is_empty()
                || select.limit_count.is_some()
                || select.limit_offset.is_some()
        }
        _ => false
    };
    Ok(if needs_parens { format!("({})", sql) } else { sql })
}

fn deparse_update(update: &Update) -> AppResult<String> {
    let mut parts = vec![
        "UPDATE".to_string(),
        deparse_node(&update.relation)?,
        "SET".to_string()
    ];
    let assignments = update
        .target_list
        .iter()
        .map(|target| match target {
            Node::ResTarget(t) => match (&t.name, &t.val) {
                (Some(name), Some(val)) => {
                    Ok(format!("{} = {}", quote_ident(name), deparse_node(val)?))
                }
                _ => Err(deparse_error("SET item needs both a column and a value"))
            },
            other => deparse_node(other)
        })
        .collect::<AppResult<Vec<_>>>()?;
    parts.push(assignments.join(", "));
    if !update.from_clause.is_empty() {
        parts.push(format!("FROM {}", deparse_list(&update.from_clause, ", ")?));
    }
    if let Some(clause) = &update.where_clause {
        parts.push(format!("WHERE {}", deparse_node(clause)?));
    }
    Ok(parts.join(" "))
}

fn deparse_delete(delete: &DeleteFrom) -> AppResult<String> {
    let mut out = format!("DELETE FROM {}", deparse_node(&delete.relation)?);
    if let Some(clause) = &delete.where_clause {
        out.push_str(" WHERE ");
        out.push_str(&deparse_node(clause)?);
    }
    Ok(out)
}

fn deparse_insert(insert: &InsertInto) -> AppResult<String> {
    let mut out = format!("INSERT INTO {}", deparse_node(&insert.relation)?);
    if !insert.cols.is_empty() {
        out.push_str(&format!(" ({})", deparse_list(&insert.cols, ", ")?));
    }
    match &insert.select_stmt {
        Some(source) => {
            out.push(' ');
            out.push_str(&deparse_node(source)?);
        }
        None => out.push_str(" DEFAULT VALUES")
    }
    Ok(out)
}

fn deparse_range_var(range_var: &RangeVar) -> String {
    let mut out = String::new();
    if let Some(schema) = &range_var.schemaname {
        out.push_str(&quote_ident(schema));
        out.push('.');
    }
    out.push_str(&quote_ident(&range_var.relname));
    if let Some(alias) = &range_var.alias {
        out.push(' ');
        out.push_str(&quote_ident(alias));
    }
    out
}

fn deparse_join(join: &JoinExpr) -> AppResult<String> {
    let keyword = match join.jointype {
        JoinType::Inner => "JOIN",
        JoinType::Left => "LEFT JOIN",
        JoinType::Right => "RIGHT JOIN",
        JoinType::Full => "FULL JOIN",
        JoinType::Cross => "CROSS JOIN",
        JoinType::Semi => "SEMI JOIN",
        JoinType::LeftSemi => "LEFT SEMI JOIN",
        JoinType::RightSemi => "RIGHT SEMI JOIN",
        JoinType::Anti => "ANTI JOIN",
        JoinType::LeftAnti => "LEFT ANTI JOIN",
        JoinType::RightAnti => "RIGHT ANTI JOIN",
        JoinType::Straight => "STRAIGHT_JOIN"
    };
    let rarg = match join.rarg.as_ref() {
        Node::JoinExpr(_) => format!("({})", deparse_node(&join.rarg)?),
        other => deparse_node(other)?
    };
    let mut out = deparse_node(&join.larg)?;
    out.push(' ');
    if join.is_natural {
        out.push_str("NATURAL ");
    }
    out.push_str(keyword);
    out.push(' ');
    out.push_str(&rarg);
    if let Some(quals) = &join.quals {
        out.push_str(" ON ");
        out.push_str(&deparse_node(quals)?);
    } else if !join.using_clause.is_empty() {
        out.push_str(&format!(" USING ({})", quote_idents(&join.using_clause)));
    }
    Ok(out)
}

fn deparse_with(with: &WithClause) -> AppResult<String> {
    let keyword = if with.recursive { "WITH RECURSIVE" } else { "WITH" };
    Ok(format!("{} {}", keyword, deparse_list(&with.ctes, ", ")?))
}

fn deparse_cte(cte: &CommonTableExpr) -> AppResult<String> {
    let mut out = quote_ident(&cte.ctename).into_owned();
    if !cte.aliascolnames.is_empty() {
        out.push_str(&format!("({})", quote_idents(&cte.aliascolnames)));
    }
    out.push_str(&format!(" AS ({})", deparse_node(&cte.ctequery)?));
    Ok(out)
}

fn deparse_res_target(target: &ResTarget) -> AppResult<String> {
    match (&target.val, &target.name) {
        (Some(val), Some(name)) => Ok(format!("{} AS {}", deparse_node(val)?, quote_ident(name))),
        (Some(val), None) => deparse_node(val),
        (None, Some(name)) => Ok(quote_ident(name).into_owned()),
        (None, None) => Err(deparse_error("target without name or value"))
    }
}

fn deparse_a_expr(expr: &AExpr) -> AppResult<String> {
    match expr.kind {
        AExprKind::Op => match (&expr.lexpr, &expr.rexpr) {
            (Some(l), Some(r)) => Ok(format!(
                "{} {} {}",
                deparse_operand(l)?,
                expr.name,
                deparse_operand(r)?
            )),
            (None, Some(r)) => Ok(format!("{} {}", expr.name, deparse_operand(r)?)),
            (Some(l), None) => Ok(format!("{} {}", deparse_operand(l)?, expr.name)),
            (None, None) => Err(deparse_error(format!(
                "operator {} without operands",
                expr.name
            )))
        },
        AExprKind::Any | AExprKind::All => {
            let quantifier = if expr.kind == AExprKind::Any { "ANY" } else { "ALL" };
            Ok(format!(
                "{} {} {}({})",
                deparse_operand(operand(&expr.lexpr, expr.kind, "left")?)?,
                expr.name,
                quantifier,
                deparse_node(operand(&expr.rexpr, expr.kind, "right")?)?
            ))
        }
        AExprKind::And | AExprKind::Or => {
            let keyword = if expr.kind == AExprKind::And { "AND" } else { "OR" };
            Ok(format!(
                "{} {} {}",
                deparse_bool_operand(operand(&expr.lexpr, expr.kind, "left")?, expr.kind)?,
                keyword,
                deparse_bool_operand(operand(&expr.rexpr, expr.kind, "right")?, expr.kind)?
            ))
        }
        AExprKind::Not => Ok(format!(
            "NOT {}",
            deparse_bool_operand(operand(&expr.rexpr, expr.kind, "right")?, expr.kind)?
        )),
        AExprKind::In | AExprKind::NotIn => {
            let keyword = if expr.kind == AExprKind::In { "IN" } else { "NOT IN" };
            let list = operand(&expr.rexpr, expr.kind, "right")?;
            let rendered = match list {
                Node::Row(_) => deparse_node(list)?,
                other => format!("({})", deparse_node(other)?)
            };
            Ok(format!(
                "{} {} {}",
                deparse_operand(operand(&expr.lexpr, expr.kind, "left")?)?,
                keyword,
                rendered
            ))
        }
        AExprKind::Between | AExprKind::NotBetween => {
            let keyword = if expr.kind == AExprKind::Between {
                "BETWEEN"
            } else {
                "NOT BETWEEN"
            };
            let bounds = match operand(&expr.rexpr, expr.kind, "right")? {
                Node::Row(row) if row.args.len() == 2 => format!(
                    "{} AND {}",
                    deparse_operand(&row.args[0])?,
                    deparse_operand(&row.args[1])?
                ),
                other => deparse_node(other)?
            };
            Ok(format!(
                "{} {} {}",
                deparse_operand(operand(&expr.lexpr, expr.kind, "left")?)?,
                keyword,
                bounds
            ))
        }
    }
}

fn operand<'a>(node: &'a Option<Box<Node>>, kind: AExprKind, which: &str) -> AppResult<&'a Node> {
    node.as_deref()
        .ok_or_else(|| deparse_error(format!("{:?} expression without {} operand", kind, which)))
}

/// Operand of a comparison or arithmetic operator; nested operator
/// expressions get parentheses
fn deparse_operand(node: &Node) -> AppResult<String> {
    let sql = deparse_node(node)?;
    Ok(match node {
        Node::AExpr(_) => format!("({})", sql),
        _ => sql
    })
}

fn deparse_bool_operand(node: &Node, parent: AExprKind) -> AppResult<String> {
    let sql = deparse_node(node)?;
    let needs_parens = match node {
        Node::AExpr(child) => match parent {
            AExprKind::And => child.kind == AExprKind::Or,
            AExprKind::Or => child.kind == AExprKind::And,
            _ => matches!(child.kind, AExprKind::And | AExprKind::Or)
        },
        _ => false
    };
    Ok(if needs_parens { format!("({})", sql) } else { sql })
}

fn deparse_func_call(call: &FuncCall) -> AppResult<String> {
    let args = if call.agg_star {
        "*".to_string()
    } else {
        deparse_list(&call.args, ", ")?
    };
    let distinct = if call.agg_distinct { "DISTINCT " } else { "" };
    let mut out = format!("{}({}{}", call.funcname, distinct, args);
    if call.agg_order.is_empty() {
        out.push(')');
    } else {
        let order = deparse_list(&call.agg_order, ", ")?;
        if call.agg_within_group {
            out.push_str(&format!(") WITHIN GROUP (ORDER BY {})", order));
        } else {
            if !args.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("ORDER BY {})", order));
        }
    }
    if let Some(filter) = &call.agg_filter {
        out.push_str(&format!(" FILTER (WHERE {})", deparse_node(filter)?));
    }
    Ok(out)
}

fn deparse_sub_link(link: &SubLink) -> AppResult<String> {
    let subselect = deparse_node(&link.subselect)?;
    let testexpr = || {
        let test = link.testexpr.as_deref().ok_or_else(|| {
            deparse_error(format!(
                "{:?} sublink without test expression",
                link.sub_link_type
            ))
        })?;
        deparse_operand(test)
    };
    match link.sub_link_type {
        SubLinkType::Exists => Ok(format!("EXISTS ({})", subselect)),
        SubLinkType::Expr => Ok(format!("({})", subselect)),
        SubLinkType::Array => Ok(format!("ARRAY({})", subselect)),
        SubLinkType::Any => match link.oper_name.as_deref() {
            None | Some("=") => Ok(format!("{} IN ({})", testexpr()?, subselect)),
            Some(op) => Ok(format!("{} {} ANY ({})", testexpr()?, op, subselect))
        },
        SubLinkType::All => {
            let op = link.oper_name.as_deref().unwrap_or("=");
            Ok(format!("{} {} ALL ({})", testexpr()?, op, subselect))
        }
    }
}

fn deparse_const(value: &AConst) -> String {
    match value {
        AConst::Number(n) => n.to_string(),
        AConst::String(s) => format!("'{}'", s.replace('\'', "''")),
        AConst::Boolean(true) => "true".to_string(),
        AConst::Boolean(false) => "false".to_string(),
        AConst::Null => "NULL".to_string(),
        AConst::Param(p) => p.to_string()
    }
}

/// Identifier as it must be written to keep its exact spelling
fn quote_ident(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        && !RESERVED_KEYWORDS
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(name));
    if plain {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

fn quote_idents(names: &[CompactString]) -> String {
    names
        .iter()
        .map(|name| quote_ident(name))
        .collect::<Vec<_>>()
        .join(", ")
}
