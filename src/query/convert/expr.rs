use compact_str::CompactString;
use sqlparser::ast::{
    BinaryOperator, DuplicateTreatment, Expr, Function, FunctionArg, FunctionArgExpr,
    FunctionArgumentClause, FunctionArguments, Ident, OrderByExpr, UnaryOperator, Value
};

use super::set_expr::convert_query;
use crate::node::{
    AConst, AExpr, AExprKind, ColumnRef, FuncCall, Node, NullTest, NullTestType, Row, SortBy,
    SortDir, SubLink, SubLinkType
};

/// Identifier as the server sees it: unquoted names fold to lower case
pub fn ident_name(ident: &Ident) -> CompactString {
    match ident.quote_style {
        None => ident.value.to_lowercase().into(),
        Some(_) => ident.value.as_str().into()
    }
}

pub fn convert_expr(expr: &Expr) -> Node {
    match expr {
        Expr::Identifier(ident) => ColumnRef::new([ident_name(ident)]).into(),
        Expr::CompoundIdentifier(idents) => ColumnRef::new(idents.iter().map(ident_name)).into(),
        Expr::BinaryOp {
            left,
            op,
            right,
            ..
        } => {
            let (lexpr, rexpr) = (convert_expr(left), convert_expr(right));
            match op {
                BinaryOperator::And => AExpr::boolean(AExprKind::And, lexpr, rexpr).into(),
                BinaryOperator::Or => AExpr::boolean(AExprKind::Or, lexpr, rexpr).into(),
                other => AExpr::op(other.to_string(), lexpr, rexpr).into()
            }
        }
        Expr::UnaryOp {
            op,
            expr: operand,
            ..
        } => {
            let (kind, name) = match op {
                UnaryOperator::Not => (AExprKind::Not, String::new()),
                other => (AExprKind::Op, other.to_string())
            };
            AExpr {
                kind,
                name: name.into(),
                lexpr: None,
                rexpr: Some(Box::new(convert_expr(operand)))
            }
            .into()
        }
        Expr::Nested(inner) => convert_expr(inner),
        Expr::IsNull(arg) => null_test(arg, NullTestType::IsNull),
        Expr::IsNotNull(arg) => null_test(arg, NullTestType::IsNotNull),
        Expr::InList {
            expr: lhs,
            list,
            negated,
            ..
        } => AExpr {
            kind:  if *negated { AExprKind::NotIn } else { AExprKind::In },
            name:  "=".into(),
            lexpr: Some(Box::new(convert_expr(lhs))),
            rexpr: Some(Box::new(row(list)))
        }
        .into(),
        Expr::Between {
            expr: lhs,
            negated,
            low,
            high,
            ..
        } => AExpr {
            kind:  if *negated {
                AExprKind::NotBetween
            } else {
                AExprKind::Between
            },
            name:  "BETWEEN".into(),
            lexpr: Some(Box::new(convert_expr(lhs))),
            rexpr: Some(Box::new(Node::Row(Row {
                args: vec![convert_expr(low), convert_expr(high)]
            })))
        }
        .into(),
        Expr::Like {
            negated,
            any: false,
            expr: lhs,
            pattern,
            escape_char: None
        } => pattern_match("LIKE", *negated, lhs, pattern),
        Expr::ILike {
            negated,
            any: false,
            expr: lhs,
            pattern,
            escape_char: None
        } => pattern_match("ILIKE", *negated, lhs, pattern),
        Expr::InSubquery {
            expr: lhs,
            subquery,
            negated,
            ..
        } => negate(
            *negated,
            Node::SubLink(Box::new(SubLink {
                sub_link_type: SubLinkType::Any,
                oper_name:     None,
                testexpr:      Some(Box::new(convert_expr(lhs))),
                subselect:     Box::new(convert_query(subquery))
            }))
        ),
        Expr::Exists {
            subquery,
            negated,
            ..
        } => negate(
            *negated,
            Node::SubLink(Box::new(SubLink {
                sub_link_type: SubLinkType::Exists,
                oper_name:     None,
                testexpr:      None,
                subselect:     Box::new(convert_query(subquery))
            }))
        ),
        Expr::Subquery(query) => Node::SubLink(Box::new(SubLink {
            sub_link_type: SubLinkType::Expr,
            oper_name:     None,
            testexpr:      None,
            subselect:     Box::new(convert_query(query))
        })),
        Expr::AnyOp {
            left,
            compare_op,
            right,
            ..
        } => quantified(SubLinkType::Any, left, compare_op, right),
        Expr::AllOp {
            left,
            compare_op,
            right,
            ..
        } => quantified(SubLinkType::All, left, compare_op, right),
        Expr::Tuple(items) => row(items),
        Expr::Function(func) => convert_function(expr, func),
        Expr::Value(val) => match &val.value {
            Value::Number(n, _) => AConst::Number(n.as_str().into()).into(),
            Value::SingleQuotedString(s) => AConst::String(s.clone()).into(),
            Value::Boolean(b) => AConst::Boolean(*b).into(),
            Value::Null => AConst::Null.into(),
            Value::Placeholder(p) => AConst::Param(p.as_str().into()).into(),
            _ => Node::other("Value", expr.to_string())
        },
        _ => Node::other("Expr", expr.to_string())
    }
}

/// Calls carrying OVER, parameters, null treatment or clauses other than
/// ORDER BY keep their SQL text
fn convert_function(expr: &Expr, func: &Function) -> Node {
    let unmodelled = || Node::other("Function", expr.to_string());
    let FunctionArguments::List(arg_list) = &func.args else {
        return unmodelled();
    };
    if func.over.is_some()
        || func.uses_odbc_syntax
        || func.null_treatment.is_some()
        || !matches!(func.parameters, FunctionArguments::None)
        || matches!(arg_list.duplicate_treatment, Some(DuplicateTreatment::All))
    {
        return unmodelled();
    }

    let mut call = FuncCall {
        funcname: func.name.to_string().into(),
        agg_distinct: matches!(
            arg_list.duplicate_treatment,
            Some(DuplicateTreatment::Distinct)
        ),
        agg_filter: func.filter.as_deref().map(|f| Box::new(convert_expr(f))),
        ..Default::default()
    };
    for clause in &arg_list.clauses {
        match clause {
            FunctionArgumentClause::OrderBy(exprs) => {
                call.agg_order.extend(exprs.iter().map(convert_sort_by))
            }
            _ => return unmodelled()
        }
    }
    if !func.within_group.is_empty() {
        if !call.agg_order.is_empty() {
            return unmodelled();
        }
        call.agg_order = func.within_group.iter().map(convert_sort_by).collect();
        call.agg_within_group = true;
    }
    for arg in &arg_list.args {
        match arg {
            FunctionArg::Unnamed(FunctionArgExpr::Expr(e)) => call.args.push(convert_expr(e)),
            FunctionArg::Unnamed(FunctionArgExpr::Wildcard) => call.agg_star = true,
            other => call.args.push(Node::other("FunctionArg", other.to_string()))
        }
    }
    Node::FuncCall(call)
}

/// One ORDER BY item; `WITH FILL` items keep their SQL text
pub fn convert_sort_by(expr: &OrderByExpr) -> Node {
    if expr.with_fill.is_some() {
        return Node::other("OrderByExpr", expr.to_string());
    }
    let dir = match expr.options.asc {
        Some(true) => SortDir::Asc,
        Some(false) => SortDir::Desc,
        None => SortDir::Default
    };
    Node::SortBy(Box::new(SortBy {
        node: Box::new(convert_expr(&expr.expr)),
        dir,
        nulls_first: expr.options.nulls_first
    }))
}

fn null_test(arg: &Expr, nulltesttype: NullTestType) -> Node {
    Node::NullTest(Box::new(NullTest {
        arg: Box::new(convert_expr(arg)),
        nulltesttype
    }))
}

fn row(items: &[Expr]) -> Node {
    Node::Row(Row {
        args: items.iter().map(convert_expr).collect()
    })
}

fn negate(negated: bool, node: Node) -> Node {
    if !negated {
        return node;
    }
    AExpr {
        kind:  AExprKind::Not,
        name:  Default::default(),
        lexpr: None,
        rexpr: Some(Box::new(node))
    }
    .into()
}

fn pattern_match(keyword: &str, negated: bool, lhs: &Expr, pattern: &Expr) -> Node {
    let name = if negated {
        format!("NOT {}", keyword)
    } else {
        keyword.to_string()
    };
    AExpr::op(name, convert_expr(lhs), convert_expr(pattern)).into()
}

/// `x op ANY (subquery)` becomes a sublink, `x op ANY (array)` an operator
/// expression
fn quantified(kind: SubLinkType, left: &Expr, compare_op: &BinaryOperator, right: &Expr) -> Node {
    let op = compare_op.to_string();
    if let Expr::Subquery(query) = right {
        return Node::SubLink(Box::new(SubLink {
            sub_link_type: kind,
            oper_name:     Some(op.into()),
            testexpr:      Some(Box::new(convert_expr(left))),
            subselect:     Box::new(convert_query(query))
        }));
    }
    let expr_kind = if kind == SubLinkType::All {
        AExprKind::All
    } else {
        AExprKind::Any
    };
    AExpr {
        kind:  expr_kind,
        name:  op.into(),
        lexpr: Some(Box::new(convert_expr(left))),
        rexpr: Some(Box::new(convert_expr(right)))
    }
    .into()
}
