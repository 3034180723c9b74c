use sqlparser::ast::{JoinConstraint, JoinOperator, ObjectName, TableFactor, TableWithJoins};

use super::{
    expr::{convert_expr, ident_name},
    set_expr::convert_query
};
use crate::node::{JoinExpr, JoinType, Node, RangeSubselect, RangeVar};

/// Relation reference from a one or two part name, `None` for anything longer
/// or for parts that are not plain identifiers
pub fn range_var(name: &ObjectName) -> Option<RangeVar> {
    let parts = name
        .0
        .iter()
        .map(|part| part.as_ident().map(ident_name))
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [relname] => Some(RangeVar::new(relname.clone())),
        [schemaname, relname] => Some(RangeVar {
            schemaname: Some(schemaname.clone()),
            relname:    relname.clone(),
            alias:      None
        }),
        _ => None
    }
}

/// FROM item with its joins folded into a left-deep join tree.
///
/// A join the node model cannot express turns the whole item into
/// [`Node::Other`].
pub fn convert_table_with_joins(table: &TableWithJoins) -> Node {
    let mut node = convert_table_factor(&table.relation);
    for join in &table.joins {
        let Some((jointype, constraint)) = join_kind(&join.join_operator).filter(|_| !join.global)
        else {
            return Node::other("TableFactor", table.to_string());
        };
        let mut expr = JoinExpr {
            jointype,
            is_natural: false,
            larg: Box::new(node),
            rarg: Box::new(convert_table_factor(&join.relation)),
            using_clause: Vec::new(),
            quals: None
        };
        match constraint {
            JoinConstraint::On(on) => {
                expr.quals = Some(Box::new(convert_expr(on)));
            }
            JoinConstraint::Using(names) => {
                let using = names
                    .iter()
                    .map(|name| match name.0.as_slice() {
                        [part] => part.as_ident().map(ident_name),
                        _ => None
                    })
                    .collect::<Option<Vec<_>>>();
                match using {
                    Some(using) => expr.using_clause = using,
                    None => return Node::other("TableFactor", table.to_string())
                }
            }
            JoinConstraint::Natural => expr.is_natural = true,
            JoinConstraint::None => {}
        }
        node = Node::JoinExpr(Box::new(expr));
    }
    node
}

fn join_kind(operator: &JoinOperator) -> Option<(JoinType, &JoinConstraint)> {
    let kind = match operator {
        JoinOperator::Join(constraint) | JoinOperator::Inner(constraint) => {
            (JoinType::Inner, constraint)
        }
        JoinOperator::Left(constraint) | JoinOperator::LeftOuter(constraint) => {
            (JoinType::Left, constraint)
        }
        JoinOperator::Right(constraint) | JoinOperator::RightOuter(constraint) => {
            (JoinType::Right, constraint)
        }
        JoinOperator::FullOuter(constraint) => (JoinType::Full, constraint),
        JoinOperator::CrossJoin(constraint) => (JoinType::Cross, constraint),
        JoinOperator::Semi(constraint) => (JoinType::Semi, constraint),
        JoinOperator::LeftSemi(constraint) => (JoinType::LeftSemi, constraint),
        JoinOperator::RightSemi(constraint) => (JoinType::RightSemi, constraint),
        JoinOperator::Anti(constraint) => (JoinType::Anti, constraint),
        JoinOperator::LeftAnti(constraint) => (JoinType::LeftAnti, constraint),
        JoinOperator::RightAnti(constraint) => (JoinType::RightAnti, constraint),
        JoinOperator::StraightJoin(constraint) => (JoinType::Straight, constraint),
        JoinOperator::CrossApply | JoinOperator::OuterApply | JoinOperator::AsOf {
            ..
        } => return None
    };
    Some(kind)
}

pub fn convert_table_factor(factor: &TableFactor) -> Node {
    let unmodelled = || Node::other("TableFactor", factor.to_string());
    match factor {
        TableFactor::Table {
            name,
            alias,
            args: None,
            with_hints,
            version: None,
            with_ordinality: false,
            partitions,
            json_path: None,
            sample: None,
            index_hints
        } if with_hints.is_empty() && partitions.is_empty() && index_hints.is_empty() => {
            if alias.as_ref().is_some_and(|a| !a.columns.is_empty()) {
                return unmodelled();
            }
            match range_var(name) {
                Some(mut relation) => {
                    relation.alias = alias.as_ref().map(|a| ident_name(&a.name));
                    relation.into()
                }
                None => unmodelled()
            }
        }
        TableFactor::Derived {
            lateral,
            subquery,
            alias
        } if alias.as_ref().is_none_or(|a| a.columns.is_empty()) => {
            Node::RangeSubselect(Box::new(RangeSubselect {
                lateral:  *lateral,
                subquery: Box::new(convert_query(subquery)),
                alias:    alias.as_ref().map(|a| ident_name(&a.name))
            }))
        }
        TableFactor::NestedJoin {
            table_with_joins,
            alias: None
        } => convert_table_with_joins(table_with_joins),
        _ => unmodelled()
    }
}
