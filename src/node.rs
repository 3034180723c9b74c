//! Tagged AST node model walked by the extractor and the truncation planner.
//!
//! Every [`Node`] carries exactly one kind. Each kind exposes a fixed set of
//! named child slots ([`Slot`]), each holding nothing, a single node, or a
//! sequence of nodes. Traversal code goes through [`Node::children`] and
//! [`Node::slot_mut`] so it never has to know every kind's field layout.
//!
//! Kinds the model does not describe end up in [`Node::Other`]; walkers
//! treat them as leaves.

mod path;
mod types;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
pub use path::{LocationPath, Replacement, Step};
pub use types::{
    AConst, AExpr, AExprKind, ColumnRef, CommonTableExpr, DeleteFrom, FuncCall, InsertInto,
    JoinExpr, JoinType, NullTest, NullTestType, Opaque, RangeSubselect, RangeVar, ResTarget, Row,
    Select, SetOp, SortBy, SortDir, SubLink, SubLinkType, Update, WithClause
};

/// AST node, one variant per kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Select(Box<Select>),
    Update(Box<Update>),
    DeleteFrom(Box<DeleteFrom>),
    InsertInto(Box<InsertInto>),
    RangeVar(RangeVar),
    RangeSubselect(Box<RangeSubselect>),
    JoinExpr(Box<JoinExpr>),
    WithClause(WithClause),
    CommonTableExpr(Box<CommonTableExpr>),
    ResTarget(Box<ResTarget>),
    AExpr(Box<AExpr>),
    Row(Row),
    NullTest(Box<NullTest>),
    FuncCall(FuncCall),
    SubLink(Box<SubLink>),
    ColumnRef(ColumnRef),
    AConst(AConst),
    AStar,
    SortBy(Box<SortBy>),
    /// Placeholder substituted for an omitted subtree
    Truncated,
    Other(Opaque)
}

/// Named child slot of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    DistinctClause,
    TargetList,
    FromClause,
    WhereClause,
    GroupClause,
    HavingClause,
    SortClause,
    LimitCount,
    LimitOffset,
    WithClause,
    Larg,
    Rarg,
    Relation,
    Cols,
    SelectStmt,
    Subquery,
    Quals,
    Ctes,
    Ctequery,
    Val,
    Lexpr,
    Rexpr,
    Args,
    AggOrder,
    AggFilter,
    Arg,
    Testexpr,
    Subselect,
    Node
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DistinctClause => "distinctClause",
            Self::TargetList => "targetList",
            Self::FromClause => "fromClause",
            Self::WhereClause => "whereClause",
            Self::GroupClause => "groupClause",
            Self::HavingClause => "havingClause",
            Self::SortClause => "sortClause",
            Self::LimitCount => "limitCount",
            Self::LimitOffset => "limitOffset",
            Self::WithClause => "withClause",
            Self::Larg => "larg",
            Self::Rarg => "rarg",
            Self::Relation => "relation",
            Self::Cols => "cols",
            Self::SelectStmt => "selectStmt",
            Self::Subquery => "subquery",
            Self::Quals => "quals",
            Self::Ctes => "ctes",
            Self::Ctequery => "ctequery",
            Self::Val => "val",
            Self::Lexpr => "lexpr",
            Self::Rexpr => "rexpr",
            Self::Args => "args",
            Self::AggOrder => "aggOrder",
            Self::AggFilter => "aggFilter",
            Self::Arg => "arg",
            Self::Testexpr => "testexpr",
            Self::Subselect => "subselect",
            Self::Node => "node"
        };
        f.write_str(name)
    }
}

/// Read-only view of a present child slot
#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    One(&'a Node),
    Many(&'a [Node])
}

/// Mutable view of a child slot, shaped like the field backing it
#[derive(Debug)]
pub enum SlotMut<'a> {
    One(&'a mut Node),
    Optional(&'a mut Option<Box<Node>>),
    Many(&'a mut Vec<Node>)
}

/// Child list of a single node; nodes rarely have more than eight slots
pub type Children<'a> = SmallVec<[(Slot, Child<'a>); 8]>;

struct ChildrenBuilder<'a> {
    out: Children<'a>
}

impl<'a> ChildrenBuilder<'a> {
    fn one(&mut self, slot: Slot, node: &'a Node) -> &mut Self {
        self.out.push((slot, Child::One(node)));
        self
    }

    fn opt(&mut self, slot: Slot, node: &'a Option<Box<Node>>) -> &mut Self {
        if let Some(node) = node {
            self.out.push((slot, Child::One(node)));
        }
        self
    }

    fn many(&mut self, slot: Slot, nodes: &'a [Node]) -> &mut Self {
        if !nodes.is_empty() {
            self.out.push((slot, Child::Many(nodes)));
        }
        self
    }
}

impl Node {
    /// Kind tag of this node
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Select(_) => "Select",
            Self::Update(_) => "Update",
            Self::DeleteFrom(_) => "DeleteFrom",
            Self::InsertInto(_) => "InsertInto",
            Self::RangeVar(_) => "RangeVar",
            Self::RangeSubselect(_) => "RangeSubselect",
            Self::JoinExpr(_) => "JoinExpr",
            Self::WithClause(_) => "WithClause",
            Self::CommonTableExpr(_) => "CommonTableExpr",
            Self::ResTarget(_) => "ResTarget",
            Self::AExpr(_) => "AExpr",
            Self::Row(_) => "Row",
            Self::NullTest(_) => "NullTest",
            Self::FuncCall(_) => "FuncCall",
            Self::SubLink(_) => "SubLink",
            Self::ColumnRef(_) => "ColumnRef",
            Self::AConst(_) => "AConst",
            Self::AStar => "AStar",
            Self::SortBy(_) => "SortBy",
            Self::Truncated => "Truncated",
            Self::Other(opaque) => opaque.kind.as_str()
        }
    }

    /// Opaque node carrying the SQL text of an unmodelled construct
    pub fn other(kind: &str, sql: impl Into<String>) -> Self {
        Self::Other(Opaque {
            kind: kind.into(),
            sql:  Some(sql.into())
        })
    }

    /// Present child slots, in rendering order
    pub fn children(&self) -> Children<'_> {
        let mut b = ChildrenBuilder {
            out: Children::new()
        };
        match self {
            Self::Select(s) => {
                b.opt(Slot::WithClause, &s.with_clause)
                    .many(Slot::DistinctClause, &s.distinct_clause)
                    .many(Slot::TargetList, &s.target_list)
                    .many(Slot::FromClause, &s.from_clause)
                    .opt(Slot::WhereClause, &s.where_clause)
                    .many(Slot::GroupClause, &s.group_clause)
                    .opt(Slot::HavingClause, &s.having_clause)
                    .opt(Slot::Larg, &s.larg)
                    .opt(Slot::Rarg, &s.rarg)
                    .many(Slot::SortClause, &s.sort_clause)
                    .opt(Slot::LimitCount, &s.limit_count)
                    .opt(Slot::LimitOffset, &s.limit_offset);
            }
            Self::Update(u) => {
                b.one(Slot::Relation, &u.relation)
                    .many(Slot::TargetList, &u.target_list)
                    .many(Slot::FromClause, &u.from_clause)
                    .opt(Slot::WhereClause, &u.where_clause);
            }
            Self::DeleteFrom(d) => {
                b.one(Slot::Relation, &d.relation)
                    .opt(Slot::WhereClause, &d.where_clause);
            }
            Self::InsertInto(i) => {
                b.one(Slot::Relation, &i.relation)
                    .many(Slot::Cols, &i.cols)
                    .opt(Slot::SelectStmt, &i.select_stmt);
            }
            Self::RangeSubselect(r) => {
                b.one(Slot::Subquery, &r.subquery);
            }
            Self::JoinExpr(j) => {
                b.one(Slot::Larg, &j.larg)
                    .one(Slot::Rarg, &j.rarg)
                    .opt(Slot::Quals, &j.quals);
            }
            Self::WithClause(w) => {
                b.many(Slot::Ctes, &w.ctes);
            }
            Self::CommonTableExpr(c) => {
                b.one(Slot::Ctequery, &c.ctequery);
            }
            Self::ResTarget(t) => {
                b.opt(Slot::Val, &t.val);
            }
            Self::AExpr(e) => {
                b.opt(Slot::Lexpr, &e.lexpr).opt(Slot::Rexpr, &e.rexpr);
            }
            Self::Row(r) => {
                b.many(Slot::Args, &r.args);
            }
            Self::NullTest(t) => {
                b.one(Slot::Arg, &t.arg);
            }
            Self::FuncCall(f) => {
                b.many(Slot::Args, &f.args)
                    .many(Slot::AggOrder, &f.agg_order)
                    .opt(Slot::AggFilter, &f.agg_filter);
            }
            Self::SubLink(l) => {
                b.opt(Slot::Testexpr, &l.testexpr)
                    .one(Slot::Subselect, &l.subselect);
            }
            Self::SortBy(s) => {
                b.one(Slot::Node, &s.node);
            }
            Self::RangeVar(_)
            | Self::ColumnRef(_)
            | Self::AConst(_)
            | Self::AStar
            | Self::Truncated
            | Self::Other(_) => {}
        }
        b.out
    }

    /// Present child in `slot`, if any
    pub fn child(&self, slot: Slot) -> Option<Child<'_>> {
        self.children()
            .into_iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, child)| child)
    }

    /// Mutable access to `slot`, present or not, if this kind has it
    pub fn slot_mut(&mut self, slot: Slot) -> Option<SlotMut<'_>> {
        let found = match (self, slot) {
            (Self::Select(s), Slot::WithClause) => SlotMut::Optional(&mut s.with_clause),
            (Self::Select(s), Slot::DistinctClause) => SlotMut::Many(&mut s.distinct_clause),
            (Self::Select(s), Slot::TargetList) => SlotMut::Many(&mut s.target_list),
            (Self::Select(s), Slot::FromClause) => SlotMut::Many(&mut s.from_clause),
            (Self::Select(s), Slot::WhereClause) => SlotMut::Optional(&mut s.where_clause),
            (Self::Select(s), Slot::GroupClause) => SlotMut::Many(&mut s.group_clause),
            (Self::Select(s), Slot::HavingClause) => SlotMut::Optional(&mut s.having_clause),
            (Self::Select(s), Slot::Larg) => SlotMut::Optional(&mut s.larg),
            (Self::Select(s), Slot::Rarg) => SlotMut::Optional(&mut s.rarg),
            (Self::Select(s), Slot::SortClause) => SlotMut::Many(&mut s.sort_clause),
            (Self::Select(s), Slot::LimitCount) => SlotMut::Optional(&mut s.limit_count),
            (Self::Select(s), Slot::LimitOffset) => SlotMut::Optional(&mut s.limit_offset),
            (Self::Update(u), Slot::Relation) => SlotMut::One(u.relation.as_mut()),
            (Self::Update(u), Slot::TargetList) => SlotMut::Many(&mut u.target_list),
            (Self::Update(u), Slot::FromClause) => SlotMut::Many(&mut u.from_clause),
            (Self::Update(u), Slot::WhereClause) => SlotMut::Optional(&mut u.where_clause),
            (Self::DeleteFrom(d), Slot::Relation) => SlotMut::One(d.relation.as_mut()),
            (Self::DeleteFrom(d), Slot::WhereClause) => SlotMut::Optional(&mut d.where_clause),
            (Self::InsertInto(i), Slot::Relation) => SlotMut::One(i.relation.as_mut()),
            (Self::InsertInto(i), Slot::Cols) => SlotMut::Many(&mut i.cols),
            (Self::InsertInto(i), Slot::SelectStmt) => SlotMut::Optional(&mut i.select_stmt),
            (Self::RangeSubselect(r), Slot::Subquery) => SlotMut::One(r.subquery.as_mut()),
            (Self::JoinExpr(j), Slot::Larg) => SlotMut::One(j.larg.as_mut()),
            (Self::JoinExpr(j), Slot::Rarg) => SlotMut::One(j.rarg.as_mut()),
            (Self::JoinExpr(j), Slot::Quals) => SlotMut::Optional(&mut j.quals),
            (Self::WithClause(w), Slot::Ctes) => SlotMut::Many(&mut w.ctes),
            (Self::CommonTableExpr(c), Slot::Ctequery) => SlotMut::One(c.ctequery.as_mut()),
            (Self::ResTarget(t), Slot::Val) => SlotMut::Optional(&mut t.val),
            (Self::AExpr(e), Slot::Lexpr) => SlotMut::Optional(&mut e.lexpr),
            (Self::AExpr(e), Slot::Rexpr) => SlotMut::Optional(&mut e.rexpr),
            (Self::Row(r), Slot::Args) => SlotMut::Many(&mut r.args),
            (Self::NullTest(t), Slot::Arg) => SlotMut::One(t.arg.as_mut()),
            (Self::FuncCall(f), Slot::Args) => SlotMut::Many(&mut f.args),
            (Self::FuncCall(f), Slot::AggOrder) => SlotMut::Many(&mut f.agg_order),
            (Self::FuncCall(f), Slot::AggFilter) => SlotMut::Optional(&mut f.agg_filter),
            (Self::SubLink(l), Slot::Testexpr) => SlotMut::Optional(&mut l.testexpr),
            (Self::SubLink(l), Slot::Subselect) => SlotMut::One(l.subselect.as_mut()),
            (Self::SortBy(s), Slot::Node) => SlotMut::One(s.node.as_mut()),
            _ => return None
        };
        Some(found)
    }

    /// Mutable child node addressed by one path step
    pub fn child_mut(&mut self, slot: Slot, index: Option<usize>) -> Option<&mut Node> {
        match (self.slot_mut(slot)?, index) {
            (SlotMut::One(node), None) => Some(node),
            (SlotMut::Optional(node), None) => node.as_deref_mut(),
            (SlotMut::Many(nodes), Some(i)) => nodes.get_mut(i),
            _ => None
        }
    }

    /// Pre-order walk over this node and every descendant
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            visit(node);
            for (_, child) in node.children().into_iter().rev() {
                match child {
                    Child::One(n) => stack.push(n),
                    Child::Many(nodes) => stack.extend(nodes.iter().rev())
                }
            }
        }
    }
}

impl From<Select> for Node {
    fn from(select: Select) -> Self {
        Self::Select(Box::new(select))
    }
}

impl From<ColumnRef> for Node {
    fn from(column: ColumnRef) -> Self {
        Self::ColumnRef(column)
    }
}

impl From<AExpr> for Node {
    fn from(expr: AExpr) -> Self {
        Self::AExpr(Box::new(expr))
    }
}

impl From<RangeVar> for Node {
    fn from(range_var: RangeVar) -> Self {
        Self::RangeVar(range_var)
    }
}

impl From<AConst> for Node {
    fn from(value: AConst) -> Self {
        Self::AConst(value)
    }
}
