use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::Node;

/// Set operation joining the two arms of a [`Select`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    /// Plain select; `fromClause`/`whereClause`/`withClause` are meaningful
    #[default]
    None,
    Union,
    Intersect,
    Except
}

impl std::fmt::Display for SetOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Union => write!(f, "UNION"),
            Self::Intersect => write!(f, "INTERSECT"),
            Self::Except => write!(f, "EXCEPT")
        }
    }
}

/// SELECT statement, either plain or a set operation over `larg`/`rarg`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Select {
    pub op:              SetOp,
    pub all:             bool,
    pub distinct:        bool,
    /// `DISTINCT ON` expressions; only meaningful when `distinct` is set
    pub distinct_clause: Vec<Node>,
    pub target_list:     Vec<Node>,
    pub from_clause:     Vec<Node>,
    pub where_clause:    Option<Box<Node>>,
    pub group_clause:    Vec<Node>,
    pub having_clause:   Option<Box<Node>>,
    pub sort_clause:     Vec<Node>,
    pub limit_count:     Option<Box<Node>>,
    pub limit_offset:    Option<Box<Node>>,
    pub with_clause:     Option<Box<Node>>,
    pub larg:            Option<Box<Node>>,
    pub rarg:            Option<Box<Node>>
}

impl Select {
    pub fn is_set_operation(&self) -> bool {
        self.op != SetOp::None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub relation:     Box<Node>,
    #[serde(default)]
    pub target_list:  Vec<Node>,
    #[serde(default)]
    pub from_clause:  Vec<Node>,
    pub where_clause: Option<Box<Node>>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFrom {
    pub relation:     Box<Node>,
    pub where_clause: Option<Box<Node>>
}

/// INSERT statement; `cols` holds one name-only [`ResTarget`] per column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertInto {
    pub relation:    Box<Node>,
    #[serde(default)]
    pub cols:        Vec<Node>,
    pub select_stmt: Option<Box<Node>>
}

/// Table reference in a FROM clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeVar {
    pub schemaname: Option<CompactString>,
    pub relname:    CompactString,
    pub alias:      Option<CompactString>
}

impl RangeVar {
    pub fn new(relname: impl Into<CompactString>) -> Self {
        Self {
            schemaname: None,
            relname:    relname.into(),
            alias:      None
        }
    }

    pub fn with_alias(mut self, alias: impl Into<CompactString>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Schema-qualified relation name
    pub fn qualified_name(&self) -> CompactString {
        match &self.schemaname {
            Some(schema) => format!("{}.{}", schema, self.relname).into(),
            None => self.relname.clone()
        }
    }
}

/// Sub-select used as a FROM-clause entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSubselect {
    #[serde(default)]
    pub lateral:  bool,
    pub subquery: Box<Node>,
    pub alias:    Option<CompactString>
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Semi,
    LeftSemi,
    RightSemi,
    Anti,
    LeftAnti,
    RightAnti,
    /// MySQL `STRAIGHT_JOIN`
    Straight
}

/// Join of two FROM items; either arm may itself be a join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinExpr {
    #[serde(default)]
    pub jointype:     JoinType,
    #[serde(default)]
    pub is_natural:   bool,
    pub larg:         Box<Node>,
    pub rarg:         Box<Node>,
    #[serde(default)]
    pub using_clause: Vec<CompactString>,
    pub quals:        Option<Box<Node>>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes:      Vec<Node>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpr {
    pub ctename:       CompactString,
    #[serde(default)]
    pub aliascolnames: Vec<CompactString>,
    pub ctequery:      Box<Node>
}

/// Output column of a SELECT, SET item of an UPDATE or column of an INSERT
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResTarget {
    pub name: Option<CompactString>,
    pub val:  Option<Box<Node>>
}

/// Operator family of an [`AExpr`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AExprKind {
    Op,
    Any,
    All,
    And,
    Or,
    Not,
    In,
    NotIn,
    Between,
    NotBetween
}

/// Operator expression; boolean connectives are part of the same family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AExpr {
    pub kind:  AExprKind,
    #[serde(default)]
    pub name:  CompactString,
    pub lexpr: Option<Box<Node>>,
    pub rexpr: Option<Box<Node>>
}

impl AExpr {
    pub fn op(name: impl Into<CompactString>, lexpr: Node, rexpr: Node) -> Self {
        Self {
            kind:  AExprKind::Op,
            name:  name.into(),
            lexpr: Some(Box::new(lexpr)),
            rexpr: Some(Box::new(rexpr))
        }
    }

    pub fn boolean(kind: AExprKind, lexpr: Node, rexpr: Node) -> Self {
        Self {
            kind,
            name: CompactString::default(),
            lexpr: Some(Box::new(lexpr)),
            rexpr: Some(Box::new(rexpr))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Row {
    pub args: Vec<Node>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullTestType {
    IsNull,
    IsNotNull
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullTest {
    pub arg:          Box<Node>,
    pub nulltesttype: NullTestType
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuncCall {
    pub funcname:         CompactString,
    pub args:             Vec<Node>,
    /// ORDER BY inside the argument list, or of `WITHIN GROUP`
    pub agg_order:        Vec<Node>,
    pub agg_filter:       Option<Box<Node>>,
    pub agg_within_group: bool,
    pub agg_star:         bool,
    pub agg_distinct:     bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubLinkType {
    Exists,
    Any,
    All,
    Expr,
    Array
}

/// Subquery in expression position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubLink {
    pub sub_link_type: SubLinkType,
    pub oper_name:     Option<CompactString>,
    pub testexpr:      Option<Box<Node>>,
    pub subselect:     Box<Node>
}

/// Dotted column reference; the last field is the column, the one before it
/// (if any) the qualifying table or alias
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRef {
    pub fields: Vec<CompactString>
}

impl ColumnRef {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect()
        }
    }

    pub fn column(&self) -> Option<&str> {
        self.fields.last().map(CompactString::as_str)
    }

    pub fn qualifier(&self) -> Option<&str> {
        let len = self.fields.len();
        if len < 2 {
            return None;
        }
        self.fields.get(len - 2).map(CompactString::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AConst {
    Number(CompactString),
    String(String),
    Boolean(bool),
    Null,
    Param(CompactString)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDir {
    #[default]
    Default,
    Asc,
    Desc
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortBy {
    pub node:        Box<Node>,
    #[serde(default)]
    pub dir:         SortDir,
    #[serde(default)]
    pub nulls_first: Option<bool>
}

/// Construct the node model does not describe; `sql` keeps its text so the
/// tree still renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opaque {
    pub kind: CompactString,
    #[serde(default)]
    pub sql:  Option<String>
}
