use std::slice;

use serde::Serialize;

use crate::{
    deparse::Deparse,
    error::AppResult,
    node::{Child, LocationPath, Node, Replacement, Select, Slot}
};

/// Keyword prefix the target-list measuring wrapper adds
const SELECT_PREFIX: &str = "SELECT ";

/// Which kind of subtree a truncation would omit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TruncationKind {
    TargetList,
    WhereClause,
    CteQuery,
    Cols
}

/// A subtree that may be replaced by the truncation marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PossibleTruncation {
    pub location:    LocationPath,
    pub kind:        TruncationKind,
    /// Rendered length of the subtree on its own, in characters
    pub length:      usize,
    pub is_sequence: bool
}

impl PossibleTruncation {
    /// Marker shaped for the slot being replaced
    pub fn replacement(&self) -> Replacement {
        if self.is_sequence {
            Replacement::Sequence(vec![Node::Truncated])
        } else {
            Replacement::Scalar(Node::Truncated)
        }
    }
}

/// Walk `statements` once and record every replaceable subtree
///
/// # Errors
///
/// Propagates deparser failures from measuring a candidate.
pub fn possible_truncations<D>(statements: &[Node], deparser: &D) -> AppResult<Vec<PossibleTruncation>>
where
    D: Deparse + ?Sized
{
    let mut collector = Collector {
        deparser,
        found: Vec::new()
    };
    for (index, statement) in statements.iter().enumerate() {
        collector.visit(statement, &LocationPath::root(index))?;
    }
    Ok(collector.found)
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

struct Collector<'d, D: ?Sized> {
    deparser: &'d D,
    found:    Vec<PossibleTruncation>
}

impl<D: Deparse + ?Sized> Collector<'_, D> {
    fn visit(&mut self, node: &Node, path: &LocationPath) -> AppResult<()> {
        for (slot, child) in node.children() {
            let location = path.child(slot, None);
            self.inspect(node, slot, child, location.clone())?;
            match child {
                Child::One(next) => self.visit(next, &location)?,
                Child::Many(nodes) => {
                    for (i, next) in nodes.iter().enumerate() {
                        self.visit(next, &path.child(slot, Some(i)))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn inspect(
        &mut self,
        parent: &Node,
        slot: Slot,
        child: Child<'_>,
        location: LocationPath
    ) -> AppResult<()> {
        let measured = match (parent, slot, child) {
            (Node::Select(_), Slot::TargetList, Child::Many(targets)) => {
                let wrapper = Node::from(Select {
                    target_list: targets.to_vec(),
                    ..Default::default()
                });
                let length = self.measure(slice::from_ref(&wrapper))?;
                Some((
                    TruncationKind::TargetList,
                    length.saturating_sub(SELECT_PREFIX.len()),
                    true
                ))
            }
            (Node::Select(_), Slot::WhereClause, Child::One(clause)) => {
                let wrapper = Node::from(Select {
                    where_clause: Some(Box::new(clause.clone())),
                    ..Default::default()
                });
                let length = self.measure(slice::from_ref(&wrapper))?;
                Some((TruncationKind::WhereClause, length, false))
            }
            (Node::CommonTableExpr(_), Slot::Ctequery, Child::One(query)) => {
                let length = self.measure(slice::from_ref(query))?;
                Some((TruncationKind::CteQuery, length, false))
            }
            (_, Slot::Cols, Child::Many(cols)) => {
                let length = self.measure(cols)?;
                Some((TruncationKind::Cols, length, true))
            }
            _ => None
        };
        if let Some((kind, length, is_sequence)) = measured {
            self.found.push(PossibleTruncation {
                location,
                kind,
                length,
                is_sequence
            });
        }
        Ok(())
    }

    fn measure(&self, nodes: &[Node]) -> AppResult<usize> {
        Ok(char_len(&self.deparser.deparse(nodes)?))
    }
}
