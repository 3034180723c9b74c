use serde::Serialize;
use smallvec::SmallVec;

use super::{Child, Node, Slot, SlotMut};
use crate::error::{AppResult, truncation_path_error};

/// One descend step: a child slot, plus an element index when the step goes
/// into a sequence slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    pub slot:  Slot,
    pub index: Option<usize>
}

/// Structural address of a slot inside a statement list.
///
/// A path only records slot names and indices, so a path taken from one tree
/// resolves the same way against any clone of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocationPath {
    pub statement: usize,
    pub steps:     SmallVec<[Step; 8]>
}

/// What to put in the slot a path addresses
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    Scalar(Node),
    Sequence(Vec<Node>)
}

impl LocationPath {
    /// Path to the top-level statement at `statement`
    pub fn root(statement: usize) -> Self {
        Self {
            statement,
            steps: SmallVec::new()
        }
    }

    /// Path extended by one step
    pub fn child(&self, slot: Slot, index: Option<usize>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step { slot, index });
        Self {
            statement: self.statement,
            steps
        }
    }

    /// Number of descend steps below the statement root
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Look up the addressed slot
    pub fn resolve<'a>(&self, statements: &'a [Node]) -> Option<Child<'a>> {
        let mut node = statements.get(self.statement)?;
        let Some((last, parents)) = self.steps.split_last() else {
            return Some(Child::One(node));
        };
        for step in parents {
            node = match (node.child(step.slot)?, step.index) {
                (Child::One(n), None) => n,
                (Child::Many(nodes), Some(i)) => nodes.get(i)?,
                _ => return None
            };
        }
        match (node.child(last.slot)?, last.index) {
            (child, None) => Some(child),
            (Child::Many(nodes), Some(i)) => nodes.get(i).map(Child::One),
            (Child::One(_), Some(_)) => None
        }
    }

    /// Overwrite the addressed slot in place
    ///
    /// # Errors
    ///
    /// Fails when the path does not exist in `statements` or when the
    /// replacement shape (scalar or sequence) does not match the slot.
    pub fn replace(&self, statements: &mut [Node], replacement: Replacement) -> AppResult<()> {
        let (last, parents) = self
            .steps
            .split_last()
            .ok_or_else(|| truncation_path_error("cannot replace a statement root"))?;
        let mut node = statements
            .get_mut(self.statement)
            .ok_or_else(|| truncation_path_error(format!("no statement at {}", self)))?;
        for step in parents {
            node = node
                .child_mut(step.slot, step.index)
                .ok_or_else(|| truncation_path_error(format!("{} does not exist", self)))?;
        }
        let kind = node.kind_name().to_string();
        let slot = node
            .slot_mut(last.slot)
            .ok_or_else(|| truncation_path_error(format!("{} has no {} slot", kind, last.slot)))?;
        match (slot, last.index, replacement) {
            (SlotMut::One(target), None, Replacement::Scalar(value)) => *target = value,
            (SlotMut::Optional(target), None, Replacement::Scalar(value)) => {
                *target = Some(Box::new(value))
            }
            (SlotMut::Many(target), None, Replacement::Sequence(values)) => *target = values,
            (SlotMut::Many(target), Some(i), Replacement::Scalar(value)) => {
                let element = target
                    .get_mut(i)
                    .ok_or_else(|| truncation_path_error(format!("{} does not exist", self)))?;
                *element = value;
            }
            _ => {
                return Err(truncation_path_error(format!(
                    "replacement shape does not fit {}.{}",
                    kind, last.slot
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for LocationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.statement)?;
        for step in &self.steps {
            write!(f, ".{}", step.slot)?;
            if let Some(i) = step.index {
                write!(f, "[{}]", i)?;
            }
        }
        Ok(())
    }
}
