//! Table alias resolution for qualified column references.

use std::collections::HashMap;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Mapping from alias (or table name) to canonical table name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap {
    entries: HashMap<CompactString, CompactString>
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `alias -> table` for every aliased table reference anywhere in
    /// `statements`, sub-selects and CTE bodies included
    pub fn from_statements(statements: &[Node]) -> Self {
        let mut aliases = Self::new();
        for statement in statements {
            statement.walk(&mut |node| {
                if let Node::RangeVar(range_var) = node
                    && let Some(alias) = &range_var.alias
                {
                    aliases.insert(alias.clone(), range_var.qualified_name());
                }
            });
        }
        aliases
    }

    pub fn insert(&mut self, alias: impl Into<CompactString>, table: impl Into<CompactString>) {
        self.entries.insert(alias.into(), table.into());
    }

    /// Canonical table name for `qualifier`, if it is a known alias
    pub fn resolve(&self, qualifier: &str) -> Option<&str> {
        self.entries.get(qualifier).map(CompactString::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AliasMap
where
    K: Into<CompactString>,
    V: Into<CompactString>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut aliases = Self::new();
        aliases.extend(iter);
        aliases
    }
}

impl<K, V> Extend<(K, V)> for AliasMap
where
    K: Into<CompactString>,
    V: Into<CompactString>
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (alias, table) in iter {
            self.insert(alias, table);
        }
    }
}
