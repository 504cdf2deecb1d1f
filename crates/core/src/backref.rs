//! The back-reference table: a mapping from declared name to the nodes a
//! named node-description has bound during a search. Predicate snapshots
//! for `~name` links are resolved at parse time (see `Parser::declared` in
//! `parser.rs`), so this table only ever needs to track bound nodes.

use std::collections::HashMap;

use crate::tree::{NodeId, Tree};

/// One declared name's state: the nodes it has bound so far in the current
/// search.
#[derive(Debug, Clone, Default)]
pub struct BackRef {
    pub nodes: Vec<NodeId>,
}

/// Table of every name declared in a compiled pattern. Reset at the start
/// of each top-level `findall` invocation; mutated only on successful
/// completion of the owning description's search at a node.
#[derive(Debug, Clone, Default)]
pub struct BackRefTable {
    entries: HashMap<String, BackRef>,
}

impl BackRefTable {
    /// Creates a table pre-populated with every name the pattern declares,
    /// so that `get` never has to distinguish "not yet matched" from
    /// "never declared" once compilation has succeeded.
    pub fn new(declared_names: &[String]) -> Self {
        let mut entries = HashMap::new();
        for name in declared_names {
            entries.insert(name.clone(), BackRef::default());
        }
        BackRefTable { entries }
    }

    pub fn bind(&mut self, name: &str, node: Tree<'_>) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.nodes.push(node.id());
        }
    }

    pub fn get(&self, name: &str) -> Option<&[NodeId]> {
        self.entries.get(name).map(|e| e.nodes.as_slice())
    }

    /// A copy-on-write snapshot point for `Not`: restore the table to this
    /// state when leaving the negated branch, discarding any writes it made.
    pub fn snapshot(&self) -> BackRefTable {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: BackRefTable) {
        *self = snapshot;
    }
}
