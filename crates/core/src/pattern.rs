//! [`TregexPattern`]: compiles pattern text into a node-description /
//! condition tree, owns the back-reference table for one compiled pattern,
//! and exposes the engine-facing API callers use to run it:
//! `compile`, `find_all`, `get_nodes`.

use tracing::{debug, instrument};

use crate::backref::BackRefTable;
use crate::error::{TregexError, UnknownBackRef};
use crate::head_finder::HeadFinder;
use crate::node_description::NodeDescriptions;
use crate::parser::parse_pattern;
use crate::search::SearchCtx;
use crate::tree::{Forest, NodeId, Tree};

/// One or more `;`-separated node-description patterns compiled from a
/// single pattern string, plus the table of names any of them declare.
///
/// Not safe to share a single compiled pattern across concurrent
/// searches: `find_all` mutates the owned back-reference table. Either
/// serialize searches on one instance or compile a fresh one per thread.
pub struct TregexPattern {
    items: Vec<NodeDescriptions>,
    declared_names: Vec<String>,
    backrefs: BackRefTable,
}

impl TregexPattern {
    /// Compiles pattern text into an executable matcher.
    #[instrument(skip(text), fields(pattern = %text))]
    pub fn compile(text: &str) -> Result<Self, TregexError> {
        let items = parse_pattern(text).map_err(TregexError::from)?;
        let mut declared_names = Vec::new();
        for item in &items {
            collect_names(item, &mut declared_names);
        }
        debug!(patterns = items.len(), names = declared_names.len(), "pattern compiled");
        Ok(TregexPattern {
            items,
            declared_names: declared_names.clone(),
            backrefs: BackRefTable::new(&declared_names),
        })
    }

    pub fn declared_names(&self) -> &[String] {
        &self.declared_names
    }

    /// Runs this pattern over every tree in `forest`, resetting the
    /// back-reference table at the start of the call. Semicolon-separated
    /// top-level patterns are run in turn, their matches concatenated.
    #[instrument(skip(self, forest), fields(trees = forest.roots().count()))]
    pub fn find_all(&mut self, forest: &Forest, head_finder: &dyn HeadFinder) -> Vec<NodeId> {
        self.backrefs = BackRefTable::new(&self.declared_names);
        let mut out = Vec::new();
        for item in &self.items {
            for root in forest.roots() {
                let mut ctx = SearchCtx::new(std::mem::take(&mut self.backrefs), head_finder);
                let witnesses = item.search(root, &mut ctx);
                self.backrefs = ctx.backrefs;
                out.extend(witnesses.iter().map(|t| t.id()));
            }
        }
        debug!(matches = out.len(), "search complete");
        out
    }

    /// Convenience wrapper returning borrowed [`Tree`] handles instead of
    /// bare ids, for callers (e.g. the CLI) that want to render matches.
    pub fn find_all_nodes<'f>(&mut self, forest: &'f Forest, head_finder: &dyn HeadFinder) -> Vec<Tree<'f>> {
        self.find_all(forest, head_finder)
            .into_iter()
            .map(|id| forest.node(id))
            .collect()
    }

    /// The nodes bound to `name` by the most recent `find_all` call.
    pub fn get_nodes(&self, name: &str) -> Result<&[NodeId], TregexError> {
        self.backrefs
            .get(name)
            .ok_or_else(|| TregexError::from(UnknownBackRef(name.to_string())))
    }
}

fn collect_names(nd: &NodeDescriptions, out: &mut Vec<String>) {
    if let Some(name) = &nd.name {
        out.push(name.clone());
    }
    if let Some(cond) = &nd.condition {
        out.extend(cond.names());
    }
}

impl std::fmt::Debug for TregexPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TregexPattern({} top-level pattern(s))", self.items.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::head_finder::{LeftHeadFinder, RightHeadFinder};

    fn run(pattern: &str, tree: &str) -> Vec<String> {
        let mut p = TregexPattern::compile(pattern).unwrap();
        let forest = Forest::parse_str(tree).unwrap();
        let hf = LeftHeadFinder;
        p.find_all_nodes(&forest, &hf)
            .into_iter()
            .map(|t| t.to_tree_string())
            .collect()
    }

    #[test]
    fn test_scenario_regex_on_forest() {
        let matches = run("/^MW/", "(ROOT (MWE (N 1)(N 2)(N 3)) (MWV (A B)))");
        assert_eq!(matches, vec!["(MWE (N 1) (N 2) (N 3))", "(MWV (A B))"]);
    }

    #[test]
    fn test_scenario_dominance_chain() {
        let matches = run("foo << bar", "(foo (a (b (bar 1))))");
        assert_eq!(matches, vec!["(foo (a (b (bar 1))))"]);
    }

    #[test]
    fn test_scenario_multi_child_exact() {
        assert_eq!(run("A <... { B ; C ; D }", "(A (B 1)(C 2)(D 3))").len(), 1);
        assert_eq!(run("A <... { B ; C ; D }", "(A (B 1)(C 2)(D 3)(E 4))").len(), 0);
    }

    #[test]
    fn test_scenario_opt_or_backrefs() {
        let mut p = TregexPattern::compile("A ?[< B=foo || < C=foo]").unwrap();
        let forest = Forest::parse_str("(A (B 1)(C 2)(B 3))").unwrap();
        let hf = LeftHeadFinder;
        let matches = p.find_all(&forest, &hf);
        assert_eq!(matches.len(), 3);
        let foo_nodes: Vec<_> = p
            .get_nodes("foo")
            .unwrap()
            .iter()
            .map(|&id| forest.node(id).to_tree_string())
            .collect();
        assert_eq!(foo_nodes, vec!["(B 1)", "(B 3)", "(C 2)"]);
    }

    #[test]
    fn test_scenario_link_reference() {
        let matches = run("bar=a $- (~a $- foo)", "(a (foo 1)(bar 2)(bar 3))");
        assert_eq!(matches, vec!["(bar 3)"]);
    }

    #[test]
    fn test_scenario_parent_equals_double_count() {
        assert_eq!(run("A <= B", "(A (B 1))").len(), 1);
        assert_eq!(run("A <= A", "(A (A 1)(B 2))").len(), 3);
    }

    #[test]
    fn test_scenario_immediate_head_with_right_head_finder() {
        let mut matches_nns = TregexPattern::compile("NP <# NNS").unwrap();
        let mut matches_nn = TregexPattern::compile("NP <# NN").unwrap();
        let forest = Forest::parse_str("(NP (NN work)(NNS practices))").unwrap();
        let hf = RightHeadFinder;
        assert_eq!(matches_nns.find_all(&forest, &hf).len(), 1);
        assert_eq!(matches_nn.find_all(&forest, &hf).len(), 0);
    }

    #[test]
    fn test_empty_forest_yields_no_matches() {
        let mut p = TregexPattern::compile("__").unwrap();
        let forest = Forest::new();
        let hf = LeftHeadFinder;
        assert!(p.find_all(&forest, &hf).is_empty());
    }

    #[test]
    fn test_wildcard_matches_every_node_in_preorder() {
        let matches = run("__", "(A (B 1) (C 2))");
        assert_eq!(matches, vec!["(A (B 1) (C 2))", "(B 1)", "1", "(C 2)", "2"]);
    }

    #[test]
    fn test_unknown_backref_is_an_error() {
        let mut p = TregexPattern::compile("A").unwrap();
        let forest = Forest::parse_str("(A 1)").unwrap();
        let hf = LeftHeadFinder;
        p.find_all(&forest, &hf);
        assert!(matches!(p.get_nodes("nope"), Err(TregexError::UnknownBackRef(_))));
    }
}
