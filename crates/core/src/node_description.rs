//! Atomic node predicates (`NodeOp`) and their disjunctive, nameable
//! composite (`NodeDescriptions`) — the leaves of the condition tree.

use regex::Regex;

use crate::condition::Condition;
use crate::error::{ParseError, ParseErrorKind};
use crate::search::SearchCtx;
use crate::tree::Tree;

/// A single atomic predicate tested against either a node's label or its
/// basic category, depending on the owning [`NodeDescriptions`]'s mode.
#[derive(Debug, Clone)]
pub enum NodeOp {
    /// Exact label match (`ID`).
    Id(String),
    /// Regex match, compiled with any `i`/`x` flags already folded in.
    Regex(Regex),
    /// Wildcard (`__`): matches any node regardless of value.
    Any,
    /// Root marker (`_ROOT_`): matches iff the node has no parent.
    Root,
}

impl NodeOp {
    pub fn satisfies(&self, value: Option<&str>, is_root: bool) -> bool {
        match self {
            NodeOp::Id(expected) => value == Some(expected.as_str()),
            NodeOp::Regex(re) => value.map(|v| re.is_match(v)).unwrap_or(false),
            NodeOp::Any => true,
            NodeOp::Root => is_root,
        }
    }
}

/// Parses a `/pattern/flags` regex token, peeling `i`/`x` flag characters
/// off the end one at a time and rejecting anything else.
pub fn compile_regex_token(pattern: &str, flags: &str, column: usize) -> Result<Regex, ParseError> {
    let mut inline = String::new();
    for ch in flags.chars() {
        match ch {
            'i' | 'x' => inline.push(ch),
            other => {
                return Err(ParseError::new(ParseErrorKind::BadRegexFlag(other), column));
            }
        }
    }
    let full = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{inline}){pattern}")
    };
    Regex::new(&full).map_err(|_| {
        ParseError::new(ParseErrorKind::UnexpectedToken(pattern.to_string()), column)
    })
}

/// A disjunction of [`NodeOp`]s plus the projection/negation bits, an
/// optional back-reference name, and an optional attached [`Condition`].
#[derive(Debug, Clone)]
pub struct NodeDescriptions {
    pub descriptions: Vec<NodeOp>,
    pub negated: bool,
    pub use_basic_cat: bool,
    pub name: Option<String>,
    pub condition: Option<Box<Condition>>,
}

impl NodeDescriptions {
    pub fn new(descriptions: Vec<NodeOp>) -> Self {
        NodeDescriptions {
            descriptions,
            negated: false,
            use_basic_cat: false,
            name: None,
            condition: None,
        }
    }

    /// Predicates only, dropping name and attached condition — what a
    /// `~name` back-reference link clones from the declaring description.
    pub fn predicate_snapshot(&self) -> NodeDescriptions {
        NodeDescriptions {
            descriptions: self.descriptions.clone(),
            negated: self.negated,
            use_basic_cat: self.use_basic_cat,
            name: None,
            condition: None,
        }
    }

    /// Base disjunction check, ignoring any attached condition. Exposed to
    /// the relation catalog so unbroken-chain relations can gate
    /// intermediates on the atomic predicates only, never on an attached
    /// condition.
    pub(crate) fn base_satisfies(&self, node: Tree<'_>) -> bool {
        let value = if self.use_basic_cat {
            node.basic_category()
        } else {
            node.label()
        };
        let any = self.descriptions.iter().any(|d| d.satisfies(value, node.is_root()));
        any ^ self.negated
    }

    /// Existence-only check used when this description is the right-hand
    /// side of a relation (`Leaf(R, D)`): does `node` satisfy the base
    /// predicate and, if present, does the attached condition yield at
    /// least one witness. On success, binds `node` under `name` once.
    pub fn matches_at<'f>(&self, node: Tree<'f>, ctx: &mut SearchCtx<'f, '_>) -> bool {
        if !self.base_satisfies(node) {
            return false;
        }
        let ok = match &self.condition {
            None => true,
            Some(cond) => !cond.search(node, ctx).is_empty(),
        };
        if ok {
            if let Some(name) = &self.name {
                ctx.backrefs.bind(name, node);
            }
        }
        ok
    }

    /// Full preorder enumeration used by the matcher driver and by `And`'s
    /// fold: every node in `root`'s subtree satisfying the base predicate,
    /// repeated once per witness its attached condition produces (so a
    /// node with three ways to satisfy an attached condition is yielded
    /// three times, each binding this description's name once).
    pub fn search<'f>(&self, root: Tree<'f>, ctx: &mut SearchCtx<'f, '_>) -> Vec<Tree<'f>> {
        let mut out = Vec::new();
        for node in root.preorder() {
            if !self.base_satisfies(node) {
                continue;
            }
            match &self.condition {
                None => {
                    if let Some(name) = &self.name {
                        ctx.backrefs.bind(name, node);
                    }
                    out.push(node);
                }
                Some(cond) => {
                    let witnesses = cond.search(node, ctx);
                    for _ in &witnesses {
                        if let Some(name) = &self.name {
                            ctx.backrefs.bind(name, node);
                        }
                        out.push(node);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backref::BackRefTable;
    use crate::head_finder::LeftHeadFinder;
    use crate::tree::Forest;

    fn ctx<'f>(declared: &[String]) -> SearchCtx<'f, 'static> {
        SearchCtx::new(BackRefTable::new(declared), &LeftHeadFinder)
    }

    #[test]
    fn test_id_and_wildcard() {
        let forest = Forest::parse_str("(A 1)").unwrap();
        let root = forest.roots().next().unwrap();
        let mut c = ctx(&[]);
        let id_desc = NodeDescriptions::new(vec![NodeOp::Id("A".into())]);
        assert!(id_desc.matches_at(root, &mut c));
        let any_desc = NodeDescriptions::new(vec![NodeOp::Any]);
        assert!(any_desc.matches_at(root, &mut c));
    }

    #[test]
    fn test_negation() {
        let forest = Forest::parse_str("(A 1)").unwrap();
        let root = forest.roots().next().unwrap();
        let mut c = ctx(&[]);
        let mut desc = NodeDescriptions::new(vec![NodeOp::Id("B".into())]);
        desc.negated = true;
        assert!(desc.matches_at(root, &mut c));
    }

    #[test]
    fn test_basic_category_mode() {
        let forest = Forest::parse_str("(NP-SBJ 1)").unwrap();
        let root = forest.roots().next().unwrap();
        let mut c = ctx(&[]);
        let mut desc = NodeDescriptions::new(vec![NodeOp::Id("NP".into())]);
        desc.use_basic_cat = true;
        assert!(desc.matches_at(root, &mut c));
    }

    #[test]
    fn test_regex_flags() {
        let re = compile_regex_token("^mw", "i", 0).unwrap();
        assert!(re.is_match("MWE"));
        let bad = compile_regex_token("^mw", "q", 0);
        assert!(bad.is_err());
    }

    #[test]
    fn test_name_binds_on_success() {
        let forest = Forest::parse_str("(A 1)").unwrap();
        let root = forest.roots().next().unwrap();
        let mut c = ctx(&["foo".to_string()]);
        let mut desc = NodeDescriptions::new(vec![NodeOp::Id("A".into())]);
        desc.name = Some("foo".to_string());
        assert!(desc.matches_at(root, &mut c));
        assert_eq!(c.backrefs.get("foo").unwrap().len(), 1);
    }
}
