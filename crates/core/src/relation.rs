//! The closed relation catalog: a tagged variant over every structural
//! predicate the pattern language can express, each paired with the
//! candidate generator that drives its right-hand side. `satisfies` is
//! derived from `candidates` everywhere, which is what guarantees the
//! universal invariant `R.satisfies(a, b) <=> b in R.candidates(a)`.

use crate::head_finder::HeadFinder;
use crate::node_description::NodeDescriptions;
use crate::tree::Tree;

/// A relation together with whatever argument its surface syntax carries:
/// none, a 1-indexed (possibly negative) integer, or a node-description
/// used to gate an unbroken chain.
#[derive(Debug, Clone)]
pub enum Relation {
    ImmediatelyDominates,     // <
    ImmediatelyDominatedBy,   // >
    Dominates,                // <<
    DominatedBy,               // >>
    HasOnlyChild,              // <:
    OnlyChildOf,                // >:
    HasLeftmostChild,           // <,
    LeftmostChildOf,            // >,
    HasRightmostChild,          // <- / <`
    RightmostChildOf,           // >- / >`
    HasLeftmostDescendant,      // <<,
    LeftmostDescendantOf,       // >>,
    HasRightmostDescendant,     // <<- / <<`
    RightmostDescendantOf,      // >>- / >>`
    SisterOf,                   // $
    LeftSisterOf,                // $.. / $++
    RightSisterOf,               // $,, / $--
    ImmediateLeftSisterOf,        // $. / $+
    ImmediateRightSisterOf,       // $, / $-
    Equals,                        // ==
    ParentEquals,                  // <=
    UnaryPathAncestorOf,            // <<:
    UnaryPathDescendantOf,           // >>:
    Precedes,                        // ..
    Follows,                         // ,,
    ImmediatelyPrecedes,             // .
    ImmediatelyFollows,              // ,
    AnyNode,                          // :
    ImmediatelyHeads,                 // >#
    ImmediatelyHeadedBy,               // <#
    Heads,                              // >>#
    HeadedBy,                           // <<#
    HasIthChild(i32),                   // < i
    IthChildOf(i32),                     // > i
    AncestorOfIthLeaf(i32),               // <<< i
    UnbrokenCategoryDominates(Box<NodeDescriptions>),     // <+(C)
    UnbrokenCategoryIsDominatedBy(Box<NodeDescriptions>), // >+(C)
    UnbrokenCategoryPrecedes(Box<NodeDescriptions>),      // .+(C)
    UnbrokenCategoryFollows(Box<NodeDescriptions>),       // ,+(C)
}

/// Resolves a 1-indexed, possibly-negative child index to a 0-indexed
/// position among `n` children, or `None` if out of range.
fn resolve_index(i: i32, n: usize) -> Option<usize> {
    if i > 0 {
        let idx = (i as usize).checked_sub(1)?;
        (idx < n).then_some(idx)
    } else {
        let from_end = (-i) as usize;
        (from_end >= 1 && from_end <= n).then_some(n - from_end)
    }
}

impl Relation {
    /// The nodes standing in this relation to `a`, i.e. every `b` with
    /// `a R b`.
    pub fn candidates<'f>(&self, a: Tree<'f>, hf: &dyn HeadFinder) -> Vec<Tree<'f>> {
        use Relation::*;
        match self {
            ImmediatelyDominates => a.children().collect(),
            ImmediatelyDominatedBy => a.parent().into_iter().collect(),
            Dominates => a.descendants().collect(),
            DominatedBy => a.ancestors().collect(),
            HasOnlyChild => {
                if a.num_children() == 1 {
                    vec![a.first_child().unwrap()]
                } else {
                    vec![]
                }
            }
            OnlyChildOf => match a.parent() {
                Some(p) if p.num_children() == 1 => vec![p],
                _ => vec![],
            },
            HasLeftmostChild => a.first_child().into_iter().collect(),
            LeftmostChildOf => match a.parent() {
                Some(p) if a.sister_index() == Some(0) => vec![p],
                _ => vec![],
            },
            HasRightmostChild => a.last_child().into_iter().collect(),
            RightmostChildOf => match a.parent() {
                Some(p) if a.sister_index() == Some(p.num_children() - 1) => vec![p],
                _ => vec![],
            },
            HasLeftmostDescendant => {
                let mut out = Vec::new();
                let mut cur = a.first_child();
                while let Some(c) = cur {
                    out.push(c);
                    cur = c.first_child();
                }
                out
            }
            LeftmostDescendantOf => {
                let mut out = Vec::new();
                let mut cur = a;
                while cur.sister_index() == Some(0) {
                    let p = cur.parent().unwrap();
                    out.push(p);
                    cur = p;
                }
                out
            }
            HasRightmostDescendant => {
                let mut out = Vec::new();
                let mut cur = a.last_child();
                while let Some(c) = cur {
                    out.push(c);
                    cur = c.last_child();
                }
                out
            }
            RightmostDescendantOf => {
                let mut out = Vec::new();
                let mut cur = a;
                loop {
                    match cur.parent() {
                        Some(p) if cur.sister_index() == Some(p.num_children() - 1) => {
                            out.push(p);
                            cur = p;
                        }
                        _ => break,
                    }
                }
                out
            }
            SisterOf => a.siblings().collect(),
            // "a is left sister of b": b ranges over a's right siblings.
            LeftSisterOf => right_siblings(a),
            // "a is right sister of b": b ranges over a's left siblings.
            RightSisterOf => left_siblings(a),
            ImmediateLeftSisterOf => immediate_right_sibling(a).into_iter().collect(),
            ImmediateRightSisterOf => immediate_left_sibling(a).into_iter().collect(),
            Equals => vec![a],
            ParentEquals => std::iter::once(a).chain(a.children()).collect(),
            UnaryPathAncestorOf => unary_chain_down(a),
            UnaryPathDescendantOf => unary_chain_up(a),
            Precedes => root_of(a).preorder().filter(|n| a.right_edge() <= n.left_edge()).collect(),
            Follows => root_of(a).preorder().filter(|n| n.right_edge() <= a.left_edge()).collect(),
            ImmediatelyPrecedes => immediately_precedes_global(a),
            ImmediatelyFollows => immediately_follows_global(a),
            AnyNode => root_of(a).preorder().collect(),
            ImmediatelyHeads => match a.parent() {
                Some(p) if hf.head_of(p).map(|h| h.id()) == Some(a.id()) => vec![p],
                _ => vec![],
            },
            ImmediatelyHeadedBy => hf.head_of(a).into_iter().collect(),
            Heads => {
                let mut out = Vec::new();
                let mut cur = a;
                loop {
                    match cur.parent() {
                        Some(p) if hf.head_of(p).map(|h| h.id()) == Some(cur.id()) => {
                            out.push(p);
                            cur = p;
                        }
                        _ => break,
                    }
                }
                out
            }
            HeadedBy => {
                let mut out = Vec::new();
                let mut cur = hf.head_of(a);
                while let Some(h) = cur {
                    out.push(h);
                    cur = hf.head_of(h);
                }
                out
            }
            HasIthChild(i) => resolve_index(*i, a.num_children())
                .and_then(|idx| a.child(idx))
                .into_iter()
                .collect(),
            IthChildOf(i) => match a.parent() {
                Some(p) => match (resolve_index(*i, p.num_children()), a.sister_index()) {
                    (Some(idx), Some(pos)) if idx == pos => vec![p],
                    _ => vec![],
                },
                None => vec![],
            },
            AncestorOfIthLeaf(i) => {
                let leaves: Vec<_> = a.leaves().collect();
                resolve_index(*i, leaves.len()).map(|idx| leaves[idx]).into_iter().collect()
            }
            UnbrokenCategoryDominates(c) => chain_descend(a, c, |n| n.children().collect()),
            UnbrokenCategoryIsDominatedBy(c) => chain_descend(a, c, |n| n.parent().into_iter().collect()),
            UnbrokenCategoryPrecedes(c) => chain_descend(a, c, immediately_precedes_global),
            UnbrokenCategoryFollows(c) => chain_descend(a, c, immediately_follows_global),
        }
    }

    pub fn satisfies(&self, a: Tree<'_>, b: Tree<'_>, hf: &dyn HeadFinder) -> bool {
        self.candidates(a, hf).iter().any(|c| c.id() == b.id())
    }
}

fn root_of<'f>(n: Tree<'f>) -> Tree<'f> {
    n.ancestors().last().unwrap_or(n)
}

fn left_siblings<'f>(a: Tree<'f>) -> Vec<Tree<'f>> {
    match (a.parent(), a.sister_index()) {
        (Some(p), Some(pos)) => p.children().take(pos).collect(),
        _ => vec![],
    }
}

fn right_siblings<'f>(a: Tree<'f>) -> Vec<Tree<'f>> {
    match (a.parent(), a.sister_index()) {
        (Some(p), Some(pos)) => p.children().skip(pos + 1).collect(),
        _ => vec![],
    }
}

fn immediate_left_sibling<'f>(a: Tree<'f>) -> Option<Tree<'f>> {
    let (p, pos) = (a.parent()?, a.sister_index()?);
    pos.checked_sub(1).and_then(|i| p.child(i))
}

fn immediate_right_sibling<'f>(a: Tree<'f>) -> Option<Tree<'f>> {
    let (p, pos) = (a.parent()?, a.sister_index()?);
    p.child(pos + 1)
}

fn immediately_precedes_global<'f>(a: Tree<'f>) -> Vec<Tree<'f>> {
    root_of(a).preorder().filter(|n| a.right_edge() == n.left_edge()).collect()
}

fn immediately_follows_global<'f>(a: Tree<'f>) -> Vec<Tree<'f>> {
    root_of(a).preorder().filter(|n| n.right_edge() == a.left_edge()).collect()
}

fn unary_chain_down<'f>(a: Tree<'f>) -> Vec<Tree<'f>> {
    let mut out = Vec::new();
    let mut cur = a;
    while cur.num_children() == 1 {
        let child = cur.first_child().unwrap();
        out.push(child);
        cur = child;
    }
    out
}

fn unary_chain_up<'f>(a: Tree<'f>) -> Vec<Tree<'f>> {
    let mut out = Vec::new();
    let mut cur = a;
    while let Some(p) = cur.parent() {
        if p.num_children() != 1 {
            break;
        }
        out.push(p);
        cur = p;
    }
    out
}

/// Shared walk for the unbroken-chain relations: every node directly
/// reachable by `step` from `a` is a valid target with zero intermediates;
/// the walk extends further through a node only if that node itself
/// satisfies `c` (ignoring `c`'s own attached condition), so multi-hop
/// targets are gated by every node strictly between `a` and the target.
fn chain_descend<'f>(
    a: Tree<'f>,
    c: &NodeDescriptions,
    step: impl Fn(Tree<'f>) -> Vec<Tree<'f>>,
) -> Vec<Tree<'f>> {
    let mut out = Vec::new();
    let mut frontier = vec![a];
    let mut seen = std::collections::HashSet::new();
    while let Some(cur) = frontier.pop() {
        for next in step(cur) {
            if !seen.insert(next.id()) {
                continue;
            }
            out.push(next);
            if c.base_satisfies(next) {
                frontier.push(next);
            }
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::head_finder::LeftHeadFinder;
    use crate::node_description::NodeOp;
    use crate::tree::Forest;

    fn hf() -> LeftHeadFinder {
        LeftHeadFinder
    }

    #[test]
    fn test_immediate_dominance_invariant() {
        let forest = Forest::parse_str("(A (B 1) (C 2))").unwrap();
        let root = forest.roots().next().unwrap();
        let b = root.first_child().unwrap();
        assert!(Relation::ImmediatelyDominates.satisfies(root, b, &hf()));
        assert!(!Relation::ImmediatelyDominates.satisfies(b, root, &hf()));
    }

    #[test]
    fn test_dominates_excludes_self() {
        let forest = Forest::parse_str("(A (B 1))").unwrap();
        let root = forest.roots().next().unwrap();
        assert!(!Relation::Dominates.satisfies(root, root, &hf()));
    }

    #[test]
    fn test_ith_child() {
        let forest = Forest::parse_str("(A (B 1) (C 2) (D 3))").unwrap();
        let root = forest.roots().next().unwrap();
        let d = root.child(2).unwrap();
        assert!(Relation::HasIthChild(3).satisfies(root, d, &hf()));
        assert!(Relation::HasIthChild(-1).satisfies(root, d, &hf()));
        assert!(Relation::IthChildOf(3).satisfies(d, root, &hf()));
    }

    #[test]
    fn test_precedes_follows_reflexive_false() {
        let forest = Forest::parse_str("(A (B 1) (C 2))").unwrap();
        let root = forest.roots().next().unwrap();
        let b = root.first_child().unwrap();
        assert!(!Relation::Precedes.satisfies(b, b, &hf()));
        assert!(!Relation::ImmediatelyPrecedes.satisfies(b, b, &hf()));
    }

    #[test]
    fn test_immediately_precedes() {
        let forest = Forest::parse_str("(A (B 1) (C 2))").unwrap();
        let root = forest.roots().next().unwrap();
        let b = root.first_child().unwrap();
        let c = root.child(1).unwrap();
        assert!(Relation::ImmediatelyPrecedes.satisfies(b, c, &hf()));
        assert!(!Relation::ImmediatelyPrecedes.satisfies(c, b, &hf()));
    }

    #[test]
    fn test_immediate_right_sister_of() {
        // a $- b : a is b's immediate right sister (b comes right before a)
        let forest = Forest::parse_str("(A (FOO 1) (BAR 2))").unwrap();
        let root = forest.roots().next().unwrap();
        let foo = root.first_child().unwrap();
        let bar = root.child(1).unwrap();
        assert!(Relation::ImmediateRightSisterOf.satisfies(bar, foo, &hf()));
        assert!(!Relation::ImmediateRightSisterOf.satisfies(foo, bar, &hf()));
    }

    #[test]
    fn test_parent_equals_double_count_candidates() {
        let forest = Forest::parse_str("(A (A 1) (B 2))").unwrap();
        let root = forest.roots().next().unwrap();
        let candidates = Relation::ParentEquals.candidates(root, &hf());
        assert_eq!(candidates.len(), 3); // root + 2 children
    }

    #[test]
    fn test_unbroken_category_dominates_direct_child_has_zero_intermediates() {
        let forest = Forest::parse_str("(VP (VP (VBZ runs)))").unwrap();
        let root = forest.roots().next().unwrap();
        let gate = NodeDescriptions::new(vec![NodeOp::Id("VP".into())]);
        let rel = Relation::UnbrokenCategoryDominates(Box::new(gate));
        let targets = rel.candidates(root, &hf());
        let labels: Vec<_> = targets.iter().filter_map(|t| t.label()).collect();
        assert!(labels.contains(&"VP"));
        assert!(labels.contains(&"VBZ"));
    }

    #[test]
    fn test_unbroken_category_stops_at_non_matching_intermediate() {
        let forest = Forest::parse_str("(VP (NP (VBZ runs)))").unwrap();
        let root = forest.roots().next().unwrap();
        let gate = NodeDescriptions::new(vec![NodeOp::Id("VP".into())]);
        let rel = Relation::UnbrokenCategoryDominates(Box::new(gate));
        let targets = rel.candidates(root, &hf());
        // NP is directly reachable (zero intermediates) but does not gate further descent
        let labels: Vec<_> = targets.iter().filter_map(|t| t.label()).collect();
        assert_eq!(labels, vec!["NP"]);
    }
}
