//! The head-projection capability consumed by the `<#`/`>#`/`<<#`/`>>#`
//! relations. Concrete treebank-specific rulebooks (e.g. Collins' rules
//! for the Penn Treebank) live outside this crate; this module only
//! defines the interface the matcher compiles against, plus a trivial
//! deterministic default usable in tests and as a fallback.

use crate::tree::Tree;

/// Selects at most one child of a non-leaf node as its syntactic head.
///
/// Implementations must be deterministic: calling `head_of` twice on the
/// same node must return the same answer, since the matcher walks the
/// chain repeatedly for the transitive `<<#`/`>>#` relations.
pub trait HeadFinder {
    fn head_of<'f>(&self, node: Tree<'f>) -> Option<Tree<'f>>;
}

/// Always selects the leftmost child. Useful as a default and in tests;
/// real treebank head rules are supplied by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeftHeadFinder;

impl HeadFinder for LeftHeadFinder {
    fn head_of<'f>(&self, node: Tree<'f>) -> Option<Tree<'f>> {
        node.first_child()
    }
}

/// Always selects the rightmost child.
#[derive(Debug, Default, Clone, Copy)]
pub struct RightHeadFinder;

impl HeadFinder for RightHeadFinder {
    fn head_of<'f>(&self, node: Tree<'f>) -> Option<Tree<'f>> {
        node.last_child()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::Forest;

    #[test]
    fn test_left_head_finder() {
        let forest = Forest::parse_str("(A (B 1) (C 2))").unwrap();
        let root = forest.roots().next().unwrap();
        let head = LeftHeadFinder.head_of(root).unwrap();
        assert_eq!(head.label(), Some("B"));
    }

    #[test]
    fn test_right_head_finder() {
        let forest = Forest::parse_str("(A (B 1) (C 2))").unwrap();
        let root = forest.roots().next().unwrap();
        let head = RightHeadFinder.head_of(root).unwrap();
        assert_eq!(head.label(), Some("C"));
    }

    #[test]
    fn test_leaf_has_no_head() {
        let forest = Forest::parse_str("(A 1)").unwrap();
        let root = forest.roots().next().unwrap();
        let leaf = root.first_child().unwrap();
        assert!(LeftHeadFinder.head_of(leaf).is_none());
    }
}
