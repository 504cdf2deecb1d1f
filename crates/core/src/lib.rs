/*!
This crate implements a declarative pattern language for searching
labeled, ordered, rooted trees — constituency parse trees as used in
natural-language processing. A pattern describes a target node by
node-label constraints and structural relations to other nodes; the
engine compiles pattern text into an executable matcher and enumerates
every node in an input forest that satisfies it, binding named
sub-matches into back-references along the way.

This is the core engine only: the tokenizer and grammar, the
condition/relation algebra, the node-enumeration and match-search
algorithm, and the tree data type. The command-line front end,
head-finding rulebooks for specific treebank styles, and the tree
printer used for human output are external collaborators; this crate
exposes the interfaces they're built against.
*/

pub mod backref;
pub mod condition;
pub mod error;
pub mod head_finder;
pub mod lexer;
pub mod node_description;
pub mod parser;
pub mod pattern;
pub mod relation;
pub mod search;
pub mod tree;

pub use backref::{BackRef, BackRefTable};
pub use condition::Condition;
pub use error::{ParseError, ParseErrorKind, TreeFormatError, TregexError, UnknownBackRef};
pub use head_finder::{HeadFinder, LeftHeadFinder, RightHeadFinder};
pub use node_description::{NodeDescriptions, NodeOp};
pub use pattern::TregexPattern;
pub use relation::Relation;
pub use search::SearchCtx;
pub use tree::{Forest, NodeId, Tree};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_end_to_end_compile_and_find() {
        let mut pattern = TregexPattern::compile("NP < NN").unwrap();
        let forest = Forest::parse_str("(S (NP (NN dog)) (VP (V barks)))").unwrap();
        let hf = LeftHeadFinder;
        let matches = pattern.find_all_nodes(&forest, &hf);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].label(), Some("NP"));
    }
}
