//! `explain <OP>`: prints a one-line glossary entry for a relation operator
//! or grammar term. The table below is plain documentation data, not
//! pattern text.

use anyhow::{anyhow, Result};

use crate::error::ErrorContext as EC;

const ENTRIES: &[(&str, &str)] = &[
    ("<", "A < B: A immediately dominates B (B is a direct child of A)."),
    (">", "A > B: A is immediately dominated by B (A is a direct child of B)."),
    ("<<", "A << B: A dominates B (B is a proper descendant of A)."),
    (">>", "A >> B: A is dominated by B (A is a proper descendant of B)."),
    ("<:", "A <: B: B is the only child of A."),
    (">:", "A >: B: A is the only child of B."),
    ("<,", "A <, B: B is the leftmost child of A."),
    (">,", "A >, B: A is the leftmost child of B."),
    ("<-", "A <- B (alias <`): B is the rightmost child of A."),
    (">-", "A >- B (alias >`): A is the rightmost child of B."),
    ("<<,", "A <<, B: B is the leftmost descendant of A."),
    (">>,", "A >>, B: A is the leftmost descendant of B."),
    ("<<-", "A <<- B: B is the rightmost descendant of A."),
    (">>-", "A >>- B: A is the rightmost descendant of B."),
    ("$", "A $ B: A and B are sisters (share a parent)."),
    ("$++", "A $++ B (alias $..): B is a left sister of A, not necessarily adjacent."),
    ("$--", "A $-- B (alias $,,): B is a right sister of A, not necessarily adjacent."),
    ("$+", "A $+ B (alias $.): B is the immediate left sister of A."),
    ("$-", "A $- B (alias $,): B is the immediate right sister of A."),
    ("==", "A == B: A and B are the same node."),
    ("<=", "A <= B: A dominates or equals B (A < B or A == B)."),
    ("<<:", "A <<: B: A dominates B via an unbroken chain of single-child nodes."),
    (">>:", "A >>: B: A is dominated by B via an unbroken chain of single-child nodes."),
    ("..", "A .. B: A precedes B (A's right edge is left of B's left edge)."),
    (",,", "A ,, B: A follows B (A's left edge is right of B's right edge)."),
    (".", "A . B: A immediately precedes B (no leaf lies between them)."),
    (",", "A , B: A immediately follows B."),
    (":", "A : B: every node matches (B constrains nothing beyond existing)."),
    ("<#", "A <# B: B is the head of A (per the active head finder)."),
    (">#", "A ># B: A is the head of B."),
    ("<<#", "A <<# B: B heads the projection chain rooted at A."),
    (">>#", "A >># B: A heads the projection chain rooted at B."),
    ("<N", "A <N B: B is A's Nth child, 1-indexed; N<0 counts from the right."),
    (">N", "A >N B: A is B's Nth child, 1-indexed; N<0 counts from the right."),
    ("<<<N", "A <<<N B: B dominates the Nth leaf under A, 1-indexed from the left."),
    ("<<<-N", "A <<<-N B: B dominates the Nth leaf under A, counted from the right."),
    ("<+", "A <+(C) B: B is reached from A by a chain of nodes all matching C, ending in an immediate-dominance step."),
    (">+", "A >+(C) B: the dual of <+ walking upward."),
    (".+", "A .+(C) B: B is reached from A by a chain of C-matching nodes via immediate precedence."),
    (",+", "A ,+(C) B: the dual of .+ walking backward."),
    ("<...", "A <...{B;C;D} B: A's children are exactly B, C, D in that order, no more, no fewer."),
    ("_ROOT_", "A reserved node description matching only a tree's root node."),
    ("__", "The wildcard node description; matches any node."),
    ("basic category", "A node label's prefix up to its first '-', used by the '@' basic-category modifier."),
    ("back-reference", "A name bound with '=NAME' on a node description; read back with '~NAME' or the CLI's '-h NAME'."),
];

pub fn run(term: &str) -> Result<()> {
    let hit = ENTRIES
        .iter()
        .find(|(op, _)| op.eq_ignore_ascii_case(term))
        .ok_or_else(|| anyhow!(EC::UnknownExplainTerm(term.to_string())))?;
    println!("{}", hit.1);
    Ok(())
}
