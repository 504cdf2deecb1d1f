//! The condition algebra: boolean combinators over `Relation + NodeDescriptions`
//! leaves. Every variant exposes `search`, a generator over witnesses at a
//! fixed anchor, reified here as a `Vec` since input trees are finite.

use crate::node_description::NodeDescriptions;
use crate::relation::Relation;
use crate::search::SearchCtx;
use crate::tree::Tree;

#[derive(Debug, Clone)]
pub enum Condition {
    Leaf(Relation, NodeDescriptions),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
    Opt(Box<Condition>),
}

impl Condition {
    /// Evaluates this condition at `anchor`, returning one witness (the
    /// anchor, possibly repeated) per successful path through the
    /// condition tree.
    pub fn search<'f>(&self, anchor: Tree<'f>, ctx: &mut SearchCtx<'f, '_>) -> Vec<Tree<'f>> {
        match self {
            Condition::Leaf(relation, descriptions) => {
                let mut out = Vec::new();
                for candidate in relation.candidates(anchor, ctx.head_finder) {
                    if descriptions.matches_at(candidate, ctx) {
                        out.push(anchor);
                    }
                }
                out
            }
            Condition::And(children) => {
                let snapshot = ctx.backrefs.snapshot();
                let mut anchors = vec![anchor];
                for child in children {
                    let mut next = Vec::new();
                    for &a in &anchors {
                        next.extend(child.search(a, ctx));
                    }
                    anchors = next;
                    if anchors.is_empty() {
                        break;
                    }
                }
                if anchors.is_empty() {
                    ctx.backrefs.restore(snapshot);
                }
                anchors
            }
            Condition::Or(children) => {
                let mut out = Vec::new();
                for child in children {
                    out.extend(child.search(anchor, ctx));
                }
                out
            }
            Condition::Not(child) => {
                let snapshot = ctx.backrefs.snapshot();
                let witnesses = child.search(anchor, ctx);
                ctx.backrefs.restore(snapshot);
                if witnesses.is_empty() {
                    vec![anchor]
                } else {
                    vec![]
                }
            }
            Condition::Opt(child) => {
                let witnesses = child.search(anchor, ctx);
                if witnesses.is_empty() {
                    vec![anchor]
                } else {
                    witnesses
                }
            }
        }
    }

    /// Every name declared anywhere within this condition tree (including
    /// the node-descriptions of its `Leaf`s), used to reject a name
    /// declared under negation or twice in one conjunction scope.
    pub fn names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names(&self, out: &mut Vec<String>) {
        match self {
            Condition::Leaf(_, d) => out.extend(d.name.clone()),
            Condition::And(cs) | Condition::Or(cs) => {
                for c in cs {
                    c.collect_names(out);
                }
            }
            Condition::Not(c) | Condition::Opt(c) => c.collect_names(out),
        }
    }
}
