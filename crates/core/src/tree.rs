//! The tree model: an arena of labeled, ordered nodes plus the per-node
//! operations the matcher relies on (parent links, preorder, leaf edges,
//! basic category, serialization).
//!
//! Trees are parsed once and never mutated afterwards, so nodes live in a
//! flat arena owned by a [`Forest`] and are addressed by the lightweight,
//! `Copy` [`NodeId`] handle rather than by `Rc`/`RefCell`. A [`Tree`] pairs
//! a `NodeId` with a borrow of the owning `Forest`: an owning arena plus a
//! lightweight borrowing handle.

use std::fmt;

use crate::error::TreeFormatError;

/// Handle to a node stored in a [`Forest`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug)]
struct NodeData {
    label: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    left_edge: u32,
    right_edge: u32,
}

/// Owns the storage for every node of every tree parsed into it.
///
/// A tree string may describe more than one top-level tree; `roots()`
/// lists them in source order.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses whitespace-separated, parenthesized tree text into this
    /// forest, appending any roots found to `roots()`.
    pub fn parse_str(text: &str) -> Result<Forest, TreeFormatError> {
        let mut forest = Forest::new();
        forest.ingest(text)?;
        Ok(forest)
    }

    pub fn ingest(&mut self, text: &str) -> Result<(), TreeFormatError> {
        let tokens = tokenize(text);
        let mut stack: Vec<(Option<String>, Vec<NodeId>)> = Vec::new();
        let mut new_roots = Vec::new();
        let mut iter = tokens.into_iter().peekable();
        while let Some(tok) = iter.next() {
            match tok {
                "(" => {
                    let label = match iter.peek() {
                        Some(&next) if next != "(" && next != ")" => {
                            iter.next();
                            Some(normalize_label(next))
                        }
                        _ => None,
                    };
                    stack.push((label, Vec::new()));
                }
                ")" => {
                    let (label, children) =
                        stack.pop().ok_or(TreeFormatError::UnmatchedCloseParen)?;
                    let id = self.alloc(label, children);
                    push_result(&mut stack, &mut new_roots, id);
                }
                atom => {
                    let id = self.alloc(Some(normalize_label(atom)), Vec::new());
                    push_result(&mut stack, &mut new_roots, id);
                }
            }
        }
        if !stack.is_empty() {
            return Err(TreeFormatError::UnbalancedParens);
        }
        for root in new_roots {
            let unwrapped = self.unwrap_treetop(root);
            self.finalize_edges(unwrapped);
            self.roots.push(unwrapped);
        }
        Ok(())
    }

    fn alloc(&mut self, label: Option<String>, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for &child in &children {
            self.nodes[child.0 as usize].parent = Some(id);
        }
        self.nodes.push(NodeData {
            label,
            parent: None,
            children,
            left_edge: 0,
            right_edge: 0,
        });
        id
    }

    /// Strips a redundant anonymous single-child wrapper: `((X …))` parses
    /// to an outer node with `label = None` and one child, which collapses
    /// to that child. Repeats while the new root still looks the same way.
    fn unwrap_treetop(&mut self, mut root: NodeId) -> NodeId {
        loop {
            let data = &self.nodes[root.0 as usize];
            if data.label.is_none() && data.children.len() == 1 {
                let child = data.children[0];
                self.nodes[child.0 as usize].parent = None;
                root = child;
            } else {
                break;
            }
        }
        root
    }

    fn finalize_edges(&mut self, root: NodeId) {
        let order = self.preorder_ids(root);
        let mut num_leaves = vec![0u32; self.nodes.len()];
        for &id in order.iter().rev() {
            let idx = id.0 as usize;
            if self.nodes[idx].children.is_empty() {
                num_leaves[idx] = 1;
            } else {
                num_leaves[idx] = self.nodes[idx]
                    .children
                    .iter()
                    .map(|c| num_leaves[c.0 as usize])
                    .sum();
            }
        }
        let mut cursor = 0u32;
        for &id in &order {
            let idx = id.0 as usize;
            self.nodes[idx].left_edge = cursor;
            self.nodes[idx].right_edge = cursor + num_leaves[idx];
            if self.nodes[idx].children.is_empty() {
                cursor += 1;
            }
        }
    }

    fn preorder_ids(&self, root: NodeId) -> Vec<NodeId> {
        let mut stack = vec![root];
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = stack.pop() {
            order.push(id);
            let children = &self.nodes[id.0 as usize].children;
            for &child in children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    pub fn roots(&self) -> impl Iterator<Item = Tree<'_>> + '_ {
        self.roots.iter().map(move |&id| self.node(id))
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Tree<'_> {
        Tree { id, forest: self }
    }
}

fn push_result(
    stack: &mut Vec<(Option<String>, Vec<NodeId>)>,
    roots: &mut Vec<NodeId>,
    id: NodeId,
) {
    if let Some(top) = stack.last_mut() {
        top.1.push(id);
    } else {
        roots.push(id);
    }
}

/// Splits tree text into `(`, `)`, and maximal runs of non-paren,
/// non-whitespace atoms.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    let bytes = text.as_bytes();
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | ')' => {
                if let Some(s) = start.take() {
                    tokens.push(&text[s..i]);
                }
                tokens.push(&text[i..i + ch.len_utf8()]);
            }
            c if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    tokens.push(&text[s..i]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..bytes.len()]);
    }
    tokens
}

/// `-LRB-` / `-RRB-` atoms decode to literal `(` / `)`.
pub fn normalize_label(atom: &str) -> String {
    match atom {
        "-LRB-" => "(".to_string(),
        "-RRB-" => ")".to_string(),
        other => other.to_string(),
    }
}

/// Literal brackets in a label re-escape to `-LRB-` / `-RRB-` on output.
pub fn escape_label(label: &str) -> String {
    match label {
        "(" => "-LRB-".to_string(),
        ")" => "-RRB-".to_string(),
        other => other.to_string(),
    }
}

/// A borrowed handle to one node of a [`Forest`].
#[derive(Clone, Copy)]
pub struct Tree<'f> {
    id: NodeId,
    forest: &'f Forest,
}

impl<'f> Tree<'f> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn data(&self) -> &'f NodeData {
        &self.forest.nodes[self.id.0 as usize]
    }

    pub fn label(&self) -> Option<&'f str> {
        self.data().label.as_deref()
    }

    /// The label's prefix up to (excluding) the first `-`, or `None` if
    /// the node has no label.
    pub fn basic_category(&self) -> Option<&'f str> {
        self.label().map(|l| match l.find('-') {
            Some(0) => l, // a label that is only markers, e.g. "-NONE-"; keep as-is
            Some(idx) => &l[..idx],
            None => l,
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    pub fn num_children(&self) -> usize {
        self.data().children.len()
    }

    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    pub fn parent(&self) -> Option<Tree<'f>> {
        self.data().parent.map(|id| self.forest.node(id))
    }

    pub fn child(&self, index: usize) -> Option<Tree<'f>> {
        self.data()
            .children
            .get(index)
            .map(|&id| self.forest.node(id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = Tree<'f>> + 'f {
        let forest = self.forest;
        self.data().children.iter().map(move |&id| forest.node(id))
    }

    pub fn first_child(&self) -> Option<Tree<'f>> {
        self.child(0)
    }

    pub fn last_child(&self) -> Option<Tree<'f>> {
        let n = self.num_children();
        if n == 0 {
            None
        } else {
            self.child(n - 1)
        }
    }

    /// Position among the parent's children, or `None` for a root.
    pub fn sister_index(&self) -> Option<usize> {
        let parent = self.parent()?;
        parent.data().children.iter().position(|&id| id == self.id)
    }

    pub fn siblings(&self) -> impl Iterator<Item = Tree<'f>> + 'f {
        let me = self.id;
        self.parent()
            .into_iter()
            .flat_map(move |p| p.children())
            .filter(move |t| t.id != me)
    }

    /// Ancestors from the immediate parent up to (and including) the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Tree<'f>> + 'f {
        let mut cur = self.parent();
        std::iter::from_fn(move || {
            let next = cur;
            cur = cur.and_then(|t| t.parent());
            next
        })
    }

    /// Every node in the subtree rooted here, in preorder, including self.
    pub fn preorder(&self) -> impl Iterator<Item = Tree<'f>> + 'f {
        let forest = self.forest;
        forest.preorder_ids(self.id).into_iter().map(move |id| forest.node(id))
    }

    /// Proper descendants in preorder (excludes self).
    pub fn descendants(&self) -> impl Iterator<Item = Tree<'f>> + 'f {
        self.preorder().skip(1)
    }

    pub fn leaves(&self) -> impl Iterator<Item = Tree<'f>> + 'f {
        self.preorder().filter(|t| t.is_leaf())
    }

    /// Count of leaves strictly to the left of this node's subtree, within
    /// the leaf sequence of its own top-level root.
    pub fn left_edge(&self) -> u32 {
        self.data().left_edge
    }

    /// `left_edge` plus the number of leaves in this node's own subtree.
    pub fn right_edge(&self) -> u32 {
        self.data().right_edge
    }

    /// Deterministic S-expression rendering, re-escaping literal brackets.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree_string(&mut out);
        out
    }

    fn write_tree_string(&self, out: &mut String) {
        if self.is_leaf() {
            out.push_str(&self.label().map(escape_label).unwrap_or_default());
            return;
        }
        out.push('(');
        if let Some(label) = self.label() {
            out.push_str(&escape_label(label));
        }
        for child in self.children() {
            out.push(' ');
            child.write_tree_string(out);
        }
        out.push(')');
    }

    /// Box-drawing preorder pretty printer, supplementing the engine's
    /// pattern-matching surface with the same rendering the CLI's
    /// `pprint` subcommand exposes.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label().map(escape_label).unwrap_or_else(|| "".to_string()));
        out.push('\n');
        let children: Vec<_> = self.children().collect();
        let last = children.len();
        for (i, child) in children.into_iter().enumerate() {
            child.render_into(&mut out, "", i + 1 == last);
        }
        out
    }

    fn render_into(&self, out: &mut String, prefix: &str, is_last: bool) {
        let branch = if is_last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&self.label().map(escape_label).unwrap_or_else(|| "".to_string()));
        out.push('\n');
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children: Vec<_> = self.children().collect();
        let last = children.len();
        for (i, child) in children.into_iter().enumerate() {
            child.render_into(out, &child_prefix, i + 1 == last);
        }
    }
}

impl fmt::Debug for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tree({})", self.to_tree_string())
    }
}

impl PartialEq for Tree<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.id == other.id
    }
}
impl Eq for Tree<'_> {}
