//! Shared search state threaded through node-description and condition
//! evaluation: the back-reference table being written to, and the head
//! finder the head-projection relations delegate to.

use std::marker::PhantomData;

use crate::backref::BackRefTable;
use crate::head_finder::HeadFinder;
use crate::tree::Tree;

pub struct SearchCtx<'f, 'h> {
    pub backrefs: BackRefTable,
    pub head_finder: &'h dyn HeadFinder,
    _anchor: PhantomData<Tree<'f>>,
}

impl<'f, 'h> SearchCtx<'f, 'h> {
    pub fn new(backrefs: BackRefTable, head_finder: &'h dyn HeadFinder) -> Self {
        SearchCtx { backrefs, head_finder, _anchor: PhantomData }
    }
}
