//! `pprint <TREE>`: parses one tree string and box-draws it.

use anyhow::{Context, Result};
use tregex_core::Forest;

use crate::error::ErrorContext as EC;

pub fn run(tree: &str) -> Result<()> {
    let forest = Forest::parse_str(tree).context(EC::BadTreeInput(None))?;
    for root in forest.roots() {
        print!("{}", root.render());
    }
    Ok(())
}
