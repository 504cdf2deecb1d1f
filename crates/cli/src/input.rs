//! Resolves the `pattern` subcommand's `[FILES...]` argument list to tree
//! text. No arguments reads stdin; each argument that names a directory is
//! walked with `ignore::WalkBuilder` so directory and glob-like arguments
//! expand to every file underneath, rather than requiring one explicit
//! file path per tree.

use std::fs::read_to_string;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

use crate::error::ErrorContext as EC;

/// One resolved tree-text source: either a concrete file path or stdin.
pub struct InputSource {
    pub path: Option<PathBuf>,
    pub text: String,
}

pub fn resolve(args: &[PathBuf]) -> Result<Vec<InputSource>> {
    if args.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context(EC::BadTreeInput(None))?;
        return Ok(vec![InputSource { path: None, text }]);
    }
    let mut sources = Vec::new();
    for arg in args {
        if arg.is_dir() {
            collect_dir(arg, &mut sources)?;
        } else {
            sources.push(read_one(arg)?);
        }
    }
    Ok(sources)
}

fn collect_dir(dir: &Path, out: &mut Vec<InputSource>) -> Result<()> {
    let walker = WalkBuilder::new(dir).build();
    for entry in walker {
        let entry = entry.with_context(|| EC::ReadFile(dir.to_path_buf()))?;
        let is_file = entry
            .file_type()
            .map(|t| t.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        out.push(read_one(entry.path())?);
    }
    Ok(())
}

fn read_one(path: &Path) -> Result<InputSource> {
    let text = read_to_string(path).with_context(|| EC::ReadFile(path.to_path_buf()))?;
    Ok(InputSource {
        path: Some(path.to_path_buf()),
        text,
    })
}
