use anyhow::{Error, Result};

use std::fmt;
use std::path::PathBuf;

/// One variant per CLI-facing failure category. Mirrors the core crate's
/// error kinds but adds the context a command-line user needs: which file,
/// which subcommand argument, and an exit code distinct from a bare `1`
/// where that is useful to a calling script.
#[derive(Debug, Clone)]
pub enum ErrorContext {
    BadPattern,
    BadTreeInput(Option<PathBuf>),
    ReadFile(PathBuf),
    UnknownBackRef(String),
    UnknownExplainTerm(String),
}

impl ErrorContext {
    fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorContext::BadPattern => write!(f, "the pattern could not be compiled"),
            ErrorContext::BadTreeInput(Some(path)) => {
                write!(f, "{} does not contain a well-formed tree", path.display())
            }
            ErrorContext::BadTreeInput(None) => {
                write!(f, "standard input does not contain a well-formed tree")
            }
            ErrorContext::ReadFile(path) => write!(f, "could not read {}", path.display()),
            ErrorContext::UnknownBackRef(name) => {
                write!(f, "no back-reference named {name:?} was bound by this pattern")
            }
            ErrorContext::UnknownExplainTerm(term) => {
                write!(f, "no glossary entry for {term:?}")
            }
        }
    }
}

impl std::error::Error for ErrorContext {}

/// Top-level error handler: downcasts to an `ErrorContext` to print a
/// short user-facing line and exit with its code; otherwise falls back to
/// anyhow's default chain-of-causes rendering.
pub fn exit_with_error(error: Error) -> Result<()> {
    if let Some(e) = error.downcast_ref::<clap::Error>() {
        e.exit()
    }
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        eprintln!("error: {ctx}");
        for cause in error.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(ctx.exit_code())
    }
    Err(error)
}
