//! `pattern <PATTERN> [-filter] [-C] [-h NAME...] [FILES...]`: compiles
//! `PATTERN`, runs it over every resolved input tree, and prints either one
//! rendered tree per match, a bare count, or the nodes bound to each
//! requested back-reference name.

use anyhow::{Context, Result};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config as TermConfig};
use tracing::instrument;

use std::path::PathBuf;

use tregex_core::{Forest, RightHeadFinder, TregexError, TregexPattern};

use crate::error::ErrorContext as EC;
use crate::input;

#[derive(clap::Args)]
pub struct PatternArg {
    /// The tregex pattern to compile and run.
    pub pattern: String,

    /// Print only the number of matches, not the matched trees.
    #[clap(short = 'C', long)]
    pub count: bool,

    /// Treat standard input as one tree per line and print each line whose
    /// tree the pattern matches at least once, verbatim and unmodified,
    /// instead of printing rendered matches. Ignores any `FILES` argument.
    #[clap(long)]
    pub filter: bool,

    /// Print the nodes bound to this back-reference name instead of the
    /// anchor match. May be given more than once; names are printed in
    /// the order given.
    #[clap(short = 'h', long = "handle", value_name = "NAME")]
    pub handles: Vec<String>,

    /// Tree input files or directories. Reads stdin if none are given.
    pub files: Vec<PathBuf>,
}

#[instrument(skip(arg), fields(pattern = %arg.pattern))]
pub fn run(arg: PatternArg) -> Result<()> {
    let mut pattern = compile_or_report(&arg.pattern)?;

    if arg.filter {
        return run_filter(&mut pattern);
    }

    let sources = input::resolve(&arg.files)?;

    let mut total = 0usize;
    for source in &sources {
        let forest = Forest::parse_str(&source.text)
            .with_context(|| EC::BadTreeInput(source.path.clone()))?;
        let hf = RightHeadFinder;
        let matches = pattern.find_all_nodes(&forest, &hf);
        total += matches.len();

        if arg.count {
            continue;
        }
        if arg.handles.is_empty() {
            for m in &matches {
                println!("{}", m.to_tree_string());
            }
        } else {
            for name in &arg.handles {
                let ids = pattern
                    .get_nodes(name)
                    .map_err(|_| EC::UnknownBackRef(name.clone()))?;
                for &id in ids {
                    println!("{}: {}", name, forest.node(id).to_tree_string());
                }
            }
        }
    }

    if arg.count {
        println!("{total}");
    }
    Ok(())
}

/// `--filter` mode: one tree per line of stdin, each line that the pattern
/// matches printed back verbatim. A malformed line is skipped rather than
/// aborting the whole stream, so a single bad line in a large corpus does
/// not lose every line after it.
fn run_filter(pattern: &mut TregexPattern) -> Result<()> {
    use std::io::BufRead;
    let stdin = std::io::stdin();
    let hf = RightHeadFinder;
    for line in stdin.lock().lines() {
        let line = line.with_context(|| EC::BadTreeInput(None))?;
        if line.trim().is_empty() {
            continue;
        }
        let forest = match Forest::parse_str(&line) {
            Ok(f) => f,
            Err(_) => continue,
        };
        if !pattern.find_all(&forest, &hf).is_empty() {
            println!("{line}");
        }
    }
    Ok(())
}

/// Compiles `text`, rendering a `ParseError` as a column-pointer diagnostic
/// via `codespan-reporting` before returning the CLI-facing error.
fn compile_or_report(text: &str) -> Result<TregexPattern> {
    match TregexPattern::compile(text) {
        Ok(p) => Ok(p),
        Err(TregexError::Parse(err)) => {
            let file = SimpleFile::new("<pattern>", text);
            let len = text.chars().count();
            let start = err.column.min(len);
            let range = start..(start + 1).min(len).max(start);
            let diagnostic = Diagnostic::error()
                .with_message(err.kind.to_string())
                .with_labels(vec![Label::primary((), range)]);
            let writer = StandardStream::stderr(ColorChoice::Auto);
            let _ = term::emit(&mut writer.lock(), &TermConfig::default(), &file, &diagnostic);
            Err(EC::BadPattern.into())
        }
        Err(other) => Err(other).context(EC::BadPattern),
    }
}
