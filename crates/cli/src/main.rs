mod error;
mod explain_cmd;
mod input;
mod pattern_cmd;
mod pprint_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use error::exit_with_error;
use pattern_cmd::PatternArg;

#[derive(Parser)]
#[clap(author, version, about = "Search labeled, ordered, rooted trees with a tregex-style pattern language", long_about = None)]
struct App {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a pattern and search one or more trees.
    #[clap(display_order = 1)]
    Pattern(PatternArg),
    /// Print a one-line glossary entry for a relation operator or term.
    #[clap(display_order = 2)]
    Explain {
        /// The operator or grammar term to explain, e.g. "<<" or "_ROOT_".
        term: String,
    },
    /// Parse and box-draw a single tree string.
    #[clap(display_order = 3)]
    Pprint {
        /// The tree string to render.
        tree: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();
    let result = match app.command {
        Commands::Pattern(arg) => pattern_cmd::run(arg),
        Commands::Explain { term } => explain_cmd::run(&term),
        Commands::Pprint { tree } => pprint_cmd::run(&tree),
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) => exit_with_error(e),
    }
}
