//! Error kinds produced by tree ingestion, pattern compilation, and the
//! back-reference API. Parse-time diagnostics carry the offending token's
//! column so a caller can render a caret pointer beneath the pattern text.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TreeFormatError {
    #[error("unmatched closing parenthesis")]
    UnmatchedCloseParen,
    #[error("unbalanced parentheses: reached end of input with open parens")]
    UnbalancedParens,
}

/// The specific defect behind a [`ParseError`], independent of where in
/// the pattern text it occurred.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseErrorKind {
    #[error("illegal character {0:?}")]
    IllegalChar(char),
    #[error("unsupported regex flag {0:?}, only 'i' and 'x' are allowed")]
    BadRegexFlag(char),
    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),
    #[error("unexpected end of pattern, expected {0}")]
    UnexpectedEof(String),
    #[error("name {0:?} declared more than once in the same scope")]
    DuplicateName(String),
    #[error("name {0:?} cannot be declared inside a negated condition")]
    NameUnderNegation(String),
    #[error("reference to undeclared back-reference name {0:?}")]
    UndeclaredName(String),
    #[error("child index 0 is not allowed; indices are 1-based")]
    ZeroChildIndex,
    #[error("multi-relation argument list must not be empty")]
    EmptyMultiRelationArgs,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("{kind} (at column {column})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, column: usize) -> Self {
        ParseError { kind, column }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("no back-reference named {0:?} was declared in this pattern")]
pub struct UnknownBackRef(pub String);

/// Top-level error type for anything the core crate reports to a caller.
#[derive(Debug, Error)]
pub enum TregexError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    TreeFormat(#[from] TreeFormatError),
    #[error(transparent)]
    UnknownBackRef(#[from] UnknownBackRef),
}
