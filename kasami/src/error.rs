#![deny(warnings)]

use std::{error, fmt};

/// Reasons a grammar fails to compile. Compilation stops at the first one.
/// `line` is 1-based and refers to the rule line (or physical line when the
/// grammar came through the loader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The line doesn't split into exactly a head and a body on `=`.
    MalformedRule { line: usize, text: String },
    /// A quoted region is still open at the end of the text being split.
    UnterminatedQuote { line: usize, text: String },
    /// The quote char shows up somewhere other than wrapping the token.
    MalformedTerminal { line: usize, token: String },
    /// A literal with nothing between its quotes.
    EmptyLiteral { line: usize, token: String },
}

impl GrammarError {
    pub fn line(&self) -> usize {
        match self {
            GrammarError::MalformedRule { line, .. } => *line,
            GrammarError::UnterminatedQuote { line, .. } => *line,
            GrammarError::MalformedTerminal { line, .. } => *line,
            GrammarError::EmptyLiteral { line, .. } => *line,
        }
    }
}

impl error::Error for GrammarError {}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MalformedRule { line, text } => {
                write!(f, "line {}: expected `Rule = body`, got {:?}", line, text)
            }
            GrammarError::UnterminatedQuote { line, text } => {
                write!(f, "line {}: unterminated quote in {:?}", line, text)
            }
            GrammarError::MalformedTerminal { line, token } => {
                write!(f, "line {}: malformed terminal {}", line, token)
            }
            GrammarError::EmptyLiteral { line, token } => {
                write!(f, "line {}: empty literal {}", line, token)
            }
        }
    }
}
