#![deny(warnings)]

mod error;
pub use crate::error::GrammarError;

mod loader;
pub use crate::loader::rule_lines;

mod tokenizer;
pub use crate::tokenizer::{split_quoted, Unterminated};

mod grammar;
pub use crate::grammar::{Grammar, GrammarCompiler, SymbolId};

mod parser;
pub use crate::parser::{Cell, CykParser, Entry, ParseResult, ParseTable, Span};

mod trees;
pub use crate::trees::{Node, NodeId, NodeRef, ParseTree};

mod events;
pub use crate::events::{Callback, EventDispatcher, POST_EVENT_SUFFIX, PRE_EVENT_SUFFIX};

#[cfg(test)]
mod parser_test;
