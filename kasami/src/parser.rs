#![deny(warnings)]

use crate::grammar::{Grammar, SymbolId};
use crate::trees::ParseTree;
use indexmap::IndexMap;
use std::fmt;

/// A contiguous range of the input: `len` chars starting at char `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

/// How a symbol came to be valid over a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    /// Length-1 spans record the char they matched.
    Terminal(char),
    /// Longer spans record the binary production that fired and where the
    /// input was split. Chain rules reuse the entry of what they rename.
    Split {
        left: SymbolId,
        right: SymbolId,
        left_span: Span,
        right_span: Span,
    },
}

// Symbols valid over one span. Insertion order drives the table fill
// iteration and an overwrite keeps the original position.
pub type Cell = IndexMap<SymbolId, Entry>;

/// Triangular CYK table. `cells[len - 1][start]`.
pub struct ParseTable<'g> {
    grammar: &'g Grammar,
    cells: Vec<Vec<Cell>>,
}

/// Outcome of parsing one input. Unknown chars, empty input and
/// ungrammatical input all look the same: not accepted, no tree.
#[derive(Debug)]
pub struct ParseResult {
    pub accepted: bool,
    pub tree: Option<ParseTree>,
}

pub struct CykParser {
    pub grammar: Grammar,
}

///////////////////////////////////////////////////////////////////////////////

impl<'g> ParseTable<'g> {
    pub fn grammar(&self) -> &'g Grammar { self.grammar }

    /// Number of input chars covered by the table.
    pub fn len(&self) -> usize { self.cells.len() }

    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn cell(&self, span: Span) -> Option<&Cell> {
        if span.len == 0 {
            return None;
        }
        self.cells.get(span.len - 1).and_then(|row| row.get(span.start))
    }

    pub fn entry(&self, span: Span, symbol: SymbolId) -> Option<&Entry> {
        self.cell(span).and_then(|cell| cell.get(&symbol))
    }

    pub fn full_span(&self) -> Span {
        Span { start: 0, len: self.len() }
    }

    /// The start symbol derives the whole input.
    pub fn accepts(&self) -> bool {
        !self.is_empty() && self.entry(self.full_span(), self.grammar.start()).is_some()
    }

    /// Materialize the retained derivation of the start symbol.
    pub fn tree(&self) -> Option<ParseTree> {
        if !self.accepts() {
            return None;
        }
        Some(ParseTree::from_table(self, self.full_span(), self.grammar.start()))
    }

    // Write `symbol` and everything chaining up from it. Last write wins.
    fn record(&mut self, span: Span, symbol: SymbolId, entry: Entry) {
        let grammar = self.grammar;
        let cell = &mut self.cells[span.len - 1][span.start];
        for &rf in grammar.closure(symbol) {
            cell.insert(rf, entry);
        }
    }
}

impl fmt::Debug for ParseTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            writeln!(f, "=== Length {} ===", row + 1)?;
            for (start, cell) in cells.iter().enumerate() {
                let symbols = cell.keys()
                    .map(|id| self.grammar.display_name(*id))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(f, "{}: {}", start, symbols)?;
            }
        }
        Ok(())
    }
}

impl CykParser {
    pub fn new(grammar: Grammar) -> CykParser {
        CykParser{grammar}
    }

    /// Fill the CYK table for `input`. None when a char isn't produced by
    /// any literal of the grammar.
    pub fn table(&self, input: &str) -> Option<ParseTable<'_>> {
        let chars: Vec<char> = input.chars().collect();
        let n = chars.len();
        let mut table = ParseTable {
            grammar: &self.grammar,
            cells: (0..n).map(|row| vec![Cell::new(); n - row]).collect(),
        };

        for (start, &c) in chars.iter().enumerate() {
            let ids = self.grammar.terminal_ids(c);
            if ids.is_empty() {
                log::debug!("Parse Error: unrecognized char {:?} at {}", c, start);
                return None;
            }
            for &r in ids {
                table.record(Span { start, len: 1 }, r, Entry::Terminal(c));
            }
        }

        for len in 2..=n {
            for start in 0..=(n - len) {
                for split in 1..len {
                    let left_span = Span { start, len: split };
                    let right_span = Span { start: start + split, len: len - split };
                    // Gather first, the cell being written is borrowed mutably
                    let mut derived = Vec::new();
                    for &r1 in table.cells[left_span.len - 1][left_span.start].keys() {
                        for &r2 in table.cells[right_span.len - 1][right_span.start].keys() {
                            for &r in self.grammar.binary_heads(r1, r2) {
                                derived.push((r, Entry::Split {
                                    left: r1, right: r2, left_span, right_span
                                }));
                            }
                        }
                    }
                    for (r, entry) in derived {
                        table.record(Span { start, len }, r, entry);
                    }
                }
            }
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("CYK table for {:?}\n{:?}", input, table);
        }
        Some(table)
    }

    pub fn parse(&self, input: &str) -> ParseResult {
        if input.is_empty() {
            log::debug!("Parse Error: empty input");
            return ParseResult { accepted: false, tree: None };
        }
        let tree = self.table(input).and_then(|table| {
            let tree = table.tree();
            if tree.is_none() {
                log::debug!("Parse Error: start symbol doesn't span {:?}", input);
            }
            tree
        });
        ParseResult { accepted: tree.is_some(), tree }
    }
}
