#![deny(warnings)]

use crate::error::GrammarError;
use crate::loader;
use crate::tokenizer::split_quoted;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Dense id for rule names and for symbols synthesized while flattening.
pub type SymbolId = usize;

/// A compiled grammar in binary form. Every production either consumes a
/// single char (terminal table), renames a symbol (unit table) or joins two
/// symbols (binary table). Id 0 is the start symbol.
#[derive(Clone)]
pub struct Grammar {
    // every name mentioned in the grammar, in id assignment order
    symbols: IndexMap<String, SymbolId>,
    // names that were defined as a rule head
    rule_names: HashMap<SymbolId, String>,
    terminals: HashMap<char, Vec<SymbolId>>,
    units: HashMap<SymbolId, Vec<SymbolId>>,
    binaries: HashMap<(SymbolId, SymbolId), Vec<SymbolId>>,
    closures: Vec<Vec<SymbolId>>,
}

impl Grammar {
    /// Compile an ordered sequence of rule lines with the default quote.
    pub fn compile<I, S>(lines: I) -> Result<Grammar, GrammarError>
        where I: IntoIterator<Item=S>, S: AsRef<str>
    {
        let mut compiler = GrammarCompiler::default();
        for line in lines {
            compiler.add_rule(line.as_ref());
        }
        compiler.into_grammar()
    }

    pub fn start(&self) -> SymbolId { 0 }

    pub fn num_symbols(&self) -> usize { self.closures.len() }

    /// Id of any name mentioned in the grammar (head or reference).
    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    /// Name of a symbol that was defined as a rule head.
    pub fn rule_name(&self, id: SymbolId) -> Option<&str> {
        self.rule_names.get(&id).map(|s| s.as_str())
    }

    /// Mentioned names and their ids, in the order ids were handed out.
    pub fn symbols(&self) -> impl Iterator<Item=(&str, SymbolId)> {
        self.symbols.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Rule heads ordered by id.
    pub fn rule_names(&self) -> Vec<(SymbolId, &str)> {
        let mut names: Vec<_> = self.rule_names.iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        names.sort_unstable_by_key(|(id, _)| *id);
        names
    }

    pub fn terminal_ids(&self, c: char) -> &[SymbolId] {
        self.terminals.get(&c).map_or(&[], |ids| ids.as_slice())
    }

    pub fn unit_heads(&self, id: SymbolId) -> &[SymbolId] {
        self.units.get(&id).map_or(&[], |ids| ids.as_slice())
    }

    pub fn binary_heads(&self, left: SymbolId, right: SymbolId) -> &[SymbolId] {
        self.binaries.get(&(left, right)).map_or(&[], |ids| ids.as_slice())
    }

    /// Symbols reachable from `id` through unit productions, `id` first.
    pub fn closure(&self, id: SymbolId) -> &[SymbolId] {
        self.closures.get(id).map_or(&[], |ids| ids.as_slice())
    }

    /// Printable name for any id. Synthesized symbols show as `<id>`.
    pub fn display_name(&self, id: SymbolId) -> String {
        if let Some(name) = self.rule_name(id) {
            return name.to_string();
        }
        self.symbols.iter()
            .find(|(_, sid)| **sid == id)
            .map_or_else(|| format!("<{}>", id), |(name, _)| name.clone())
    }
}

// Breadth-first walk of the unit table. Unlike a plain queue this keeps a
// visited set so that cyclic chain rules terminate.
fn unit_closure(units: &HashMap<SymbolId, Vec<SymbolId>>, id: SymbolId) -> Vec<SymbolId> {
    let mut collection = vec![id];
    let mut seen = HashSet::from([id]);
    let mut queue = VecDeque::from([id]);
    while let Some(r) = queue.pop_front() {
        for &rf in units.get(&r).into_iter().flatten() {
            if seen.insert(rf) {
                collection.push(rf);
                queue.push_back(rf);
            }
        }
    }
    collection
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Start: {}", self.display_name(self.start()))?;
        let mut terminals: Vec<_> = self.terminals.iter().collect();
        terminals.sort_unstable_by_key(|(c, _)| **c);
        for (c, ids) in terminals {
            for id in ids {
                writeln!(f, "{} -> {:?}", self.display_name(*id), c)?;
            }
        }
        let mut units: Vec<_> = self.units.iter().collect();
        units.sort_unstable_by_key(|(id, _)| **id);
        for (body, heads) in units {
            for head in heads {
                writeln!(f, "{} -> {}", self.display_name(*head), self.display_name(*body))?;
            }
        }
        let mut binaries: Vec<_> = self.binaries.iter().collect();
        binaries.sort_unstable_by_key(|(key, _)| **key);
        for ((l, r), heads) in binaries {
            for head in heads {
                writeln!(f, "{} -> {} {}", self.display_name(*head),
                         self.display_name(*l), self.display_name(*r))?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    /// Compile a whole grammar document, skipping comments and blank lines.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        GrammarCompiler::default().document(text).into_grammar()
    }
}

///////////////////////////////////////////////////////////////////////////////

/// Builds a Grammar from `Rule = Alt | Alt` lines. Tables stay growable here
/// and are frozen by `into_grammar`. The first error sticks and any line
/// added after it is ignored.
pub struct GrammarCompiler {
    quote: char,
    comment: char,
    next_id: SymbolId,
    lines_seen: usize,
    symbols: IndexMap<String, SymbolId>,
    rule_names: HashMap<SymbolId, String>,
    terminals: HashMap<char, Vec<SymbolId>>,
    units: HashMap<SymbolId, Vec<SymbolId>>,
    binaries: HashMap<(SymbolId, SymbolId), Vec<SymbolId>>,
    error: Option<GrammarError>,
}

impl Default for GrammarCompiler {
    fn default() -> Self {
        GrammarCompiler {
            quote: '"',
            comment: '#',
            next_id: 0,
            lines_seen: 0,
            symbols: IndexMap::new(),
            rule_names: HashMap::new(),
            terminals: HashMap::new(),
            units: HashMap::new(),
            binaries: HashMap::new(),
            error: None,
        }
    }
}

impl GrammarCompiler {
    /// Character delimiting literals. Also escapes separators inside them.
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Marker for comment lines when feeding whole documents.
    pub fn comment(mut self, comment: char) -> Self {
        self.comment = comment;
        self
    }

    pub fn rule(mut self, line: &str) -> Self {
        self.add_rule(line);
        self
    }

    /// Feed a whole grammar document. Errors report physical line numbers.
    pub fn document(mut self, text: &str) -> Self {
        for (lineno, line) in loader::rule_lines(text, self.comment) {
            self.lines_seen = lineno;
            self.add_line(lineno, line);
        }
        self
    }

    // Non chaining version to be invoked in loops
    pub fn add_rule(&mut self, line: &str) {
        self.lines_seen += 1;
        self.add_line(self.lines_seen, line);
    }

    pub fn into_grammar(self) -> Result<Grammar, GrammarError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let closures: Vec<_> = (0..self.next_id)
            .map(|id| unit_closure(&self.units, id))
            .collect();
        log::debug!("Compiled grammar: {} symbols, {} rules, {} terminals",
                    closures.len(), self.rule_names.len(), self.terminals.len());
        Ok(Grammar {
            symbols: self.symbols,
            rule_names: self.rule_names,
            terminals: self.terminals,
            units: self.units,
            binaries: self.binaries,
            closures,
        })
    }

    fn fresh_id(&mut self) -> SymbolId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn name_id(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.symbols.get(name) {
            return *id;
        }
        let id = self.fresh_id();
        self.symbols.insert(name.to_string(), id);
        id
    }

    fn split(&self, lineno: usize, text: &str, sep: char) -> Result<Vec<String>, GrammarError> {
        split_quoted(text, sep, self.quote)
            .map(|tokens| tokens.iter().map(|t| t.trim_matches(' ').to_string()).collect())
            .map_err(|_| GrammarError::UnterminatedQuote {
                line: lineno, text: text.to_string()
            })
    }

    // Literal iff the quote char wraps the token and doesn't appear inside.
    fn is_terminal(&self, lineno: usize, token: &str) -> Result<bool, GrammarError> {
        match token.matches(self.quote).count() {
            0 => Ok(false),
            2 if token.len() > 1 && token.starts_with(self.quote) && token.ends_with(self.quote) => {
                Ok(true)
            }
            _ => Err(GrammarError::MalformedTerminal {
                line: lineno, token: token.to_string()
            }),
        }
    }

    // Pop the last two ids and replace them with a fresh one deriving both,
    // until `keep` ids remain. This nests to the right: a b c -> a (b c).
    fn fold_right(&mut self, ids: &mut Vec<SymbolId>, keep: usize) {
        while ids.len() > keep {
            let (Some(right), Some(left)) = (ids.pop(), ids.pop()) else { break };
            let combined = self.fresh_id();
            self.binaries.entry((left, right)).or_default().push(combined);
            ids.push(combined);
        }
    }

    fn add_literal(&mut self, lineno: usize, token: &str) -> Result<SymbolId, GrammarError> {
        let text = &token[self.quote.len_utf8()..token.len() - self.quote.len_utf8()];
        if text.is_empty() {
            return Err(GrammarError::EmptyLiteral { line: lineno, token: token.to_string() });
        }
        let mut ids = Vec::new();
        for c in text.chars() {
            let id = self.fresh_id();
            self.terminals.entry(c).or_default().push(id);
            ids.push(id);
        }
        self.fold_right(&mut ids, 1);
        Ok(ids[0])
    }

    fn add_line(&mut self, lineno: usize, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.compile_line(lineno, line) {
            log::debug!("Rejecting grammar: {}", e);
            self.error = Some(e);
        }
    }

    fn compile_line(&mut self, lineno: usize, line: &str) -> Result<(), GrammarError> {
        let parts = self.split(lineno, line, '=')?;
        let [head, body] = parts.as_slice() else {
            return Err(GrammarError::MalformedRule { line: lineno, text: line.to_string() });
        };
        let rule_id = self.name_id(head);
        self.rule_names.insert(rule_id, head.clone());

        for alternative in self.split(lineno, body, '|')? {
            let mut ids = Vec::new();
            for symbol in self.split(lineno, &alternative, ' ')? {
                let id = if self.is_terminal(lineno, &symbol)? {
                    self.add_literal(lineno, &symbol)?
                } else {
                    self.name_id(&symbol)
                };
                ids.push(id);
            }
            self.fold_right(&mut ids, 2);
            match ids.as_slice() {
                [left, right] => {
                    log::trace!("Adding rule {} -> {} {}", head, left, right);
                    self.binaries.entry((*left, *right)).or_default().push(rule_id);
                }
                [single] => {
                    log::trace!("Adding rule {} -> {}", head, single);
                    self.units.entry(*single).or_default().push(rule_id);
                }
                _ => (),
            }
        }
        Ok(())
    }
}


///////////////////////////////////////////////////////////////////////////////
