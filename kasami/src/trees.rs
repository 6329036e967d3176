#![deny(warnings)]

use crate::grammar::{Grammar, SymbolId};
use crate::parser::{Entry, ParseTable, Span};

/// Index of a node inside its `ParseTree`.
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    // ("Digit", '7')
    Leaf { rule: SymbolId, terminal: char },
    // ("Number", [Digit, Number])
    Branch { rule: SymbolId, left: NodeId, right: NodeId },
}

/// A binary parse tree for one derivation. Nodes live in an arena and own
/// their children by index, so the tree outlives the table it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: NodeId,
}

/// Borrowed view of a node, what event callbacks get to look at.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t ParseTree,
    id: NodeId,
}

impl Node {
    pub fn rule(&self) -> SymbolId {
        match self {
            Node::Leaf { rule, .. } => *rule,
            Node::Branch { rule, .. } => *rule,
        }
    }
}

impl ParseTree {
    // Follow backpointers down from (span, symbol). Chain rules share the
    // entry of the symbol they rename so they never add a layer.
    pub(crate) fn from_table(table: &ParseTable, span: Span, symbol: SymbolId) -> ParseTree {
        let mut nodes = Vec::new();
        let root = Self::walker(table, span, symbol, &mut nodes);
        ParseTree { nodes, root }
    }

    fn walker(table: &ParseTable, span: Span, rule: SymbolId, nodes: &mut Vec<Node>) -> NodeId {
        let entry = table.entry(span, rule).expect("BUG: backpointer to a missing entry");
        let node = match *entry {
            Entry::Terminal(terminal) => Node::Leaf { rule, terminal },
            Entry::Split { left, right, left_span, right_span } => {
                let left = Self::walker(table, left_span, left, nodes);
                let right = Self::walker(table, right_span, right, nodes);
                Node::Branch { rule, left, right }
            }
        };
        nodes.push(node);
        nodes.len() - 1
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { tree: self, id: self.root }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Matched text of the whole tree.
    pub fn text(&self) -> String { self.root().text() }

    /// Render the tree one node per line using rule names from `grammar`.
    pub fn print(&self, grammar: &Grammar) -> String {
        let mut out = String::new();
        self.root().print_helper(grammar, "", &mut out);
        out
    }
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId { self.id }

    pub fn node(&self) -> &'t Node { &self.tree.nodes[self.id] }

    /// Symbol id labeling this node.
    pub fn rule(&self) -> SymbolId { self.node().rule() }

    pub fn terminal(&self) -> Option<char> {
        match self.node() {
            Node::Leaf { terminal, .. } => Some(*terminal),
            Node::Branch { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool { self.terminal().is_some() }

    pub fn children(&self) -> Option<(NodeRef<'t>, NodeRef<'t>)> {
        match self.node() {
            Node::Leaf { .. } => None,
            Node::Branch { left, right, .. } => Some((
                NodeRef { tree: self.tree, id: *left },
                NodeRef { tree: self.tree, id: *right },
            )),
        }
    }

    pub fn left(&self) -> Option<NodeRef<'t>> { self.children().map(|(l, _)| l) }

    pub fn right(&self) -> Option<NodeRef<'t>> { self.children().map(|(_, r)| r) }

    /// Concatenation of the leaves under this node. Recomputed every call.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match self.children() {
            None => out.extend(self.terminal()),
            Some((left, right)) => {
                left.collect_text(out);
                right.collect_text(out);
            }
        }
    }

    fn print_helper(&self, grammar: &Grammar, level: &str, out: &mut String) {
        let name = grammar.display_name(self.rule());
        match self.children() {
            None => {
                if let Some(c) = self.terminal() {
                    *out += &format!("{}`-- {} ==> {:?}\n", level, name, c);
                }
            }
            Some((left, right)) => {
                *out += &format!("{}`-- {}\n", level, name);
                left.print_helper(grammar, &format!("{}  |", level), out);
                right.print_helper(grammar, &format!("{}   ", level), out);
            }
        }
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "NodeRef({}, {:?})", self.id, self.node())
    }
}

///////////////////////////////////////////////////////////////////////////////
