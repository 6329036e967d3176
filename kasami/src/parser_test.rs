#![deny(warnings)]

use crate::events::EventDispatcher;
use crate::grammar::Grammar;
use crate::parser::{CykParser, Entry, Span};
use proptest::prelude::*;
use std::cell::RefCell;

fn parser(lines: &[&str]) -> CykParser {
    CykParser::new(Grammar::compile(lines).expect("Bad grammar"))
}

fn lipids() -> CykParser {
    let grammar = include_str!("../grammars/lipids.grammar")
        .parse::<Grammar>()
        .expect("Bad lipid grammar");
    CykParser::new(grammar)
}

// Bits -> Bit | Bit Bits
// Bit -> 0 | 1
fn bits() -> CykParser {
    parser(&["Bits = Bit | Bit Bits", "Bit = \"0\" | \"1\""])
}

///////////////////////////////////////////////////////////////////////////////

#[test]
fn two_symbol_rule() {
    let p = parser(&["S = A B", "A = \"a\"", "B = \"b\""]);
    let result = p.parse("ab");
    assert!(result.accepted);
    let tree = result.tree.unwrap();
    let root = tree.root();
    assert_eq!(p.grammar.rule_name(root.rule()), Some("S"));
    let (a, b) = root.children().unwrap();
    assert_eq!((a.rule(), a.terminal()), (p.grammar.symbol_id("A").unwrap(), Some('a')));
    assert_eq!((b.rule(), b.terminal()), (p.grammar.symbol_id("B").unwrap(), Some('b')));

    let seen = RefCell::new(Vec::new());
    let mut ev = EventDispatcher::new(&p.grammar);
    for rule in ["S", "A", "B"] {
        let seen = &seen;
        ev.event(&format!("{}_pre_event", rule), move |_| seen.borrow_mut().push(format!("pre({})", rule)));
        ev.event(&format!("{}_post_event", rule), move |_| seen.borrow_mut().push(format!("post({})", rule)));
    }
    ev.dispatch(&tree);
    assert_eq!(*seen.borrow(),
               vec!["pre(S)", "pre(A)", "post(A)", "pre(B)", "post(B)", "post(S)"]);
}

#[test]
fn chain_rule_is_transparent() {
    let p = parser(&["A = B", "B = \"x\""]);
    let tree = p.parse("x").tree.unwrap();
    assert_eq!(p.grammar.rule_name(tree.root().rule()), Some("A"));
    assert!(tree.root().is_leaf());
    assert_eq!(tree.text(), "x");
}

#[test]
fn cyclic_chain_rules_parse() {
    let p = parser(&["A = B | \"x\"", "B = A"]);
    let result = p.parse("x");
    assert!(result.accepted);
    assert_eq!(result.tree.unwrap().root().rule(), 0);
}

#[test]
fn unknown_char_rejected() {
    let p = parser(&["S = A B", "A = \"a\"", "B = \"b\""]);
    let result = p.parse("ac");
    assert!(!result.accepted);
    assert!(result.tree.is_none());
    assert!(p.table("ac").is_none());
}

#[test]
fn ungrammatical_rejected() {
    let p = parser(&["S = A B", "A = \"a\"", "B = \"b\""]);
    for input in ["ba", "a", "abb", "aab"] {
        let result = p.parse(input);
        assert!(!result.accepted, "{} should be rejected", input);
        assert!(result.tree.is_none());
    }
    // The table is still there, it just doesn't reach the start symbol
    let table = p.table("ba").unwrap();
    assert_eq!(table.len(), 2);
    assert!(!table.accepts());
    assert!(table.tree().is_none());
}

#[test]
fn empty_input_rejected() {
    let p = parser(&["S = \"a\""]);
    let result = p.parse("");
    assert!(!result.accepted);
    assert!(result.tree.is_none());
    assert!(!p.table("").unwrap().accepts());
}

#[test]
fn start_symbol_must_span_everything() {
    // B derives "b" but only S (id 0) counts
    let p = parser(&["S = A B", "A = \"a\"", "B = \"b\""]);
    let table = p.table("b").unwrap();
    let b = p.grammar.symbol_id("B").unwrap();
    assert_eq!(table.entry(Span { start: 0, len: 1 }, b), Some(&Entry::Terminal('b')));
    assert!(!table.accepts());
}

#[test]
fn later_split_wins() {
    // S -> S S | b
    let p = parser(&["S = S S | \"b\""]);
    let table = p.table("bbb").unwrap();
    assert_eq!(table.entry(table.full_span(), 0), Some(&Entry::Split {
        left: 0,
        right: 0,
        left_span: Span { start: 0, len: 2 },
        right_span: Span { start: 2, len: 1 },
    }));
    let tree = table.tree().unwrap();
    let (left, right) = tree.root().children().unwrap();
    assert_eq!((left.text(), right.text()), ("bb".to_string(), "b".to_string()));
}

#[test]
fn later_production_wins() {
    // Both alternatives derive S over "ab", the one registered last is kept
    let p = parser(&["S = A B | C B", "A = \"a\"", "C = \"a\"", "B = \"b\""]);
    let tree = p.parse("ab").tree.unwrap();
    let left = tree.root().left().unwrap();
    assert_eq!(p.grammar.rule_name(left.rule()), Some("C"));

    let p = parser(&["S = C B | A B", "A = \"a\"", "C = \"a\"", "B = \"b\""]);
    let tree = p.parse("ab").tree.unwrap();
    let left = tree.root().left().unwrap();
    // A's literal is compiled first, so A comes first in the "a" cell and
    // the derivation through C is computed last
    assert_eq!(p.grammar.rule_name(left.rule()), Some("C"));
}

#[test]
fn ambiguous_parses_are_reproducible() {
    let lines = ["E = E Op E | Num", "Op = \"+\" | \"*\"", "Num = \"1\" | \"2\" | \"3\""];
    let input = "1+2*3+1*2";
    let a = parser(&lines).parse(input).tree.unwrap();
    let b = parser(&lines).parse(input).tree.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.text(), input);
}

#[test]
fn lipid_names() {
    let p = lipids();
    for accepted in ["LPA 6:1", "PC 16:0/18:1", "PE 18:2/20:4", "LPS 22:6"] {
        assert!(p.parse(accepted).accepted, "{} should parse", accepted);
    }
    for rejected in ["LPA 6", "PC 16:0", "LPC 16:0/18:1", "XY 1:1", "PC16:0/18:1"] {
        assert!(!p.parse(rejected).accepted, "{} shouldn't parse", rejected);
    }
}

#[test]
fn lipid_events() {
    let p = lipids();
    let tree = p.parse("PC 16:0/18:1").tree.unwrap();
    let seen = RefCell::new(Vec::new());
    let mut ev = EventDispatcher::new(&p.grammar);
    for rule in ["HG_PL", "HG_LPL", "Carbon", "DB"] {
        let seen = &seen;
        ev.pre_event(rule, move |n| seen.borrow_mut().push(format!("{}={}", rule, n.text())));
    }
    ev.dispatch(&tree);
    assert_eq!(*seen.borrow(),
               vec!["HG_PL=PC", "Carbon=16", "DB=0", "Carbon=18", "DB=1"]);
}

#[test]
fn grammar_shared_across_threads() {
    let p = lipids();
    let p = &p;
    let inputs = ["LPA 6:1", "PC 16:0/18:1", "PC 16:0"];
    let results: Vec<bool> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs.iter()
            .map(|&input| s.spawn(move || p.parse(input).accepted))
            .collect();
        handles.into_iter().map(|h| h.join().expect("parser thread panicked")).collect()
    });
    assert_eq!(results, vec![true, true, false]);
}

#[test]
fn multibyte_chars() {
    let p = parser(&["S = \"λx\" Body", "Body = \"→\" | \"→\" Body"]);
    let tree = p.parse("λx→→").tree.unwrap();
    assert_eq!(tree.text(), "λx→→");
    assert!(!p.parse("λy→").accepted);
}

proptest! {
    #[test]
    fn matched_text_round_trips(input in "[01]{1,16}") {
        let result = bits().parse(&input);
        prop_assert!(result.accepted);
        prop_assert_eq!(result.tree.map(|t| t.text()), Some(input));
    }

    #[test]
    fn unknown_chars_always_rejected(pre in "[01]{0,6}", bad in "[a-z2-9]", post in "[01]{0,6}") {
        let input = format!("{}{}{}", pre, bad, post);
        let result = bits().parse(&input);
        prop_assert!(!result.accepted);
        prop_assert!(result.tree.is_none());
    }
}
