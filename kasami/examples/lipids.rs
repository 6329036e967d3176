// Parse lipid shorthand names and report their parts as the tree is walked.
fn main() {
    let grammar: kasami::Grammar = include_str!("../grammars/lipids.grammar")
        .parse()
        .expect("Bad Grammar");
    let parser = kasami::CykParser::new(grammar);

    let mut events = kasami::EventDispatcher::new(&parser.grammar);
    events.event("HG_LPL_pre_event", |n| println!("headgroup: {}", n.text()));
    events.event("HG_PL_pre_event", |n| println!("headgroup: {}", n.text()));
    events.event("Carbon_pre_event", |n| println!("carbon length: {}", n.text()));
    events.event("DB_pre_event", |n| println!("DB length: {}", n.text()));

    let names: Vec<String> = if std::env::args().len() > 1 {
        vec![std::env::args().skip(1).collect::<Vec<_>>().join(" ")]
    } else {
        vec!["LPA 6:1".to_string(), "PC 16:0/18:1".to_string()]
    };

    for name in names {
        let result = parser.parse(&name);
        println!("{}: {}", name, result.accepted);
        if let Some(tree) = result.tree {
            events.dispatch(&tree);
        }
    }
}
