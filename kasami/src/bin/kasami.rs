use anyhow::Context;
use kasami::{CykParser, Grammar};
use std::str::FromStr;

fn init_logging() -> anyhow::Result<()> {
    let level = std::env::var("RUST_LOG").ok()
        .and_then(|level| log::LevelFilter::from_str(&level).ok())
        .unwrap_or(log::LevelFilter::Warn);
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )
    .context("installing logger")
}

fn report(parser: &CykParser, input: &str) {
    let result = parser.parse(input);
    println!("accepted: {}", result.accepted);
    if let Some(tree) = result.tree {
        print!("{}", tree.print(&parser.grammar));
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: kasami <grammar-file> [input...]")?;
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading grammar {}", path))?;
    let grammar = Grammar::from_str(&text)
        .with_context(|| format!("compiling grammar {}", path))?;
    log::debug!("{:?}", grammar);
    let parser = CykParser::new(grammar);

    // Input on the command line is parsed once, otherwise read a prompt
    let words: Vec<String> = args.collect();
    if !words.is_empty() {
        report(&parser, &words.join(" "));
        return Ok(());
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    while let Ok(line) = rl.readline("~> ") {
        rl.add_history_entry(line.as_str())?;
        report(&parser, &line);
    }
    Ok(())
}
