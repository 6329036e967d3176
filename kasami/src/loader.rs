#![deny(warnings)]

/// Rule lines of a grammar document paired with their 1-based line number.
/// Lines are trimmed; blank ones and those starting with `comment` are
/// skipped.
pub fn rule_lines(text: &str, comment: char) -> impl Iterator<Item=(usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(move |(_, line)| !line.is_empty() && !line.starts_with(comment))
}
