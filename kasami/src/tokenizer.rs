#![deny(warnings)]

/// The scan ended while still inside a quoted region.
#[derive(Debug, PartialEq, Eq)]
pub struct Unterminated;

// Split `text` on `sep` unless it shows up between `quote` chars.
// Quote chars stay in the tokens and empty tokens are dropped.
pub fn split_quoted(text: &str, sep: char, quote: char) -> Result<Vec<String>, Unterminated> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut in_quote = false;
    for c in text.chars() {
        if c == sep && !in_quote {
            if !token.is_empty() {
                tokens.push(std::mem::take(&mut token));
            }
            continue;
        }
        if c == quote {
            in_quote = !in_quote;
        }
        token.push(c);
    }
    if in_quote {
        return Err(Unterminated);
    }
    if !token.is_empty() {
        tokens.push(token);
    }
    Ok(tokens)
}
