//! Command tokenizer
//!
//! Splits a single stage command into argv tokens so it can be passed to the
//! container without a shell.

/// Splits a command string on whitespace, honouring single and double quotes
///
/// - A quoted region is closed only by the quote character that opened it;
///   the other kind of quote inside it is literal.
/// - Quote characters themselves are dropped.
/// - An unterminated quote swallows the rest of the input, which is still
///   emitted as the last token.
/// - No escape sequences are recognised.
///
/// # Example
/// ```
/// use sonic_runner::command::tokenize;
///
/// assert_eq!(
///     tokenize(r#"echo "hello world" 'foo bar'"#),
///     vec!["echo", "hello world", "foo bar"]
/// );
/// ```
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match (c, quote) {
            ('"' | '\'', None) => quote = Some(c),
            ('"' | '\'', Some(open)) if open == c => quote = None,
            (c, None) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (c, _) => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
