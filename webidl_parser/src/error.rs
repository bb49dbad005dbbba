use serde::Serialize;
use thiserror::Error;

use crate::token::Token;

/// How many tokens on either side of the offending token contribute to the
/// printed context window.
const MAX_CONTEXT_TOKENS: usize = 5;

/// A fatal error raised by the tokenizer or the parser. The field set is a
/// stable wire contract: serialized as JSON it exposes `message`,
/// `bareMessage`, `context`, `line`, `sourceName`, `input`, and `tokens`.
#[derive(Clone, Debug, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct SyntaxError {
    /// The decorated message, including the line number and context window.
    pub message: String,
    /// The raw message without any source decoration.
    pub bare_message: String,
    /// A printable window of source text around the offending token, with a
    /// caret marking the token itself.
    pub context: String,
    /// 1-based line number of the offending token.
    pub line: u32,
    /// Optional label for the input, supplied by the caller.
    pub source_name: Option<String>,
    /// The original input text.
    pub input: String,
    /// The token vector produced before the error was raised.
    pub tokens: Vec<Token>,
}

impl SyntaxError {
    pub(crate) fn new(
        tokens: &[Token],
        index: usize,
        input: &str,
        source_name: Option<&str>,
        bare_message: &str,
    ) -> Self {
        let line = tokens
            .get(index)
            .map(|token| token.line())
            .unwrap_or_else(|| tokens.last().map(|token| token.line()).unwrap_or(1));
        let context = context_window(tokens, index);
        let message = decorate("Syntax", line, source_name, &context, bare_message);
        Self {
            message,
            bare_message: bare_message.to_string(),
            context,
            line,
            source_name: source_name.map(str::to_string),
            input: input.to_string(),
            tokens: tokens.to_vec(),
        }
    }
}

/// Renders the source text surrounding the token at `index`: the last line
/// of up to five preceding tokens (with their trivia), the first line of the
/// offending token and up to four that follow it, and a caret positioned
/// under the offending token.
pub fn context_window(tokens: &[Token], index: usize) -> String {
    let Some(offending) = tokens.get(index) else {
        return String::new();
    };

    let mut preceding = String::new();
    for token in &tokens[index.saturating_sub(MAX_CONTEXT_TOKENS)..index] {
        preceding.push_str(token.trivia());
        preceding.push_str(token.text());
    }
    preceding.push_str(offending.trivia());
    let last_line = match preceding.rfind('\n') {
        Some(at) => &preceding[at + 1..],
        None => &preceding,
    };

    let mut subsequent = String::from(offending.text());
    for token in tokens.iter().skip(index + 1).take(MAX_CONTEXT_TOKENS - 1) {
        subsequent.push_str(token.trivia());
        subsequent.push_str(token.text());
    }
    let first_line = match subsequent.find('\n') {
        Some(at) => &subsequent[..at],
        None => &subsequent,
    };

    format!(
        "{last_line}{first_line}\n{caret:>width$}",
        caret = "^",
        width = last_line.chars().count() + 1,
    )
}

/// Builds the decorated message shared by syntax errors and validation
/// diagnostics.
pub fn decorate(
    kind: &str,
    line: u32,
    source_name: Option<&str>,
    context: &str,
    bare_message: &str,
) -> String {
    let in_name = match source_name {
        Some(name) => format!(" in {name}"),
        None => String::new(),
    };
    format!("{kind} error at line {line}{in_name}:\n{context}\n{bare_message}")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer;

    #[test]
    fn caret_points_at_the_offending_token() {
        let tokens = lexer::tokenize("interface Foo {".into(), None).unwrap();
        // The opening brace is the third token.
        let context = context_window(&tokens, 2);
        let lines: Vec<&str> = context.split('\n').collect();
        assert_eq!(lines[0], "interface Foo {");
        assert_eq!(lines[1], "              ^");
    }

    #[test]
    fn window_is_bounded_by_surrounding_lines() {
        let tokens = lexer::tokenize("interface A {};\ninterface B {\n};".into(), None).unwrap();
        // Token 8 is B's opening brace; the window must not leak into the
        // previous or following lines.
        let index = tokens
            .iter()
            .position(|t| t.text() == "{" && t.line() == 2)
            .unwrap();
        let context = context_window(&tokens, index);
        assert!(context.starts_with("interface B {\n"));
    }
}
