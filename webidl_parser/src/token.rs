use std::fmt::{Debug, Formatter};

use arcstr::Substr;
use serde::Serialize;

use crate::syntax::TokenKind;

/// Index of a token in the owning document's token vector. Token indices
/// are dense, so the id doubles as the token's `index` field.
pub type TokenId = u32;

/// Strips the single escaping underscore from an identifier lexeme, turning
/// `_interface` into `interface`. Identifiers are compared and indexed by
/// their unescaped form.
pub fn unescape_identifier(text: &str) -> &str {
    text.strip_prefix('_').unwrap_or(text)
}

/// A single token from the source text. The lexeme and the trivia that
/// preceded it are stored as reference-counted substrings of the input, so
/// tokens can be cloned without copying text. Tokens are created by the
/// tokenizer and never change afterwards, except that an identifier whose
/// lexeme is a known keyword is re-kinded before it is emitted, and
/// autofixes may rewrite the trivia to keep surrounding indentation intact.
#[derive(Clone, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    kind: TokenKind,
    #[serde(rename = "value")]
    text: Substr,
    trivia: Substr,
    line: u32,
    index: u32,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: Substr, trivia: Substr, line: u32, index: u32) -> Self {
        Self {
            kind,
            text,
            trivia,
            line,
            index,
        }
    }

    /// Returns the kind of this token.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the exact source text of this token, excluding trivia.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the whitespace and comment text that preceded this token.
    pub fn trivia(&self) -> &str {
        &self.trivia
    }

    /// Returns the 1-based line number at the start of the token.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the 0-based position of the token in the token vector.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the last line of the trivia, which is the indentation that
    /// visually precedes this token in the source.
    pub fn indentation(&self) -> &str {
        match self.trivia.rfind('\n') {
            Some(at) => &self.trivia[at + 1..],
            None => &self.trivia,
        }
    }

    pub(crate) fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }

    pub(crate) fn set_trivia(&mut self, trivia: Substr) {
        self.trivia = trivia;
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{:?}@{}:{}{:?}",
            self.kind,
            self.line,
            self.index,
            self.text.as_str()
        ))?;
        if !self.trivia.is_empty() {
            f.write_fmt(format_args!("  [{:?}]", self.trivia.as_str()))?;
        }
        Ok(())
    }
}
