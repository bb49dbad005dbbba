use arcstr::ArcStr;
use memchr::{memchr, memchr_iter};

use crate::error::SyntaxError;
use crate::syntax::{keyword_kind, TokenKind, PUNCTUATIONS, RESERVED_IDENTIFIERS};
use crate::token::{unescape_identifier, Token};

/// Splits an entire source text into its token vector. The final token is
/// always `eof`, carrying any trailing whitespace and comments as trivia.
pub(crate) fn tokenize(source: ArcStr, source_name: Option<&str>) -> Result<Vec<Token>, SyntaxError> {
    Tokenizer::new(source, source_name, 0).tokenize()
}

/// Tokenizes a short literal fragment, numbering its tokens starting at
/// `first_index` so they can be appended to an existing token vector
/// without breaking index density. Used by autofixes to synthesize tokens.
pub(crate) fn tokenize_fragment(fragment: &str, first_index: u32) -> Result<Vec<Token>, SyntaxError> {
    Tokenizer::new(ArcStr::from(fragment), None, first_index).tokenize()
}

/// A hand-written scanner equivalent to the grammar's anchored lexing
/// rules. The tokenizer owns a cursor into the source, a pending-trivia
/// start offset, a line counter, and the tokens emitted so far; each loop
/// iteration dispatches on the byte at the cursor.
struct Tokenizer {
    source: ArcStr,
    source_name: Option<String>,
    /// Current byte offset into the text.
    position: usize,
    /// Start offset of the whitespace/comment run that will become the next
    /// token's trivia.
    trivia_start: usize,
    line: u32,
    index: u32,
    tokens: Vec<Token>,
}

impl Tokenizer {
    fn new(source: ArcStr, source_name: Option<&str>, first_index: u32) -> Self {
        Self {
            source,
            source_name: source_name.map(str::to_string),
            position: 0,
            trivia_start: 0,
            line: 1,
            index: first_index,
            tokens: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        while !self.is_eof() {
            let current = self.current();
            match current {
                b'\t' | b'\n' | b'\r' | b' ' => self.consume_whitespace(),
                b'/' if self.try_consume_comment() => {}
                b'-' | b'.' | b'0'..=b'9' | b'A'..=b'Z' | b'_' | b'a'..=b'z' => {
                    if let Some(end) = self.scan_decimal() {
                        self.emit(TokenKind::DECIMAL, end);
                    } else if let Some(end) = self.scan_integer() {
                        self.emit(TokenKind::INTEGER, end);
                    } else if let Some(end) = self.scan_identifier() {
                        self.emit_identifier(end)?;
                    } else if !self.try_punctuation() {
                        self.consume_other()?;
                    }
                }
                b'"' => {
                    if let Some(end) = self.scan_string() {
                        self.emit(TokenKind::STRING, end);
                    } else if !self.try_punctuation() {
                        self.consume_other()?;
                    }
                }
                _ => {
                    if !self.try_punctuation() {
                        self.consume_other()?;
                    }
                }
            }
        }

        // The remaining trivia buffer belongs to the terminal eof token.
        let trivia = self.source.substr(self.trivia_start..self.position);
        let text = self.source.substr(self.position..self.position);
        self.tokens
            .push(Token::new(TokenKind::EOF, text, trivia, self.line, self.index));
        Ok(self.tokens)
    }

    //#region Trivia

    /// Consumes a contiguous run of ASCII whitespace into the pending trivia
    /// buffer, advancing the line counter for each newline.
    fn consume_whitespace(&mut self) {
        let start = self.position;
        while !self.is_eof() && matches!(self.current(), b'\t' | b'\n' | b'\r' | b' ') {
            self.position += 1;
        }
        self.count_lines(start, self.position);
    }

    /// Attempts to consume a `//` line comment or a `/* */` block comment as
    /// trivia. An unterminated block comment is not trivia; the slash falls
    /// through to be scanned as an `other` token.
    fn try_consume_comment(&mut self) -> bool {
        let rest = &self.source.as_bytes()[self.position..];
        match rest.get(1) {
            Some(b'/') => {
                let end = match memchr(b'\n', rest) {
                    Some(at) => self.position + at,
                    None => self.source.len(),
                };
                self.position = end;
                true
            }
            Some(b'*') => match find_block_comment_end(&rest[2..]) {
                Some(at) => {
                    let start = self.position;
                    self.position += 2 + at + 2;
                    self.count_lines(start, self.position);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn count_lines(&mut self, start: usize, end: usize) {
        self.line += memchr_iter(b'\n', &self.source.as_bytes()[start..end]).count() as u32;
    }
    //#endregion

    //#region Scanners

    /// A floating point literal: digits around a decimal point with an
    /// optional exponent, or digits followed by a mandatory exponent.
    fn scan_decimal(&self) -> Option<usize> {
        let bytes = self.source.as_bytes();
        let mut at = self.position;
        if bytes.get(at) == Some(&b'-') {
            at += 1;
        }
        let int_digits = digit_run(bytes, &mut at);
        if bytes.get(at) == Some(&b'.') {
            at += 1;
            let frac_digits = digit_run(bytes, &mut at);
            if int_digits == 0 && frac_digits == 0 {
                return None;
            }
            scan_exponent(bytes, &mut at);
            Some(at)
        } else if int_digits > 0 && scan_exponent(bytes, &mut at) {
            Some(at)
        } else {
            None
        }
    }

    /// An integer literal: hexadecimal (`0x…`), octal (`0…`), or decimal.
    fn scan_integer(&self) -> Option<usize> {
        let bytes = self.source.as_bytes();
        let mut at = self.position;
        if bytes.get(at) == Some(&b'-') {
            at += 1;
        }
        match bytes.get(at) {
            Some(b'0') => {
                at += 1;
                if matches!(bytes.get(at), Some(b'X' | b'x'))
                    && bytes.get(at + 1).is_some_and(u8::is_ascii_hexdigit)
                {
                    at += 1;
                    while bytes.get(at).is_some_and(u8::is_ascii_hexdigit) {
                        at += 1;
                    }
                } else {
                    while matches!(bytes.get(at), Some(b'0'..=b'7')) {
                        at += 1;
                    }
                }
                Some(at)
            }
            Some(b'1'..=b'9') => {
                at += 1;
                digit_run(bytes, &mut at);
                Some(at)
            }
            _ => None,
        }
    }

    /// An identifier: an optional leading `_` or `-`, an ASCII letter, then
    /// any run of letters, digits, `_`, and `-`.
    fn scan_identifier(&self) -> Option<usize> {
        let bytes = self.source.as_bytes();
        let mut at = self.position;
        if matches!(bytes.get(at), Some(b'_' | b'-')) {
            at += 1;
        }
        if !bytes.get(at).is_some_and(u8::is_ascii_alphabetic) {
            return None;
        }
        at += 1;
        while bytes
            .get(at)
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-'))
        {
            at += 1;
        }
        Some(at)
    }

    /// A double-quoted string. The body may span lines but may not contain
    /// another quote; an unterminated string is not a token.
    fn scan_string(&self) -> Option<usize> {
        let rest = &self.source.as_bytes()[self.position + 1..];
        memchr(b'"', rest).map(|at| self.position + 1 + at + 1)
    }
    //#endregion

    //#region Emission

    fn try_punctuation(&mut self) -> bool {
        for (lexeme, kind) in PUNCTUATIONS {
            if self.source[self.position..].starts_with(lexeme) {
                self.emit(*kind, self.position + lexeme.len());
                return true;
            }
        }
        false
    }

    /// Emits the single character at the cursor as an `other` token. Any
    /// character except whitespace and ASCII alphanumerics qualifies; if
    /// even that fails the token stream cannot progress and the tokenizer
    /// aborts.
    fn consume_other(&mut self) -> Result<(), SyntaxError> {
        let current = self.current();
        if current.is_ascii_alphanumeric() || matches!(current, b'\t' | b'\n' | b'\r' | b' ') {
            return Err(self.fatal("Token stream not progressing"));
        }
        let char_len = self.source[self.position..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.emit(TokenKind::OTHER, self.position + char_len);
        Ok(())
    }

    /// Emits an identifier token after checking the reserved list and
    /// rewriting the kind of known keywords. The reserved check runs before
    /// keyword rewriting, so escaped spellings of reserved words are still
    /// rejected.
    fn emit_identifier(&mut self, end: usize) -> Result<(), SyntaxError> {
        let lexeme = &self.source[self.position..end];
        if RESERVED_IDENTIFIERS.contains(&lexeme) {
            let message = format!(
                "{} is a reserved identifier and must not be used.",
                unescape_identifier(lexeme)
            );
            self.emit(TokenKind::IDENT, end);
            return Err(self.fatal(&message));
        }
        let kind = keyword_kind(lexeme).unwrap_or(TokenKind::IDENT);
        self.emit(kind, end);
        Ok(())
    }

    /// Creates a token from the cursor up to `end`, attaching the pending
    /// trivia buffer and clearing it.
    fn emit(&mut self, kind: TokenKind, end: usize) {
        let text = self.source.substr(self.position..end);
        let trivia = self.source.substr(self.trivia_start..self.position);
        self.tokens
            .push(Token::new(kind, text, trivia, self.line, self.index));
        self.position = end;
        self.trivia_start = end;
        self.index += 1;
    }

    /// Builds a fatal error bound to the most recently emitted token.
    fn fatal(&self, message: &str) -> SyntaxError {
        let index = self.tokens.len().saturating_sub(1);
        SyntaxError::new(
            &self.tokens,
            index,
            &self.source,
            self.source_name.as_deref(),
            message,
        )
    }

    fn current(&self) -> u8 {
        self.source.as_bytes()[self.position]
    }

    fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }
    //#endregion
}

fn digit_run(bytes: &[u8], at: &mut usize) -> usize {
    let start = *at;
    while bytes.get(*at).is_some_and(u8::is_ascii_digit) {
        *at += 1;
    }
    *at - start
}

/// Consumes an `e`/`E` exponent with an optional sign if one is fully
/// present at `at`, returning whether it matched. A dangling `e` without
/// digits is left unconsumed.
fn scan_exponent(bytes: &[u8], at: &mut usize) -> bool {
    if !matches!(bytes.get(*at), Some(b'E' | b'e')) {
        return false;
    }
    let mut probe = *at + 1;
    if matches!(bytes.get(probe), Some(b'+' | b'-')) {
        probe += 1;
    }
    if digit_run(bytes, &mut probe) == 0 {
        return false;
    }
    *at = probe;
    true
}

/// Finds the offset of the closing `*/` in `bytes`, which starts just after
/// the opening `/*`.
fn find_block_comment_end(bytes: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(at) = memchr(b'*', &bytes[from..]) {
        let star = from + at;
        if bytes.get(star + 1) == Some(&b'/') {
            return Some(star);
        }
        from = star + 1;
    }
    None
}

#[cfg(test)]
mod test {
    use test_case::test_case;

    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input.into(), None)
            .unwrap()
            .iter()
            .map(|token| token.kind())
            .collect()
    }

    #[test_case("1.5", TokenKind::DECIMAL ; "simple decimal")]
    #[test_case(".5", TokenKind::DECIMAL ; "leading dot")]
    #[test_case("-.5", TokenKind::DECIMAL ; "negative leading dot")]
    #[test_case("1.", TokenKind::DECIMAL ; "trailing dot")]
    #[test_case("1e5", TokenKind::DECIMAL ; "bare exponent")]
    #[test_case("1.5e-2", TokenKind::DECIMAL ; "fraction with signed exponent")]
    #[test_case("42", TokenKind::INTEGER ; "decimal integer")]
    #[test_case("-9", TokenKind::INTEGER ; "negative integer")]
    #[test_case("0x1F", TokenKind::INTEGER ; "hexadecimal")]
    #[test_case("0755", TokenKind::INTEGER ; "octal")]
    #[test_case("0", TokenKind::INTEGER ; "zero")]
    fn numbers(input: &str, expected: TokenKind) {
        assert_eq!(kinds(input), vec![expected, TokenKind::EOF]);
    }

    #[test]
    fn dangling_exponent_falls_back_to_integer() {
        let tokens = tokenize("1e".into(), None).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::INTEGER);
        assert_eq!(tokens[0].text(), "1");
        assert_eq!(tokens[1].kind(), TokenKind::IDENT);
        assert_eq!(tokens[1].text(), "e");
    }

    #[test]
    fn incomplete_hex_stops_at_the_zero() {
        let tokens = tokenize("0x".into(), None).unwrap();
        assert_eq!(tokens[0].text(), "0");
        assert_eq!(tokens[1].kind(), TokenKind::IDENT);
        assert_eq!(tokens[1].text(), "x");
    }

    #[test]
    fn keywords_are_rekinded_with_their_lexemes_intact() {
        let tokens = tokenize("interface -Infinity Foo".into(), None).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::INTERFACE_KW);
        assert_eq!(tokens[0].text(), "interface");
        assert_eq!(tokens[1].kind(), TokenKind::NEG_INFINITY_KW);
        assert_eq!(tokens[1].text(), "-Infinity");
        assert_eq!(tokens[2].kind(), TokenKind::IDENT);
    }

    #[test_case("toString" ; "bare toString")]
    #[test_case("_toString" ; "escaped toString")]
    #[test_case("_constructor" ; "escaped constructor")]
    fn reserved_identifiers_are_rejected(input: &str) {
        let error = tokenize(input.into(), None).unwrap_err();
        assert_eq!(
            error.bare_message,
            format!(
                "{} is a reserved identifier and must not be used.",
                unescape_identifier(input)
            )
        );
    }

    #[test]
    fn bare_constructor_is_a_keyword_not_an_error() {
        let tokens = tokenize("constructor".into(), None).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::CONSTRUCTOR_KW);
    }

    #[test]
    fn comment_only_input_becomes_eof_trivia() {
        let tokens = tokenize("//comment\n".into(), None).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::EOF);
        assert_eq!(tokens[0].trivia(), "//comment\n");
    }

    #[test]
    fn block_comments_and_whitespace_merge_into_trivia() {
        let tokens = tokenize("/* a */  // b\ninterface".into(), None).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::INTERFACE_KW);
        assert_eq!(tokens[0].trivia(), "/* a */  // b\n");
        assert_eq!(tokens[0].line(), 2);
    }

    #[test]
    fn unterminated_block_comment_degrades_to_other_tokens() {
        let tokens = tokenize("/* oops".into(), None).unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::OTHER);
        assert_eq!(tokens[0].text(), "/");
        assert_eq!(tokens[1].kind(), TokenKind::OTHER);
        assert_eq!(tokens[1].text(), "*");
        assert_eq!(tokens[2].kind(), TokenKind::IDENT);
    }

    #[test]
    fn lines_are_counted_through_trivia() {
        let tokens = tokenize("\n\ninterface\nFoo".into(), None).unwrap();
        assert_eq!(tokens[0].line(), 3);
        assert_eq!(tokens[1].line(), 4);
    }

    #[test]
    fn indices_are_dense_and_match_positions() {
        let tokens = tokenize("interface Foo { };".into(), None).unwrap();
        for (position, token) in tokens.iter().enumerate() {
            assert_eq!(token.index() as usize, position);
        }
    }

    #[test]
    fn ellipsis_wins_over_single_dots() {
        assert_eq!(
            kinds("..."),
            vec![TokenKind::ELLIPSIS, TokenKind::EOF]
        );
        // A single dot matches nothing else and degrades to `other`.
        assert_eq!(kinds("."), vec![TokenKind::OTHER, TokenKind::EOF]);
    }

    #[test]
    fn trivia_and_lexemes_reconstruct_the_input() {
        let input = "  interface /* x */ Foo {\n  // member\n  attribute long a;\n};\n";
        let tokens = tokenize(input.into(), None).unwrap();
        let mut rebuilt = String::new();
        for token in &tokens {
            rebuilt.push_str(token.trivia());
            rebuilt.push_str(token.text());
        }
        assert_eq!(rebuilt, input);
    }
}
