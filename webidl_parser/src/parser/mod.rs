use crate::cst::{Document, NodeData, NodeId};
use crate::error::SyntaxError;
use crate::syntax::TokenKind;
use crate::token::{Token, TokenId};

mod arguments;
mod definitions;
mod ext_attrs;
mod members;
mod types;

pub(crate) type ParseResult<T> = Result<T, SyntaxError>;

/// A parse function for one kind of container member. Parsers are tried in
/// a fixed order against the next token; returning `None` means the member
/// consumed nothing and the next parser may try.
type MemberParser<'a> = fn(&mut Parser<'a>) -> ParseResult<Option<NodeId>>;

#[derive(Clone, Copy)]
pub(super) struct Checkpoint {
    position: usize,
    nodes: usize,
}

/// Recursive-descent parser over a fully lexed token vector. The cursor is
/// a plain index; speculative productions save it with [`Parser::checkpoint`]
/// and restore it with [`Parser::rewind`], which also drops any nodes the
/// failed attempt allocated.
pub(crate) struct Parser<'a> {
    doc: &'a mut Document,
    position: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(doc: &'a mut Document) -> Self {
        Self { doc, position: 0 }
    }

    /// Starts a parser at an arbitrary token, used to run a single
    /// production over tokens synthesized from an autofix fragment.
    pub(crate) fn at_token(doc: &'a mut Document, position: TokenId) -> Self {
        Self {
            doc,
            position: position as usize,
        }
    }

    fn current(&self) -> &Token {
        &self.doc.tokens()[self.position]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind()
    }

    /// True iff the current token has the given kind. Never consumes.
    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consumes and returns the current token if it has the given kind.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<TokenId> {
        self.eat_if(|current| current == kind)
    }

    /// Consumes the current token if its kind is any of `kinds`.
    pub(super) fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<TokenId> {
        self.eat_if(|current| kinds.contains(&current))
    }

    pub(super) fn eat_if(&mut self, accept: impl Fn(TokenKind) -> bool) -> Option<TokenId> {
        if !accept(self.current_kind()) {
            return None;
        }
        let id = self.position as TokenId;
        self.position += 1;
        Some(id)
    }

    /// Consumes a token of the given kind or raises a syntax error. Used for
    /// the mandatory parts of a production that has already committed.
    pub(super) fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<TokenId> {
        self.eat(kind).ok_or_else(|| self.error(message))
    }

    /// Builds a syntax error bound to the current token.
    pub(super) fn error(&self, message: &str) -> SyntaxError {
        self.error_at(self.position as TokenId, message)
    }

    /// Builds a syntax error bound to a specific token, for rules that point
    /// at an already-consumed token rather than the cursor.
    pub(super) fn error_at(&self, token: TokenId, message: &str) -> SyntaxError {
        SyntaxError::new(
            self.doc.tokens(),
            token as usize,
            self.doc.source(),
            self.doc.source_name(),
            message,
        )
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            nodes: self.doc.node_count(),
        }
    }

    /// Restores the cursor to a saved position and discards the nodes built
    /// by the abandoned attempt, so a later alternative starts clean.
    pub(super) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.doc.truncate_nodes(checkpoint.nodes);
    }

    pub(super) fn push(&mut self, data: NodeData) -> NodeId {
        self.doc.push_node(data)
    }

    pub(super) fn token_text(&self, id: TokenId) -> &str {
        self.doc.token(id).text()
    }

    pub(super) fn token_kind(&self, id: TokenId) -> TokenKind {
        self.doc.token(id).kind()
    }

    pub(super) fn set_separator(&mut self, node: NodeId, separator: Option<TokenId>) {
        self.doc.data_mut(node).set_separator(separator);
    }

    pub(super) fn attach_ext_attrs(&mut self, node: NodeId, ext_attrs: Option<NodeId>) {
        if let Some(ext_attrs) = ext_attrs {
            self.doc.data_mut(node).set_ext_attrs(Some(ext_attrs));
            self.doc.set_parent(ext_attrs, Some(node));
        }
    }

    /// Parses a comma-separated list of items. A comma with no item after it
    /// is an error unless the production allows a dangling separator (enums
    /// do). Each item stores its own trailing separator token.
    pub(super) fn list(
        &mut self,
        parser: impl Fn(&mut Self) -> ParseResult<Option<NodeId>>,
        allow_dangler: bool,
        list_name: &str,
    ) -> ParseResult<Vec<NodeId>> {
        let mut items = Vec::new();
        let Some(first) = parser(self)? else {
            return Ok(items);
        };
        let mut separator = self.eat(TokenKind::COMMA);
        self.set_separator(first, separator);
        items.push(first);
        while separator.is_some() {
            let Some(item) = parser(self)? else {
                if allow_dangler {
                    break;
                }
                return Err(self.error(&format!("Trailing comma in {list_name}")));
            };
            separator = self.eat(TokenKind::COMMA);
            self.set_separator(item, separator);
            items.push(item);
        }
        Ok(items)
    }

    /// Parses the body of a container: members are attempted against the
    /// ordered parser list until `}` closes the body. Extended attributes
    /// are parsed once per member here and attached to whichever production
    /// matched.
    pub(super) fn container_body(
        &mut self,
        type_name: &str,
        member_parsers: &[MemberParser<'a>],
    ) -> ParseResult<ContainerBody> {
        let mut members = Vec::new();
        loop {
            if let Some(close) = self.eat(TokenKind::RCURLY) {
                let termination = self.expect(
                    TokenKind::SEMICOLON,
                    &format!("Missing semicolon after {type_name}"),
                )?;
                return Ok(ContainerBody {
                    members,
                    close,
                    termination,
                });
            }
            let ext_attrs = self.extended_attributes()?;
            let mut member = None;
            for parse in member_parsers {
                member = parse(self)?;
                if member.is_some() {
                    break;
                }
            }
            let Some(member) = member else {
                return Err(self.error("Unknown member"));
            };
            self.attach_ext_attrs(member, ext_attrs);
            members.push(member);
        }
    }
}

pub(super) struct ContainerBody {
    pub members: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

impl Document {
    /// Tokenizes and parses a bracketed extended-attribute block from a
    /// literal fragment such as `"[Exposed=Window]"`, appending the new
    /// tokens to this document.
    pub fn synthesize_ext_attrs(&mut self, fragment: &str) -> Result<NodeId, SyntaxError> {
        let first = self.append_fragment_tokens(fragment)?;
        let mut parser = Parser::at_token(self, first);
        let block = parser.extended_attributes()?;
        block.ok_or_else(|| parser.error("Expected an extended attributes block"))
    }

    /// Tokenizes and parses a single extended attribute from a fragment such
    /// as `"Exposed=Window,"`. A trailing comma becomes the new attribute's
    /// separator so it can be spliced in front of existing attributes.
    pub fn synthesize_ext_attr(&mut self, fragment: &str) -> Result<NodeId, SyntaxError> {
        let first = self.append_fragment_tokens(fragment)?;
        let mut parser = Parser::at_token(self, first);
        let Some(attr) = parser.extended_attribute()? else {
            return Err(parser.error("Expected an extended attribute"));
        };
        let separator = parser.eat(TokenKind::COMMA);
        parser.set_separator(attr, separator);
        Ok(attr)
    }

    /// Tokenizes and parses a constructor member from a fragment such as
    /// `"\n  constructor();"`.
    pub fn synthesize_constructor(&mut self, fragment: &str) -> Result<NodeId, SyntaxError> {
        let first = self.append_fragment_tokens(fragment)?;
        let mut parser = Parser::at_token(self, first);
        let member = parser.constructor_member()?;
        member.ok_or_else(|| parser.error("Expected a constructor"))
    }

    /// Tokenizes and parses a default value from a fragment such as
    /// `" = {}"`.
    pub fn synthesize_default(&mut self, fragment: &str) -> Result<NodeId, SyntaxError> {
        let first = self.append_fragment_tokens(fragment)?;
        let mut parser = Parser::at_token(self, first);
        let default = parser.default_value()?;
        default.ok_or_else(|| parser.error("Expected a default value"))
    }

    /// Tokenizes a fragment expected to hold exactly one significant token,
    /// such as `"optional"`, and returns that token's id.
    pub fn synthesize_token(&mut self, fragment: &str) -> Result<TokenId, SyntaxError> {
        self.append_fragment_tokens(fragment)
    }
}
