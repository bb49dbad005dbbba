use crate::cst::{ExtendedAttribute, ExtendedAttributes, NodeData, NodeId, RhsValue};
use crate::syntax::TokenKind;

use super::{ParseResult, Parser};

/// Token kinds allowed as an extended attribute's right-hand side, both in
/// the single form `[Name=Value]` and the list form `[Name=(A, B)]`.
const RHS_KINDS: &[TokenKind] = &[
    TokenKind::IDENT,
    TokenKind::DECIMAL,
    TokenKind::INTEGER,
    TokenKind::STRING,
];

impl<'a> Parser<'a> {
    /// Parses a bracketed extended-attribute block if one starts here.
    /// Returns `None` without consuming anything when the next token is not
    /// `[`.
    pub(super) fn extended_attributes(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(open) = self.eat(TokenKind::LSQUARE) else {
            return Ok(None);
        };
        let items = self.list(Self::extended_attribute, false, "extended attribute")?;
        let close = self.expect(
            TokenKind::RSQUARE,
            "Unexpected closing token of extended attribute",
        )?;
        if items.is_empty() {
            return Err(self.error("Found an empty extended attribute"));
        }
        if self.at(TokenKind::LSQUARE) {
            return Err(self.error("Illegal double extended attribute lists, consider merging them"));
        }
        Ok(Some(self.push(NodeData::ExtendedAttributes(
            ExtendedAttributes { open, items, close },
        ))))
    }

    pub(super) fn extended_attribute(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(name) = self.eat(TokenKind::IDENT) else {
            return Ok(None);
        };
        let assign = self.eat(TokenKind::EQUAL);
        let mut secondary = None;
        if assign.is_some() {
            secondary = self.eat_any(RHS_KINDS);
        }
        let mut open = None;
        let mut list = Vec::new();
        let mut close = None;
        if let Some(paren) = self.eat(TokenKind::LPAREN) {
            open = Some(paren);
            list = if assign.is_some() && secondary.is_none() {
                self.rhs_value_list()?
            } else {
                self.argument_list()?
            };
            close = Some(self.expect(
                TokenKind::RPAREN,
                "Unexpected token in extended attribute argument list",
            )?);
        } else if assign.is_some() && secondary.is_none() {
            return Err(self.error("No right hand side to extended attribute assignment"));
        }
        Ok(Some(self.push(NodeData::ExtendedAttribute(
            ExtendedAttribute {
                name,
                assign,
                secondary,
                open,
                list,
                close,
                separator: None,
            },
        ))))
    }

    /// Parses the parenthesized value list of forms like
    /// `[Exposed=(Window, Worker)]`. The first value fixes the kind the
    /// remaining values must share.
    fn rhs_value_list(&mut self) -> ParseResult<Vec<NodeId>> {
        let Some(kind) = RHS_KINDS.iter().copied().find(|kind| self.at(*kind)) else {
            return Err(self.error("Expected identifiers, strings, decimals, or integers but none found"));
        };
        self.list(
            |parser| {
                Ok(parser.eat(kind).map(|value| {
                    parser.push(NodeData::RhsValue(RhsValue {
                        value,
                        separator: None,
                    }))
                }))
            },
            false,
            "extended attribute",
        )
    }
}
