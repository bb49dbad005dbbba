use crate::cst::{Argument, DefaultValue, NodeData, NodeId};
use crate::syntax::TokenKind;
use crate::token::TokenId;

use super::{ParseResult, Parser};

impl<'a> Parser<'a> {
    pub(super) fn argument_list(&mut self) -> ParseResult<Vec<NodeId>> {
        self.list(Self::argument, false, "arguments list")
    }

    /// Parses a single argument. The attempt may consume extended attributes
    /// and a full type before discovering there is no name; absence restores
    /// the cursor so the caller can try something else.
    fn argument(&mut self) -> ParseResult<Option<NodeId>> {
        let start = self.checkpoint();
        let ext_attrs = self.extended_attributes()?;
        let optional = self.eat(TokenKind::OPTIONAL_KW);
        let Some(idl_type) = self.type_with_ext_attrs()? else {
            self.rewind(start);
            return Ok(None);
        };
        let variadic = match optional {
            None => self.eat(TokenKind::ELLIPSIS),
            Some(_) => None,
        };
        let name = self
            .eat(TokenKind::IDENT)
            .or_else(|| self.eat_if(|kind| kind.is_argument_name_keyword()));
        let Some(name) = name else {
            self.rewind(start);
            return Ok(None);
        };
        let default = match optional {
            Some(_) => self.default_value()?,
            None => None,
        };
        let argument = self.push(NodeData::Argument(Argument {
            ext_attrs: None,
            optional,
            idl_type,
            variadic,
            name,
            default,
            separator: None,
        }));
        self.attach_ext_attrs(argument, ext_attrs);
        Ok(Some(argument))
    }

    /// Parses `= value` where a default is allowed: a constant value, a
    /// string, `null`, or the empty sequence and dictionary forms.
    pub(super) fn default_value(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(assign) = self.eat(TokenKind::EQUAL) else {
            return Ok(None);
        };
        let value = self
            .const_value()
            .or_else(|| self.eat_any(&[TokenKind::STRING, TokenKind::NULL_KW]));
        if let Some(value) = value {
            return Ok(Some(self.push(NodeData::Default(DefaultValue {
                assign,
                value: Some(value),
                open: None,
                close: None,
            }))));
        }
        if let Some(open) = self.eat(TokenKind::LSQUARE) {
            let close = self.expect(TokenKind::RSQUARE, "Default sequence value must be empty")?;
            return Ok(Some(self.push(NodeData::Default(DefaultValue {
                assign,
                value: None,
                open: Some(open),
                close: Some(close),
            }))));
        }
        if let Some(open) = self.eat(TokenKind::LCURLY) {
            let close = self.expect(TokenKind::RCURLY, "Default dictionary value must be empty")?;
            return Ok(Some(self.push(NodeData::Default(DefaultValue {
                assign,
                value: None,
                open: Some(open),
                close: Some(close),
            }))));
        }
        Err(self.error("No value for default"))
    }

    pub(super) fn const_value(&mut self) -> Option<TokenId> {
        self.eat_if(|kind| kind.is_const_value())
    }
}
