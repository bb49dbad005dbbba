use crate::cst::{NodeData, NodeId, Type};
use crate::syntax::TokenKind;
use crate::token::TokenId;

use super::{ParseResult, Parser};

impl<'a> Parser<'a> {
    /// Parses a type optionally preceded by extended attributes, as used in
    /// attribute, argument, member, and generic-subtype positions.
    pub(super) fn type_with_ext_attrs(&mut self) -> ParseResult<Option<NodeId>> {
        let ext_attrs = self.extended_attributes()?;
        let Some(ty) = self.parse_type()? else {
            return Ok(None);
        };
        self.attach_ext_attrs(ty, ext_attrs);
        Ok(Some(ty))
    }

    pub(super) fn parse_type(&mut self) -> ParseResult<Option<NodeId>> {
        if self.at(TokenKind::LPAREN) {
            return self.union_type();
        }
        self.single_type()
    }

    /// Parses a type, or the keyword `void` where a return type is expected.
    pub(super) fn return_type(&mut self) -> ParseResult<Option<NodeId>> {
        if let Some(ty) = self.parse_type()? {
            return Ok(Some(ty));
        }
        let Some(void) = self.eat(TokenKind::VOID_KW) else {
            return Ok(None);
        };
        Ok(Some(self.push(NodeData::Type(Type {
            base: Some(void),
            ..Type::default()
        }))))
    }

    fn single_type(&mut self) -> ParseResult<Option<NodeId>> {
        let ty = if let Some(generic) = self.generic_type()? {
            generic
        } else if let Some(primitive) = self.primitive_type()? {
            primitive
        } else {
            let base = self.eat(TokenKind::IDENT).or_else(|| {
                self.eat_if(|kind| kind.is_string_type() || kind.is_type_name_keyword())
            });
            let Some(base) = base else {
                return Ok(None);
            };
            if self.at(TokenKind::LANGLE) {
                let message = format!("Unsupported generic type {}", self.token_text(base));
                return Err(self.error(&message));
            }
            self.push(NodeData::Type(Type {
                base: Some(base),
                ..Type::default()
            }))
        };
        self.finish_nullable(ty)?;
        Ok(Some(ty))
    }

    /// Consumes a trailing `?` onto the given type. Promise types may never
    /// be nullable.
    fn finish_nullable(&mut self, ty: NodeId) -> ParseResult<()> {
        let generic = self.generic_of(ty);
        if generic == Some(TokenKind::PROMISE_KW) && self.at(TokenKind::QUESTION) {
            return Err(self.error("Promise type cannot be nullable"));
        }
        let nullable = self.eat(TokenKind::QUESTION);
        if let NodeData::Type(data) = self.doc.data_mut(ty) {
            data.nullable = nullable;
        }
        Ok(())
    }

    fn generic_of(&self, ty: NodeId) -> Option<TokenKind> {
        match self.doc.data(ty) {
            NodeData::Type(data) => self.doc.type_generic(data),
            _ => None,
        }
    }

    fn generic_type(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat_if(|kind| kind.is_generic_base()) else {
            return Ok(None);
        };
        let base_kind = self.token_kind(base);
        let base_text = self.token_text(base).to_string();
        let open = self.expect(
            TokenKind::LANGLE,
            &format!("No opening bracket after {base_text} base type"),
        )?;
        let mut subtypes = Vec::new();
        match base_kind {
            TokenKind::PROMISE_KW => {
                if self.at(TokenKind::LSQUARE) {
                    return Err(self.error("Promise type cannot have extended attribute"));
                }
                let subtype = self
                    .return_type()?
                    .ok_or_else(|| self.error("Missing Promise subtype"))?;
                subtypes.push(subtype);
            }
            TokenKind::SEQUENCE_KW | TokenKind::FROZEN_ARRAY_KW => {
                let subtype = self
                    .type_with_ext_attrs()?
                    .ok_or_else(|| self.error(&format!("Missing {base_text} subtype")))?;
                subtypes.push(subtype);
            }
            TokenKind::RECORD_KW => {
                if self.at(TokenKind::LSQUARE) {
                    return Err(self.error("Record key cannot have extended attribute"));
                }
                let key = self
                    .eat_if(|kind| kind.is_string_type())
                    .ok_or_else(|| {
                        self.error("Record key must be one of: ByteString, DOMString, USVString")
                    })?;
                let key_type = self.push(NodeData::Type(Type {
                    base: Some(key),
                    ..Type::default()
                }));
                let separator = self.expect(TokenKind::COMMA, "Missing comma after record key type")?;
                self.set_separator(key_type, Some(separator));
                let value_type = self
                    .type_with_ext_attrs()?
                    .ok_or_else(|| self.error("Error parsing generic type record"))?;
                subtypes.push(key_type);
                subtypes.push(value_type);
            }
            _ => unreachable!("generic base kinds are closed"),
        }
        let close = self.expect(
            TokenKind::RANGLE,
            &format!("Missing closing bracket after {base_text} base type"),
        )?;
        Ok(Some(self.push(NodeData::Type(Type {
            base: Some(base),
            open: Some(open),
            subtypes,
            close: Some(close),
            ..Type::default()
        }))))
    }

    /// Parses the built-in numeric and boolean-ish types. The `unsigned` and
    /// `unrestricted` prefixes commit: once consumed, a missing base type is
    /// an error rather than a fallthrough.
    pub(super) fn primitive_type(&mut self) -> ParseResult<Option<NodeId>> {
        if let Some(prefix) = self.eat(TokenKind::UNSIGNED_KW) {
            let base = self
                .eat_any(&[TokenKind::SHORT_KW, TokenKind::LONG_KW])
                .ok_or_else(|| self.error("Failed to parse integer type"))?;
            return Ok(Some(self.integer_type(Some(prefix), base)));
        }
        if let Some(base) = self.eat_any(&[TokenKind::SHORT_KW, TokenKind::LONG_KW]) {
            return Ok(Some(self.integer_type(None, base)));
        }
        if let Some(prefix) = self.eat(TokenKind::UNRESTRICTED_KW) {
            let base = self
                .eat_any(&[TokenKind::FLOAT_KW, TokenKind::DOUBLE_KW])
                .ok_or_else(|| self.error("Failed to parse float type"))?;
            return Ok(Some(self.push(NodeData::Type(Type {
                prefix: Some(prefix),
                base: Some(base),
                ..Type::default()
            }))));
        }
        let base = self.eat_any(&[
            TokenKind::FLOAT_KW,
            TokenKind::DOUBLE_KW,
            TokenKind::BOOLEAN_KW,
            TokenKind::BYTE_KW,
            TokenKind::OCTET_KW,
        ]);
        Ok(base.map(|base| {
            self.push(NodeData::Type(Type {
                base: Some(base),
                ..Type::default()
            }))
        }))
    }

    /// Finishes `short`, `long`, and `long long`, the last by consuming the
    /// second `long` as a postfix.
    fn integer_type(&mut self, prefix: Option<TokenId>, base: TokenId) -> NodeId {
        let postfix = match self.token_kind(base) {
            TokenKind::LONG_KW => self.eat(TokenKind::LONG_KW),
            _ => None,
        };
        self.push(NodeData::Type(Type {
            prefix,
            base: Some(base),
            postfix,
            ..Type::default()
        }))
    }

    fn union_type(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(open) = self.eat(TokenKind::LPAREN) else {
            return Ok(None);
        };
        let mut subtypes = Vec::new();
        loop {
            let subtype = self.type_with_ext_attrs()?.ok_or_else(|| {
                self.error("No type after open parenthesis or 'or' in union type")
            })?;
            if let NodeData::Type(data) = self.doc.data(subtype) {
                let base_kind = data.base.map(|base| self.token_kind(base));
                if base_kind == Some(TokenKind::ANY_KW) {
                    return Err(self.error("Type `any` cannot be included in a union type"));
                }
                if self.doc.type_generic(data) == Some(TokenKind::PROMISE_KW) {
                    return Err(self.error("Promise type cannot be included in a union type"));
                }
            }
            subtypes.push(subtype);
            let Some(or) = self.eat(TokenKind::OR_KW) else {
                break;
            };
            self.set_separator(subtype, Some(or));
        }
        if subtypes.len() < 2 {
            return Err(self.error("At least two types are expected in a union type but found less"));
        }
        let close = self.expect(TokenKind::RPAREN, "Unterminated union type")?;
        let nullable = self.eat(TokenKind::QUESTION);
        Ok(Some(self.push(NodeData::Type(Type {
            open: Some(open),
            subtypes,
            close: Some(close),
            nullable,
            union: true,
            ..Type::default()
        }))))
    }
}
