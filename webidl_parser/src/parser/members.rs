use bitflags::bitflags;

use crate::cst::{
    Attribute, Constant, Constructor, EnumValue, Field, IterableLike, NodeData, NodeId, Operation,
    Type,
};
use crate::syntax::TokenKind;
use crate::token::TokenId;

use super::{ParseResult, Parser};

bitflags! {
    /// Restrictions a container places on its member productions.
    #[derive(Clone, Copy, Default)]
    pub(super) struct MemberContext: u8 {
        /// Mixins and namespaces never allow `inherit` attributes.
        const NO_INHERIT = 1;
        /// Namespace attributes must be read-only.
        const REQUIRE_READONLY = 1 << 1;
        /// Special operation prefixes are not consumed in this container.
        const REGULAR_ONLY = 1 << 2;
    }
}

impl<'a> Parser<'a> {
    //#region Member parser entries, bound per container kind

    pub(super) fn interface_attribute(&mut self) -> ParseResult<Option<NodeId>> {
        self.attribute(MemberContext::default(), None)
    }

    pub(super) fn interface_operation(&mut self) -> ParseResult<Option<NodeId>> {
        self.operation(MemberContext::default(), None)
    }

    pub(super) fn mixin_attribute(&mut self) -> ParseResult<Option<NodeId>> {
        self.attribute(MemberContext::NO_INHERIT, None)
    }

    pub(super) fn namespace_attribute(&mut self) -> ParseResult<Option<NodeId>> {
        self.attribute(
            MemberContext::NO_INHERIT | MemberContext::REQUIRE_READONLY,
            None,
        )
    }

    pub(super) fn regular_operation(&mut self) -> ParseResult<Option<NodeId>> {
        self.operation(MemberContext::REGULAR_ONLY, None)
    }
    //#endregion

    pub(super) fn constant(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat(TokenKind::CONST_KW) else {
            return Ok(None);
        };
        let idl_type = match self.primitive_type()? {
            Some(ty) => ty,
            None => {
                let ident = self.expect(TokenKind::IDENT, "Const lacks a type")?;
                self.push(NodeData::Type(Type {
                    base: Some(ident),
                    ..Type::default()
                }))
            }
        };
        if self.at(TokenKind::QUESTION) {
            return Err(self.error("Unexpected nullable constant type"));
        }
        let name = self.expect(TokenKind::IDENT, "Const lacks a name")?;
        let assign = self.expect(TokenKind::EQUAL, "Const lacks value assignment")?;
        let value = self
            .const_value()
            .ok_or_else(|| self.error("Const lacks a value"))?;
        let termination = self.expect(TokenKind::SEMICOLON, "Unterminated const, expected ';'")?;
        Ok(Some(self.push(NodeData::Constant(Constant {
            ext_attrs: None,
            base,
            idl_type,
            name,
            assign,
            value,
            termination,
        }))))
    }

    pub(super) fn constructor_member(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat(TokenKind::CONSTRUCTOR_KW) else {
            return Ok(None);
        };
        let open = self.expect(TokenKind::LPAREN, "No argument list in constructor")?;
        let arguments = self.argument_list()?;
        let close = self.expect(TokenKind::RPAREN, "Unterminated constructor")?;
        let termination = self.expect(TokenKind::SEMICOLON, "No semicolon after constructor")?;
        Ok(Some(self.push(NodeData::Constructor(Constructor {
            ext_attrs: None,
            base,
            open,
            arguments,
            close,
            termination,
        }))))
    }

    /// `static` commits to either an attribute or an operation.
    pub(super) fn static_member(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(special) = self.eat(TokenKind::STATIC_KW) else {
            return Ok(None);
        };
        if let Some(member) = self.attribute(MemberContext::default(), Some(special))? {
            return Ok(Some(member));
        }
        if let Some(member) = self.operation(MemberContext::REGULAR_ONLY, Some(special))? {
            return Ok(Some(member));
        }
        Err(self.error("No body in static member"))
    }

    /// `stringifier` commits to an attribute, an operation, or the bare `;`
    /// shorthand that the operation parser handles itself.
    pub(super) fn stringifier_member(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(special) = self.eat(TokenKind::STRINGIFIER_KW) else {
            return Ok(None);
        };
        if let Some(member) = self.attribute(MemberContext::default(), Some(special))? {
            return Ok(Some(member));
        }
        if let Some(member) = self.operation(MemberContext::default(), Some(special))? {
            return Ok(Some(member));
        }
        Err(self.error("Unterminated stringifier"))
    }

    pub(super) fn attribute(
        &mut self,
        context: MemberContext,
        special: Option<TokenId>,
    ) -> ParseResult<Option<NodeId>> {
        let start = self.checkpoint();
        let mut special = special;
        if special.is_none() && !context.contains(MemberContext::NO_INHERIT) {
            special = self.eat(TokenKind::INHERIT_KW);
        }
        let inherited = special.is_some_and(|token| self.token_kind(token) == TokenKind::INHERIT_KW);
        if inherited && self.at(TokenKind::READONLY_KW) {
            return Err(self.error("Inherited attributes cannot be read-only"));
        }
        let readonly = self.eat(TokenKind::READONLY_KW);
        if context.contains(MemberContext::REQUIRE_READONLY)
            && readonly.is_none()
            && self.at(TokenKind::ATTRIBUTE_KW)
        {
            return Err(self.error("Attributes must be readonly in this location"));
        }
        let Some(base) = self.eat(TokenKind::ATTRIBUTE_KW) else {
            self.rewind(start);
            return Ok(None);
        };
        let idl_type = self
            .type_with_ext_attrs()?
            .ok_or_else(|| self.error("Attribute lacks a type"))?;
        let rejected = match self.doc.data(idl_type) {
            NodeData::Type(data) => match (self.doc.type_generic(data), data.base) {
                (Some(generic), Some(base)) => Some((generic, base)),
                _ => None,
            },
            _ => None,
        };
        match rejected {
            Some((TokenKind::SEQUENCE_KW, base)) => {
                return Err(self.error_at(base, "Attributes cannot accept sequence types"));
            }
            Some((TokenKind::RECORD_KW, base)) => {
                return Err(self.error_at(base, "Attributes cannot accept record types"));
            }
            _ => {}
        }
        let name = self
            .eat(TokenKind::IDENT)
            .or_else(|| self.eat_any(&[TokenKind::ASYNC_KW, TokenKind::REQUIRED_KW]))
            .ok_or_else(|| self.error("Attribute lacks a name"))?;
        let termination =
            self.expect(TokenKind::SEMICOLON, "Unterminated attribute, expected ';'")?;
        Ok(Some(self.push(NodeData::Attribute(Attribute {
            ext_attrs: None,
            special,
            readonly,
            base,
            idl_type,
            name,
            termination,
        }))))
    }

    pub(super) fn operation(
        &mut self,
        context: MemberContext,
        special: Option<TokenId>,
    ) -> ParseResult<Option<NodeId>> {
        let mut special = special;
        let stringifier =
            special.is_some_and(|token| self.token_kind(token) == TokenKind::STRINGIFIER_KW);
        if stringifier {
            // `stringifier;` is a complete operation with no arguments.
            if let Some(termination) = self.eat(TokenKind::SEMICOLON) {
                return Ok(Some(self.push(NodeData::Operation(Operation {
                    ext_attrs: None,
                    special,
                    return_type: None,
                    name: None,
                    open: None,
                    arguments: Vec::new(),
                    close: None,
                    termination,
                }))));
            }
        }
        if special.is_none() && !context.contains(MemberContext::REGULAR_ONLY) {
            special = self.eat_any(&[
                TokenKind::GETTER_KW,
                TokenKind::SETTER_KW,
                TokenKind::DELETER_KW,
            ]);
        }
        let return_type = self
            .return_type()?
            .ok_or_else(|| self.error("Missing return type"))?;
        let name = self
            .eat(TokenKind::IDENT)
            .or_else(|| self.eat(TokenKind::INCLUDES_KW));
        let open = self.expect(TokenKind::LPAREN, "Invalid operation")?;
        let arguments = self.argument_list()?;
        let close = self.expect(TokenKind::RPAREN, "Unterminated operation")?;
        let termination =
            self.expect(TokenKind::SEMICOLON, "Unterminated operation, expected ';'")?;
        Ok(Some(self.push(NodeData::Operation(Operation {
            ext_attrs: None,
            special,
            return_type: Some(return_type),
            name,
            open: Some(open),
            arguments,
            close: Some(close),
            termination,
        }))))
    }

    /// Parses `iterable<>`, `async iterable<>`, `maplike<>`, and
    /// `setlike<>` declarations, with `readonly` allowed on the map- and
    /// set-like forms and an optional argument list on async iterables.
    pub(super) fn iterable_like(&mut self) -> ParseResult<Option<NodeId>> {
        let start = self.checkpoint();
        let readonly = self.eat(TokenKind::READONLY_KW);
        let async_kw = match readonly {
            None => self.eat(TokenKind::ASYNC_KW),
            Some(_) => None,
        };
        let base = if readonly.is_some() {
            self.eat_any(&[TokenKind::MAPLIKE_KW, TokenKind::SETLIKE_KW])
        } else if async_kw.is_some() {
            self.eat(TokenKind::ITERABLE_KW)
        } else {
            self.eat_any(&[
                TokenKind::ITERABLE_KW,
                TokenKind::MAPLIKE_KW,
                TokenKind::SETLIKE_KW,
            ])
        };
        let Some(base) = base else {
            self.rewind(start);
            return Ok(None);
        };
        let base_kind = self.token_kind(base);
        let kind_name = self.token_text(base).to_string();
        let second_required = base_kind == TokenKind::MAPLIKE_KW;
        let second_allowed = second_required || base_kind == TokenKind::ITERABLE_KW;
        let open = self.expect(
            TokenKind::LANGLE,
            &format!("Missing less-than sign `<` in {kind_name} declaration"),
        )?;
        let first = self
            .type_with_ext_attrs()?
            .ok_or_else(|| self.error(&format!("Missing a type argument in {kind_name} declaration")))?;
        let mut types = vec![first];
        if second_allowed {
            let separator = self.eat(TokenKind::COMMA);
            self.set_separator(first, separator);
            if separator.is_some() {
                let second = self.type_with_ext_attrs()?.ok_or_else(|| {
                    self.error(&format!("Missing second type argument in {kind_name} declaration"))
                })?;
                types.push(second);
            } else if second_required {
                return Err(self.error(&format!(
                    "Missing second type argument in {kind_name} declaration"
                )));
            }
        }
        let close = self.expect(
            TokenKind::RANGLE,
            &format!("Missing greater-than sign `>` in {kind_name} declaration"),
        )?;
        let mut args_open = None;
        let mut arguments = Vec::new();
        let mut args_close = None;
        if self.at(TokenKind::LPAREN) {
            if async_kw.is_none() {
                return Err(self.error("Arguments are only allowed for `async iterable`"));
            }
            args_open = self.eat(TokenKind::LPAREN);
            arguments = self.argument_list()?;
            args_close = Some(self.expect(
                TokenKind::RPAREN,
                "Unterminated async iterable argument list",
            )?);
        }
        let termination = self.expect(
            TokenKind::SEMICOLON,
            &format!("Missing semicolon after {kind_name} declaration"),
        )?;
        Ok(Some(self.push(NodeData::IterableLike(IterableLike {
            ext_attrs: None,
            readonly,
            async_kw,
            base,
            open,
            types,
            close,
            args_open,
            arguments,
            args_close,
            termination,
        }))))
    }

    pub(super) fn field(&mut self) -> ParseResult<Option<NodeId>> {
        let required = self.eat(TokenKind::REQUIRED_KW);
        let idl_type = self
            .type_with_ext_attrs()?
            .ok_or_else(|| self.error("Dictionary member lacks a type"))?;
        let name = self.expect(TokenKind::IDENT, "Dictionary member lacks a name")?;
        let default = self.default_value()?;
        if required.is_some() && default.is_some() {
            return Err(self.error("Required dictionary members must not have a default value"));
        }
        let termination = self.expect(
            TokenKind::SEMICOLON,
            "Unterminated dictionary member, expected ';'",
        )?;
        Ok(Some(self.push(NodeData::Field(Field {
            ext_attrs: None,
            required,
            idl_type,
            name,
            default,
            termination,
        }))))
    }

    pub(super) fn enum_value(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(value) = self.eat(TokenKind::STRING) else {
            return Ok(None);
        };
        Ok(Some(self.push(NodeData::EnumValue(EnumValue {
            value,
            separator: None,
        }))))
    }
}
