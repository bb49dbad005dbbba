use crate::cst::{
    CallbackFunction, CallbackInterface, Dictionary, Enum, Includes, Interface, Mixin, Namespace,
    NodeData, NodeId, Typedef,
};
use crate::syntax::TokenKind;
use crate::token::TokenId;

use super::{ParseResult, Parser};

impl<'a> Parser<'a> {
    /// Parses the whole input as a sequence of top-level definitions, each
    /// optionally preceded by extended attributes.
    pub(crate) fn parse_definitions(&mut self) -> ParseResult<()> {
        loop {
            let ext_attrs = self.extended_attributes()?;
            if self.at(TokenKind::EOF) {
                if ext_attrs.is_some() {
                    return Err(self.error("Stray extended attributes"));
                }
                return Ok(());
            }
            let Some(definition) = self.definition()? else {
                return Err(self.error("Unrecognised tokens"));
            };
            self.attach_ext_attrs(definition, ext_attrs);
            self.doc.push_definition(definition);
        }
    }

    fn definition(&mut self) -> ParseResult<Option<NodeId>> {
        if let Some(definition) = self.callback_definition()? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.interface_definition(None)? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.partial_definition()? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.dictionary_definition(None)? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.enum_definition()? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.typedef_definition()? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.includes_definition()? {
            return Ok(Some(definition));
        }
        self.namespace_definition(None)
    }

    /// `callback` opens either a callback interface or a callback function.
    fn callback_definition(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(callback) = self.eat(TokenKind::CALLBACK_KW) else {
            return Ok(None);
        };
        if let Some(base) = self.eat(TokenKind::INTERFACE_KW) {
            return self.callback_interface_rest(callback, base).map(Some);
        }
        self.callback_function_rest(callback).map(Some)
    }

    /// `interface` opens either a mixin or a plain interface.
    fn interface_definition(&mut self, partial: Option<TokenId>) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat(TokenKind::INTERFACE_KW) else {
            return Ok(None);
        };
        if let Some(mixin) = self.eat(TokenKind::MIXIN_KW) {
            return self.mixin_rest(partial, base, mixin).map(Some);
        }
        self.interface_rest(partial, base).map(Some)
    }

    fn partial_definition(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(partial) = self.eat(TokenKind::PARTIAL_KW) else {
            return Ok(None);
        };
        if let Some(definition) = self.interface_definition(Some(partial))? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.dictionary_definition(Some(partial))? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.namespace_definition(Some(partial))? {
            return Ok(Some(definition));
        }
        Err(self.error("Partial doesn't apply to anything"))
    }

    fn interface_rest(&mut self, partial: Option<TokenId>, base: TokenId) -> ParseResult<NodeId> {
        let name = self.expect(TokenKind::IDENT, "Missing name in interface")?;
        let (colon, inheritance) = match partial {
            None => self.inheritance()?,
            Some(_) => (None, None),
        };
        let open = self.expect(TokenKind::LCURLY, "Bodyless interface")?;
        let body = self.container_body(
            "interface",
            &[
                Self::constant,
                Self::constructor_member,
                Self::static_member,
                Self::stringifier_member,
                Self::iterable_like,
                Self::interface_attribute,
                Self::interface_operation,
            ],
        )?;
        Ok(self.push(NodeData::Interface(Interface {
            ext_attrs: None,
            partial,
            base,
            name,
            colon,
            inheritance,
            open,
            members: body.members,
            close: body.close,
            termination: body.termination,
        })))
    }

    fn mixin_rest(
        &mut self,
        partial: Option<TokenId>,
        base: TokenId,
        mixin: TokenId,
    ) -> ParseResult<NodeId> {
        let name = self.expect(TokenKind::IDENT, "Missing name in interface mixin")?;
        let open = self.expect(TokenKind::LCURLY, "Bodyless interface mixin")?;
        let body = self.container_body(
            "interface mixin",
            &[
                Self::constant,
                Self::stringifier_member,
                Self::mixin_attribute,
                Self::regular_operation,
            ],
        )?;
        Ok(self.push(NodeData::Mixin(Mixin {
            ext_attrs: None,
            partial,
            base,
            mixin,
            name,
            open,
            members: body.members,
            close: body.close,
            termination: body.termination,
        })))
    }

    fn callback_interface_rest(
        &mut self,
        callback: TokenId,
        base: TokenId,
    ) -> ParseResult<NodeId> {
        let name = self.expect(TokenKind::IDENT, "Missing name in callback interface")?;
        let open = self.expect(TokenKind::LCURLY, "Bodyless callback interface")?;
        let body = self.container_body(
            "callback interface",
            &[Self::constant, Self::regular_operation],
        )?;
        Ok(self.push(NodeData::CallbackInterface(CallbackInterface {
            ext_attrs: None,
            callback,
            base,
            name,
            open,
            members: body.members,
            close: body.close,
            termination: body.termination,
        })))
    }

    fn callback_function_rest(&mut self, base: TokenId) -> ParseResult<NodeId> {
        let name = self.expect(TokenKind::IDENT, "Callback lacks a name")?;
        let assign = self.expect(TokenKind::EQUAL, "Callback lacks an assignment")?;
        let return_type = self
            .return_type()?
            .ok_or_else(|| self.error("Callback lacks a return type"))?;
        let open = self.expect(TokenKind::LPAREN, "Callback lacks parentheses for arguments")?;
        let arguments = self.argument_list()?;
        let close = self.expect(TokenKind::RPAREN, "Unterminated callback")?;
        let termination = self.expect(TokenKind::SEMICOLON, "Unterminated callback, expected ';'")?;
        Ok(self.push(NodeData::CallbackFunction(CallbackFunction {
            ext_attrs: None,
            base,
            name,
            assign,
            return_type,
            open,
            arguments,
            close,
            termination,
        })))
    }

    fn namespace_definition(&mut self, partial: Option<TokenId>) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat(TokenKind::NAMESPACE_KW) else {
            return Ok(None);
        };
        let name = self.expect(TokenKind::IDENT, "Missing name in namespace")?;
        let open = self.expect(TokenKind::LCURLY, "Bodyless namespace")?;
        let body = self.container_body(
            "namespace",
            &[
                Self::namespace_attribute,
                Self::constant,
                Self::regular_operation,
            ],
        )?;
        Ok(Some(self.push(NodeData::Namespace(Namespace {
            ext_attrs: None,
            partial,
            base,
            name,
            open,
            members: body.members,
            close: body.close,
            termination: body.termination,
        }))))
    }

    fn dictionary_definition(&mut self, partial: Option<TokenId>) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat(TokenKind::DICTIONARY_KW) else {
            return Ok(None);
        };
        let name = self.expect(TokenKind::IDENT, "Missing name in dictionary")?;
        let (colon, inheritance) = match partial {
            None => self.inheritance()?,
            Some(_) => (None, None),
        };
        let open = self.expect(TokenKind::LCURLY, "Bodyless dictionary")?;
        let body = self.container_body("dictionary", &[Self::field])?;
        Ok(Some(self.push(NodeData::Dictionary(Dictionary {
            ext_attrs: None,
            partial,
            base,
            name,
            colon,
            inheritance,
            open,
            members: body.members,
            close: body.close,
            termination: body.termination,
        }))))
    }

    fn enum_definition(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat(TokenKind::ENUM_KW) else {
            return Ok(None);
        };
        let name = self.expect(TokenKind::IDENT, "No name for enum")?;
        let open = self.expect(TokenKind::LCURLY, "Bodyless enum")?;
        let values = self.list(Self::enum_value, true, "enumeration")?;
        if self.at(TokenKind::STRING) {
            return Err(self.error("No comma between enum values"));
        }
        let close = self.expect(TokenKind::RCURLY, "Unexpected value in enum")?;
        let termination = self.expect(TokenKind::SEMICOLON, "No semicolon after enum")?;
        Ok(Some(self.push(NodeData::Enum(Enum {
            ext_attrs: None,
            base,
            name,
            open,
            values,
            close,
            termination,
        }))))
    }

    fn typedef_definition(&mut self) -> ParseResult<Option<NodeId>> {
        let Some(base) = self.eat(TokenKind::TYPEDEF_KW) else {
            return Ok(None);
        };
        let idl_type = self
            .type_with_ext_attrs()?
            .ok_or_else(|| self.error("Typedef lacks a type"))?;
        let name = self.expect(TokenKind::IDENT, "Typedef lacks a name")?;
        let termination = self.expect(TokenKind::SEMICOLON, "Unterminated typedef, expected ';'")?;
        Ok(Some(self.push(NodeData::Typedef(Typedef {
            ext_attrs: None,
            base,
            idl_type,
            name,
            termination,
        }))))
    }

    /// `A includes B;` starts with a plain identifier, so a failed attempt
    /// must hand the consumed name back before another production tries.
    fn includes_definition(&mut self) -> ParseResult<Option<NodeId>> {
        let start = self.checkpoint();
        let Some(target) = self.eat(TokenKind::IDENT) else {
            return Ok(None);
        };
        let Some(includes) = self.eat(TokenKind::INCLUDES_KW) else {
            self.rewind(start);
            return Ok(None);
        };
        let mixin = self.expect(TokenKind::IDENT, "Incomplete includes statement")?;
        let termination = self.expect(
            TokenKind::SEMICOLON,
            "No terminating ; for includes statement",
        )?;
        Ok(Some(self.push(NodeData::Includes(Includes {
            ext_attrs: None,
            target,
            includes,
            mixin,
            termination,
        }))))
    }

    fn inheritance(&mut self) -> ParseResult<(Option<TokenId>, Option<TokenId>)> {
        let Some(colon) = self.eat(TokenKind::COLON) else {
            return Ok((None, None));
        };
        let inheritance = self.expect(TokenKind::IDENT, "Inheritance lacks a type")?;
        Ok((Some(colon), Some(inheritance)))
    }
}
