use arcstr::ArcStr;

pub use cst::{
    Argument, Attribute, CallbackFunction, CallbackInterface, Constant, Constructor, DefaultValue,
    Dictionary, Document, Enum, EnumValue, ExtendedAttribute, ExtendedAttributes, Field, Includes,
    Interface, IterableLike, Mixin, Namespace, Node, NodeData, NodeId, Operation, RhsValue, Type,
    Typedef,
};
pub use error::{context_window, decorate, SyntaxError};
pub use syntax::{keyword_kind, TokenKind, RESERVED_IDENTIFIERS};
pub use token::{unescape_identifier, Token, TokenId};
pub use writer::write;

mod cst;
mod error;
mod lexer;
mod parser;
mod syntax;
mod token;
mod writer;

/// Parses a WebIDL source text into a lossless document tree. Every
/// character of the input, including whitespace and comments, is recoverable
/// from the result via [`write`].
pub fn parse(input: &str) -> Result<Document, SyntaxError> {
    parse_with_name(input, None)
}

/// Like [`parse`], with a caller-supplied label that syntax errors and
/// validation diagnostics use when decorating their messages.
pub fn parse_with_name(input: &str, source_name: Option<&str>) -> Result<Document, SyntaxError> {
    let source = ArcStr::from(input);
    let tokens = lexer::tokenize(source.clone(), source_name)?;
    let mut document = Document::new(source, source_name.map(str::to_string), tokens);
    parser::Parser::new(&mut document).parse_definitions()?;
    Ok(document)
}
