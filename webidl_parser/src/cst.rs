use arcstr::ArcStr;

use crate::error::SyntaxError;
use crate::lexer;
use crate::syntax::TokenKind;
use crate::token::{unescape_identifier, Token, TokenId};

/// Handle to a node in the owning document's arena. Parent references use
/// the same handles, so the tree is navigable in both directions without
/// ownership cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }
}

/// One variant per grammar production. Each variant owns the tokens it
/// consumed, keyed by fixed roles, plus handles to its typed children.
#[derive(Debug)]
pub enum NodeData {
    Interface(Interface),
    Mixin(Mixin),
    CallbackInterface(CallbackInterface),
    Namespace(Namespace),
    Dictionary(Dictionary),
    Enum(Enum),
    Typedef(Typedef),
    Includes(Includes),
    CallbackFunction(CallbackFunction),
    Constant(Constant),
    Attribute(Attribute),
    Operation(Operation),
    Constructor(Constructor),
    Field(Field),
    Argument(Argument),
    EnumValue(EnumValue),
    IterableLike(IterableLike),
    ExtendedAttributes(ExtendedAttributes),
    ExtendedAttribute(ExtendedAttribute),
    RhsValue(RhsValue),
    Type(Type),
    Default(DefaultValue),
}

#[derive(Debug)]
pub struct Interface {
    pub ext_attrs: Option<NodeId>,
    pub partial: Option<TokenId>,
    pub base: TokenId,
    pub name: TokenId,
    pub colon: Option<TokenId>,
    pub inheritance: Option<TokenId>,
    pub open: TokenId,
    pub members: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Mixin {
    pub ext_attrs: Option<NodeId>,
    pub partial: Option<TokenId>,
    pub base: TokenId,
    pub mixin: TokenId,
    pub name: TokenId,
    pub open: TokenId,
    pub members: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct CallbackInterface {
    pub ext_attrs: Option<NodeId>,
    pub callback: TokenId,
    pub base: TokenId,
    pub name: TokenId,
    pub open: TokenId,
    pub members: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Namespace {
    pub ext_attrs: Option<NodeId>,
    pub partial: Option<TokenId>,
    pub base: TokenId,
    pub name: TokenId,
    pub open: TokenId,
    pub members: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Dictionary {
    pub ext_attrs: Option<NodeId>,
    pub partial: Option<TokenId>,
    pub base: TokenId,
    pub name: TokenId,
    pub colon: Option<TokenId>,
    pub inheritance: Option<TokenId>,
    pub open: TokenId,
    pub members: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Enum {
    pub ext_attrs: Option<NodeId>,
    pub base: TokenId,
    pub name: TokenId,
    pub open: TokenId,
    pub values: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Typedef {
    pub ext_attrs: Option<NodeId>,
    pub base: TokenId,
    pub idl_type: NodeId,
    pub name: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Includes {
    pub ext_attrs: Option<NodeId>,
    pub target: TokenId,
    pub includes: TokenId,
    pub mixin: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct CallbackFunction {
    pub ext_attrs: Option<NodeId>,
    pub base: TokenId,
    pub name: TokenId,
    pub assign: TokenId,
    pub return_type: NodeId,
    pub open: TokenId,
    pub arguments: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Constant {
    pub ext_attrs: Option<NodeId>,
    pub base: TokenId,
    pub idl_type: NodeId,
    pub name: TokenId,
    pub assign: TokenId,
    pub value: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Attribute {
    pub ext_attrs: Option<NodeId>,
    /// `inherit`, `static`, or `stringifier`.
    pub special: Option<TokenId>,
    pub readonly: Option<TokenId>,
    pub base: TokenId,
    pub idl_type: NodeId,
    pub name: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Operation {
    pub ext_attrs: Option<NodeId>,
    /// `getter`, `setter`, `deleter`, `static`, or `stringifier`.
    pub special: Option<TokenId>,
    /// Absent only for the bare `stringifier;` shorthand.
    pub return_type: Option<NodeId>,
    pub name: Option<TokenId>,
    pub open: Option<TokenId>,
    pub arguments: Vec<NodeId>,
    pub close: Option<TokenId>,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Constructor {
    pub ext_attrs: Option<NodeId>,
    pub base: TokenId,
    pub open: TokenId,
    pub arguments: Vec<NodeId>,
    pub close: TokenId,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Field {
    pub ext_attrs: Option<NodeId>,
    pub required: Option<TokenId>,
    pub idl_type: NodeId,
    pub name: TokenId,
    pub default: Option<NodeId>,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct Argument {
    pub ext_attrs: Option<NodeId>,
    pub optional: Option<TokenId>,
    pub idl_type: NodeId,
    pub variadic: Option<TokenId>,
    pub name: TokenId,
    pub default: Option<NodeId>,
    pub separator: Option<TokenId>,
}

#[derive(Debug)]
pub struct EnumValue {
    pub value: TokenId,
    pub separator: Option<TokenId>,
}

#[derive(Debug)]
pub struct IterableLike {
    pub ext_attrs: Option<NodeId>,
    pub readonly: Option<TokenId>,
    pub async_kw: Option<TokenId>,
    /// `iterable`, `maplike`, or `setlike`.
    pub base: TokenId,
    pub open: TokenId,
    pub types: Vec<NodeId>,
    pub close: TokenId,
    pub args_open: Option<TokenId>,
    pub arguments: Vec<NodeId>,
    pub args_close: Option<TokenId>,
    pub termination: TokenId,
}

#[derive(Debug)]
pub struct ExtendedAttributes {
    pub open: TokenId,
    pub items: Vec<NodeId>,
    pub close: TokenId,
}

#[derive(Debug)]
pub struct ExtendedAttribute {
    pub name: TokenId,
    pub assign: Option<TokenId>,
    /// The single right-hand-side token of `[Name=Value]` forms.
    pub secondary: Option<TokenId>,
    pub open: Option<TokenId>,
    /// Right-hand-side value items, or argument nodes for `[Name(…)]` and
    /// `[Name=Value(…)]` forms.
    pub list: Vec<NodeId>,
    pub close: Option<TokenId>,
    pub separator: Option<TokenId>,
}

impl ExtendedAttribute {
    /// True when the parenthesized list holds right-hand-side values rather
    /// than arguments, as in `[Exposed=(Window, Worker)]`.
    pub fn rhs_is_list(&self) -> bool {
        self.assign.is_some() && self.secondary.is_none()
    }
}

#[derive(Debug)]
pub struct RhsValue {
    pub value: TokenId,
    pub separator: Option<TokenId>,
}

#[derive(Debug, Default)]
pub struct Type {
    pub ext_attrs: Option<NodeId>,
    /// `unsigned` or `unrestricted`.
    pub prefix: Option<TokenId>,
    /// Absent only for union types.
    pub base: Option<TokenId>,
    /// The second `long` of `long long`.
    pub postfix: Option<TokenId>,
    /// `<` for generics, `(` for unions.
    pub open: Option<TokenId>,
    pub subtypes: Vec<NodeId>,
    pub close: Option<TokenId>,
    pub nullable: Option<TokenId>,
    /// The `or` or `,` that follows this type inside a type list.
    pub separator: Option<TokenId>,
    pub union: bool,
}

#[derive(Debug)]
pub struct DefaultValue {
    pub assign: TokenId,
    /// A constant value, string, or `null`.
    pub value: Option<TokenId>,
    /// `[` or `{` of the empty sequence and dictionary forms.
    pub open: Option<TokenId>,
    pub close: Option<TokenId>,
}

impl NodeData {
    /// The discriminator exposed for dispatch and diagnostics. Iterable-like
    /// members are further distinguished by their base token.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeData::Interface(_) => "interface",
            NodeData::Mixin(_) => "interface mixin",
            NodeData::CallbackInterface(_) => "callback interface",
            NodeData::Namespace(_) => "namespace",
            NodeData::Dictionary(_) => "dictionary",
            NodeData::Enum(_) => "enum",
            NodeData::Typedef(_) => "typedef",
            NodeData::Includes(_) => "includes",
            NodeData::CallbackFunction(_) => "callback",
            NodeData::Constant(_) => "const",
            NodeData::Attribute(_) => "attribute",
            NodeData::Operation(_) => "operation",
            NodeData::Constructor(_) => "constructor",
            NodeData::Field(_) => "field",
            NodeData::Argument(_) => "argument",
            NodeData::EnumValue(_) => "enum-value",
            NodeData::IterableLike(_) => "iterable-like",
            NodeData::ExtendedAttributes(_) => "extended-attributes",
            NodeData::ExtendedAttribute(_) => "extended-attribute",
            NodeData::RhsValue(_) => "rhs-value",
            NodeData::Type(_) => "type",
            NodeData::Default(_) => "default",
        }
    }

    /// All child node handles in declaration order, extended attributes
    /// first. This is the aggregate the parent back-reference invariant is
    /// checked against.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let ext = self.ext_attrs();
        out.extend(ext);
        match self {
            NodeData::Interface(d) => out.extend(&d.members),
            NodeData::Mixin(d) => out.extend(&d.members),
            NodeData::CallbackInterface(d) => out.extend(&d.members),
            NodeData::Namespace(d) => out.extend(&d.members),
            NodeData::Dictionary(d) => out.extend(&d.members),
            NodeData::Enum(d) => out.extend(&d.values),
            NodeData::Typedef(d) => out.push(d.idl_type),
            NodeData::Includes(_) => {}
            NodeData::CallbackFunction(d) => {
                out.push(d.return_type);
                out.extend(&d.arguments);
            }
            NodeData::Constant(d) => out.push(d.idl_type),
            NodeData::Attribute(d) => out.push(d.idl_type),
            NodeData::Operation(d) => {
                out.extend(d.return_type);
                out.extend(&d.arguments);
            }
            NodeData::Constructor(d) => out.extend(&d.arguments),
            NodeData::Field(d) => {
                out.push(d.idl_type);
                out.extend(d.default);
            }
            NodeData::Argument(d) => {
                out.push(d.idl_type);
                out.extend(d.default);
            }
            NodeData::EnumValue(_) => {}
            NodeData::IterableLike(d) => {
                out.extend(&d.types);
                out.extend(&d.arguments);
            }
            NodeData::ExtendedAttributes(d) => out.extend(&d.items),
            NodeData::ExtendedAttribute(d) => out.extend(&d.list),
            NodeData::RhsValue(_) => {}
            NodeData::Type(d) => out.extend(&d.subtypes),
            NodeData::Default(_) => {}
        }
        out
    }

    pub fn ext_attrs(&self) -> Option<NodeId> {
        match self {
            NodeData::Interface(d) => d.ext_attrs,
            NodeData::Mixin(d) => d.ext_attrs,
            NodeData::CallbackInterface(d) => d.ext_attrs,
            NodeData::Namespace(d) => d.ext_attrs,
            NodeData::Dictionary(d) => d.ext_attrs,
            NodeData::Enum(d) => d.ext_attrs,
            NodeData::Typedef(d) => d.ext_attrs,
            NodeData::Includes(d) => d.ext_attrs,
            NodeData::CallbackFunction(d) => d.ext_attrs,
            NodeData::Constant(d) => d.ext_attrs,
            NodeData::Attribute(d) => d.ext_attrs,
            NodeData::Operation(d) => d.ext_attrs,
            NodeData::Constructor(d) => d.ext_attrs,
            NodeData::Field(d) => d.ext_attrs,
            NodeData::Argument(d) => d.ext_attrs,
            NodeData::IterableLike(d) => d.ext_attrs,
            NodeData::Type(d) => d.ext_attrs,
            _ => None,
        }
    }

    pub(crate) fn set_ext_attrs(&mut self, ext_attrs: Option<NodeId>) {
        match self {
            NodeData::Interface(d) => d.ext_attrs = ext_attrs,
            NodeData::Mixin(d) => d.ext_attrs = ext_attrs,
            NodeData::CallbackInterface(d) => d.ext_attrs = ext_attrs,
            NodeData::Namespace(d) => d.ext_attrs = ext_attrs,
            NodeData::Dictionary(d) => d.ext_attrs = ext_attrs,
            NodeData::Enum(d) => d.ext_attrs = ext_attrs,
            NodeData::Typedef(d) => d.ext_attrs = ext_attrs,
            NodeData::Includes(d) => d.ext_attrs = ext_attrs,
            NodeData::CallbackFunction(d) => d.ext_attrs = ext_attrs,
            NodeData::Constant(d) => d.ext_attrs = ext_attrs,
            NodeData::Attribute(d) => d.ext_attrs = ext_attrs,
            NodeData::Operation(d) => d.ext_attrs = ext_attrs,
            NodeData::Constructor(d) => d.ext_attrs = ext_attrs,
            NodeData::Field(d) => d.ext_attrs = ext_attrs,
            NodeData::Argument(d) => d.ext_attrs = ext_attrs,
            NodeData::IterableLike(d) => d.ext_attrs = ext_attrs,
            NodeData::Type(d) => d.ext_attrs = ext_attrs,
            _ => {}
        }
    }

    /// Stores the trailing separator of a list item. Only productions that
    /// appear in comma- or `or`-separated lists carry the role.
    pub(crate) fn set_separator(&mut self, separator: Option<TokenId>) {
        match self {
            NodeData::Argument(d) => d.separator = separator,
            NodeData::EnumValue(d) => d.separator = separator,
            NodeData::RhsValue(d) => d.separator = separator,
            NodeData::ExtendedAttribute(d) => d.separator = separator,
            NodeData::Type(d) => d.separator = separator,
            _ => {}
        }
    }

    /// The member list of a container production, empty for everything else.
    pub fn members(&self) -> &[NodeId] {
        match self {
            NodeData::Interface(d) => &d.members,
            NodeData::Mixin(d) => &d.members,
            NodeData::CallbackInterface(d) => &d.members,
            NodeData::Namespace(d) => &d.members,
            NodeData::Dictionary(d) => &d.members,
            _ => &[],
        }
    }

    /// The name token of a named production.
    pub fn name_token(&self) -> Option<TokenId> {
        match self {
            NodeData::Interface(d) => Some(d.name),
            NodeData::Mixin(d) => Some(d.name),
            NodeData::CallbackInterface(d) => Some(d.name),
            NodeData::Namespace(d) => Some(d.name),
            NodeData::Dictionary(d) => Some(d.name),
            NodeData::Enum(d) => Some(d.name),
            NodeData::Typedef(d) => Some(d.name),
            NodeData::CallbackFunction(d) => Some(d.name),
            NodeData::Constant(d) => Some(d.name),
            NodeData::Attribute(d) => Some(d.name),
            NodeData::Operation(d) => d.name,
            NodeData::Field(d) => Some(d.name),
            NodeData::Argument(d) => Some(d.name),
            _ => None,
        }
    }
}

/// The result of a parse: the source text, the token vector, the node
/// arena, and the top-level definitions in order. Dropping the document
/// reclaims the entire tree; parent links are plain handles and own
/// nothing.
#[derive(Debug)]
pub struct Document {
    source: ArcStr,
    source_name: Option<String>,
    tokens: Vec<Token>,
    nodes: Vec<Node>,
    definitions: Vec<NodeId>,
    eof: TokenId,
}

impl Document {
    pub(crate) fn new(
        source: ArcStr,
        source_name: Option<String>,
        tokens: Vec<Token>,
    ) -> Self {
        let eof = (tokens.len() - 1) as TokenId;
        Self {
            source,
            source_name,
            tokens,
            nodes: Vec::new(),
            definitions: Vec::new(),
            eof,
        }
    }

    pub fn source(&self) -> &ArcStr {
        &self.source
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id as usize]
    }

    /// The id of the terminal `eof` token from the original tokenization.
    /// Tokens synthesized by autofixes are appended after it.
    pub fn eof(&self) -> TokenId {
        self.eof
    }

    pub fn definitions(&self) -> &[NodeId] {
        &self.definitions
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    /// Direct mutable access to a node's data, used by autofixes. Callers
    /// moving child handles between nodes must re-point the children with
    /// [`Document::set_parent`].
    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()].data
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Allocates a node and points every child reachable from its data back
    /// at it, so producers never assign parents by hand.
    pub(crate) fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let children = data.children();
        self.nodes.push(Node { parent: None, data });
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    pub(crate) fn truncate_nodes(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn push_definition(&mut self, id: NodeId) {
        self.definitions.push(id);
    }

    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        self.nodes[child.index()].parent = parent;
    }

    /// Attaches or detaches a node's extended-attributes block, keeping the
    /// parent link consistent.
    pub fn set_ext_attrs(&mut self, node: NodeId, ext_attrs: Option<NodeId>) {
        self.nodes[node.index()].data.set_ext_attrs(ext_attrs);
        if let Some(ext_attrs) = ext_attrs {
            self.nodes[ext_attrs.index()].parent = Some(node);
        }
    }

    /// Sets or clears the trailing separator role of a list item.
    pub fn set_separator(&mut self, node: NodeId, separator: Option<TokenId>) {
        self.nodes[node.index()].data.set_separator(separator);
    }

    /// Replaces the trivia of a token, preserving its lexeme. Autofixes use
    /// this to keep indentation intact when splicing nodes.
    pub fn set_token_trivia(&mut self, id: TokenId, trivia: &str) {
        self.tokens[id as usize].set_trivia(ArcStr::from(trivia).substr(..));
    }

    /// Tokenizes `fragment` and appends the resulting tokens (including the
    /// fragment's own `eof`) to this document's token vector, keeping
    /// indices dense. Returns the id of the first appended token.
    pub(crate) fn append_fragment_tokens(&mut self, fragment: &str) -> Result<TokenId, SyntaxError> {
        let first = self.tokens.len() as TokenId;
        let tokens = lexer::tokenize_fragment(fragment, first)?;
        self.tokens.extend(tokens);
        Ok(first)
    }

    /// The unescaped name of a named definition or member.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        let token = self.data(id).name_token()?;
        Some(unescape_identifier(self.token(token).text()))
    }

    /// The discriminator string for a node; iterable-like members report
    /// their base token (`iterable`, `maplike`, or `setlike`).
    pub fn type_name_of(&self, id: NodeId) -> &str {
        match self.data(id) {
            NodeData::IterableLike(d) => self.token(d.base).text(),
            data => data.type_name(),
        }
    }

    /// The generic base kind of a type (`sequence`, `record`, `Promise`, or
    /// `FrozenArray`), if it is a parameterized type.
    pub fn type_generic(&self, ty: &Type) -> Option<TokenKind> {
        let base = self.token(ty.base?).kind();
        base.is_generic_base().then_some(base)
    }

    /// The unescaped referent name of a plain single type, used to resolve
    /// the type against the definition index. Unions and generics have no
    /// single referent.
    pub fn type_referent(&self, ty: &Type) -> Option<&str> {
        if ty.union || self.type_generic(ty).is_some() {
            return None;
        }
        Some(unescape_identifier(self.token(ty.base?).text()))
    }

    /// The lowest-indexed token reachable from a node, extended attributes
    /// included. This fixes the node's source position.
    pub fn first_token_of(&self, id: NodeId) -> Option<TokenId> {
        crate::writer::node_tokens(self, id).into_iter().next()
    }

    /// Every token owned by the node and its descendants, in source order.
    pub fn tokens_of(&self, id: NodeId) -> Vec<TokenId> {
        crate::writer::node_tokens(self, id)
    }
}
