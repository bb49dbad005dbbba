use crate::cst::{Document, NodeData, NodeId};
use crate::token::TokenId;

/// Serializes the tree back to text. Every token role is emitted in grammar
/// order with its trivia, followed by the trailing trivia held by the `eof`
/// token, so an unmutated tree reproduces the input verbatim.
pub fn write(doc: &Document) -> String {
    let mut out = String::new();
    for definition in doc.definitions() {
        for id in node_tokens(doc, *definition) {
            let token = doc.token(id);
            out.push_str(token.trivia());
            out.push_str(token.text());
        }
    }
    let eof = doc.token(doc.eof());
    out.push_str(eof.trivia());
    out
}

/// Collects every token owned by `id` and its descendants in emission
/// order. This single walk defines the grammar order used by [`write`],
/// node first-token lookup, and the coverage checks in tests.
pub(crate) fn node_tokens(doc: &Document, id: NodeId) -> Vec<TokenId> {
    let mut out = Vec::new();
    Collector { doc, out: &mut out }.node(id);
    out
}

struct Collector<'a> {
    doc: &'a Document,
    out: &'a mut Vec<TokenId>,
}

impl Collector<'_> {
    fn token(&mut self, id: TokenId) {
        self.out.push(id);
    }

    fn opt(&mut self, id: Option<TokenId>) {
        if let Some(id) = id {
            self.out.push(id);
        }
    }

    fn opt_node(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.node(id);
        }
    }

    fn nodes(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.node(*id);
        }
    }

    fn node(&mut self, id: NodeId) {
        let doc = self.doc;
        match doc.data(id) {
            NodeData::Interface(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.partial);
                self.token(d.base);
                self.token(d.name);
                self.opt(d.colon);
                self.opt(d.inheritance);
                self.token(d.open);
                self.nodes(&d.members);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::Mixin(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.partial);
                self.token(d.base);
                self.token(d.mixin);
                self.token(d.name);
                self.token(d.open);
                self.nodes(&d.members);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::CallbackInterface(d) => {
                self.opt_node(d.ext_attrs);
                self.token(d.callback);
                self.token(d.base);
                self.token(d.name);
                self.token(d.open);
                self.nodes(&d.members);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::Namespace(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.partial);
                self.token(d.base);
                self.token(d.name);
                self.token(d.open);
                self.nodes(&d.members);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::Dictionary(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.partial);
                self.token(d.base);
                self.token(d.name);
                self.opt(d.colon);
                self.opt(d.inheritance);
                self.token(d.open);
                self.nodes(&d.members);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::Enum(d) => {
                self.opt_node(d.ext_attrs);
                self.token(d.base);
                self.token(d.name);
                self.token(d.open);
                self.nodes(&d.values);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::Typedef(d) => {
                self.opt_node(d.ext_attrs);
                self.token(d.base);
                self.node(d.idl_type);
                self.token(d.name);
                self.token(d.termination);
            }
            NodeData::Includes(d) => {
                self.opt_node(d.ext_attrs);
                self.token(d.target);
                self.token(d.includes);
                self.token(d.mixin);
                self.token(d.termination);
            }
            NodeData::CallbackFunction(d) => {
                self.opt_node(d.ext_attrs);
                self.token(d.base);
                self.token(d.name);
                self.token(d.assign);
                self.node(d.return_type);
                self.token(d.open);
                self.nodes(&d.arguments);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::Constant(d) => {
                self.opt_node(d.ext_attrs);
                self.token(d.base);
                self.node(d.idl_type);
                self.token(d.name);
                self.token(d.assign);
                self.token(d.value);
                self.token(d.termination);
            }
            NodeData::Attribute(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.special);
                self.opt(d.readonly);
                self.token(d.base);
                self.node(d.idl_type);
                self.token(d.name);
                self.token(d.termination);
            }
            NodeData::Operation(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.special);
                self.opt_node(d.return_type);
                self.opt(d.name);
                self.opt(d.open);
                self.nodes(&d.arguments);
                self.opt(d.close);
                self.token(d.termination);
            }
            NodeData::Constructor(d) => {
                self.opt_node(d.ext_attrs);
                self.token(d.base);
                self.token(d.open);
                self.nodes(&d.arguments);
                self.token(d.close);
                self.token(d.termination);
            }
            NodeData::Field(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.required);
                self.node(d.idl_type);
                self.token(d.name);
                self.opt_node(d.default);
                self.token(d.termination);
            }
            NodeData::Argument(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.optional);
                self.node(d.idl_type);
                self.opt(d.variadic);
                self.token(d.name);
                self.opt_node(d.default);
                self.opt(d.separator);
            }
            NodeData::EnumValue(d) => {
                self.token(d.value);
                self.opt(d.separator);
            }
            NodeData::IterableLike(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.readonly);
                self.opt(d.async_kw);
                self.token(d.base);
                self.token(d.open);
                self.nodes(&d.types);
                self.token(d.close);
                self.opt(d.args_open);
                self.nodes(&d.arguments);
                self.opt(d.args_close);
                self.token(d.termination);
            }
            NodeData::ExtendedAttributes(d) => {
                self.token(d.open);
                self.nodes(&d.items);
                self.token(d.close);
            }
            NodeData::ExtendedAttribute(d) => {
                self.token(d.name);
                self.opt(d.assign);
                self.opt(d.secondary);
                self.opt(d.open);
                self.nodes(&d.list);
                self.opt(d.close);
                self.opt(d.separator);
            }
            NodeData::RhsValue(d) => {
                self.token(d.value);
                self.opt(d.separator);
            }
            NodeData::Type(d) => {
                self.opt_node(d.ext_attrs);
                self.opt(d.prefix);
                self.opt(d.base);
                self.opt(d.postfix);
                self.opt(d.open);
                self.nodes(&d.subtypes);
                self.opt(d.close);
                self.opt(d.nullable);
                self.opt(d.separator);
            }
            NodeData::Default(d) => {
                self.token(d.assign);
                self.opt(d.value);
                self.opt(d.open);
                self.opt(d.close);
            }
        }
    }
}
