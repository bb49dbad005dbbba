use webidl_parser::{Document, NodeData, TokenId};

pub use definitions::{DefRef, DefinitionSet, DictionaryRef};
pub use diagnostic::{Diagnostic, DiagnosticName, DiagnosticSeverity};
pub use fix::{apply_fix, Fix};

mod definitions;
mod diagnostic;
mod fix;
mod rules;

/// Validates a single parsed document. See [`validate_all`].
pub fn validate(doc: &Document) -> Vec<Diagnostic> {
    validate_all(&[doc])
}

/// Validates one or more parsed documents together, so that definitions in
/// one document may reference definitions in another. Diagnostics come out
/// in tree-walk order: a node's extended attributes first, then its typed
/// children in declaration order, then the node's own rules; duplicate
/// top-level names are reported last. The walk never mutates the trees —
/// fixes are attached as data and applied by the caller, which should
/// re-validate afterwards since overlapping fixes are not guaranteed to
/// commute.
pub fn validate_all(docs: &[&Document]) -> Vec<Diagnostic> {
    let mut ctx = Context {
        defs: DefinitionSet::new(docs.to_vec()),
        diagnostics: Vec::new(),
    };
    for def in ctx.defs.ordered().to_vec() {
        validate_node(&mut ctx, def);
    }
    rules::duplicates::check_top_level(&mut ctx);
    ctx.diagnostics
}

pub(crate) struct Context<'a> {
    pub(crate) defs: DefinitionSet<'a>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Context<'_> {
    pub(crate) fn report(
        &mut self,
        source: usize,
        token: TokenId,
        name: DiagnosticName,
        severity: DiagnosticSeverity,
        bare_message: String,
        fix: Option<Fix>,
    ) {
        let doc = self.defs.document(source);
        self.diagnostics.push(Diagnostic::new(
            doc,
            source,
            token,
            name,
            severity,
            bare_message,
            fix,
        ));
    }
}

fn validate_node(ctx: &mut Context, def: DefRef) {
    let doc = ctx.defs.doc(def);
    let data = doc.data(def.node);
    for child in data.children() {
        validate_node(
            ctx,
            DefRef {
                source: def.source,
                node: child,
            },
        );
    }
    match data {
        NodeData::Interface(_) => rules::interface::validate(ctx, def),
        NodeData::Operation(_) => rules::operation::validate(ctx, def),
        NodeData::Argument(_) => rules::argument::validate(ctx, def),
        NodeData::Type(_) => rules::types::validate(ctx, def),
        _ => {}
    }
}
