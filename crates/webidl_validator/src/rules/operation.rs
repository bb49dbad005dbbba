use webidl_parser::{NodeData, TokenKind};

use crate::definitions::DefRef;
use crate::diagnostic::{DiagnosticName, DiagnosticSeverity};
use crate::Context;

pub(crate) fn validate(ctx: &mut Context, def: DefRef) {
    let doc = ctx.defs.doc(def);
    let NodeData::Operation(data) = doc.data(def.node) else {
        return;
    };
    if data.name.is_some() {
        return;
    }
    // Getters, setters, deleters, and stringifiers may be nameless; regular
    // and static operations may not.
    let special = data.special.map(|token| doc.token(token).kind());
    if !matches!(special, None | Some(TokenKind::STATIC_KW)) {
        return;
    }
    let Some(open) = data.open else {
        return;
    };
    ctx.report(
        def.source,
        open,
        DiagnosticName::IncompleteOp,
        DiagnosticSeverity::Error,
        "Regular or static operations must have both a return type and an identifier."
            .to_string(),
        None,
    );
}
