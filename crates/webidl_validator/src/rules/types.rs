use webidl_parser::NodeData;

use crate::definitions::DefRef;
use crate::diagnostic::{DiagnosticName, DiagnosticSeverity};
use crate::Context;

/// A nullable type must not reach a dictionary, whether it is a nullable
/// union with a dictionary branch or a nullable typedef chain that bottoms
/// out in one. The plain `Dict? arg` case is reported by the argument rule
/// instead.
pub(crate) fn validate(ctx: &mut Context, def: DefRef) {
    let doc = ctx.defs.doc(def);
    let NodeData::Type(data) = doc.data(def.node) else {
        return;
    };
    if data.nullable.is_none() {
        return;
    }
    let target = if data.union {
        Some(def)
    } else {
        doc.type_referent(data)
            .and_then(|name| ctx.defs.lookup(name))
            .and_then(|candidate| match ctx.defs.data(candidate) {
                NodeData::Typedef(typedef) => Some(DefRef {
                    source: candidate.source,
                    node: typedef.idl_type,
                }),
                _ => None,
            })
    };
    let Some(target) = target else {
        return;
    };
    let Some(found) = ctx.defs.idl_type_includes_dictionary(target, true) else {
        return;
    };
    // Point at the offending union branch, or at this type's own base for
    // typedef chains.
    let anchored = if data.union { found.reference } else { def };
    let anchor_doc = ctx.defs.doc(anchored);
    let anchor = match anchor_doc.data(anchored.node) {
        NodeData::Type(ty) => ty.base,
        _ => None,
    };
    let Some(anchor) = anchor.or_else(|| anchor_doc.first_token_of(anchored.node)) else {
        return;
    };
    ctx.report(
        anchored.source,
        anchor,
        DiagnosticName::NoNullableUnionDict,
        DiagnosticSeverity::Error,
        "Nullable union cannot include a dictionary type.".to_string(),
        None,
    );
}
