use webidl_parser::{Document, NodeData, NodeId};

use crate::definitions::DefRef;
use crate::diagnostic::{DiagnosticName, DiagnosticSeverity};
use crate::fix::Fix;
use crate::Context;

pub(crate) fn validate(ctx: &mut Context, def: DefRef) {
    let doc = ctx.defs.doc(def);
    let NodeData::Argument(data) = doc.data(def.node) else {
        return;
    };
    let ty_ref = DefRef {
        source: def.source,
        node: data.idl_type,
    };
    let Some(result) = ctx.defs.idl_type_includes_dictionary(ty_ref, true) else {
        return;
    };
    let nullable =
        matches!(doc.data(data.idl_type), NodeData::Type(ty) if ty.nullable.is_some());
    if nullable {
        ctx.report(
            def.source,
            data.name,
            DiagnosticName::NoNullableDictArg,
            DiagnosticSeverity::Error,
            "Dictionary arguments cannot be nullable.".to_string(),
            None,
        );
    } else if data.optional.is_none() {
        if is_last_required_argument(doc, def.node)
            && !ctx.defs.dictionary_includes_required_field(result.dictionary)
        {
            ctx.report(
                def.source,
                data.name,
                DiagnosticName::DictArgOptional,
                DiagnosticSeverity::Error,
                "Dictionary argument must be optional if it has no required fields".to_string(),
                Some(Fix::OptionalDictionaryArgument { argument: def.node }),
            );
        }
    } else if data.default.is_none() {
        ctx.report(
            def.source,
            data.name,
            DiagnosticName::DictArgDefault,
            DiagnosticSeverity::Error,
            "Optional dictionary arguments must have a default value of `{}`.".to_string(),
            Some(Fix::DictionaryArgumentDefault { argument: def.node }),
        );
    }
}

/// True when no required argument follows this one in its owner's list, in
/// which case making it optional would not strand later arguments.
fn is_last_required_argument(doc: &Document, argument: NodeId) -> bool {
    let Some(parent) = doc.node(argument).parent() else {
        return true;
    };
    let siblings: &[NodeId] = match doc.data(parent) {
        NodeData::Operation(d) => &d.arguments,
        NodeData::Constructor(d) => &d.arguments,
        NodeData::CallbackFunction(d) => &d.arguments,
        NodeData::IterableLike(d) => &d.arguments,
        NodeData::ExtendedAttribute(d) => &d.list,
        _ => return true,
    };
    let Some(index) = siblings.iter().position(|&sibling| sibling == argument) else {
        return true;
    };
    !siblings[index + 1..].iter().any(|&sibling| {
        matches!(doc.data(sibling), NodeData::Argument(arg) if arg.optional.is_none())
    })
}
