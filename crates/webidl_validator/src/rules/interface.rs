use webidl_parser::{NodeData, NodeId, TokenId};

use crate::definitions::DefRef;
use crate::diagnostic::{DiagnosticName, DiagnosticSeverity};
use crate::fix::Fix;
use crate::rules::duplicates;
use crate::Context;

pub(crate) fn validate(ctx: &mut Context, def: DefRef) {
    let doc = ctx.defs.doc(def);
    let NodeData::Interface(data) = doc.data(def.node) else {
        return;
    };

    // (attribute node, attribute name, name token) for every extended
    // attribute on the interface.
    let mut attrs: Vec<(NodeId, &str, TokenId)> = Vec::new();
    if let Some(block) = data.ext_attrs {
        if let NodeData::ExtendedAttributes(ea) = doc.data(block) {
            for &item in &ea.items {
                if let NodeData::ExtendedAttribute(attr) = doc.data(item) {
                    attrs.push((item, doc.token(attr.name).text(), attr.name));
                }
            }
        }
    }

    if data.partial.is_none()
        && !attrs
            .iter()
            .any(|(_, name, _)| *name == "Exposed" || *name == "NoInterfaceObject")
    {
        ctx.report(
            def.source,
            data.name,
            DiagnosticName::RequireExposed,
            DiagnosticSeverity::Warning,
            "Interfaces must have `[Exposed]` extended attribute. To fix, add, for example, \
             `[Exposed=Window]`. Please also consider carefully if your interface should also \
             be exposed in a Worker scope."
                .to_string(),
            Some(Fix::AddExposedWindow {
                definition: def.node,
            }),
        );
    }

    for &(item, name, name_token) in &attrs {
        if name != "Constructor" {
            continue;
        }
        ctx.report(
            def.source,
            name_token,
            DiagnosticName::ConstructorMember,
            DiagnosticSeverity::Warning,
            "Constructors should now be represented as a `constructor()` operation on the \
             interface instead of `[Constructor]` extended attribute."
                .to_string(),
            Some(Fix::ConstructorMember {
                interface: def.node,
                attribute: item,
            }),
        );
    }

    if attrs.iter().any(|(_, name, _)| *name == "Global") {
        for &(_, name, name_token) in &attrs {
            if name != "NamedConstructor" {
                continue;
            }
            ctx.report(
                def.source,
                name_token,
                DiagnosticName::NoConstructibleGlobal,
                DiagnosticSeverity::Error,
                "Interfaces marked as `[Global]` cannot have named constructors.".to_string(),
                None,
            );
        }
        for &member in &data.members {
            if let NodeData::Constructor(constructor) = doc.data(member) {
                ctx.report(
                    def.source,
                    constructor.base,
                    DiagnosticName::NoConstructibleGlobal,
                    DiagnosticSeverity::Error,
                    "Interfaces marked as `[Global]` cannot have constructors.".to_string(),
                    None,
                );
            }
        }
    }

    duplicates::check_interface_members(ctx, def);
}
