use rustc_hash::FxHashSet;
use webidl_parser::{unescape_identifier, NodeData};

use crate::definitions::DefRef;
use crate::diagnostic::{DiagnosticName, DiagnosticSeverity};
use crate::Context;

/// Reports every non-partial top-level definition whose name was already
/// taken. Runs once after the per-definition walk.
pub(crate) fn check_top_level(ctx: &mut Context) {
    let duplicates = ctx.defs.duplicates().to_vec();
    for dup in duplicates {
        let doc = ctx.defs.doc(dup);
        let Some(name) = doc.name_of(dup.node) else {
            continue;
        };
        let Some(name_token) = doc.data(dup.node).name_token() else {
            continue;
        };
        let original_type = ctx
            .defs
            .lookup(name)
            .map(|original| ctx.defs.doc(original).type_name_of(original.node).to_string())
            .unwrap_or_default();
        ctx.report(
            dup.source,
            name_token,
            DiagnosticName::NoDuplicate,
            DiagnosticSeverity::Error,
            format!("The name \"{name}\" of type \"{original_type}\" was already seen"),
            None,
        );
    }
}

/// Member collision checks for a base interface: named non-operation
/// members must be unique across the interface and its partials, and
/// partials and mixins may not redefine an operation the base already
/// declares (overloads do not cross definition boundaries).
pub(crate) fn check_interface_members(ctx: &mut Context, def: DefRef) {
    let doc = ctx.defs.doc(def);
    let NodeData::Interface(data) = doc.data(def.node) else {
        return;
    };
    if data.partial.is_some() {
        return;
    }
    let Some(name) = doc.name_of(def.node) else {
        return;
    };

    let mut base_op_names: FxHashSet<&str> = FxHashSet::default();
    for &member in &data.members {
        if let NodeData::Operation(op) = doc.data(member) {
            if let Some(op_name) = op.name {
                base_op_names.insert(unescape_identifier(doc.token(op_name).text()));
            }
        }
    }

    let partials = ctx.defs.partials_of(name).to_vec();
    let mut groups = vec![def];
    groups.extend(partials.iter().copied());

    let mut seen: FxHashSet<String> = FxHashSet::default();
    for group in &groups {
        let group_doc = ctx.defs.doc(*group);
        for &member in ctx.defs.data(*group).members() {
            if !matches!(
                group_doc.data(member),
                NodeData::Attribute(_) | NodeData::Constant(_)
            ) {
                continue;
            }
            let Some(member_name) = group_doc.name_of(member) else {
                continue;
            };
            if seen.insert(member_name.to_string()) {
                continue;
            }
            let Some(name_token) = group_doc.data(member).name_token() else {
                continue;
            };
            ctx.report(
                group.source,
                name_token,
                DiagnosticName::DuplicateMember,
                DiagnosticSeverity::Error,
                format!(
                    "The identifier \"{member_name}\" has already been used as a member of this interface"
                ),
                None,
            );
        }
    }

    let mut extensions = partials;
    extensions.extend(ctx.defs.mixins_of(name).iter().copied());
    for extension in extensions {
        let ext_doc = ctx.defs.doc(extension);
        for &member in ctx.defs.data(extension).members() {
            let NodeData::Operation(op) = ext_doc.data(member) else {
                continue;
            };
            let Some(name_token) = op.name else {
                continue;
            };
            let op_name = unescape_identifier(ext_doc.token(name_token).text());
            if !base_op_names.contains(op_name) {
                continue;
            }
            let message = format!(
                "The operation \"{op_name}\" has already been defined for the base interface"
            );
            ctx.report(
                extension.source,
                name_token,
                DiagnosticName::NoCrossOverload,
                DiagnosticSeverity::Error,
                message,
                None,
            );
        }
    }
}
