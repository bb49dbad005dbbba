use webidl_parser::{Document, NodeData, NodeId, SyntaxError};

/// A deferred tree edit attached to a diagnostic. Fixes are plain data;
/// applying one mutates the document in place, synthesizing any new tokens
/// by tokenizing short literal fragments. The validator never applies
/// fixes itself — callers decide the order and re-validate in between,
/// since two fixes touching overlapping regions are not guaranteed to
/// commute.
#[derive(Clone, Copy, Debug)]
pub enum Fix {
    /// Inserts `[Exposed=Window]` on a definition, creating the extended
    /// attribute block if absent or splicing in front of an existing one.
    AddExposedWindow { definition: NodeId },
    /// Converts a legacy `[Constructor(...)]` extended attribute into a
    /// `constructor(...);` member, moving the arguments across.
    ConstructorMember {
        interface: NodeId,
        attribute: NodeId,
    },
    /// Makes a dictionary-typed argument `optional`, adding a `{}` default
    /// if it has none.
    OptionalDictionaryArgument { argument: NodeId },
    /// Adds ` = {}` to an optional dictionary-typed argument.
    DictionaryArgumentDefault { argument: NodeId },
}

/// Applies a fix to the document it was reported against. The mutated tree
/// writes back out as if the author had written the fixed form by hand.
pub fn apply_fix(doc: &mut Document, fix: &Fix) -> Result<(), SyntaxError> {
    match *fix {
        Fix::AddExposedWindow { definition } => add_exposed_window(doc, definition),
        Fix::ConstructorMember {
            interface,
            attribute,
        } => constructor_member(doc, interface, attribute),
        Fix::OptionalDictionaryArgument { argument } => optional_dictionary_argument(doc, argument),
        Fix::DictionaryArgumentDefault { argument } => dictionary_argument_default(doc, argument),
    }
}

fn add_exposed_window(doc: &mut Document, definition: NodeId) -> Result<(), SyntaxError> {
    match doc.data(definition).ext_attrs() {
        Some(block) => {
            let attribute = doc.synthesize_ext_attr("Exposed=Window,")?;
            // The previously-first attribute needs breathing room after the
            // new separator if it sat flush against the bracket.
            let existing_first = match doc.data(block) {
                NodeData::ExtendedAttributes(ea) => ea.items.first().copied(),
                _ => None,
            };
            if let Some(first) = existing_first.and_then(|item| doc.first_token_of(item)) {
                if doc.token(first).trivia().is_empty() {
                    doc.set_token_trivia(first, " ");
                }
            }
            if let NodeData::ExtendedAttributes(ea) = doc.data_mut(block) {
                ea.items.insert(0, attribute);
            }
            doc.set_parent(attribute, Some(block));
        }
        None => {
            // The definition's leading trivia moves onto the new `[`, and
            // the definition continues on the next line with the same
            // indentation.
            let Some(first) = doc.first_token_of(definition) else {
                return Ok(());
            };
            let trivia = doc.token(first).trivia().to_string();
            let indentation = last_indentation(&trivia).to_string();
            let block = doc.synthesize_ext_attrs("[Exposed=Window]")?;
            let open = match doc.data(block) {
                NodeData::ExtendedAttributes(ea) => ea.open,
                _ => return Ok(()),
            };
            doc.set_token_trivia(open, &trivia);
            doc.set_token_trivia(first, &format!("\n{indentation}"));
            doc.set_ext_attrs(definition, Some(block));
        }
    }
    Ok(())
}

fn constructor_member(
    doc: &mut Document,
    interface: NodeId,
    attribute: NodeId,
) -> Result<(), SyntaxError> {
    let NodeData::Interface(data) = doc.data(interface) else {
        return Ok(());
    };
    let Some(block) = data.ext_attrs else {
        return Ok(());
    };
    let close = data.close;
    let members = data.members.clone();
    let NodeData::ExtendedAttributes(ea) = doc.data(block) else {
        return Ok(());
    };
    let indentation = doc.token(ea.open).indentation().to_string();
    let member_indent = match members.first().and_then(|&first| doc.first_token_of(first)) {
        Some(token) => doc.token(token).indentation().to_string(),
        None => member_indentation(&indentation),
    };

    let constructor = doc.synthesize_constructor(&format!("\n{member_indent}constructor();"))?;

    // The legacy attribute's arguments move onto the new member wholesale,
    // tokens and all.
    let arguments = match doc.data_mut(attribute) {
        NodeData::ExtendedAttribute(attr) if !attr.rhs_is_list() => std::mem::take(&mut attr.list),
        _ => Vec::new(),
    };
    for &argument in &arguments {
        doc.set_parent(argument, Some(constructor));
    }
    if let NodeData::Constructor(ctor) = doc.data_mut(constructor) {
        ctor.arguments = arguments;
    }

    // Insert after the last existing constructor so declaration order stays
    // stable across repeated fixes.
    let insert_at = members
        .iter()
        .rposition(|&member| matches!(doc.data(member), NodeData::Constructor(_)))
        .map(|found| found + 1)
        .unwrap_or(0);
    if let NodeData::Interface(data) = doc.data_mut(interface) {
        data.members.insert(insert_at, constructor);
    }
    doc.set_parent(constructor, Some(interface));

    // A single-line body needs its closing brace pushed onto its own line.
    if !doc.token(close).trivia().contains('\n') {
        let trivia = format!("{}\n{indentation}", doc.token(close).trivia());
        doc.set_token_trivia(close, &trivia);
    }

    remove_ext_attr(doc, interface, block, attribute);
    Ok(())
}

/// Removes one attribute from an extended-attributes block, repairing
/// separators and trivia so the remaining text keeps its lexical shape. A
/// block left empty is dropped entirely and its leading trivia transfers to
/// the owner's next token.
fn remove_ext_attr(doc: &mut Document, owner: NodeId, block: NodeId, attribute: NodeId) {
    let NodeData::ExtendedAttributes(ea) = doc.data(block) else {
        return;
    };
    let Some(index) = ea.items.iter().position(|&item| item == attribute) else {
        return;
    };
    let open = ea.open;
    let count = ea.items.len();

    if count == 1 {
        let trivia = doc.token(open).trivia().to_string();
        doc.set_ext_attrs(owner, None);
        if let Some(first) = doc.first_token_of(owner) {
            doc.set_token_trivia(first, &trivia);
        }
        return;
    }

    if index == count - 1 {
        // The new last item loses its separator.
        let previous = match doc.data(block) {
            NodeData::ExtendedAttributes(ea) => ea.items[index - 1],
            _ => return,
        };
        doc.set_separator(previous, None);
    } else {
        // A following item inherits the removed item's leading trivia so it
        // does not carry a stray post-comma space to the front of the list.
        let next = match doc.data(block) {
            NodeData::ExtendedAttributes(ea) => ea.items[index + 1],
            _ => return,
        };
        let removed_first = doc.first_token_of(attribute);
        let next_first = doc.first_token_of(next);
        if let (Some(removed), Some(next_token)) = (removed_first, next_first) {
            let trivia = doc.token(removed).trivia().to_string();
            doc.set_token_trivia(next_token, &trivia);
        }
    }
    if let NodeData::ExtendedAttributes(ea) = doc.data_mut(block) {
        ea.items.remove(index);
    }
}

fn optional_dictionary_argument(doc: &mut Document, argument: NodeId) -> Result<(), SyntaxError> {
    let NodeData::Argument(data) = doc.data(argument) else {
        return Ok(());
    };
    let idl_type = data.idl_type;
    let has_default = data.default.is_some();
    let Some(type_first) = doc.first_token_of(idl_type) else {
        return Ok(());
    };
    // The keyword takes over the type's leading trivia; the type keeps a
    // single space.
    let trivia = doc.token(type_first).trivia().to_string();
    let optional = doc.synthesize_token("optional")?;
    doc.set_token_trivia(optional, &trivia);
    doc.set_token_trivia(type_first, " ");
    if let NodeData::Argument(data) = doc.data_mut(argument) {
        data.optional = Some(optional);
    }
    if !has_default {
        dictionary_argument_default(doc, argument)?;
    }
    Ok(())
}

fn dictionary_argument_default(doc: &mut Document, argument: NodeId) -> Result<(), SyntaxError> {
    let default = doc.synthesize_default(" = {}")?;
    if let NodeData::Argument(data) = doc.data_mut(argument) {
        data.default = Some(default);
    }
    doc.set_parent(default, Some(argument));
    Ok(())
}

/// The last line of a trivia run, which is the indentation in effect at the
/// token that follows it.
fn last_indentation(trivia: &str) -> &str {
    match trivia.rfind('\n') {
        Some(at) => &trivia[at + 1..],
        None => trivia,
    }
}

/// One indentation level deeper than the container's own, matching the
/// style already in use (tabs stay tabs).
fn member_indentation(parent: &str) -> String {
    let unit = if parent.contains('\t') { "\t" } else { "  " };
    format!("{parent}{unit}")
}
