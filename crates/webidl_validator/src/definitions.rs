use std::cell::RefCell;

use rustc_hash::FxHashMap;
use webidl_parser::{unescape_identifier, Document, NodeData, NodeId, TokenId};

/// A node in one of the validated documents. Definitions, members, and
/// types are all addressed this way so analyses can cross document
/// boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DefRef {
    pub source: usize,
    pub node: NodeId,
}

/// The result of a successful dictionary-containment analysis: the type
/// node that referenced the dictionary and the dictionary definition it
/// resolved to.
#[derive(Clone, Copy, Debug)]
pub struct DictionaryRef {
    pub reference: DefRef,
    pub dictionary: DefRef,
}

/// Memo entry for the recursive analyses. An absent map entry means the
/// value was never computed; `Pending` marks a computation in progress and
/// doubles as the cycle guard, answering pessimistically on re-entry.
enum CacheState<T> {
    Pending,
    Done(T),
}

/// The post-parse index over every top-level definition of one or more
/// documents: unique names, duplicates, partial fragments, includes
/// statements, resolved mixins, and the memo tables for the recursive
/// analyses.
pub struct DefinitionSet<'a> {
    docs: Vec<&'a Document>,
    ordered: Vec<DefRef>,
    unique: FxHashMap<&'a str, DefRef>,
    duplicates: Vec<DefRef>,
    partials: FxHashMap<&'a str, Vec<DefRef>>,
    includes: Vec<DefRef>,
    mixin_map: FxHashMap<&'a str, Vec<DefRef>>,
    typedef_cache: RefCell<FxHashMap<DefRef, CacheState<Option<DefRef>>>>,
    required_cache: RefCell<FxHashMap<DefRef, CacheState<bool>>>,
}

impl<'a> DefinitionSet<'a> {
    pub fn new(docs: Vec<&'a Document>) -> Self {
        let mut set = Self {
            docs,
            ordered: Vec::new(),
            unique: FxHashMap::default(),
            duplicates: Vec::new(),
            partials: FxHashMap::default(),
            includes: Vec::new(),
            mixin_map: FxHashMap::default(),
            typedef_cache: RefCell::new(FxHashMap::default()),
            required_cache: RefCell::new(FxHashMap::default()),
        };
        for (source, doc) in set.docs.iter().enumerate() {
            for &node in doc.definitions() {
                let def = DefRef { source, node };
                set.ordered.push(def);
                if let NodeData::Includes(_) = doc.data(node) {
                    set.includes.push(def);
                    continue;
                }
                let Some(name) = doc.name_of(node) else {
                    continue;
                };
                if partial_token(doc.data(node)).is_some() {
                    set.partials.entry(name).or_default().push(def);
                    continue;
                }
                if set.unique.contains_key(name) {
                    set.duplicates.push(def);
                } else {
                    set.unique.insert(name, def);
                }
            }
        }
        // Resolve `A includes B;` statements into a mixin map keyed by the
        // including interface's name.
        for &def in &set.includes {
            let doc = set.docs[def.source];
            let NodeData::Includes(stmt) = doc.data(def.node) else {
                continue;
            };
            let mixin_name = unescape_identifier(doc.token(stmt.mixin).text());
            let Some(&mixin) = set.unique.get(mixin_name) else {
                continue;
            };
            if !matches!(set.docs[mixin.source].data(mixin.node), NodeData::Mixin(_)) {
                continue;
            }
            let target = unescape_identifier(doc.token(stmt.target).text());
            set.mixin_map.entry(target).or_default().push(mixin);
        }
        set
    }

    pub fn document(&self, source: usize) -> &'a Document {
        self.docs[source]
    }

    pub fn doc(&self, def: DefRef) -> &'a Document {
        self.docs[def.source]
    }

    pub fn data(&self, def: DefRef) -> &'a NodeData {
        self.docs[def.source].data(def.node)
    }

    /// Every top-level definition of every document, in order.
    pub fn ordered(&self) -> &[DefRef] {
        &self.ordered
    }

    pub fn lookup(&self, name: &str) -> Option<DefRef> {
        self.unique.get(name).copied()
    }

    pub fn duplicates(&self) -> &[DefRef] {
        &self.duplicates
    }

    pub fn partials_of(&self, name: &str) -> &[DefRef] {
        self.partials.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn mixins_of(&self, name: &str) -> &[DefRef] {
        self.mixin_map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the given type ultimately references a dictionary: directly,
    /// through a chain of typedefs, or through any branch of a union.
    /// Nullable references do not count unless `use_nullable_inner` is set.
    /// Typedef results are memoized; a typedef cycle resolves to "no
    /// dictionary found".
    pub fn idl_type_includes_dictionary(
        &self,
        ty_ref: DefRef,
        use_nullable_inner: bool,
    ) -> Option<DictionaryRef> {
        let doc = self.doc(ty_ref);
        let NodeData::Type(ty) = doc.data(ty_ref.node) else {
            return None;
        };
        if !ty.union {
            let name = doc.type_referent(ty)?;
            let def = self.lookup(name)?;
            return match self.data(def) {
                NodeData::Typedef(typedef) => {
                    if let Some(state) = self.typedef_cache.borrow().get(&def) {
                        return match state {
                            CacheState::Pending => None,
                            CacheState::Done(found) => (*found).map(|dictionary| DictionaryRef {
                                reference: ty_ref,
                                dictionary,
                            }),
                        };
                    }
                    self.typedef_cache
                        .borrow_mut()
                        .insert(def, CacheState::Pending);
                    let target = DefRef {
                        source: def.source,
                        node: typedef.idl_type,
                    };
                    let dictionary = self
                        .idl_type_includes_dictionary(target, false)
                        .map(|result| result.dictionary);
                    self.typedef_cache
                        .borrow_mut()
                        .insert(def, CacheState::Done(dictionary));
                    dictionary.map(|dictionary| DictionaryRef {
                        reference: ty_ref,
                        dictionary,
                    })
                }
                NodeData::Dictionary(_) => {
                    if use_nullable_inner || ty.nullable.is_none() {
                        Some(DictionaryRef {
                            reference: ty_ref,
                            dictionary: def,
                        })
                    } else {
                        None
                    }
                }
                _ => None,
            };
        }
        for &subtype in &ty.subtypes {
            let sub_ref = DefRef {
                source: ty_ref.source,
                node: subtype,
            };
            let Some(result) = self.idl_type_includes_dictionary(sub_ref, false) else {
                continue;
            };
            let sub_is_union = matches!(doc.data(subtype), NodeData::Type(sub) if sub.union);
            if sub_is_union {
                return Some(result);
            }
            return Some(DictionaryRef {
                reference: sub_ref,
                dictionary: result.dictionary,
            });
        }
        None
    }

    /// Whether a dictionary, or any dictionary it inherits from, declares a
    /// required field. An unknown superdictionary is assumed to have one.
    /// Results are memoized per dictionary; an inheritance cycle resolves to
    /// "no required field".
    pub fn dictionary_includes_required_field(&self, dict: DefRef) -> bool {
        if let Some(state) = self.required_cache.borrow().get(&dict) {
            return match state {
                CacheState::Pending => false,
                CacheState::Done(value) => *value,
            };
        }
        self.required_cache
            .borrow_mut()
            .insert(dict, CacheState::Pending);
        let result = self.compute_required_field(dict);
        self.required_cache
            .borrow_mut()
            .insert(dict, CacheState::Done(result));
        result
    }

    fn compute_required_field(&self, dict: DefRef) -> bool {
        let doc = self.doc(dict);
        let NodeData::Dictionary(data) = doc.data(dict.node) else {
            return false;
        };
        let own = data.members.iter().any(|&member| {
            matches!(doc.data(member), NodeData::Field(field) if field.required.is_some())
        });
        if own {
            return true;
        }
        let Some(inheritance) = data.inheritance else {
            return false;
        };
        let name = unescape_identifier(doc.token(inheritance).text());
        match self.lookup(name) {
            None => true,
            Some(superdict) => match self.data(superdict) {
                NodeData::Dictionary(_) => self.dictionary_includes_required_field(superdict),
                _ => false,
            },
        }
    }
}

fn partial_token(data: &NodeData) -> Option<TokenId> {
    match data {
        NodeData::Interface(d) => d.partial,
        NodeData::Mixin(d) => d.partial,
        NodeData::Namespace(d) => d.partial,
        NodeData::Dictionary(d) => d.partial,
        _ => None,
    }
}
