use test_case::test_case;
use webidl_parser::{parse, NodeData};
use webidl_validator::{validate, validate_all, DefRef, DefinitionSet, DiagnosticName};

#[test]
fn bare_interface_requires_exposed() {
    let doc = parse("interface Foo { };").unwrap();
    let diagnostics = validate(&doc);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, DiagnosticName::RequireExposed);
    assert_eq!(diagnostics[0].name.as_str(), "require-exposed");
    assert!(diagnostics[0].fix.is_some());
}

#[test_case("[Exposed=Window] interface Foo { };" ; "exposed")]
#[test_case("[NoInterfaceObject] interface Foo { };" ; "no interface object")]
#[test_case("partial interface Foo { };" ; "partial")]
fn exposure_annotations_satisfy_the_rule(input: &str) {
    let doc = parse(input).unwrap();
    let diagnostics = validate(&doc);
    assert!(
        !diagnostics
            .iter()
            .any(|d| d.name == DiagnosticName::RequireExposed),
        "unexpected require-exposed for {input:?}"
    );
}

#[test]
fn legacy_constructor_attribute_is_reported() {
    let doc = parse("[Exposed=Window, Constructor(long x)] interface Bar { };").unwrap();
    let diagnostics = validate(&doc);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, DiagnosticName::ConstructorMember);
    assert!(diagnostics[0].fix.is_some());
}

#[test]
fn global_interfaces_must_not_be_constructible() {
    let doc = parse(
        "[Exposed=Window, Global=Window] interface G {\n  constructor();\n};",
    )
    .unwrap();
    let diagnostics = validate(&doc);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, DiagnosticName::NoConstructibleGlobal);

    let doc = parse(
        "[Exposed=Window, Global=Window, NamedConstructor=MakeG] interface G { };",
    )
    .unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(names, vec![DiagnosticName::NoConstructibleGlobal]);
}

#[test]
fn nameless_regular_operations_are_incomplete() {
    let doc = parse("[Exposed=Window] interface X {\n  void ();\n  static void ();\n};").unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![DiagnosticName::IncompleteOp, DiagnosticName::IncompleteOp]
    );
}

#[test]
fn nameless_getter_is_complete() {
    let doc = parse("[Exposed=Window] interface I { getter long (long x); };").unwrap();
    assert!(validate(&doc).is_empty());
}

#[test]
fn member_diagnostics_come_before_interface_diagnostics() {
    let doc = parse("interface X { void (); };").unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![DiagnosticName::IncompleteOp, DiagnosticName::RequireExposed]
    );
}

#[test]
fn duplicated_definition_names_are_reported_last() {
    let doc = parse(
        "[Exposed=Window] interface A { };\n[Exposed=Window] interface A { };",
    )
    .unwrap();
    let diagnostics = validate(&doc);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, DiagnosticName::NoDuplicate);
    assert_eq!(
        diagnostics[0].bare_message,
        "The name \"A\" of type \"interface\" was already seen"
    );
}

#[test]
fn duplicate_members_within_and_across_partials() {
    let doc = parse(
        "[Exposed=Window] interface X {\n  attribute long a;\n  attribute long a;\n};",
    )
    .unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(names, vec![DiagnosticName::DuplicateMember]);

    let doc = parse(
        "[Exposed=Window] interface X {\n  attribute long a;\n};\npartial interface X {\n  attribute long a;\n};",
    )
    .unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(names, vec![DiagnosticName::DuplicateMember]);
}

#[test]
fn operations_cannot_cross_overload() {
    let doc = parse(
        "[Exposed=Window] interface X {\n  void f();\n};\npartial interface X {\n  void f();\n};",
    )
    .unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(names, vec![DiagnosticName::NoCrossOverload]);

    let doc = parse(
        "[Exposed=Window] interface X {\n  void f();\n};\ninterface mixin M {\n  void f();\n};\nX includes M;",
    )
    .unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(names, vec![DiagnosticName::NoCrossOverload]);

    // Overloads inside a single definition are fine.
    let doc = parse(
        "[Exposed=Window] interface X {\n  void f();\n  void f(long x);\n};",
    )
    .unwrap();
    assert!(validate(&doc).is_empty());
}

#[test]
fn dictionary_arguments_follow_the_optionality_rules() {
    // No required fields and in last position: must be optional.
    let doc = parse(
        "dictionary D {\n  long x;\n};\n[Exposed=Window] interface X {\n  void f(D d);\n};",
    )
    .unwrap();
    let diagnostics = validate(&doc);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, DiagnosticName::DictArgOptional);

    // A required argument after it lifts the rule.
    let doc = parse(
        "dictionary D {\n  long x;\n};\n[Exposed=Window] interface X {\n  void f(D d, long after);\n};",
    )
    .unwrap();
    assert!(validate(&doc).is_empty());

    // A dictionary with a required field may stay non-optional.
    let doc = parse(
        "dictionary R {\n  required long x;\n};\n[Exposed=Window] interface X {\n  void f(R r);\n};",
    )
    .unwrap();
    assert!(validate(&doc).is_empty());

    // Optional dictionary arguments need a default.
    let doc = parse(
        "dictionary D {\n  long x;\n};\n[Exposed=Window] interface X {\n  void f(optional D d);\n};",
    )
    .unwrap();
    let diagnostics = validate(&doc);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, DiagnosticName::DictArgDefault);

    // Nullable dictionary arguments are rejected outright.
    let doc = parse(
        "dictionary D {\n  long x;\n};\n[Exposed=Window] interface X {\n  void f(D? d);\n};",
    )
    .unwrap();
    let diagnostics = validate(&doc);
    assert!(diagnostics
        .iter()
        .any(|d| d.name == DiagnosticName::NoNullableDictArg));
}

#[test]
fn nullable_unions_must_not_reach_a_dictionary() {
    let doc = parse("dictionary D { };\ntypedef (long or D)? U;").unwrap();
    let names: Vec<DiagnosticName> = validate(&doc).iter().map(|d| d.name).collect();
    assert_eq!(names, vec![DiagnosticName::NoNullableUnionDict]);

    let doc = parse("typedef (long or DOMString)? U;").unwrap();
    assert!(validate(&doc).is_empty());
}

#[test]
fn required_field_analysis_follows_typedefs_and_inheritance() {
    let doc = parse("dictionary D {\n  required long x;\n};\ntypedef D T;").unwrap();
    let defs = DefinitionSet::new(vec![&doc]);
    let dictionary = defs.lookup("D").unwrap();
    assert!(defs.dictionary_includes_required_field(dictionary));

    let typedef = defs.lookup("T").unwrap();
    let NodeData::Typedef(data) = defs.data(typedef) else {
        panic!("expected a typedef");
    };
    let ty = DefRef {
        source: typedef.source,
        node: data.idl_type,
    };
    let found = defs
        .idl_type_includes_dictionary(ty, false)
        .expect("typedef target references a dictionary");
    assert_eq!(found.dictionary, dictionary);

    // Inherited required fields count.
    let doc = parse(
        "dictionary Base {\n  required long x;\n};\ndictionary Sub : Base { };",
    )
    .unwrap();
    let defs = DefinitionSet::new(vec![&doc]);
    assert!(defs.dictionary_includes_required_field(defs.lookup("Sub").unwrap()));

    // Unknown superdictionaries are assumed to have required fields.
    let doc = parse("dictionary C : Missing { };").unwrap();
    let defs = DefinitionSet::new(vec![&doc]);
    assert!(defs.dictionary_includes_required_field(defs.lookup("C").unwrap()));
}

#[test]
fn analyses_terminate_on_cycles_with_stable_answers() {
    let doc = parse("typedef T2 T1;\ntypedef T1 T2;").unwrap();
    let defs = DefinitionSet::new(vec![&doc]);
    let t1 = defs.lookup("T1").unwrap();
    let NodeData::Typedef(data) = defs.data(t1) else {
        panic!("expected a typedef");
    };
    let ty = DefRef {
        source: t1.source,
        node: data.idl_type,
    };
    assert!(defs.idl_type_includes_dictionary(ty, false).is_none());
    assert!(defs.idl_type_includes_dictionary(ty, false).is_none());

    let doc = parse("dictionary A : B { };\ndictionary B : A { };").unwrap();
    let defs = DefinitionSet::new(vec![&doc]);
    let a = defs.lookup("A").unwrap();
    let b = defs.lookup("B").unwrap();
    assert!(!defs.dictionary_includes_required_field(a));
    assert!(!defs.dictionary_includes_required_field(b));
    assert!(!defs.dictionary_includes_required_field(a));
}

#[test]
fn definitions_resolve_across_documents() {
    let dictionaries = parse("dictionary D {\n  long x;\n};").unwrap();
    let interfaces = parse(
        "[Exposed=Window] interface X {\n  void f(optional D d);\n};",
    )
    .unwrap();
    let diagnostics = validate_all(&[&dictionaries, &interfaces]);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].name, DiagnosticName::DictArgDefault);
    assert_eq!(diagnostics[0].source_index, 1);
}

#[test]
fn diagnostics_serialize_with_stable_names() {
    let doc = parse("interface Foo { };").unwrap();
    let diagnostics = validate(&doc);
    let value = serde_json::to_value(&diagnostics[0]).unwrap();
    assert_eq!(value["name"], "require-exposed");
    assert_eq!(value["severity"], "warning");
    assert_eq!(value["line"], 1);
    assert!(value["bareMessage"].as_str().unwrap().contains("[Exposed]"));
    // The fix is behavior, not data; it never appears on the wire.
    assert!(value.get("fix").is_none());
}

#[test]
fn diagnostics_render_a_context_window() {
    let doc = parse("interface Foo { };").unwrap();
    let diagnostics = validate(&doc);
    assert_eq!(diagnostics[0].line, 1);
    assert!(diagnostics[0].context.contains("interface Foo"));
    assert!(diagnostics[0]
        .message
        .starts_with("Validation error at line 1:"));
}
