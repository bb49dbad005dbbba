use webidl_parser::{parse, write, NodeData};
use webidl_validator::{apply_fix, validate, DiagnosticName, Fix};

fn fix_for(doc: &webidl_parser::Document, name: DiagnosticName) -> Fix {
    validate(doc)
        .into_iter()
        .find(|diagnostic| diagnostic.name == name)
        .and_then(|diagnostic| diagnostic.fix)
        .expect("expected a fix")
}

#[test]
fn exposed_fix_creates_a_block_and_keeps_the_line_shape() {
    let mut doc = parse("interface Foo { };").unwrap();
    let fix = fix_for(&doc, DiagnosticName::RequireExposed);
    apply_fix(&mut doc, &fix).unwrap();
    assert_eq!(write(&doc), "[Exposed=Window]\ninterface Foo { };");
}

#[test]
fn exposed_fix_preserves_trailing_text_and_indentation() {
    let mut doc = parse("  interface Foo { };\n").unwrap();
    let fix = fix_for(&doc, DiagnosticName::RequireExposed);
    apply_fix(&mut doc, &fix).unwrap();
    assert_eq!(write(&doc), "  [Exposed=Window]\n  interface Foo { };\n");
}

#[test]
fn exposed_fix_splices_into_an_existing_block() {
    let mut doc = parse("[SecureContext]\ninterface Foo { };").unwrap();
    let fix = fix_for(&doc, DiagnosticName::RequireExposed);
    apply_fix(&mut doc, &fix).unwrap();
    assert_eq!(write(&doc), "[Exposed=Window, SecureContext]\ninterface Foo { };");
}

#[test]
fn exposed_fix_resolves_the_diagnostic() {
    let mut doc = parse("interface Foo { };").unwrap();
    let fix = fix_for(&doc, DiagnosticName::RequireExposed);
    apply_fix(&mut doc, &fix).unwrap();
    assert!(!validate(&doc)
        .iter()
        .any(|diagnostic| diagnostic.name == DiagnosticName::RequireExposed));
}

#[test]
fn constructor_fix_moves_the_arguments_onto_a_member() {
    let mut doc = parse("[Exposed=Window, Constructor(long x)] interface Bar { };").unwrap();
    let fix = fix_for(&doc, DiagnosticName::ConstructorMember);
    apply_fix(&mut doc, &fix).unwrap();

    let NodeData::Interface(interface) = doc.data(doc.definitions()[0]) else {
        panic!("expected an interface");
    };
    let NodeData::Constructor(constructor) = doc.data(interface.members[0]) else {
        panic!("expected the new constructor as the first member");
    };
    assert_eq!(constructor.arguments.len(), 1);
    // The argument nodes were moved, so their parent follows them.
    assert_eq!(
        doc.node(constructor.arguments[0]).parent(),
        Some(interface.members[0])
    );

    let output = write(&doc);
    assert!(output.contains("constructor(long x);"), "got {output:?}");
    assert!(!output.contains("Constructor"), "got {output:?}");
    assert!(output.starts_with("[Exposed=Window] interface Bar {"));
    assert!(!validate(&doc)
        .iter()
        .any(|diagnostic| diagnostic.name == DiagnosticName::ConstructorMember));
}

#[test]
fn constructor_fix_drops_an_emptied_attribute_block() {
    let mut doc = parse("[Constructor] interface A { };").unwrap();
    let fix = fix_for(&doc, DiagnosticName::ConstructorMember);
    apply_fix(&mut doc, &fix).unwrap();
    let output = write(&doc);
    assert!(output.starts_with("interface A {"), "got {output:?}");
    assert!(output.contains("\n  constructor();"), "got {output:?}");
    assert!(!output.contains('['), "got {output:?}");
}

#[test]
fn constructor_fix_inserts_after_existing_constructors() {
    let mut doc = parse(
        "[Exposed=Window, Constructor(long x)] interface Bar {\n  constructor();\n  void f();\n};",
    )
    .unwrap();
    let fix = fix_for(&doc, DiagnosticName::ConstructorMember);
    apply_fix(&mut doc, &fix).unwrap();
    let NodeData::Interface(interface) = doc.data(doc.definitions()[0]) else {
        panic!("expected an interface");
    };
    let kinds: Vec<&str> = interface
        .members
        .iter()
        .map(|&member| doc.type_name_of(member))
        .collect();
    assert_eq!(kinds, vec!["constructor", "constructor", "operation"]);
    // Indentation is copied from the existing members.
    assert!(write(&doc).contains("\n  constructor(long x);"));
}

#[test]
fn optional_fix_adds_the_keyword_and_a_default() {
    let mut doc = parse(
        "dictionary D {\n  long x;\n};\n[Exposed=Window] interface X {\n  void f(D d);\n};",
    )
    .unwrap();
    let fix = fix_for(&doc, DiagnosticName::DictArgOptional);
    apply_fix(&mut doc, &fix).unwrap();
    let output = write(&doc);
    assert!(output.contains("void f(optional D d = {});"), "got {output:?}");
    assert!(validate(&doc).is_empty());
}

#[test]
fn default_fix_appends_an_empty_dictionary() {
    let mut doc = parse(
        "dictionary D {\n  long x;\n};\n[Exposed=Window] interface X {\n  void f(optional D d);\n};",
    )
    .unwrap();
    let fix = fix_for(&doc, DiagnosticName::DictArgDefault);
    apply_fix(&mut doc, &fix).unwrap();
    let output = write(&doc);
    assert!(output.contains("void f(optional D d = {});"), "got {output:?}");
    assert!(validate(&doc).is_empty());
}
