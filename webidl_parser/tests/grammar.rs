use test_case::test_case;
use webidl_parser::{parse, parse_with_name, NodeData, TokenKind};

#[test_case("interface { };", "Missing name in interface")]
#[test_case("interface Foo", "Bodyless interface")]
#[test_case("interface mixin { };", "Missing name in interface mixin")]
#[test_case("partial enum E { };", "Partial doesn't apply to anything")]
#[test_case("typedef long;", "Typedef lacks a name")]
#[test_case("typedef ;", "Typedef lacks a type")]
#[test_case("dictionary D { long x };", "Unterminated dictionary member, expected ';'")]
#[test_case("dictionary D { required long x = 1; };", "Required dictionary members must not have a default value")]
#[test_case("interface X { attribute long; };", "Attribute lacks a name")]
#[test_case("interface X { attribute ; };", "Attribute lacks a type")]
#[test_case("interface X { inherit readonly attribute long x; };", "Inherited attributes cannot be read-only")]
#[test_case("namespace N { attribute long x; };", "Attributes must be readonly in this location")]
#[test_case("interface X { void f(long x,); };", "Trailing comma in arguments list")]
#[test_case("interface X { void f(long x; };", "Unterminated operation")]
#[test_case("interface X { void f() };", "Unterminated operation, expected ';'")]
#[test_case("interface X { long ; };", "Invalid operation")]
#[test_case("enum E { \"a\" \"b\" };", "No comma between enum values")]
#[test_case("enum E { 1 };", "Unexpected value in enum")]
#[test_case("enum { };", "No name for enum")]
#[test_case("[] interface X { };", "Found an empty extended attribute")]
#[test_case("[A][B] interface X { };", "Illegal double extended attribute lists, consider merging them")]
#[test_case("interface X { };\n[Stray]", "Stray extended attributes")]
#[test_case("[A=] interface X { };", "No right hand side to extended attribute assignment")]
#[test_case("typedef (long) T;", "At least two types are expected in a union type but found less")]
#[test_case("typedef (any or long) T;", "Type `any` cannot be included in a union type")]
#[test_case("typedef Promise<void>? P;", "Promise type cannot be nullable")]
#[test_case("typedef sequence<> S;", "Missing sequence subtype")]
#[test_case("typedef record<long, long> R;", "Record key must be one of: ByteString, DOMString, USVString")]
#[test_case("typedef unsigned float F;", "Failed to parse integer type")]
#[test_case("typedef unrestricted long L;", "Failed to parse float type")]
#[test_case("interface X { const long X; };", "Const lacks value assignment")]
#[test_case("interface X { const long? X = 1; };", "Unexpected nullable constant type")]
#[test_case("interface X { iterable<long, DOMString, float>; };", "Missing greater-than sign `>` in iterable declaration")]
#[test_case("interface X { maplike<long>; };", "Missing second type argument in maplike declaration")]
#[test_case("interface X { iterable<long>(long a); };", "Arguments are only allowed for `async iterable`")]
#[test_case("interface X { constructor; };", "No argument list in constructor")]
#[test_case("A includes ;", "Incomplete includes statement")]
#[test_case("callback F = ;", "Callback lacks a return type")]
#[test_case("callback F = ();", "No type after open parenthesis or 'or' in union type")]
#[test_case("&", "Unrecognised tokens")]
fn syntax_errors(input: &str, expected: &str) {
    let error = parse(input).unwrap_err();
    assert_eq!(error.bare_message, expected);
}

#[test]
fn attribute_sequence_rejection_points_at_the_sequence_token() {
    let error = parse("interface mixin M { attribute sequence<long> xs; };").unwrap_err();
    assert_eq!(error.bare_message, "Attributes cannot accept sequence types");
    // The context caret sits under the `sequence` token.
    let lines: Vec<&str> = error.context.split('\n').collect();
    let caret_column = lines[1].len() - 1;
    assert_eq!(&lines[0][caret_column..caret_column + "sequence".len()], "sequence");
}

#[test]
fn reserved_identifier_rejection_is_verbatim() {
    let error = parse("interface X { void toString(); };").unwrap_err();
    assert_eq!(
        error.bare_message,
        "toString is a reserved identifier and must not be used."
    );
}

#[test]
fn keywords_are_valid_argument_names() {
    let doc = parse("interface X { void f(long interface, DOMString required); };").unwrap();
    let NodeData::Interface(interface) = doc.data(doc.definitions()[0]) else {
        panic!("expected an interface");
    };
    let NodeData::Operation(operation) = doc.data(interface.members[0]) else {
        panic!("expected an operation");
    };
    assert_eq!(operation.arguments.len(), 2);
}

#[test]
fn includes_backtracking_hands_the_identifier_back() {
    // `Window` alone cannot start any other definition, so a failed
    // includes attempt must restore the cursor before erroring.
    let error = parse("Window - GlobalEventHandlers;").unwrap_err();
    assert_eq!(error.bare_message, "Unrecognised tokens");
    let doc = parse("Window includes GlobalEventHandlers;").unwrap();
    assert!(matches!(
        doc.data(doc.definitions()[0]),
        NodeData::Includes(_)
    ));
}

#[test]
fn operation_can_be_named_includes() {
    let doc = parse("interface X { void includes(); };").unwrap();
    let NodeData::Interface(interface) = doc.data(doc.definitions()[0]) else {
        panic!("expected an interface");
    };
    let NodeData::Operation(operation) = doc.data(interface.members[0]) else {
        panic!("expected an operation");
    };
    let name = operation.name.expect("operation keeps its keyword name");
    assert_eq!(doc.token(name).kind(), TokenKind::INCLUDES_KW);
}

#[test]
fn error_lines_point_at_the_offending_token() {
    let error = parse("interface A { };\ninterface B {\n  attribute long;\n};").unwrap_err();
    assert_eq!(error.line, 3);
}

#[test]
fn syntax_error_serializes_with_the_stable_field_set() {
    let error = parse_with_name("interface { };", Some("demo.webidl")).unwrap_err();
    let value = serde_json::to_value(&error).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "message",
        "bareMessage",
        "context",
        "line",
        "sourceName",
        "input",
        "tokens",
    ] {
        assert!(object.contains_key(key), "missing field {key}");
    }
    assert_eq!(object["bareMessage"], "Missing name in interface");
    assert_eq!(object["sourceName"], "demo.webidl");
    assert_eq!(object["input"], "interface { };");
    let first = &object["tokens"][0];
    assert_eq!(first["type"], "interface");
    assert_eq!(first["value"], "interface");
    assert_eq!(first["trivia"], "");
    assert_eq!(first["line"], 1);
    assert_eq!(first["index"], 0);
    assert!(error.message.starts_with("Syntax error at line 1 in demo.webidl:"));
}

#[test]
fn stringifier_shorthand_is_an_empty_operation() {
    let doc = parse("interface X { stringifier; };").unwrap();
    let NodeData::Interface(interface) = doc.data(doc.definitions()[0]) else {
        panic!("expected an interface");
    };
    let NodeData::Operation(operation) = doc.data(interface.members[0]) else {
        panic!("expected an operation");
    };
    assert!(operation.return_type.is_none());
    assert!(operation.arguments.is_empty());
    assert!(operation.open.is_none());
}

#[test]
fn escaped_names_resolve_without_their_underscore() {
    let doc = parse("interface _Foo { };").unwrap();
    assert_eq!(doc.name_of(doc.definitions()[0]), Some("Foo"));
}
