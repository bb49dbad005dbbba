use webidl_parser::{parse, write, NodeData, TokenKind};

/// Inputs that must survive a parse/write cycle byte for byte.
const CORPUS: &[&str] = &[
    "",
    "interface Foo { };",
    "//comment\n",
    "[Exposed=Window]\ninterface Animal {\n  attribute DOMString name;\n};\n",
    "interface Container {\n  const unsigned long long MAX = 0xFFFF;\n  getter double (unsigned long index);\n  setter void (unsigned long index, double value);\n  static readonly attribute long count;\n  stringifier;\n};\n",
    "partial interface Animal {\n  void speak(optional DOMString phrase = \"woof\");\n};",
    "dictionary Options : Base {\n  required long id;\n  DOMString label = \"none\";\n  sequence<long> items = [];\n  any extra = null;\n};\n",
    "enum Mode {\n  \"slow\",\n  \"fast\",\n};\n",
    "typedef (long or sequence<DOMString> or Base) Mixed;",
    "Animal includes Petable;\ninterface mixin Petable {\n  void pet();\n};\n",
    "callback Done = void (long status);\ncallback interface Listener {\n  void handle(Done done);\n};\n",
    "namespace MathUtils {\n  readonly attribute double epsilon;\n  const double E = 2.718281828;\n  double add(double a, double b);\n};\n",
    "interface Bag {\n  iterable<long>;\n};\ninterface Lookup {\n  readonly maplike<DOMString, long>;\n};\ninterface Feed {\n  async iterable<long>(optional long hint);\n};\n",
    "// leading\n/* block */ interface /* mid */ Weird {\n\t// tab comment\n\tattribute float f; // trailing\n};\n// trailing file comment\n",
    "[Global=(Window,Worker), NamedConstructor=Audio(DOMString src), Exposed=Window]\ninterface Sound {\n  constructor(DOMString src);\n};\n",
    "interface Api {\n  Promise<void> ready();\n  record<DOMString, long> counts();\n  attribute FrozenArray<long> frozen;\n};\n",
    "interface Log {\n  void log(DOMString... messages);\n};",
    "interface _Foo {\n  attribute long _interface;\n};",
    "typedef unsigned long long? MaybeId;\ntypedef unrestricted double UD;\ntypedef [Clamp] octet Level;",
    "enum Chars { \"a b\", \"\" };",
    "partial dictionary Options {\n  boolean verbose = false;\n};\npartial namespace MathUtils {\n  double sub(double a, double b);\n};",
];

#[test]
fn write_reproduces_every_input() {
    for input in CORPUS {
        let doc = parse(input).unwrap_or_else(|error| {
            panic!("failed to parse {input:?}: {}", error.bare_message)
        });
        assert_eq!(&write(&doc), input, "round trip failed for {input:?}");
    }
}

#[test]
fn trivia_and_lexemes_cover_the_input() {
    for input in CORPUS {
        let doc = parse(input).unwrap();
        let mut rebuilt = String::new();
        for token in doc.tokens() {
            rebuilt.push_str(token.trivia());
            rebuilt.push_str(token.text());
        }
        assert_eq!(&rebuilt, input, "trivia coverage failed for {input:?}");
    }
}

#[test]
fn token_indices_are_dense_and_lines_monotonic() {
    for input in CORPUS {
        let doc = parse(input).unwrap();
        let mut last_line = 1;
        for (position, token) in doc.tokens().iter().enumerate() {
            assert_eq!(token.index() as usize, position);
            assert!(token.line() >= last_line);
            last_line = token.line();
        }
    }
}

#[test]
fn every_node_is_linked_to_its_parent() {
    for input in CORPUS {
        let doc = parse(input).unwrap();
        for id in doc.node_ids() {
            match doc.node(id).parent() {
                Some(parent) => {
                    assert!(
                        doc.data(parent).children().contains(&id),
                        "parent of {:?} does not list it in {input:?}",
                        doc.type_name_of(id)
                    );
                }
                None => {
                    assert!(
                        doc.definitions().contains(&id),
                        "unparented non-definition {:?} in {input:?}",
                        doc.type_name_of(id)
                    );
                }
            }
        }
    }
}

#[test]
fn no_token_is_stored_by_two_nodes() {
    for input in CORPUS {
        let doc = parse(input).unwrap();
        let mut seen = std::collections::HashSet::new();
        for &definition in doc.definitions() {
            for token in doc.tokens_of(definition) {
                assert!(seen.insert(token), "token {token} stored twice in {input:?}");
            }
        }
    }
}

#[test]
fn comment_only_input_parses_to_nothing() {
    let doc = parse("//comment\n").unwrap();
    assert!(doc.definitions().is_empty());
    assert_eq!(doc.tokens().len(), 1);
    assert_eq!(doc.tokens()[0].kind(), TokenKind::EOF);
    assert_eq!(doc.tokens()[0].trivia(), "//comment\n");
    assert_eq!(write(&doc), "//comment\n");
}

#[test]
fn nameless_getter_parses_with_its_argument() {
    let doc = parse("interface I { getter long (long x); };").unwrap();
    let NodeData::Interface(interface) = doc.data(doc.definitions()[0]) else {
        panic!("expected an interface");
    };
    let NodeData::Operation(operation) = doc.data(interface.members[0]) else {
        panic!("expected an operation");
    };
    let special = operation.special.expect("getter should be recorded");
    assert_eq!(doc.token(special).kind(), TokenKind::GETTER_KW);
    assert!(operation.name.is_none());
    assert_eq!(operation.arguments.len(), 1);
    let return_type = operation.return_type.expect("getter has a return type");
    let NodeData::Type(ty) = doc.data(return_type) else {
        panic!("expected a type");
    };
    assert_eq!(doc.token(ty.base.unwrap()).kind(), TokenKind::LONG_KW);
}
