use std::fmt::Formatter;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

/// Identifiers that may never appear bare in an input, even though some of
/// them double as keywords after escaping is considered. The check runs
/// against the raw lexeme before keyword rewriting.
pub const RESERVED_IDENTIFIERS: &[&str] = &["_constructor", "toString", "_toString"];

/// Punctuation lexemes in the order they are attempted against the input.
pub(crate) const PUNCTUATIONS: &[(&str, TokenKind)] = &[
    ("(", TokenKind::LPAREN),
    (")", TokenKind::RPAREN),
    (",", TokenKind::COMMA),
    ("...", TokenKind::ELLIPSIS),
    (":", TokenKind::COLON),
    (";", TokenKind::SEMICOLON),
    ("<", TokenKind::LANGLE),
    ("=", TokenKind::EQUAL),
    (">", TokenKind::RANGLE),
    ("?", TokenKind::QUESTION),
    ("[", TokenKind::LSQUARE),
    ("]", TokenKind::RSQUARE),
    ("{", TokenKind::LCURLY),
    ("}", TokenKind::RCURLY),
];

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // Punctuation
    LPAREN,    // (
    RPAREN,    // )
    COMMA,     // ,
    ELLIPSIS,  // ...
    COLON,     // :
    SEMICOLON, // ;
    LANGLE,    // <
    EQUAL,     // =
    RANGLE,    // >
    QUESTION,  // ?
    LSQUARE,   // [
    RSQUARE,   // ]
    LCURLY,    // {
    RCURLY,    // }

    // Type name keywords
    ARRAY_BUFFER_KW,        // ArrayBuffer
    DATA_VIEW_KW,           // DataView
    INT8_ARRAY_KW,          // Int8Array
    INT16_ARRAY_KW,         // Int16Array
    INT32_ARRAY_KW,         // Int32Array
    UINT8_ARRAY_KW,         // Uint8Array
    UINT16_ARRAY_KW,        // Uint16Array
    UINT32_ARRAY_KW,        // Uint32Array
    UINT8_CLAMPED_ARRAY_KW, // Uint8ClampedArray
    FLOAT32_ARRAY_KW,       // Float32Array
    FLOAT64_ARRAY_KW,       // Float64Array
    ANY_KW,                 // any
    OBJECT_KW,              // object
    SYMBOL_KW,              // symbol

    // String type keywords
    BYTE_STRING_KW, // ByteString
    DOM_STRING_KW,  // DOMString
    USV_STRING_KW,  // USVString

    // Argument name keywords: reserved words that are still allowed as
    // argument and attribute names.
    ASYNC_KW,        // async
    ATTRIBUTE_KW,    // attribute
    CALLBACK_KW,     // callback
    CONST_KW,        // const
    CONSTRUCTOR_KW,  // constructor
    DELETER_KW,      // deleter
    DICTIONARY_KW,   // dictionary
    ENUM_KW,         // enum
    GETTER_KW,       // getter
    INCLUDES_KW,     // includes
    INHERIT_KW,      // inherit
    INTERFACE_KW,    // interface
    ITERABLE_KW,     // iterable
    MAPLIKE_KW,      // maplike
    NAMESPACE_KW,    // namespace
    PARTIAL_KW,      // partial
    REQUIRED_KW,     // required
    SETLIKE_KW,      // setlike
    SETTER_KW,       // setter
    STATIC_KW,       // static
    STRINGIFIER_KW,  // stringifier
    TYPEDEF_KW,      // typedef
    UNRESTRICTED_KW, // unrestricted

    // Remaining terminals
    NEG_INFINITY_KW, // -Infinity
    FROZEN_ARRAY_KW, // FrozenArray
    INFINITY_KW,     // Infinity
    NAN_KW,          // NaN
    PROMISE_KW,      // Promise
    BOOLEAN_KW,      // boolean
    BYTE_KW,         // byte
    DOUBLE_KW,       // double
    FALSE_KW,        // false
    FLOAT_KW,        // float
    LONG_KW,         // long
    MIXIN_KW,        // mixin
    NULL_KW,         // null
    OCTET_KW,        // octet
    OPTIONAL_KW,     // optional
    OR_KW,           // or
    READONLY_KW,     // readonly
    RECORD_KW,       // record
    SEQUENCE_KW,     // sequence
    SHORT_KW,        // short
    TRUE_KW,         // true
    UNSIGNED_KW,     // unsigned
    VOID_KW,         // void

    // Literals and everything else
    DECIMAL,    // A floating point literal.
    INTEGER,    // A decimal, octal, or hexadecimal integer literal.
    IDENT,      // Any identifier that is not a recognized keyword.
    STRING,     // A double-quoted string literal.
    OTHER,      // A single character that matched nothing else.
    EOF,        // The end of the input text, carrying the final trivia.
}

/// Lexemes that rewrite an identifier token's kind when matched exactly.
static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let pairs: &[(&str, TokenKind)] = &[
        ("ArrayBuffer", TokenKind::ARRAY_BUFFER_KW),
        ("DataView", TokenKind::DATA_VIEW_KW),
        ("Int8Array", TokenKind::INT8_ARRAY_KW),
        ("Int16Array", TokenKind::INT16_ARRAY_KW),
        ("Int32Array", TokenKind::INT32_ARRAY_KW),
        ("Uint8Array", TokenKind::UINT8_ARRAY_KW),
        ("Uint16Array", TokenKind::UINT16_ARRAY_KW),
        ("Uint32Array", TokenKind::UINT32_ARRAY_KW),
        ("Uint8ClampedArray", TokenKind::UINT8_CLAMPED_ARRAY_KW),
        ("Float32Array", TokenKind::FLOAT32_ARRAY_KW),
        ("Float64Array", TokenKind::FLOAT64_ARRAY_KW),
        ("any", TokenKind::ANY_KW),
        ("object", TokenKind::OBJECT_KW),
        ("symbol", TokenKind::SYMBOL_KW),
        ("ByteString", TokenKind::BYTE_STRING_KW),
        ("DOMString", TokenKind::DOM_STRING_KW),
        ("USVString", TokenKind::USV_STRING_KW),
        ("async", TokenKind::ASYNC_KW),
        ("attribute", TokenKind::ATTRIBUTE_KW),
        ("callback", TokenKind::CALLBACK_KW),
        ("const", TokenKind::CONST_KW),
        ("constructor", TokenKind::CONSTRUCTOR_KW),
        ("deleter", TokenKind::DELETER_KW),
        ("dictionary", TokenKind::DICTIONARY_KW),
        ("enum", TokenKind::ENUM_KW),
        ("getter", TokenKind::GETTER_KW),
        ("includes", TokenKind::INCLUDES_KW),
        ("inherit", TokenKind::INHERIT_KW),
        ("interface", TokenKind::INTERFACE_KW),
        ("iterable", TokenKind::ITERABLE_KW),
        ("maplike", TokenKind::MAPLIKE_KW),
        ("namespace", TokenKind::NAMESPACE_KW),
        ("partial", TokenKind::PARTIAL_KW),
        ("required", TokenKind::REQUIRED_KW),
        ("setlike", TokenKind::SETLIKE_KW),
        ("setter", TokenKind::SETTER_KW),
        ("static", TokenKind::STATIC_KW),
        ("stringifier", TokenKind::STRINGIFIER_KW),
        ("typedef", TokenKind::TYPEDEF_KW),
        ("unrestricted", TokenKind::UNRESTRICTED_KW),
        ("-Infinity", TokenKind::NEG_INFINITY_KW),
        ("FrozenArray", TokenKind::FROZEN_ARRAY_KW),
        ("Infinity", TokenKind::INFINITY_KW),
        ("NaN", TokenKind::NAN_KW),
        ("Promise", TokenKind::PROMISE_KW),
        ("boolean", TokenKind::BOOLEAN_KW),
        ("byte", TokenKind::BYTE_KW),
        ("double", TokenKind::DOUBLE_KW),
        ("false", TokenKind::FALSE_KW),
        ("float", TokenKind::FLOAT_KW),
        ("long", TokenKind::LONG_KW),
        ("mixin", TokenKind::MIXIN_KW),
        ("null", TokenKind::NULL_KW),
        ("octet", TokenKind::OCTET_KW),
        ("optional", TokenKind::OPTIONAL_KW),
        ("or", TokenKind::OR_KW),
        ("readonly", TokenKind::READONLY_KW),
        ("record", TokenKind::RECORD_KW),
        ("sequence", TokenKind::SEQUENCE_KW),
        ("short", TokenKind::SHORT_KW),
        ("true", TokenKind::TRUE_KW),
        ("unsigned", TokenKind::UNSIGNED_KW),
        ("void", TokenKind::VOID_KW),
    ];
    pairs.iter().copied().collect()
});

/// Returns the keyword kind for `lexeme` if it is a recognized terminal.
pub fn keyword_kind(lexeme: &str) -> Option<TokenKind> {
    KEYWORDS.get(lexeme).copied()
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::LPAREN => "(",
            TokenKind::RPAREN => ")",
            TokenKind::COMMA => ",",
            TokenKind::ELLIPSIS => "...",
            TokenKind::COLON => ":",
            TokenKind::SEMICOLON => ";",
            TokenKind::LANGLE => "<",
            TokenKind::EQUAL => "=",
            TokenKind::RANGLE => ">",
            TokenKind::QUESTION => "?",
            TokenKind::LSQUARE => "[",
            TokenKind::RSQUARE => "]",
            TokenKind::LCURLY => "{",
            TokenKind::RCURLY => "}",
            TokenKind::ARRAY_BUFFER_KW => "ArrayBuffer",
            TokenKind::DATA_VIEW_KW => "DataView",
            TokenKind::INT8_ARRAY_KW => "Int8Array",
            TokenKind::INT16_ARRAY_KW => "Int16Array",
            TokenKind::INT32_ARRAY_KW => "Int32Array",
            TokenKind::UINT8_ARRAY_KW => "Uint8Array",
            TokenKind::UINT16_ARRAY_KW => "Uint16Array",
            TokenKind::UINT32_ARRAY_KW => "Uint32Array",
            TokenKind::UINT8_CLAMPED_ARRAY_KW => "Uint8ClampedArray",
            TokenKind::FLOAT32_ARRAY_KW => "Float32Array",
            TokenKind::FLOAT64_ARRAY_KW => "Float64Array",
            TokenKind::ANY_KW => "any",
            TokenKind::OBJECT_KW => "object",
            TokenKind::SYMBOL_KW => "symbol",
            TokenKind::BYTE_STRING_KW => "ByteString",
            TokenKind::DOM_STRING_KW => "DOMString",
            TokenKind::USV_STRING_KW => "USVString",
            TokenKind::ASYNC_KW => "async",
            TokenKind::ATTRIBUTE_KW => "attribute",
            TokenKind::CALLBACK_KW => "callback",
            TokenKind::CONST_KW => "const",
            TokenKind::CONSTRUCTOR_KW => "constructor",
            TokenKind::DELETER_KW => "deleter",
            TokenKind::DICTIONARY_KW => "dictionary",
            TokenKind::ENUM_KW => "enum",
            TokenKind::GETTER_KW => "getter",
            TokenKind::INCLUDES_KW => "includes",
            TokenKind::INHERIT_KW => "inherit",
            TokenKind::INTERFACE_KW => "interface",
            TokenKind::ITERABLE_KW => "iterable",
            TokenKind::MAPLIKE_KW => "maplike",
            TokenKind::NAMESPACE_KW => "namespace",
            TokenKind::PARTIAL_KW => "partial",
            TokenKind::REQUIRED_KW => "required",
            TokenKind::SETLIKE_KW => "setlike",
            TokenKind::SETTER_KW => "setter",
            TokenKind::STATIC_KW => "static",
            TokenKind::STRINGIFIER_KW => "stringifier",
            TokenKind::TYPEDEF_KW => "typedef",
            TokenKind::UNRESTRICTED_KW => "unrestricted",
            TokenKind::NEG_INFINITY_KW => "-Infinity",
            TokenKind::FROZEN_ARRAY_KW => "FrozenArray",
            TokenKind::INFINITY_KW => "Infinity",
            TokenKind::NAN_KW => "NaN",
            TokenKind::PROMISE_KW => "Promise",
            TokenKind::BOOLEAN_KW => "boolean",
            TokenKind::BYTE_KW => "byte",
            TokenKind::DOUBLE_KW => "double",
            TokenKind::FALSE_KW => "false",
            TokenKind::FLOAT_KW => "float",
            TokenKind::LONG_KW => "long",
            TokenKind::MIXIN_KW => "mixin",
            TokenKind::NULL_KW => "null",
            TokenKind::OCTET_KW => "octet",
            TokenKind::OPTIONAL_KW => "optional",
            TokenKind::OR_KW => "or",
            TokenKind::READONLY_KW => "readonly",
            TokenKind::RECORD_KW => "record",
            TokenKind::SEQUENCE_KW => "sequence",
            TokenKind::SHORT_KW => "short",
            TokenKind::TRUE_KW => "true",
            TokenKind::UNSIGNED_KW => "unsigned",
            TokenKind::VOID_KW => "void",
            TokenKind::DECIMAL => "decimal",
            TokenKind::INTEGER => "integer",
            TokenKind::IDENT => "identifier",
            TokenKind::STRING => "string",
            TokenKind::OTHER => "other",
            TokenKind::EOF => "eof",
        }
    }

    /// Returns true if this kind is a reserved word that may still be used
    /// as an argument or attribute name.
    pub const fn is_argument_name_keyword(&self) -> bool {
        (*self as u8) >= (TokenKind::ASYNC_KW as u8)
            && (*self as u8) <= (TokenKind::UNRESTRICTED_KW as u8)
    }

    pub const fn is_string_type(&self) -> bool {
        matches!(
            self,
            TokenKind::BYTE_STRING_KW | TokenKind::DOM_STRING_KW | TokenKind::USV_STRING_KW
        )
    }

    pub const fn is_type_name_keyword(&self) -> bool {
        (*self as u8) >= (TokenKind::ARRAY_BUFFER_KW as u8)
            && (*self as u8) <= (TokenKind::SYMBOL_KW as u8)
    }

    /// Returns true if a token of this kind can stand alone as a constant
    /// value.
    pub const fn is_const_value(&self) -> bool {
        matches!(
            self,
            TokenKind::TRUE_KW
                | TokenKind::FALSE_KW
                | TokenKind::INFINITY_KW
                | TokenKind::NEG_INFINITY_KW
                | TokenKind::NAN_KW
                | TokenKind::DECIMAL
                | TokenKind::INTEGER
        )
    }

    /// Returns true if this kind opens a parameterized type.
    pub const fn is_generic_base(&self) -> bool {
        matches!(
            self,
            TokenKind::SEQUENCE_KW
                | TokenKind::RECORD_KW
                | TokenKind::PROMISE_KW
                | TokenKind::FROZEN_ARRAY_KW
        )
    }
}

impl Serialize for TokenKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keyword_lookup_covers_multi_word_terminals() {
        assert_eq!(keyword_kind("-Infinity"), Some(TokenKind::NEG_INFINITY_KW));
        assert_eq!(keyword_kind("Uint8ClampedArray"), Some(TokenKind::UINT8_CLAMPED_ARRAY_KW));
        assert_eq!(keyword_kind("Exposed"), None);
    }

    #[test]
    fn argument_name_keywords_span_the_reserved_range() {
        assert!(TokenKind::ASYNC_KW.is_argument_name_keyword());
        assert!(TokenKind::UNRESTRICTED_KW.is_argument_name_keyword());
        assert!(TokenKind::REQUIRED_KW.is_argument_name_keyword());
        assert!(!TokenKind::MIXIN_KW.is_argument_name_keyword());
        assert!(!TokenKind::IDENT.is_argument_name_keyword());
    }
}
