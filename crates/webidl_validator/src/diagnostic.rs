use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use webidl_parser::{context_window, decorate, Document, TokenId};

use crate::fix::Fix;

/// Stable identifiers for every validation rule. The string forms are part
/// of the public contract and never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DiagnosticName {
    NoDuplicate,
    RequireExposed,
    ConstructorMember,
    NoConstructibleGlobal,
    IncompleteOp,
    NoNullableUnionDict,
    NoNullableDictArg,
    DictArgOptional,
    DictArgDefault,
    NoCrossOverload,
    DuplicateMember,
}

impl DiagnosticName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticName::NoDuplicate => "no-duplicate",
            DiagnosticName::RequireExposed => "require-exposed",
            DiagnosticName::ConstructorMember => "constructor-member",
            DiagnosticName::NoConstructibleGlobal => "no-constructible-global",
            DiagnosticName::IncompleteOp => "incomplete-op",
            DiagnosticName::NoNullableUnionDict => "no-nullable-union-dict",
            DiagnosticName::NoNullableDictArg => "no-nullable-dict-arg",
            DiagnosticName::DictArgOptional => "dict-arg-optional",
            DiagnosticName::DictArgDefault => "dict-arg-default",
            DiagnosticName::NoCrossOverload => "no-cross-overload",
            DiagnosticName::DuplicateMember => "duplicate-member",
        }
    }
}

impl Display for DiagnosticName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum DiagnosticSeverity {
    Warning,
    Error,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-fatal finding. Diagnostics are data only; callers decide
/// whether to print them, serialize them, or apply the attached fix.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub name: DiagnosticName,
    pub severity: DiagnosticSeverity,
    /// Decorated message including the line number and context window.
    pub message: String,
    pub bare_message: String,
    pub context: String,
    pub line: u32,
    pub source_name: Option<String>,
    /// Index into the validated document slice this diagnostic belongs to.
    pub source_index: usize,
    /// Deferred tree edit that resolves the diagnostic, when one exists.
    #[serde(skip)]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub(crate) fn new(
        doc: &Document,
        source_index: usize,
        token: TokenId,
        name: DiagnosticName,
        severity: DiagnosticSeverity,
        bare_message: String,
        fix: Option<Fix>,
    ) -> Self {
        let line = doc.token(token).line();
        let context = context_window(doc.tokens(), token as usize);
        let message = decorate("Validation", line, doc.source_name(), &context, &bare_message);
        Self {
            name,
            severity,
            message,
            bare_message,
            context,
            line,
            source_name: doc.source_name().map(str::to_string),
            source_index,
            fix,
        }
    }
}

impl Serialize for DiagnosticName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for DiagnosticSeverity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
