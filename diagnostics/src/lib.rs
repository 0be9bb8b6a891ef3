//! The closed set of syntactic diagnostics the parser can report, plus the
//! ordered list ([`Diagnostics`]) that accumulates them across a parse.
//!
//! Diagnostics never abort a parse: a production that cannot make progress
//! records exactly one of these and returns `ParseError` to its caller,
//! which resynchronises and continues. See `corec-parser`'s recovery module.

use corec_ast::TokenKind;
use corec_span::TokenIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A structured syntactic error, always anchored to the token that triggered it.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    #[error("expected {expected}")]
    ExpectedToken { expected: TokenKind },
    #[error("expected an expression")]
    ExpectedExpr,
    #[error("expected a type expression")]
    ExpectedTypeExpr,
    #[error("expected a primary type expression")]
    ExpectedPrimaryTypeExpr,
    #[error("expected a block or a field")]
    ExpectedBlockOrField,
    #[error("expected a block or an assignment")]
    ExpectedBlockOrAssignment,
    #[error("expected a block or an expression")]
    ExpectedBlockOrExpression,
    #[error("expected ';' or 'else'")]
    ExpectedSemiOrElse,
    #[error("expected ';' or '{{'")]
    ExpectedSemiOrLBrace,
    #[error("expected 'fn'")]
    ExpectedFn,
    #[error("expected a variable declaration")]
    ExpectedVarDecl,
    #[error("expected a variable declaration or 'fn'")]
    ExpectedVarDeclOrFn,
    #[error("expected a top-level declaration after 'pub'")]
    ExpectedPubItem,
    #[error("expected a labelable statement")]
    ExpectedLabelable,
    #[error("expected an inlinable statement")]
    ExpectedInlinable,
    #[error("expected a return type")]
    ExpectedReturnType,
    #[error("expected a parameter type")]
    ExpectedParamType,
    #[error("expected a parameter list")]
    ExpectedParamList,
    #[error("expected an identifier")]
    ExpectedIdentifier,
    #[error("expected a string literal")]
    ExpectedStringLiteral,
    #[error("expected an integer literal")]
    ExpectedIntegerLiteral,
    #[error("expected '{{'")]
    ExpectedLBrace,
    #[error("expected a label or '{{'")]
    ExpectedLabelOrLBrace,
    #[error("expected container members")]
    ExpectedContainerMembers,
    #[error("expected a suffix operator")]
    ExpectedSuffixOp,
    #[error("declaration between container fields")]
    DeclBetweenFields,
    #[error("doc comment does not document anything")]
    UnattachedDocComment,
    #[error("extra align qualifier")]
    ExtraAlignQualifier,
    #[error("extra const qualifier")]
    ExtraConstQualifier,
    #[error("extra volatile qualifier")]
    ExtraVolatileQualifier,
    #[error("extra allowzero qualifier")]
    ExtraAllowZeroQualifier,
    #[error("`&&` is invalid, use `and` instead")]
    InvalidAnd,
    #[error("invalid token")]
    InvalidToken,
}

/// A diagnostic pinned to the primary token that triggered it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub token: TokenIndex,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, token: TokenIndex) -> Self {
        Self { kind, token }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at token {})", self.kind, self.token)
    }
}

/// The ordered collector diagnostics are appended to while parsing.
///
/// Ordering is append-only: diagnostics come out in the same order the
/// productions that raised them ran in, which is monotone in token index
/// (property **P3**).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, kind: DiagnosticKind, token: TokenIndex) {
        self.items.push(Diagnostic::new(kind, token));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
