//! Error types for the pattern compiler
//!
//! This module provides the error taxonomy for the three pipeline stages
//! using the `thiserror` crate. Syntax errors come from the scanner/parser,
//! semantic errors from the compiler, and emit errors from the emitter.

use thiserror::Error;

/// A span representing a location in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// 1-based line of the start offset
    pub line: u32,
    /// 1-based column of the start offset
    pub column: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Span {
            start,
            end,
            line,
            column,
        }
    }

    /// Extend this span to cover another span that ends later
    pub fn to(self, other: Span) -> Self {
        Span {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }

    /// Get the length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for Span {
    fn default() -> Self {
        Span {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Specific kinds of syntax errors raised by the scanner and parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    /// A group was opened with `(` but never closed
    #[error("unterminated group")]
    UnterminatedGroup,

    /// A character class was opened with `[` but never closed
    #[error("unterminated character class")]
    UnterminatedClass,

    /// A character class with no items, `[]` or `[^]`
    #[error("empty character class")]
    EmptyClass,

    /// A named group `(?<name>` with a missing or unclosed name
    #[error("unterminated group name")]
    UnterminatedGroupName,

    /// A group name containing characters outside `[A-Za-z0-9_]`
    #[error("invalid group name '{0}'")]
    InvalidGroupName(String),

    /// `(?` followed by an unrecognized modifier character
    #[error("unrecognized group modifier")]
    UnknownGroupModifier,

    /// A `)` with no matching `(`
    #[error("unmatched ')'")]
    UnmatchedCloseParen,

    /// A quantifier with no atom to its left
    #[error("quantifier has nothing to repeat")]
    NothingToRepeat,

    /// A quantifier applied to an anchor such as `^` or `\b`
    #[error("cannot quantify an anchor")]
    QuantifierOnAnchor,

    /// Brace bounds with a missing or non-numeric value, e.g. `{,3}` or `{3,x}`
    #[error("quantifier bounds must be numeric")]
    NonNumericQuantifier,

    /// Brace bounds without a closing `}`
    #[error("incomplete quantifier")]
    IncompleteQuantifier,

    /// Brace bounds with minimum greater than maximum, e.g. `{5,2}`
    #[error("quantifier minimum {min} exceeds maximum {max}")]
    QuantifierRange { min: u32, max: u32 },

    /// An alternation `|` with a missing left- or right-hand branch
    #[error("alternation is missing an operand")]
    AlternationMissingOperand,

    /// An escape sequence the grammar does not define, e.g. `\q`
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// A backslash at the very end of the input
    #[error("incomplete escape at end of input")]
    IncompleteEscape,

    /// `\k` without the `<name>` delimiters
    #[error("malformed named backreference, expected \\k<name>")]
    MalformedNamedBackref,

    /// `\p{...}` or `\P{...}` with a missing brace or empty/invalid name
    #[error("malformed unicode property")]
    MalformedUnicodeProperty,

    /// `\xHH`, `\x{...}`, `\uHHHH` or `\u{...}` with invalid hex digits
    #[error("invalid hex escape")]
    InvalidHexEscape,

    /// A hex escape naming a value outside the unicode scalar range
    #[error("escape names an invalid code point {0:#x}")]
    InvalidCodePoint(u32),

    /// A directive line with an unknown name, e.g. `%bogus`
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),

    /// A `%flags` letter outside `{i,m,s,u,x}`
    #[error("unknown flag letter '{0}'")]
    UnknownFlag(char),

    /// A directive line appearing after pattern content has started
    #[error("directive must appear before pattern content")]
    MisplacedDirective,
}

/// A syntax error with the offending source span
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at {span}")]
pub struct SyntaxError {
    /// The specific kind of syntax error
    pub kind: SyntaxErrorKind,
    /// The location in the source
    pub span: Span,
}

impl SyntaxError {
    /// Create a new syntax error
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        SyntaxError { kind, span }
    }
}

/// Specific kinds of semantic errors raised by the compiler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticErrorKind {
    /// Two named groups share a name; `first` is the span of the earlier one
    #[error("duplicate group name '{name}'")]
    DuplicateGroupName { name: String, first: Span },

    /// A character-class range whose endpoints are reversed, e.g. `z-a`
    #[error("invalid character range '{from}-{to}'")]
    InvalidClassRange { from: char, to: char },

    /// A backreference to a group index that has not been opened yet
    #[error("backreference to undefined group {0}")]
    UnknownBackrefIndex(u32),

    /// A backreference to a group name that has not been opened yet
    #[error("backreference to undefined group '{0}'")]
    UnknownBackrefName(String),

    /// Quantifier bounds with minimum greater than maximum
    #[error("quantifier minimum {min} exceeds maximum {max}")]
    InvalidQuantifierBounds { min: u32, max: u32 },
}

/// A semantic error with the offending source span
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at {span}")]
pub struct SemanticError {
    /// The specific kind of semantic error
    pub kind: SemanticErrorKind,
    /// The location in the source
    pub span: Span,
}

impl SemanticError {
    /// Create a new semantic error
    pub fn new(kind: SemanticErrorKind, span: Span) -> Self {
        SemanticError { kind, span }
    }
}

/// Errors raised during emission
///
/// An unsupported-feature error is fatal to emission only; the IR itself
/// remains valid and can be emitted to a more capable target.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmitError {
    /// The IR uses a feature the requested target dialect does not support
    #[error("target '{dialect}' does not support {feature}")]
    UnsupportedFeature {
        feature: crate::ir::Feature,
        dialect: crate::emit::Dialect,
    },
}

/// The main error type for the pattern compiler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Errors that occur during scanning/parsing
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Errors that occur during compilation (AST to IR)
    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),

    /// Errors that occur during emission (IR to target syntax)
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),
}

impl CompileError {
    /// The source span the error points at, if the stage tracks one
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Syntax(e) => Some(e.span),
            CompileError::Semantic(e) => Some(e.span),
            CompileError::Emit(_) => None,
        }
    }

    /// A stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Syntax(e) => e.kind.code(),
            CompileError::Semantic(e) => e.kind.code(),
            CompileError::Emit(EmitError::UnsupportedFeature { .. }) => "unsupported-feature",
        }
    }
}

impl SyntaxErrorKind {
    /// A stable machine-readable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SyntaxErrorKind::UnterminatedGroup => "unterminated-group",
            SyntaxErrorKind::UnterminatedClass => "unterminated-class",
            SyntaxErrorKind::EmptyClass => "empty-class",
            SyntaxErrorKind::UnterminatedGroupName => "unterminated-group-name",
            SyntaxErrorKind::InvalidGroupName(_) => "invalid-group-name",
            SyntaxErrorKind::UnknownGroupModifier => "unknown-group-modifier",
            SyntaxErrorKind::UnmatchedCloseParen => "unmatched-close-paren",
            SyntaxErrorKind::NothingToRepeat => "nothing-to-repeat",
            SyntaxErrorKind::QuantifierOnAnchor => "quantifier-on-anchor",
            SyntaxErrorKind::NonNumericQuantifier => "non-numeric-quantifier",
            SyntaxErrorKind::IncompleteQuantifier => "incomplete-quantifier",
            SyntaxErrorKind::QuantifierRange { .. } => "quantifier-range",
            SyntaxErrorKind::AlternationMissingOperand => "alternation-missing-operand",
            SyntaxErrorKind::InvalidEscape(_) => "invalid-escape",
            SyntaxErrorKind::IncompleteEscape => "incomplete-escape",
            SyntaxErrorKind::MalformedNamedBackref => "malformed-named-backref",
            SyntaxErrorKind::MalformedUnicodeProperty => "malformed-unicode-property",
            SyntaxErrorKind::InvalidHexEscape => "invalid-hex-escape",
            SyntaxErrorKind::InvalidCodePoint(_) => "invalid-code-point",
            SyntaxErrorKind::UnknownDirective(_) => "unknown-directive",
            SyntaxErrorKind::UnknownFlag(_) => "unknown-flag",
            SyntaxErrorKind::MisplacedDirective => "misplaced-directive",
        }
    }
}

impl SemanticErrorKind {
    /// A stable machine-readable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SemanticErrorKind::DuplicateGroupName { .. } => "duplicate-name",
            SemanticErrorKind::InvalidClassRange { .. } => "invalid-class-range",
            SemanticErrorKind::UnknownBackrefIndex(_) => "unknown-backref",
            SemanticErrorKind::UnknownBackrefName(_) => "unknown-backref",
            SemanticErrorKind::InvalidQuantifierBounds { .. } => "invalid-quantifier-bounds",
        }
    }
}

/// Result type alias for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new(
            SyntaxErrorKind::UnterminatedGroup,
            Span::new(0, 1, 1, 1),
        );
        assert_eq!(err.to_string(), "unterminated group at line 1, column 1");
    }

    #[test]
    fn test_invalid_escape_display() {
        let err = SyntaxErrorKind::InvalidEscape('q');
        assert_eq!(err.to_string(), "invalid escape sequence '\\q'");
    }

    #[test]
    fn test_semantic_error_duplicate_name() {
        let err = SemanticError::new(
            SemanticErrorKind::DuplicateGroupName {
                name: "x".to_string(),
                first: Span::new(0, 7, 1, 1),
            },
            Span::new(7, 14, 1, 8),
        );
        assert_eq!(
            err.to_string(),
            "duplicate group name 'x' at line 1, column 8"
        );
    }

    #[test]
    fn test_compile_error_from_syntax_error() {
        let syntax = SyntaxError::new(SyntaxErrorKind::EmptyClass, Span::default());
        let err: CompileError = syntax.into();
        assert_eq!(err.code(), "empty-class");
        assert!(err.to_string().starts_with("syntax error:"));
    }

    #[test]
    fn test_compile_error_span() {
        let span = Span::new(3, 5, 1, 4);
        let err: CompileError =
            SemanticError::new(SemanticErrorKind::UnknownBackrefIndex(2), span).into();
        assert_eq!(err.span(), Some(span));
    }

    #[test]
    fn test_span_extend() {
        let a = Span::new(0, 3, 1, 1);
        let b = Span::new(5, 9, 1, 6);
        let joined = a.to(b);
        assert_eq!(joined.start, 0);
        assert_eq!(joined.end, 9);
        assert_eq!(joined.line, 1);
        assert_eq!(joined.column, 1);
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(10, 20, 2, 3);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
    }
}
