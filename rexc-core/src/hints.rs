//! Diagnostic hint engine
//!
//! Maps an error's kind and captured context to an instructional message:
//! why the construct is invalid and how to fix it. The engine is a pure
//! template lookup consulted only at the reporting boundary; it knows
//! nothing about parsing or compiling internals. A kind without a
//! dedicated template degrades to a generic message.

use crate::error::{CompileError, EmitError, SemanticErrorKind, Span, SyntaxErrorKind};

/// A rendered diagnostic: machine-style message, instructional hint, and
/// the source span when the failing stage tracks one
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Concise machine-style description, e.g. `"unterminated group"`
    pub message: String,
    /// Instructional explanation of the rule and the fix
    pub hint: String,
    /// The offending source location, if any
    pub span: Option<Span>,
}

const GENERIC_HINT: &str =
    "The pattern could not be compiled. Check the syntax near the reported location.";

/// Render a diagnostic for any pipeline error
pub fn explain(error: &CompileError) -> Diagnostic {
    Diagnostic {
        message: error.to_string(),
        hint: hint_for(error).unwrap_or_else(|| GENERIC_HINT.to_string()),
        span: error.span(),
    }
}

fn hint_for(error: &CompileError) -> Option<String> {
    match error {
        CompileError::Syntax(e) => syntax_hint(&e.kind),
        CompileError::Semantic(e) => semantic_hint(&e.kind),
        CompileError::Emit(EmitError::UnsupportedFeature { feature, dialect }) => Some(format!(
            "The pattern uses {}, which the '{}' target does not declare support for. \
             Emit to a more capable target or rewrite the pattern without the feature.",
            feature, dialect
        )),
    }
}

fn syntax_hint(kind: &SyntaxErrorKind) -> Option<String> {
    let text = match kind {
        SyntaxErrorKind::UnterminatedGroup => {
            "This group was opened with '(' but never closed. \
             Add a matching ')' to close the group."
                .to_string()
        }
        SyntaxErrorKind::UnterminatedClass => {
            "This character class was opened with '[' but never closed. \
             Add a matching ']' to close the class."
                .to_string()
        }
        SyntaxErrorKind::EmptyClass => {
            "A character class must contain at least one item. \
             Add characters or a range like 'a-z', or remove the brackets."
                .to_string()
        }
        SyntaxErrorKind::UnterminatedGroupName => {
            "A named group is written '(?<name>...)'. \
             Close the name with '>' before the group body."
                .to_string()
        }
        SyntaxErrorKind::InvalidGroupName(_) => {
            "Group names may not be empty and may only contain letters, \
             digits, and underscores."
                .to_string()
        }
        SyntaxErrorKind::UnknownGroupModifier => {
            "After '(?' the recognized forms are '(?:', '(?<name>', '(?=', \
             '(?!', '(?<=', '(?<!', and '(?>'."
                .to_string()
        }
        SyntaxErrorKind::UnmatchedCloseParen => {
            "This ')' has no matching '('. \
             Remove it or open a group earlier in the pattern."
                .to_string()
        }
        SyntaxErrorKind::NothingToRepeat => {
            "A quantifier must follow something to repeat, such as a \
             character, class, or group. Add an atom before it or escape \
             the symbol to match it literally."
                .to_string()
        }
        SyntaxErrorKind::QuantifierOnAnchor => {
            "Anchors assert a position and consume no text, so repeating \
             one has no effect. Remove the quantifier."
                .to_string()
        }
        SyntaxErrorKind::NonNumericQuantifier => {
            "Brace bounds are written '{n}', '{n,}', or '{n,m}' with \
             decimal numbers. Replace the bound with digits."
                .to_string()
        }
        SyntaxErrorKind::IncompleteQuantifier => {
            "Brace bounds must end with '}'. Close the quantifier, or \
             escape the '{' to match it literally."
                .to_string()
        }
        SyntaxErrorKind::QuantifierRange { min, max } => format!(
            "A quantifier cannot require at least {} repetitions but allow \
             at most {}. Swap or correct the bounds.",
            min, max
        ),
        SyntaxErrorKind::AlternationMissingOperand => {
            "Each '|' needs a branch on both sides. \
             Add the missing branch or remove the '|'."
                .to_string()
        }
        SyntaxErrorKind::InvalidEscape(c) => format!(
            "'\\{}' is not a defined escape. Remove the backslash, or use \
             a defined escape such as \\d, \\w, or \\s.",
            c
        ),
        SyntaxErrorKind::IncompleteEscape => {
            "A '\\' must be followed by the character or sequence to \
             escape. Complete the escape or remove the backslash."
                .to_string()
        }
        SyntaxErrorKind::MalformedNamedBackref => {
            "A named backreference is written '\\k<name>' with both angle \
             brackets. Add the missing delimiter."
                .to_string()
        }
        SyntaxErrorKind::MalformedUnicodeProperty => {
            "Unicode properties are written '\\p{Name}' or \
             '\\p{Name=Value}'. Check the braces and the property name."
                .to_string()
        }
        SyntaxErrorKind::InvalidHexEscape => {
            "Hex escapes are written '\\xHH', '\\x{...}', '\\uHHHH', or \
             '\\u{...}' with hexadecimal digits."
                .to_string()
        }
        SyntaxErrorKind::InvalidCodePoint(_) => {
            "The escaped value is outside the range of valid unicode \
             scalar values. Use a value up to 0x10FFFF that is not a \
             surrogate."
                .to_string()
        }
        SyntaxErrorKind::UnknownDirective(_) => {
            "Recognized directives are '%flags', '%lang', and '%engine'."
                .to_string()
        }
        SyntaxErrorKind::UnknownFlag(_) => {
            "Valid flag letters are i (ignore case), m (multiline), \
             s (dot matches newline), u (unicode), and x (free-spacing)."
                .to_string()
        }
        SyntaxErrorKind::MisplacedDirective => {
            "Directives configure the whole pattern and must appear on \
             their own lines before any pattern content. Move this line \
             to the top."
                .to_string()
        }
    };
    Some(text)
}

fn semantic_hint(kind: &SemanticErrorKind) -> Option<String> {
    let text = match kind {
        SemanticErrorKind::DuplicateGroupName { name, first } => format!(
            "The name '{}' is already used by the group at {}. A single \
             match could reach either group, so every name must be unique. \
             Rename one of the two groups.",
            name, first
        ),
        SemanticErrorKind::InvalidClassRange { from, to } => format!(
            "In a range the first character must not come after the second \
             in code-point order. Write '{}-{}' or list the characters \
             individually.",
            to, from
        ),
        SemanticErrorKind::UnknownBackrefIndex(index) => format!(
            "Backreferences may only point at capture groups opened \
             earlier in the pattern, and group {} does not exist at this \
             point. Add the group or fix the index.",
            index
        ),
        SemanticErrorKind::UnknownBackrefName(name) => format!(
            "Backreferences may only point at named groups opened earlier \
             in the pattern, and no group named '{}' exists at this point. \
             Define '(?<{}>...)' before the reference.",
            name, name
        ),
        SemanticErrorKind::InvalidQuantifierBounds { min, max } => format!(
            "A quantifier cannot require at least {} repetitions but allow \
             at most {}. Swap or correct the bounds.",
            min, max
        ),
    };
    Some(text)
}
