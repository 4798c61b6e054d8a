//! Emitters for target regex dialects
//!
//! Emission is a pure function of the IR artifact: identical input always
//! yields an identical output string, no I/O happens, and nothing is
//! mutated, so concurrent calls never interfere. All escaping lives here;
//! metacharacters inside and outside character classes use distinct escape
//! tables.
//!
//! Targets share one rendering core and differ only in the feature table
//! they declare. Before rendering, the artifact's feature summary is
//! checked against the requested dialect's capabilities; an unsupported
//! feature is an error, never a silent degradation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ast::{AnchorKind, BackrefTarget, Flags, GroupKind, LookDirection, QuantMode};
use crate::error::EmitError;
use crate::ir::{Feature, FeatureSummary, IrArtifact, IrClassItem, IrNode, MaxBound};

/// A target regex dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// The primary target: named/non-capturing/atomic groups, lookarounds,
    /// possessive quantifiers, unicode properties
    Pcre2,
    /// A more restrictive target without atomic groups or possessive
    /// quantifiers
    Ecma,
}

impl Dialect {
    /// The feature support this dialect declares
    pub fn caps(self) -> DialectCaps {
        match self {
            Dialect::Pcre2 => DialectCaps {
                atomic_groups: true,
                lookbehind: true,
                possessive_quantifiers: true,
                unicode_properties: true,
            },
            Dialect::Ecma => DialectCaps {
                atomic_groups: false,
                lookbehind: true,
                possessive_quantifiers: false,
                unicode_properties: true,
            },
        }
    }

    /// The canonical dialect name
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Pcre2 => "pcre2",
            Dialect::Ecma => "ecma",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pcre2" | "pcre" => Ok(Dialect::Pcre2),
            "ecma" | "ecmascript" | "js" | "javascript" => Ok(Dialect::Ecma),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}

/// The machine-readable feature-support declaration of a target dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectCaps {
    pub atomic_groups: bool,
    pub lookbehind: bool,
    pub possessive_quantifiers: bool,
    pub unicode_properties: bool,
}

impl DialectCaps {
    /// Whether this capability table declares support for `feature`
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::AtomicGroup => self.atomic_groups,
            Feature::Lookbehind => self.lookbehind,
            Feature::UnicodeProperty => self.unicode_properties,
            Feature::PossessiveQuantifier => self.possessive_quantifiers,
        }
    }
}

/// Emit the artifact as a pattern string in the given dialect
pub fn emit(artifact: &IrArtifact, dialect: Dialect) -> Result<String, EmitError> {
    check_support(&artifact.features, dialect)?;
    let mut out = String::new();
    push_flags_prefix(&artifact.flags, &mut out);
    render(&artifact.ir, &mut out);
    Ok(out)
}

/// Reject features the dialect does not declare, in a fixed check order
fn check_support(features: &FeatureSummary, dialect: Dialect) -> Result<(), EmitError> {
    let caps = dialect.caps();
    for feature in [
        Feature::AtomicGroup,
        Feature::Lookbehind,
        Feature::UnicodeProperty,
        Feature::PossessiveQuantifier,
    ] {
        if features.uses(feature) && !caps.supports(feature) {
            return Err(EmitError::UnsupportedFeature { feature, dialect });
        }
    }
    Ok(())
}

/// Flags render as a leading inline-modifier group. Only `i`, `m`, and `s`
/// appear inline: `x` is consumed by the scanner and `u` selects semantics
/// at compile time.
fn push_flags_prefix(flags: &Flags, out: &mut String) {
    if !(flags.ignore_case || flags.multiline || flags.dot_all) {
        return;
    }
    out.push_str("(?");
    if flags.ignore_case {
        out.push('i');
    }
    if flags.multiline {
        out.push('m');
    }
    if flags.dot_all {
        out.push('s');
    }
    out.push(')');
}

fn render(node: &IrNode, out: &mut String) {
    match node {
        IrNode::Alt { branches } => {
            for (i, branch) in branches.iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                render(branch, out);
            }
        }
        IrNode::Seq { parts } => {
            for part in parts {
                render(part, out);
            }
        }
        IrNode::Lit { value } => {
            for ch in value.chars() {
                push_literal(ch, out);
            }
        }
        IrNode::Dot => out.push('.'),
        IrNode::Anchor { at } => out.push_str(anchor_str(*at)),
        IrNode::CharClass { negated, items } => render_class(*negated, items, out),
        IrNode::Quant {
            child,
            min,
            max,
            mode,
        } => {
            if needs_group(child) {
                out.push_str("(?:");
                render(child, out);
                out.push(')');
            } else {
                render(child, out);
            }
            push_bounds(*min, *max, out);
            match mode {
                QuantMode::Greedy => {}
                QuantMode::Lazy => out.push('?'),
                QuantMode::Possessive => out.push('+'),
            }
        }
        IrNode::Group { kind, body } => {
            match kind {
                GroupKind::Capture => out.push('('),
                GroupKind::NonCapture => out.push_str("(?:"),
                GroupKind::Named(name) => {
                    out.push_str("(?<");
                    out.push_str(name);
                    out.push('>');
                }
                GroupKind::Atomic => out.push_str("(?>"),
            }
            render(body, out);
            out.push(')');
        }
        IrNode::Backref { target } => match target {
            BackrefTarget::Index(n) => {
                out.push('\\');
                out.push_str(&n.to_string());
            }
            BackrefTarget::Name(name) => {
                out.push_str("\\k<");
                out.push_str(name);
                out.push('>');
            }
        },
        IrNode::Look { dir, negated, body } => {
            out.push_str(match (dir, negated) {
                (LookDirection::Ahead, false) => "(?=",
                (LookDirection::Ahead, true) => "(?!",
                (LookDirection::Behind, false) => "(?<=",
                (LookDirection::Behind, true) => "(?<!",
            });
            render(body, out);
            out.push(')');
        }
        IrNode::UnicodeProperty {
            negated,
            name,
            value,
        } => push_property(*negated, name, value.as_deref(), out),
    }
}

/// A quantifier binds to a single atom; anything wider is wrapped in a
/// non-capturing group so repetition cannot leak into neighboring syntax
fn needs_group(node: &IrNode) -> bool {
    match node {
        IrNode::Alt { .. } | IrNode::Seq { .. } | IrNode::Quant { .. } | IrNode::Anchor { .. } => {
            true
        }
        IrNode::Lit { value } => value.chars().count() != 1,
        _ => false,
    }
}

fn anchor_str(at: AnchorKind) -> &'static str {
    match at {
        AnchorKind::Start => "^",
        AnchorKind::End => "$",
        AnchorKind::WordBoundary => "\\b",
        AnchorKind::NotWordBoundary => "\\B",
        AnchorKind::InputStart => "\\A",
        AnchorKind::InputEnd => "\\Z",
    }
}

fn push_bounds(min: u32, max: MaxBound, out: &mut String) {
    match (min, max) {
        (0, MaxBound::Infinite) => out.push('*'),
        (1, MaxBound::Infinite) => out.push('+'),
        (0, MaxBound::Finite(1)) => out.push('?'),
        (n, MaxBound::Infinite) => out.push_str(&format!("{{{},}}", n)),
        (n, MaxBound::Finite(m)) if n == m => out.push_str(&format!("{{{}}}", n)),
        (n, MaxBound::Finite(m)) => out.push_str(&format!("{{{},{}}}", n, m)),
    }
}

/// Escape a literal character outside a character class
fn push_literal(ch: char, out: &mut String) {
    match ch {
        '\\' | '.' | '^' | '$' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}' => {
            out.push('\\');
            out.push(ch);
        }
        _ => push_common(ch, out),
    }
}

/// Escape a literal character inside a character class
fn push_class_char(ch: char, out: &mut String) {
    match ch {
        '\\' | ']' | '^' | '-' | '[' => {
            out.push('\\');
            out.push(ch);
        }
        _ => push_common(ch, out),
    }
}

/// Control characters render identically in both positions
fn push_common(ch: char, out: &mut String) {
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{000C}' => out.push_str("\\f"),
        '\u{000B}' => out.push_str("\\v"),
        '\0' => out.push_str("\\0"),
        c if (c as u32) < 0x20 || c == '\u{7F}' => {
            out.push_str(&format!("\\x{:02X}", c as u32));
        }
        c => out.push(c),
    }
}

fn render_class(negated: bool, items: &[IrClassItem], out: &mut String) {
    if let Some(short) = class_shorthand(negated, items) {
        out.push_str(&short);
        return;
    }
    out.push('[');
    if negated {
        out.push('^');
    }
    for item in items {
        match item {
            IrClassItem::Lit { ch } => push_class_char(*ch, out),
            IrClassItem::Range { from, to } => {
                push_class_char(*from, out);
                out.push('-');
                push_class_char(*to, out);
            }
            IrClassItem::Escape { kind, negated } => {
                out.push('\\');
                let letter = kind.letter();
                out.push(if *negated {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                });
            }
            IrClassItem::Property {
                negated,
                name,
                value,
            } => push_property(*negated, name, value.as_deref(), out),
        }
    }
    out.push(']');
}

/// Single-item classes fold to their shorthand form: `[\d]` and `[0-9]`
/// render as `\d`, and a negated wrapper flips the case, so `[^\d]`
/// renders as `\D`
fn class_shorthand(negated: bool, items: &[IrClassItem]) -> Option<String> {
    if items.len() != 1 {
        return None;
    }
    match &items[0] {
        IrClassItem::Escape {
            kind,
            negated: item_negated,
        } => {
            let letter = kind.letter();
            let flipped = negated ^ item_negated;
            Some(format!(
                "\\{}",
                if flipped {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                }
            ))
        }
        IrClassItem::Range { from: '0', to: '9' } => {
            Some(if negated { "\\D".to_string() } else { "\\d".to_string() })
        }
        IrClassItem::Property {
            negated: item_negated,
            name,
            value,
        } => {
            let mut out = String::new();
            push_property(negated ^ item_negated, name, value.as_deref(), &mut out);
            Some(out)
        }
        IrClassItem::Lit { .. } | IrClassItem::Range { .. } => None,
    }
}

fn push_property(negated: bool, name: &str, value: Option<&str>, out: &mut String) {
    out.push_str(if negated { "\\P{" } else { "\\p{" });
    out.push_str(name);
    if let Some(value) = value {
        out.push('=');
        out.push_str(value);
    }
    out.push('}');
}
