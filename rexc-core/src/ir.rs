//! Intermediate representation of compiled patterns
//!
//! The IR mirrors the AST variant set but drops source spans and adds a
//! feature summary computed once at the root. It is immutable after
//! construction, target-agnostic, and the only artifact that crosses the
//! compile/emit boundary. Serialized artifacts follow a versioned schema
//! used for conformance testing and cross-implementation parity checks.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::{
    AnchorKind, BackrefTarget, ClassEscapeKind, Flags, GroupKind, LookDirection, QuantMode,
};

/// Version of the serialized artifact schema
pub const SCHEMA_VERSION: u32 = 1;

/// A node in the IR tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ir")]
pub enum IrNode {
    /// Alternation of branches
    Alt { branches: Vec<IrNode> },

    /// Concatenation of parts
    Seq { parts: Vec<IrNode> },

    /// A literal run; adjacent literals are fused during normalization
    Lit { value: String },

    /// Any character
    Dot,

    /// A position assertion
    Anchor { at: AnchorKind },

    /// A character class
    CharClass {
        negated: bool,
        items: Vec<IrClassItem>,
    },

    /// A repetition of the child
    Quant {
        child: Box<IrNode>,
        min: u32,
        max: MaxBound,
        mode: QuantMode,
    },

    /// A group wrapping a single body
    Group { kind: GroupKind, body: Box<IrNode> },

    /// A backreference by index or name
    Backref { target: BackrefTarget },

    /// A lookaround assertion
    Look {
        dir: LookDirection,
        negated: bool,
        body: Box<IrNode>,
    },

    /// A unicode property outside a class
    UnicodeProperty {
        negated: bool,
        name: String,
        value: Option<String>,
    },
}

/// An item inside an IR character class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item")]
pub enum IrClassItem {
    /// A single literal character
    Lit { ch: char },
    /// A character range
    Range { from: char, to: char },
    /// A shorthand escape
    Escape {
        kind: ClassEscapeKind,
        negated: bool,
    },
    /// A unicode property item
    Property {
        negated: bool,
        name: String,
        value: Option<String>,
    },
}

/// Upper bound of a quantifier; serializes as a number or `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxBound {
    Finite(u32),
    Infinite,
}

impl MaxBound {
    /// The bound as an option; `None` means unbounded
    pub fn as_option(self) -> Option<u32> {
        match self {
            MaxBound::Finite(n) => Some(n),
            MaxBound::Infinite => None,
        }
    }
}

impl From<Option<u32>> for MaxBound {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(n) => MaxBound::Finite(n),
            None => MaxBound::Infinite,
        }
    }
}

/// An advanced construct whose presence is tracked in the feature summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    AtomicGroup,
    Lookbehind,
    UnicodeProperty,
    PossessiveQuantifier,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::AtomicGroup => "atomic groups",
            Feature::Lookbehind => "lookbehind assertions",
            Feature::UnicodeProperty => "unicode properties",
            Feature::PossessiveQuantifier => "possessive quantifiers",
        };
        write!(f, "{}", name)
    }
}

/// Which advanced constructs a compiled pattern uses
///
/// Computed once per compilation by a single walk over the normalized tree;
/// the emitter gates target support against it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub uses_atomic_group: bool,
    pub uses_lookbehind: bool,
    pub uses_unicode_property: bool,
    pub uses_possessive: bool,
    /// Names of named capture groups, in sorted order
    pub named_groups: BTreeSet<String>,
    /// Total number of capturing groups, named or not
    pub capture_count: u32,
}

impl FeatureSummary {
    /// Whether the summary records a use of `feature`
    pub fn uses(&self, feature: Feature) -> bool {
        match feature {
            Feature::AtomicGroup => self.uses_atomic_group,
            Feature::Lookbehind => self.uses_lookbehind,
            Feature::UnicodeProperty => self.uses_unicode_property,
            Feature::PossessiveQuantifier => self.uses_possessive,
        }
    }
}

/// The compiled artifact: normalized IR plus flags and feature metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrArtifact {
    /// Schema version of this serialized shape
    pub schema_version: u32,
    /// The pattern's global flags
    pub flags: Flags,
    /// The normalized IR tree
    pub ir: IrNode,
    /// Feature usage computed over `ir`
    pub features: FeatureSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_bound_serializes_as_number_or_null() {
        assert_eq!(
            serde_json::to_string(&MaxBound::Finite(3)).unwrap(),
            "3"
        );
        assert_eq!(serde_json::to_string(&MaxBound::Infinite).unwrap(), "null");
    }

    #[test]
    fn test_max_bound_round_trip() {
        let finite: MaxBound = serde_json::from_str("5").unwrap();
        assert_eq!(finite, MaxBound::Finite(5));
        let infinite: MaxBound = serde_json::from_str("null").unwrap();
        assert_eq!(infinite, MaxBound::Infinite);
    }

    #[test]
    fn test_ir_node_tagged_serialization() {
        let node = IrNode::Lit {
            value: "ab".to_string(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["ir"], "Lit");
        assert_eq!(json["value"], "ab");
    }

    #[test]
    fn test_ir_node_round_trip() {
        let node = IrNode::Quant {
            child: Box::new(IrNode::Dot),
            min: 1,
            max: MaxBound::Infinite,
            mode: QuantMode::Lazy,
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: IrNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_artifact_round_trip() {
        let artifact = IrArtifact {
            schema_version: SCHEMA_VERSION,
            flags: Flags::default(),
            ir: IrNode::Seq {
                parts: vec![
                    IrNode::Lit {
                        value: "a".to_string(),
                    },
                    IrNode::Dot,
                ],
            },
            features: FeatureSummary::default(),
        };
        let json = serde_json::to_string(&artifact).unwrap();
        let back: IrArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
    }

    #[test]
    fn test_feature_summary_uses() {
        let mut features = FeatureSummary::default();
        assert!(!features.uses(Feature::AtomicGroup));
        features.uses_atomic_group = true;
        features.uses_possessive = true;
        assert!(features.uses(Feature::AtomicGroup));
        assert!(features.uses(Feature::PossessiveQuantifier));
        assert!(!features.uses(Feature::Lookbehind));
    }

    #[test]
    fn test_feature_display() {
        assert_eq!(Feature::AtomicGroup.to_string(), "atomic groups");
        assert_eq!(
            Feature::PossessiveQuantifier.to_string(),
            "possessive quantifiers"
        );
    }

    #[test]
    fn test_named_groups_serialize_sorted() {
        let mut features = FeatureSummary::default();
        features.named_groups.insert("zeta".to_string());
        features.named_groups.insert("alpha".to_string());
        let json = serde_json::to_string(&features).unwrap();
        let zeta = json.find("zeta").unwrap();
        let alpha = json.find("alpha").unwrap();
        assert!(alpha < zeta);
    }
}
