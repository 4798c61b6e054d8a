//! Compiler from AST to IR
//!
//! Three passes over the tree, all linear in the number of nodes:
//!
//! 1. **Semantic validation** walks the spanned AST pre-order, left to
//!    right, and fails fast on the first violation: duplicate group names,
//!    reversed class ranges, backreferences to groups that have not opened
//!    yet, and inconsistent quantifier bounds.
//! 2. **Lowering** maps AST variants one-to-one onto IR variants.
//! 3. **Normalization** fuses adjacent literals bottom-up. It is idempotent
//!    and order-preserving; it never changes match semantics.
//!
//! A final walk accumulates the feature summary. The input AST is never
//! mutated; normalization builds new nodes.

use crate::ast::{ClassItem, Flags, GroupKind, Node};
use crate::error::{SemanticError, SemanticErrorKind};
use crate::groups::GroupRegistry;
use crate::ir::{
    FeatureSummary, IrArtifact, IrClassItem, IrNode, MaxBound, SCHEMA_VERSION,
};

/// Compiles a validated AST into an IR artifact
#[derive(Debug, Default)]
pub struct Compiler {
    registry: GroupRegistry,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Compiler::default()
    }

    /// Compile the AST into a normalized, feature-annotated artifact
    pub fn compile(&mut self, flags: &Flags, ast: &Node) -> Result<IrArtifact, SemanticError> {
        self.registry = GroupRegistry::new();
        self.validate(ast)?;

        let ir = normalize(lower(ast));
        let mut features = FeatureSummary::default();
        analyze(&ir, &mut features);

        Ok(IrArtifact {
            schema_version: SCHEMA_VERSION,
            flags: *flags,
            ir,
            features,
        })
    }

    /// Pre-order, left-to-right validation; the first violation wins
    fn validate(&mut self, node: &Node) -> Result<(), SemanticError> {
        match node {
            Node::Alt { branches, .. } => {
                for branch in branches {
                    self.validate(branch)?;
                }
            }
            Node::Seq { parts, .. } => {
                for part in parts {
                    self.validate(part)?;
                }
            }
            Node::CharClass { items, .. } => {
                for item in items {
                    if let ClassItem::Range { from, to, span } = item
                        && from > to
                    {
                        return Err(SemanticError::new(
                            SemanticErrorKind::InvalidClassRange {
                                from: *from,
                                to: *to,
                            },
                            *span,
                        ));
                    }
                }
            }
            Node::Quant {
                child,
                min,
                max,
                span,
                ..
            } => {
                if let Some(max) = max
                    && min > max
                {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidQuantifierBounds {
                            min: *min,
                            max: *max,
                        },
                        *span,
                    ));
                }
                self.validate(child)?;
            }
            Node::Group { kind, body, span } => {
                // a group registers before its body, so a backreference
                // inside the body may point at the enclosing group
                match kind {
                    GroupKind::Capture => {
                        self.registry.register(None, *span)?;
                    }
                    GroupKind::Named(name) => {
                        self.registry.register(Some(name), *span)?;
                    }
                    GroupKind::NonCapture | GroupKind::Atomic => {}
                }
                self.validate(body)?;
            }
            Node::Backref { target, span } => {
                if self.registry.resolve(target).is_none() {
                    let kind = match target {
                        crate::ast::BackrefTarget::Index(n) => {
                            SemanticErrorKind::UnknownBackrefIndex(*n)
                        }
                        crate::ast::BackrefTarget::Name(name) => {
                            SemanticErrorKind::UnknownBackrefName(name.clone())
                        }
                    };
                    return Err(SemanticError::new(kind, *span));
                }
            }
            Node::Look { body, .. } => {
                self.validate(body)?;
            }
            Node::Lit { .. }
            | Node::Dot { .. }
            | Node::Anchor { .. }
            | Node::UnicodeProperty { .. } => {}
        }
        Ok(())
    }
}

/// Lower an AST node to its IR counterpart, one-to-one
pub fn lower(node: &Node) -> IrNode {
    match node {
        Node::Alt { branches, .. } => IrNode::Alt {
            branches: branches.iter().map(lower).collect(),
        },
        Node::Seq { parts, .. } => IrNode::Seq {
            parts: parts.iter().map(lower).collect(),
        },
        Node::Lit { ch, .. } => IrNode::Lit {
            value: ch.to_string(),
        },
        Node::Dot { .. } => IrNode::Dot,
        Node::Anchor { at, .. } => IrNode::Anchor { at: *at },
        Node::CharClass { negated, items, .. } => IrNode::CharClass {
            negated: *negated,
            items: items.iter().map(lower_class_item).collect(),
        },
        Node::Quant {
            child,
            min,
            max,
            mode,
            ..
        } => IrNode::Quant {
            child: Box::new(lower(child)),
            min: *min,
            max: MaxBound::from(*max),
            mode: *mode,
        },
        Node::Group { kind, body, .. } => IrNode::Group {
            kind: kind.clone(),
            body: Box::new(lower(body)),
        },
        Node::Backref { target, .. } => IrNode::Backref {
            target: target.clone(),
        },
        Node::Look {
            dir,
            negated,
            body,
            ..
        } => IrNode::Look {
            dir: *dir,
            negated: *negated,
            body: Box::new(lower(body)),
        },
        Node::UnicodeProperty {
            negated,
            name,
            value,
            ..
        } => IrNode::UnicodeProperty {
            negated: *negated,
            name: name.clone(),
            value: value.clone(),
        },
    }
}

fn lower_class_item(item: &ClassItem) -> IrClassItem {
    match item {
        ClassItem::Lit { ch, .. } => IrClassItem::Lit { ch: *ch },
        ClassItem::Range { from, to, .. } => IrClassItem::Range {
            from: *from,
            to: *to,
        },
        ClassItem::Escape { kind, negated, .. } => IrClassItem::Escape {
            kind: *kind,
            negated: *negated,
        },
        ClassItem::Property {
            negated,
            name,
            value,
            ..
        } => IrClassItem::Property {
            negated: *negated,
            name: name.clone(),
            value: value.clone(),
        },
    }
}

/// Normalize an IR tree bottom-up
///
/// Nested sequences are flattened, adjacent literal siblings are fused
/// into one literal, and single-element sequences and alternations unwrap
/// to their only child. Normalizing an already-normalized tree is a no-op.
pub fn normalize(node: IrNode) -> IrNode {
    match node {
        IrNode::Seq { parts } => {
            let mut fused: Vec<IrNode> = Vec::new();
            for part in parts {
                match normalize(part) {
                    IrNode::Seq { parts: inner } => {
                        for inner_part in inner {
                            push_fused(&mut fused, inner_part);
                        }
                    }
                    other => push_fused(&mut fused, other),
                }
            }
            match fused.len() {
                0 => IrNode::Lit {
                    value: String::new(),
                },
                1 => fused.into_iter().next().unwrap(),
                _ => IrNode::Seq { parts: fused },
            }
        }
        IrNode::Alt { branches } => {
            let mut branches: Vec<IrNode> = branches.into_iter().map(normalize).collect();
            if branches.len() == 1 {
                branches.pop().unwrap()
            } else {
                IrNode::Alt { branches }
            }
        }
        IrNode::Quant {
            child,
            min,
            max,
            mode,
        } => IrNode::Quant {
            child: Box::new(normalize(*child)),
            min,
            max,
            mode,
        },
        IrNode::Group { kind, body } => IrNode::Group {
            kind,
            body: Box::new(normalize(*body)),
        },
        IrNode::Look { dir, negated, body } => IrNode::Look {
            dir,
            negated,
            body: Box::new(normalize(*body)),
        },
        other => other,
    }
}

/// Append `node`, fusing it into the previous literal when both are literals
fn push_fused(parts: &mut Vec<IrNode>, node: IrNode) {
    if let IrNode::Lit { value } = &node
        && let Some(IrNode::Lit { value: prev }) = parts.last_mut()
    {
        prev.push_str(value);
        return;
    }
    parts.push(node);
}

/// Accumulate feature usage over the normalized tree, in one walk
fn analyze(node: &IrNode, features: &mut FeatureSummary) {
    match node {
        IrNode::Alt { branches } => {
            for branch in branches {
                analyze(branch, features);
            }
        }
        IrNode::Seq { parts } => {
            for part in parts {
                analyze(part, features);
            }
        }
        IrNode::Group { kind, body } => {
            match kind {
                GroupKind::Capture => features.capture_count += 1,
                GroupKind::Named(name) => {
                    features.capture_count += 1;
                    features.named_groups.insert(name.clone());
                }
                GroupKind::Atomic => features.uses_atomic_group = true,
                GroupKind::NonCapture => {}
            }
            analyze(body, features);
        }
        IrNode::Look { dir, body, .. } => {
            if *dir == crate::ast::LookDirection::Behind {
                features.uses_lookbehind = true;
            }
            analyze(body, features);
        }
        IrNode::Quant { child, mode, .. } => {
            if *mode == crate::ast::QuantMode::Possessive {
                features.uses_possessive = true;
            }
            analyze(child, features);
        }
        IrNode::UnicodeProperty { .. } => {
            features.uses_unicode_property = true;
        }
        IrNode::CharClass { items, .. } => {
            for item in items {
                if matches!(item, IrClassItem::Property { .. }) {
                    features.uses_unicode_property = true;
                }
            }
        }
        IrNode::Lit { .. } | IrNode::Dot | IrNode::Anchor { .. } | IrNode::Backref { .. } => {}
    }
}
