//! Capture-group registry
//!
//! Tracks the capture groups of a pattern in opening-parenthesis order,
//! mapping names to indices. The compiler uses it to reject duplicate
//! names and to resolve backreferences against the groups opened so far.

use std::collections::HashMap;

use crate::ast::BackrefTarget;
use crate::error::{SemanticError, SemanticErrorKind, Span};

/// Registry of the capture groups seen so far in a pre-order walk
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    /// Name to (1-based index, span of the defining group)
    names: HashMap<String, (u32, Span)>,
    count: u32,
}

impl GroupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        GroupRegistry::default()
    }

    /// Register the next capture group; indices are 1-based and assigned
    /// left to right by opening parenthesis, regardless of nesting
    ///
    /// # Errors
    /// Returns a duplicate-name error carrying both spans if the name is
    /// already in use.
    pub fn register(&mut self, name: Option<&str>, span: Span) -> Result<u32, SemanticError> {
        let index = self.count + 1;
        self.count = index;

        if let Some(name) = name {
            if let Some(&(_, first)) = self.names.get(name) {
                return Err(SemanticError::new(
                    SemanticErrorKind::DuplicateGroupName {
                        name: name.to_string(),
                        first,
                    },
                    span,
                ));
            }
            self.names.insert(name.to_string(), (index, span));
        }
        Ok(index)
    }

    /// The number of capture groups registered so far
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Check if a group name exists
    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Get a group index by name
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.names.get(name).map(|&(index, _)| index)
    }

    /// Resolve a backreference against the groups opened so far;
    /// `None` means the target does not exist yet
    pub fn resolve(&self, target: &BackrefTarget) -> Option<u32> {
        match target {
            BackrefTarget::Index(n) => (*n >= 1 && *n <= self.count).then_some(*n),
            BackrefTarget::Name(name) => self.index_of(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize) -> Span {
        Span::new(start, start + 1, 1, start as u32 + 1)
    }

    #[test]
    fn test_register_assigns_sequential_indices() {
        let mut registry = GroupRegistry::new();
        assert_eq!(registry.register(None, span(0)).unwrap(), 1);
        assert_eq!(registry.register(Some("x"), span(3)).unwrap(), 2);
        assert_eq!(registry.register(None, span(9)).unwrap(), 3);
        assert_eq!(registry.count(), 3);
    }

    #[test]
    fn test_duplicate_name_reports_both_spans() {
        let mut registry = GroupRegistry::new();
        registry.register(Some("x"), span(0)).unwrap();
        let err = registry.register(Some("x"), span(7)).unwrap_err();
        assert_eq!(err.span, span(7));
        match err.kind {
            SemanticErrorKind::DuplicateGroupName { name, first } => {
                assert_eq!(name, "x");
                assert_eq!(first, span(0));
            }
            _ => panic!("expected DuplicateGroupName"),
        }
    }

    #[test]
    fn test_resolve_by_index() {
        let mut registry = GroupRegistry::new();
        registry.register(None, span(0)).unwrap();
        assert_eq!(registry.resolve(&BackrefTarget::Index(1)), Some(1));
        assert_eq!(registry.resolve(&BackrefTarget::Index(2)), None);
        assert_eq!(registry.resolve(&BackrefTarget::Index(0)), None);
    }

    #[test]
    fn test_resolve_by_name() {
        let mut registry = GroupRegistry::new();
        registry.register(Some("word"), span(0)).unwrap();
        assert_eq!(
            registry.resolve(&BackrefTarget::Name("word".to_string())),
            Some(1)
        );
        assert_eq!(
            registry.resolve(&BackrefTarget::Name("other".to_string())),
            None
        );
    }

    #[test]
    fn test_has_name() {
        let mut registry = GroupRegistry::new();
        registry.register(Some("x"), span(0)).unwrap();
        assert!(registry.has_name("x"));
        assert!(!registry.has_name("y"));
    }
}
