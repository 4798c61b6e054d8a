//! Integration tests for the full compile pipeline
//!
//! These exercise parse, compile, and emit together on realistic patterns
//! and check the pipeline-wide guarantees: deterministic output,
//! idempotent normalization, and precise error reporting.

use rexc_core::{
    compile_artifact, compile_pattern, compile_pattern_for, lower, normalize, parse, CompileError,
    Dialect, SemanticErrorKind, SyntaxErrorKind,
};

#[test]
fn test_named_group_pattern_with_flags() {
    let source = "%flags i,m\n(?<name>[a-zA-Z]+)\\s+\\d{3,}";
    let artifact = compile_artifact(source).unwrap();

    let names: Vec<_> = artifact.features.named_groups.iter().cloned().collect();
    assert_eq!(names, vec!["name".to_string()]);
    assert!(!artifact.features.uses_atomic_group);

    let emitted = compile_pattern(source).unwrap();
    assert_eq!(emitted, "(?im)(?<name>[a-zA-Z]+)\\s+\\d{3,}");
}

#[test]
fn test_reversed_range_fails_with_class_span() {
    let err = compile_pattern("[z-a]").unwrap_err();
    match err {
        CompileError::Semantic(e) => {
            assert!(matches!(e.kind, SemanticErrorKind::InvalidClassRange { .. }));
            // the span points into the class
            assert!(e.span.start >= 1 && e.span.end <= 4);
        }
        other => panic!("expected semantic error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_names_fail_with_both_spans() {
    let err = compile_pattern("(?<x>a)(?<x>b)").unwrap_err();
    match err {
        CompileError::Semantic(e) => match e.kind {
            SemanticErrorKind::DuplicateGroupName { name, first } => {
                assert_eq!(name, "x");
                assert_eq!(first.start, 0);
                assert_eq!(e.span.start, 7);
            }
            other => panic!("expected DuplicateGroupName, got {:?}", other),
        },
        other => panic!("expected semantic error, got {:?}", other),
    }
}

#[test]
fn test_unterminated_group_fails_at_opener() {
    let err = compile_pattern("(a").unwrap_err();
    match err {
        CompileError::Syntax(e) => {
            assert_eq!(e.kind, SyntaxErrorKind::UnterminatedGroup);
            assert_eq!(e.span.start, 0);
            assert_eq!(e.span.line, 1);
            assert_eq!(e.span.column, 1);
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_dangling_named_backref_fails() {
    let err = compile_pattern(r"\k<missing>").unwrap_err();
    match err {
        CompileError::Semantic(e) => {
            assert_eq!(
                e.kind,
                SemanticErrorKind::UnknownBackrefName("missing".to_string())
            );
        }
        other => panic!("expected semantic error, got {:?}", other),
    }
}

#[test]
fn test_compilation_is_deterministic() {
    let source = "%flags s\n(?<a>x+)|[0-9a-f]{2}(?=;)";
    let first = compile_pattern(source).unwrap();
    let second = compile_pattern(source).unwrap();
    assert_eq!(first, second);

    let artifact_a = compile_artifact(source).unwrap();
    let artifact_b = compile_artifact(source).unwrap();
    assert_eq!(artifact_a, artifact_b);
}

#[test]
fn test_normalization_is_idempotent() {
    for source in ["abc", "a(bc(de))f", "ab|cd", "(?:ab)+cd", "a|b|c", ""] {
        let (_, ast) = parse(source).unwrap();
        let once = normalize(lower(&ast));
        let twice = normalize(once.clone());
        assert_eq!(once, twice, "normalization not idempotent for {:?}", source);
    }
}

#[test]
fn test_quantifier_modes_round_trip() {
    assert_eq!(compile_pattern("a*").unwrap(), "a*");
    assert_eq!(compile_pattern("a*?").unwrap(), "a*?");
    assert_eq!(compile_pattern("a*+").unwrap(), "a*+");
}

#[test]
fn test_phone_number_pattern() {
    let emitted = compile_pattern(r"(\d{3})[-. ]?(\d{3})[-. ]?(\d{4})").unwrap();
    assert_eq!(emitted, "(\\d{3})[\\-. ]?(\\d{3})[\\-. ]?(\\d{4})");
}

#[test]
fn test_email_pattern() {
    let source = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";
    let emitted = compile_pattern(source).unwrap();
    assert!(emitted.starts_with('['));
    assert!(emitted.contains('@'));
    assert!(emitted.ends_with("{2,}"));
}

#[test]
fn test_free_spacing_pipeline() {
    let source = "%flags x\n(?<year> \\d{4} )   # four digits\n-\n(?<month> \\d{2} )";
    let emitted = compile_pattern(source).unwrap();
    assert_eq!(emitted, "(?<year>\\d{4})-(?<month>\\d{2})");
}

#[test]
fn test_backreference_pipeline() {
    let emitted = compile_pattern(r"(?<open><\w+>).*?\k<open>").unwrap();
    assert_eq!(emitted, "(?<open><\\w+>).*?\\k<open>");
}

#[test]
fn test_feature_gating_between_dialects() {
    let source = "(?>ab)c";
    assert_eq!(
        compile_pattern_for(source, Dialect::Pcre2).unwrap(),
        "(?>ab)c"
    );
    let err = compile_pattern_for(source, Dialect::Ecma).unwrap_err();
    assert_eq!(err.code(), "unsupported-feature");
}

#[test]
fn test_artifact_survives_json_round_trip() {
    let artifact = compile_artifact(r"(?<n>\d+)(?=%)").unwrap();
    let json = serde_json::to_string(&artifact).unwrap();
    let back: rexc_core::IrArtifact = serde_json::from_str(&json).unwrap();
    assert_eq!(back, artifact);
    assert_eq!(
        rexc_core::emit(&back, Dialect::Pcre2).unwrap(),
        rexc_core::emit(&artifact, Dialect::Pcre2).unwrap()
    );
}

#[test]
fn test_first_error_wins_across_stages() {
    // a syntax error anywhere preempts semantic checking
    let err = compile_pattern("(?<x>a)(?<x>b)(c").unwrap_err();
    assert_eq!(err.code(), "unterminated-group");
}

#[test]
fn test_misplaced_directive_rejected() {
    let err = compile_pattern("abc\n%flags i").unwrap_err();
    assert_eq!(err.code(), "misplaced-directive");
}

#[test]
fn test_diagnostics_render_hint_and_span() {
    let err = compile_pattern("(a").unwrap_err();
    let diagnostic = rexc_core::explain(&err);
    assert!(diagnostic.message.contains("unterminated group"));
    assert!(diagnostic.hint.contains("Add a matching ')'"));
    assert_eq!(diagnostic.span.map(|s| s.start), Some(0));
}
