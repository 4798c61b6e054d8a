//! Conformance suite driven by serialized case records
//!
//! Each case is the JSON form a sibling implementation would exchange:
//! success records pin the exact IR, failure records pin the error code
//! (and optionally the hint text).

use rexc_core::{run_case, CaseRecord};

fn run_json(json: &str) {
    let record: CaseRecord = serde_json::from_str(json).expect("record must deserialize");
    if let Err(mismatch) = run_case(&record) {
        panic!("{}", mismatch);
    }
}

#[test]
fn conformance_literal_fusion() {
    run_json(
        r#"{
            "id": "lit-fusion",
            "input_dsl": "hello",
            "expected_ir": { "ir": "Lit", "value": "hello" }
        }"#,
    );
}

#[test]
fn conformance_quantifier_star() {
    run_json(
        r#"{
            "id": "quant-star",
            "input_dsl": "a*",
            "expected_ir": {
                "ir": "Quant",
                "child": { "ir": "Lit", "value": "a" },
                "min": 0,
                "max": null,
                "mode": "Greedy"
            }
        }"#,
    );
}

#[test]
fn conformance_quantifier_lazy_bounds() {
    run_json(
        r#"{
            "id": "quant-lazy-bounds",
            "input_dsl": "a{2,5}?",
            "expected_ir": {
                "ir": "Quant",
                "child": { "ir": "Lit", "value": "a" },
                "min": 2,
                "max": 5,
                "mode": "Lazy"
            }
        }"#,
    );
}

#[test]
fn conformance_named_group() {
    run_json(
        r#"{
            "id": "named-group",
            "input_dsl": "(?<word>ab)",
            "expected_ir": {
                "ir": "Group",
                "kind": { "Named": "word" },
                "body": { "ir": "Lit", "value": "ab" }
            }
        }"#,
    );
}

#[test]
fn conformance_alternation() {
    run_json(
        r#"{
            "id": "alternation",
            "input_dsl": "cat|dog",
            "expected_ir": {
                "ir": "Alt",
                "branches": [
                    { "ir": "Lit", "value": "cat" },
                    { "ir": "Lit", "value": "dog" }
                ]
            }
        }"#,
    );
}

#[test]
fn conformance_character_class() {
    run_json(
        r#"{
            "id": "char-class",
            "input_dsl": "[a-z_]",
            "expected_ir": {
                "ir": "CharClass",
                "negated": false,
                "items": [
                    { "item": "Range", "from": "a", "to": "z" },
                    { "item": "Lit", "ch": "_" }
                ]
            }
        }"#,
    );
}

#[test]
fn conformance_shorthand_is_one_item_class() {
    run_json(
        r#"{
            "id": "digit-shorthand",
            "input_dsl": "\\d",
            "expected_ir": {
                "ir": "CharClass",
                "negated": false,
                "items": [
                    { "item": "Escape", "kind": "Digit", "negated": false }
                ]
            }
        }"#,
    );
}

#[test]
fn conformance_lookbehind() {
    run_json(
        r#"{
            "id": "lookbehind",
            "input_dsl": "(?<=ab)",
            "expected_ir": {
                "ir": "Look",
                "dir": "Behind",
                "negated": false,
                "body": { "ir": "Lit", "value": "ab" }
            }
        }"#,
    );
}

#[test]
fn conformance_reversed_range_fails() {
    run_json(
        r#"{
            "id": "reversed-range",
            "input_dsl": "[z-a]",
            "expected_error": { "kind": "invalid-class-range" }
        }"#,
    );
}

#[test]
fn conformance_duplicate_name_fails() {
    run_json(
        r#"{
            "id": "duplicate-name",
            "input_dsl": "(?<x>a)(?<x>b)",
            "expected_error": { "kind": "duplicate-name" }
        }"#,
    );
}

#[test]
fn conformance_unterminated_group_fails_with_hint() {
    run_json(
        r#"{
            "id": "unterminated-group",
            "input_dsl": "(a",
            "expected_error": {
                "kind": "unterminated-group",
                "hint": "This group was opened with '(' but never closed. Add a matching ')' to close the group."
            }
        }"#,
    );
}

#[test]
fn conformance_dangling_backref_fails() {
    run_json(
        r#"{
            "id": "dangling-backref",
            "input_dsl": "\\k<missing>",
            "expected_error": { "kind": "unknown-backref" }
        }"#,
    );
}
