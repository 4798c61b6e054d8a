//! Conformance records for cross-implementation parity checks
//!
//! A record pairs a DSL input with either the IR it must compile to or the
//! error it must fail with. Records serialize to JSON under the same
//! schema version as the IR artifact, so independent implementations can
//! exchange and replay them.

use serde::{Deserialize, Serialize};

use crate::compiler::Compiler;
use crate::error::CompileError;
use crate::hints::explain;
use crate::ir::{IrNode, SCHEMA_VERSION};
use crate::parser::parse;

/// A single conformance case
///
/// Success records carry `expected_ir`; failure records carry
/// `expected_error`. A record with neither is malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Stable identifier for reporting
    pub id: String,
    /// Schema version the record was authored against
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,
    /// The DSL input to compile
    pub input_dsl: String,
    /// The IR the input must compile to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_ir: Option<IrNode>,
    /// The error the input must fail with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<ExpectedError>,
}

/// The failure half of a record: error code, and optionally the exact
/// diagnostic hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedError {
    /// A stable error code, e.g. `"duplicate-name"`
    pub kind: String,
    /// The exact hint text, when the record pins it down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

fn current_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run a record through the parse and compile stages and compare the
/// outcome; `Err` describes the first mismatch
pub fn run_case(record: &CaseRecord) -> Result<(), String> {
    let outcome = parse(&record.input_dsl)
        .map_err(CompileError::from)
        .and_then(|(directives, ast)| {
            let mut compiler = Compiler::new();
            compiler
                .compile(&directives.flags, &ast)
                .map_err(CompileError::from)
        });

    match (outcome, &record.expected_ir, &record.expected_error) {
        (Ok(artifact), Some(expected), _) => {
            if artifact.ir == *expected {
                Ok(())
            } else {
                Err(format!(
                    "{}: IR mismatch\n  got:      {}\n  expected: {}",
                    record.id,
                    to_json(&artifact.ir),
                    to_json(expected),
                ))
            }
        }
        (Ok(_), None, Some(expected)) => Err(format!(
            "{}: expected error '{}', but compilation succeeded",
            record.id, expected.kind
        )),
        (Err(error), _, Some(expected)) => {
            if error.code() != expected.kind {
                return Err(format!(
                    "{}: expected error '{}', got '{}' ({})",
                    record.id,
                    expected.kind,
                    error.code(),
                    error
                ));
            }
            if let Some(hint) = &expected.hint {
                let rendered = explain(&error).hint;
                if rendered != *hint {
                    return Err(format!(
                        "{}: hint mismatch\n  got:      {}\n  expected: {}",
                        record.id, rendered, hint
                    ));
                }
            }
            Ok(())
        }
        (Err(error), Some(_), None) => Err(format!(
            "{}: expected success, got: {}",
            record.id, error
        )),
        (_, None, None) => Err(format!(
            "{}: record declares neither expected_ir nor expected_error",
            record.id
        )),
    }
}

fn to_json(node: &IrNode) -> String {
    serde_json::to_string(node).unwrap_or_else(|_| "<unserializable>".to_string())
}
