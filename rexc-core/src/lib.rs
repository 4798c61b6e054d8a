//! Rexc Core Library
//!
//! A compiler for a readable pattern DSL targeting native regex dialects.
//! Compilation is a three-stage pipeline: parse (text to AST), compile
//! (AST to a target-agnostic IR with normalization and semantic checks),
//! and emit (IR to a target dialect's syntax). Failures at any stage carry
//! the offending source span and can be rendered as instructional
//! diagnostics by the hint engine.
//!
//! Each call owns its token stream, AST, and IR and shares no state with
//! other calls, so independent patterns may be compiled concurrently.

pub mod ast;
pub mod compiler;
pub mod conformance;
pub mod emit;
pub mod error;
pub mod groups;
pub mod hints;
pub mod ir;
pub mod parser;
pub mod scanner;

pub use ast::{
    AnchorKind, BackrefTarget, ClassEscapeKind, ClassItem, Directives, Flags, GroupKind,
    LookDirection, Node, QuantMode,
};
pub use compiler::{Compiler, lower, normalize};
pub use conformance::{CaseRecord, ExpectedError, run_case};
pub use emit::{Dialect, DialectCaps, emit};
pub use error::{
    CompileError, EmitError, Result, SemanticError, SemanticErrorKind, Span, SyntaxError,
    SyntaxErrorKind,
};
pub use groups::GroupRegistry;
pub use hints::{Diagnostic, explain};
pub use ir::{
    Feature, FeatureSummary, IrArtifact, IrClassItem, IrNode, MaxBound, SCHEMA_VERSION,
};
pub use parser::parse;
pub use scanner::{GroupOpenKind, Scanner, Token, TokenKind};

/// Compile a pattern to the primary target dialect
pub fn compile_pattern(source: &str) -> Result<String> {
    compile_pattern_for(source, Dialect::Pcre2)
}

/// Compile a pattern to the given target dialect
pub fn compile_pattern_for(source: &str, dialect: Dialect) -> Result<String> {
    let artifact = compile_artifact(source)?;
    Ok(emit::emit(&artifact, dialect)?)
}

/// Run the parse and compile stages, returning the IR artifact
pub fn compile_artifact(source: &str) -> Result<IrArtifact> {
    let (directives, ast) = parser::parse(source)?;
    let mut compiler = Compiler::new();
    Ok(compiler.compile(&directives.flags, &ast)?)
}
