//! schemacpp-compiler
//!
//! This crate implements:
//!  1) Reference resolution: flattening `allof` compositions through `$ref`
//!     pointers, with cycle detection,
//!  2) Enum extraction from `enum` / `_enum` / `enumDescription` keys,
//!  3) Deterministic enum type naming,
//!  4) An identifier verifier for the generated C++,
//!  5) The C++ emitter and the two-pass compiler driver,
//!  6) Error and diagnostic types (`CompileError`, `Diagnostic`).
//!
//! ```
//! use schemacpp_compiler::{compile_str, EmitOptions};
//!
//! let mut out = Vec::new();
//! let report = compile_str(
//!     r#"{ "Unit": { "allof": [ { "properties": { "side": { "enum": ["west", "east"] } }, "required": [] } ] } }"#,
//!     &mut out,
//!     &EmitOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(report.is_success());
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("    class Unit;\n"));
//! assert!(text.contains("    enum class Unit_side_kind\n"));
//! ```

pub mod error;
pub mod options;
pub mod naming;
pub mod resolver;
pub mod enums;
pub mod verifier;
pub mod emitter;
pub mod compiler;

pub use compiler::{
    check_preconditions, compile_document, compile_file, compile_str, load_document, CompileReport, CompiledDefinition,
    Compiler,
};
pub use enums::{extract_enums, EnumDefinition};
pub use error::{CompileError, Diagnostic, ReferenceFailure};
pub use naming::{enum_type_name, normalize_identifier};
pub use options::EmitOptions;
pub use resolver::{ResolvedDefinition, ResolvedProperty, Resolver};
