use serde::Serialize;
use thiserror::Error;

use schemacpp_schema::SchemaError;

/// Fatal errors. Any of these stops the run; nothing past the failing step is
/// resolved or emitted.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Precondition failed: {0}")]
    Precondition(String),
}

/// Why a `$ref` (or an unusable composition member) contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceFailure {
    #[error("pointer does not address any node")]
    NotFound,

    #[error("target is {found}, expected an object with allof, properties or $ref")]
    NotComposable { found: &'static str },

    #[error("{reason}")]
    Malformed { reason: String },
}

/// A recoverable problem found while compiling one definition. The run keeps
/// going; the affected branch contributes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("{definition}: failed to resolve `{pointer}`: {reason}")]
    Reference {
        definition: String,
        pointer:    String,
        reason:     ReferenceFailure,
    },

    #[error("{definition}: cyclic reference {}", .cycle.join(" -> "))]
    CyclicReference {
        definition: String,
        cycle:      Vec<String>,
    },

    #[error("{definition}: property `{property}` has malformed enum key `{key}` (found {found})")]
    MalformedEnum {
        definition: String,
        property:   String,
        key:        String,
        found:      &'static str,
    },

    #[error("{definition}: `{identifier}` is not a valid C++ identifier ({reason})")]
    InvalidIdentifier {
        definition: String,
        identifier: String,
        reason:     &'static str,
    },
}

impl Diagnostic {
    /// Errors flip the run's success flag; the rest are warnings.
    pub fn is_error(&self) -> bool {
        !matches!(self, Diagnostic::InvalidIdentifier { .. })
    }

    pub fn definition(&self) -> &str {
        match self {
            Diagnostic::Reference { definition, .. }
            | Diagnostic::CyclicReference { definition, .. }
            | Diagnostic::MalformedEnum { definition, .. }
            | Diagnostic::InvalidIdentifier { definition, .. } => definition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_messages() {
        let diag = Diagnostic::Reference {
            definition: "A".into(),
            pointer:    "#/Missing".into(),
            reason:     ReferenceFailure::NotFound,
        };
        assert_eq!(diag.to_string(), "A: failed to resolve `#/Missing`: pointer does not address any node");

        let diag = Diagnostic::CyclicReference {
            definition: "A".into(),
            cycle:      vec!["#/A".into(), "#/B".into(), "#/A".into()],
        };
        assert_eq!(diag.to_string(), "A: cyclic reference #/A -> #/B -> #/A");
        assert!(diag.is_error());
    }

    #[test]
    fn test_identifier_problems_are_warnings() {
        let diag = Diagnostic::InvalidIdentifier {
            definition: "A".into(),
            identifier: "class".into(),
            reason:     "reserved keyword",
        };
        assert!(!diag.is_error());
        assert_eq!(diag.definition(), "A");
    }
}
