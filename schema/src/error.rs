use thiserror::Error;

/// Unrecoverable problems with the input document. Any of these aborts a
/// compilation run before resolution starts.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Parse error at line {line}, column {column}: {msg}")]
    Parse {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Schema document must be an object at the top level, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Definition \"{name}\" must be an object, found {found}")]
    InvalidDefinition {
        name:  String,
        found: &'static str,
    },
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json appends " at line L column C"; the position is kept separately.
        let full = err.to_string();
        let msg = match full.rfind(" at line ") {
            Some(idx) => full[..idx].to_string(),
            None      => full,
        };
        SchemaError::Parse {
            msg,
            line:   err.line(),
            column: err.column(),
        }
    }
}
