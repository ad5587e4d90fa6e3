use serde::Serialize;
use serde_json::Value;

use crate::{
    error::SchemaError,
    node::{value_kind, DefinitionNode},
};

/// A named top-level definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub name:    String,
    /// Canonical pointer to this definition, e.g. `/Vehicle`.
    pub pointer: String,
    pub node:    DefinitionNode,
}

/// A parsed schema document. Immutable once parsed; definitions keep the
/// order in which they appear in the source text.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    root:        Value,
    definitions: Vec<Definition>,
}

impl SchemaDocument {
    /// Parses the textual document. Fails if the text is not JSON, if the
    /// top level is not an object, or if any definition is not an object.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let root: Value = serde_json::from_str(text)?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self, SchemaError> {
        let Value::Object(map) = &root else {
            return Err(SchemaError::NotAnObject { found: value_kind(&root) });
        };

        let mut definitions = Vec::with_capacity(map.len());
        for (name, value) in map {
            let node = DefinitionNode::from_value(value).ok_or_else(|| SchemaError::InvalidDefinition {
                name:  name.clone(),
                found: value_kind(value),
            })?;
            definitions.push(Definition {
                name:    name.clone(),
                pointer: format!("/{}", escape_pointer_token(name)),
                node,
            });
        }

        Ok(SchemaDocument { root, definitions })
    }

    /// Resolves a JSON pointer (`/a/b`, or fragment form `#/a/b`) against the
    /// document root. `None` if nothing is addressed.
    pub fn lookup(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(canonical_pointer(pointer))
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Strips the `#` fragment marker so `#/A` and `/A` name the same node.
pub fn canonical_pointer(pointer: &str) -> &str {
    pointer.strip_prefix('#').unwrap_or(pointer)
}

/// Escapes a single reference token per RFC 6901.
pub fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
