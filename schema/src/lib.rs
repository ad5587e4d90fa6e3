//! schemacpp-schema
//!
//! In-memory model of a schema document: a JSON object mapping definition
//! names to `allof` compositions of `$ref` pointers and inline property sets.
//!
//! ```
//! use schemacpp_schema::{CompositionMember, SchemaDocument};
//!
//! let doc = SchemaDocument::parse(r##"{
//!     "B": { "allof": [ { "properties": { "x": {} }, "required": ["x"] } ] },
//!     "A": { "allof": [ { "$ref": "#/B" } ] }
//! }"##).unwrap();
//!
//! let names: Vec<&str> = doc.definitions().iter().map(|d| d.name.as_str()).collect();
//! assert_eq!(names, ["B", "A"]);
//! assert!(doc.lookup("#/B/allof/0").is_some());
//! assert!(matches!(
//!     &doc.definition("A").unwrap().node.members[0],
//!     CompositionMember::Reference { pointer } if pointer == "#/B"
//! ));
//! ```

pub mod error;
pub mod document;
pub mod node;

pub use document::{Definition, SchemaDocument};
pub use error::SchemaError;
pub use node::{
    CompositionMember, DefinitionNode, EnumIssue, EnumSpec, EnumValue, InlineSchema,
    PropertyDeclaration,
};
