use std::{borrow::Cow, collections::HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use schemacpp_schema::{
    document::canonical_pointer,
    node::value_kind,
    CompositionMember, Definition, DefinitionNode, PropertyDeclaration, SchemaDocument,
};

use crate::error::{Diagnostic, ReferenceFailure};

/// A property as it ends up in a flattened definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProperty {
    pub property:    PropertyDeclaration,
    /// Listed in the `required` set of the member that declared it.
    pub is_required: bool,
    /// Definition whose inline member declared the property.
    pub owner:       String,
    /// Pointer of that inline member, e.g. `/Base/allof/0`.
    pub origin:      String,
}

impl ResolvedProperty {
    pub fn name(&self) -> &str {
        &self.property.name
    }
}

/// The flattened `allof` composition of one definition. Properties reached
/// through several members appear once per member, in resolution order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDefinition {
    pub name:       String,
    pub properties: Vec<ResolvedProperty>,
}

/// Flattens compositions against a read-only document. Each call builds a
/// fresh `ResolvedDefinition`; the document is never annotated.
pub struct Resolver<'a> {
    document: &'a SchemaDocument,
}

/// One composition being expanded: the node, its canonical pointer, and the
/// index of the next member to visit.
struct Frame<'n> {
    node:    Cow<'n, DefinitionNode>,
    pointer: String,
    next:    usize,
}

/// State of one resolution. The frame stack is the path from the definition
/// down to the current node, so it doubles as the in-progress set.
struct Walk<'d> {
    definition:  &'d str,
    stack:       Vec<Frame<'d>>,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    pub fn new(document: &'a SchemaDocument) -> Self {
        Resolver { document }
    }

    /// Resolves one top-level definition. Problems are appended to
    /// `diagnostics` and the offending member is skipped.
    pub fn resolve(&self, definition: &Definition, diagnostics: &mut Vec<Diagnostic>) -> ResolvedDefinition {
        let mut walk = Walk {
            definition: &definition.name,
            stack: vec![Frame {
                node:    Cow::Borrowed(&definition.node),
                pointer: definition.pointer.clone(),
                next:    0,
            }],
            diagnostics,
        };
        let mut properties = Vec::new();

        while let Some(frame) = walk.stack.last_mut() {
            let Some(member) = frame.node.members.get(frame.next).cloned() else {
                walk.stack.pop();
                continue;
            };
            frame.next += 1;

            match member {
                CompositionMember::Reference { pointer: target } => {
                    if let Some(frame) = self.resolve_reference(&mut walk, &target) {
                        walk.stack.push(frame);
                    }
                }
                CompositionMember::Inline(inline) => {
                    let origin = format!("{}{}", frame.pointer, inline.location);
                    let owner = owning_definition(&frame.pointer);
                    for property in &inline.properties {
                        properties.push(ResolvedProperty {
                            property:    property.clone(),
                            is_required: inline.is_required(&property.name),
                            owner:       owner.clone(),
                            origin:      origin.clone(),
                        });
                    }
                }
                CompositionMember::Malformed { reason } => {
                    let diagnostic = Diagnostic::Reference {
                        definition: walk.definition.to_string(),
                        pointer:    format!("#{}", frame.pointer),
                        reason:     ReferenceFailure::Malformed { reason },
                    };
                    walk.record(diagnostic);
                }
            }
        }

        let mut seen = HashSet::new();
        for prop in &properties {
            if !seen.insert(prop.name()) {
                warn!(definition = %definition.name, property = prop.name(), "property is declared more than once");
            }
        }

        ResolvedDefinition {
            name: definition.name.clone(),
            properties,
        }
    }

    /// Looks up `target` and returns the frame that expands it, or records
    /// why it contributes nothing.
    fn resolve_reference(&self, walk: &mut Walk<'_>, target: &str) -> Option<Frame<'static>> {
        let canonical = canonical_pointer(target).to_string();

        if let Some(start) = walk.stack.iter().position(|f| f.pointer == canonical) {
            let cycle = walk.stack[start..]
                .iter()
                .map(|f| &f.pointer)
                .chain(std::iter::once(&canonical))
                .map(|p| format!("#{}", p))
                .collect();
            let diagnostic = Diagnostic::CyclicReference {
                definition: walk.definition.to_string(),
                cycle,
            };
            walk.record(diagnostic);
            return None;
        }

        let failure = match self.document.lookup(target) {
            None => ReferenceFailure::NotFound,
            Some(value) if !self.is_definition(&canonical) && !DefinitionNode::is_composable(value) => {
                ReferenceFailure::NotComposable {
                    found: if value.is_object() { "a plain object" } else { value_kind(value) },
                }
            }
            Some(value) => match DefinitionNode::from_value(value) {
                Some(node) => {
                    debug!(depth = walk.stack.len(), pointer = target, "including reference");
                    return Some(Frame {
                        node:    Cow::Owned(node),
                        pointer: canonical,
                        next:    0,
                    });
                }
                None => ReferenceFailure::NotComposable { found: value_kind(value) },
            },
        };

        let diagnostic = Diagnostic::Reference {
            definition: walk.definition.to_string(),
            pointer:    target.to_string(),
            reason:     failure,
        };
        walk.record(diagnostic);
        None
    }

    /// Top-level definitions are valid targets even with an empty body.
    fn is_definition(&self, canonical: &str) -> bool {
        self.document.definitions().iter().any(|d| d.pointer == canonical)
    }
}

impl Walk<'_> {
    fn record(&mut self, diagnostic: Diagnostic) {
        debug!(depth = self.stack.len(), %diagnostic, "skipping composition member");
        self.diagnostics.push(diagnostic);
    }
}

/// First token of a pointer, unescaped: `/Base/allof/0` belongs to `Base`.
fn owning_definition(pointer: &str) -> String {
    pointer
        .split('/')
        .nth(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .unwrap_or_default()
}
