use serde::Serialize;
use tracing::debug;

use schemacpp_schema::EnumValue;

use crate::{error::Diagnostic, naming::enum_type_name, resolver::ResolvedDefinition};

/// One generated enum type: a property's values under a qualified name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDefinition {
    pub name:     String,
    pub property: String,
    pub values:   Vec<EnumValue>,
}

/// Collects an `EnumDefinition` for every property of `resolved` that has an
/// `enum` or `_enum` key, in property order.
///
/// Never fails. Unusable enum keys are reported as `MalformedEnum` and the
/// property still gets a (possibly empty) enum.
pub fn extract_enums(resolved: &ResolvedDefinition, diagnostics: &mut Vec<Diagnostic>) -> Vec<EnumDefinition> {
    let mut enums = Vec::new();

    for prop in &resolved.properties {
        let Some(spec) = &prop.property.enum_spec else {
            continue;
        };

        for issue in &spec.issues {
            diagnostics.push(Diagnostic::MalformedEnum {
                definition: resolved.name.clone(),
                property:   prop.name().to_string(),
                key:        issue.key.clone(),
                found:      issue.found,
            });
        }

        let name = enum_type_name(&resolved.name, prop.name());
        debug!(enum_name = %name, values = spec.values.len(), "extracted enum");
        enums.push(EnumDefinition {
            name,
            property: prop.name().to_string(),
            values:   spec.values.clone(),
        });
    }

    enums
}
