//! Deterministic names for generated enum types.
//!
//! An enum type is named after the definition being compiled and the property
//! carrying the values: `MyVehicle` + `fuelType` gives `My_vehicle_fuel_type_kind`.
//! Definition names are unique in a document and property names are unique in
//! a definition, so the qualified name does not collide with other enums.

pub const SEPARATOR:   char = '_';
pub const ENUM_SUFFIX: &str = "kind";

/// Splits a mixed-case identifier on its uppercase letters.
///
/// The first character is copied unchanged. Every later uppercase character
/// is lowercased and preceded by [`SEPARATOR`]. The result has no uppercase
/// letters past the first character, so normalizing twice is a no-op.
pub fn normalize_identifier(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if !chars.clone().any(char::is_uppercase) {
        return s.to_string();
    }

    let mut normalized = String::with_capacity(s.len() + 4);
    normalized.push(first);
    for c in chars {
        if c.is_uppercase() {
            normalized.push(SEPARATOR);
            normalized.extend(c.to_lowercase());
        } else {
            normalized.push(c);
        }
    }
    normalized
}

/// Name of the enum type generated for `property` of `definition`.
pub fn enum_type_name(definition: &str, property: &str) -> String {
    let mut name = normalize_identifier(definition);
    name.push(SEPARATOR);
    name.push_str(&normalize_identifier(property));
    name.push(SEPARATOR);
    name.push_str(ENUM_SUFFIX);
    name
}
