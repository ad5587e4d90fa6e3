use lazy_static::lazy_static;
use regex::Regex;

use schemacpp_schema::SchemaDocument;

use crate::{enums::EnumDefinition, error::Diagnostic};

lazy_static! {
    static ref IDENTIFIER:      Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref RESERVED_PREFIX: Regex = Regex::new(r"^_[A-Z]|__").unwrap();
}

pub const CPP_KEYWORDS: [&str; 92] = [
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor",
    "bool", "break", "case", "catch", "char", "char8_t", "char16_t", "char32_t",
    "class", "compl", "concept", "const", "consteval", "constexpr", "constinit", "const_cast",
    "continue", "co_await", "co_return", "co_yield", "decltype", "default", "delete", "do",
    "double", "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false",
    "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator",
    "or", "or_eq", "private", "protected", "public", "register", "reinterpret_cast", "requires",
    "return", "short", "signed", "sizeof", "static", "static_assert", "static_cast", "struct",
    "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
    "wchar_t", "while", "xor", "xor_eq",
];

/// Returns the reason `identifier` cannot be used verbatim in C++, if any.
pub fn check_identifier(identifier: &str) -> Result<(), &'static str> {
    if !IDENTIFIER.is_match(identifier) {
        return Err("not an identifier");
    }
    if CPP_KEYWORDS.contains(&identifier) {
        return Err("reserved keyword");
    }
    if RESERVED_PREFIX.is_match(identifier) {
        return Err("reserved for the implementation");
    }
    Ok(())
}

/// Definition names become class names in the forward declarations.
pub fn verify_definition_names(document: &SchemaDocument, diagnostics: &mut Vec<Diagnostic>) {
    for def in document.definitions() {
        if let Err(reason) = check_identifier(&def.name) {
            diagnostics.push(Diagnostic::InvalidIdentifier {
                definition: def.name.clone(),
                identifier: def.name.clone(),
                reason,
            });
        }
    }
}

/// Enum type names and every enum label of one definition.
pub fn verify_enums(definition: &str, enums: &[EnumDefinition], diagnostics: &mut Vec<Diagnostic>) {
    for enum_def in enums {
        let identifiers = std::iter::once(enum_def.name.as_str()).chain(enum_def.values.iter().map(|v| v.label.as_str()));
        for identifier in identifiers {
            if let Err(reason) = check_identifier(identifier) {
                diagnostics.push(Diagnostic::InvalidIdentifier {
                    definition: definition.to_string(),
                    identifier: identifier.to_string(),
                    reason,
                });
            }
        }
    }
}
