use std::io::{self, Write};

use crate::{enums::EnumDefinition, options::EmitOptions};

/// Line-oriented C++ writer. Appends to the sink and keeps no state between
/// calls; nesting is passed in as `depth`.
pub struct CppEmitter<'a, W: Write> {
    out:     &'a mut W,
    options: &'a EmitOptions,
}

impl<'a, W: Write> CppEmitter<'a, W> {
    pub fn new(out: &'a mut W, options: &'a EmitOptions) -> Self {
        CppEmitter { out, options }
    }

    fn tab(&self, depth: usize) -> String {
        " ".repeat(self.options.indent_width * depth)
    }

    /// `#pragma once`, the includes, and the opening of the namespace.
    pub fn file_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "#pragma once")?;
        for include in &self.options.includes {
            writeln!(self.out, "#include <{}>", include)?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "namespace {}", self.options.namespace)?;
        writeln!(self.out, "{{")
    }

    /// One opaque `class Name;` per definition, in the order given.
    pub fn forward_declarations<'n, I>(&mut self, names: I, depth: usize) -> io::Result<()>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let tab = self.tab(depth);
        for name in names {
            writeln!(self.out, "{}class {};", tab, name)?;
        }
        Ok(())
    }

    /// The generated types of one definition. Only its enums are emitted for
    /// now; record bodies are not generated.
    pub fn definition(&mut self, enums: &[EnumDefinition], depth: usize) -> io::Result<()> {
        for enum_def in enums {
            self.enum_class(enum_def, depth)?;
        }
        Ok(())
    }

    fn enum_class(&mut self, enum_def: &EnumDefinition, depth: usize) -> io::Result<()> {
        let outer = self.tab(depth);
        let inner = self.tab(depth + 1);

        writeln!(self.out, "{}enum class {}", outer, enum_def.name)?;
        writeln!(self.out, "{}{{", outer)?;
        for value in &enum_def.values {
            if let Some(description) = &value.description {
                writeln!(self.out, "{}/*", inner)?;
                writeln!(self.out, "{}{}", inner, description)?;
                writeln!(self.out, "{}*/", inner)?;
            }
            writeln!(self.out, "{}{},", inner, value.label)?;
        }
        writeln!(self.out, "{}}};", outer)
    }

    /// Closes the namespace opened by [`CppEmitter::file_header`].
    pub fn file_footer(&mut self) -> io::Result<()> {
        writeln!(self.out, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemacpp_schema::EnumValue;

    fn render(f: impl FnOnce(&mut CppEmitter<'_, Vec<u8>>) -> io::Result<()>, options: &EmitOptions) -> String {
        let mut buf = Vec::new();
        let mut emitter = CppEmitter::new(&mut buf, options);
        f(&mut emitter).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_file_header_and_footer() {
        let options = EmitOptions::default();
        let text = render(|e| { e.file_header()?; e.file_footer() }, &options);
        assert_eq!(
            text,
            "#pragma once\n#include <string>\n#include <vector>\n#include <nlohmann/json.hpp>\n\nnamespace dsp::data\n{\n}\n"
        );
    }

    #[test]
    fn test_custom_namespace_and_includes() {
        let options = EmitOptions {
            namespace:    "game::model".into(),
            includes:     vec!["cstdint".into()],
            indent_width: 2,
        };
        let text = render(|e| { e.file_header()?; e.forward_declarations(["A"], 1) }, &options);
        assert_eq!(text, "#pragma once\n#include <cstdint>\n\nnamespace game::model\n{\n  class A;\n");
    }

    #[test]
    fn test_forward_declarations_keep_order() {
        let options = EmitOptions::default();
        let text = render(|e| e.forward_declarations(["Zeta", "Alpha"], 1), &options);
        assert_eq!(text, "    class Zeta;\n    class Alpha;\n");
    }

    #[test]
    fn test_enum_with_descriptions() {
        let options = EmitOptions::default();
        let enums = vec![EnumDefinition {
            name:     "Vehicle_fuel_kind".into(),
            property: "fuel".into(),
            values:   vec![
                EnumValue { label: "diesel".into(), description: Some("Diesel engine".into()) },
                EnumValue { label: "petrol".into(), description: None },
            ],
        }];
        let text = render(|e| e.definition(&enums, 1), &options);
        assert_eq!(
            text,
            concat!(
                "    enum class Vehicle_fuel_kind\n",
                "    {\n",
                "        /*\n",
                "        Diesel engine\n",
                "        */\n",
                "        diesel,\n",
                "        petrol,\n",
                "    };\n",
            )
        );
    }

    #[test]
    fn test_empty_enum() {
        let options = EmitOptions::default();
        let enums = vec![EnumDefinition { name: "A_b_kind".into(), property: "b".into(), values: vec![] }];
        let text = render(|e| e.definition(&enums, 1), &options);
        assert_eq!(text, "    enum class A_b_kind\n    {\n    };\n");
    }

    #[test]
    fn test_definition_without_enums_writes_nothing() {
        let options = EmitOptions::default();
        assert_eq!(render(|e| e.definition(&[], 1), &options), "");
    }
}
