/// Knobs for the generated file. Everything else about the output is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    /// Namespace wrapping every declaration, e.g. `dsp::data`.
    pub namespace:    String,
    /// Headers pulled in by the file header, without angle brackets.
    pub includes:     Vec<String>,
    /// Spaces per indentation level.
    pub indent_width: usize,
}

pub const DEFAULT_NAMESPACE: &str = "dsp::data";
pub const DEFAULT_INCLUDES: [&str; 3] = ["string", "vector", "nlohmann/json.hpp"];

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            namespace:    DEFAULT_NAMESPACE.to_string(),
            includes:     DEFAULT_INCLUDES.iter().map(|s| s.to_string()).collect(),
            indent_width: 4,
        }
    }
}
