use serde::Serialize;
use serde_json::{Map, Value};

pub const KEY_ALLOF:            &str = "allof";
pub const KEY_ALLOF_ALT:        &str = "allOf";
pub const KEY_PROPERTIES:       &str = "properties";
pub const KEY_REQUIRED:         &str = "required";
pub const KEY_REF:              &str = "$ref";
pub const KEY_ENUM:             &str = "enum";
pub const KEY_ENUM_ALT:         &str = "_enum";
pub const KEY_ENUM_DESCRIPTION: &str = "enumDescription";

/// Short name of a JSON value's type, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

/// A composable node: the ordered members of its `allof` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefinitionNode {
    pub members: Vec<CompositionMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompositionMember {
    /// `{ "$ref": "<pointer>" }`
    Reference { pointer: String },
    /// `{ "properties": {...}, "required": [...] }`
    Inline(InlineSchema),
    /// Anything else found in an `allof` list.
    Malformed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineSchema {
    /// Pointer suffix of this member relative to its node, e.g. `/allof/1`.
    /// Empty when the node itself is the inline schema.
    pub location:   String,
    pub properties: Vec<PropertyDeclaration>,
    pub required:   Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDeclaration {
    pub name:      String,
    pub schema:    Value,
    pub enum_spec: Option<EnumSpec>,
}

/// Enum values of a property, merged from the `enum` and `_enum` keys and
/// paired with `enumDescription` by position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnumSpec {
    pub values: Vec<EnumValue>,
    /// Parts of the enum keys that could not be used.
    pub issues: Vec<EnumIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub label:       String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumIssue {
    /// Offending key, with an index for bad elements (`enum[2]`).
    pub key:   String,
    pub found: &'static str,
}

impl DefinitionNode {
    /// Builds the composition of a node. Returns `None` for anything that is
    /// not an object, since only objects can carry properties.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut members = Vec::new();
        let mut has_composition = false;

        for key in [KEY_ALLOF, KEY_ALLOF_ALT] {
            match object.get(key) {
                Some(Value::Array(items)) => {
                    has_composition = true;
                    for (index, item) in items.iter().enumerate() {
                        members.push(CompositionMember::from_value(item, format!("/{}/{}", key, index)));
                    }
                }
                Some(other) => {
                    has_composition = true;
                    members.push(CompositionMember::Malformed {
                        reason: format!("`{}` is {}, expected an array", key, value_kind(other)),
                    });
                }
                None => {}
            }
        }

        // A bare inline schema (e.g. the target of `#/B/allof/0`) is its own
        // single member, and a bare `$ref` member forwards to its target.
        if !has_composition && (object.contains_key(KEY_PROPERTIES) || object.contains_key(KEY_REF)) {
            members.push(CompositionMember::from_value(value, String::new()));
        }

        Some(DefinitionNode { members })
    }

    /// Whether `value` can stand as the target of a `$ref`: an object that
    /// carries a composition, a property set, or a reference of its own.
    pub fn is_composable(value: &Value) -> bool {
        value.as_object().is_some_and(|object| {
            [KEY_ALLOF, KEY_ALLOF_ALT, KEY_PROPERTIES, KEY_REF]
                .iter()
                .any(|key| object.contains_key(*key))
        })
    }
}

impl CompositionMember {
    pub fn from_value(value: &Value, location: String) -> Self {
        let Some(object) = value.as_object() else {
            return CompositionMember::Malformed {
                reason: format!("composition member is {}, expected an object", value_kind(value)),
            };
        };
        match object.get(KEY_REF) {
            Some(Value::String(pointer)) => CompositionMember::Reference { pointer: pointer.clone() },
            Some(other) => CompositionMember::Malformed {
                reason: format!("`{}` is {}, expected a string", KEY_REF, value_kind(other)),
            },
            None => CompositionMember::Inline(InlineSchema::from_object(object, location)),
        }
    }
}

impl InlineSchema {
    pub fn from_object(object: &Map<String, Value>, location: String) -> Self {
        let properties = match object.get(KEY_PROPERTIES) {
            Some(Value::Object(props)) => props
                .iter()
                .map(|(name, schema)| PropertyDeclaration::new(name, schema))
                .collect(),
            _ => Vec::new(),
        };
        let required = match object.get(KEY_REQUIRED) {
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(|n| n.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        InlineSchema { location, properties, required }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

impl PropertyDeclaration {
    pub fn new(name: &str, schema: &Value) -> Self {
        let enum_spec = schema.as_object().and_then(EnumSpec::from_property);
        PropertyDeclaration {
            name:   name.to_string(),
            schema: schema.clone(),
            enum_spec,
        }
    }
}

impl EnumSpec {
    /// Reads the enum keys of a property schema. `None` if the property has
    /// neither `enum` nor `_enum`.
    pub fn from_property(object: &Map<String, Value>) -> Option<Self> {
        if !object.contains_key(KEY_ENUM) && !object.contains_key(KEY_ENUM_ALT) {
            return None;
        }

        let mut issues = Vec::new();
        let mut labels = Vec::new();
        for key in [KEY_ENUM, KEY_ENUM_ALT] {
            if let Some(raw) = object.get(key) {
                labels.extend(read_labels(key, raw, &mut issues));
            }
        }

        let descriptions = match object.get(KEY_ENUM_DESCRIPTION) {
            Some(raw) => read_labels(KEY_ENUM_DESCRIPTION, raw, &mut issues),
            None      => Vec::new(),
        };

        // Pair by position first; unusable labels are dropped only afterwards.
        let values = labels
            .into_iter()
            .enumerate()
            .filter_map(|(index, label)| {
                Some(EnumValue {
                    label:       label?,
                    description: descriptions.get(index).cloned().flatten(),
                })
            })
            .collect();

        Some(EnumSpec { values, issues })
    }

    pub fn is_malformed(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Reads an array of scalar labels. Elements keep their position (`None` for
/// unusable ones) so descriptions stay aligned with values.
fn read_labels(key: &str, raw: &Value, issues: &mut Vec<EnumIssue>) -> Vec<Option<String>> {
    let Value::Array(items) = raw else {
        issues.push(EnumIssue { key: key.to_string(), found: value_kind(raw) });
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b)   => Some(b.to_string()),
            other => {
                issues.push(EnumIssue {
                    key:   format!("{}[{}]", key, index),
                    found: value_kind(other),
                });
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allof_members_in_order() {
        let node = DefinitionNode::from_value(&json!({
            "allof": [
                { "$ref": "#/B" },
                { "properties": { "y": {}, "a": {} }, "required": ["a"] }
            ]
        }))
        .unwrap();

        assert_eq!(node.members.len(), 2);
        assert_eq!(node.members[0], CompositionMember::Reference { pointer: "#/B".into() });
        let CompositionMember::Inline(inline) = &node.members[1] else {
            panic!("expected an inline member, got {:?}", node.members[1]);
        };
        assert_eq!(inline.location, "/allof/1");
        let names: Vec<&str> = inline.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["y", "a"]);
        assert!(inline.is_required("a"));
        assert!(!inline.is_required("y"));
    }

    #[test]
    fn test_allof_spellings_are_merged() {
        let node = DefinitionNode::from_value(&json!({
            "allOf": [ { "$ref": "#/Second" } ],
            "allof": [ { "$ref": "#/First" } ]
        }))
        .unwrap();

        assert_eq!(
            node.members,
            vec![
                CompositionMember::Reference { pointer: "#/First".into() },
                CompositionMember::Reference { pointer: "#/Second".into() },
            ]
        );
    }

    #[test]
    fn test_bare_inline_schema_is_single_member() {
        let node = DefinitionNode::from_value(&json!({
            "properties": { "x": {} },
            "required": ["x"]
        }))
        .unwrap();
        assert_eq!(node.members.len(), 1);
        assert!(matches!(&node.members[0], CompositionMember::Inline(s) if s.location.is_empty()));
    }

    #[test]
    fn test_bare_reference_is_single_member() {
        let node = DefinitionNode::from_value(&json!({ "$ref": "#/C" })).unwrap();
        assert_eq!(node.members, vec![CompositionMember::Reference { pointer: "#/C".into() }]);
    }

    #[test]
    fn test_composable_targets() {
        assert!(DefinitionNode::is_composable(&json!({ "allof": [] })));
        assert!(DefinitionNode::is_composable(&json!({ "allOf": [] })));
        assert!(DefinitionNode::is_composable(&json!({ "properties": {} })));
        assert!(DefinitionNode::is_composable(&json!({ "$ref": "#/B" })));
        assert!(!DefinitionNode::is_composable(&json!({ "enum": ["a"] })));
        assert!(!DefinitionNode::is_composable(&json!({})));
        assert!(!DefinitionNode::is_composable(&json!([{ "allof": [] }])));
    }

    #[test]
    fn test_empty_and_non_object_nodes() {
        assert_eq!(DefinitionNode::from_value(&json!({})).unwrap().members, vec![]);
        assert_eq!(DefinitionNode::from_value(&json!({ "allof": [] })).unwrap().members, vec![]);
        assert!(DefinitionNode::from_value(&json!([1, 2])).is_none());
        assert!(DefinitionNode::from_value(&json!("text")).is_none());
    }

    #[test]
    fn test_malformed_members() {
        let node = DefinitionNode::from_value(&json!({
            "allof": [ 5, { "$ref": 12 } ]
        }))
        .unwrap();
        assert!(matches!(&node.members[0], CompositionMember::Malformed { reason } if reason.contains("number")));
        assert!(matches!(&node.members[1], CompositionMember::Malformed { reason } if reason.contains("$ref")));

        let node = DefinitionNode::from_value(&json!({ "allof": {} })).unwrap();
        assert!(matches!(&node.members[0], CompositionMember::Malformed { .. }));
    }

    #[test]
    fn test_missing_properties_and_required() {
        let inline = InlineSchema::from_object(
            json!({ "properties": [1], "required": "x" }).as_object().unwrap(),
            "/allof/0".into(),
        );
        assert!(inline.properties.is_empty());
        assert!(inline.required.is_empty());
    }

    #[test]
    fn test_enum_keys_concatenate_primary_first() {
        let spec = EnumSpec::from_property(
            json!({
                "_enum": ["c"],
                "enum": ["a", "b"],
                "enumDescription": ["first", "second", "third"]
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();

        let labels: Vec<&str> = spec.values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(spec.values[2].description.as_deref(), Some("third"));
        assert!(!spec.is_malformed());
    }

    #[test]
    fn test_enum_fewer_descriptions_than_values() {
        let spec = EnumSpec::from_property(
            json!({ "enum": ["a", "b"], "enumDescription": ["only a"] }).as_object().unwrap(),
        )
        .unwrap();
        assert_eq!(spec.values[0].description.as_deref(), Some("only a"));
        assert_eq!(spec.values[1].description, None);
    }

    #[test]
    fn test_enum_scalar_labels_are_rendered() {
        let spec = EnumSpec::from_property(json!({ "enum": [1, true, null] }).as_object().unwrap()).unwrap();
        let labels: Vec<&str> = spec.values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["1", "true"]);
        assert_eq!(spec.issues, vec![EnumIssue { key: "enum[2]".into(), found: "null" }]);
    }

    #[test]
    fn test_enum_descriptions_keep_position_past_skipped_labels() {
        let spec = EnumSpec::from_property(
            json!({
                "enum": [null, "b"],
                "_enum": [["nested"], "d"],
                "enumDescription": ["desc of null", "desc of b", "desc of nested", "desc of d"]
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();
        assert_eq!(
            spec.values,
            vec![
                EnumValue { label: "b".into(), description: Some("desc of b".into()) },
                EnumValue { label: "d".into(), description: Some("desc of d".into()) },
            ]
        );
        assert_eq!(spec.issues.len(), 2);
    }

    #[test]
    fn test_enum_not_a_sequence() {
        let spec = EnumSpec::from_property(json!({ "enum": "a" }).as_object().unwrap()).unwrap();
        assert!(spec.values.is_empty());
        assert!(spec.is_malformed());
        assert_eq!(spec.issues[0].key, "enum");
        assert_eq!(spec.issues[0].found, "string");
    }

    #[test]
    fn test_property_without_enum() {
        let prop = PropertyDeclaration::new("x", &json!({ "type": "string" }));
        assert!(prop.enum_spec.is_none());
        let prop = PropertyDeclaration::new("y", &json!(true));
        assert!(prop.enum_spec.is_none());
    }
}
