//! Raw decode model for the wiki dump
//!
//! Every inconsistent shape in the dump gets an explicit coercion type here,
//! so nothing downstream ever sees a singular-vs-plural or string-vs-object
//! ambiguity. Unknown fields are dropped at this boundary instead of being
//! copied blindly onto symbols.

use serde::Deserialize;

use glua_symbols::{Description, Example, SymbolKind};

use crate::WikiError;

/// Decode the raw dump text into its top-level elements.
pub fn parse_dump(json: &str) -> Result<Vec<RawElement>, WikiError> {
    Ok(serde_json::from_str(json)?)
}

/// A field that may arrive as one value or an array of values.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Scalar that the dump renders as string, number or bool.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
            Scalar::Bool(flag) => flag.to_string(),
        }
    }
}

/// One top-level dump element: realm tags plus a function or an enum group.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    #[serde(default)]
    pub realms: Vec<String>,
    #[serde(default)]
    pub function: Option<RawFunction>,
    #[serde(default, rename = "enum")]
    pub enum_group: Option<RawEnumNode>,
    /// Element-level examples, inherited by a function lacking its own.
    #[serde(default)]
    pub example: Option<OneOrMany<RawExample>>,
}

/// Function kind discriminator carried by the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawFunctionKind {
    Libraryfunc,
    Classfunc,
    Panelfunc,
    Hook,
}

impl RawFunctionKind {
    pub fn symbol_kind(self) -> SymbolKind {
        match self {
            RawFunctionKind::Libraryfunc => SymbolKind::GlobalFunction,
            RawFunctionKind::Classfunc => SymbolKind::ClassMethod,
            RawFunctionKind::Panelfunc => SymbolKind::PanelMethod,
            RawFunctionKind::Hook => SymbolKind::Hook,
        }
    }
}

/// One function definition as it appears in the dump.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFunction {
    pub name: String,
    #[serde(default, alias = "owner")]
    pub parent: Option<String>,
    #[serde(rename = "type")]
    pub kind: RawFunctionKind,
    #[serde(default)]
    pub description: Option<RawDescription>,
    #[serde(default)]
    pub args: Option<RawArgs>,
    #[serde(default)]
    pub rets: Option<RawRets>,
    #[serde(default)]
    pub example: Option<OneOrMany<RawExample>>,
    #[serde(default)]
    pub realm: Option<String>,
}

/// `description` is a bare string or an object with optional markers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDescription {
    Text(String),
    Full {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        deprecated: Option<String>,
        #[serde(default)]
        internal: Option<Scalar>,
    },
}

impl RawDescription {
    pub fn into_description(self) -> Description {
        match self {
            RawDescription::Text(text) => Description {
                text,
                ..Description::default()
            },
            RawDescription::Full {
                text,
                deprecated,
                internal,
            } => Description {
                text: text.unwrap_or_default(),
                deprecated,
                internal: internal.map(Scalar::into_text),
            },
        }
    }

    /// Just the text, for enum group descriptions.
    pub fn into_text(self) -> String {
        self.into_description().text
    }
}

/// `args` wrapper: `{arg: <one or many>}` or absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArgs {
    #[serde(default)]
    pub arg: Option<OneOrMany<RawArgument>>,
}

impl RawArgs {
    pub fn into_vec(self) -> Vec<RawArgument> {
        self.arg.map(OneOrMany::into_vec).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArgument {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub default: Option<Scalar>,
    #[serde(default)]
    pub text: String,
}

/// `rets` wrapper: `{ret: <one or many>}` or absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRets {
    #[serde(default)]
    pub ret: Option<OneOrMany<RawReturn>>,
}

impl RawRets {
    pub fn into_vec(self) -> Vec<RawReturn> {
        self.ret.map(OneOrMany::into_vec).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReturn {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub text: String,
}

/// An example whose `code` field is occasionally a non-string blob; those
/// are discarded during conversion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExample {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: serde_json::Value,
    #[serde(default)]
    pub output: Option<String>,
}

impl RawExample {
    pub fn into_example(self) -> Option<Example> {
        match self.code {
            serde_json::Value::String(code) => Some(Example {
                description: self.description,
                code,
                output: self.output,
            }),
            _ => None,
        }
    }
}

/// The `enum` field: one group or an array of groups.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEnumNode {
    Many(Vec<RawEnumGroup>),
    One(RawEnumGroup),
}

impl RawEnumNode {
    pub fn into_groups(self) -> Vec<RawEnumGroup> {
        match self {
            RawEnumNode::Many(groups) => groups,
            RawEnumNode::One(group) => vec![group],
        }
    }
}

/// A group of enum entries; groups nest arbitrarily.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEnumGroup {
    #[serde(default)]
    pub items: Option<RawEnumItems>,
    #[serde(default)]
    pub description: Option<RawDescription>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEnumItems {
    #[serde(default)]
    pub item: Option<OneOrMany<RawEnumEntry>>,
}

impl RawEnumItems {
    pub fn into_vec(self) -> Vec<RawEnumEntry> {
        self.item.map(OneOrMany::into_vec).unwrap_or_default()
    }
}

/// Leaf-or-subgroup. Leaf is tried first: a leaf always carries `key`,
/// while every map would satisfy the all-optional group shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEnumEntry {
    Leaf(RawEnumLeaf),
    Group(Box<RawEnumGroup>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnumLeaf {
    pub key: String,
    #[serde(default)]
    pub value: Option<Scalar>,
    #[serde(default, alias = "description")]
    pub text: Option<String>,
    #[serde(default)]
    pub realm: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn function(value: serde_json::Value) -> RawFunction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn args_coerce_singular_plural_and_absent() {
        let singular = function(json!({
            "name": "Foo", "type": "libraryfunc",
            "args": {"arg": {"name": "x", "type": "number"}}
        }));
        assert_eq!(singular.args.unwrap().into_vec().len(), 1);

        let plural = function(json!({
            "name": "Foo", "type": "libraryfunc",
            "args": {"arg": [{"name": "x", "type": "number"}, {"name": "y", "type": "number"}]}
        }));
        assert_eq!(plural.args.unwrap().into_vec().len(), 2);

        let absent = function(json!({"name": "Foo", "type": "libraryfunc"}));
        assert!(absent.args.is_none());
    }

    #[test]
    fn description_coerces_string_and_object() {
        let text: RawDescription = serde_json::from_value(json!("hello")).unwrap();
        assert_eq!(text.into_description().text, "hello");

        let object: RawDescription =
            serde_json::from_value(json!({"deprecated": "use Bar"})).unwrap();
        let desc = object.into_description();
        assert_eq!(desc.text, "");
        assert_eq!(desc.deprecated.as_deref(), Some("use Bar"));
    }

    #[test]
    fn non_textual_example_code_is_discarded() {
        let bogus: RawExample =
            serde_json::from_value(json!({"description": "d", "code": {"html": "x"}})).unwrap();
        assert!(bogus.into_example().is_none());

        let good: RawExample =
            serde_json::from_value(json!({"description": "d", "code": "print(1)"})).unwrap();
        assert_eq!(good.into_example().unwrap().code, "print(1)");
    }

    #[test]
    fn enum_entries_distinguish_leaves_from_groups() {
        let leaf: RawEnumEntry = serde_json::from_value(json!({"key": "E", "value": 3})).unwrap();
        assert!(matches!(leaf, RawEnumEntry::Leaf(_)));

        let group: RawEnumEntry = serde_json::from_value(
            json!({"items": {"item": [{"key": "F", "value": 4}]}, "description": "sub"}),
        )
        .unwrap();
        assert!(matches!(group, RawEnumEntry::Group(_)));
    }

    #[test]
    fn scalar_values_normalize_to_text() {
        let number: Scalar = serde_json::from_value(json!(107)).unwrap();
        assert_eq!(number.into_text(), "107");
        let text: Scalar = serde_json::from_value(json!("107")).unwrap();
        assert_eq!(text.into_text(), "107");
    }

    #[test]
    fn dump_with_unknown_fields_still_decodes() {
        let dump = json!([{
            "realms": ["Client"],
            "somethingelse": true,
            "function": {
                "name": "Foo", "type": "libraryfunc", "parent": "Global",
                "file": {"text": "lua/foo.lua", "line": "12"}
            }
        }]);
        let elements = parse_dump(&dump.to_string()).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].function.as_ref().unwrap().name, "Foo");
    }
}
