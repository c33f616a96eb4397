// src/models.rs

use crate::constants::{COMMAND_PATH_SEPARATOR, HTTP_UNAUTHORIZED};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

// --- COMMAND TREE MODELS (what the service declares) ---

/// Children of a directory, in the order the service declared them.
/// Menu layout is positional, so iteration order matters.
pub type CommandTree = IndexMap<String, CommandNode>;

/// Option name to definition, in declaration order.
pub type OptionSchema = IndexMap<String, OptionDefinition>;

/// Raw field values as a form would submit them, keyed by option name.
pub type Submission = IndexMap<String, String>;

/// The typed request body sent to a command's invocation path.
pub type Payload = serde_json::Map<String, Value>;

/// One named entry of the command tree.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "WireCommandNode")]
pub struct CommandNode {
    pub name: String,
    pub kind: NodeKind,
}

/// A node is exactly one of directory or leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Directory(CommandTree),
    Leaf(CommandLeaf),
}

/// A runnable command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandLeaf {
    pub info: CommandInfo,
    /// Handed back to the transport unchanged.
    pub invocation_path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct CommandInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: OptionSchema,
}

/// The node exactly as it travels on the wire.
#[derive(Deserialize, Debug)]
struct WireCommandNode {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default)]
    is_directory: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    commands: CommandTree,
    #[serde(default)]
    info: Option<CommandInfo>,
    #[serde(default)]
    http_path: Option<String>,
}

impl TryFrom<WireCommandNode> for CommandNode {
    type Error = String;

    fn try_from(wire: WireCommandNode) -> Result<Self, Self::Error> {
        let kind = if wire.is_directory {
            NodeKind::Directory(wire.commands)
        } else {
            let invocation_path = wire
                .http_path
                .ok_or_else(|| format!("command '{}' has no 'http_path'", wire.name))?;
            NodeKind::Leaf(CommandLeaf {
                info: wire.info.unwrap_or_default(),
                invocation_path,
            })
        };
        Ok(Self {
            name: wire.name,
            kind,
        })
    }
}

impl CommandNode {
    /// Turns the node returned by the service into the root mapping the menu is compiled from.
    /// A lone leaf becomes a one-entry tree keyed by its own name.
    pub fn into_tree(self) -> CommandTree {
        match self.kind {
            NodeKind::Directory(children) => children,
            NodeKind::Leaf(_) => {
                let mut tree = CommandTree::new();
                tree.insert(self.name.clone(), self);
                tree
            }
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }
}

/// Walks `tree` by original keys (`deploy/web/restart`) and returns the leaf at the end.
/// Empty segments are ignored, so leading or doubled separators are harmless.
pub fn find_leaf<'a>(tree: &'a CommandTree, path: &str) -> Option<&'a CommandLeaf> {
    let mut segments = path
        .split(COMMAND_PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .peekable();
    let mut current = tree;

    while let Some(segment) = segments.next() {
        let node = current.get(segment)?;
        match &node.kind {
            NodeKind::Directory(children) => current = children,
            NodeKind::Leaf(leaf) => {
                return if segments.peek().is_none() {
                    Some(leaf)
                } else {
                    None
                };
            }
        }
    }
    None
}

// --- OPTION SCHEMA MODELS ---

/// Type tag given to an option that declares no `value_type`.
pub const MISSING_TYPE_TAG: &str = "missing";

/// Type tag given to an option whose definition does not decode.
pub const MALFORMED_TYPE_TAG: &str = "malformed";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OptionDefinition {
    #[serde(default = "missing_value_type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub required: bool,
    /// Arrives already as a literal; its JSON kind is whatever the schema author wrote.
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub size: Option<SizeBounds>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl OptionDefinition {
    /// Decodes one schema entry. An entry that does not fit becomes an
    /// `Unrecognized` option, which form synthesis skips with a diagnostic.
    fn from_wire(name: &str, value: Value) -> Self {
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(definition) => definition,
            Err(e) => {
                log::warn!("Option '{}' has a malformed definition: {}", name, e);
                Self {
                    value_type: ValueType::Unrecognized(MALFORMED_TYPE_TAG.to_string()),
                    required: value.get("required").and_then(Value::as_bool).unwrap_or(false),
                    default_value: None,
                    size: None,
                    description: value
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                }
            }
        }
    }
}

fn missing_value_type() -> ValueType {
    ValueType::Unrecognized(MISSING_TYPE_TAG.to_string())
}

/// Optional `{min, max}` bounds; each side is independently nullable.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SizeBounds {
    #[serde(default)]
    pub min: Option<Number>,
    #[serde(default)]
    pub max: Option<Number>,
}

/// The closed set of value types an option may declare.
///
/// On the wire every variant except `Enumerated` is a bare tag (`"integer"`);
/// `Enumerated` is `{"accepted_value_list": [...]}`. Any other shape lands in
/// `Unrecognized` instead of failing the whole schema.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(from = "WireValueType", into = "WireValueType")]
pub enum ValueType {
    Enumerated(Vec<String>),
    String,
    Integer,
    Float,
    Bool,
    Any,
    Unrecognized(String),
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
enum WireValueType {
    Tag(String),
    Accepted { accepted_value_list: Vec<String> },
    Other(Value),
}

impl From<WireValueType> for ValueType {
    fn from(value: WireValueType) -> Self {
        match value {
            WireValueType::Tag(tag) => match tag.as_str() {
                "string" => Self::String,
                "integer" => Self::Integer,
                "float" => Self::Float,
                "bool" => Self::Bool,
                "any" => Self::Any,
                _ => Self::Unrecognized(tag),
            },
            WireValueType::Accepted {
                accepted_value_list,
            } => Self::Enumerated(accepted_value_list),
            WireValueType::Other(other) => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<ValueType> for WireValueType {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::Enumerated(values) => Self::Accepted {
                accepted_value_list: values,
            },
            ValueType::String => Self::Tag("string".to_string()),
            ValueType::Integer => Self::Tag("integer".to_string()),
            ValueType::Float => Self::Tag("float".to_string()),
            ValueType::Bool => Self::Tag("bool".to_string()),
            ValueType::Any => Self::Tag("any".to_string()),
            ValueType::Unrecognized(tag) => Self::Tag(tag),
        }
    }
}

impl ValueType {
    /// The tag as it appears on the wire, used in diagnostics and decode errors.
    pub fn tag(&self) -> &str {
        match self {
            Self::Enumerated(_) => "accepted_value_list",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Any => "any",
            Self::Unrecognized(tag) => tag,
        }
    }
}

// --- SERVICE RESPONSE MODELS ---

/// What every invocation-style call resolves to, success or failure.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub ok: bool,
    /// HTTP status code; `0` when no answer was received at all.
    pub status: u16,
    /// Canonical reason phrase for `status`, or the transport failure text.
    pub message: Option<String>,
    /// The service's numeric error code, when it sent one.
    pub code: Option<i64>,
    pub result: Value,
    pub statistics: Option<Value>,
}

impl ApiResponse {
    pub fn is_unauthorized(&self) -> bool {
        self.status == HTTP_UNAUTHORIZED
    }

    /// The response recorded when the request never produced an HTTP answer.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: 0,
            message: Some(message.into()),
            code: None,
            result: Value::Null,
            statistics: None,
        }
    }
}

/// Presentation settings published by the service. Both fields may be absent.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ServerConfiguration {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
}

/// Decodes `info.options` entry by entry, so one bad option never loses the
/// command it belongs to.
fn lenient_options<'de, D>(deserializer: D) -> Result<OptionSchema, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let definition = OptionDefinition::from_wire(&name, value);
            (name, definition)
        })
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> CommandTree {
        let root: CommandNode = serde_json::from_value(json!({
            "name": "commands",
            "is_directory": true,
            "commands": {
                "system-info": {
                    "name": "system-info",
                    "is_directory": false,
                    "http_path": "/api/run/system-info",
                    "info": { "description": "Show host facts", "version": "1.0.0" }
                },
                "deploy": {
                    "name": "deploy",
                    "is_directory": true,
                    "commands": {
                        "web_app": {
                            "name": "web_app",
                            "is_directory": false,
                            "http_path": "/api/run/deploy/web_app",
                            "info": {
                                "description": "Deploy the web app",
                                "options": {
                                    "env": {
                                        "value_type": { "accepted_value_list": ["dev", "prod"] },
                                        "required": true,
                                        "description": "Target"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
        .unwrap();
        root.into_tree()
    }

    #[test]
    fn test_tree_keeps_declaration_order() {
        let tree = sample_tree();
        let keys: Vec<_> = tree.keys().cloned().collect();
        assert_eq!(keys, vec!["system-info", "deploy"]);
    }

    #[test]
    fn test_find_leaf_walks_original_keys() {
        let tree = sample_tree();
        let leaf = find_leaf(&tree, "deploy/web_app").unwrap();
        assert_eq!(leaf.invocation_path, "/api/run/deploy/web_app");
        assert_eq!(
            leaf.info.options.get("env").unwrap().value_type,
            ValueType::Enumerated(vec!["dev".to_string(), "prod".to_string()])
        );
        assert!(find_leaf(&tree, "/system-info").is_some());
        assert!(find_leaf(&tree, "deploy").is_none());
        assert!(find_leaf(&tree, "system-info/extra").is_none());
        assert!(find_leaf(&tree, "missing").is_none());
    }

    #[test]
    fn test_leaf_without_http_path_is_rejected() {
        let result: Result<CommandNode, _> = serde_json::from_value(json!({
            "name": "broken",
            "is_directory": false
        }));
        assert!(result.unwrap_err().to_string().contains("http_path"));
    }

    #[test]
    fn test_lone_leaf_becomes_single_entry_tree() {
        let node: CommandNode = serde_json::from_value(json!({
            "name": "ping",
            "is_directory": false,
            "http_path": "/api/run/ping"
        }))
        .unwrap();
        let tree = node.into_tree();
        assert_eq!(tree.len(), 1);
        assert!(!tree.get("ping").unwrap().is_directory());
    }

    #[test]
    fn test_value_type_wire_tags() {
        let parse = |v: Value| serde_json::from_value::<ValueType>(v).unwrap();
        assert_eq!(parse(json!("string")), ValueType::String);
        assert_eq!(parse(json!("integer")), ValueType::Integer);
        assert_eq!(parse(json!("float")), ValueType::Float);
        assert_eq!(parse(json!("bool")), ValueType::Bool);
        assert_eq!(parse(json!("any")), ValueType::Any);
        assert_eq!(
            parse(json!("datetime")),
            ValueType::Unrecognized("datetime".to_string())
        );
        assert_eq!(
            parse(json!({"accepted_value_list": ["a", "b"]})),
            ValueType::Enumerated(vec!["a".to_string(), "b".to_string()])
        );
        assert!(matches!(parse(json!(42)), ValueType::Unrecognized(_)));
    }

    #[test]
    fn test_value_type_serializes_back_to_wire_shape() {
        let enumerated = ValueType::Enumerated(vec!["x".to_string()]);
        assert_eq!(
            serde_json::to_value(&enumerated).unwrap(),
            json!({"accepted_value_list": ["x"]})
        );
        assert_eq!(serde_json::to_value(ValueType::Float).unwrap(), json!("float"));
    }

    #[test]
    fn test_option_definition_tolerates_nulls() {
        let def: OptionDefinition = serde_json::from_value(json!({
            "value_type": "integer",
            "default_value": null,
            "size": { "min": 1, "max": null },
            "description": null
        }))
        .unwrap();
        assert!(!def.required);
        assert!(def.default_value.is_none());
        let size = def.size.unwrap();
        assert_eq!(size.min.unwrap().as_i64(), Some(1));
        assert!(size.max.is_none());
        assert!(def.description.is_empty());
    }

    #[test]
    fn test_malformed_options_do_not_lose_the_tree() {
        let root: CommandNode = serde_json::from_value(json!({
            "name": "commands",
            "is_directory": true,
            "commands": {
                "bad": {
                    "name": "bad",
                    "is_directory": false,
                    "http_path": "/api/run/bad",
                    "info": {
                        "options": {
                            "untyped": { "required": true, "description": "No type" },
                            "count": { "value_type": "integer", "size": { "min": "1" } },
                            "name": { "value_type": "string" }
                        }
                    }
                },
                "good": {
                    "name": "good",
                    "is_directory": false,
                    "http_path": "/api/run/good"
                }
            }
        }))
        .unwrap();
        let tree = root.into_tree();
        assert!(find_leaf(&tree, "good").is_some());

        let options = &find_leaf(&tree, "bad").unwrap().info.options;
        let keys: Vec<_> = options.keys().cloned().collect();
        assert_eq!(keys, vec!["untyped", "count", "name"]);

        let untyped = options.get("untyped").unwrap();
        assert_eq!(untyped.value_type, ValueType::Unrecognized(MISSING_TYPE_TAG.to_string()));
        assert!(untyped.required);
        assert_eq!(untyped.description, "No type");

        assert_eq!(
            options.get("count").unwrap().value_type,
            ValueType::Unrecognized(MALFORMED_TYPE_TAG.to_string())
        );
        assert_eq!(options.get("name").unwrap().value_type, ValueType::String);
    }

    #[test]
    fn test_null_options_are_empty() {
        let info: CommandInfo =
            serde_json::from_value(json!({ "description": "x", "options": null })).unwrap();
        assert!(info.options.is_empty());
    }
}
