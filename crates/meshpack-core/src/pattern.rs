//! Pattern definition and loading
//!
//! A pattern (also called a design) describes an application topology in a
//! tool-neutral way. Two layouts are understood:
//!
//! - `components`: the current list form, one entry per resource
//! - `services`: the legacy map form, keyed by service name
//!
//! Only `name` and `version` are interpreted here; component configuration is
//! kept as raw YAML for the manifest renderer.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

use crate::error::PatternError;

/// A parsed pattern document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    /// Pattern identifier
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,

    /// Application name (required for conversion)
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,

    /// Pattern version (required for conversion)
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,

    /// Schema version of the document format
    #[serde(default)]
    pub schema_version: Option<String>,

    /// Components, in declaration order
    #[serde(default)]
    pub components: Vec<Component>,

    /// Legacy services, in declaration order
    #[serde(default)]
    pub services: IndexMap<String, Service>,
}

impl Pattern {
    /// Parse a pattern from YAML text
    pub fn from_yaml(input: &str) -> Result<Self, PatternError> {
        if input.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let value: Value = serde_yaml::from_str(input)?;
        if !value.is_mapping() {
            return Err(PatternError::NotAMapping {
                found: value_kind(&value).to_string(),
            });
        }

        Ok(serde_yaml::from_value(value)?)
    }

    /// Number of resources this pattern declares
    pub fn resource_count(&self) -> usize {
        self.components.len() + self.services.len()
    }
}

/// A design component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub id: String,

    /// Name shown in the designer, used as the resource name by default
    #[serde(default)]
    pub display_name: String,

    /// Kubernetes kind and apiVersion
    #[serde(default)]
    pub component: ComponentType,

    /// Model the component belongs to (e.g. `kubernetes`)
    #[serde(default)]
    pub model: ComponentModel,

    #[serde(default, deserialize_with = "nullable_mapping")]
    pub metadata: Mapping,

    /// Resource body (`metadata`, `spec`, `data`, ...)
    #[serde(default, deserialize_with = "nullable_mapping")]
    pub configuration: Mapping,
}

impl Component {
    /// Annotation components are drawn in the designer but never deployed
    pub fn is_annotation(&self) -> bool {
        matches!(self.metadata.get("isAnnotation"), Some(Value::Bool(true)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentType {
    #[serde(default)]
    pub kind: String,

    /// Kubernetes apiVersion
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentModel {
    #[serde(default)]
    pub name: String,
}

/// A legacy pattern service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Resource name; the map key is used when empty
    #[serde(default)]
    pub name: String,

    /// Kubernetes kind
    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub namespace: String,

    /// Resource body merged at the top level
    #[serde(default, deserialize_with = "nullable_mapping")]
    pub settings: Mapping,
}

/// Parses raw pattern input into a [`Pattern`]
pub trait PatternLoader: Send + Sync {
    fn load(&self, input: &str) -> Result<Pattern, PatternError>;
}

/// Loader for YAML (and therefore JSON) pattern documents
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlPatternLoader;

impl PatternLoader for YamlPatternLoader {
    fn load(&self, input: &str) -> Result<Pattern, PatternError> {
        Pattern::from_yaml(input)
    }
}

/// Accept any YAML scalar and keep its textual form (`version: 2` → `"2"`)
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let mut value = Value::deserialize(deserializer)?;
    while let Value::Tagged(tagged) = value {
        value = tagged.value;
    }

    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {}",
            value_kind(&other)
        ))),
    }
}

fn nullable_mapping<'de, D>(deserializer: D) -> Result<Mapping, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Mapping>::deserialize(deserializer)?.unwrap_or_default())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
