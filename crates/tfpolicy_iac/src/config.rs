//! Resource configuration model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{IacError, IacResult};
use crate::normalize::{self, NormalizedValue};

/// Attribute holding a resource's declared name.
pub const NAME_ATTRIBUTE: &str = "name";

/// Attribute holding a resource's tag block.
pub const TAGS_ATTRIBUTE: &str = "tags";

/// The declared attributes of one resource block, as surfaced by the host parser.
///
/// Values keep the source shape: an attribute may be a bare value or a
/// single-element list wrapping it. Use the accessors in [`normalize`] (or
/// [`ResourceConfiguration::name`] / [`ResourceConfiguration::tags`]) to read
/// them in canonical form. There are no mutating methods; a configuration is
/// built once and then only read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceConfiguration {
    attributes: Map<String, Value>,
}

impl ResourceConfiguration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed value. The value must be a mapping.
    pub fn from_value(value: Value) -> IacResult<Self> {
        match value {
            Value::Object(attributes) => Ok(Self { attributes }),
            other => Err(IacError::InvalidConfiguration(format!(
                "expected an attribute mapping, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> IacResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> IacResult<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Add an attribute while building the configuration.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get a raw attribute value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get an attribute with list wrapping removed.
    pub fn normalized(&self, key: &str) -> Option<NormalizedValue<'_>> {
        normalize::canonical(self.get(key))
    }

    /// The `name` attribute in canonical form.
    pub fn name(&self) -> Option<NormalizedValue<'_>> {
        self.normalized(NAME_ATTRIBUTE)
    }

    /// The `tags` attribute, only when it normalizes to a mapping.
    pub fn tags(&self) -> Option<&Map<String, Value>> {
        self.normalized(TAGS_ATTRIBUTE)?.as_mapping()
    }

    /// Look up a single tag. Null tag values read as absent.
    pub fn tag(&self, key: &str) -> Option<&Value> {
        self.tags()?.get(key).filter(|v| !v.is_null())
    }
}

impl TryFrom<Value> for ResourceConfiguration {
    type Error = IacError;

    fn try_from(value: Value) -> IacResult<Self> {
        Self::from_value(value)
    }
}

impl From<Map<String, Value>> for ResourceConfiguration {
    fn from(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
