use std::io::Cursor;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::constants::{NS_EXTENSION, NS_EXTENSION_POINT_IDENTIFIER};

/// The Info.plist contents of a target, as an ordered key/value tree.
///
/// Values are plain JSON values: strings, booleans, numbers, arrays and nested
/// dictionaries all map one-to-one onto property list types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestDocument(Map<String, Value>);

impl ManifestDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a JSON value. The value must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(ManifestDocument(map)),
            other => Err(Error::InvalidManifest(format!(
                "expected a dictionary at the root, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Parse an XML or binary property list.
    pub fn from_xml(content: &str) -> Result<Self> {
        Self::from_bytes(content.as_bytes())
    }

    /// Parse property list bytes, auto-detecting XML vs binary.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Value = plist::from_reader(Cursor::new(bytes))?;
        Self::from_value(value)
    }

    /// Serialize to an XML property list.
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        plist::to_writer_xml(&mut buf, &self.0)?;
        String::from_utf8(buf).map_err(|e| Error::InvalidManifest(format!("plist output is not valid UTF-8: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Walk nested dictionaries by key.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter().try_fold(self.0.get(*first)?, |value, key| value.get(*key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// `NSExtension.NSExtensionPointIdentifier`, when present and a non-empty string.
    pub fn extension_point_identifier(&self) -> Option<&str> {
        self.get_path(&[NS_EXTENSION, NS_EXTENSION_POINT_IDENTIFIER])
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ManifestDocument {
    fn from(map: Map<String, Value>) -> Self {
        ManifestDocument(map)
    }
}

impl TryFrom<Value> for ManifestDocument {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a dictionary",
    }
}
