use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::manifest::ManifestDocument;
use crate::types::Platform;

/// Read-only view of a target in a native project.
///
/// Build settings are read from the target's default build configuration.
pub trait NativeTarget {
    /// The object identifier of this target within its project.
    fn uuid(&self) -> &str;

    /// A human-readable name for diagnostics.
    fn display_name(&self) -> String;

    /// The `productType` UTI, if the target declares one.
    fn product_type(&self) -> Option<&str>;

    /// Returns true if the default configuration defines `key`, whatever its value.
    fn has_build_setting(&self, key: &str) -> bool;

    /// The value of a build setting with variable references expanded.
    fn build_setting(&self, key: &str) -> Option<String>;

    /// The parsed Info.plist of the default configuration.
    fn info_plist(&self) -> Result<ManifestDocument>;
}

impl<T: NativeTarget + ?Sized> NativeTarget for &T {
    fn uuid(&self) -> &str {
        (**self).uuid()
    }

    fn display_name(&self) -> String {
        (**self).display_name()
    }

    fn product_type(&self) -> Option<&str> {
        (**self).product_type()
    }

    fn has_build_setting(&self, key: &str) -> bool {
        (**self).has_build_setting(key)
    }

    fn build_setting(&self, key: &str) -> Option<String> {
        (**self).build_setting(key)
    }

    fn info_plist(&self) -> Result<ManifestDocument> {
        (**self).info_plist()
    }
}

/// Read-only view of a native project: its targets and its main application.
pub trait ProjectModel {
    type Target<'a>: NativeTarget
    where
        Self: 'a;

    /// All targets, in the order the project lists them.
    fn targets(&self) -> Vec<Self::Target<'_>>;

    /// The primary installable application for `platform`, if any.
    fn main_app_target(&self, platform: Platform) -> Option<Self::Target<'_>>;
}

/// A raw project object: its identifier, `isa` and properties.
///
/// References to other objects stay as identifier strings; lookups go through
/// the owning project's object map.
#[derive(Debug, Clone, PartialEq)]
pub struct PbxObject {
    pub uuid: String,
    pub isa: String,
    pub props: IndexMap<String, Value>,
}

impl PbxObject {
    pub fn from_json(uuid: String, props: &Map<String, Value>) -> Self {
        let isa = props
            .get("isa")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        PbxObject {
            uuid,
            isa,
            props: props.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.props.get(key).and_then(Value::as_array)
    }

    pub fn get_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.props.get(key).and_then(Value::as_object)
    }

    /// String entries of an array property; non-string entries are skipped.
    pub fn get_str_list(&self, key: &str) -> Vec<&str> {
        self.get_array(key)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get_str("name")
            .or_else(|| self.get_str("productName"))
            .or_else(|| self.get_str("path"))
    }

    pub fn is_target(&self) -> bool {
        matches!(
            self.isa.as_str(),
            "PBXNativeTarget" | "PBXAggregateTarget" | "PBXLegacyTarget"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pbx_object_basics() {
        let props = json!({
            "isa": "PBXNativeTarget",
            "name": "ShareExtension",
            "productType": "com.apple.product-type.app-extension",
            "buildPhases": ["13B07F871A680F5B00A75B9A", 7],
        });

        let obj = PbxObject::from_json("AABB00112233445566778899".to_string(), props.as_object().unwrap());
        assert_eq!(obj.isa, "PBXNativeTarget");
        assert!(obj.is_target());
        assert_eq!(obj.display_name(), Some("ShareExtension"));
        assert_eq!(obj.get_str_list("buildPhases"), vec!["13B07F871A680F5B00A75B9A"]);
        assert!(obj.get_object("buildPhases").is_none());
    }

    #[test]
    fn test_missing_isa() {
        let obj = PbxObject::from_json("X".to_string(), &Map::new());
        assert_eq!(obj.isa, "Unknown");
        assert!(!obj.is_target());
        assert_eq!(obj.display_name(), None);
    }
}
