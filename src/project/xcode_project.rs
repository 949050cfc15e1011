use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::manifest::ManifestDocument;
use crate::objects::{NativeTarget, PbxObject, ProjectModel};
use crate::types::constants::{INFOPLIST_FILE, PRODUCT_TYPE_APPLICATION};
use crate::types::Platform;

use super::build_settings::resolve_xcode_build_setting;

/// An Xcode project held as a flat map of objects.
///
/// Built from the JSON object form of a parsed `project.pbxproj` (`objects`,
/// `rootObject`, ...). References between objects stay as identifier strings.
///
/// Info.plist files are read from disk relative to the project root, the
/// directory containing the `.xcodeproj` bundle. Targets that have not been
/// written yet can be given an in-memory Info.plist with [`set_info_plist`].
///
/// [`set_info_plist`]: XcodeProject::set_info_plist
#[derive(Debug, Clone)]
pub struct XcodeProject {
    pub archive_version: i64,
    pub object_version: i64,
    pub root_object_uuid: String,
    objects: IndexMap<String, PbxObject>,
    project_root: Option<PathBuf>,
    info_plists: HashMap<String, ManifestDocument>,
}

impl XcodeProject {
    /// Load the JSON form of a project from disk.
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| Error::InvalidProject("root must be an object".to_string()))?;

        let archive_version = root.get("archiveVersion").and_then(as_integer).unwrap_or(1);
        let object_version = root.get("objectVersion").and_then(as_integer).unwrap_or(46);

        let root_object_uuid = root
            .get("rootObject")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidProject("rootObject is required".to_string()))?
            .to_string();

        let objects_map = root
            .get("objects")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::InvalidProject("objects is required".to_string()))?;

        let objects: IndexMap<String, PbxObject> = objects_map
            .iter()
            .filter_map(|(uuid, props)| {
                props
                    .as_object()
                    .map(|props| (uuid.clone(), PbxObject::from_json(uuid.clone(), props)))
            })
            .collect();

        match objects.get(&root_object_uuid) {
            Some(root_obj) if root_obj.isa == "PBXProject" => {}
            Some(root_obj) => {
                return Err(Error::InvalidProject(format!(
                    "root object \"{}\" is not a PBXProject (isa: {})",
                    root_object_uuid, root_obj.isa
                )))
            }
            None => {
                return Err(Error::InvalidProject(format!(
                    "root object \"{}\" not found in objects",
                    root_object_uuid
                )))
            }
        }

        Ok(XcodeProject {
            archive_version,
            object_version,
            root_object_uuid,
            objects,
            project_root: None,
            info_plists: HashMap::new(),
        })
    }

    /// Set the directory Info.plist paths are resolved against.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Use `manifest` as the Info.plist of a target instead of reading it from disk.
    pub fn set_info_plist(&mut self, target_uuid: &str, manifest: ManifestDocument) {
        self.info_plists.insert(target_uuid.to_string(), manifest);
    }

    // ── Object access ──────────────────────────────────────────────────

    pub fn get_object(&self, uuid: &str) -> Option<&PbxObject> {
        self.objects.get(uuid)
    }

    pub fn root_object(&self) -> Option<&PbxObject> {
        self.objects.get(&self.root_object_uuid)
    }

    pub fn objects_by_isa(&self, isa: &str) -> Vec<&PbxObject> {
        self.objects.values().filter(|obj| obj.isa == isa).collect()
    }

    /// Target UUIDs listed by the root project, in order.
    pub fn target_uuids(&self) -> Vec<&str> {
        self.root_object()
            .map(|root| root.get_str_list("targets"))
            .unwrap_or_default()
    }

    /// Target objects listed by the root project. Dangling references are skipped.
    pub fn target_objects(&self) -> Vec<&PbxObject> {
        self.target_uuids()
            .into_iter()
            .filter_map(|uuid| self.get_object(uuid))
            .filter(|obj| obj.is_target())
            .collect()
    }

    pub fn target(&self, uuid: &str) -> Option<TargetRef<'_>> {
        self.get_object(uuid)
            .filter(|obj| obj.is_target())
            .map(|object| TargetRef { project: self, object })
    }

    // ── Build configurations ───────────────────────────────────────────

    /// The configuration named by `defaultConfigurationName`, or the first one.
    pub fn get_default_configuration(&self, config_list_uuid: &str) -> Option<&PbxObject> {
        let config_list = self.get_object(config_list_uuid)?;
        let configs = config_list.get_str_list("buildConfigurations");

        if let Some(default_name) = config_list.get_str("defaultConfigurationName") {
            let named = configs
                .iter()
                .filter_map(|uuid| self.get_object(uuid))
                .find(|config| config.get_str("name") == Some(default_name));
            if named.is_some() {
                return named;
            }
        }

        configs.first().and_then(|uuid| self.get_object(uuid))
    }

    /// Build settings of a target's default configuration.
    pub fn default_build_settings(&self, target_uuid: &str) -> Option<&Map<String, Value>> {
        let target = self.get_object(target_uuid)?;
        let config_list_uuid = target.get_str("buildConfigurationList")?;
        let config = self.get_default_configuration(config_list_uuid)?;
        config.get_object("buildSettings")
    }

    /// A raw build setting value from a target's default configuration.
    pub fn get_build_setting(&self, target_uuid: &str, key: &str) -> Option<&Value> {
        self.default_build_settings(target_uuid)?.get(key)
    }

    /// A build setting from a target's default configuration with `$(VAR)`
    /// references expanded against the same configuration.
    ///
    /// `TARGET_NAME`, `SRCROOT` and `PROJECT_DIR` are filled in when the
    /// configuration does not define them.
    pub fn resolved_build_setting(&self, target_uuid: &str, key: &str) -> Option<String> {
        let settings = self.default_build_settings(target_uuid)?;
        let raw = setting_to_string(settings.get(key)?)?;

        let target_name = self.get_object(target_uuid).and_then(PbxObject::display_name);
        let project_root = self.project_root.as_ref().map(|p| p.to_string_lossy().into_owned());
        let lookup = |name: &str| -> Option<String> {
            if let Some(value) = settings.get(name).and_then(setting_to_string) {
                return Some(value);
            }
            match name {
                "TARGET_NAME" => target_name.map(str::to_string),
                "SRCROOT" | "PROJECT_DIR" => project_root.clone(),
                _ => None,
            }
        };

        Some(resolve_xcode_build_setting(&raw, &lookup))
    }

    // ── Targets ────────────────────────────────────────────────────────

    /// Find the main app target: the first application target whose
    /// configurations carry the platform's deployment target.
    ///
    /// Application targets built for other platforms never qualify, so a
    /// project holding only a watch app has no main iOS target.
    pub fn find_main_app_target(&self, platform: Platform) -> Option<&PbxObject> {
        let deployment_key = platform.deployment_target_key();

        self.target_objects().into_iter().find(|target| {
            target.isa == "PBXNativeTarget"
                && target.get_str("productType") == Some(PRODUCT_TYPE_APPLICATION)
                && self
                    .configurations_of(target)
                    .iter()
                    .filter_map(|config| config.get_object("buildSettings"))
                    .any(|settings| settings.contains_key(deployment_key))
        })
    }

    fn configurations_of(&self, target: &PbxObject) -> Vec<&PbxObject> {
        target
            .get_str("buildConfigurationList")
            .and_then(|uuid| self.get_object(uuid))
            .map(|list| {
                list.get_str_list("buildConfigurations")
                    .into_iter()
                    .filter_map(|uuid| self.get_object(uuid))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Read the Info.plist of a target's default configuration.
    pub fn read_info_plist(&self, target_uuid: &str) -> Result<ManifestDocument> {
        if let Some(manifest) = self.info_plists.get(target_uuid) {
            return Ok(manifest.clone());
        }

        let relative = self.resolved_build_setting(target_uuid, INFOPLIST_FILE).ok_or_else(|| {
            Error::InvalidManifest(format!("target {} does not set {}", target_uuid, INFOPLIST_FILE))
        })?;

        let path = match &self.project_root {
            Some(root) => root.join(&relative),
            None => PathBuf::from(&relative),
        };
        let bytes = std::fs::read(&path).map_err(|source| Error::Io { path, source })?;
        ManifestDocument::from_bytes(&bytes)
    }
}

impl ProjectModel for XcodeProject {
    type Target<'a> = TargetRef<'a>;

    fn targets(&self) -> Vec<TargetRef<'_>> {
        self.target_objects()
            .into_iter()
            .map(|object| TargetRef { project: self, object })
            .collect()
    }

    fn main_app_target(&self, platform: Platform) -> Option<TargetRef<'_>> {
        self.find_main_app_target(platform)
            .map(|object| TargetRef { project: self, object })
    }
}

/// A target object together with the project it lives in.
#[derive(Debug, Clone, Copy)]
pub struct TargetRef<'a> {
    project: &'a XcodeProject,
    object: &'a PbxObject,
}

impl<'a> TargetRef<'a> {
    pub fn object(&self) -> &'a PbxObject {
        self.object
    }

    pub fn project(&self) -> &'a XcodeProject {
        self.project
    }
}

impl NativeTarget for TargetRef<'_> {
    fn uuid(&self) -> &str {
        &self.object.uuid
    }

    fn display_name(&self) -> String {
        self.object
            .display_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.object.uuid.clone())
    }

    fn product_type(&self) -> Option<&str> {
        self.object.get_str("productType")
    }

    fn has_build_setting(&self, key: &str) -> bool {
        self.project
            .default_build_settings(&self.object.uuid)
            .is_some_and(|settings| settings.contains_key(key))
    }

    fn build_setting(&self, key: &str) -> Option<String> {
        self.project.resolved_build_setting(&self.object.uuid, key)
    }

    fn info_plist(&self) -> Result<ManifestDocument> {
        self.project.read_info_plist(&self.object.uuid)
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Build settings are strings or lists of strings; lists join with spaces.
fn setting_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}
