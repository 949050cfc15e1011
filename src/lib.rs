#[cfg(feature = "napi")]
#[macro_use]
extern crate napi_derive;

pub mod error;
pub mod logging;
pub mod manifest;
pub mod objects;
pub mod project;
pub mod resolver;
pub mod types;

pub use error::{Error, Result};
pub use manifest::ManifestDocument;
pub use objects::{NativeTarget, ProjectModel};
pub use project::{TargetRef, XcodeProject};
pub use resolver::{
    classify_target, extension_point_identifier, framework_file_path, get_auxiliary_targets,
    get_auxiliary_targets_for_platform, get_main_application_target, get_main_application_target_for_platform,
    get_target_by_bundle_identifier, is_target_of_kind, kind_for_extension_point, requires_embedded_toolchain,
    resolve_frameworks, resolve_manifest, resolve_product_type, uses_app_groups_by_default,
};
pub use types::{ExtensionKind, Platform};

// ── Node bindings ──────────────────────────────────────────────────

#[cfg(feature = "napi")]
mod napi_bindings {
    use napi::bindgen_prelude::*;

    use crate::types::ExtensionKind;

    fn ensure_logging() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            // Another subscriber may already be installed by the host.
            let _ = crate::logging::init();
        });
    }

    /// Install the stderr log subscriber. Safe to call more than once.
    #[napi(js_name = "initLogging")]
    pub fn init_logging() {
        ensure_logging();
    }

    fn kind(tag: &str) -> Result<ExtensionKind> {
        tag.parse().map_err(|e: crate::Error| Error::from_reason(e.to_string()))
    }

    /// Info.plist for a new target of the given kind, as an XML property list.
    #[napi(js_name = "getTargetInfoPlistForType")]
    pub fn get_target_info_plist_for_type(kind_tag: String) -> Result<String> {
        crate::resolver::resolve_manifest(kind(&kind_tag)?)
            .to_xml()
            .map_err(|e| Error::from_reason(e.to_string()))
    }

    /// Info.plist for a new target of the given kind, as a JSON object.
    #[napi(js_name = "getTargetInfoPlistObjectForType")]
    pub fn get_target_info_plist_object_for_type(kind_tag: String) -> Result<serde_json::Value> {
        Ok(crate::resolver::resolve_manifest(kind(&kind_tag)?).into_value())
    }

    #[napi(js_name = "productTypeForType")]
    pub fn product_type_for_type(kind_tag: String) -> Result<String> {
        Ok(crate::resolver::resolve_product_type(kind(&kind_tag)?).to_string())
    }

    #[napi(js_name = "getFrameworksForType")]
    pub fn get_frameworks_for_type(kind_tag: String) -> Result<Vec<String>> {
        Ok(crate::resolver::resolve_frameworks(kind(&kind_tag)?)
            .iter()
            .map(|name| name.to_string())
            .collect())
    }

    #[napi(js_name = "needsEmbeddedSwift")]
    pub fn needs_embedded_swift(kind_tag: String) -> Result<bool> {
        Ok(crate::resolver::requires_embedded_toolchain(kind(&kind_tag)?))
    }

    #[napi(js_name = "shouldUseAppGroupsByDefault")]
    pub fn should_use_app_groups_by_default(kind_tag: String) -> Result<bool> {
        Ok(crate::resolver::uses_app_groups_by_default(kind(&kind_tag)?))
    }

    /// The kind tag owning an extension point identifier, if known.
    #[napi(js_name = "getExtensionTypeForIdentifier")]
    pub fn get_extension_type_for_identifier(identifier: String) -> Option<String> {
        crate::resolver::kind_for_extension_point(&identifier).map(|k| k.to_string())
    }

    /// Classify every target of a project given in JSON form.
    /// Returns `{ uuid, name, type }` for each target; `type` is null when unrecognized.
    #[napi(js_name = "classifyTargets")]
    pub fn classify_targets(project: serde_json::Value, project_root: Option<String>) -> Result<Vec<serde_json::Value>> {
        use crate::objects::{NativeTarget, ProjectModel};

        ensure_logging();

        let mut xcode_project =
            crate::project::XcodeProject::from_json(&project).map_err(|e| Error::from_reason(e.to_string()))?;
        if let Some(root) = project_root {
            xcode_project = xcode_project.with_project_root(root);
        }

        Ok(xcode_project
            .targets()
            .iter()
            .map(|target| {
                serde_json::json!({
                    "uuid": target.uuid(),
                    "name": target.display_name(),
                    "type": crate::resolver::classify_target(target).map(|k| k.to_string()),
                })
            })
            .collect())
    }
}
