//! Extension kind → target metadata, and recognition of existing targets.
//!
//! Everything keyed on [`ExtensionKind`] is an exhaustive `match`, so adding a
//! kind fails to compile until every table below handles it.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::manifest::ManifestDocument;
use crate::objects::{NativeTarget, ProjectModel};
use crate::types::constants::{
    EMBEDDED_SWIFT_KINDS, EXTENSION_KINDS_BY_IDENTIFIER, KNOWN_EXTENSION_POINT_IDENTIFIERS, NS_EXTENSION,
    NS_EXTENSION_POINT_IDENTIFIER, PRODUCT_BUNDLE_IDENTIFIER, PRODUCT_TYPE_APPLICATION, PRODUCT_TYPE_APP_CLIP,
    PRODUCT_TYPE_APP_EXTENSION, PRODUCT_TYPE_EXTENSIONKIT_EXTENSION, SYSTEM_FRAMEWORKS_DIR, WATCHOS_DEPLOYMENT_TARGET,
};
use crate::types::{ExtensionKind, Platform};

// ── Identifier lookups ─────────────────────────────────────────────────

/// The extension point a kind plugs into. `None` for clip, clip-widget and watch.
pub fn extension_point_identifier(kind: ExtensionKind) -> Option<&'static str> {
    KNOWN_EXTENSION_POINT_IDENTIFIERS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(id, _)| *id)
}

/// The kind owning an extension point identifier.
pub fn kind_for_extension_point(identifier: &str) -> Option<ExtensionKind> {
    EXTENSION_KINDS_BY_IDENTIFIER.get(identifier).copied()
}

// ── Info.plist templates ───────────────────────────────────────────────

/// The Info.plist contents for a freshly generated target of `kind`.
///
/// Principal class names use `$(PRODUCT_MODULE_NAME)` so they resolve against
/// whatever module the target is compiled into.
pub fn resolve_manifest(kind: ExtensionKind) -> ManifestDocument {
    match kind {
        ExtensionKind::Watch => ManifestDocument::new(),
        ExtensionKind::Action => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": {
                    "NSExtensionActivationRule": {
                        "NSExtensionActivationSupportsFileWithMaxCount": 0,
                        "NSExtensionActivationSupportsImageWithMaxCount": 0,
                        "NSExtensionActivationSupportsMovieWithMaxCount": 0,
                        "NSExtensionActivationSupportsText": false,
                        "NSExtensionActivationSupportsWebURLWithMaxCount": 1,
                    },
                    "NSExtensionJavaScriptPreprocessingFile": "assets/index",
                    "NSExtensionServiceAllowsFinderPreviewItem": true,
                    "NSExtensionServiceAllowsTouchBarItem": true,
                    "NSExtensionServiceFinderPreviewIconName": "NSActionTemplate",
                    "NSExtensionServiceTouchBarBezelColorName": "TouchBarBezel",
                    "NSExtensionServiceTouchBarIconName": "NSActionTemplate",
                },
            }), json!({
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).ActionRequestHandler",
            })),
        })),
        ExtensionKind::AppIntent => {
            let mut attributes = Map::new();
            if let Some(identifier) = extension_point_identifier(kind) {
                attributes.insert("EXExtensionPointIdentifier".to_string(), Value::from(identifier));
            }
            document(json!({ "EXAppExtensionAttributes": attributes }))
        }
        ExtensionKind::Clip => document(json!({
            "CFBundleName": "$(PRODUCT_NAME)",
            "CFBundleIdentifier": "$(PRODUCT_BUNDLE_IDENTIFIER)",
            "CFBundleVersion": "$(CURRENT_PROJECT_VERSION)",
            "CFBundleExecutable": "$(EXECUTABLE_NAME)",
            "CFBundlePackageType": "$(PRODUCT_BUNDLE_PACKAGE_TYPE)",
            "CFBundleShortVersionString": "$(MARKETING_VERSION)",
            "UIApplicationSupportsIndirectInputEvents": true,
            "NSAppClip": {
                "NSAppClipRequestEphemeralUserNotification": false,
                "NSAppClipRequestLocationConfirmation": false,
            },
            "NSAppTransportSecurity": {
                "NSAllowsArbitraryLoads": false,
                "NSAllowsLocalNetworking": true,
            },
            "UILaunchStoryboardName": "SplashScreen",
            "UIUserInterfaceStyle": "Automatic",
            "UIViewControllerBasedStatusBarAppearance": false,
        })),
        // Sticker packs ship no Swift code, so the principal class is fixed.
        ExtensionKind::Imessage => principal_class_after_identifier(kind, "StickerBrowserViewController"),
        ExtensionKind::AccountAuth => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({}), json!({
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).AccountAuthViewController",
                "NSExtensionAttributes": {
                    "ASAccountAuthenticationModificationSupportsStrongPasswordChange": true,
                    "ASAccountAuthenticationModificationSupportsUpgradeToSignInWithApple": true,
                },
            })),
        })),
        ExtensionKind::CredentialsProvider => {
            principal_class_after_identifier(kind, "$(PRODUCT_MODULE_NAME).CredentialProviderViewController")
        }
        ExtensionKind::NotificationService => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": { "NSExtensionActivationRule": "TRUEPREDICATE" },
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).NotificationService",
            }), json!({})),
        })),
        ExtensionKind::QuicklookThumbnail => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": {
                    "QLSupportedContentTypes": [],
                    "QLThumbnailMinimumDimension": 0,
                },
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).ThumbnailProvider",
            }), json!({})),
        })),
        ExtensionKind::Spotlight => document(json!({
            "CSExtensionLabel": "myImporter",
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": { "CSSupportedContentTypes": ["com.example.plain-text"] },
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).ImportExtension",
            }), json!({})),
        })),
        ExtensionKind::Share => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": { "NSExtensionActivationRule": "TRUEPREDICATE" },
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).ShareViewController",
            }), json!({})),
        })),
        ExtensionKind::IntentUi => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": { "IntentsSupported": ["INSendMessageIntent"] },
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).IntentViewController",
            }), json!({})),
        })),
        ExtensionKind::Intent => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": {
                    "IntentsRestrictedWhileLocked": [],
                    "IntentsSupported": [
                        "INSendMessageIntent",
                        "INSearchForMessagesIntent",
                        "INSetMessageAttributeIntent",
                    ],
                },
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).IntentHandler",
            }), json!({})),
        })),
        ExtensionKind::Matter => principal_class_only(kind, "$(PRODUCT_MODULE_NAME).RequestHandler"),
        ExtensionKind::LocationPush => principal_class_only(kind, "$(PRODUCT_MODULE_NAME).LocationPushService"),
        ExtensionKind::Safari => principal_class_only(kind, "$(PRODUCT_MODULE_NAME).SafariWebExtensionHandler"),
        ExtensionKind::NotificationContent => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({
                "NSExtensionAttributes": {
                    "UNNotificationExtensionCategory": "myNotificationCategory",
                    "UNNotificationExtensionInitialContentSizeRatio": 1,
                },
                "NSExtensionPrincipalClass": "$(PRODUCT_MODULE_NAME).NotificationViewController",
            }), json!({})),
        })),
        ExtensionKind::Widget
        | ExtensionKind::ClipWidget
        | ExtensionKind::BgDownload
        | ExtensionKind::DeviceActivityMonitor => document(json!({
            NS_EXTENSION: ns_extension(kind, json!({}), json!({})),
        })),
    }
}

/// `NSExtension` dictionary: `before`, then the kind's extension point if it has
/// one, then `after`. Key order is kept in the written Info.plist.
fn ns_extension(kind: ExtensionKind, before: Value, after: Value) -> Value {
    let mut ext = into_map(before);
    if let Some(identifier) = extension_point_identifier(kind) {
        ext.insert(NS_EXTENSION_POINT_IDENTIFIER.to_string(), Value::from(identifier));
    }
    ext.extend(into_map(after));
    Value::Object(ext)
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn principal_class_only(kind: ExtensionKind, principal_class: &str) -> ManifestDocument {
    document(json!({
        NS_EXTENSION: ns_extension(kind, json!({ "NSExtensionPrincipalClass": principal_class }), json!({})),
    }))
}

fn principal_class_after_identifier(kind: ExtensionKind, principal_class: &str) -> ManifestDocument {
    document(json!({
        NS_EXTENSION: ns_extension(kind, json!({}), json!({ "NSExtensionPrincipalClass": principal_class })),
    }))
}

fn document(value: Value) -> ManifestDocument {
    match value {
        Value::Object(map) => ManifestDocument::from(map),
        _ => unreachable!("manifest templates are dictionaries"),
    }
}

// ── Product types, frameworks, toolchain ───────────────────────────────

pub fn resolve_product_type(kind: ExtensionKind) -> &'static str {
    match kind {
        ExtensionKind::Clip => PRODUCT_TYPE_APP_CLIP,
        ExtensionKind::Watch => PRODUCT_TYPE_APPLICATION,
        ExtensionKind::AppIntent => PRODUCT_TYPE_EXTENSIONKIT_EXTENSION,
        ExtensionKind::Widget
        | ExtensionKind::NotificationContent
        | ExtensionKind::NotificationService
        | ExtensionKind::Share
        | ExtensionKind::Intent
        | ExtensionKind::BgDownload
        | ExtensionKind::IntentUi
        | ExtensionKind::Spotlight
        | ExtensionKind::Matter
        | ExtensionKind::QuicklookThumbnail
        | ExtensionKind::Imessage
        | ExtensionKind::ClipWidget
        | ExtensionKind::LocationPush
        | ExtensionKind::CredentialsProvider
        | ExtensionKind::AccountAuth
        | ExtensionKind::Action
        | ExtensionKind::Safari
        | ExtensionKind::DeviceActivityMonitor => PRODUCT_TYPE_APP_EXTENSION,
    }
}

/// System frameworks a target of `kind` links against, in link order.
pub fn resolve_frameworks(kind: ExtensionKind) -> &'static [&'static str] {
    match kind {
        ExtensionKind::Widget | ExtensionKind::ClipWidget => &["WidgetKit", "SwiftUI", "ActivityKit", "AppIntents"],
        ExtensionKind::Intent => &["Intents"],
        ExtensionKind::IntentUi => &["IntentsUI"],
        ExtensionKind::QuicklookThumbnail => &["QuickLookThumbnailing"],
        ExtensionKind::NotificationContent => &["UserNotifications", "UserNotificationsUI"],
        ExtensionKind::AppIntent => &["AppIntents"],
        ExtensionKind::DeviceActivityMonitor => &["DeviceActivity"],
        ExtensionKind::NotificationService
        | ExtensionKind::Share
        | ExtensionKind::BgDownload
        | ExtensionKind::Spotlight
        | ExtensionKind::Matter
        | ExtensionKind::Imessage
        | ExtensionKind::Clip
        | ExtensionKind::Watch
        | ExtensionKind::LocationPush
        | ExtensionKind::CredentialsProvider
        | ExtensionKind::AccountAuth
        | ExtensionKind::Action
        | ExtensionKind::Safari => &[],
    }
}

/// SDK-relative path of a system framework, e.g. `System/Library/Frameworks/WidgetKit.framework`.
pub fn framework_file_path(framework_name: &str) -> String {
    if framework_name.ends_with(".framework") {
        format!("{}/{}", SYSTEM_FRAMEWORKS_DIR, framework_name)
    } else {
        format!("{}/{}.framework", SYSTEM_FRAMEWORKS_DIR, framework_name)
    }
}

/// Whether the target bundle must embed the Swift standard libraries.
pub fn requires_embedded_toolchain(kind: ExtensionKind) -> bool {
    EMBEDDED_SWIFT_KINDS.contains(&kind)
}

/// Whether a target of `kind` inherits the main app's app groups when it
/// configures none of its own.
pub fn uses_app_groups_by_default(kind: ExtensionKind) -> bool {
    match kind {
        ExtensionKind::Share
        | ExtensionKind::BgDownload
        | ExtensionKind::Clip
        | ExtensionKind::ClipWidget
        | ExtensionKind::Widget => true,
        ExtensionKind::AccountAuth
        | ExtensionKind::CredentialsProvider
        | ExtensionKind::DeviceActivityMonitor
        | ExtensionKind::AppIntent
        | ExtensionKind::IntentUi
        | ExtensionKind::LocationPush
        | ExtensionKind::NotificationContent
        | ExtensionKind::NotificationService
        | ExtensionKind::QuicklookThumbnail
        | ExtensionKind::Action
        | ExtensionKind::Imessage
        | ExtensionKind::Intent
        | ExtensionKind::Matter
        | ExtensionKind::Safari
        | ExtensionKind::Spotlight
        | ExtensionKind::Watch => false,
    }
}

// ── Target classification ──────────────────────────────────────────────

/// Returns true if an existing target is an extension of `kind`.
///
/// Watch apps and App Clips are recognized by product type alone. Every other
/// kind must be an app extension whose Info.plist names the kind's extension
/// point. A missing or unreadable Info.plist is logged and treated as no match.
pub fn is_target_of_kind<T: NativeTarget + ?Sized>(target: &T, kind: ExtensionKind) -> bool {
    let product_type = target.product_type();

    match kind {
        ExtensionKind::Watch if product_type == Some(PRODUCT_TYPE_APPLICATION) => {
            return target.has_build_setting(WATCHOS_DEPLOYMENT_TARGET);
        }
        ExtensionKind::Clip if product_type == Some(PRODUCT_TYPE_APP_CLIP) => return true,
        _ => {}
    }

    if product_type != Some(PRODUCT_TYPE_APP_EXTENSION) {
        return false;
    }

    extension_kind_from_info_plist(target) == Some(kind)
}

/// The single kind an existing target belongs to, if any.
///
/// Agrees with [`is_target_of_kind`] for every kind, but reads the Info.plist
/// at most once.
pub fn classify_target<T: NativeTarget + ?Sized>(target: &T) -> Option<ExtensionKind> {
    match target.product_type()? {
        PRODUCT_TYPE_APPLICATION => target
            .has_build_setting(WATCHOS_DEPLOYMENT_TARGET)
            .then_some(ExtensionKind::Watch),
        PRODUCT_TYPE_APP_CLIP => Some(ExtensionKind::Clip),
        PRODUCT_TYPE_APP_EXTENSION => extension_kind_from_info_plist(target),
        _ => None,
    }
}

fn extension_kind_from_info_plist<T: NativeTarget + ?Sized>(target: &T) -> Option<ExtensionKind> {
    let manifest = match target.info_plist() {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(
                target_name = %target.display_name(),
                error = %err,
                "Could not read extension Info.plist"
            );
            return None;
        }
    };

    let Some(identifier) = manifest.extension_point_identifier() else {
        warn!(
            target_name = %target.display_name(),
            "No NSExtensionPointIdentifier found in extension Info.plist"
        );
        return None;
    };

    kind_for_extension_point(identifier)
}

// ── Target lookup ──────────────────────────────────────────────────────

/// The main iOS application target.
pub fn get_main_application_target<P: ProjectModel>(project: &P) -> Result<P::Target<'_>> {
    get_main_application_target_for_platform(project, Platform::Ios)
}

pub fn get_main_application_target_for_platform<P: ProjectModel>(
    project: &P,
    platform: Platform,
) -> Result<P::Target<'_>> {
    project
        .main_app_target(platform)
        .ok_or(Error::MissingMainTarget { platform })
}

/// Every target except the main iOS application, in project order.
pub fn get_auxiliary_targets<P: ProjectModel>(project: &P) -> Vec<P::Target<'_>> {
    get_auxiliary_targets_for_platform(project, Platform::Ios)
}

pub fn get_auxiliary_targets_for_platform<P: ProjectModel>(project: &P, platform: Platform) -> Vec<P::Target<'_>> {
    let main_uuid = project
        .main_app_target(platform)
        .map(|target| target.uuid().to_string());

    project
        .targets()
        .into_iter()
        .filter(|target| main_uuid.as_deref() != Some(target.uuid()))
        .collect()
}

/// First target whose resolved `PRODUCT_BUNDLE_IDENTIFIER` equals `bundle_id`.
pub fn get_target_by_bundle_identifier<'a, P: ProjectModel>(project: &'a P, bundle_id: &str) -> Option<P::Target<'a>> {
    let found = project
        .targets()
        .into_iter()
        .find(|target| target.build_setting(PRODUCT_BUNDLE_IDENTIFIER).as_deref() == Some(bundle_id));

    match &found {
        Some(target) => debug!(bundle_id, target_name = %target.display_name(), "Found target for bundle identifier"),
        None => debug!(bundle_id, "No target matches bundle identifier"),
    }
    found
}
