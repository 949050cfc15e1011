use std::collections::HashMap;
use std::sync::LazyLock;

use super::extension::ExtensionKind;

// Product types
pub const PRODUCT_TYPE_APPLICATION: &str = "com.apple.product-type.application";
pub const PRODUCT_TYPE_APP_CLIP: &str = "com.apple.product-type.application.on-demand-install-capable";
pub const PRODUCT_TYPE_APP_EXTENSION: &str = "com.apple.product-type.app-extension";
pub const PRODUCT_TYPE_EXTENSIONKIT_EXTENSION: &str = "com.apple.product-type.extensionkit-extension";

// Build settings read from a target's default configuration
pub const WATCHOS_DEPLOYMENT_TARGET: &str = "WATCHOS_DEPLOYMENT_TARGET";
pub const PRODUCT_BUNDLE_IDENTIFIER: &str = "PRODUCT_BUNDLE_IDENTIFIER";
pub const INFOPLIST_FILE: &str = "INFOPLIST_FILE";

// Info.plist keys
pub const NS_EXTENSION: &str = "NSExtension";
pub const NS_EXTENSION_POINT_IDENTIFIER: &str = "NSExtensionPointIdentifier";

/// SDK-relative directory holding system frameworks.
pub const SYSTEM_FRAMEWORKS_DIR: &str = "System/Library/Frameworks";

/// Extension point identifiers and the single kind each one belongs to.
///
/// An identifier must appear at most once. `clip`, `clip-widget` and `watch`
/// have no extension point.
pub const KNOWN_EXTENSION_POINT_IDENTIFIERS: &[(&str, ExtensionKind)] = &[
    ("com.apple.message-payload-provider", ExtensionKind::Imessage),
    ("com.apple.widgetkit-extension", ExtensionKind::Widget),
    (
        "com.apple.usernotifications.content-extension",
        ExtensionKind::NotificationContent,
    ),
    ("com.apple.share-services", ExtensionKind::Share),
    ("com.apple.usernotifications.service", ExtensionKind::NotificationService),
    ("com.apple.spotlight.import", ExtensionKind::Spotlight),
    ("com.apple.intents-service", ExtensionKind::Intent),
    ("com.apple.intents-ui-service", ExtensionKind::IntentUi),
    ("com.apple.Safari.web-extension", ExtensionKind::Safari),
    (
        "com.apple.background-asset-downloader-extension",
        ExtensionKind::BgDownload,
    ),
    (
        "com.apple.matter.support.extension.device-setup",
        ExtensionKind::Matter,
    ),
    ("com.apple.quicklook.thumbnail", ExtensionKind::QuicklookThumbnail),
    ("com.apple.location.push.service", ExtensionKind::LocationPush),
    (
        "com.apple.authentication-services-credential-provider-ui",
        ExtensionKind::CredentialsProvider,
    ),
    (
        "com.apple.authentication-services-account-authentication-modification-ui",
        ExtensionKind::AccountAuth,
    ),
    ("com.apple.services", ExtensionKind::Action),
    ("com.apple.appintents-extension", ExtensionKind::AppIntent),
    (
        "com.apple.deviceactivity.monitor-extension",
        ExtensionKind::DeviceActivityMonitor,
    ),
];

/// Reverse lookup: extension point identifier → kind.
pub static EXTENSION_KINDS_BY_IDENTIFIER: LazyLock<HashMap<&'static str, ExtensionKind>> =
    LazyLock::new(|| KNOWN_EXTENSION_POINT_IDENTIFIERS.iter().copied().collect());

/// Kinds whose bundle must embed the Swift runtime.
pub const EMBEDDED_SWIFT_KINDS: &[ExtensionKind] = &[
    ExtensionKind::Watch,
    ExtensionKind::Spotlight,
    ExtensionKind::Share,
    ExtensionKind::Intent,
    ExtensionKind::IntentUi,
    ExtensionKind::BgDownload,
    ExtensionKind::QuicklookThumbnail,
    ExtensionKind::Matter,
    ExtensionKind::Clip,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identifiers_are_injective() {
        let identifiers: HashSet<&str> = KNOWN_EXTENSION_POINT_IDENTIFIERS.iter().map(|(id, _)| *id).collect();
        let kinds: HashSet<ExtensionKind> = KNOWN_EXTENSION_POINT_IDENTIFIERS.iter().map(|(_, k)| *k).collect();
        assert_eq!(identifiers.len(), KNOWN_EXTENSION_POINT_IDENTIFIERS.len());
        assert_eq!(kinds.len(), KNOWN_EXTENSION_POINT_IDENTIFIERS.len());
        assert_eq!(EXTENSION_KINDS_BY_IDENTIFIER.len(), KNOWN_EXTENSION_POINT_IDENTIFIERS.len());
    }

    #[test]
    fn test_kinds_without_identifier() {
        for kind in [ExtensionKind::Clip, ExtensionKind::ClipWidget, ExtensionKind::Watch] {
            assert!(!EXTENSION_KINDS_BY_IDENTIFIER.values().any(|k| *k == kind));
        }
    }
}
