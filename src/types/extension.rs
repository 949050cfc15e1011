use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Every kind of extension target that can be generated next to the main app.
///
/// The string form is the kebab-case tag used in target config files
/// (`"notification-service"`, `"bg-download"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionKind {
    Widget,
    NotificationContent,
    NotificationService,
    Share,
    Intent,
    BgDownload,
    IntentUi,
    Spotlight,
    Matter,
    QuicklookThumbnail,
    Imessage,
    Clip,
    ClipWidget,
    Watch,
    LocationPush,
    CredentialsProvider,
    AccountAuth,
    Action,
    Safari,
    AppIntent,
    DeviceActivityMonitor,
}

impl ExtensionKind {
    /// All kinds, in declaration order.
    pub const ALL: [ExtensionKind; 21] = [
        ExtensionKind::Widget,
        ExtensionKind::NotificationContent,
        ExtensionKind::NotificationService,
        ExtensionKind::Share,
        ExtensionKind::Intent,
        ExtensionKind::BgDownload,
        ExtensionKind::IntentUi,
        ExtensionKind::Spotlight,
        ExtensionKind::Matter,
        ExtensionKind::QuicklookThumbnail,
        ExtensionKind::Imessage,
        ExtensionKind::Clip,
        ExtensionKind::ClipWidget,
        ExtensionKind::Watch,
        ExtensionKind::LocationPush,
        ExtensionKind::CredentialsProvider,
        ExtensionKind::AccountAuth,
        ExtensionKind::Action,
        ExtensionKind::Safari,
        ExtensionKind::AppIntent,
        ExtensionKind::DeviceActivityMonitor,
    ];

    /// The kebab-case tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionKind::Widget => "widget",
            ExtensionKind::NotificationContent => "notification-content",
            ExtensionKind::NotificationService => "notification-service",
            ExtensionKind::Share => "share",
            ExtensionKind::Intent => "intent",
            ExtensionKind::BgDownload => "bg-download",
            ExtensionKind::IntentUi => "intent-ui",
            ExtensionKind::Spotlight => "spotlight",
            ExtensionKind::Matter => "matter",
            ExtensionKind::QuicklookThumbnail => "quicklook-thumbnail",
            ExtensionKind::Imessage => "imessage",
            ExtensionKind::Clip => "clip",
            ExtensionKind::ClipWidget => "clip-widget",
            ExtensionKind::Watch => "watch",
            ExtensionKind::LocationPush => "location-push",
            ExtensionKind::CredentialsProvider => "credentials-provider",
            ExtensionKind::AccountAuth => "account-auth",
            ExtensionKind::Action => "action",
            ExtensionKind::Safari => "safari",
            ExtensionKind::AppIntent => "app-intent",
            ExtensionKind::DeviceActivityMonitor => "device-activity-monitor",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtensionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// Apple platforms a main application target can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ios,
    Macos,
    Tvos,
    Watchos,
    Visionos,
}

impl Platform {
    /// Build setting whose presence marks a configuration as targeting this platform.
    pub fn deployment_target_key(&self) -> &'static str {
        match self {
            Platform::Ios => "IPHONEOS_DEPLOYMENT_TARGET",
            Platform::Macos => "MACOSX_DEPLOYMENT_TARGET",
            Platform::Tvos => "TVOS_DEPLOYMENT_TARGET",
            Platform::Watchos => "WATCHOS_DEPLOYMENT_TARGET",
            Platform::Visionos => "XROS_DEPLOYMENT_TARGET",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Tvos => "tvos",
            Platform::Watchos => "watchos",
            Platform::Visionos => "visionos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Platform::Ios),
            "macos" => Ok(Platform::Macos),
            "tvos" => Ok(Platform::Tvos),
            "watchos" => Ok(Platform::Watchos),
            "visionos" => Ok(Platform::Visionos),
            _ => Err(Error::UnknownPlatform(s.to_string())),
        }
    }
}
