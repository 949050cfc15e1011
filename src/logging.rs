use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a `tracing` subscriber that writes diagnostics to stderr.
///
/// The level comes from `RUST_LOG`, defaulting to `info`. Fails if a global
/// subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::manifest::ManifestDocument;
    use crate::resolver::is_target_of_kind;
    use crate::types::ExtensionKind;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn extension_project() -> crate::project::XcodeProject {
        crate::project::XcodeProject::from_json(&serde_json::json!({
            "objects": {
                "ROOT": { "isa": "PBXProject", "targets": ["EXT"] },
                "EXT": {
                    "isa": "PBXNativeTarget",
                    "name": "BrokenExtension",
                    "productType": "com.apple.product-type.app-extension",
                },
            },
            "rootObject": "ROOT",
        }))
        .unwrap()
    }

    #[test]
    fn test_logging_init() {
        // Only one global subscriber per process.
        let _ = init();
        assert!(init().is_err());
    }

    #[test]
    fn test_missing_extension_point_is_logged() {
        let mut project = extension_project();
        let manifest = ManifestDocument::from_value(serde_json::json!({ "NSExtension": {} })).unwrap();
        project.set_info_plist("EXT", manifest);
        let ext = project.target("EXT").unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let matched = tracing::subscriber::with_default(subscriber, || is_target_of_kind(&ext, ExtensionKind::Share));
        assert!(!matched);

        let output = logs.contents();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("No NSExtensionPointIdentifier found"), "{}", output);
        assert!(output.contains("BrokenExtension"), "{}", output);
    }

    #[test]
    fn test_unreadable_info_plist_is_logged() {
        let project = extension_project();
        let ext = project.target("EXT").unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(!is_target_of_kind(&ext, ExtensionKind::Share));
        });

        let output = logs.contents();
        assert!(output.contains("Could not read extension Info.plist"), "{}", output);
        assert!(output.contains("BrokenExtension"), "{}", output);
    }
}
