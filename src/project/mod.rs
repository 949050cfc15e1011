pub mod build_settings;
pub mod xcode_project;

pub use xcode_project::{TargetRef, XcodeProject};
