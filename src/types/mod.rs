pub mod constants;
pub mod extension;

pub use extension::{ExtensionKind, Platform};
