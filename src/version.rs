// Version information for the Style Transfer Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-style-transfer-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "arbitrary-style-transfer",
    "multipart-upload",
    "model-hub-download",
    "cpu-fallback",
    "unique-output-files",
    "sanitized-uploads",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Style Transfer Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
