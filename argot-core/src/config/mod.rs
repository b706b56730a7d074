//! Application metadata and construction.
//!
//! [`ApplicationMetadata`] carries the texts shown in help and version
//! output. Applications are assembled with [`CliApplicationBuilder`], which
//! fills in any metadata the host leaves unset.

mod builder;

use std::path::Path;

pub use builder::CliApplicationBuilder;

/// Version text used when the host does not set one.
pub const DEFAULT_VERSION_TEXT: &str = "v1.0";

/// Executable name used when it can't be derived from the running binary.
pub const FALLBACK_EXECUTABLE_NAME: &str = "app";

/// Texts describing the application as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationMetadata {
    /// Display title, shown at the top of the root help.
    pub title: String,

    /// Name the user types to run the program; used in usage lines.
    pub executable_name: String,

    /// Printed verbatim for `--version`.
    pub version_text: String,

    pub description: Option<String>,
}

impl ApplicationMetadata {
    pub fn new(
        title: impl Into<String>,
        executable_name: impl Into<String>,
        version_text: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            executable_name: executable_name.into(),
            version_text: version_text.into(),
            description,
        }
    }
}

impl Default for ApplicationMetadata {
    fn default() -> Self {
        let executable_name = current_executable_name();
        Self {
            title: executable_name.clone(),
            executable_name,
            version_text: DEFAULT_VERSION_TEXT.to_string(),
            description: None,
        }
    }
}

/// File stem of the running binary.
pub fn current_executable_name() -> String {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::file_stem)
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_EXECUTABLE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_executable_name_for_title() {
        let metadata = ApplicationMetadata::default();
        assert!(!metadata.executable_name.is_empty());
        assert_eq!(metadata.title, metadata.executable_name);
        assert_eq!(metadata.version_text, DEFAULT_VERSION_TEXT);
        assert_eq!(metadata.description, None);
    }
}
