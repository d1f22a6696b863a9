//! Settings that steer context resolution
//!
//! Everything the loader, resolver and pipeline need to know about the
//! invocation lives here and is passed down explicitly.

use std::path::PathBuf;

/// Default config document, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Name of the shared defaults section.
pub const DEFAULT_COMMON_SECTION: &str = "common";

/// Combined structural and include nesting allowed before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Settings for one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Path of the config document
    pub config_file: PathBuf,
    /// Reserved section merged into every requested section
    pub common_section: String,
    /// Fail on unset environment variables instead of substituting ""
    pub strict_env: bool,
    /// Directory relative include paths are resolved against.
    ///
    /// `None` leaves them relative to the process working directory.
    pub include_dir: Option<PathBuf>,
    /// Maximum nesting depth during resolution
    pub max_depth: usize,
}

impl ResolverSettings {
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            ..Self::default()
        }
    }

    pub fn with_common_section(mut self, name: impl Into<String>) -> Self {
        self.common_section = name.into();
        self
    }

    pub fn with_strict_env(mut self, strict: bool) -> Self {
        self.strict_env = strict;
        self
    }

    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = Some(dir.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            common_section: DEFAULT_COMMON_SECTION.to_string(),
            strict_env: false,
            include_dir: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
