//! Error types for kh-config

use std::path::PathBuf;

/// Result type for kh-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving a deployment context.
///
/// Every variant is terminal for the current invocation: they all describe
/// defects in the configuration, not transient conditions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config document is missing or holds nothing
    #[error("Config file \"{path}\" is empty")]
    ConfigEmpty { path: PathBuf },

    /// Config document has the wrong shape
    #[error("Invalid config file \"{path}\": {message}")]
    InvalidDocument { path: PathBuf, message: String },

    /// Requested section does not exist in the document
    #[error("Section \"{section}\" not found in config file \"{path}\"")]
    SectionNotFound { section: String, path: PathBuf },

    /// Requested section is the shared defaults section
    #[error("Section \"{section}\" is not intended to deploy")]
    ReservedSectionRequested { section: String },

    /// A raw value recurred along one resolution path
    #[error("Infinite include loop on \"{value}\"")]
    InfiniteIncludeLoop { value: String },

    /// A referenced environment variable is unset in strict mode
    #[error("Environment variable \"{name}\" is not set")]
    MissingEnvVarStrict { name: String },

    /// An included file could not be read or parsed
    #[error("Unable to include \"{file}\": {source}")]
    IncludeFailed {
        file: String,
        #[source]
        source: kh_fs::Error,
    },

    /// Nesting went past the configured limit
    #[error("Resolution exceeded the maximum depth of {max_depth}")]
    MaxDepthExceeded { max_depth: usize },

    /// Keys contain characters template variables cannot use
    #[error(
        "Variable names should never include dashes, check your vars, please: {}",
        .names.join(", ")
    )]
    InvalidKeyNames { names: Vec<String> },

    /// Required variables are absent, null or empty
    #[error(
        "Variables \"{}\" not found (or empty) in config. Please, set all required variables: {}.",
        .missing.join(", "),
        .required.join(", ")
    )]
    MissingRequiredVars {
        missing: Vec<String>,
        required: Vec<String>,
    },

    /// Merged context has nothing to deploy
    #[error("Section \"templates\" or \"kubectl\" not found in config file \"{path}\"")]
    MissingTemplatesOrKubectlKey { path: PathBuf },

    /// Template list has the wrong shape
    #[error("Invalid \"{key}\" section: {message}")]
    InvalidTemplates { key: String, message: String },

    /// `k8s_ca_base64` does not decode to a UTF-8 certificate
    #[error("Invalid CA certificate in \"k8s_ca_base64\": {message}")]
    InvalidCaCertificate { message: String },

    /// Filesystem error from kh-fs
    #[error(transparent)]
    Fs(#[from] kh_fs::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_names_lists_every_name() {
        let err = Error::InvalidKeyNames {
            names: vec!["app-name".into(), "my-var".into()],
        };
        assert_eq!(
            err.to_string(),
            "Variable names should never include dashes, check your vars, please: app-name, my-var"
        );
    }

    #[test]
    fn missing_required_vars_lists_missing_and_required() {
        let err = Error::MissingRequiredVars {
            missing: vec!["k8s_token".into()],
            required: vec!["k8s_master_uri".into(), "k8s_token".into()],
        };
        let display = err.to_string();
        assert!(display.contains("\"k8s_token\""), "got: {display}");
        assert!(display.contains("k8s_master_uri, k8s_token."), "got: {display}");
    }
}
