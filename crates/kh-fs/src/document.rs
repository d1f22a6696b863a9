//! Format-detecting structured document loading

use crate::{Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    ///
    /// `.json` and `.toml` are recognized; everything else, including
    /// files without an extension, is read as YAML.
    pub fn from_path(path: &NormalizedPath) -> Self {
        match path.extension().map(str::to_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// Loads structured documents from disk.
#[derive(Debug, Default)]
pub struct DocumentStore;

impl DocumentStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and deserialize a document.
    ///
    /// Returns `Ok(None)` when the file exists but holds only whitespace.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<Option<T>> {
        let content = io::read_text(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path, "Document is empty");
            return Ok(None);
        }
        self.parse(&content, DocumentFormat::from_path(path), path).map(Some)
    }

    /// Deserialize document text in the given format.
    ///
    /// `path` is only used for error reporting.
    pub fn parse<T: DeserializeOwned>(
        &self,
        content: &str,
        format: DocumentFormat,
        path: &NormalizedPath,
    ) -> Result<T> {
        let parse_error = |message: String| Error::DocumentParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        match format {
            DocumentFormat::Yaml => {
                // Expand `<<: *anchor` merge keys before handing the tree over
                let mut value: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                value.apply_merge().map_err(|e| parse_error(e.to_string()))?;
                serde_yaml::from_value(value).map_err(|e| parse_error(e.to_string()))
            }
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
        }
    }
}
