//! Loading the sections of a config document
//!
//! A config document maps section names to deployable configurations:
//!
//! ```yaml
//! common:            # shared defaults, merged into every section
//!   app_name: shop
//! staging:
//!   templates:
//!     - template: deployment.yaml.j2
//! production:
//!   replicas: 3
//! ```
//!
//! Only the shared section and the requested one are kept; the others are
//! discarded before resolution so a broken unrelated section cannot fail
//! the run.

use kh_fs::{DocumentStore, NormalizedPath};

use crate::node::{Mapping, Node, Scalar};
use crate::settings::ResolverSettings;
use crate::{Error, Result};

/// The two subtrees selected from a config document.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSelection {
    /// Shared defaults; empty when the document has none
    pub shared: Mapping,
    /// The requested section; `None` when no section was named
    pub section: Option<Mapping>,
}

/// Loads sections from the configured document.
pub struct DocumentLoader<'a> {
    settings: &'a ResolverSettings,
    store: DocumentStore,
}

impl<'a> DocumentLoader<'a> {
    pub fn new(settings: &'a ResolverSettings) -> Self {
        Self {
            settings,
            store: DocumentStore::new(),
        }
    }

    /// Select the shared section and section `name` from the document.
    ///
    /// An empty `name` selects only the shared section.
    pub fn load_section(&self, name: &str) -> Result<SectionSelection> {
        let common = self.settings.common_section.as_str();
        if name == common {
            return Err(Error::ReservedSectionRequested {
                section: name.to_string(),
            });
        }

        let mut document = self.load_document()?;

        if !name.is_empty() && !document.contains_key(name) {
            return Err(Error::SectionNotFound {
                section: name.to_string(),
                path: self.settings.config_file.clone(),
            });
        }

        let shared = self.section_mapping(common, document.remove(common))?;
        let section = if name.is_empty() {
            None
        } else {
            Some(self.section_mapping(name, document.remove(name))?)
        };

        tracing::debug!(
            section = name,
            discarded = document.len(),
            "Selected sections from config"
        );
        Ok(SectionSelection { shared, section })
    }

    fn load_document(&self) -> Result<Mapping> {
        let path = NormalizedPath::new(&self.settings.config_file);
        tracing::debug!(path = %path, "Loading config file");

        let document = match self.store.load::<Node>(&path) {
            Ok(document) => document,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };

        match document {
            None | Some(Node::Scalar(Scalar::Null)) => Err(Error::ConfigEmpty {
                path: self.settings.config_file.clone(),
            }),
            Some(Node::Mapping(map)) => Ok(map),
            Some(other) => Err(Error::InvalidDocument {
                path: self.settings.config_file.clone(),
                message: format!("expected a mapping of sections, found a {}", other.kind()),
            }),
        }
    }

    fn section_mapping(&self, name: &str, node: Option<Node>) -> Result<Mapping> {
        match node {
            None => Ok(Mapping::new()),
            Some(Node::Mapping(map)) => Ok(map),
            Some(node) if node.is_null() => Ok(Mapping::new()),
            Some(other) => Err(Error::InvalidDocument {
                path: self.settings.config_file.clone(),
                message: format!("section \"{name}\" must be a mapping, found a {}", other.kind()),
            }),
        }
    }
}
