//! End-to-end context resolution for one section
//!
//! ```text
//! config.yaml ──► DocumentLoader ──► { common, section }
//!                                        │        │
//!                                    Resolver  Resolver
//!                                        │        │
//!                                        └─ merge ┘
//!                                            │
//!                         deployability + key-name validation
//!                                            │
//!                                     ResolvedContext
//! ```

use crate::context::{ResolvedContext, TEMPLATE_KEYS};
use crate::loader::DocumentLoader;
use crate::merge::merge;
use crate::node::Mapping;
use crate::resolver::{EnvSource, ProcessEnv, Resolver};
use crate::settings::ResolverSettings;
use crate::validation::validate_names;
use crate::{Error, Result};

/// Resolves sections of a config document into deployable contexts.
pub struct ContextResolver<'a, E: EnvSource + ?Sized = ProcessEnv> {
    settings: &'a ResolverSettings,
    env: &'a E,
}

impl<'a> ContextResolver<'a, ProcessEnv> {
    /// Resolver reading environment markers from the process environment.
    pub fn new(settings: &'a ResolverSettings) -> Self {
        Self {
            settings,
            env: &ProcessEnv,
        }
    }
}

impl<'a, E: EnvSource + ?Sized> ContextResolver<'a, E> {
    /// Resolver reading environment markers from `env`.
    pub fn with_env(settings: &'a ResolverSettings, env: &'a E) -> Self {
        Self { settings, env }
    }

    pub fn settings(&self) -> &ResolverSettings {
        self.settings
    }

    /// Load, resolve, merge and validate section `name`.
    ///
    /// The shared section and the requested section are resolved
    /// independently, then the section is merged over the shared defaults.
    /// Nothing is returned unless every step succeeds.
    pub fn resolve_section(&self, name: &str) -> Result<ResolvedContext> {
        let selection = DocumentLoader::new(self.settings).load_section(name)?;
        let resolver = Resolver::new(self.settings, self.env);

        tracing::debug!(section = %self.settings.common_section, "Resolving shared section");
        let shared = resolver.resolve_mapping(selection.shared)?;

        let merged = match selection.section {
            Some(section) => {
                tracing::debug!(section = name, "Resolving requested section");
                let section = resolver.resolve_mapping(section)?;
                merge(shared, section)
            }
            None => shared,
        };

        self.ensure_deployable(&merged)?;
        validate_names(&merged)?;

        tracing::info!(section = name, variables = merged.len(), "Resolved config section");
        Ok(ResolvedContext::new(merged))
    }

    fn ensure_deployable(&self, context: &Mapping) -> Result<()> {
        if TEMPLATE_KEYS.iter().any(|key| context.contains_key(*key)) {
            Ok(())
        } else {
            Err(Error::MissingTemplatesOrKubectlKey {
                path: self.settings.config_file.clone(),
            })
        }
    }
}

/// Resolve section `name` using the process environment.
pub fn resolve_section(name: &str, settings: &ResolverSettings) -> Result<ResolvedContext> {
    ContextResolver::new(settings).resolve_section(name)
}
