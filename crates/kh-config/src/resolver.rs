//! Recursive marker resolution
//!
//! The [`Resolver`] walks a [`Node`] tree and replaces every marker string
//! with either the resolved content of an included file or the value of an
//! environment variable. Included trees are resolved again, so includes may
//! chain; a cycle shows up as the same raw value appearing twice on one
//! descent path and is rejected.

use std::collections::HashMap;

use kh_fs::{DocumentStore, NormalizedPath};

use crate::marker::Marker;
use crate::node::{Mapping, Node, Scalar};
use crate::settings::ResolverSettings;
use crate::{Error, Result};

/// Source of environment variable values.
pub trait EnvSource {
    /// Value of `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Raw string values seen along the current descent path.
///
/// Each recursive step gets its own extended copy, so sibling branches
/// never see each other's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeHistory {
    values: Vec<String>,
}

impl IncludeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|seen| seen == value)
    }

    /// A copy of this history with `value` appended.
    pub fn extended(&self, value: &str) -> Self {
        let mut values = self.values.clone();
        values.push(value.to_string());
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolves markers in configuration trees.
pub struct Resolver<'a, E: EnvSource + ?Sized = ProcessEnv> {
    settings: &'a ResolverSettings,
    env: &'a E,
    store: DocumentStore,
}

impl<'a, E: EnvSource + ?Sized> Resolver<'a, E> {
    pub fn new(settings: &'a ResolverSettings, env: &'a E) -> Self {
        Self {
            settings,
            env,
            store: DocumentStore::new(),
        }
    }

    /// Resolve a tree starting from an empty history.
    pub fn resolve(&self, node: Node) -> Result<Node> {
        self.resolve_with(node, &IncludeHistory::new())
    }

    /// Resolve a tree as if reached along `history`.
    pub fn resolve_with(&self, node: Node, history: &IncludeHistory) -> Result<Node> {
        self.resolve_node(node, history, 0)
    }

    /// Resolve every value of a mapping, keeping it a mapping.
    pub fn resolve_mapping(&self, map: Mapping) -> Result<Mapping> {
        self.resolve_entries(map, &IncludeHistory::new(), 0)
    }

    fn resolve_entries(&self, map: Mapping, history: &IncludeHistory, depth: usize) -> Result<Mapping> {
        map.into_iter()
            .map(|(key, value)| {
                self.resolve_node(value, history, depth + 1)
                    .map(|resolved| (key, resolved))
            })
            .collect()
    }

    fn resolve_node(&self, node: Node, history: &IncludeHistory, depth: usize) -> Result<Node> {
        if depth > self.settings.max_depth {
            return Err(Error::MaxDepthExceeded {
                max_depth: self.settings.max_depth,
            });
        }

        match node {
            Node::Mapping(map) => self.resolve_entries(map, history, depth).map(Node::Mapping),
            Node::Sequence(items) => items
                .into_iter()
                .map(|item| self.resolve_node(item, history, depth + 1))
                .collect::<Result<Vec<_>>>()
                .map(Node::Sequence),
            Node::Scalar(Scalar::String(value)) => self.resolve_string(value, history, depth),
            scalar @ Node::Scalar(_) => Ok(scalar),
        }
    }

    /// Included content is resolved again, even when the whole file is a
    /// single string.
    fn resolve_string(&self, value: String, history: &IncludeHistory, depth: usize) -> Result<Node> {
        if history.contains(&value) {
            return Err(Error::InfiniteIncludeLoop { value });
        }
        let history = history.extended(&value);

        match Marker::parse(&value) {
            Some(Marker::FileInclude { file }) => {
                let included = self.load_include(file)?;
                self.resolve_node(included, &history, depth + 1)
            }
            Some(Marker::Env {
                prefix,
                name,
                suffix,
            }) => {
                let substituted = self.lookup_env(name)?;
                Ok(Node::string(format!("{prefix}{substituted}{suffix}")))
            }
            None => Ok(Node::Scalar(Scalar::String(value))),
        }
    }

    fn load_include(&self, file: &str) -> Result<Node> {
        let path = match &self.settings.include_dir {
            Some(dir) => NormalizedPath::new(dir).join(file),
            None => NormalizedPath::new(file),
        };
        tracing::debug!(file, path = %path, "Including file");

        match self.store.load::<Node>(&path) {
            Ok(Some(node)) => Ok(node),
            Ok(None) => Ok(Node::NULL),
            Err(source) => Err(Error::IncludeFailed {
                file: file.to_string(),
                source,
            }),
        }
    }

    fn lookup_env(&self, name: &str) -> Result<String> {
        match self.env.var(name) {
            Some(value) => {
                tracing::debug!(name, "Substituting environment variable");
                Ok(value)
            }
            None if self.settings.strict_env => Err(Error::MissingEnvVarStrict {
                name: name.to_string(),
            }),
            None => {
                tracing::warn!(name, "Environment variable is not set, substituting empty string");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn yaml(text: &str) -> Node {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_history_copies_are_independent() {
        let root = IncludeHistory::new();
        let left = root.extended("a");
        let right = root.extended("b");

        assert!(root.is_empty());
        assert!(left.contains("a") && !left.contains("b"));
        assert!(right.contains("b") && !right.contains("a"));
        assert_eq!(left.extended("c").len(), 2);
    }

    #[test]
    fn test_non_string_scalars_pass_through() {
        let settings = ResolverSettings::default();
        let env = env(&[]);
        let resolver = Resolver::new(&settings, &env);

        let node = yaml("replicas: 3\nratio: 0.25\nenabled: false\nnothing: ~\n");
        assert_eq!(resolver.resolve(node.clone()).unwrap(), node);
    }

    #[test]
    fn test_env_substitution_in_nested_sequence() {
        let settings = ResolverSettings::default();
        let env = env(&[("REGISTRY", "registry.local")]);
        let resolver = Resolver::new(&settings, &env);

        let node = yaml("images:\n  - \"{{ env = 'REGISTRY' }}/app:1\"\n  - plain\n");
        let resolved = resolver.resolve(node).unwrap();

        assert_eq!(resolved, yaml("images:\n  - registry.local/app:1\n  - plain\n"));
    }

    #[test]
    fn test_equal_sibling_values_are_not_a_loop() {
        let settings = ResolverSettings::default();
        let env = env(&[("TAG", "v1")]);
        let resolver = Resolver::new(&settings, &env);

        let node = yaml("a: \"{{ env = 'TAG' }}\"\nb: \"{{ env = 'TAG' }}\"\nc: [\"{{ env = 'TAG' }}\", \"{{ env = 'TAG' }}\"]\n");
        let resolved = resolver.resolve(node).unwrap();

        assert_eq!(resolved, yaml("a: v1\nb: v1\nc: [v1, v1]\n"));
    }

    #[test]
    fn test_value_already_in_history_is_a_loop() {
        let settings = ResolverSettings::default();
        let env = env(&[]);
        let resolver = Resolver::new(&settings, &env);
        let history = IncludeHistory::new().extended("{{ file = 'a.yaml' }}");

        let err = resolver
            .resolve_with(yaml("key: \"{{ file = 'a.yaml' }}\""), &history)
            .unwrap_err();

        assert!(matches!(err, Error::InfiniteIncludeLoop { value } if value == "{{ file = 'a.yaml' }}"));
    }

    #[test]
    fn test_env_value_is_not_resolved_again() {
        let settings = ResolverSettings::default();
        let env = env(&[("NESTED", "{{ env = 'OTHER' }}"), ("OTHER", "leaked")]);
        let resolver = Resolver::new(&settings, &env);

        let resolved = resolver.resolve(Node::from("{{ env = 'NESTED' }}")).unwrap();
        assert_eq!(resolved, Node::from("{{ env = 'OTHER' }}"));
    }

    #[test]
    fn test_block_scalar_env_marker() {
        let settings = ResolverSettings::default();
        let env = env(&[("X", "val")]);
        let resolver = Resolver::new(&settings, &env);

        assert_eq!(resolver.resolve(Node::from("{{ env = 'X' }}\n")).unwrap(), Node::from("val"));

        let node = yaml("token: |\n  {{ env = 'X' }}\n");
        assert_eq!(resolver.resolve(node).unwrap(), yaml("token: val"));
    }

    #[test]
    fn test_depth_limit() {
        let settings = ResolverSettings::default().with_max_depth(2);
        let env = env(&[]);
        let resolver = Resolver::new(&settings, &env);

        assert!(resolver.resolve(yaml("a:\n  b: 1\n")).is_ok());
        let err = resolver.resolve(yaml("a:\n  b:\n    c: 1\n")).unwrap_err();
        assert!(matches!(err, Error::MaxDepthExceeded { max_depth: 2 }));
    }
}
