//! The resolved context handed to renderers and provisioners

use serde::Serialize;

use crate::node::{Mapping, Node};
use crate::validation;
use crate::{Error, Result};

/// Keys that mark a context as deployable, in lookup order.
pub const TEMPLATE_KEYS: [&str; 2] = ["templates", "kubectl"];

/// Template extension stripped from rendered file names.
const TEMPLATE_SUFFIX: &str = ".j2";

/// A fully resolved, merged and validated deployment context.
///
/// Serializes as the plain mapping, which is exactly what template
/// renderers expect as their variable scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedContext {
    values: Mapping,
}

/// One entry of the template list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Template path relative to the templates directory
    pub template: String,
}

impl TemplateEntry {
    /// File name of the rendered manifest: the template path without `.j2`.
    pub fn rendered_name(&self) -> String {
        self.template.replace(TEMPLATE_SUFFIX, "")
    }
}

impl ResolvedContext {
    pub(crate) fn new(values: Mapping) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.values.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.values
    }

    pub fn into_mapping(self) -> Mapping {
        self.values
    }

    /// Fail unless every name in `required` is set and non-empty.
    pub fn check_required<S: AsRef<str>>(&self, required: &[S]) -> Result<()> {
        validation::check_required(&self.values, required)
    }

    /// Target namespace, when `k8s_namespace` is a non-empty string.
    pub fn namespace(&self) -> Option<&str> {
        self.get("k8s_namespace")
            .and_then(Node::as_str)
            .filter(|ns| !ns.is_empty())
    }

    /// Templates to render.
    ///
    /// Uses `templates` when it has entries, falling back to `kubectl`. A
    /// missing or empty list yields no templates.
    pub fn templates(&self) -> Result<Vec<TemplateEntry>> {
        for key in TEMPLATE_KEYS {
            let entries = template_list(key, self.get(key))?;
            if !entries.is_empty() {
                return Ok(entries);
            }
        }
        Ok(Vec::new())
    }
}

fn template_list(key: &str, node: Option<&Node>) -> Result<Vec<TemplateEntry>> {
    let invalid = |message: String| Error::InvalidTemplates {
        key: key.to_string(),
        message,
    };

    let items = match node {
        None => return Ok(Vec::new()),
        Some(node) if node.is_null() => return Ok(Vec::new()),
        Some(Node::Sequence(items)) => items,
        Some(other) => return Err(invalid(format!("expected a sequence, found a {}", other.kind()))),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_mapping()
                .and_then(|entry| entry.get("template"))
                .and_then(Node::as_str)
                .map(|template| TemplateEntry {
                    template: template.to_string(),
                })
                .ok_or_else(|| invalid(format!("entry #{index} has no \"template\" name")))
        })
        .collect()
}
