//! Cluster connection settings derived from a resolved context
//!
//! Provisioners authenticate with a bearer token and verify the API server
//! against a CA certificate carried base64-encoded in the context.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kh_fs::{NormalizedPath, io};

use crate::context::ResolvedContext;
use crate::node::{Node, Scalar};
use crate::{Error, Result};

/// Variables a context must set to connect without a kubeconfig.
pub const REQUIRED_CLUSTER_VARS: [&str; 4] = [
    "k8s_master_uri",
    "k8s_token",
    "k8s_ca_base64",
    "k8s_namespace",
];

/// File name the CA certificate is written to.
pub const CA_CERT_FILE: &str = "ca.crt";

/// Connection settings for the orchestration API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    pub host: String,
    pub token: String,
    pub namespace: String,
    /// PEM text decoded from `k8s_ca_base64`
    pub ca_certificate: String,
    /// Client debug logging, from `k8s_handle_debug`
    pub debug: bool,
}

impl ClusterSettings {
    /// Derive settings from a context, checking the required variables first.
    pub fn from_context(context: &ResolvedContext) -> Result<Self> {
        context.check_required(&REQUIRED_CLUSTER_VARS)?;

        let text = |name: &str| -> String {
            match context.get(name) {
                Some(Node::Scalar(scalar)) => scalar.to_string(),
                _ => String::new(),
            }
        };

        Ok(Self {
            host: text("k8s_master_uri"),
            token: text("k8s_token"),
            namespace: text("k8s_namespace"),
            ca_certificate: decode_ca(&text("k8s_ca_base64"))?,
            debug: context.get("k8s_handle_debug").is_some_and(is_debug_enabled),
        })
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Write the CA certificate to `dir/ca.crt` and return its path.
    pub fn write_ca_certificate(&self, dir: impl Into<PathBuf>) -> Result<PathBuf> {
        let path = NormalizedPath::new(dir.into()).join(CA_CERT_FILE);
        io::write_text(&path, &self.ca_certificate)?;
        tracing::debug!(path = %path, "Wrote CA certificate");
        Ok(path.to_native())
    }
}

fn decode_ca(encoded: &str) -> Result<String> {
    // Encoded certificates are often wrapped at 76 columns
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| Error::InvalidCaCertificate {
            message: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidCaCertificate {
        message: e.to_string(),
    })
}

fn is_debug_enabled(node: &Node) -> bool {
    match node {
        Node::Scalar(Scalar::Bool(enabled)) => *enabled,
        other => matches!(other.as_str(), Some("true" | "True")),
    }
}
