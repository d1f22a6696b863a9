//! Cluster command implementation

use std::path::Path;

use colored::Colorize;
use kh_config::{ClusterSettings, ContextResolver, ResolverSettings};

use crate::error::Result;

/// Resolve `section`, derive its cluster settings and print them.
///
/// The token is never printed. When `ca_dir` is given the decoded CA
/// certificate is written there.
pub fn run_cluster(settings: &ResolverSettings, section: &str, ca_dir: Option<&Path>) -> Result<()> {
    let context = ContextResolver::new(settings).resolve_section(section)?;
    let cluster = ClusterSettings::from_context(&context)?;

    println!("{}: {}", "Host".dimmed(), cluster.host.cyan());
    println!("{}: {}", "Namespace".dimmed(), cluster.namespace.cyan());
    println!("{}: {}", "Debug".dimmed(), cluster.debug);

    if let Some(dir) = ca_dir {
        let path = cluster.write_ca_certificate(dir)?;
        println!("{}: {}", "CA certificate".dimmed(), path.display());
    }
    Ok(())
}
