//! Context resolution engine for k8s-handle
//!
//! Turns one section of a multi-section deployment config into a flat,
//! fully resolved variable context:
//!
//! - **Loading**: select the shared `common` section and the requested one
//! - **Resolution**: expand `{{ file = '...' }}` includes and
//!   `{{ env = '...' }}` interpolations, rejecting include cycles
//! - **Merging**: deep-merge the section over the shared defaults
//! - **Validation**: reject dashed variable names and check required ones
//!
//! # Example
//!
//! ```ignore
//! use kh_config::{ContextResolver, ResolverSettings};
//!
//! let settings = ResolverSettings::new("config.yaml").with_strict_env(true);
//! let context = ContextResolver::new(&settings).resolve_section("staging")?;
//! context.check_required(&["k8s_namespace"])?;
//! for entry in context.templates()? {
//!     println!("{}", entry.rendered_name());
//! }
//! ```

pub mod cluster;
pub mod context;
pub mod error;
pub mod loader;
pub mod marker;
pub mod merge;
pub mod node;
pub mod pipeline;
pub mod resolver;
pub mod settings;
pub mod validation;

pub use cluster::{ClusterSettings, REQUIRED_CLUSTER_VARS};
pub use context::{ResolvedContext, TemplateEntry};
pub use error::{Error, Result};
pub use loader::{DocumentLoader, SectionSelection};
pub use marker::Marker;
pub use merge::merge;
pub use node::{Mapping, Node, Scalar};
pub use pipeline::{ContextResolver, resolve_section};
pub use resolver::{EnvSource, IncludeHistory, ProcessEnv, Resolver};
pub use settings::ResolverSettings;
pub use validation::{check_required, validate_names};
