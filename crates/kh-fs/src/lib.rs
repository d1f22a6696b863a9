//! Filesystem access for k8s-handle
//!
//! Provides normalized paths, plain and atomic text I/O, and
//! format-detecting loading of structured documents.

pub mod document;
pub mod error;
pub mod io;
pub mod path;

pub use document::{DocumentFormat, DocumentStore};
pub use error::{Error, Result};
pub use path::NormalizedPath;
