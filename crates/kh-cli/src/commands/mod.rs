//! Command implementations for kh-cli

pub mod check;
pub mod cluster;
pub mod resolve;

pub use check::run_check;
pub use cluster::run_cluster;
pub use resolve::run_resolve;
