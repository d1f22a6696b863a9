//! Shared test utilities for the k8s-handle workspace.
//!
//! This crate provides standardised test fixtures so crate test suites do not
//! each hand-roll temporary config directories. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`config`] — [`ConfigDir`] builder for config documents and include files

pub mod config;

pub use config::ConfigDir;
