//! minacl Core: shared types, errors, and configuration.
//!
//! This crate provides the foundational types used across all minacl
//! crates. It has no internal minacl dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Relation patterns, requests, rules, solver status
//! - [`config`]: Run configuration and defaults

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod types;

mod proptests;

// Re-export key types at crate root for convenience
pub use config::{Config, ObjectiveStrategy};
pub use error::{Error, Result};
pub use types::{
    AccessPatterns, AccessRequest, AclRule, Decision, MinimalAcl, RelationPattern, RequestKey,
    SolveStatus, Warning, ACL_HEADER,
};
