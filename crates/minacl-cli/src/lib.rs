//! # minacl-cli
//!
//! Command-line front end for minimal ACL derivation.
//!
//! - `minacl solve`: derive the ACL and write it as CSV
//! - `minacl config init` / `minacl config show`: configuration helpers

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction, SolveArgs};
