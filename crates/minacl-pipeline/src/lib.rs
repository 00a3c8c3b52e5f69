//! minacl Pipeline: minimal ACL derivation end to end.
//!
//! Loads a relationship graph and a ReBAC policy, enumerates relation
//! patterns, classifies requests, solves the covering model, and writes the
//! resulting permit/deny table.
//!
//! ```no_run
//! # async fn demo() -> minacl_core::Result<()> {
//! use minacl_core::Config;
//! use minacl_pipeline::{Pipeline, write_acl_path};
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(Config::default())?;
//! let report = pipeline
//!     .run_paths(Path::new("system_graph.csv"), Path::new("rebac_policy.txt"))
//!     .await?;
//! write_acl_path(&report.acl, "min_low_level_auths.csv")?;
//! report.check_status()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod materialize;
pub mod output;
pub mod pipeline;

pub use materialize::materialize;
pub use output::{DEFAULT_OUTPUT_FILE, write_acl, write_acl_path};
pub use pipeline::{Pipeline, RunReport, RunStats};
