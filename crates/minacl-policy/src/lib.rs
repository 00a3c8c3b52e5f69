//! # minacl-policy
//!
//! Policy side of the minimal ACL pipeline:
//! - Loading the ReBAC policy as a set of authorizing relation patterns
//! - Classifying access requests as authorized or unauthorized
//! - Building the U1/U2 coverage universes and their inverted indices

#![forbid(unsafe_code)]

pub mod coverage;
pub mod policy;

pub use coverage::{CoverageModel, DenyCandidate, PatternIndex, PermitCandidate};
pub use policy::{Classification, Policy, classify};
