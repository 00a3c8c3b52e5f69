//! minacl Solver: the minimal-ACL optimization stage.
//!
//! The covering model is expressed as a backend-neutral 0/1
//! [`IntegerProgram`] and handed to an [`IntegerProgramOracle`]. The
//! bundled [`BranchAndBound`] oracle is exact; other backends plug in
//! through the same trait.
//!
//! # Modules
//!
//! - [`program`]: variables, linear expressions, constraints
//! - [`oracle`]: the solver trait, limits, and solutions
//! - [`branch_bound`]: the bundled exact backend
//! - [`acl_model`]: the covering model and its objective strategies

#![forbid(unsafe_code)]

pub mod acl_model;
pub mod branch_bound;
pub mod oracle;
pub mod program;

pub use acl_model::{AclModel, SolveOutcome, SolverOptions, solve};
pub use branch_bound::BranchAndBound;
pub use oracle::{IntegerProgramOracle, SELECTION_THRESHOLD, SolveLimits, Solution};
pub use program::{Comparison, Constraint, IntegerProgram, LinearExpr, VarId};
