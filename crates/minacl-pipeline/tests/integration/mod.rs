//! Integration test modules.

mod end_to_end;
mod failures;
mod properties;
