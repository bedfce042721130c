//! Validation engine.
//!
//! This module provides:
//! - The validator that runs compiled schemas against values
//! - Validation options and outcomes
//! - Join policies for composite rules

pub mod engine;
pub mod join;
pub mod options;

pub use engine::{AssertMessage, Validator};
pub use join::{all_must_pass, first_success};
pub use options::{ValidationOptions, ValidationOutcome};
