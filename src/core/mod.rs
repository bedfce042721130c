//! Core types and traits for the jojen validation engine.
//!
//! This module contains the foundational pieces every rule builds on:
//! - Dynamic values and key paths
//! - The rule trait, its call arguments and compile-time sibling view
//! - Comparator-backed value sets
//! - Error types
//! - The per-invocation rule context

pub mod types;
pub mod path;
pub mod error;
pub mod comparator;
pub mod rule;
pub mod params;
pub mod context;

// Re-export commonly used types
pub use types::{FunctionValue, Value, ValueKind};
pub use path::{Path, PathSegment};
pub use error::{
    context as ctx, Context, ErrorDetail, JojenError, JojenResult, RuleError, SchemaError,
    UsageError, ValidationError,
};
pub use comparator::{Comparator, ValueSet};
pub use rule::{Outcome, Priority, Rule, RuleFuture, RuleInstance};
pub use params::{Arg, Predicate, RuleParams};
pub use context::RuleContext;
