//! Rule catalog: the scoped ruleset and the built-in rules.

pub mod builtin;
pub mod ruleset;

pub use ruleset::{NodeIndex, Ruleset, RuleFactory};
