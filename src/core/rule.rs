//! Rule trait and compiled rule instances.
//!
//! A rule is one configured validation step. Its lifecycle has two phases:
//! compilation, where it reads its call arguments and may rewire sibling
//! rules, and execution, where it checks a value any number of times.

use crate::core::comparator::ValueSet;
use crate::core::context::RuleContext;
use crate::core::error::{Context, RuleError, SchemaError, ValidationError};
use crate::core::params::{Arg, RuleParams};
use crate::core::types::Value;
use futures::future::BoxFuture;
use std::any::Any;
use std::fmt;

/// Execution order tier. Lower runs earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Value substitution (`default`); always sorts first.
    pub const VALUE_OVERRIDE: Priority = Priority(-1);
    /// Rules that may end validation early with a pass.
    pub const HALTER: Priority = Priority(0);
    /// Everything else.
    pub const NORMAL: Priority = Priority(100);
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

/// Successful result of one rule invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Continue with the same value.
    Pass,
    /// Continue with a rewritten value.
    Replace(Value),
    /// Accept the value and skip the remaining rules.
    Abort,
}

/// Future returned by [`Rule::validate`].
pub type RuleFuture<'a> = BoxFuture<'a, Result<Outcome, RuleError>>;

/// Upcast helper for typed sibling lookups.
pub trait AsAny: Any {
    /// View as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// View as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The core trait every validation primitive and combinator implements.
///
/// Only [`Rule::name`] and [`Rule::validate`] are required. Everything else
/// has a default suited to a plain predicate.
///
/// # Example
///
/// ```rust,ignore
/// struct Even;
///
/// impl Rule for Even {
///     fn name(&self) -> &'static str {
///         "number.even"
///     }
///
///     fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
///         let even = cx.value.as_number().map_or(false, |n| n % 2.0 == 0.0);
///         cx.check(even, self.name(), Context::new)
///     }
/// }
/// ```
pub trait Rule: AsAny + Send + Sync {
    /// Dotted registration name, e.g. `"string.min"`.
    fn name(&self) -> &'static str;

    /// Read call arguments and wire up siblings. Runs once per schema.
    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let _ = params;
        Ok(())
    }

    /// Whether this rule performs a runtime check after compilation.
    fn operates(&self) -> bool {
        true
    }

    /// Execution order tier.
    fn priority(&self) -> Priority {
        Priority::NORMAL
    }

    /// Check a value.
    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a>;

    /// Attempt to turn a rejected value into an acceptable one.
    fn coerce(&self, value: &Value) -> Option<Value> {
        let _ = value;
        None
    }

    /// Build a failure for this rule at the current path.
    fn error(&self, cx: &RuleContext<'_>, info: Context) -> ValidationError {
        cx.error(self.name(), info)
    }

    /// Replacement value for `Undefined` input, for value-substitution rules.
    fn default_value(&self) -> Option<&Value> {
        None
    }

    /// Comparator-backed value set, for rules matching against a set.
    fn value_set_mut(&mut self) -> Option<&mut ValueSet> {
        None
    }
}

// ============================================================================
// RuleInstance
// ============================================================================

/// A rule paired with the arguments it was chained with.
pub struct RuleInstance {
    pub(crate) rule: Box<dyn Rule>,
    pub(crate) params: Vec<Arg>,
}

impl RuleInstance {
    /// Create an instance from a constructed rule and its call arguments.
    pub fn new(rule: Box<dyn Rule>, params: Vec<Arg>) -> Self {
        Self { rule, params }
    }

    /// Get the rule name.
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    /// Get the call arguments.
    pub fn params(&self) -> &[Arg] {
        &self.params
    }

    /// Get the rule.
    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// Get the rule mutably.
    pub fn rule_mut(&mut self) -> &mut dyn Rule {
        self.rule.as_mut()
    }

    /// Same name and equal arguments.
    pub fn identical_to(&self, other: &RuleInstance) -> bool {
        self.name() == other.name() && self.params == other.params
    }

    /// Downcast to a concrete rule type.
    pub fn downcast_ref<T: Rule>(&self) -> Option<&T> {
        self.rule().as_any().downcast_ref::<T>()
    }

    /// Downcast to a concrete rule type, mutably.
    pub fn downcast_mut<T: Rule>(&mut self) -> Option<&mut T> {
        self.rule_mut().as_any_mut().downcast_mut::<T>()
    }
}

impl fmt::Debug for RuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleInstance")
            .field("name", &self.name())
            .field("params", &self.params)
            .field("priority", &self.rule.priority())
            .finish()
    }
}
