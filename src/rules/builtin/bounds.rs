//! Shared shapes for single-argument limit checks and plain predicates.
//!
//! String, array and function length checks only differ in how the measured
//! quantity is read, so they share [`LengthBound`]. The same goes for
//! numeric comparisons ([`NumberBound`]) and for argument-free checks
//! ([`Check`]).

use crate::core::context::RuleContext;
use crate::core::error::{context, Context, SchemaError};
use crate::core::params::RuleParams;
use crate::core::rule::{Rule, RuleFuture};
use crate::core::types::Value;

/// Which side of the limit is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `actual >= limit`
    Min,
    /// `actual <= limit`
    Max,
    /// `actual == limit`
    Exact,
}

impl Bound {
    /// Context key carrying the limit.
    pub fn key(self) -> &'static str {
        match self {
            Bound::Min => "min",
            Bound::Max => "max",
            Bound::Exact => "expected",
        }
    }

    fn accepts(self, actual: usize, limit: usize) -> bool {
        match self {
            Bound::Min => actual >= limit,
            Bound::Max => actual <= limit,
            Bound::Exact => actual == limit,
        }
    }
}

/// Reads the measured quantity; `None` when the value has the wrong type.
pub type Measure = fn(&Value) -> Option<usize>;

/// Length-style limit: string chars, array elements, function arity.
#[derive(Clone)]
pub struct LengthBound {
    name: &'static str,
    bound: Bound,
    measure_key: &'static str,
    measure: Measure,
    limit: usize,
}

impl LengthBound {
    /// Create an unconfigured bound; the limit is read at compile.
    pub fn new(name: &'static str, bound: Bound, measure_key: &'static str, measure: Measure) -> Self {
        Self {
            name,
            bound,
            measure_key,
            measure,
            limit: 0,
        }
    }

    /// Get the configured limit.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Rule for LengthBound {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.limit = params.count(0)?;
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(actual) = (self.measure)(cx.value) else {
            return cx.fail(self.name, Context::new());
        };
        cx.check(self.bound.accepts(actual, self.limit), self.name, || {
            context([
                (self.measure_key, Value::from(actual)),
                (self.bound.key(), Value::from(self.limit)),
            ])
        })
    }
}

/// Numeric comparison against a single limit.
#[derive(Debug, Clone)]
pub struct NumberBound {
    name: &'static str,
    key: &'static str,
    test: fn(f64, f64) -> bool,
    limit: f64,
}

impl NumberBound {
    /// Create an unconfigured comparison; `key` names the limit in the context.
    pub fn new(name: &'static str, key: &'static str, test: fn(f64, f64) -> bool) -> Self {
        Self {
            name,
            key,
            test,
            limit: 0.0,
        }
    }
}

impl Rule for NumberBound {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.limit = params.number(0)?;
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let ok = cx
            .value
            .as_number()
            .is_some_and(|n| (self.test)(n, self.limit));
        cx.check(ok, self.name, || context([(self.key, Value::from(self.limit))]))
    }
}

/// Argument-free predicate with an optional conversion.
#[derive(Clone)]
pub struct Check {
    name: &'static str,
    test: fn(&Value) -> bool,
    convert: Option<fn(&Value) -> Option<Value>>,
}

impl Check {
    /// Create a check.
    pub fn new(name: &'static str, test: fn(&Value) -> bool) -> Self {
        Self {
            name,
            test,
            convert: None,
        }
    }

    /// Attach a conversion tried when the check fails.
    pub fn with_convert(mut self, convert: fn(&Value) -> Option<Value>) -> Self {
        self.convert = Some(convert);
        self
    }
}

impl Rule for Check {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.check((self.test)(cx.value), self.name, Context::new)
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        self.convert.and_then(|convert| convert(value))
    }
}
