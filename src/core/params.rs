//! Call-time arguments and the compile-time sibling lookup.

use crate::core::comparator::{Comparator, ValueSet};
use crate::core::error::SchemaError;
use crate::core::rule::{Rule, RuleInstance};
use crate::core::types::Value;
use crate::schema::Schema;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// User predicate for `custom` rules.
///
/// Receives an owned copy of the value so the returned future may outlive the
/// validation borrow.
pub type Predicate = Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// One argument passed to a chained rule method.
#[derive(Clone)]
pub enum Arg {
    /// Plain data
    Value(Value),
    /// Nested schema
    Schema(Schema),
    /// Object key schemas
    Keys(IndexMap<String, Schema>),
    /// Regular expression
    Regex(Regex),
    /// Equality override
    Comparator(Comparator),
    /// Custom check
    Predicate(Predicate),
}

impl Arg {
    /// Get the plain value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        if let Arg::Value(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Get the schema, if this is one.
    pub fn as_schema(&self) -> Option<&Schema> {
        if let Arg::Schema(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Get the key map, if this is one.
    pub fn as_keys(&self) -> Option<&IndexMap<String, Schema>> {
        if let Arg::Keys(k) = self {
            Some(k)
        } else {
            None
        }
    }

    /// Get the regular expression, if this is one.
    pub fn as_regex(&self) -> Option<&Regex> {
        if let Arg::Regex(r) = self {
            Some(r)
        } else {
            None
        }
    }

    /// Get the comparator, if this is one.
    pub fn as_comparator(&self) -> Option<&Comparator> {
        if let Arg::Comparator(c) = self {
            Some(c)
        } else {
            None
        }
    }

    /// Get the predicate, if this is one.
    pub fn as_predicate(&self) -> Option<&Predicate> {
        if let Arg::Predicate(p) = self {
            Some(p)
        } else {
            None
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Arg::Value(a), Arg::Value(b)) => a == b,
            (Arg::Schema(a), Arg::Schema(b)) => a.ptr_eq(b),
            (Arg::Keys(a), Arg::Keys(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, sa), (kb, sb))| ka == kb && sa.ptr_eq(sb))
            }
            (Arg::Regex(a), Arg::Regex(b)) => a.as_str() == b.as_str(),
            (Arg::Comparator(a), Arg::Comparator(b)) => Arc::ptr_eq(a, b),
            (Arg::Predicate(a), Arg::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => write!(f, "{:?}", v),
            Arg::Schema(s) => write!(f, "{:?}", s),
            Arg::Keys(k) => f.debug_map().entries(k.iter()).finish(),
            Arg::Regex(r) => write!(f, "/{}/", r.as_str()),
            Arg::Comparator(_) => write!(f, "<comparator>"),
            Arg::Predicate(_) => write!(f, "<predicate>"),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<Schema> for Arg {
    fn from(s: Schema) -> Self {
        Arg::Schema(s)
    }
}

impl From<&Schema> for Arg {
    fn from(s: &Schema) -> Self {
        Arg::Schema(s.clone())
    }
}

impl From<Regex> for Arg {
    fn from(r: Regex) -> Self {
        Arg::Regex(r)
    }
}

impl From<IndexMap<String, Schema>> for Arg {
    fn from(k: IndexMap<String, Schema>) -> Self {
        Arg::Keys(k)
    }
}

// ============================================================================
// RuleParams
// ============================================================================

/// Compile-time view of one rule's arguments and its compiled siblings.
///
/// The siblings are split around the rule being compiled, so the rule itself
/// is never reachable through a lookup.
pub struct RuleParams<'r> {
    name: &'static str,
    args: &'r [Arg],
    before: &'r mut [RuleInstance],
    after: &'r mut [RuleInstance],
}

impl<'r> RuleParams<'r> {
    /// Create a view for the rule named `name`.
    pub fn new(
        name: &'static str,
        args: &'r [Arg],
        before: &'r mut [RuleInstance],
        after: &'r mut [RuleInstance],
    ) -> Self {
        Self {
            name,
            args,
            before,
            after,
        }
    }

    /// Index of the rule in the sorted list.
    pub fn index(&self) -> usize {
        self.before.len()
    }

    /// Get all call arguments.
    pub fn args(&self) -> &'r [Arg] {
        self.args
    }

    /// Get one call argument.
    pub fn arg(&self, index: usize) -> Option<&'r Arg> {
        self.args.get(index)
    }

    /// Build an argument error for this rule.
    pub fn invalid(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::InvalidArguments {
            rule: self.name.to_string(),
            reason: reason.into(),
        }
    }

    /// Plain value argument at `index`.
    pub fn value(&self, index: usize) -> Result<&'r Value, SchemaError> {
        self.arg(index)
            .and_then(Arg::as_value)
            .ok_or_else(|| self.invalid(format!("argument {} must be a value", index)))
    }

    /// Numeric argument at `index`.
    pub fn number(&self, index: usize) -> Result<f64, SchemaError> {
        self.value(index)?
            .as_number()
            .filter(|n| !n.is_nan())
            .ok_or_else(|| self.invalid(format!("argument {} must be a number", index)))
    }

    /// Non-negative integer argument at `index`.
    pub fn count(&self, index: usize) -> Result<usize, SchemaError> {
        let n = self.number(index)?;
        if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
            return Err(self.invalid(format!("argument {} must be a non-negative integer", index)));
        }
        Ok(n as usize)
    }

    /// Optional boolean flag at `index`, defaulting to true when absent.
    pub fn flag(&self, index: usize) -> Result<bool, SchemaError> {
        match self.arg(index) {
            None | Some(Arg::Value(Value::Undefined)) => Ok(true),
            Some(Arg::Value(Value::Boolean(b))) => Ok(*b),
            Some(_) => Err(self.invalid(format!("argument {} must be a boolean", index))),
        }
    }

    /// Schema argument at `index`.
    pub fn schema(&self, index: usize) -> Result<&'r Schema, SchemaError> {
        self.arg(index)
            .and_then(Arg::as_schema)
            .ok_or_else(|| self.invalid(format!("argument {} must be a schema", index)))
    }

    /// Every argument as a schema.
    pub fn schemas(&self) -> Result<Vec<Schema>, SchemaError> {
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.as_schema()
                    .cloned()
                    .ok_or_else(|| self.invalid(format!("argument {} must be a schema", i)))
            })
            .collect()
    }

    /// Value-list arguments: either a single array or the arguments themselves.
    pub fn values(&self) -> Result<Vec<Value>, SchemaError> {
        if let [Arg::Value(Value::Array(items))] = self.args {
            return Ok(items.clone());
        }
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.as_value()
                    .cloned()
                    .ok_or_else(|| self.invalid(format!("argument {} must be a value", i)))
            })
            .collect()
    }

    /// Invoke `f` on the nearest preceding sibling of type `T`.
    pub fn invoke_last<T: Rule>(&mut self, f: impl FnOnce(&mut T)) -> bool {
        match self.before.iter_mut().rev().find_map(|r| r.downcast_mut::<T>()) {
            Some(rule) => {
                f(rule);
                true
            }
            None => false,
        }
    }

    /// Invoke `f` on the furthest preceding sibling of type `T`.
    pub fn invoke_first<T: Rule>(&mut self, f: impl FnOnce(&mut T)) -> bool {
        match self.before.iter_mut().find_map(|r| r.downcast_mut::<T>()) {
            Some(rule) => {
                f(rule);
                true
            }
            None => false,
        }
    }

    /// Invoke `f` on the nearest following sibling of type `T`.
    pub fn invoke_next<T: Rule>(&mut self, f: impl FnOnce(&mut T)) -> bool {
        match self.after.iter_mut().find_map(|r| r.downcast_mut::<T>()) {
            Some(rule) => {
                f(rule);
                true
            }
            None => false,
        }
    }

    /// Invoke `f` on every sibling of type `T`, before and after.
    pub fn invoke_all<T: Rule>(&mut self, mut f: impl FnMut(&mut T)) -> bool {
        let mut found = false;
        for rule in self
            .before
            .iter_mut()
            .chain(self.after.iter_mut())
            .filter_map(|r| r.downcast_mut::<T>())
        {
            f(rule);
            found = true;
        }
        found
    }

    /// Invoke `f` on every sibling exposing a value set.
    pub fn invoke_value_sets(&mut self, mut f: impl FnMut(&mut ValueSet)) -> bool {
        let mut found = false;
        for set in self
            .before
            .iter_mut()
            .chain(self.after.iter_mut())
            .filter_map(|r| r.rule_mut().value_set_mut())
        {
            f(set);
            found = true;
        }
        found
    }
}

impl fmt::Debug for RuleParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleParams")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("index", &self.index())
            .field("siblings", &(self.before.len() + self.after.len()))
            .finish()
    }
}
