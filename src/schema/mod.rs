//! Schemas: persistent, lazily compiled programs of rule generators.
//!
//! Each chained call appends one generator to an immutable linked list and
//! returns a new [`Schema`]; the receiver is left untouched. The first
//! validation compiles the generators into a sorted, deduplicated rule list
//! and freezes the schema.

pub mod chain;
pub mod compiler;

use crate::core::error::SchemaError;
use crate::core::params::Arg;
use crate::core::rule::RuleInstance;
use crate::rules::ruleset::{NodeIndex, Ruleset};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// One queued chain call.
pub(crate) struct Generator {
    node: NodeIndex,
    args: Vec<Arg>,
    previous: Option<Arc<Generator>>,
}

impl Generator {
    /// Append the rule this call produces to `rules`.
    fn generate(&self, ruleset: &Ruleset, rules: &mut Vec<RuleInstance>) {
        // Intermediate namespaces carry no rule
        if let Some(factory) = ruleset.factory(self.node) {
            rules.push(RuleInstance::new(factory(), self.args.clone()));
        }
    }
}

struct SchemaInner {
    ruleset: Arc<Ruleset>,
    scope: NodeIndex,
    head: Option<Arc<Generator>>,
    error: Option<SchemaError>,
    compiled: OnceLock<Result<Vec<RuleInstance>, SchemaError>>,
}

/// An ordered program of rule generators.
///
/// Cloning is cheap and clones share the compiled state.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

impl Schema {
    /// Create an empty schema at the root of `ruleset`.
    pub fn new(ruleset: Arc<Ruleset>) -> Self {
        let scope = ruleset.root();
        Self::from_parts(ruleset, scope, None, None)
    }

    fn from_parts(
        ruleset: Arc<Ruleset>,
        scope: NodeIndex,
        head: Option<Arc<Generator>>,
        error: Option<SchemaError>,
    ) -> Self {
        Self {
            inner: Arc::new(SchemaInner {
                ruleset,
                scope,
                head,
                error,
                compiled: OnceLock::new(),
            }),
        }
    }

    /// Extend with a chained call, failing fast on misuse.
    ///
    /// Errors when the schema already holds a chain error, has been compiled,
    /// or `method` is not callable from the current scope.
    pub fn try_chain(&self, method: &str, args: Vec<Arg>) -> Result<Schema, SchemaError> {
        self.check()?;
        if self.is_compiled() {
            return Err(SchemaError::Frozen);
        }

        let inner = &self.inner;
        let node = inner
            .ruleset
            .resolve(inner.scope, method)
            .ok_or_else(|| SchemaError::UnknownRule {
                name: method.to_string(),
                scope: inner.ruleset.qualified_name(inner.scope),
            })?;

        let generator = Generator {
            node,
            args,
            previous: inner.head.clone(),
        };
        Ok(Self::from_parts(
            Arc::clone(&inner.ruleset),
            node,
            Some(Arc::new(generator)),
            None,
        ))
    }

    /// Extend with a chained call.
    ///
    /// Misuse is recorded in the returned schema and reported by
    /// [`Schema::check`] and by validation.
    pub fn chain(&self, method: &str, args: Vec<Arg>) -> Schema {
        match self.try_chain(method, args) {
            Ok(schema) => schema,
            Err(err) => {
                log::debug!("chain call '{}' rejected: {}", method, err);
                let first = self.inner.error.clone().unwrap_or(err);
                Self::from_parts(
                    Arc::clone(&self.inner.ruleset),
                    self.inner.scope,
                    self.inner.head.clone(),
                    Some(first),
                )
            }
        }
    }

    /// Report a recorded chain error.
    pub fn check(&self) -> Result<(), SchemaError> {
        match &self.inner.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Whether the rule list has been compiled (and the schema frozen).
    pub fn is_compiled(&self) -> bool {
        self.inner.compiled.get().is_some()
    }

    /// Get the compiled rule list, compiling on first use.
    pub fn rules(&self) -> Result<&[RuleInstance], SchemaError> {
        self.check()?;
        let inner = &self.inner;
        let compiled = inner
            .compiled
            .get_or_init(|| compiler::compile(self.generators()));
        match compiled {
            Ok(rules) => Ok(rules.as_slice()),
            Err(err) => Err(err.clone()),
        }
    }

    /// Names of the compiled rules, in execution order.
    pub fn rule_names(&self) -> Result<Vec<&'static str>, SchemaError> {
        Ok(self.rules()?.iter().map(RuleInstance::name).collect())
    }

    /// Full dotted name of the current chain scope.
    pub fn scope(&self) -> String {
        self.inner.ruleset.qualified_name(self.inner.scope)
    }

    /// Get the ruleset this schema resolves names against.
    pub fn ruleset(&self) -> &Arc<Ruleset> {
        &self.inner.ruleset
    }

    /// Check whether two handles refer to the same schema.
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Materialize the generators in call order.
    fn generators(&self) -> Vec<RuleInstance> {
        let mut calls = Vec::new();
        let mut current = self.inner.head.as_deref();
        while let Some(generator) = current {
            calls.push(generator);
            current = generator.previous.as_deref();
        }

        let mut rules = Vec::with_capacity(calls.len());
        for generator in calls.into_iter().rev() {
            generator.generate(&self.inner.ruleset, &mut rules);
        }
        rules
    }

    /// Number of chained calls.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut current = self.inner.head.as_deref();
        while let Some(generator) = current {
            count += 1;
            current = generator.previous.as_deref();
        }
        count
    }

    /// Check if nothing has been chained.
    pub fn is_empty(&self) -> bool {
        self.inner.head.is_none()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("scope", &self.scope())
            .field("calls", &self.len())
            .field("compiled", &self.is_compiled())
            .field("error", &self.inner.error)
            .finish()
    }
}

impl Drop for SchemaInner {
    fn drop(&mut self) {
        // Unlink iteratively so long chains do not recurse on drop
        let mut next = self.head.take();
        while let Some(generator) = next {
            next = match Arc::try_unwrap(generator) {
                Ok(mut owned) => owned.previous.take(),
                Err(_) => None,
            };
        }
    }
}
