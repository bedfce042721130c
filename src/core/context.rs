//! Per-invocation context handed to [`Rule::validate`](crate::core::rule::Rule::validate).

use crate::core::error::{Context, RuleError, ValidationError};
use crate::core::path::Path;
use crate::core::rule::{Outcome, RuleFuture};
use crate::core::types::Value;
use crate::schema::Schema;
use crate::validator::{ValidationOptions, Validator};
use futures::future::{self, Future, FutureExt};

/// Everything a rule sees while checking one value.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// Value under validation
    pub value: &'a Value,
    /// Location of the value below the validation root
    pub path: &'a Path,
    /// Options of the current run
    pub options: &'a ValidationOptions,
    /// Validator running this rule, for nested validation
    pub validator: &'a Validator,
}

impl<'a> RuleContext<'a> {
    /// Build a failure at the current path.
    pub fn error(&self, rule: &str, info: Context) -> ValidationError {
        ValidationError::new(rule, self.path.clone(), info)
    }

    /// Resolve immediately with a pass.
    pub fn pass(self) -> RuleFuture<'a> {
        future::ready(Ok(Outcome::Pass)).boxed()
    }

    /// Resolve immediately with an abort.
    pub fn abort(self) -> RuleFuture<'a> {
        future::ready(Ok(Outcome::Abort)).boxed()
    }

    /// Resolve immediately with a failure of `rule`.
    pub fn fail(self, rule: &str, info: Context) -> RuleFuture<'a> {
        let err = self.error(rule, info);
        future::ready(Err(err.into())).boxed()
    }

    /// Pass when `ok`, otherwise fail with the lazily built context.
    pub fn check<F>(self, ok: bool, rule: &str, info: F) -> RuleFuture<'a>
    where
        F: FnOnce() -> Context,
    {
        if ok {
            self.pass()
        } else {
            self.fail(rule, info())
        }
    }

    /// Validate a nested value against `schema` with the current options.
    ///
    /// Resolves to the accepted (possibly coerced) value, or to the nested
    /// failure.
    pub fn validate_nested(
        &self,
        value: Value,
        schema: &'a Schema,
        path: Path,
    ) -> impl Future<Output = Result<Value, RuleError>> + Send + 'a {
        self.validator
            .validate_at(value, schema, self.options, path)
            .map(|result| match result {
                Ok(outcome) => outcome.into_result().map_err(RuleError::from),
                Err(usage) => Err(RuleError::from(usage)),
            })
    }
}
