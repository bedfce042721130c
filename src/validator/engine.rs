//! Validator implementation.
//!
//! The validator walks a compiled rule list front to back, threading the value
//! through every rule. Composite rules re-enter it through
//! [`Validator::validate_at`] for each nested value.

use crate::core::context::RuleContext;
use crate::core::error::{JojenError, JojenResult, RuleError, UsageError, ValidationError};
use crate::core::path::Path;
use crate::core::rule::{Outcome, Rule};
use crate::core::types::Value;
use crate::lang::Language;
use crate::rules::ruleset::{NodeIndex, RuleFactory, Ruleset};
use crate::schema::Schema;
use crate::validator::options::{ValidationOptions, ValidationOutcome};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;

/// How [`Validator::assert_with`] reports a failure.
#[derive(Debug, Default)]
pub enum AssertMessage {
    /// Return the validation error as is.
    #[default]
    None,
    /// Prefix the rendered message.
    Prefix(String),
    /// Return this error instead.
    Error(anyhow::Error),
}

/// Rule registry, language pack and interpreter in one handle.
///
/// Cloning is cheap. Registering rules on a clone copies the ruleset, so
/// schemas built earlier keep the rules they were built against.
#[derive(Clone)]
pub struct Validator {
    ruleset: Arc<Ruleset>,
    language: Option<Arc<Language>>,
}

impl Validator {
    /// Create a validator with the built-in rules and English messages.
    pub fn new() -> Self {
        Self {
            ruleset: Arc::new(Ruleset::with_builtins()),
            language: Some(Arc::new(Language::english())),
        }
    }

    /// Create a validator with no rules and no language.
    pub fn empty() -> Self {
        Self {
            ruleset: Arc::new(Ruleset::new()),
            language: None,
        }
    }

    /// Get the ruleset.
    pub fn ruleset(&self) -> &Arc<Ruleset> {
        &self.ruleset
    }

    /// Get the loaded language pack.
    pub fn language(&self) -> Option<&Language> {
        self.language.as_deref()
    }

    /// Bind a rule factory at an explicit path.
    pub fn add(&mut self, path: &[&str], factory: RuleFactory) -> NodeIndex {
        Arc::make_mut(&mut self.ruleset).add_rule(path, factory)
    }

    /// Register a rule under the name its instances report.
    pub fn register<F>(&mut self, factory: F) -> NodeIndex
    where
        F: Fn() -> Box<dyn Rule> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.ruleset).register(factory)
    }

    /// Load a language pack, replacing the current one.
    pub fn load(&mut self, language: Language) {
        log::debug!("loading language '{}'", language.name());
        self.language = Some(Arc::new(language));
    }

    /// Remove the language pack; messages stay unset.
    pub fn unload(&mut self) {
        self.language = None;
    }

    /// A fresh root-scope schema with nothing chained.
    pub fn root(&self) -> Schema {
        Schema::new(Arc::clone(&self.ruleset))
    }

    /// The base schema: root scope with `optional` chained when available.
    pub fn schema(&self) -> Schema {
        let root = self.root();
        if self.ruleset.contains("optional") {
            root.optional()
        } else {
            root
        }
    }

    /// Validate `value` against `schema`.
    ///
    /// A failed validation resolves to `Ok` with the error set in the
    /// outcome; `Err` is reserved for usage errors.
    pub fn validate<'a>(
        &'a self,
        value: impl Into<Value>,
        schema: &'a Schema,
        options: &'a ValidationOptions,
    ) -> BoxFuture<'a, Result<ValidationOutcome, UsageError>> {
        self.validate_at(value.into(), schema, options, options.path.clone())
    }

    /// Validate a value found at `path`. Entry point for nested validation.
    pub fn validate_at<'a>(
        &'a self,
        value: Value,
        schema: &'a Schema,
        options: &'a ValidationOptions,
        path: Path,
    ) -> BoxFuture<'a, Result<ValidationOutcome, UsageError>> {
        async move {
            let rules = schema.rules()?;
            let mut value = value;

            // A leading default provider either substitutes or steps aside
            let mut start = 0;
            if let Some(default) = rules.first().and_then(|r| r.rule().default_value()) {
                if value.is_undefined() {
                    log::trace!("{}: substituting default", path);
                    return Ok(ValidationOutcome::pass(default.clone()));
                }
                start = 1;
            }

            for instance in &rules[start..] {
                let rule = instance.rule();
                let mut retried = false;

                loop {
                    log::trace!("{}: running '{}'", path, rule.name());
                    let cx = RuleContext {
                        value: &value,
                        path: &path,
                        options,
                        validator: self,
                    };

                    match rule.validate(cx).await {
                        Ok(Outcome::Pass) => break,
                        Ok(Outcome::Replace(next)) => {
                            value = next;
                            break;
                        }
                        Ok(Outcome::Abort) => {
                            log::trace!("{}: '{}' accepted early", path, rule.name());
                            return Ok(ValidationOutcome::pass(value));
                        }
                        Err(RuleError::Usage(err)) => return Err(err),
                        Err(RuleError::Invalid(err)) => {
                            if options.convert && !retried {
                                if let Some(coerced) = rule.coerce(&value) {
                                    log::debug!("{}: '{}' coerced the value", path, rule.name());
                                    value = coerced;
                                    retried = true;
                                    continue;
                                }
                            }
                            return Ok(self.finish(value, err, options));
                        }
                    }
                }
            }

            Ok(ValidationOutcome::pass(value))
        }
        .boxed()
    }

    /// Validate without an executor.
    ///
    /// The validation future is polled exactly once. If a rule is still
    /// pending after that, the run is abandoned with
    /// [`UsageError::Suspended`].
    pub fn validate_sync(
        &self,
        value: impl Into<Value>,
        schema: &Schema,
        options: &ValidationOptions,
    ) -> Result<ValidationOutcome, UsageError> {
        match self.validate(value, schema, options).now_or_never() {
            Some(result) => result,
            None => Err(UsageError::Suspended),
        }
    }

    /// Validate synchronously and return the accepted value or the error.
    pub fn assert(&self, value: impl Into<Value>, schema: &Schema) -> JojenResult<Value> {
        self.assert_with(value, schema, AssertMessage::None)
    }

    /// Like [`Validator::assert`], with control over the reported failure.
    pub fn assert_with(
        &self,
        value: impl Into<Value>,
        schema: &Schema,
        message: AssertMessage,
    ) -> JojenResult<Value> {
        let options = ValidationOptions::default();
        let outcome = self.validate_sync(value, schema, &options)?;

        outcome.into_result().map_err(|err| match message {
            AssertMessage::None => JojenError::Validation(err),
            AssertMessage::Prefix(prefix) => JojenError::Validation(err.with_prefix(prefix)),
            AssertMessage::Error(custom) => JojenError::Custom(custom),
        })
    }

    fn finish(
        &self,
        value: Value,
        mut error: ValidationError,
        options: &ValidationOptions,
    ) -> ValidationOutcome {
        if let Some(language) = &self.language {
            error.attach_messages(|detail| language.format(detail));
        }
        if options.capture_stack {
            error.capture_stack();
        }
        ValidationOutcome::fail(value, error)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.ruleset.len())
            .field("language", &self.language.as_ref().map(|l| l.name().to_string()))
            .finish()
    }
}
