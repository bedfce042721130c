//! Root-level rules available from every scope.

use crate::core::comparator::ValueSet;
use crate::core::context::RuleContext;
use crate::core::error::{context, Context, RuleError, SchemaError, ValidationError};
use crate::core::params::{Arg, Predicate, RuleParams};
use crate::core::rule::{Outcome, Priority, Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::ruleset::Ruleset;
use futures::future::FutureExt;
use std::any::Any as StdAny;
use std::panic::{self, AssertUnwindSafe};

/// Register the root-level rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(Any));
    ruleset.register(|| Box::new(Optional::default()));
    ruleset.register(|| Box::new(Required));
    ruleset.register(|| Box::new(Forbidden));
    ruleset.register(|| Box::new(Valid::default()));
    ruleset.register(|| Box::new(Invalid::default()));
    ruleset.register(|| Box::new(Allow::default()));
    ruleset.register(|| Box::new(Custom::default()));
    ruleset.register(|| Box::new(DefaultValue::default()));
}

/// Marker that accepts anything.
#[derive(Debug, Clone, Default)]
pub struct Any;

impl Rule for Any {
    fn name(&self) -> &'static str {
        "any"
    }

    fn operates(&self) -> bool {
        false
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.pass()
    }
}

/// Accepts `Undefined` and skips the remaining rules.
#[derive(Debug, Clone, Default)]
pub struct Optional {
    enabled: bool,
}

impl Optional {
    /// Stop accepting `Undefined`.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Check if `Undefined` is still accepted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Rule for Optional {
    fn name(&self) -> &'static str {
        "optional"
    }

    fn compile(&mut self, _params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.enabled = true;
        Ok(())
    }

    fn priority(&self) -> Priority {
        Priority::HALTER
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        if self.enabled && cx.value.is_undefined() {
            cx.abort()
        } else {
            cx.pass()
        }
    }
}

/// Rejects `Undefined`.
#[derive(Debug, Clone, Default)]
pub struct Required;

impl Rule for Required {
    fn name(&self) -> &'static str {
        "required"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        params.invoke_all::<Optional>(Optional::disable);
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.check(cx.value.is_defined(), self.name(), Context::new)
    }
}

/// Rejects every defined value.
#[derive(Debug, Clone, Default)]
pub struct Forbidden;

impl Rule for Forbidden {
    fn name(&self) -> &'static str {
        "forbidden"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.check(cx.value.is_undefined(), self.name(), Context::new)
    }
}

// ============================================================================
// Value-set rules
// ============================================================================

/// Read the call values and fold them into the first earlier rule of the
/// same type. Returns whether this rule keeps operating.
fn merge_values<T, F>(params: &mut RuleParams<'_>, own: &mut ValueSet, set_of: F) -> Result<bool, SchemaError>
where
    T: Rule,
    F: FnOnce(&mut T) -> &mut ValueSet,
{
    let mut pending = Some(params.values()?);
    params.invoke_first::<T>(|first| {
        if let Some(values) = pending.take() {
            set_of(first).add_values(values);
        }
    });
    match pending {
        Some(values) => {
            own.add_values(values);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Only accepts listed values; a match ends validation.
#[derive(Debug, Clone, Default)]
pub struct Valid {
    set: ValueSet,
    operating: bool,
}

impl Valid {
    /// Get the accepted values.
    pub fn values(&self) -> &ValueSet {
        &self.set
    }
}

impl Rule for Valid {
    fn name(&self) -> &'static str {
        "valid"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.operating = merge_values::<Valid, _>(params, &mut self.set, |r| &mut r.set)?;
        Ok(())
    }

    fn operates(&self) -> bool {
        self.operating
    }

    fn priority(&self) -> Priority {
        Priority::HALTER
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        if self.set.contains(cx.value) {
            return cx.abort();
        }
        cx.fail(
            self.name(),
            context([("allowed", Value::Array(self.set.values().to_vec()))]),
        )
    }

    fn value_set_mut(&mut self) -> Option<&mut ValueSet> {
        Some(&mut self.set)
    }
}

/// Rejects listed values.
///
/// Its values are also taken out of every `valid` and `allow` set, so a value
/// that is both allowed and invalid is rejected.
#[derive(Debug, Clone, Default)]
pub struct Invalid {
    set: ValueSet,
    operating: bool,
}

impl Rule for Invalid {
    fn name(&self) -> &'static str {
        "invalid"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let values = params.values()?;
        params.invoke_all::<Valid>(|rule| rule.set.remove_values(&values));
        params.invoke_all::<Allow>(|rule| rule.set.remove_values(&values));
        self.operating = merge_values::<Invalid, _>(params, &mut self.set, |r| &mut r.set)?;
        Ok(())
    }

    fn operates(&self) -> bool {
        self.operating
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let listed = self.set.contains(cx.value);
        cx.check(!listed, self.name(), || context([("value", cx.value.clone())]))
    }

    fn value_set_mut(&mut self) -> Option<&mut ValueSet> {
        Some(&mut self.set)
    }
}

/// Accepts listed values without further checks; others continue.
#[derive(Debug, Clone, Default)]
pub struct Allow {
    set: ValueSet,
    operating: bool,
}

impl Rule for Allow {
    fn name(&self) -> &'static str {
        "allow"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.operating = merge_values::<Allow, _>(params, &mut self.set, |r| &mut r.set)?;
        Ok(())
    }

    fn operates(&self) -> bool {
        self.operating
    }

    fn priority(&self) -> Priority {
        Priority::HALTER
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        if self.set.contains(cx.value) {
            cx.abort()
        } else {
            cx.pass()
        }
    }

    fn value_set_mut(&mut self) -> Option<&mut ValueSet> {
        Some(&mut self.set)
    }
}

// ============================================================================
// Custom and default
// ============================================================================

/// Runs a user predicate.
///
/// A predicate error fails with its message. A panic, raised either by the
/// call or while polling the returned future, fails with
/// `Failed with error <panic message>`.
#[derive(Default)]
pub struct Custom {
    predicate: Option<Predicate>,
}

fn panic_message(payload: &(dyn StdAny + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Custom {
    fn failure(&self, cx: &RuleContext<'_>, message: String) -> RuleError {
        let mut err: ValidationError =
            self.error(cx, context([("message", Value::from(message.as_str()))]));
        err.attach_messages(|_| Some(message.clone()));
        err.into()
    }
}

impl Rule for Custom {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let predicate = params
            .arg(0)
            .and_then(Arg::as_predicate)
            .ok_or_else(|| params.invalid("argument 0 must be a predicate"))?;
        self.predicate = Some(predicate.clone());
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(predicate) = &self.predicate else {
            return cx.pass();
        };
        let value = cx.value.clone();
        let started = panic::catch_unwind(AssertUnwindSafe(|| predicate(value)));

        async move {
            let result = match started {
                Ok(check) => AssertUnwindSafe(check).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            match result {
                Ok(Ok(())) => Ok(Outcome::Pass),
                Ok(Err(err)) => Err(self.failure(&cx, err.to_string())),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::warn!("{}: custom predicate panicked: {}", cx.path, message);
                    Err(self.failure(&cx, format!("Failed with error {}", message)))
                }
            }
        }
        .boxed()
    }
}

/// Substitutes a value for `Undefined` input.
///
/// Always sorts first. When chained more than once, the last call wins.
#[derive(Debug, Clone, Default)]
pub struct DefaultValue {
    value: Value,
    operating: bool,
}

impl Rule for DefaultValue {
    fn name(&self) -> &'static str {
        "default"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let mut value = Some(params.value(0)?.clone());
        params.invoke_first::<DefaultValue>(|first| {
            if let Some(value) = value.take() {
                first.value = value;
            }
        });
        if let Some(value) = value {
            self.value = value;
            self.operating = true;
        }
        Ok(())
    }

    fn operates(&self) -> bool {
        self.operating
    }

    fn priority(&self) -> Priority {
        Priority::VALUE_OVERRIDE
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.pass()
    }

    fn default_value(&self) -> Option<&Value> {
        Some(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::Value;
    use crate::validator::{ValidationOptions, Validator};

    fn rules_of(outcome: crate::validator::ValidationOutcome) -> Vec<String> {
        outcome
            .error
            .map(|e| e.details().iter().map(|d| d.rule.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_optional_halts_on_undefined() {
        let jo = Validator::new();
        let schema = jo.schema().string().max(3);
        let outcome = jo
            .validate_sync(Value::Undefined, &schema, &ValidationOptions::new())
            .unwrap();
        assert!(outcome.is_ok());
        assert_eq!(outcome.value, Value::Undefined);
    }

    #[test]
    fn test_required_overrides_optional() {
        let jo = Validator::new();
        let schema = jo.schema().optional().required();
        let outcome = jo
            .validate_sync(Value::Undefined, &schema, &ValidationOptions::new())
            .unwrap();
        assert_eq!(rules_of(outcome.clone()), ["required"]);
        assert_eq!(outcome.error.unwrap().to_string(), "\"value\" is required.");
    }

    #[test]
    fn test_forbidden() {
        let jo = Validator::new();
        let schema = jo.schema().forbidden();
        let options = ValidationOptions::new();
        assert!(jo.validate_sync(Value::Undefined, &schema, &options).unwrap().is_ok());
        assert_eq!(rules_of(jo.validate_sync(1, &schema, &options).unwrap()), ["forbidden"]);
    }

    #[test]
    fn test_valid_calls_accumulate() {
        let jo = Validator::new();
        let schema = jo.schema().valid(["a"]).valid(["b"]);
        let options = ValidationOptions::new();
        assert_eq!(schema.rule_names().unwrap(), ["optional", "valid"]);
        assert!(jo.validate_sync("a", &schema, &options).unwrap().is_ok());
        assert!(jo.validate_sync("b", &schema, &options).unwrap().is_ok());

        let outcome = jo.validate_sync("c", &schema, &options).unwrap();
        let err = outcome.error.unwrap();
        let detail = err.first().unwrap();
        assert_eq!(detail.rule, "valid");
        assert_eq!(detail.get("allowed"), Some(&Value::from(vec!["a", "b"])));
        assert_eq!(err.to_string(), "\"value\" is not valid and must be a,b.");
    }

    #[test]
    fn test_valid_accepts_single_array_argument() {
        let jo = Validator::new();
        let schema = jo.schema().valid([Value::from(vec![1, 2])]);
        let options = ValidationOptions::new();
        assert!(jo.validate_sync(2, &schema, &options).unwrap().is_ok());
        assert!(!jo.validate_sync(3, &schema, &options).unwrap().is_ok());
    }

    #[test]
    fn test_valid_skips_type_checks() {
        let jo = Validator::new();
        let schema = jo.schema().number().valid(["n/a"]);
        assert!(jo.validate_sync("n/a", &schema, &ValidationOptions::new()).unwrap().is_ok());
    }

    #[test]
    fn test_invalid_wins_over_allow() {
        let jo = Validator::new();
        let schema = jo.schema().string().allow(["x", "y"]).invalid(["x"]);
        let options = ValidationOptions::new();
        assert!(jo.validate_sync("y", &schema, &options).unwrap().is_ok());

        let outcome = jo.validate_sync("x", &schema, &options).unwrap();
        let err = outcome.error.unwrap();
        assert_eq!(err.first().unwrap().rule, "invalid");
        assert_eq!(err.to_string(), "\"value\" must not equal x.");
    }

    #[test]
    fn test_invalid_can_empty_valid() {
        let jo = Validator::new();
        let schema = jo.schema().valid(["x"]).invalid(["x"]);
        let outcome = jo.validate_sync("x", &schema, &ValidationOptions::new()).unwrap();
        let err = outcome.error.unwrap();
        let detail = err.first().unwrap();
        assert_eq!(detail.rule, "valid");
        assert_eq!(detail.message.as_deref(), Some("\"value\" is not valid."));
    }

    #[test]
    fn test_allow_passes_listed_values() {
        let jo = Validator::new();
        let schema = jo.schema().string().allow([1]);
        let options = ValidationOptions::new().with_convert(false);
        assert!(jo.validate_sync(1, &schema, &options).unwrap().is_ok());
        assert_eq!(rules_of(jo.validate_sync(2, &schema, &options).unwrap()), ["string"]);
    }

    #[test]
    fn test_custom_predicate_error_message() {
        let jo = Validator::new();
        let schema = jo.schema().custom(|value| match value.as_number() {
            Some(n) if n > 10.0 => Ok(()),
            _ => Err(anyhow::anyhow!("must be large")),
        });
        let options = ValidationOptions::new();
        assert!(jo.validate_sync(11, &schema, &options).unwrap().is_ok());

        let err = jo.validate_sync(1, &schema, &options).unwrap().error.unwrap();
        assert_eq!(err.first().unwrap().rule, "custom");
        assert_eq!(err.to_string(), "must be large");
    }

    #[test]
    fn test_custom_predicate_panic_is_caught() {
        let jo = Validator::new();
        let schema = jo.schema().custom(|_| panic!("boom"));
        let outcome = jo.validate_sync(1, &schema, &ValidationOptions::new()).unwrap();
        assert_eq!(outcome.error.unwrap().to_string(), "Failed with error boom");
    }

    #[test]
    fn test_custom_async_panic_is_caught() {
        let jo = Validator::new();
        let schema = jo.schema().custom_async(|value| async move {
            if value.is_defined() {
                panic!("late boom");
            }
            Ok(())
        });
        let outcome = futures::executor::block_on(jo.validate(1, &schema, &ValidationOptions::new()))
            .unwrap();
        assert_eq!(outcome.error.unwrap().to_string(), "Failed with error late boom");
    }

    #[test]
    fn test_last_default_wins() {
        let jo = Validator::new();
        let schema = jo.schema().default(1).default(2);
        assert_eq!(schema.rule_names().unwrap(), ["default", "optional"]);
        let outcome = jo
            .validate_sync(Value::Undefined, &schema, &ValidationOptions::new())
            .unwrap();
        assert_eq!(outcome.value, Value::from(2));
    }
}
