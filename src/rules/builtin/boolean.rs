//! Boolean rule.

use crate::core::context::RuleContext;
use crate::core::error::Context;
use crate::core::rule::{Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::ruleset::Ruleset;

/// Register the boolean rule.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(BooleanType));
}

/// Requires `true` or `false`.
///
/// Only the strings `"true"` and `"false"` convert; numbers never do.
#[derive(Debug, Clone, Default)]
pub struct BooleanType;

impl Rule for BooleanType {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.check(cx.value.as_bool().is_some(), self.name(), Context::new)
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        let s = value.as_str()?.trim();
        if s.eq_ignore_ascii_case("true") {
            Some(Value::Boolean(true))
        } else if s.eq_ignore_ascii_case("false") {
            Some(Value::Boolean(false))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::Value;
    use crate::validator::{ValidationOptions, Validator};

    #[test]
    fn test_string_forms_convert() {
        let jo = Validator::new();
        let schema = jo.schema().boolean();
        let options = ValidationOptions::new();

        let outcome = jo.validate_sync(" TRUE ", &schema, &options).unwrap();
        assert_eq!(outcome.into_result(), Ok(Value::from(true)));
        let outcome = jo.validate_sync("false", &schema, &options).unwrap();
        assert_eq!(outcome.into_result(), Ok(Value::from(false)));

        let strict = ValidationOptions::new().with_convert(false);
        assert!(!jo.validate_sync("true", &schema, &strict).unwrap().is_ok());
    }

    #[test]
    fn test_numbers_never_convert() {
        let jo = Validator::new();
        let schema = jo.schema().boolean();
        let outcome = jo.validate_sync(1, &schema, &ValidationOptions::new()).unwrap();
        let err = outcome.error.unwrap();
        assert_eq!(err.to_string(), "\"value\" must be a boolean.");
        assert!(!jo.validate_sync("yes", &schema, &ValidationOptions::new()).unwrap().is_ok());
    }
}
