//! Alternative schemas.

use crate::core::context::RuleContext;
use crate::core::error::{Context, SchemaError};
use crate::core::rule::{Outcome, Rule, RuleFuture};
use crate::core::params::RuleParams;
use crate::rules::ruleset::Ruleset;
use crate::schema::Schema;
use crate::validator::join::first_success;
use futures::future::FutureExt;

/// Register the alternatives rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(Alternatives::default()));
    ruleset.register(|| Box::new(Try));
}

/// Passes when any of its schemas accepts the value.
#[derive(Debug, Clone, Default)]
pub struct Alternatives {
    schemas: Vec<Schema>,
}

impl Alternatives {
    /// Append more candidate schemas.
    pub fn add(&mut self, schemas: Vec<Schema>) {
        self.schemas.extend(schemas);
    }

    /// Get the candidate schemas.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }
}

impl Rule for Alternatives {
    fn name(&self) -> &'static str {
        "alternatives"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.schemas = params.schemas()?;
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        async move {
            let checks = self
                .schemas
                .iter()
                .map(|schema| cx.validate_nested(cx.value.clone(), schema, cx.path.clone()));

            match first_success(checks).await {
                Some(Ok(value)) => Ok(Outcome::Replace(value)),
                Some(Err(err)) => Err(err),
                None => Err(self.error(&cx, Context::new()).into()),
            }
        }
        .boxed()
    }
}

/// Adds schemas to the nearest preceding `alternatives`.
#[derive(Debug, Clone, Default)]
pub struct Try;

impl Rule for Try {
    fn name(&self) -> &'static str {
        "alternatives.try"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let schemas = params.schemas()?;
        params.invoke_last::<Alternatives>(|rule| rule.add(schemas));
        Ok(())
    }

    fn operates(&self) -> bool {
        false
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.pass()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::Value;
    use crate::validator::{ValidationOptions, Validator};

    #[test]
    fn test_any_alternative_may_pass() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .alternatives([jo.schema().number(), jo.schema().string()]);
        let options = ValidationOptions::new().with_convert(false);

        assert!(jo.validate_sync(1, &schema, &options).unwrap().is_ok());
        assert!(jo.validate_sync("x", &schema, &options).unwrap().is_ok());

        // both fail at once; the report comes from whichever completed first
        let outcome = jo.validate_sync(true, &schema, &options).unwrap();
        let err = outcome.error.unwrap();
        assert_eq!(err.details().len(), 1);
        assert!(["number", "string"].contains(&err.first().unwrap().rule.as_str()));
    }

    #[test]
    fn test_winner_value_is_used() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .alternatives([jo.schema().boolean(), jo.schema().number()]);
        let outcome = jo.validate_sync("12", &schema, &ValidationOptions::new()).unwrap();
        assert_eq!(outcome.into_result(), Ok(Value::from(12)));
    }

    #[test]
    fn test_try_extends_alternatives() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .alternatives([jo.schema().number()])
            .try_alternatives([jo.schema().string()]);
        assert_eq!(schema.rule_names().unwrap(), ["optional", "alternatives"]);
        assert!(jo
            .validate_sync("x", &schema, &ValidationOptions::new())
            .unwrap()
            .is_ok());
    }

    #[test]
    fn test_empty_alternatives_fail() {
        let jo = Validator::new();
        let schema = jo.schema().alternatives(Vec::new());
        let outcome = jo.validate_sync(1, &schema, &ValidationOptions::new()).unwrap();
        let err = outcome.error.unwrap();
        assert_eq!(err.first().unwrap().rule, "alternatives");
        assert_eq!(
            err.to_string(),
            "\"value\" does not match any of the allowed alternatives."
        );
    }
}
