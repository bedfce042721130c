//! Object rules.

use crate::core::context::RuleContext;
use crate::core::error::{context, Context, RuleError, SchemaError};
use crate::core::params::{Arg, RuleParams};
use crate::core::rule::{Outcome, Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::ruleset::Ruleset;
use crate::schema::Schema;
use crate::validator::join::all_must_pass;
use futures::future::FutureExt;
use indexmap::IndexMap;
use regex::Regex;

/// Register the object rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(ObjectType));
    ruleset.register(|| Box::new(Keys::default()));
    ruleset.register(|| Box::new(Pattern::default()));
    ruleset.register(|| Box::new(Unknown));
}

fn unknown_key(cx: &RuleContext<'_>, key: &str) -> RuleError {
    cx.error("object.unknown", context([("key", Value::from(key))]))
        .into()
}

/// Requires an object.
#[derive(Debug, Clone, Default)]
pub struct ObjectType;

impl Rule for ObjectType {
    fn name(&self) -> &'static str {
        "object"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.check(cx.value.as_object().is_some(), self.name(), Context::new)
    }
}

/// Declared members and their schemas.
///
/// Repeated calls merge into the first one. Members not declared here and
/// not matched by a sibling pattern are rejected unless unknown members are
/// allowed.
#[derive(Debug, Clone, Default)]
pub struct Keys {
    keys: IndexMap<String, Schema>,
    patterns: Vec<Regex>,
    allow_unknown: bool,
    operating: bool,
}

impl Keys {
    /// Add or replace member schemas.
    pub fn merge(&mut self, keys: IndexMap<String, Schema>, patterns: Vec<Regex>) {
        self.keys.extend(keys);
        self.patterns.extend(patterns);
    }

    /// Allow or forbid undeclared members.
    pub fn set_allow_unknown(&mut self, allow: bool) {
        self.allow_unknown = allow;
    }

    /// Treat members matching `pattern` as known.
    pub fn add_pattern(&mut self, pattern: Regex) {
        self.patterns.push(pattern);
    }

    fn is_known(&self, key: &str) -> bool {
        self.keys.contains_key(key) || self.patterns.iter().any(|p| p.is_match(key))
    }
}

impl Rule for Keys {
    fn name(&self) -> &'static str {
        "object.keys"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let keys = params
            .arg(0)
            .and_then(Arg::as_keys)
            .cloned()
            .ok_or_else(|| params.invalid("argument 0 must be a key map"))?;

        // patterns may have registered before this rule compiled
        let mut pending = Some((keys, std::mem::take(&mut self.patterns)));
        params.invoke_first::<Keys>(|first| {
            if let Some((keys, patterns)) = pending.take() {
                first.merge(keys, patterns);
            }
        });
        if let Some((keys, patterns)) = pending {
            self.merge(keys, patterns);
            self.operating = true;
        }
        Ok(())
    }

    fn operates(&self) -> bool {
        self.operating
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(object) = cx.value.as_object() else {
            return cx.fail(self.name(), Context::new());
        };

        if !self.allow_unknown {
            if let Some(extra) = object.keys().find(|key| !self.is_known(key)) {
                return futures::future::ready(Err(unknown_key(&cx, extra))).boxed();
            }
        }

        async move {
            let checks = self.keys.iter().map(|(key, schema)| {
                let member = object.get(key).cloned().unwrap_or_default();
                cx.validate_nested(member, schema, cx.path.key(key.as_str()))
            });
            let values = all_must_pass(checks).await?;

            if !cx.options.convert {
                return Ok(Outcome::Pass);
            }
            let mut updated = object.clone();
            for (key, value) in self.keys.keys().zip(values) {
                if value.is_defined() {
                    updated.insert(key.clone(), value);
                }
            }
            Ok(Outcome::Replace(Value::Object(updated)))
        }
        .boxed()
    }
}

/// Validates every member whose name matches a regex.
///
/// Without a sibling `keys` rule, members that do not match are rejected
/// unless unknown members are allowed.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    regex: Option<Regex>,
    schema: Option<Schema>,
    has_keys: bool,
    allow_unknown: bool,
}

impl Pattern {
    /// Allow or forbid members that do not match.
    pub fn set_allow_unknown(&mut self, allow: bool) {
        self.allow_unknown = allow;
    }
}

impl Rule for Pattern {
    fn name(&self) -> &'static str {
        "object.pattern"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let regex = params
            .arg(0)
            .and_then(Arg::as_regex)
            .cloned()
            .ok_or_else(|| params.invalid("argument 0 must be a regex"))?;
        let schema = params.schema(1)?.clone();

        self.has_keys = params.invoke_all::<Keys>(|keys| keys.add_pattern(regex.clone()));
        self.regex = Some(regex);
        self.schema = Some(schema);
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let (Some(regex), Some(schema)) = (&self.regex, &self.schema) else {
            return cx.pass();
        };
        let Some(object) = cx.value.as_object() else {
            return cx.fail(self.name(), Context::new());
        };

        let strict = !self.has_keys && !self.allow_unknown;
        if strict {
            if let Some(extra) = object.keys().find(|key| !regex.is_match(key)) {
                return futures::future::ready(Err(unknown_key(&cx, extra))).boxed();
            }
        }

        async move {
            let matching: Vec<&String> = object.keys().filter(|key| regex.is_match(key)).collect();
            let checks = matching.iter().map(|key| {
                let member = object.get(key.as_str()).cloned().unwrap_or_default();
                cx.validate_nested(member, schema, cx.path.key(key.as_str()))
            });
            let values = all_must_pass(checks).await?;

            if !cx.options.convert {
                return Ok(Outcome::Pass);
            }
            let mut updated = object.clone();
            for (key, value) in matching.into_iter().zip(values) {
                if value.is_defined() {
                    updated.insert(key.clone(), value);
                }
            }
            Ok(Outcome::Replace(Value::Object(updated)))
        }
        .boxed()
    }
}

/// Allows or forbids undeclared members on the nearest preceding `keys` and
/// `pattern` rules.
#[derive(Debug, Clone, Default)]
pub struct Unknown;

impl Rule for Unknown {
    fn name(&self) -> &'static str {
        "object.unknown"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let allow = params.flag(0)?;
        params.invoke_last::<Keys>(|keys| keys.set_allow_unknown(allow));
        params.invoke_last::<Pattern>(|pattern| pattern.set_allow_unknown(allow));
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
    use regex::Regex;
    use serde_json::json;

    fn input(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_unknown_key_rejected() {
        let jo = Validator::new();
        let schema = jo.schema().object().keys([("a", jo.schema().any())]);
        let outcome = jo
            .validate_sync(input(json!({"b": 42})), &schema, &ValidationOptions::new())
            .unwrap();

        let err = outcome.error.unwrap();
        assert_eq!(err.details().len(), 1);
        let detail = err.first().unwrap();
        assert_eq!(detail.rule, "object.unknown");
        assert_eq!(detail.path.to_string(), "value");
        assert_eq!(detail.context.len(), 1);
        assert_eq!(detail.get("key"), Some(&Value::from("b")));
        assert_eq!(detail.message.as_deref(), Some("\"value\" should not have \"b\"."));
    }

    #[test]
    fn test_unknown_modifier_allows_extra_keys() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .object()
            .keys([("a", jo.schema().number())])
            .unknown();
        assert_eq!(schema.rule_names().unwrap(), ["optional", "object", "object.keys"]);
        let outcome = jo
            .validate_sync(input(json!({"a": 1, "b": 2})), &schema, &ValidationOptions::new())
            .unwrap();
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_nested_failure_path() {
        let jo = Validator::new();
        let schema = jo.schema().object().keys([(
            "user",
            jo.schema().object().keys([("age", jo.schema().number().required())]),
        )]);
        let outcome = jo
            .validate_sync(input(json!({"user": {"age": "old"}})), &schema, &ValidationOptions::new())
            .unwrap();
        let detail = outcome.error.unwrap().first().cloned().unwrap();
        assert_eq!(detail.rule, "number");
        assert_eq!(detail.path.to_string(), "value.user.age");
        assert_eq!(detail.message.as_deref(), Some("\"age\" must be a number."));
    }

    #[test]
    fn test_coerced_members_written_back() {
        let jo = Validator::new();
        let schema = jo.schema().object().keys([
            ("n", jo.schema().number()),
            ("tag", jo.schema().string().default("none")),
        ]);
        let value = input(json!({"n": "5"}));

        let outcome = jo.validate_sync(value.clone(), &schema, &ValidationOptions::new()).unwrap();
        assert_eq!(outcome.value.to_json(), json!({"n": 5.0, "tag": "none"}));

        let strict = ValidationOptions::new().with_convert(false);
        let outcome = jo.validate_sync(value, &schema, &strict).unwrap();
        assert_eq!(outcome.error.unwrap().first().unwrap().rule, "number");
    }

    #[test]
    fn test_keys_merge() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .object()
            .keys([("a", jo.schema().number())])
            .keys([("b", jo.schema().string())]);
        assert_eq!(schema.rule_names().unwrap(), ["optional", "object", "object.keys"]);
        let outcome = jo
            .validate_sync(input(json!({"a": 1, "b": "x"})), &schema, &ValidationOptions::new())
            .unwrap();
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_non_object_rejected_before_keys() {
        let jo = Validator::new();
        let schema = jo.schema().object().keys([("a", jo.schema().number())]);
        let outcome = jo.validate_sync(Value::Null, &schema, &ValidationOptions::new()).unwrap();
        assert_eq!(outcome.error.unwrap().to_string(), "\"value\" must be an object.");
    }

    #[test]
    fn test_pattern_alone_rejects_other_keys() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .object()
            .pattern(Regex::new("^x_").unwrap(), jo.schema().number());
        let relaxed = schema.unknown();
        let options = ValidationOptions::new();

        let outcome = jo.validate_sync(input(json!({"x_a": "1"})), &schema, &options).unwrap();
        assert_eq!(outcome.value.to_json(), json!({"x_a": 1.0}));

        let outcome = jo.validate_sync(input(json!({"x_a": 1, "y": 2})), &schema, &options).unwrap();
        let detail = outcome.error.unwrap().first().cloned().unwrap();
        assert_eq!(detail.rule, "object.unknown");
        assert_eq!(detail.get("key"), Some(&Value::from("y")));

        assert!(jo
            .validate_sync(input(json!({"x_a": 1, "y": 2})), &relaxed, &options)
            .unwrap()
            .is_ok());
    }

    #[test]
    fn test_pattern_with_keys() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .object()
            .keys([("id", jo.schema().string())])
            .pattern(Regex::new("^n").unwrap(), jo.schema().number());
        let options = ValidationOptions::new().with_convert(false);

        assert!(jo
            .validate_sync(input(json!({"id": "a", "n1": 1, "n2": 2})), &schema, &options)
            .unwrap()
            .is_ok());

        let outcome = jo
            .validate_sync(input(json!({"id": "a", "n1": "x"})), &schema, &options)
            .unwrap();
        assert_eq!(outcome.error.unwrap().first().unwrap().path.to_string(), "value.n1");

        let outcome = jo
            .validate_sync(input(json!({"id": "a", "other": 1})), &schema, &options)
            .unwrap();
        assert_eq!(outcome.error.unwrap().first().unwrap().rule, "object.unknown");
    }
}
