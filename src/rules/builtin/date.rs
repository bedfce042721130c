//! Date rules.

use crate::core::context::RuleContext;
use crate::core::error::Context;
use crate::core::rule::{Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::builtin::bounds::Check;
use crate::rules::ruleset::Ruleset;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

// Full date and time with an explicit zone; seconds and fraction optional.
static STRICT_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[01][0-9]-[0-3][0-9]T[0-2][0-9]:[0-5][0-9](:[0-5][0-9](\.[0-9]+)?)?([+-][0-2][0-9]:[0-5][0-9]|Z)$")
        .expect("strict iso regex")
});

/// Register the date rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(DateType));
    ruleset.register(|| {
        Box::new(Check::new("date.greaterThanNow", |v| {
            v.as_date().is_some_and(|date| *date > Utc::now())
        }))
    });
}

/// Parse a strict ISO-8601 date-time with an explicit zone.
pub fn parse_iso(input: &str) -> Option<DateTime<Utc>> {
    let captures = STRICT_ISO.captures(input)?;
    let normalized = match captures.get(1) {
        Some(_) => input.to_string(),
        None => format!("{}:00{}", &input[..16], &input[16..]),
    };
    DateTime::parse_from_rfc3339(&normalized)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Requires a date.
///
/// Strict ISO strings and millisecond timestamps convert.
#[derive(Debug, Clone, Default)]
pub struct DateType;

impl Rule for DateType {
    fn name(&self) -> &'static str {
        "date"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.check(cx.value.as_date().is_some(), self.name(), Context::new)
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        let date = match value {
            Value::String(s) => parse_iso(s),
            Value::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(n.trunc() as i64),
            _ => None,
        };
        date.map(Value::Date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{ValidationOptions, Validator};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_parse_iso_forms() {
        let expected = Utc.with_ymd_and_hms(2016, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_iso("2016-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_iso("2016-03-01T12:30Z"), Some(expected));
        assert_eq!(parse_iso("2016-03-01T14:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_iso("2016-03-01T12:30:00.250Z"),
            Some(expected + Duration::milliseconds(250))
        );
        assert_eq!(parse_iso("2016-03-01"), None);
        assert_eq!(parse_iso("2016-03-01T12:30:00"), None);
        assert_eq!(parse_iso("2016-13-01T12:30:00Z"), None);
    }

    #[test]
    fn test_date_conversion() {
        let jo = Validator::new();
        let schema = jo.schema().date();
        let options = ValidationOptions::new();

        let outcome = jo.validate_sync(0, &schema, &options).unwrap();
        assert_eq!(
            outcome.into_result(),
            Ok(Value::from(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()))
        );

        let outcome = jo.validate_sync("2016-03-01T12:30Z", &schema, &options).unwrap();
        assert!(outcome.is_ok());

        let err = jo
            .validate_sync("yesterday", &schema, &options)
            .unwrap()
            .error
            .unwrap();
        assert_eq!(err.to_string(), "\"value\" must be an iso date.");

        let strict = ValidationOptions::new().with_convert(false);
        assert!(!jo.validate_sync(0, &schema, &strict).unwrap().is_ok());
    }

    #[test]
    fn test_greater_than_now() {
        let jo = Validator::new();
        let schema = jo.schema().date().greater_than_now();
        let options = ValidationOptions::new();

        let future = Utc::now() + Duration::days(1);
        assert!(jo.validate_sync(future, &schema, &options).unwrap().is_ok());

        let past = Utc::now() - Duration::days(1);
        let err = jo.validate_sync(past, &schema, &options).unwrap().error.unwrap();
        assert_eq!(err.first().unwrap().rule, "date.greaterThanNow");
    }
}
