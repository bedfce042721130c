//! Number rules.

use crate::core::context::RuleContext;
use crate::core::error::{context, Context, SchemaError};
use crate::core::params::RuleParams;
use crate::core::rule::{Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::builtin::bounds::{Check, NumberBound};
use crate::rules::ruleset::Ruleset;

/// Register the number rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(NumberType));
    ruleset.register(|| {
        Box::new(Check::new("number.integer", |v| {
            v.as_number().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
        }))
    });
    ruleset.register(|| Box::new(NumberBound::new("number.min", "min", |n, limit| n >= limit)));
    ruleset.register(|| Box::new(NumberBound::new("number.max", "max", |n, limit| n <= limit)));
    ruleset.register(|| {
        Box::new(NumberBound::new("number.greater", "greater", |n, limit| n > limit))
    });
    ruleset.register(|| Box::new(NumberBound::new("number.less", "less", |n, limit| n < limit)));
    ruleset.register(|| {
        Box::new(Check::new("number.positive", |v| v.as_number().is_some_and(|n| n > 0.0)))
    });
    ruleset.register(|| {
        Box::new(Check::new("number.negative", |v| v.as_number().is_some_and(|n| n < 0.0)))
    });
    ruleset.register(|| Box::new(Multiple::default()));
    ruleset.register(|| Box::new(Precision::default()));
}

/// Parse a string the way JavaScript's `Number()` does.
///
/// Returns `None` for anything that would be `NaN`. Infinite results are
/// returned as such; the caller decides what to do with them.
pub fn parse_number(input: &str) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return Some(
            digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
        );
    }

    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if unsigned == "Infinity" {
        return Some(if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    // Rust also accepts "inf" and "nan", which JavaScript does not
    if unsigned.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Round to `places` decimal places through the decimal representation.
fn round_to(n: f64, places: usize) -> f64 {
    format!("{:.*}", places, n).parse().unwrap_or(n)
}

/// Count the digits after the decimal point.
fn decimals(n: f64) -> usize {
    let repr = n.to_string();
    repr.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

/// Requires a finite number.
#[derive(Debug, Clone, Default)]
pub struct NumberType;

impl Rule for NumberType {
    fn name(&self) -> &'static str {
        "number"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let ok = cx.value.as_number().is_some_and(f64::is_finite);
        cx.check(ok, self.name(), Context::new)
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        value
            .as_str()
            .and_then(parse_number)
            .filter(|n| n.is_finite())
            .map(Value::Number)
    }
}

/// Requires a multiple of a non-zero number.
#[derive(Debug, Clone, Default)]
pub struct Multiple {
    base: f64,
}

impl Rule for Multiple {
    fn name(&self) -> &'static str {
        "number.multiple"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.base = params.number(0)?;
        if self.base == 0.0 {
            return Err(params.invalid("argument 0 must not be zero"));
        }
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let ok = cx.value.as_number().is_some_and(|n| n % self.base == 0.0);
        cx.check(ok, self.name(), || context([("multiple", Value::from(self.base))]))
    }
}

/// Limits the number of decimal places; rounds when converting.
#[derive(Debug, Clone, Default)]
pub struct Precision {
    limit: usize,
}

impl Rule for Precision {
    fn name(&self) -> &'static str {
        "number.precision"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.limit = params.count(0)?;
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(n) = cx.value.as_number() else {
            return cx.fail("number", Context::new());
        };
        let precision = decimals(n);
        cx.check(precision <= self.limit, self.name(), || {
            context([
                ("precision", Value::from(precision)),
                ("limit", Value::from(self.limit)),
            ])
        })
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        value
            .as_number()
            .filter(|n| n.is_finite())
            .map(|n| Value::Number(round_to(n, self.limit)))
    }
}
