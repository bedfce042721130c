//! String rules.

use crate::core::comparator::Comparator;
use crate::core::context::RuleContext;
use crate::core::error::{context, Context, SchemaError};
use crate::core::params::{Arg, RuleParams};
use crate::core::rule::{Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::builtin::bounds::{Bound, Check, LengthBound};
use crate::rules::ruleset::Ruleset;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, LazyLock};
use url::Url;

static ALPHANUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9]+$").expect("alphanum regex"));

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("token regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^[-a-z0-9\~!$%\^\&*_=+\}\{'?]+(\.[-a-z0-9\~!$%\^\&*_=+\}\{'?]+)*",
        r"@([a-z0-9_][-a-z0-9_]*(\.[-a-z0-9_]+)*\.([a-zрф]{2,})",
        r"|([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}))(:[0-9]{1,5})?$",
    ))
    .expect("email regex")
});

static GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-?([0-9a-f]{4}-?){3}[0-9a-f]{12}$").expect("guid regex")
});

static HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[0-9a-f]+$").expect("hex regex"));

static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(([a-z0-9]|[a-z0-9][a-z0-9\-]*[a-z0-9])\.)*([a-z0-9]|[a-z0-9][a-z0-9\-]*[a-z0-9])$")
        .expect("hostname regex")
});

// Calendar, week and ordinal dates, each optionally followed by a time.
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[+-]?[0-9]{4}(?:",
        r"(?:-(?:0[1-9]|1[0-2])(?:-(?:0[1-9]|[12][0-9]|3[01]))?",
        r"|(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01])",
        r"|-?W(?:[0-4][0-9]|5[0-2])(?:-?[1-7])?",
        r"|-?(?:00[1-9]|0[1-9][0-9]|[12][0-9]{2}|3(?:[0-5][0-9]|6[1-6])))",
        r"(?:[T\s](?:(?:[01][0-9]|2[0-3])(?::?[0-5][0-9](?::?[0-5][0-9](?:[.,][0-9]+)?)?)?|24:?00)",
        r"(?:[zZ]|[+-](?:[01][0-9]|2[0-3])(?::?[0-5][0-9])?)?)?",
        r")?$",
    ))
    .expect("iso date regex")
});

const RELATIVE_BASE: &str = "http://localhost/";

fn char_count(value: &Value) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}

fn matches(regex: &Regex, value: &Value) -> bool {
    value.as_str().is_some_and(|s| regex.is_match(s))
}

/// Register the string rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(StringType));
    ruleset.register(|| Box::new(Insensitive));
    ruleset.register(|| Box::new(LengthBound::new("string.min", Bound::Min, "length", char_count)));
    ruleset.register(|| Box::new(LengthBound::new("string.max", Bound::Max, "length", char_count)));
    ruleset.register(|| {
        Box::new(LengthBound::new("string.length", Bound::Exact, "length", char_count))
    });
    ruleset.register(|| Box::new(StringRegex::default()));
    ruleset.register(|| Box::new(Check::new("string.alphanum", |v| matches(&ALPHANUM, v))));
    ruleset.register(|| Box::new(Check::new("string.token", |v| matches(&TOKEN, v))));
    ruleset.register(|| Box::new(Check::new("string.email", |v| matches(&EMAIL, v))));
    ruleset.register(|| Box::new(Check::new("string.guid", |v| matches(&GUID, v))));
    ruleset.register(|| Box::new(Check::new("string.hex", |v| matches(&HEX, v))));
    ruleset.register(|| Box::new(Check::new("string.hostname", is_hostname)));
    ruleset.register(|| Box::new(Check::new("string.isoDate", |v| matches(&ISO_DATE, v))));
    ruleset.register(|| Box::new(Check::new("string.creditCard", is_credit_card)));
    ruleset.register(|| {
        Box::new(
            Check::new("string.lowercase", |v| v.as_str().is_some_and(|s| s.to_lowercase() == s))
                .with_convert(|v| v.as_str().map(|s| Value::from(s.to_lowercase()))),
        )
    });
    ruleset.register(|| {
        Box::new(
            Check::new("string.uppercase", |v| v.as_str().is_some_and(|s| s.to_uppercase() == s))
                .with_convert(|v| v.as_str().map(|s| Value::from(s.to_uppercase()))),
        )
    });
    ruleset.register(|| {
        Box::new(
            Check::new("string.trim", |v| v.as_str().is_some_and(|s| s.trim() == s))
                .with_convert(|v| v.as_str().map(|s| Value::from(s.trim()))),
        )
    });
    ruleset.register(|| Box::new(Ip::default()));
    ruleset.register(|| Box::new(Uri::default()));
}

fn is_hostname(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| HOSTNAME.is_match(s) || s.parse::<IpAddr>().is_ok())
}

/// Luhn check over 12 to 19 digits; spaces and dashes are ignored.
fn is_credit_card(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let digits: Vec<u32> = s
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .unwrap_or_default();
    if !(12..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| match i % 2 {
            0 => d,
            _ if d * 2 > 9 => d * 2 - 9,
            _ => d * 2,
        })
        .sum();
    sum % 10 == 0
}

// ============================================================================
// Type and modifiers
// ============================================================================

/// Requires a non-empty string.
#[derive(Debug, Clone, Default)]
pub struct StringType;

impl Rule for StringType {
    fn name(&self) -> &'static str {
        "string"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let ok = cx.value.as_str().is_some_and(|s| !s.is_empty());
        cx.check(ok, self.name(), Context::new)
    }
}

/// Makes sibling value sets compare strings case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Insensitive;

impl Rule for Insensitive {
    fn name(&self) -> &'static str {
        "string.insensitive"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let comparator: Comparator = Arc::new(|a: &Value, b: &Value| match (a.as_str(), b.as_str()) {
            (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => false,
        });
        params.invoke_value_sets(|set| set.add_comparator(comparator.clone()));
        Ok(())
    }

    fn operates(&self) -> bool {
        false
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.pass()
    }
}

/// Requires a match of a regular expression.
#[derive(Debug, Clone, Default)]
pub struct StringRegex {
    regex: Option<Regex>,
}

impl Rule for StringRegex {
    fn name(&self) -> &'static str {
        "string.regex"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        match params.arg(0) {
            Some(Arg::Regex(regex)) => {
                self.regex = Some(regex.clone());
                Ok(())
            }
            _ => Err(params.invalid("argument 0 must be a regex")),
        }
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(regex) = &self.regex else {
            return cx.pass();
        };
        cx.check(matches(regex, cx.value), self.name(), || {
            context([("regEx", Value::from(regex.as_str()))])
        })
    }
}

// ============================================================================
// IP addresses
// ============================================================================

/// IP protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    /// Dotted quad
    V4,
    /// Colon separated groups
    V6,
}

impl IpVersion {
    /// Name used in options and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            IpVersion::V4 => "ipv4",
            IpVersion::V6 => "ipv6",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "ipv4" => Some(IpVersion::V4),
            "ipv6" => Some(IpVersion::V6),
            _ => None,
        }
    }

    fn max_prefix(self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }

    fn accepts(self, address: &str) -> bool {
        match self {
            IpVersion::V4 => address.parse::<Ipv4Addr>().is_ok(),
            IpVersion::V6 => address.parse::<Ipv6Addr>().is_ok(),
        }
    }
}

/// Whether a `/prefix` suffix is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cidr {
    /// May be present
    Optional,
    /// Must be present
    Required,
    /// Must be absent
    #[default]
    Forbidden,
}

impl Cidr {
    /// Name used in options.
    pub fn as_str(self) -> &'static str {
        match self {
            Cidr::Optional => "optional",
            Cidr::Required => "required",
            Cidr::Forbidden => "forbidden",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "optional" => Some(Cidr::Optional),
            "required" => Some(Cidr::Required),
            "forbidden" => Some(Cidr::Forbidden),
            _ => None,
        }
    }
}

/// Options for `string.ip`.
#[derive(Debug, Clone, PartialEq)]
pub struct IpOptions {
    versions: Vec<IpVersion>,
    cidr: Cidr,
}

impl Default for IpOptions {
    fn default() -> Self {
        Self {
            versions: vec![IpVersion::V4, IpVersion::V6],
            cidr: Cidr::Forbidden,
        }
    }
}

impl IpOptions {
    /// Both versions, no CIDR.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the accepted versions.
    pub fn versions(mut self, versions: impl IntoIterator<Item = IpVersion>) -> Self {
        self.versions = versions.into_iter().collect();
        self
    }

    /// Set the CIDR policy.
    pub fn cidr(mut self, cidr: Cidr) -> Self {
        self.cidr = cidr;
        self
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        let mut options = Self::default();
        let Some(object) = value.as_object() else {
            return Err("options must be an object".to_string());
        };

        let versions = object.get("version").or_else(|| object.get("versions"));
        if let Some(versions) = versions.filter(|v| v.is_defined()) {
            let names = match versions {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            options.versions = names
                .iter()
                .map(|name| {
                    name.as_str()
                        .and_then(IpVersion::parse)
                        .ok_or_else(|| format!("unknown ip version {}", name))
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(cidr) = object.get("cidr").filter(|v| v.is_defined()) {
            options.cidr = cidr
                .as_str()
                .and_then(Cidr::parse)
                .ok_or_else(|| format!("unknown cidr mode {}", cidr))?;
        }
        Ok(options)
    }
}

impl From<IpOptions> for Value {
    fn from(options: IpOptions) -> Self {
        let versions: Vec<Value> = options.versions.iter().map(|v| Value::from(v.as_str())).collect();
        Value::object([
            ("version", Value::Array(versions)),
            ("cidr", Value::from(options.cidr.as_str())),
        ])
    }
}

/// Requires an IP address.
#[derive(Debug, Clone, Default)]
pub struct Ip {
    options: IpOptions,
}

impl Ip {
    fn reason(&self, value: &str) -> Option<&'static str> {
        let (address, prefix) = match value.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (value, None),
        };
        let version = self.options.versions.iter().find(|v| v.accepts(address));
        let Some(version) = version else {
            return Some("not-matched");
        };

        match prefix {
            Some(prefix) => {
                let valid = !prefix.is_empty()
                    && prefix.bytes().all(|b| b.is_ascii_digit())
                    && prefix.parse::<u8>().is_ok_and(|p| p <= version.max_prefix());
                if !valid {
                    Some("not-matched")
                } else if self.options.cidr == Cidr::Forbidden {
                    Some("cidr-not-allowed")
                } else {
                    None
                }
            }
            None if self.options.cidr == Cidr::Required => Some("cidr-required"),
            None => None,
        }
    }
}

impl Rule for Ip {
    fn name(&self) -> &'static str {
        "string.ip"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        if let Some(Arg::Value(value)) = params.arg(0) {
            self.options = IpOptions::from_value(value).map_err(|reason| params.invalid(reason))?;
        }
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let reason = match cx.value.as_str() {
            Some(s) => self.reason(s),
            None => Some("not-matched"),
        };
        let Some(reason) = reason else {
            return cx.pass();
        };

        let allowed: Vec<Value> = self
            .options
            .versions
            .iter()
            .map(|v| Value::from(v.as_str()))
            .collect();
        cx.fail(
            self.name(),
            context([("reason", Value::from(reason)), ("allowed", Value::Array(allowed))]),
        )
    }
}

// ============================================================================
// URIs
// ============================================================================

/// Options for `string.uri`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriOptions {
    schemes: Vec<String>,
    allow_relative: bool,
}

impl UriOptions {
    /// Any scheme, absolute only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted scheme. Without any, every scheme is accepted.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.schemes.push(scheme.into());
        self
    }

    /// Accept relative references.
    pub fn allow_relative(mut self, allow: bool) -> Self {
        self.allow_relative = allow;
        self
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        let mut options = Self::default();
        let Some(object) = value.as_object() else {
            return Err("options must be an object".to_string());
        };

        let schemes = object.get("scheme").or_else(|| object.get("schemes"));
        if let Some(schemes) = schemes.filter(|v| v.is_defined()) {
            let names = match schemes {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            options.schemes = names
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| format!("scheme {} must be a string", name))
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(allow) = object.get("allowRelative").filter(|v| v.is_defined()) {
            options.allow_relative = allow
                .as_bool()
                .ok_or_else(|| "allowRelative must be a boolean".to_string())?;
        }
        Ok(options)
    }
}

impl From<UriOptions> for Value {
    fn from(options: UriOptions) -> Self {
        Value::object([
            ("scheme", Value::from(options.schemes)),
            ("allowRelative", Value::from(options.allow_relative)),
        ])
    }
}

/// Requires a URI.
#[derive(Debug, Clone, Default)]
pub struct Uri {
    options: UriOptions,
}

impl Uri {
    fn reason(&self, value: &str) -> Option<&'static str> {
        match Url::parse(value) {
            Ok(url) => {
                let scheme_ok = self.options.schemes.is_empty()
                    || self
                        .options
                        .schemes
                        .iter()
                        .any(|s| s.eq_ignore_ascii_case(url.scheme()));
                if !scheme_ok {
                    Some("scheme-not-allowed")
                } else if !url.has_host() {
                    Some("invalid")
                } else {
                    None
                }
            }
            Err(url::ParseError::RelativeUrlWithoutBase) if !self.options.allow_relative => {
                Some("relative-not-allowed")
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let joined = Url::parse(RELATIVE_BASE).and_then(|base| base.join(value));
                joined.err().map(|_| "invalid")
            }
            Err(_) => Some("invalid"),
        }
    }
}

impl Rule for Uri {
    fn name(&self) -> &'static str {
        "string.uri"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        if let Some(Arg::Value(value)) = params.arg(0) {
            self.options = UriOptions::from_value(value).map_err(|reason| params.invalid(reason))?;
        }
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let reason = match cx.value.as_str() {
            Some(s) => self.reason(s),
            None => Some("invalid"),
        };
        let Some(reason) = reason else {
            return cx.pass();
        };

        let allowed = Value::from(self.options.schemes.clone());
        cx.fail(
            self.name(),
            context([("reason", Value::from(reason)), ("allowed", allowed)]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::validator::{ValidationOptions, Validator};

    fn accepts(jo: &Validator, schema: &Schema, value: &str) -> bool {
        jo.validate_sync(value, schema, &ValidationOptions::new().with_convert(false))
            .unwrap()
            .is_ok()
    }

    fn message(jo: &Validator, schema: &Schema, value: &str) -> String {
        jo.validate_sync(value, schema, &ValidationOptions::new())
            .unwrap()
            .error
            .map(|err| err.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_empty_string_rejected() {
        let jo = Validator::new();
        let schema = jo.schema().string();
        assert!(!accepts(&jo, &schema, ""));
        assert_eq!(message(&jo, &schema, ""), "\"value\" must be a string.");
        assert!(accepts(&jo, &jo.schema().string().allow([""]), ""));
    }

    #[test]
    fn test_length_counts_chars() {
        let jo = Validator::new();
        let schema = jo.schema().string().min(5).max(5);
        assert!(accepts(&jo, &schema, "héllo"));

        let outcome = jo
            .validate_sync("hi", &schema, &ValidationOptions::new())
            .unwrap();
        let err = outcome.error.unwrap();
        let detail = err.first().unwrap();
        assert_eq!(detail.rule, "string.min");
        assert_eq!(detail.get("length"), Some(&Value::from(2)));
        assert_eq!(err.to_string(), "\"value\" must be at least 5 characters long.");
    }

    #[test]
    fn test_regex_context() {
        let jo = Validator::new();
        let schema = jo.schema().string().regex(Regex::new("^a+$").unwrap());
        assert!(accepts(&jo, &schema, "aaa"));
        assert_eq!(message(&jo, &schema, "b"), "\"value\" must match the RegEx ^a+$.");
    }

    #[test]
    fn test_pattern_checks() {
        let jo = Validator::new();
        let cases: [(Schema, &str, &str); 7] = [
            (jo.schema().string().alphanum(), "abc123", "abc-123"),
            (jo.schema().string().token(), "a_b_1", "a b"),
            (jo.schema().string().email(), "john.doe@example.com", "john@"),
            (
                jo.schema().string().guid(),
                "69593D62-71EA-4548-85E4-04A0DBE4BB9A",
                "69593D62-71EA-4548-85E4",
            ),
            (jo.schema().string().hex(), "DEADbeef", "xyz"),
            (jo.schema().string().hostname(), "www.example.com", "-bad-.com"),
            (jo.schema().string().credit_card(), "4111 1111 1111 1111", "4111111111111112"),
        ];
        for (schema, good, bad) in &cases {
            assert!(accepts(&jo, schema, good), "{} should pass", good);
            assert!(!accepts(&jo, schema, bad), "{} should fail", bad);
        }
        assert!(accepts(&jo, &jo.schema().string().hostname(), "::1"));
        assert!(accepts(&jo, &jo.schema().string().email(), "someone@example.technology"));
    }

    #[test]
    fn test_iso_date_forms() {
        let jo = Validator::new();
        let schema = jo.schema().string().iso_date();
        for good in [
            "2013-06-07",
            "2013-06-07T14:21:46.295Z",
            "2013-06-07T14:21:46+07:00",
            "20130607",
            "2013-W23-5",
            "2013-158",
        ] {
            assert!(accepts(&jo, &schema, good), "{} should pass", good);
        }
        for bad in ["2013-13-01", "201306", "06/07/2013", "2013-06-07T25:00"] {
            assert!(!accepts(&jo, &schema, bad), "{} should fail", bad);
        }
    }

    #[test]
    fn test_case_and_trim_convert() {
        let jo = Validator::new();
        let options = ValidationOptions::new();

        let outcome = jo
            .validate_sync("HeLLo", &jo.schema().string().lowercase(), &options)
            .unwrap();
        assert_eq!(outcome.into_result(), Ok(Value::from("hello")));

        let outcome = jo
            .validate_sync(" x ", &jo.schema().string().trim(), &options)
            .unwrap();
        assert_eq!(outcome.into_result(), Ok(Value::from("x")));

        // without conversion the original is checked as is
        let schema = jo.schema().string().uppercase();
        assert!(!accepts(&jo, &schema, "abc"));
        assert!(accepts(&jo, &schema, "ABC"));
    }

    #[test]
    fn test_insensitive_value_sets() {
        let jo = Validator::new();
        let schema = jo.schema().string().insensitive().valid(["Yes", "No"]);
        assert!(accepts(&jo, &schema, "yes"));
        assert!(!accepts(&jo, &schema, "maybe"));

        let strict = jo.schema().string().valid(["Yes"]);
        assert!(!accepts(&jo, &strict, "yes"));

        let blocked = jo.schema().string().insensitive().invalid(["admin"]);
        assert!(!accepts(&jo, &blocked, "ADMIN"));
    }

    #[test]
    fn test_ip_defaults() {
        let jo = Validator::new();
        let schema = jo.schema().string().ip();
        assert!(accepts(&jo, &schema, "192.168.0.1"));
        assert!(accepts(&jo, &schema, "2001:db8::1"));
        assert_eq!(
            message(&jo, &schema, "10.0.0.0/8"),
            "\"value\" must not contain a CIDR."
        );
        assert_eq!(
            message(&jo, &schema, "999.1.1.1"),
            "\"value\" must be a valid ipv4 or ipv6 address."
        );
    }

    #[test]
    fn test_ip_options() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .string()
            .ip_with(IpOptions::new().versions([IpVersion::V4]).cidr(Cidr::Required));
        assert!(accepts(&jo, &schema, "10.0.0.0/8"));
        assert!(!accepts(&jo, &schema, "10.0.0.0/33"));
        assert!(!accepts(&jo, &schema, "2001:db8::/32"));
        assert_eq!(message(&jo, &schema, "10.0.0.1"), "\"value\" must contain a valid CIDR.");
    }

    #[test]
    fn test_ip_options_from_value() {
        let value = Value::from(serde_json::json!({"version": "ipv6", "cidr": "optional"}));
        let options = IpOptions::from_value(&value).unwrap();
        assert_eq!(options, IpOptions::new().versions([IpVersion::V6]).cidr(Cidr::Optional));

        let bad = Value::from(serde_json::json!({"versions": ["ipv5"]}));
        assert!(IpOptions::from_value(&bad).is_err());
    }

    #[test]
    fn test_uri() {
        let jo = Validator::new();
        let schema = jo.schema().string().uri();
        assert!(accepts(&jo, &schema, "https://example.com/path?q=1"));
        assert_eq!(message(&jo, &schema, "/relative"), "\"value\" must be an absolute URL.");
        assert_eq!(message(&jo, &schema, "http://"), "\"value\" must be a valid URL.");

        let relative = jo.schema().string().uri_with(UriOptions::new().allow_relative(true));
        assert!(accepts(&jo, &relative, "/relative"));

        let https = jo.schema().string().uri_with(UriOptions::new().scheme("https"));
        assert!(accepts(&jo, &https, "https://example.com"));
        assert_eq!(
            message(&jo, &https, "ftp://example.com"),
            "\"value\" scheme must be https."
        );
    }
}
