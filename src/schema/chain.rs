//! Typed chain methods for the built-in rule catalog.
//!
//! Every method is a thin wrapper over [`Schema::chain`]: the name is
//! resolved against the current scope, so `min` means `string.min` after
//! `string()` and `array.min` after `array()`. Calling a method that is not
//! in scope records an error in the returned schema.

use crate::core::comparator::Comparator;
use crate::core::params::{Arg, Predicate};
use crate::core::types::Value;
use crate::rules::builtin::{IpOptions, UriOptions};
use crate::schema::Schema;
use futures::future::{self, Future, FutureExt};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::Arc;

macro_rules! flag_methods {
    ($($(#[$doc:meta])* $fn_name:ident => $method:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(&self) -> Schema {
                self.chain($method, Vec::new())
            }
        )*
    };
}

macro_rules! value_methods {
    ($($(#[$doc:meta])* $fn_name:ident => $method:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(&self, limit: impl Into<Value>) -> Schema {
                self.chain($method, vec![Arg::Value(limit.into())])
            }
        )*
    };
}

fn value_args<I, V>(values: I) -> Vec<Arg>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    values.into_iter().map(|v| Arg::Value(v.into())).collect()
}

fn schema_args<I>(schemas: I) -> Vec<Arg>
where
    I: IntoIterator<Item = Schema>,
{
    schemas.into_iter().map(Arg::Schema).collect()
}

impl Schema {
    // ========================================================================
    // Root level
    // ========================================================================

    flag_methods! {
        /// Accept anything.
        any => "any";
        /// Accept `Undefined`, skipping the remaining rules.
        optional => "optional";
        /// Reject `Undefined`.
        required => "required";
        /// Reject every defined value.
        forbidden => "forbidden";
        /// Require an object.
        object => "object";
        /// Require an array.
        array => "array";
        /// Require a non-empty string.
        string => "string";
        /// Require a finite number.
        number => "number";
        /// Require a boolean.
        boolean => "boolean";
        /// Require a date.
        date => "date";
        /// Require a function.
        func => "func";
    }

    /// Only accept the given values.
    pub fn valid<I, V>(&self, values: I) -> Schema
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.chain("valid", value_args(values))
    }

    /// Reject the given values.
    pub fn invalid<I, V>(&self, values: I) -> Schema
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.chain("invalid", value_args(values))
    }

    /// Accept the given values without further checks.
    pub fn allow<I, V>(&self, values: I) -> Schema
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.chain("allow", value_args(values))
    }

    /// Substitute `value` when the input is `Undefined`.
    pub fn default(&self, value: impl Into<Value>) -> Schema {
        self.chain("default", vec![Arg::Value(value.into())])
    }

    /// Run a synchronous predicate.
    pub fn custom<F>(&self, predicate: F) -> Schema
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let predicate: Predicate = Arc::new(move |value: Value| {
            let result = predicate(&value);
            future::ready(result).boxed()
        });
        self.chain("custom", vec![Arg::Predicate(predicate)])
    }

    /// Run an asynchronous predicate.
    pub fn custom_async<F, Fut>(&self, predicate: F) -> Schema
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let predicate: Predicate = Arc::new(move |value: Value| predicate(value).boxed());
        self.chain("custom", vec![Arg::Predicate(predicate)])
    }

    /// Accept a value matching any of `schemas`.
    pub fn alternatives<I>(&self, schemas: I) -> Schema
    where
        I: IntoIterator<Item = Schema>,
    {
        self.chain("alternatives", schema_args(schemas))
    }

    /// Add more schemas to the nearest preceding `alternatives`.
    pub fn try_alternatives<I>(&self, schemas: I) -> Schema
    where
        I: IntoIterator<Item = Schema>,
    {
        self.chain("try", schema_args(schemas))
    }

    // ========================================================================
    // Shared length / bound checks
    // ========================================================================

    value_methods! {
        /// Lower bound (string length, array length or number).
        min => "min";
        /// Upper bound (string length, array length or number).
        max => "max";
        /// Exact length (string or array).
        length => "length";
        /// Strict lower bound for numbers.
        greater => "greater";
        /// Strict upper bound for numbers.
        less => "less";
        /// Require a multiple of the given number.
        multiple => "multiple";
        /// Limit decimal places.
        precision => "precision";
        /// Exact number of declared parameters.
        arity => "arity";
        /// Minimum number of declared parameters.
        min_arity => "minArity";
        /// Maximum number of declared parameters.
        max_arity => "maxArity";
    }

    // ========================================================================
    // object
    // ========================================================================

    /// Declare object members and their schemas.
    pub fn keys<K, I>(&self, entries: I) -> Schema
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        let keys: IndexMap<String, Schema> =
            entries.into_iter().map(|(k, s)| (k.into(), s)).collect();
        self.chain("keys", vec![Arg::Keys(keys)])
    }

    /// Validate members whose name matches `key` against `schema`.
    pub fn pattern(&self, key: Regex, schema: Schema) -> Schema {
        self.chain("pattern", vec![Arg::Regex(key), Arg::Schema(schema)])
    }

    /// Allow members not declared with `keys`.
    pub fn unknown(&self) -> Schema {
        self.chain("unknown", Vec::new())
    }

    /// Allow or forbid members not declared with `keys`.
    pub fn unknown_with(&self, allow: bool) -> Schema {
        self.chain("unknown", vec![Arg::Value(Value::Boolean(allow))])
    }

    // ========================================================================
    // array
    // ========================================================================

    /// Validate every element against `schema`.
    pub fn items(&self, schema: Schema) -> Schema {
        self.chain("items", vec![Arg::Schema(schema)])
    }

    /// Validate elements position by position.
    pub fn ordered<I>(&self, schemas: I) -> Schema
    where
        I: IntoIterator<Item = Schema>,
    {
        self.chain("ordered", schema_args(schemas))
    }

    /// Require deep-unique elements.
    pub fn unique(&self) -> Schema {
        self.chain("unique", Vec::new())
    }

    /// Require elements unique by a dotted member path.
    pub fn unique_by_key(&self, key: &str) -> Schema {
        self.chain("unique", vec![Arg::Value(Value::from(key))])
    }

    /// Require elements unique under a custom comparator.
    pub fn unique_by<F>(&self, comparator: F) -> Schema
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        let comparator: Comparator = Arc::new(comparator);
        self.chain("unique", vec![Arg::Comparator(comparator)])
    }

    flag_methods! {
        /// Accept holes in arrays.
        sparse => "sparse";
        /// Wrap a single non-array value into an array.
        single => "single";
    }

    // ========================================================================
    // string
    // ========================================================================

    /// Require a match of `regex`.
    pub fn regex(&self, regex: Regex) -> Schema {
        self.chain("regex", vec![Arg::Regex(regex)])
    }

    /// Require an IP address using the default options.
    pub fn ip(&self) -> Schema {
        self.chain("ip", Vec::new())
    }

    /// Require an IP address.
    pub fn ip_with(&self, options: IpOptions) -> Schema {
        self.chain("ip", vec![Arg::Value(options.into())])
    }

    /// Require an absolute URI using the default options.
    pub fn uri(&self) -> Schema {
        self.chain("uri", Vec::new())
    }

    /// Require a URI.
    pub fn uri_with(&self, options: UriOptions) -> Schema {
        self.chain("uri", vec![Arg::Value(options.into())])
    }

    flag_methods! {
        /// Only letters and digits.
        alphanum => "alphanum";
        /// Only word characters.
        token => "token";
        /// Email address.
        email => "email";
        /// GUID with optional dashes.
        guid => "guid";
        /// Hexadecimal digits.
        hex => "hex";
        /// Hostname or IP address.
        hostname => "hostname";
        /// Lower case; converts when enabled.
        lowercase => "lowercase";
        /// Upper case; converts when enabled.
        uppercase => "uppercase";
        /// No surrounding whitespace; converts when enabled.
        trim => "trim";
        /// ISO-8601 date string.
        iso_date => "isoDate";
        /// Luhn-valid card number.
        credit_card => "creditCard";
        /// Compare `valid`/`invalid`/`allow` values case-insensitively.
        insensitive => "insensitive";
    }

    // ========================================================================
    // number / date
    // ========================================================================

    flag_methods! {
        /// Whole numbers only.
        integer => "integer";
        /// Strictly positive.
        positive => "positive";
        /// Strictly negative.
        negative => "negative";
        /// A date after the moment of validation.
        greater_than_now => "greaterThanNow";
    }
}
