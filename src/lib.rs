//! # Jojen - Declarative Data Validation
//!
//! Jojen validates arbitrary values against fluently built schemas and can
//! hand back a coerced copy of the input.
//!
//! ## Features
//!
//! - **Chainable schemas**: every call returns a new immutable schema
//! - **Scoped rule names**: `min` means `string.min` after `string()` and `array.min` after `array()`
//! - **Coercion**: failed rules may convert the value and retry once
//! - **Async rules**: custom predicates may be futures; composite rules check children concurrently
//! - **Extensible**: register your own rules through the [`Rule`](core::rule::Rule) trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jojen::prelude::*;
//!
//! let jo = jo();
//! let schema = jo.schema().object().keys([
//!     ("name", jo.schema().string().min(2).required()),
//!     ("age", jo.schema().number().integer().min(0)),
//! ]);
//!
//! let input = Value::from(serde_json::json!({"name": "Ada", "age": "36"}));
//! let outcome = jo.validate_sync(input, &schema, &ValidationOptions::new()).unwrap();
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.value.get("age"), &Value::from(36));
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Values, paths, the rule trait and error handling
//! - [`rules`]: The scoped ruleset and the built-in rule catalog
//! - [`schema`]: Persistent schemas and their compiler
//! - [`validator`]: The interpreter that runs compiled schemas
//! - [`lang`]: Message templates
//!
//! ## Creating Custom Rules
//!
//! Implement [`Rule`](core::rule::Rule) and register it on a validator:
//!
//! ```rust,ignore
//! use jojen::prelude::*;
//!
//! #[derive(Clone)]
//! struct Even;
//!
//! impl Rule for Even {
//!     fn name(&self) -> &'static str {
//!         "number.even"
//!     }
//!
//!     fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
//!         let ok = cx.value.as_number().is_some_and(|n| n % 2.0 == 0.0);
//!         cx.check(ok, self.name(), Context::new)
//!     }
//! }
//!
//! let mut jo = Validator::new();
//! jo.register(|| Box::new(Even));
//! let schema = jo.schema().number().try_chain("even", Vec::new()).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod lang;
pub mod rules;
pub mod schema;
pub mod validator;

use std::sync::LazyLock;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use jojen::prelude::*;
/// ```
pub mod prelude {
    // Values and paths
    pub use crate::core::path::{Path, PathSegment};
    pub use crate::core::types::{FunctionValue, Value, ValueKind};

    // Rule contract
    pub use crate::core::comparator::{Comparator, ValueSet};
    pub use crate::core::context::RuleContext;
    pub use crate::core::params::{Arg, Predicate, RuleParams};
    pub use crate::core::rule::{Outcome, Priority, Rule, RuleFuture};

    // Errors
    pub use crate::core::error::{
        Context, ErrorDetail, JojenError, JojenResult, SchemaError, UsageError, ValidationError,
    };

    // Schemas and validation
    pub use crate::lang::Language;
    pub use crate::rules::builtin::{Cidr, IpOptions, IpVersion, UriOptions};
    pub use crate::rules::ruleset::Ruleset;
    pub use crate::schema::Schema;
    pub use crate::validator::{AssertMessage, ValidationOptions, ValidationOutcome, Validator};

    pub use crate::jo;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

static DEFAULT_VALIDATOR: LazyLock<validator::Validator> = LazyLock::new(validator::Validator::new);

/// Shared validator with the built-in rules and English messages.
///
/// It is never modified; build your own [`Validator`](validator::Validator)
/// to register extra rules.
pub fn jo() -> &'static validator::Validator {
    &DEFAULT_VALIDATOR
}
