//! Built-in rule implementations.
//!
//! This module contains the standard rule catalog that ships with Jojen.

mod alternatives;
mod any;
mod array;
mod boolean;
mod bounds;
mod date;
mod function;
mod number;
mod object;
mod string;

use crate::rules::ruleset::Ruleset;

/// Register all built-in rules.
pub fn register_all(ruleset: &mut Ruleset) {
    any::register(ruleset);
    alternatives::register(ruleset);
    object::register(ruleset);
    array::register(ruleset);
    string::register(ruleset);
    number::register(ruleset);
    boolean::register(ruleset);
    date::register(ruleset);
    function::register(ruleset);
}

// Re-export for direct access
pub use alternatives::{Alternatives, Try};
pub use any::{Allow, Any, Custom, DefaultValue, Forbidden, Invalid, Optional, Required, Valid};
pub use array::{ArrayType, Items, Ordered, Single, Sparse, Unique};
pub use boolean::BooleanType;
pub use bounds::{Bound, Check, LengthBound, Measure, NumberBound};
pub use date::{parse_iso, DateType};
pub use function::FuncType;
pub use number::{parse_number, Multiple, NumberType, Precision};
pub use object::{Keys, ObjectType, Pattern, Unknown};
pub use string::{
    Cidr, Insensitive, Ip, IpOptions, IpVersion, StringRegex, StringType, Uri, UriOptions,
};
