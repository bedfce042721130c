//! English messages.

use super::{join, placeholder, render, Language};
use crate::core::types::Value;

const TEMPLATES: &[(&str, &str)] = &[
    ("required", "\"{label}\" is required."),
    ("forbidden", "\"{label}\" is forbidden."),
    ("invalid", "\"{label}\" must not equal {value}."),
    ("alternatives", "\"{label}\" does not match any of the allowed alternatives."),
    ("object", "\"{label}\" must be an object."),
    ("object.keys", "\"{label}\" is not an object."),
    ("object.pattern", "\"{label}\" is not an object."),
    ("object.unknown", "\"{label}\" should not have \"{key}\"."),
    ("array", "\"{label}\" must be an array."),
    ("array.items", "\"{label}\" must be an array."),
    ("array.ordered", "\"{label}\" must have exactly {expected} ordered elements."),
    ("array.min", "\"{label}\" must have at least {min} elements."),
    ("array.max", "\"{label}\" may not have more than {max} elements."),
    ("array.length", "\"{label}\" must have exactly {expected} elements."),
    (
        "array.unique",
        "\"{label}\" must be unique but duplicate \"{violator.value}\" was found at index {violator.index}.",
    ),
    ("string", "\"{label}\" must be a string."),
    ("string.min", "\"{label}\" must be at least {min} characters long."),
    ("string.max", "\"{label}\" may not be more than {max} characters long."),
    ("string.length", "\"{label}\" must be exactly {expected} characters long."),
    ("string.creditCard", "\"{label}\" must be a credit card number."),
    ("string.regex", "\"{label}\" must match the RegEx {regEx}."),
    ("string.alphanum", "\"{label}\" must be exactly alpha-numeric."),
    ("string.token", "\"{label}\" must be a token ([0-9a-z_]+)."),
    ("string.email", "\"{label}\" must be a valid Email address."),
    ("string.guid", "\"{label}\" must be a GUID."),
    ("string.hex", "\"{label}\" must be hexadecimal."),
    ("string.hostname", "\"{label}\" must be a valid hostname."),
    ("string.lowercase", "\"{label}\" must be lower case."),
    ("string.uppercase", "\"{label}\" must be upper case."),
    ("string.trim", "\"{label}\" must be trimmed."),
    ("string.isoDate", "\"{label}\" must be a valid ISO date."),
    ("boolean", "\"{label}\" must be a boolean."),
    ("func", "\"{label}\" must be a function."),
    ("func.arity", "\"{label}\" must have exactly {expected} arguments."),
    ("func.minArity", "\"{label}\" must have at least {min} arguments."),
    ("func.maxArity", "\"{label}\" may not have more than {max} arguments."),
    ("number", "\"{label}\" must be a number."),
    ("number.integer", "\"{label}\" must be an integer."),
    ("number.min", "\"{label}\" must be greater than or equal to {min}."),
    ("number.max", "\"{label}\" must be less than or equal to {max}."),
    ("number.greater", "\"{label}\" must be greater than {greater}."),
    ("number.less", "\"{label}\" must be less than {less}."),
    ("number.negative", "\"{label}\" must be negative."),
    ("number.positive", "\"{label}\" must be positive."),
    ("number.multiple", "\"{label}\" must be a multiple of {multiple}."),
    ("number.precision", "\"{label}\" must have a max precision of {limit}."),
    ("date", "\"{label}\" must be an iso date."),
    ("date.greaterThanNow", "\"{label}\" must be a date in the future."),
];

pub(super) fn english() -> Language {
    let language = TEMPLATES
        .iter()
        .fold(Language::new("en"), |language, (rule, template)| {
            language.with_template(*rule, *template)
        });

    language
        .with_message("custom", |detail| match placeholder(detail, "message") {
            Some(message) => message.to_string(),
            None => render("\"{label}\" failed custom validation.", detail),
        })
        .with_message("valid", |detail| match placeholder(detail, "allowed") {
            Some(Value::Array(items)) if items.is_empty() => {
                render("\"{label}\" is not valid.", detail)
            }
            _ => render("\"{label}\" is not valid and must be {allowed}.", detail),
        })
        .with_message("string.ip", |detail| {
            let reason = placeholder(detail, "reason").map(|r| r.to_string());
            match reason.as_deref() {
                Some("cidr-required") => render("\"{label}\" must contain a valid CIDR.", detail),
                Some("cidr-not-allowed") => render("\"{label}\" must not contain a CIDR.", detail),
                _ => format!(
                    "{} must be a valid {} address.",
                    render("\"{label}\"", detail),
                    join(detail, "allowed", " or ")
                ),
            }
        })
        .with_message("string.uri", |detail| {
            let reason = placeholder(detail, "reason").map(|r| r.to_string());
            match reason.as_deref() {
                Some("scheme-not-allowed") => format!(
                    "{} scheme must be {}.",
                    render("\"{label}\"", detail),
                    join(detail, "allowed", " or ")
                ),
                Some("relative-not-allowed") => {
                    render("\"{label}\" must be an absolute URL.", detail)
                }
                _ => render("\"{label}\" must be a valid URL.", detail),
            }
        })
}
