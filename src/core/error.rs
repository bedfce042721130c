//! Error types for jojen.
//!
//! Uses thiserror for structured errors. Two families are kept apart:
//! - [`ValidationError`] is data-driven and returned inside a validation
//!   outcome, never thrown
//! - [`UsageError`] and [`SchemaError`] report programmer mistakes such as
//!   extending a compiled schema or running a suspended rule synchronously

use crate::core::path::Path;
use crate::core::types::Value;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use thiserror::Error;

/// Rule-specific detail payload attached to a failure.
pub type Context = IndexMap<String, Value>;

/// Build a [`Context`] from literal entries.
pub fn context<const N: usize>(entries: [(&str, Value); N]) -> Context {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Top-level error type for jojen.
///
/// Returned by the assert facade, which is the only entry point that turns a
/// failed validation into an `Err`.
#[derive(Error, Debug)]
pub enum JojenError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Custom(anyhow::Error),
}

/// Result type using JojenError.
pub type JojenResult<T> = Result<T, JojenError>;

/// Errors raised while building or compiling a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("You cannot modify schemas after you start validating them")]
    Frozen,

    #[error("Unknown rule '{name}' in scope '{scope}'")]
    UnknownRule { name: String, scope: String },

    #[error("Invalid arguments for '{rule}': {reason}")]
    InvalidArguments { rule: String, reason: String },
}

/// Programmer errors surfaced by the validator entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Cannot validate asynchronous rules synchronously")]
    Suspended,
}

/// Failure of a single rule invocation.
#[derive(Error, Debug, Clone)]
pub enum RuleError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Usage(#[from] UsageError),
}

impl From<SchemaError> for RuleError {
    fn from(err: SchemaError) -> Self {
        RuleError::Usage(UsageError::Schema(err))
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// One failed rule.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorDetail {
    /// Path from the validation root to the offending value
    pub path: Path,
    /// Dotted name of the failing rule
    #[serde(rename = "type")]
    pub rule: String,
    /// `key` plus rule-specific details
    pub context: Context,
    /// Human readable message from the loaded language pack
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorDetail {
    /// Get a context entry.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.context.get(name)
    }

    fn fallback_message(&self) -> String {
        format!("\"{}\" failed rule \"{}\"", self.path.label(), self.rule)
    }
}

/// Data-driven validation failure.
///
/// Holds one detail per failed rule. Several errors can be merged with
/// [`ValidationError::union`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    details: Vec<ErrorDetail>,
    prefix: Option<String>,
    stack: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{} ", prefix)?;
        }
        for (i, detail) in self.details.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match &detail.message {
                Some(message) => write!(f, "{}", message)?,
                None => write!(f, "{}", detail.fallback_message())?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Create an error with a single detail.
    ///
    /// The context always starts with `key`, the label of the innermost path
    /// segment; entries in `info` may override it.
    pub fn new(rule: impl Into<String>, path: Path, info: Context) -> Self {
        let mut context = Context::new();
        context.insert("key".to_string(), Value::String(path.label()));
        context.extend(info);
        Self::from_detail(ErrorDetail {
            path,
            rule: rule.into(),
            context,
            message: None,
        })
    }

    /// Create an error from a prepared detail.
    pub fn from_detail(detail: ErrorDetail) -> Self {
        Self {
            details: vec![detail],
            prefix: None,
            stack: None,
        }
    }

    /// Get all details.
    pub fn details(&self) -> &[ErrorDetail] {
        &self.details
    }

    /// Get the first detail.
    pub fn first(&self) -> Option<&ErrorDetail> {
        self.details.first()
    }

    /// Merge two errors, concatenating their details.
    pub fn union(mut self, other: ValidationError) -> Self {
        self.details.extend(other.details);
        if self.stack.is_none() {
            self.stack = other.stack;
        }
        self
    }

    /// Fill in missing messages using a formatter.
    pub fn attach_messages<F>(&mut self, format: F)
    where
        F: Fn(&ErrorDetail) -> Option<String>,
    {
        for detail in self.details.iter_mut().filter(|d| d.message.is_none()) {
            detail.message = format(detail);
        }
    }

    /// Record the current call stack, once.
    pub fn capture_stack(&mut self) {
        if self.stack.is_none() {
            self.stack = Some(std::backtrace::Backtrace::force_capture().to_string());
        }
    }

    /// Get the captured stack trace, if any.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Prefix the rendered message.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Get the message prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Rendered message (same as `Display`).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Render the stable JSON shape consumed by integrators.
    pub fn to_json(&self) -> serde_json::Value {
        let details: Vec<serde_json::Value> = self
            .details
            .iter()
            .map(|d| {
                let context: serde_json::Map<String, serde_json::Value> = d
                    .context
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                let mut entry = serde_json::Map::new();
                entry.insert("path".to_string(), d.path.to_string().into());
                entry.insert("type".to_string(), d.rule.clone().into());
                entry.insert("context".to_string(), context.into());
                if let Some(message) = &d.message {
                    entry.insert("message".to_string(), message.clone().into());
                }
                serde_json::Value::Object(entry)
            })
            .collect();

        serde_json::json!({
            "isJoi": true,
            "name": "ValidationError",
            "details": details,
        })
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("isJoi", &true)?;
        state.serialize_field("name", "ValidationError")?;
        state.serialize_field("details", &self.details)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_starts_with_key() {
        let err = ValidationError::new(
            "string.min",
            Path::root().key("name"),
            context([("min", Value::from(3)), ("length", Value::from(1))]),
        );
        let detail = err.first().unwrap();
        assert_eq!(detail.get("key"), Some(&Value::from("name")));
        assert_eq!(detail.context.keys().collect::<Vec<_>>(), ["key", "min", "length"]);
    }

    #[test]
    fn test_union_concatenates_details() {
        let a = ValidationError::new("number", Path::root(), Context::new());
        let b = ValidationError::new("string", Path::root(), Context::new());
        let merged = a.union(b);
        let rules: Vec<_> = merged.details().iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, ["number", "string"]);
    }

    #[test]
    fn test_prefix_and_messages() {
        let mut err = ValidationError::new("required", Path::root(), Context::new());
        assert_eq!(err.to_string(), "\"value\" failed rule \"required\"");

        err.attach_messages(|d| Some(format!("\"{}\" is required.", d.path.label())));
        let err = err.with_prefix("Oops");
        assert_eq!(err.to_string(), "Oops \"value\" is required.");
    }

    #[test]
    fn test_json_shape() {
        let err = ValidationError::new(
            "object.unknown",
            Path::root(),
            context([("key", Value::from("b"))]),
        );
        assert_eq!(
            err.to_json(),
            json!({
                "isJoi": true,
                "name": "ValidationError",
                "details": [{"path": "value", "type": "object.unknown", "context": {"key": "b"}}]
            })
        );
        assert_eq!(serde_json::to_value(&err).unwrap(), err.to_json());
    }

    #[test]
    fn test_capture_stack_is_opt_in() {
        let mut err = ValidationError::new("any", Path::root(), Context::new());
        assert!(err.stack().is_none());
        err.capture_stack();
        assert!(err.stack().is_some());
    }
}
