//! Validation options and outcomes.

use crate::core::error::ValidationError;
use crate::core::path::Path;
use crate::core::types::Value;

/// Validation options.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Whether a failing rule may coerce the value and retry once.
    pub convert: bool,
    /// Whether to record a stack trace on every failure.
    pub capture_stack: bool,
    /// Path of the value being validated (empty = root).
    pub path: Path,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            convert: true,
            capture_stack: false,
            path: Path::root(),
        }
    }
}

impl ValidationOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable coercion.
    pub fn with_convert(mut self, convert: bool) -> Self {
        self.convert = convert;
        self
    }

    /// Enable/disable stack capture on failure.
    pub fn with_capture_stack(mut self, capture: bool) -> Self {
        self.capture_stack = capture;
        self
    }

    /// Set the path of the validated value.
    pub fn with_path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }
}

/// Result of validating one value.
///
/// A failed validation is data, not an `Err`: `error` is set and `value` holds
/// the value as it stood when the failing rule ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Accepted (possibly coerced) value
    pub value: Value,
    /// Failure, if any
    pub error: Option<ValidationError>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn pass(value: Value) -> Self {
        Self { value, error: None }
    }

    /// A failing outcome.
    pub fn fail(value: Value, error: ValidationError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    /// Check if validation passed.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result` of the accepted value.
    pub fn into_result(self) -> Result<Value, ValidationError> {
        match self.error {
            None => Ok(self.value),
            Some(err) => Err(err),
        }
    }
}
