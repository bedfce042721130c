//! Language packs: human readable messages for error details.
//!
//! A pack maps a dotted rule name to a formatter. Most entries are templates
//! where `{label}` renders the innermost path segment and any other
//! `{placeholder}` reads the detail context; dotted placeholders such as
//! `{violator.index}` follow nested objects.

mod en;

use crate::core::error::ErrorDetail;
use crate::core::types::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renders the message for one detail.
pub type MessageFormatter = Arc<dyn Fn(&ErrorDetail) -> String + Send + Sync>;

/// A named set of message formatters keyed by rule name.
#[derive(Clone, Default)]
pub struct Language {
    name: String,
    messages: HashMap<String, MessageFormatter>,
}

impl Language {
    /// Create an empty language pack.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: HashMap::new(),
        }
    }

    /// The English pack covering every built-in rule.
    pub fn english() -> Self {
        en::english()
    }

    /// Get the pack name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a formatter for `rule`.
    pub fn with_message<F>(mut self, rule: impl Into<String>, formatter: F) -> Self
    where
        F: Fn(&ErrorDetail) -> String + Send + Sync + 'static,
    {
        self.messages.insert(rule.into(), Arc::new(formatter));
        self
    }

    /// Set a `{placeholder}` template for `rule`.
    pub fn with_template(self, rule: impl Into<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        self.with_message(rule, move |detail| render(&template, detail))
    }

    /// Check if `rule` has a message.
    pub fn contains(&self, rule: &str) -> bool {
        self.messages.contains_key(rule)
    }

    /// Number of rules with a message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the pack has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the message for `detail`, if this pack knows its rule.
    pub fn format(&self, detail: &ErrorDetail) -> Option<String> {
        self.messages.get(&detail.rule).map(|format| format(detail))
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<&String> = self.messages.keys().collect();
        rules.sort();
        f.debug_struct("Language")
            .field("name", &self.name)
            .field("rules", &rules)
            .finish()
    }
}

/// Look up a placeholder for `detail`.
pub fn placeholder(detail: &ErrorDetail, name: &str) -> Option<Value> {
    if name == "label" {
        return Some(Value::String(detail.path.label()));
    }
    let (head, rest) = match name.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    };
    let value = detail.get(head)?;
    let value = match rest {
        Some(rest) => value.lookup(rest),
        None => value,
    };
    Some(value.clone())
}

/// Substitute `{placeholder}`s in `template`.
///
/// Unknown placeholders are kept verbatim.
pub fn render(template: &str, detail: &ErrorDetail) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match placeholder(detail, name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Join a list placeholder with a custom separator.
pub fn join(detail: &ErrorDetail, name: &str, separator: &str) -> String {
    match placeholder(detail, name) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(separator),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}
