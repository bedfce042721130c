//! Comparator-backed value sets used by `valid`, `invalid` and `allow`.

use crate::core::types::Value;
use std::fmt;
use std::sync::Arc;

/// Equality predicate between two values.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// A set of values matched through a list of comparators.
///
/// Membership holds when ANY comparator accepts a pair. Deep equality is
/// always the first comparator; modifiers such as `string.insensitive` add
/// more.
#[derive(Clone)]
pub struct ValueSet {
    values: Vec<Value>,
    comparators: Vec<Comparator>,
}

impl ValueSet {
    /// Create a set using deep equality.
    pub fn new(values: Vec<Value>) -> Self {
        let deep_equal: Comparator = Arc::new(|a: &Value, b: &Value| a == b);
        Self {
            values,
            comparators: vec![deep_equal],
        }
    }

    /// Add values to the set.
    pub fn add_values(&mut self, values: impl IntoIterator<Item = Value>) {
        self.values.extend(values);
    }

    /// Remove every stored value matching one of `values`.
    pub fn remove_values(&mut self, values: &[Value]) {
        let comparators = &self.comparators;
        self.values
            .retain(|stored| !values.iter().any(|v| comparators.iter().any(|c| c(stored, v))));
    }

    /// Register an additional comparator.
    pub fn add_comparator(&mut self, comparator: Comparator) {
        self.comparators.push(comparator);
    }

    /// Check whether `value` matches any stored value.
    pub fn contains(&self, value: &Value) -> bool {
        self.values
            .iter()
            .any(|stored| self.comparators.iter().any(|c| c(stored, value)))
    }

    /// Get the stored values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Check if the set has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for ValueSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSet")
            .field("values", &self.values)
            .field("comparators", &self.comparators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_equality_by_default() {
        let set = ValueSet::new(vec![Value::from(vec![1, 2])]);
        assert!(set.contains(&Value::from(vec![1, 2])));
        assert!(!set.contains(&Value::from(vec![2, 1])));
    }

    #[test]
    fn test_extra_comparator_widens_matches() {
        let mut set = ValueSet::new(vec![Value::from("a")]);
        assert!(!set.contains(&Value::from("A")));

        set.add_comparator(Arc::new(|a: &Value, b: &Value| match (a.as_str(), b.as_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }));
        assert!(set.contains(&Value::from("A")));
    }

    #[test]
    fn test_remove_values() {
        let mut set = ValueSet::new(vec![Value::from("a"), Value::from("b")]);
        set.remove_values(&[Value::from("a")]);
        assert_eq!(set.values(), &[Value::from("b")]);
    }
}
