//! Ruleset tree mapping dotted rule names to rule factories.
//!
//! Every registered name such as `string.min` is a path in the tree. A schema
//! remembers which node its last chained call landed on; from there it may
//! call the children of that node and of every ancestor, with deeper bindings
//! shadowing shallower ones. A cousin like `string.min` is therefore not
//! reachable after `number`.

use crate::core::rule::Rule;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Factory function for creating rule instances.
pub type RuleFactory = Arc<dyn Fn() -> Box<dyn Rule> + Send + Sync>;

/// Index of a node in the ruleset tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

#[derive(Clone)]
struct RulesetNode {
    segment: String,
    factory: Option<RuleFactory>,
    parent: Option<NodeIndex>,
    children: IndexMap<String, NodeIndex>,
}

/// Tree of registered rules.
#[derive(Clone)]
pub struct Ruleset {
    nodes: Vec<RulesetNode>,
}

impl Ruleset {
    /// Create an empty ruleset.
    pub fn new() -> Self {
        Self {
            nodes: vec![RulesetNode {
                segment: String::new(),
                factory: None,
                parent: None,
                children: IndexMap::new(),
            }],
        }
    }

    /// Create a ruleset pre-populated with the built-in rules.
    pub fn with_builtins() -> Self {
        let mut ruleset = Self::new();

        crate::rules::builtin::register_all(&mut ruleset);

        ruleset
    }

    /// The root node.
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Bind `factory` at `path`, creating intermediate nodes.
    ///
    /// A later registration for the same path replaces the earlier one.
    pub fn add_rule(&mut self, path: &[&str], factory: RuleFactory) -> NodeIndex {
        let mut current = self.root();
        for segment in path {
            current = match self.nodes[current.0].children.get(*segment) {
                Some(child) => *child,
                None => {
                    let child = NodeIndex(self.nodes.len());
                    self.nodes.push(RulesetNode {
                        segment: segment.to_string(),
                        factory: None,
                        parent: Some(current),
                        children: IndexMap::new(),
                    });
                    self.nodes[current.0]
                        .children
                        .insert(segment.to_string(), child);
                    child
                }
            };
        }
        self.nodes[current.0].factory = Some(factory);
        current
    }

    /// Register a rule under the name its instances report.
    pub fn register<F>(&mut self, factory: F) -> NodeIndex
    where
        F: Fn() -> Box<dyn Rule> + Send + Sync + 'static,
    {
        // Create a temporary instance to get the name
        let name = factory().name();
        let path: Vec<&str> = name.split('.').collect();
        log::trace!("registering rule '{}'", name);
        self.add_rule(&path, Arc::new(factory))
    }

    /// Resolve a chained method name from `scope`.
    ///
    /// Looks at the children of `scope`, then of each ancestor up to the root.
    pub fn resolve(&self, scope: NodeIndex, method: &str) -> Option<NodeIndex> {
        let mut current = Some(scope);
        while let Some(node) = current {
            let entry = self.nodes.get(node.0)?;
            if let Some(child) = entry.children.get(method) {
                return Some(*child);
            }
            current = entry.parent;
        }
        None
    }

    /// Every method name callable from `scope`, with the node it resolves to.
    pub fn methods(&self, scope: NodeIndex) -> IndexMap<String, NodeIndex> {
        let mut lineage = Vec::new();
        let mut current = Some(scope);
        while let Some(node) = current {
            lineage.push(node);
            current = self.nodes.get(node.0).and_then(|n| n.parent);
        }

        // Root first so deeper bindings overwrite shallower ones
        let mut methods = IndexMap::new();
        for node in lineage.into_iter().rev() {
            if let Some(entry) = self.nodes.get(node.0) {
                for (name, child) in &entry.children {
                    methods.insert(name.clone(), *child);
                }
            }
        }
        methods
    }

    /// Get the factory bound at a node.
    pub fn factory(&self, node: NodeIndex) -> Option<&RuleFactory> {
        self.nodes.get(node.0).and_then(|n| n.factory.as_ref())
    }

    /// Find the node for a full dotted name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        name.split('.').try_fold(self.root(), |node, segment| {
            self.nodes.get(node.0)?.children.get(segment).copied()
        })
    }

    /// Check if a dotted name has a rule bound to it.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name)
            .and_then(|node| self.factory(node))
            .is_some()
    }

    /// Full dotted name of a node.
    pub fn qualified_name(&self, node: NodeIndex) -> String {
        let mut segments = Vec::new();
        let mut current = Some(node);
        while let Some(index) = current {
            match self.nodes.get(index.0) {
                Some(entry) if entry.parent.is_some() => {
                    segments.push(entry.segment.as_str());
                    current = entry.parent;
                }
                _ => break,
            }
        }
        segments.reverse();
        segments.join(".")
    }

    /// Number of bound rules.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.factory.is_some()).count()
    }

    /// Check if no rule is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = (0..self.nodes.len())
            .map(NodeIndex)
            .filter(|node| self.factory(*node).is_some())
            .map(|node| self.qualified_name(node))
            .collect();
        f.debug_struct("Ruleset").field("rules", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RuleContext;
    use crate::core::rule::RuleFuture;

    struct Named(&'static str);

    impl Rule for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
            cx.pass()
        }
    }

    fn sample() -> Ruleset {
        let mut ruleset = Ruleset::new();
        ruleset.register(|| Box::new(Named("required")));
        ruleset.register(|| Box::new(Named("number")));
        ruleset.register(|| Box::new(Named("number.min")));
        ruleset.register(|| Box::new(Named("string")));
        ruleset.register(|| Box::new(Named("string.min")));
        ruleset.register(|| Box::new(Named("string.email")));
        ruleset
    }

    #[test]
    fn test_register_builds_paths() {
        let ruleset = sample();
        assert!(ruleset.contains("number.min"));
        assert!(!ruleset.contains("number.max"));
        assert_eq!(ruleset.len(), 6);
        let node = ruleset.find("string.email").unwrap();
        assert_eq!(ruleset.qualified_name(node), "string.email");
    }

    #[test]
    fn test_scope_resolution() {
        let ruleset = sample();
        let number = ruleset.find("number").unwrap();
        let number_min = ruleset.find("number.min").unwrap();

        // own children and root-level rules are reachable
        assert_eq!(ruleset.resolve(number, "min"), Some(number_min));
        assert!(ruleset.resolve(number, "required").is_some());
        // siblings of ancestors too
        assert_eq!(ruleset.resolve(number_min, "min"), Some(number_min));
        assert!(ruleset.resolve(number, "string").is_some());
        // cousins are not
        assert!(ruleset.resolve(number, "email").is_none());
    }

    #[test]
    fn test_methods_prefer_deeper_bindings() {
        let ruleset = sample();
        let string = ruleset.find("string").unwrap();
        let methods = ruleset.methods(string);
        assert_eq!(methods.get("min"), ruleset.find("string.min").as_ref());
        assert!(methods.contains_key("email"));
        assert!(methods.contains_key("required"));
        assert!(!methods.contains_key("number.min"));
    }

    #[test]
    fn test_later_registration_wins() {
        let mut ruleset = sample();
        let before = ruleset.find("string.min").unwrap();
        let after = ruleset.register(|| Box::new(Named("string.min")));
        assert_eq!(before, after);
        assert_eq!(ruleset.len(), 6);
    }
}
