//! Schema compilation: sort, cross-wire, prune and deduplicate.

use crate::core::error::SchemaError;
use crate::core::params::RuleParams;
use crate::core::rule::RuleInstance;

/// Turn materialized rules into an executable list.
///
/// 1. Stable-sort by priority, so ties keep call order.
/// 2. Compile each rule in order with a view of its siblings.
/// 3. Drop a rule right after compile if it does not operate.
/// 4. Otherwise drop every earlier rule identical to it.
pub fn compile(mut rules: Vec<RuleInstance>) -> Result<Vec<RuleInstance>, SchemaError> {
    let materialized = rules.len();
    rules.sort_by_key(|r| r.rule().priority());

    let mut index = 0;
    while index < rules.len() {
        compile_at(&mut rules, index)?;

        if !rules[index].rule().operates() {
            log::trace!("dropping non-operating rule '{}'", rules[index].name());
            rules.remove(index);
            continue;
        }

        let mut earlier = 0;
        while earlier < index {
            if rules[earlier].identical_to(&rules[index]) {
                log::trace!("dropping duplicate rule '{}'", rules[earlier].name());
                rules.remove(earlier);
                index -= 1;
            } else {
                earlier += 1;
            }
        }
        index += 1;
    }

    log::debug!(
        "compiled schema: {} calls -> {} rules [{}]",
        materialized,
        rules.len(),
        rules.iter().map(RuleInstance::name).collect::<Vec<_>>().join(", ")
    );
    Ok(rules)
}

fn compile_at(rules: &mut [RuleInstance], index: usize) -> Result<(), SchemaError> {
    let (before, rest) = rules.split_at_mut(index);
    let Some((current, after)) = rest.split_first_mut() else {
        return Ok(());
    };
    let name = current.rule.name();
    let mut params = RuleParams::new(name, &current.params, before, after);
    current.rule.compile(&mut params)
}

#[cfg(test)]
mod tests {
    use crate::core::params::Arg;
    use crate::core::types::Value;
    use crate::validator::Validator;

    fn names(schema: &crate::schema::Schema) -> Vec<&'static str> {
        schema.rule_names().unwrap()
    }

    #[test]
    fn test_priority_sort_keeps_call_order_within_tier() {
        let jo = Validator::new();
        let schema = jo.schema().string().min(1).max(9).valid(["x"]).default("d");
        assert_eq!(
            names(&schema),
            ["default", "optional", "valid", "string", "string.min", "string.max"]
        );
    }

    #[test]
    fn test_identical_rules_collapse_to_last() {
        let jo = Validator::new();
        let schema = jo.schema().string().max(5).max(5);
        assert_eq!(names(&schema), ["optional", "string", "string.max"]);

        let refined = jo.schema().string().max(5).max(3);
        assert_eq!(names(&refined), ["optional", "string", "string.max", "string.max"]);
    }

    #[test]
    fn test_modifiers_are_pruned() {
        let jo = Validator::new();
        let schema = jo.schema().array().single().sparse();
        assert_eq!(names(&schema), ["optional", "array"]);
    }

    #[test]
    fn test_required_keeps_disabled_optional_in_place() {
        let jo = Validator::new();
        // optional is compiled before required disables it
        assert_eq!(names(&jo.schema().required()), ["optional", "required"]);
    }

    #[test]
    fn test_bad_arguments_surface_on_compile() {
        let jo = Validator::new();
        let schema = jo
            .schema()
            .string()
            .chain("min", vec![Arg::from(Value::from("three"))]);
        assert!(schema.rules().is_err());
    }
}
