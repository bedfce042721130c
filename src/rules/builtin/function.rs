//! Function rules.

use crate::core::context::RuleContext;
use crate::core::error::Context;
use crate::core::rule::{Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::builtin::bounds::{Bound, LengthBound};
use crate::rules::ruleset::Ruleset;

fn arity(value: &Value) -> Option<usize> {
    value.as_function().map(|func| func.arity)
}

/// Register the function rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(FuncType));
    ruleset.register(|| Box::new(LengthBound::new("func.arity", Bound::Exact, "arity", arity)));
    ruleset.register(|| Box::new(LengthBound::new("func.minArity", Bound::Min, "arity", arity)));
    ruleset.register(|| Box::new(LengthBound::new("func.maxArity", Bound::Max, "arity", arity)));
}

/// Requires a function value.
#[derive(Debug, Clone, Default)]
pub struct FuncType;

impl Rule for FuncType {
    fn name(&self) -> &'static str {
        "func"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.check(cx.value.as_function().is_some(), self.name(), Context::new)
    }
}
