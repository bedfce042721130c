//! Array rules.

use crate::core::comparator::Comparator;
use crate::core::context::RuleContext;
use crate::core::error::{context, Context, SchemaError};
use crate::core::params::{Arg, RuleParams};
use crate::core::rule::{Outcome, Rule, RuleFuture};
use crate::core::types::Value;
use crate::rules::builtin::bounds::{Bound, LengthBound};
use crate::rules::ruleset::Ruleset;
use crate::schema::Schema;
use crate::validator::join::all_must_pass;
use futures::future::FutureExt;

fn element_count(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

/// Register the array rules.
pub fn register(ruleset: &mut Ruleset) {
    ruleset.register(|| Box::new(ArrayType::default()));
    ruleset.register(|| Box::new(Sparse));
    ruleset.register(|| Box::new(Single));
    ruleset.register(|| Box::new(Items::default()));
    ruleset.register(|| Box::new(Ordered::default()));
    ruleset.register(|| Box::new(LengthBound::new("array.min", Bound::Min, "length", element_count)));
    ruleset.register(|| Box::new(LengthBound::new("array.max", Bound::Max, "length", element_count)));
    ruleset.register(|| {
        Box::new(LengthBound::new("array.length", Bound::Exact, "length", element_count))
    });
    ruleset.register(|| Box::new(Unique::default()));
}

/// Requires an array, without holes unless sparse.
#[derive(Debug, Clone, Default)]
pub struct ArrayType {
    single: bool,
    sparse: bool,
}

impl ArrayType {
    /// Wrap non-array values into a one-element array.
    pub fn set_single(&mut self, single: bool) {
        self.single = single;
    }

    /// Accept `Undefined` elements.
    pub fn set_sparse(&mut self, sparse: bool) {
        self.sparse = sparse;
    }
}

impl Rule for ArrayType {
    fn name(&self) -> &'static str {
        "array"
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let ok = match cx.value.as_array() {
            Some(items) => self.sparse || items.iter().all(Value::is_defined),
            None => false,
        };
        cx.check(ok, self.name(), Context::new)
    }

    fn coerce(&self, value: &Value) -> Option<Value> {
        if self.single && value.as_array().is_none() {
            Some(Value::Array(vec![value.clone()]))
        } else {
            None
        }
    }
}

/// Accepts holes on the nearest preceding `array`.
#[derive(Debug, Clone, Default)]
pub struct Sparse;

impl Rule for Sparse {
    fn name(&self) -> &'static str {
        "array.sparse"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let allow = params.flag(0)?;
        params.invoke_last::<ArrayType>(|array| array.set_sparse(allow));
        Ok(())
    }

    fn operates(&self) -> bool {
        false
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.pass()
    }
}

/// Lets the nearest preceding `array` wrap single values.
#[derive(Debug, Clone, Default)]
pub struct Single;

impl Rule for Single {
    fn name(&self) -> &'static str {
        "array.single"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        let allow = params.flag(0)?;
        params.invoke_last::<ArrayType>(|array| array.set_single(allow));
        Ok(())
    }

    fn operates(&self) -> bool {
        false
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        cx.pass()
    }
}

/// Validates every element against one schema.
#[derive(Debug, Clone, Default)]
pub struct Items {
    schema: Option<Schema>,
}

impl Rule for Items {
    fn name(&self) -> &'static str {
        "array.items"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.schema = Some(params.schema(0)?.clone());
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(schema) = &self.schema else {
            return cx.pass();
        };
        let Some(items) = cx.value.as_array() else {
            return cx.fail("array", Context::new());
        };

        async move {
            let checks = items
                .iter()
                .enumerate()
                .map(|(i, item)| cx.validate_nested(item.clone(), schema, cx.path.index(i)));
            let values = all_must_pass(checks).await?;

            if cx.options.convert {
                Ok(Outcome::Replace(Value::Array(values)))
            } else {
                Ok(Outcome::Pass)
            }
        }
        .boxed()
    }
}

/// Validates elements position by position.
#[derive(Debug, Clone, Default)]
pub struct Ordered {
    schemas: Vec<Schema>,
}

impl Rule for Ordered {
    fn name(&self) -> &'static str {
        "array.ordered"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        self.schemas = params.schemas()?;
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(items) = cx.value.as_array() else {
            return cx.fail("array", Context::new());
        };
        if items.len() != self.schemas.len() {
            return cx.fail(
                self.name(),
                context([
                    ("length", Value::from(items.len())),
                    ("expected", Value::from(self.schemas.len())),
                ]),
            );
        }

        async move {
            let checks = items
                .iter()
                .zip(&self.schemas)
                .enumerate()
                .map(|(i, (item, schema))| cx.validate_nested(item.clone(), schema, cx.path.index(i)));
            let values = all_must_pass(checks).await?;

            if cx.options.convert {
                Ok(Outcome::Replace(Value::Array(values)))
            } else {
                Ok(Outcome::Pass)
            }
        }
        .boxed()
    }
}

/// Requires unique elements.
///
/// Elements are compared deeply by default, by a dotted member path when a
/// key is given, or by a caller supplied comparator.
#[derive(Clone, Default)]
pub struct Unique {
    key: Option<String>,
    comparator: Option<Comparator>,
}

impl Unique {
    fn same(&self, a: &Value, b: &Value) -> bool {
        match (&self.comparator, &self.key) {
            (Some(comparator), _) => comparator(a, b),
            (None, Some(key)) => a.lookup(key) == b.lookup(key),
            (None, None) => a == b,
        }
    }

    fn first_duplicate(&self, items: &[Value]) -> Option<usize> {
        (1..items.len()).find(|&k| items[..k].iter().any(|earlier| self.same(earlier, &items[k])))
    }
}

impl Rule for Unique {
    fn name(&self) -> &'static str {
        "array.unique"
    }

    fn compile(&mut self, params: &mut RuleParams<'_>) -> Result<(), SchemaError> {
        match params.arg(0) {
            None => {}
            Some(Arg::Value(Value::String(key))) => self.key = Some(key.clone()),
            Some(Arg::Comparator(comparator)) => self.comparator = Some(comparator.clone()),
            Some(_) => return Err(params.invalid("argument 0 must be a key or a comparator")),
        }
        Ok(())
    }

    fn validate<'a>(&'a self, cx: RuleContext<'a>) -> RuleFuture<'a> {
        let Some(items) = cx.value.as_array() else {
            return cx.fail("array", Context::new());
        };
        match self.first_duplicate(items) {
            None => cx.pass(),
            Some(index) => {
                let violator = Value::object([
                    ("value", items[index].clone()),
                    ("index", Value::from(index)),
                ]);
                cx.fail(self.name(), context([("violator", violator)]))
            }
        }
    }
}
