//! Built-in steps over dynamic values

use super::registry::{FunctionRegistry, Program, StepContext, StepFactory};
use crate::coefficient::Coefficient;
use crate::error::{CompileResult, ExecutionError};
use crate::function::{
    ChooseBranch, FilterFunction, FlatMapFunction, Function, FunctionCore, MapFn, MapFunction,
    UnionBranch,
};
use crate::labels::Labels;
use crate::traverser::Traverser;
use crate::value::{Value, ValueKind};

pub(super) fn register_defaults(registry: &mut FunctionRegistry) {
    registry.register("identity", StepFactory::new(ValueKind::Any, identity));
    registry.register("constant", StepFactory::new(ValueKind::Any, constant));
    registry.register("incr", StepFactory::new(ValueKind::Long, incr));
    registry.register("plus", StepFactory::new(ValueKind::Long, plus));
    registry.register("is", StepFactory::new(ValueKind::Any, is));
    registry.register("unfold", StepFactory::new(ValueKind::Any, unfold));
    registry.register("inject", StepFactory::new(ValueKind::Any, inject));
    registry.register("union", StepFactory::new(ValueKind::Any, union));
    registry.register("choose", StepFactory::new(ValueKind::Any, choose));
}

/// Function over [`Value`]s; the closure signature picks the kind
struct ValueStep<F> {
    core: FunctionCore<u64>,
    name: &'static str,
    arguments: Vec<Value>,
    body: F,
}

impl<F> ValueStep<F> {
    fn map(core: FunctionCore<u64>, name: &'static str, arguments: Vec<Value>, body: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ExecutionError> + Send + Sync,
    {
        Self {
            core,
            name,
            arguments,
            body,
        }
    }

    fn filter(core: FunctionCore<u64>, name: &'static str, arguments: Vec<Value>, body: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync,
    {
        Self {
            core,
            name,
            arguments,
            body,
        }
    }

    fn flat_map(
        core: FunctionCore<u64>,
        name: &'static str,
        arguments: Vec<Value>,
        body: F,
    ) -> Self
    where
        F: Fn(&Value) -> Result<Vec<Value>, ExecutionError> + Send + Sync,
    {
        Self {
            core,
            name,
            arguments,
            body,
        }
    }
}

impl<F: Send + Sync> Function<u64> for ValueStep<F> {
    fn coefficient(&self) -> &Coefficient<u64> {
        self.core.coefficient()
    }

    fn labels(&self) -> &Labels {
        self.core.labels()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn arguments(&self) -> Vec<String> {
        self.arguments.iter().map(ToString::to_string).collect()
    }
}

impl<F> MapFunction<u64, Value, Value> for ValueStep<F>
where
    F: Fn(&Value) -> Result<Value, ExecutionError> + Send + Sync,
{
    fn apply(&self, traverser: &Traverser<u64, Value>) -> Result<Value, ExecutionError> {
        (self.body)(traverser.object())
    }
}

impl<F> FilterFunction<u64, Value> for ValueStep<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn test(&self, traverser: &Traverser<u64, Value>) -> Result<bool, ExecutionError> {
        Ok((self.body)(traverser.object()))
    }
}

impl<F> FlatMapFunction<u64, Value, Value> for ValueStep<F>
where
    F: Fn(&Value) -> Result<Vec<Value>, ExecutionError> + Send + Sync,
{
    fn apply(&self, traverser: &Traverser<u64, Value>) -> Result<Vec<Value>, ExecutionError> {
        (self.body)(traverser.object())
    }
}

fn no_arguments(ctx: &StepContext<'_>) -> CompileResult<()> {
    if ctx.args.is_empty() {
        Ok(())
    } else {
        Err(ctx.invalid("takes no arguments"))
    }
}

fn expect_long(function: &str, value: &Value) -> Result<i64, ExecutionError> {
    match value {
        Value::Long(n) => Ok(*n),
        other => Err(ExecutionError::UnexpectedValue {
            function: function.to_string(),
            expected: ValueKind::Long,
            found: other.kind(),
        }),
    }
}

fn identity(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    no_arguments(ctx)?;
    let step = ValueStep::map(ctx.core.clone(), "identity", Vec::new(), |v: &Value| {
        Ok(v.clone())
    });
    Ok((program.map(step), ctx.input))
}

fn constant(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    let value = ctx.single_value()?;
    let kind = value.kind();
    let emitted = value.clone();
    let step = ValueStep::map(ctx.core.clone(), "constant", vec![value], move |_: &Value| {
        Ok(emitted.clone())
    });
    Ok((program.map(step), kind))
}

fn incr(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    no_arguments(ctx)?;
    let step = ValueStep::map(ctx.core.clone(), "incr", Vec::new(), |v: &Value| {
        expect_long("incr", v)?
            .checked_add(1)
            .map(Value::Long)
            .ok_or_else(|| ExecutionError::failed("incr", "long overflow"))
    });
    Ok((program.map(step), ValueKind::Long))
}

fn plus(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    let operand = ctx.single_value()?;
    let n = operand.as_long().ok_or_else(|| {
        ctx.invalid(format!("expected an integral operand, found {}", operand.kind()))
    })?;
    let step = ValueStep::map(ctx.core.clone(), "plus", vec![Value::Long(n)], move |v: &Value| {
        expect_long("plus", v)?
            .checked_add(n)
            .map(Value::Long)
            .ok_or_else(|| ExecutionError::failed("plus", "long overflow"))
    });
    Ok((program.map(step), ValueKind::Long))
}

fn is(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    let expected = ctx.single_value()?;
    let compared = expected.clone();
    let step = ValueStep::filter(ctx.core.clone(), "is", vec![expected], move |v: &Value| {
        *v == compared
    });
    Ok((program.filter(step), ctx.input))
}

fn unfold(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    no_arguments(ctx)?;
    let step = ValueStep::flat_map(ctx.core.clone(), "unfold", Vec::new(), |v: &Value| {
        Ok(match v {
            Value::List(items) => items.clone(),
            other => vec![other.clone()],
        })
    });
    let output = if ctx.input == ValueKind::List {
        ValueKind::Any
    } else {
        ctx.input
    };
    Ok((program.flat_map(step), output))
}

fn inject(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    let values = ctx.values()?;
    let kind = ValueKind::unify(values.iter().map(Value::kind));
    let emitted = values.clone();
    let step = ValueStep::flat_map(ctx.core.clone(), "inject", values, move |_: &Value| {
        Ok(emitted.clone())
    });
    Ok((program.flat_map(step), kind))
}

fn union(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    let mut branches = Vec::new();
    let mut outputs = Vec::new();
    for bytecode in ctx.nested()? {
        let (branch, output) = ctx.compile_nested(bytecode, ctx.input)?;
        branches.push(branch);
        outputs.push(output);
    }
    let union = UnionBranch::weighted(
        ctx.core.coefficient().clone(),
        ctx.core.labels().clone(),
        branches,
    );
    Ok((program.branch(union), ValueKind::unify(outputs)))
}

/// `choose(predicate, on_true, on_false)`
///
/// A boolean predicate output is the key; any other output counts as
/// `true`, and no output takes the false path.
fn choose(ctx: &StepContext<'_>, program: Program) -> CompileResult<(Program, ValueKind)> {
    let nested = ctx.nested()?;
    let [predicate, on_true, on_false] = nested[..] else {
        return Err(ctx.invalid("expected predicate, true and false bytecode"));
    };
    let (predicate, _) = ctx.compile_nested(predicate, ctx.input)?;
    let (on_true, true_kind) = ctx.compile_nested(on_true, ctx.input)?;
    let (on_false, false_kind) = ctx.compile_nested(on_false, ctx.input)?;

    let predicate = predicate.map(MapFn::new("truthy", |v: &Value| v.as_bool().unwrap_or(true)));
    let choose = ChooseBranch::new(predicate, on_true, on_false).with_core(ctx.core.clone());
    Ok((
        program.branch(choose),
        ValueKind::unify([true_kind, false_kind]),
    ))
}
