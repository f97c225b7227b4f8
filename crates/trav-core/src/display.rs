//! Diagnostic string rendering for functions and compilations
//!
//! Format: `{coefficient}name(arg, arg)@label`. The coefficient prefix is
//! omitted at unity and the argument list when there are no arguments.
//! Compilations render as `[f1, f2]`. Rendering never affects execution.

use crate::coefficient::Weight;
use crate::function::Function;
use std::sync::Arc;

/// Render a single function
#[must_use]
pub fn function_string<C, F>(function: &F) -> String
where
    C: Weight,
    F: Function<C> + ?Sized,
{
    let mut out = String::new();
    let coefficient = function.coefficient();
    if !coefficient.is_unity() {
        out.push('{');
        out.push_str(&coefficient.to_string());
        out.push('}');
    }
    out.push_str(function.name());
    let arguments = function.arguments();
    if !arguments.is_empty() {
        out.push('(');
        out.push_str(&arguments.join(", "));
        out.push(')');
    }
    out.push_str(&function.labels().to_string());
    out
}

/// Render an ordered function list
#[must_use]
pub fn compilation_string<C: Weight>(functions: &[Arc<dyn Function<C>>]) -> String {
    let rendered: Vec<String> = functions.iter().map(|f| function_string(&**f)).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{FunctionCore, MapFn};
    use crate::{Coefficient, Labels};

    #[test]
    fn plain_name_only() {
        let f = MapFn::<u64, _>::new("identity", |x: &i64| *x);
        assert_eq!(function_string(&f), "identity");
    }

    #[test]
    fn coefficient_and_labels() {
        let f = MapFn::new("incr", |x: &i64| x + 1).with_core(FunctionCore::new(
            Coefficient::new(2u64),
            Labels::of(["x", "y"]).unwrap(),
        ));
        assert_eq!(function_string(&f), "{2}incr@x@y");
    }

    #[test]
    fn empty_compilation() {
        let functions: Vec<Arc<dyn Function<u64>>> = Vec::new();
        assert_eq!(compilation_string(&functions), "[]");
    }
}
