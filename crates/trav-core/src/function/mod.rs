//! Function capability set
//!
//! Every step in a compilation implements [`Function`]: it carries a
//! [`Coefficient`], a [`Labels`] set and a display name. Step kinds add one
//! evaluation trait on top:
//!
//! - [`MapFunction`]: one output per input
//! - [`FilterFunction`]: zero or one output, the input itself
//! - [`FlatMapFunction`]: any number of outputs
//! - [`BranchFunction`]: selector-driven fan-out into nested compilations
//!
//! Concrete variants embed a [`FunctionCore`] rather than inheriting from a
//! base type.

pub mod branch;

use crate::coefficient::{Coefficient, Weight};
use crate::display;
use crate::error::ExecutionError;
use crate::labels::Labels;
use crate::traverser::{Object, Traverser};
use std::fmt;

pub use branch::{
    BranchFunction, ChooseBranch, Fallback, SwitchBranch, UnionBranch,
};

/// Capability set shared by every step-function
pub trait Function<C>: Send + Sync {
    /// Weight applied to traversers passing this function
    fn coefficient(&self) -> &Coefficient<C>;

    /// Labels bound to this function's output
    fn labels(&self) -> &Labels;

    /// Display name
    fn name(&self) -> &str;

    /// Rendered arguments, including nested compilations
    fn arguments(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<C: Weight> fmt::Display for dyn Function<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display::function_string(self))
    }
}

/// One output object per input traverser
pub trait MapFunction<C, S, E>: Function<C> {
    /// Compute the output object
    ///
    /// # Errors
    /// Stops this traverser's path.
    fn apply(&self, traverser: &Traverser<C, S>) -> Result<E, ExecutionError>;
}

/// Keeps or drops the input traverser
pub trait FilterFunction<C, S>: Function<C> {
    /// Whether the traverser continues
    ///
    /// # Errors
    /// Stops this traverser's path.
    fn test(&self, traverser: &Traverser<C, S>) -> Result<bool, ExecutionError>;
}

/// Any number of output objects per input traverser
pub trait FlatMapFunction<C, S, E>: Function<C> {
    /// Compute the output objects, in emission order
    ///
    /// # Errors
    /// Stops this traverser's path.
    fn apply(&self, traverser: &Traverser<C, S>) -> Result<Vec<E>, ExecutionError>;
}

/// Coefficient and labels, embedded by concrete function variants
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCore<C> {
    coefficient: Coefficient<C>,
    labels: Labels,
}

impl<C> FunctionCore<C> {
    /// Create from a coefficient and a (possibly empty) label set
    #[inline]
    #[must_use]
    pub fn new(coefficient: Coefficient<C>, labels: Labels) -> Self {
        Self {
            coefficient,
            labels,
        }
    }

    /// The coefficient
    #[inline]
    #[must_use]
    pub fn coefficient(&self) -> &Coefficient<C> {
        &self.coefficient
    }

    /// The labels
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }
}

impl<C: Weight> Default for FunctionCore<C> {
    fn default() -> Self {
        Self::new(Coefficient::unity(), Labels::none())
    }
}

/// Named closure adapter for [`MapFunction`]
pub struct MapFn<C, F> {
    core: FunctionCore<C>,
    name: String,
    f: F,
}

impl<C: Weight, F> MapFn<C, F> {
    /// Unity coefficient, no labels
    #[must_use]
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            core: FunctionCore::default(),
            name: name.into(),
            f,
        }
    }

    /// Replace coefficient and labels
    #[must_use]
    pub fn with_core(mut self, core: FunctionCore<C>) -> Self {
        self.core = core;
        self
    }
}

impl<C, F> Function<C> for MapFn<C, F>
where
    C: Weight,
    F: Send + Sync,
{
    fn coefficient(&self) -> &Coefficient<C> {
        self.core.coefficient()
    }

    fn labels(&self) -> &Labels {
        self.core.labels()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<C, S, E, F> MapFunction<C, S, E> for MapFn<C, F>
where
    C: Weight,
    S: Object,
    E: Object,
    F: Fn(&S) -> E + Send + Sync,
{
    fn apply(&self, traverser: &Traverser<C, S>) -> Result<E, ExecutionError> {
        Ok((self.f)(traverser.object()))
    }
}

impl<C: fmt::Debug, F> fmt::Debug for MapFn<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapFn")
            .field("name", &self.name)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

/// Named predicate adapter for [`FilterFunction`]
pub struct FilterFn<C, F> {
    core: FunctionCore<C>,
    name: String,
    predicate: F,
}

impl<C: Weight, F> FilterFn<C, F> {
    /// Unity coefficient, no labels
    #[must_use]
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            core: FunctionCore::default(),
            name: name.into(),
            predicate,
        }
    }

    /// Replace coefficient and labels
    #[must_use]
    pub fn with_core(mut self, core: FunctionCore<C>) -> Self {
        self.core = core;
        self
    }
}

impl<C, F> Function<C> for FilterFn<C, F>
where
    C: Weight,
    F: Send + Sync,
{
    fn coefficient(&self) -> &Coefficient<C> {
        self.core.coefficient()
    }

    fn labels(&self) -> &Labels {
        self.core.labels()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<C, S, F> FilterFunction<C, S> for FilterFn<C, F>
where
    C: Weight,
    S: Object,
    F: Fn(&S) -> bool + Send + Sync,
{
    fn test(&self, traverser: &Traverser<C, S>) -> Result<bool, ExecutionError> {
        Ok((self.predicate)(traverser.object()))
    }
}

impl<C: fmt::Debug, F> fmt::Debug for FilterFn<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterFn")
            .field("name", &self.name)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

/// Named closure adapter for [`FlatMapFunction`]
pub struct FlatMapFn<C, F> {
    core: FunctionCore<C>,
    name: String,
    f: F,
}

impl<C: Weight, F> FlatMapFn<C, F> {
    /// Unity coefficient, no labels
    #[must_use]
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            core: FunctionCore::default(),
            name: name.into(),
            f,
        }
    }

    /// Replace coefficient and labels
    #[must_use]
    pub fn with_core(mut self, core: FunctionCore<C>) -> Self {
        self.core = core;
        self
    }
}

impl<C, F> Function<C> for FlatMapFn<C, F>
where
    C: Weight,
    F: Send + Sync,
{
    fn coefficient(&self) -> &Coefficient<C> {
        self.core.coefficient()
    }

    fn labels(&self) -> &Labels {
        self.core.labels()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<C, S, E, F> FlatMapFunction<C, S, E> for FlatMapFn<C, F>
where
    C: Weight,
    S: Object,
    E: Object,
    F: Fn(&S) -> Vec<E> + Send + Sync,
{
    fn apply(&self, traverser: &Traverser<C, S>) -> Result<Vec<E>, ExecutionError> {
        Ok((self.f)(traverser.object()))
    }
}

impl<C: fmt::Debug, F> fmt::Debug for FlatMapFn<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatMapFn")
            .field("name", &self.name)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn map_fn_applies_closure() {
        let incr = MapFn::new("incr", |x: &i64| x + 1);
        let t: Traverser<u64, i64> = Traverser::new(41);
        assert_eq!(MapFunction::<u64, i64, i64>::apply(&incr, &t).unwrap(), 42);
    }

    #[test]
    fn filter_fn_tests_object() {
        let even = FilterFn::new("even", |x: &i64| x % 2 == 0);
        let t: Traverser<u64, i64> = Traverser::new(4);
        assert!(FilterFunction::<u64, i64>::test(&even, &t).unwrap());
    }

    #[test]
    fn dyn_function_display() {
        let core = FunctionCore::new(Coefficient::new(3u64), Labels::of(["a"]).unwrap());
        let f: Arc<dyn Function<u64>> = Arc::new(MapFn::new("incr", |x: &i64| x + 1).with_core(core));
        assert_eq!(f.to_string(), "{3}incr@a");
    }

    #[test]
    fn default_core_is_neutral() {
        let core: FunctionCore<u64> = FunctionCore::default();
        assert!(core.coefficient().is_unity());
        assert!(core.labels().is_empty());
    }
}
