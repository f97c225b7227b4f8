//! Execution strategies
//!
//! A [`Processor`] turns input traversers into a lazy sequence of output
//! traversers. Every [`Compilation`](crate::Compilation) owns one:
//!
//! - [`IdentityProcessor`]: the empty pipeline, yields its input unchanged
//! - [`ConstantProcessor`]: yields one fixed value per input, ignoring it
//! - pipeline stages: one per appended function (internal)
//! - [`ParallelProcessor`]: evaluates independent inputs on a worker pool

mod parallel;
pub(crate) mod pipeline;

pub use parallel::{worker_pool, ParallelProcessor};

use crate::coefficient::Weight;
use crate::error::ExecutionError;
use crate::traverser::{Object, Traverser};
use std::fmt;
use std::iter;
use std::marker::PhantomData;

/// Outcome for a single output traverser
pub type TraverserResult<C, E> = Result<Traverser<C, E>, ExecutionError>;

/// Lazy output sequence
pub type Traversers<'a, C, E> = Box<dyn Iterator<Item = TraverserResult<C, E>> + 'a>;

/// Evaluation strategy from `S` traversers to `E` traversers
pub trait Processor<C, S, E>: Send + Sync {
    /// Outputs for one input traverser, in emission order
    fn process<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, E>;

    /// Outputs for a stream of inputs, concatenated in input order
    ///
    /// An upstream error is passed through in place.
    fn evaluate<'a>(&'a self, inputs: Traversers<'a, C, S>) -> Traversers<'a, C, E>
    where
        C: 'a,
        S: 'a,
        E: 'a,
    {
        Box::new(inputs.flat_map(move |input| match input {
            Ok(traverser) => self.process(traverser),
            Err(err) => once_err(err),
        }))
    }
}

/// Single-error output sequence
pub(crate) fn once_err<'a, C: 'a, E: 'a>(err: ExecutionError) -> Traversers<'a, C, E> {
    Box::new(iter::once(Err(err)))
}

/// The empty pipeline: each input is its own output
pub struct IdentityProcessor<C, S> {
    _marker: PhantomData<fn() -> (C, S)>,
}

impl<C, S> IdentityProcessor<C, S> {
    /// Create
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<C, S> Default for IdentityProcessor<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> fmt::Debug for IdentityProcessor<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityProcessor")
    }
}

impl<C: Weight, S: Object> Processor<C, S, S> for IdentityProcessor<C, S> {
    fn process<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, S> {
        Box::new(iter::once(Ok(traverser)))
    }
}

/// Yields exactly one precomputed value per input
///
/// The input traverser is consumed without being inspected. Used as the
/// selector of branches that are unconditional.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantProcessor<V> {
    value: V,
}

impl<V> ConstantProcessor<V> {
    /// Processor always yielding `value`
    #[inline]
    #[must_use]
    pub fn new(value: V) -> Self {
        Self { value }
    }

    /// The constant
    #[inline]
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<C: Weight, S: Object, V: Object> Processor<C, S, V> for ConstantProcessor<V> {
    fn process<'a>(&'a self, _traverser: Traverser<C, S>) -> Traversers<'a, C, V> {
        Box::new(iter::once(Ok(Traverser::new(self.value.clone()))))
    }
}
