//! Compilations - ordered, typed pipelines of functions
//!
//! A [`Compilation<C, S, E>`] is built by appending functions to
//! [`Compilation::identity`]. Each builder call consumes the compilation and
//! returns one whose output type is the appended function's output type, so
//! neighboring functions are type-checked when the pipeline is assembled.
//! Once built a compilation is immutable; clones share their functions.

use crate::coefficient::{Coefficient, Weight};
use crate::display;
use crate::error::{CompileError, ExecutionError};
use crate::function::branch::BranchStep;
use crate::function::{BranchFunction, FilterFunction, FlatMapFunction, Function, MapFunction};
use crate::processor::pipeline::{Chain, FilterStep, FlatMapStep, MapStep, Step};
use crate::processor::{worker_pool, IdentityProcessor, ParallelProcessor, Processor, Traversers};
use rayon::ThreadPool;
use crate::traverser::{Object, Traverser};
use std::fmt;
use std::sync::Arc;

/// Ordered pipeline of functions from `S` to `E`, weighted by `C`
pub struct Compilation<C, S, E> {
    functions: Vec<Arc<dyn Function<C>>>,
    processor: Arc<dyn Processor<C, S, E>>,
}

impl<C, S, E> Clone for Compilation<C, S, E> {
    fn clone(&self) -> Self {
        Self {
            functions: self.functions.clone(),
            processor: Arc::clone(&self.processor),
        }
    }
}

impl<C: Weight, S: Object> Compilation<C, S, S> {
    /// The empty pipeline: every input is its own output
    #[must_use]
    pub fn identity() -> Self {
        Self {
            functions: Vec::new(),
            processor: Arc::new(IdentityProcessor::new()),
        }
    }
}

impl<C: Weight, S: Object> Default for Compilation<C, S, S> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<C, S, E> Compilation<C, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
{
    /// A compilation evaluated entirely by `processor`
    ///
    /// It lists no functions; all behavior comes from the processor
    /// (for example a [`ConstantProcessor`](crate::ConstantProcessor) selector).
    #[must_use]
    pub fn from_processor<P>(processor: P) -> Self
    where
        P: Processor<C, S, E> + 'static,
    {
        Self {
            functions: Vec::new(),
            processor: Arc::new(processor),
        }
    }

    /// Member functions in execution order
    #[inline]
    #[must_use]
    pub fn functions(&self) -> &[Arc<dyn Function<C>>] {
        &self.functions
    }

    /// Number of member functions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no functions are listed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Left-to-right combination of all member coefficients
    #[must_use]
    pub fn coefficient(&self) -> Coefficient<C> {
        Coefficient::product(self.functions.iter().map(|f| f.coefficient()))
    }

    /// The evaluating processor
    #[inline]
    #[must_use]
    pub fn processor(&self) -> &Arc<dyn Processor<C, S, E>> {
        &self.processor
    }

    /// Append a map function
    #[must_use]
    pub fn map<X, F>(self, function: F) -> Compilation<C, S, X>
    where
        X: Object,
        F: MapFunction<C, E, X> + 'static,
    {
        let function = Arc::new(function);
        self.append(function.clone(), Arc::new(MapStep::<F, E, X>::new(function)))
    }

    /// Append a filter function
    #[must_use]
    pub fn filter<F>(self, function: F) -> Compilation<C, S, E>
    where
        F: FilterFunction<C, E> + 'static,
    {
        let function = Arc::new(function);
        self.append(function.clone(), Arc::new(FilterStep::<F, E>::new(function)))
    }

    /// Append a flat-map function
    #[must_use]
    pub fn flat_map<X, F>(self, function: F) -> Compilation<C, S, X>
    where
        X: Object,
        F: FlatMapFunction<C, E, X> + 'static,
    {
        let function = Arc::new(function);
        self.append(function.clone(), Arc::new(FlatMapStep::<F, E, X>::new(function)))
    }

    /// Append a branch function
    #[must_use]
    pub fn branch<X, B>(self, function: B) -> Compilation<C, S, X>
    where
        X: Object,
        B: BranchFunction<C, E, X> + 'static,
    {
        let function = Arc::new(function);
        self.append(function.clone(), Arc::new(BranchStep::new(function)))
    }

    fn append<X: Object>(
        mut self,
        function: Arc<dyn Function<C>>,
        step: Arc<dyn Step<C, E, X>>,
    ) -> Compilation<C, S, X> {
        self.functions.push(function);
        Compilation {
            functions: self.functions,
            processor: Arc::new(Chain::new(self.processor, step)),
        }
    }

    /// Evaluate on a worker pool of `threads` workers
    ///
    /// # Errors
    /// `CompileError::Processor` if the pool cannot be built.
    pub fn parallel(self, threads: usize) -> Result<Self, CompileError> {
        Ok(self.parallel_on(Arc::new(worker_pool(threads)?)))
    }

    /// Evaluate on an existing worker pool
    #[must_use]
    pub fn parallel_on(self, pool: Arc<ThreadPool>) -> Self {
        Self {
            functions: self.functions,
            processor: Arc::new(ParallelProcessor::with_pool(self.processor, pool)),
        }
    }

    /// Lazy outputs for one traverser
    #[inline]
    pub fn process(&self, traverser: Traverser<C, S>) -> Traversers<'_, C, E> {
        self.processor.process(traverser)
    }

    /// Lazy outputs for many traversers, in input order
    pub fn evaluate<'a, I>(&'a self, inputs: I) -> Traversers<'a, C, E>
    where
        I: IntoIterator<Item = Traverser<C, S>>,
        I::IntoIter: 'a,
    {
        self.processor.evaluate(Box::new(inputs.into_iter().map(Ok)))
    }

    /// Run unity-weighted `objects` through and collect the output objects
    ///
    /// # Errors
    /// The first `ExecutionError` raised along any path.
    pub fn evaluate_objects<I>(&self, objects: I) -> Result<Vec<E>, ExecutionError>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'static,
    {
        self.evaluate(objects.into_iter().map(Traverser::new))
            .map(|result| result.map(Traverser::into_object))
            .collect()
    }
}

impl<C: Weight, S, E> fmt::Display for Compilation<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display::compilation_string(&self.functions))
    }
}

impl<C: Weight, S, E> fmt::Debug for Compilation<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Compilation")
            .field(&display::compilation_string(&self.functions))
            .finish()
    }
}
