//! Worker-pool evaluation of independent input traversers

use super::{Processor, TraverserResult, Traversers};
use crate::coefficient::Weight;
use crate::error::CompileError;
use crate::traverser::{Object, Traverser};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use std::sync::Arc;

/// Build a pool of `threads` named workers; `0` lets rayon choose
///
/// # Errors
/// `CompileError::Processor` if the pool cannot be built.
pub fn worker_pool(threads: usize) -> Result<ThreadPool, CompileError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("trav-worker-{i}"))
        .build()
        .map_err(|e| CompileError::Processor(e.to_string()))
}

/// Runs an inner processor over many inputs on a rayon pool
///
/// Each input traverser is an independent unit of work. Outputs are
/// concatenated in input order, and outputs of one input keep the order the
/// inner processor produced them in, so branch targets stay in declared order.
///
/// `evaluate` drains its input before dispatching; `process` on a single
/// traverser runs inline.
pub struct ParallelProcessor<C, S, E> {
    inner: Arc<dyn Processor<C, S, E>>,
    pool: Arc<ThreadPool>,
}

impl<C, S, E> ParallelProcessor<C, S, E> {
    /// Wrap `inner` with a dedicated pool of `threads` workers
    ///
    /// # Errors
    /// `CompileError::Processor` if the pool cannot be built.
    pub fn new(inner: Arc<dyn Processor<C, S, E>>, threads: usize) -> Result<Self, CompileError> {
        Ok(Self::with_pool(inner, Arc::new(worker_pool(threads)?)))
    }

    /// Wrap `inner`, sharing an existing pool
    #[inline]
    #[must_use]
    pub fn with_pool(inner: Arc<dyn Processor<C, S, E>>, pool: Arc<ThreadPool>) -> Self {
        Self { inner, pool }
    }

    /// Number of worker threads
    #[inline]
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl<C, S, E> fmt::Debug for ParallelProcessor<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelProcessor")
            .field("threads", &self.threads())
            .finish_non_exhaustive()
    }
}

impl<C, S, E> Processor<C, S, E> for ParallelProcessor<C, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
{
    fn process<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, E> {
        self.inner.process(traverser)
    }

    fn evaluate<'a>(&'a self, inputs: Traversers<'a, C, S>) -> Traversers<'a, C, E>
    where
        C: 'a,
        S: 'a,
        E: 'a,
    {
        let inputs: Vec<TraverserResult<C, S>> = inputs.collect();
        tracing::trace!(
            inputs = inputs.len(),
            threads = self.threads(),
            "parallel evaluation"
        );
        let inner = &self.inner;
        let outputs: Vec<Vec<TraverserResult<C, E>>> = self.pool.install(|| {
            inputs
                .into_par_iter()
                .map(|input| match input {
                    Ok(traverser) => inner.process(traverser).collect(),
                    Err(err) => vec![Err(err)],
                })
                .collect()
        });
        Box::new(outputs.into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::IdentityProcessor;

    #[test]
    fn preserves_input_order() {
        let inner: Arc<dyn Processor<u64, i64, i64>> = Arc::new(IdentityProcessor::new());
        let parallel = ParallelProcessor::new(inner, 4).unwrap();
        let inputs: Traversers<'_, u64, i64> =
            Box::new((0..100).map(|i| Ok(Traverser::new(i))));
        let out: Vec<i64> = parallel
            .evaluate(inputs)
            .map(|r| r.unwrap().into_object())
            .collect();
        assert_eq!(out, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn reports_thread_count() {
        let inner: Arc<dyn Processor<u64, i64, i64>> = Arc::new(IdentityProcessor::new());
        let parallel = ParallelProcessor::new(inner, 2).unwrap();
        assert_eq!(parallel.threads(), 2);
    }
}
