//! Pipeline stages backing [`Compilation`](crate::Compilation) builders
//!
//! Appending a function wraps the previous processor in a [`Chain`] whose
//! [`Step`] adapts the function's kind trait to a lazy output sequence.

use super::{once_err, Processor, Traversers};
use crate::coefficient::Weight;
use crate::function::{FilterFunction, FlatMapFunction, MapFunction};
use crate::traverser::{Object, Traverser};
use std::iter;
use std::marker::PhantomData;
use std::sync::Arc;

/// One function applied to one traverser
pub(crate) trait Step<C, S, E>: Send + Sync {
    fn apply<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, E>;
}

/// `upstream` followed by `step`
pub(crate) struct Chain<C, S, M, E> {
    upstream: Arc<dyn Processor<C, S, M>>,
    step: Arc<dyn Step<C, M, E>>,
}

impl<C, S, M, E> Chain<C, S, M, E> {
    pub(crate) fn new(upstream: Arc<dyn Processor<C, S, M>>, step: Arc<dyn Step<C, M, E>>) -> Self {
        Self { upstream, step }
    }
}

impl<C, S, M, E> Processor<C, S, E> for Chain<C, S, M, E>
where
    C: Weight,
    S: Object,
    M: Object,
    E: Object,
{
    fn process<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, E> {
        Box::new(
            self.upstream
                .process(traverser)
                .flat_map(move |result| match result {
                    Ok(mid) => self.step.apply(mid),
                    Err(err) => once_err(err),
                }),
        )
    }
}

pub(crate) struct MapStep<F, S, E> {
    function: Arc<F>,
    _marker: PhantomData<fn(S) -> E>,
}

impl<F, S, E> MapStep<F, S, E> {
    pub(crate) fn new(function: Arc<F>) -> Self {
        Self {
            function,
            _marker: PhantomData,
        }
    }
}

impl<C, S, E, F> Step<C, S, E> for MapStep<F, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
    F: MapFunction<C, S, E>,
{
    fn apply<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, E> {
        let output = self
            .function
            .apply(&traverser)
            .map(|object| traverser.split(object, self.function.coefficient()));
        Box::new(iter::once(output))
    }
}

pub(crate) struct FilterStep<F, S> {
    function: Arc<F>,
    _marker: PhantomData<fn(S)>,
}

impl<F, S> FilterStep<F, S> {
    pub(crate) fn new(function: Arc<F>) -> Self {
        Self {
            function,
            _marker: PhantomData,
        }
    }
}

impl<C, S, F> Step<C, S, S> for FilterStep<F, S>
where
    C: Weight,
    S: Object,
    F: FilterFunction<C, S>,
{
    fn apply<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, S> {
        match self.function.test(&traverser) {
            Ok(true) => Box::new(iter::once(Ok(
                traverser.weighted(self.function.coefficient())
            ))),
            Ok(false) => Box::new(iter::empty()),
            Err(err) => once_err(err),
        }
    }
}

pub(crate) struct FlatMapStep<F, S, E> {
    function: Arc<F>,
    _marker: PhantomData<fn(S) -> E>,
}

impl<F, S, E> FlatMapStep<F, S, E> {
    pub(crate) fn new(function: Arc<F>) -> Self {
        Self {
            function,
            _marker: PhantomData,
        }
    }
}

impl<C, S, E, F> Step<C, S, E> for FlatMapStep<F, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
    F: FlatMapFunction<C, S, E>,
{
    fn apply<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, E> {
        match self.function.apply(&traverser) {
            Ok(objects) => {
                let coefficient = self.function.coefficient();
                Box::new(
                    objects
                        .into_iter()
                        .map(move |object| Ok(traverser.split(object, coefficient))),
                )
            }
            Err(err) => once_err(err),
        }
    }
}
