//! Branch functions
//!
//! A branch evaluates its selector compilation once per incoming traverser,
//! takes the first selector output as key and dispatches a clone of the
//! traverser into every compilation registered under that key, in list
//! order. Outputs of the targets are concatenated in the same order.
//!
//! When no key matches, or the selector yields nothing, the branch's
//! [`Fallback`] decides: the traverser is dropped, or dispatched to a
//! default target list. A selector error stops the traverser's path.

mod choose;
mod switch;
mod union;

pub use choose::ChooseBranch;
pub use switch::SwitchBranch;
pub use union::UnionBranch;

use super::Function;
use crate::coefficient::Weight;
use crate::compilation::Compilation;
use crate::processor::pipeline::Step;
use crate::processor::{once_err, Traversers};
use crate::traverser::{Object, Traverser};
use std::fmt;
use std::iter;
use std::sync::Arc;

/// Behavior when the selector key has no registered targets
pub enum Fallback<'a, C, S, E> {
    /// Remove the traverser from the stream
    Drop,
    /// Dispatch to these targets instead
    Default(&'a [Compilation<C, S, E>]),
}

impl<C, S, E> Clone for Fallback<'_, C, S, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, S, E> Copy for Fallback<'_, C, S, E> {}

impl<C: Weight, S, E> fmt::Debug for Fallback<'_, C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => f.write_str("Drop"),
            Self::Default(targets) => f.debug_tuple("Default").field(targets).finish(),
        }
    }
}

/// Selector-driven fan-out into nested compilations
pub trait BranchFunction<C, S, E>: Function<C> {
    /// Key type produced by the selector
    type Selector: Object;

    /// Compilation whose first output picks the targets
    fn branch_selector(&self) -> &Compilation<C, S, Self::Selector>;

    /// Every key with its targets, in declaration order
    fn branches(&self) -> Vec<(Self::Selector, &[Compilation<C, S, E>])>;

    /// Targets registered under `key`
    fn select(&self, key: &Self::Selector) -> Option<&[Compilation<C, S, E>]>;

    /// Miss policy
    fn fallback(&self) -> Fallback<'_, C, S, E> {
        Fallback::Drop
    }
}

/// Run `branch` for one traverser
///
/// The traverser is weighted by the branch coefficient before it is
/// cloned into the targets.
pub fn dispatch<'a, C, S, E, B>(branch: &'a B, traverser: Traverser<C, S>) -> Traversers<'a, C, E>
where
    C: Weight,
    S: Object,
    E: Object,
    B: BranchFunction<C, S, E> + ?Sized,
{
    let traverser = traverser.weighted(branch.coefficient());
    let key = match branch.branch_selector().process(traverser.clone()).next() {
        Some(Ok(selected)) => Some(selected.into_object()),
        Some(Err(err)) => return once_err(err),
        None => None,
    };

    let targets = match key.as_ref().and_then(|key| branch.select(key)) {
        Some(targets) => targets,
        None => match branch.fallback() {
            Fallback::Default(targets) => targets,
            Fallback::Drop => {
                tracing::trace!(
                    branch = branch.name(),
                    key = ?key,
                    "no branch selected, traverser dropped"
                );
                return Box::new(iter::empty());
            }
        },
    };

    tracing::trace!(branch = branch.name(), targets = targets.len(), "dispatch");
    Box::new(
        targets
            .iter()
            .flat_map(move |target| target.process(traverser.clone())),
    )
}

/// Render a target list as one argument
pub(crate) fn targets_string<C: Weight, S, E>(targets: &[Compilation<C, S, E>]) -> String {
    targets
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pipeline stage for an appended branch
pub(crate) struct BranchStep<B>(Arc<B>);

impl<B> BranchStep<B> {
    pub(crate) fn new(branch: Arc<B>) -> Self {
        Self(branch)
    }
}

impl<C, S, E, B> Step<C, S, E> for BranchStep<B>
where
    C: Weight,
    S: Object,
    E: Object,
    B: BranchFunction<C, S, E>,
{
    fn apply<'a>(&'a self, traverser: Traverser<C, S>) -> Traversers<'a, C, E> {
        dispatch(&*self.0, traverser)
    }
}
