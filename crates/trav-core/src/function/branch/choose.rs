use super::{BranchFunction, Fallback};
use crate::coefficient::{Coefficient, Weight};
use crate::compilation::Compilation;
use crate::function::{Function, FunctionCore};
use crate::labels::Labels;
use crate::traverser::Object;
use std::fmt;
use std::slice;

/// Two-way branch on a boolean predicate
///
/// A traverser for which the predicate yields nothing takes the false
/// path, so choose never drops.
pub struct ChooseBranch<C, S, E> {
    core: FunctionCore<C>,
    predicate: Compilation<C, S, bool>,
    on_true: Compilation<C, S, E>,
    on_false: Compilation<C, S, E>,
}

impl<C, S, E> ChooseBranch<C, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
{
    /// Route to `on_true` or `on_false` by `predicate`
    #[must_use]
    pub fn new(
        predicate: Compilation<C, S, bool>,
        on_true: Compilation<C, S, E>,
        on_false: Compilation<C, S, E>,
    ) -> Self {
        Self {
            core: FunctionCore::default(),
            predicate,
            on_true,
            on_false,
        }
    }

    /// Replace coefficient and labels
    #[must_use]
    pub fn with_core(mut self, core: FunctionCore<C>) -> Self {
        self.core = core;
        self
    }
}

impl<C, S, E> Function<C> for ChooseBranch<C, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
{
    fn coefficient(&self) -> &Coefficient<C> {
        self.core.coefficient()
    }

    fn labels(&self) -> &Labels {
        self.core.labels()
    }

    fn name(&self) -> &str {
        "choose"
    }

    fn arguments(&self) -> Vec<String> {
        vec![
            self.predicate.to_string(),
            self.on_true.to_string(),
            self.on_false.to_string(),
        ]
    }
}

impl<C, S, E> BranchFunction<C, S, E> for ChooseBranch<C, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
{
    type Selector = bool;

    fn branch_selector(&self) -> &Compilation<C, S, bool> {
        &self.predicate
    }

    fn branches(&self) -> Vec<(bool, &[Compilation<C, S, E>])> {
        vec![
            (true, slice::from_ref(&self.on_true)),
            (false, slice::from_ref(&self.on_false)),
        ]
    }

    fn select(&self, key: &bool) -> Option<&[Compilation<C, S, E>]> {
        let target = if *key { &self.on_true } else { &self.on_false };
        Some(slice::from_ref(target))
    }

    fn fallback(&self) -> Fallback<'_, C, S, E> {
        Fallback::Default(slice::from_ref(&self.on_false))
    }
}

impl<C: Weight, S, E> fmt::Debug for ChooseBranch<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChooseBranch")
            .field("core", &self.core)
            .field("predicate", &self.predicate)
            .field("on_true", &self.on_true)
            .field("on_false", &self.on_false)
            .finish()
    }
}
