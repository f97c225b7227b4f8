use super::{targets_string, BranchFunction, Fallback};
use crate::coefficient::{Coefficient, Weight};
use crate::compilation::Compilation;
use crate::function::{Function, FunctionCore};
use crate::labels::Labels;
use crate::traverser::Object;
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

/// Keyed branch over an open set of selector values
///
/// Cases keep their insertion order. Without an `otherwise` target a
/// traverser whose key matches no case is dropped.
pub struct SwitchBranch<C, S, E, M> {
    core: FunctionCore<C>,
    selector: Compilation<C, S, M>,
    cases: IndexMap<M, Vec<Compilation<C, S, E>>>,
    otherwise: Option<Vec<Compilation<C, S, E>>>,
}

impl<C, S, E, M> SwitchBranch<C, S, E, M>
where
    C: Weight,
    S: Object,
    E: Object,
    M: Object + Eq + Hash,
{
    /// Switch on the first output of `selector`, with no cases yet
    #[must_use]
    pub fn new(selector: Compilation<C, S, M>) -> Self {
        Self {
            core: FunctionCore::default(),
            selector,
            cases: IndexMap::new(),
            otherwise: None,
        }
    }

    /// Add `target` under `key`, after any targets already registered for it
    #[must_use]
    pub fn case(mut self, key: M, target: Compilation<C, S, E>) -> Self {
        self.cases.entry(key).or_default().push(target);
        self
    }

    /// Add a target for keys without a case
    #[must_use]
    pub fn otherwise(mut self, target: Compilation<C, S, E>) -> Self {
        self.otherwise.get_or_insert_with(Vec::new).push(target);
        self
    }

    /// Replace coefficient and labels
    #[must_use]
    pub fn with_core(mut self, core: FunctionCore<C>) -> Self {
        self.core = core;
        self
    }
}

impl<C, S, E, M> Function<C> for SwitchBranch<C, S, E, M>
where
    C: Weight,
    S: Object,
    E: Object,
    M: Object + Eq + Hash,
{
    fn coefficient(&self) -> &Coefficient<C> {
        self.core.coefficient()
    }

    fn labels(&self) -> &Labels {
        self.core.labels()
    }

    fn name(&self) -> &str {
        "switch"
    }

    fn arguments(&self) -> Vec<String> {
        let mut arguments = vec![self.selector.to_string()];
        arguments.extend(
            self.cases
                .iter()
                .map(|(key, targets)| format!("{key:?}: {}", targets_string(targets))),
        );
        if let Some(targets) = &self.otherwise {
            arguments.push(format!("_: {}", targets_string(targets)));
        }
        arguments
    }
}

impl<C, S, E, M> BranchFunction<C, S, E> for SwitchBranch<C, S, E, M>
where
    C: Weight,
    S: Object,
    E: Object,
    M: Object + Eq + Hash,
{
    type Selector = M;

    fn branch_selector(&self) -> &Compilation<C, S, M> {
        &self.selector
    }

    fn branches(&self) -> Vec<(M, &[Compilation<C, S, E>])> {
        self.cases
            .iter()
            .map(|(key, targets)| (key.clone(), targets.as_slice()))
            .collect()
    }

    fn select(&self, key: &M) -> Option<&[Compilation<C, S, E>]> {
        self.cases.get(key).map(Vec::as_slice)
    }

    fn fallback(&self) -> Fallback<'_, C, S, E> {
        match &self.otherwise {
            Some(targets) => Fallback::Default(targets),
            None => Fallback::Drop,
        }
    }
}

impl<C: Weight, S, E, M: fmt::Debug> fmt::Debug for SwitchBranch<C, S, E, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchBranch")
            .field("core", &self.core)
            .field("selector", &self.selector)
            .field("cases", &self.cases)
            .field("otherwise", &self.otherwise)
            .finish()
    }
}
