use super::{targets_string, BranchFunction};
use crate::coefficient::{Coefficient, Weight};
use crate::compilation::Compilation;
use crate::function::{Function, FunctionCore};
use crate::labels::Labels;
use crate::processor::ConstantProcessor;
use crate::traverser::Object;
use std::fmt;

/// Unconditional fan-out: every traverser enters every sub-pipeline
///
/// The selector is a constant `true` and the only key is `true`, so
/// nothing is ever dropped. With no sub-pipelines the union emits nothing.
pub struct UnionBranch<C, S, E> {
    core: FunctionCore<C>,
    selector: Compilation<C, S, bool>,
    branches: Vec<Compilation<C, S, E>>,
}

impl<C, S, E> UnionBranch<C, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
{
    /// Union of `branches` with unity coefficient and no labels
    #[must_use]
    pub fn new(branches: Vec<Compilation<C, S, E>>) -> Self {
        Self {
            core: FunctionCore::default(),
            selector: Compilation::from_processor(ConstantProcessor::new(true)),
            branches,
        }
    }

    /// Union of `branches` weighted by `coefficient` and tagged with `labels`
    #[must_use]
    pub fn weighted(
        coefficient: Coefficient<C>,
        labels: Labels,
        branches: Vec<Compilation<C, S, E>>,
    ) -> Self {
        Self::new(branches).with_core(FunctionCore::new(coefficient, labels))
    }

    /// Replace coefficient and labels
    #[must_use]
    pub fn with_core(mut self, core: FunctionCore<C>) -> Self {
        self.core = core;
        self
    }

    /// Sub-pipelines in dispatch order
    #[inline]
    #[must_use]
    pub fn sub_pipelines(&self) -> &[Compilation<C, S, E>] {
        &self.branches
    }
}

impl<C, S, E> Function<C> for UnionBranch<C, S, E>
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
        "union"
    }

    fn arguments(&self) -> Vec<String> {
        vec![targets_string(&self.branches)]
    }
}

impl<C, S, E> BranchFunction<C, S, E> for UnionBranch<C, S, E>
where
    C: Weight,
    S: Object,
    E: Object,
{
    type Selector = bool;

    fn branch_selector(&self) -> &Compilation<C, S, bool> {
        &self.selector
    }

    fn branches(&self) -> Vec<(bool, &[Compilation<C, S, E>])> {
        vec![(true, self.branches.as_slice())]
    }

    fn select(&self, key: &bool) -> Option<&[Compilation<C, S, E>]> {
        key.then_some(self.branches.as_slice())
    }
}

impl<C: Weight, S, E> fmt::Debug for UnionBranch<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionBranch")
            .field("core", &self.core)
            .field("branches", &self.branches)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::MapFn;
    use crate::Traverser;

    fn noop() -> Compilation<u64, &'static str, &'static str> {
        Compilation::identity()
    }

    #[test]
    fn every_traverser_enters_every_branch() {
        let union = UnionBranch::new(vec![noop(), noop()]);
        let out: Vec<_> = super::super::dispatch(&union, Traverser::new("x"))
            .map(|r| r.unwrap().into_object())
            .collect();
        assert_eq!(out, vec!["x", "x"]);
    }

    #[test]
    fn empty_union_emits_nothing() {
        let union: UnionBranch<u64, &str, &str> = UnionBranch::new(Vec::new());
        assert_eq!(super::super::dispatch(&union, Traverser::new("x")).count(), 0);
    }

    #[test]
    fn single_true_entry() {
        let union = UnionBranch::new(vec![noop(), noop(), noop()]);
        let entries = union.branches();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].0);
        assert_eq!(entries[0].1.len(), 3);
        assert!(union.select(&false).is_none());
    }

    #[test]
    fn selector_has_no_functions() {
        let union = UnionBranch::new(vec![noop()]);
        assert!(union.branch_selector().is_empty());
    }

    #[test]
    fn displays_nested_pipelines() {
        let incr = Compilation::<u64, i64, i64>::identity().map(MapFn::new("incr", |x: &i64| x + 1));
        let union = UnionBranch::new(vec![incr, Compilation::identity()]).with_core(
            FunctionCore::new(Coefficient::new(2), Labels::of(["a"]).unwrap()),
        );
        let f: &dyn Function<u64> = &union;
        assert_eq!(f.to_string(), "{2}union([incr], [])@a");
    }

    #[test]
    fn weighted_construction_sets_coefficient_and_labels() {
        let union = UnionBranch::weighted(
            Coefficient::new(3u64),
            Labels::of(["u"]).unwrap(),
            vec![noop(), noop()],
        );
        assert_eq!(union.coefficient(), &Coefficient::new(3));
        assert!(union.labels().contains("u"));
        assert_eq!(union.sub_pipelines().len(), 2);
        let out: Vec<_> = super::super::dispatch(&union, Traverser::new("x"))
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.coefficient() == &Coefficient::new(3)));
    }
}
