//! Coefficient algebra and pipeline composition properties

use proptest::prelude::*;
use trav_core::{
    Coefficient, Compilation, FilterFn, FunctionCore, Labels, MapFn, Traverser, Weight,
};

fn weighted_incr(c: u64) -> MapFn<u64, impl Fn(&i64) -> i64 + Send + Sync> {
    MapFn::new("incr", |x: &i64| x.wrapping_add(1))
        .with_core(FunctionCore::new(Coefficient::new(c), Labels::none()))
}

fn pipeline(coefficients: &[u64]) -> Compilation<u64, i64, i64> {
    coefficients
        .iter()
        .fold(Compilation::identity(), |c, w| c.map(weighted_incr(*w)))
}

proptest! {
    #[test]
    fn prop_u64_combination_is_associative(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
        let (a, b, c) = (Coefficient::new(a), Coefficient::new(b), Coefficient::new(c));
        prop_assert_eq!(a.combine(&b).combine(&c), a.combine(&b.combine(&c)));
    }

    #[test]
    fn prop_string_combination_is_associative(a in ".{0,8}", b in ".{0,8}", c in ".{0,8}") {
        let (a, b, c) = (Coefficient::new(a), Coefficient::new(b), Coefficient::new(c));
        prop_assert_eq!(a.combine(&b).combine(&c), a.combine(&b.combine(&c)));
    }

    #[test]
    fn prop_unity_is_neutral(a in any::<u64>()) {
        let a = Coefficient::new(a);
        prop_assert_eq!(a.combine(&Coefficient::unity()), a.clone());
        prop_assert_eq!(Coefficient::unity().combine(&a), a);
    }

    #[test]
    fn prop_identity_returns_exactly_its_input(x in any::<i64>(), w in 1..100u64) {
        let identity = Compilation::<u64, i64, i64>::identity();
        let input = Traverser::with_coefficient(Coefficient::new(w), x);
        let out: Vec<_> = identity.process(input.clone()).collect();
        prop_assert_eq!(out, vec![Ok(input)]);
    }

    #[test]
    fn prop_output_coefficient_is_pipeline_product(
        weights in proptest::collection::vec(1..16u64, 0..6),
        incoming in 1..16u64,
    ) {
        let program = pipeline(&weights);
        let out: Vec<_> = program
            .process(Traverser::with_coefficient(Coefficient::new(incoming), 0))
            .collect();
        let expected = weights.iter().fold(incoming, |acc, w| acc.combine(w));
        prop_assert_eq!(*out[0].as_ref().unwrap().coefficient().value(), expected);
        prop_assert_eq!(*program.coefficient().value(), weights.iter().product::<u64>());
    }

    #[test]
    fn prop_parallel_matches_serial(inputs in proptest::collection::vec(-1000..1000i64, 0..64)) {
        let build = || {
            Compilation::<u64, i64, i64>::identity()
                .map(MapFn::new("double", |x: &i64| x * 2))
                .filter(FilterFn::new("positive", |x: &i64| *x > 0))
        };
        let serial = build().evaluate_objects(inputs.clone()).unwrap();
        let parallel = build().parallel(4).unwrap().evaluate_objects(inputs).unwrap();
        prop_assert_eq!(serial, parallel);
    }
}

#[test]
fn test_display_is_ordered_function_list() {
    let program = pipeline(&[1, 3]);
    assert_eq!(program.to_string(), "[incr, {3}incr]");
    assert_eq!(program.functions().len(), 2);
}

#[test]
fn test_filter_keeps_coefficient_on_pass() {
    let program = Compilation::<u64, i64, i64>::identity().filter(
        FilterFn::new("any", |_: &i64| true)
            .with_core(FunctionCore::new(Coefficient::new(7), Labels::none())),
    );
    let out: Vec<_> = program.process(Traverser::new(1)).collect();
    assert_eq!(*out[0].as_ref().unwrap().coefficient().value(), 7);
}
