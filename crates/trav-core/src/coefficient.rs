//! Coefficients carried by every function and traverser
//!
//! A [`Coefficient<C>`] is an immutable weight. New coefficients are derived by
//! combining two existing ones, either with the weight type's own rule
//! ([`Weight::combine`]) or with a caller supplied rule
//! ([`Coefficient::combine_with`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type usable as coefficient value
///
/// `combine` must be associative and `unity` must be its identity element.
pub trait Weight: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Identity element of [`Weight::combine`]
    fn unity() -> Self;

    /// Combine two weights (sequential or parallel composition)
    #[must_use]
    fn combine(&self, other: &Self) -> Self;

    /// Whether this weight is the identity element
    #[inline]
    fn is_unity(&self) -> bool {
        *self == Self::unity()
    }
}

/// Bulk counts. Saturating multiplication keeps combination associative.
impl Weight for u64 {
    #[inline]
    fn unity() -> Self {
        1
    }

    #[inline]
    fn combine(&self, other: &Self) -> Self {
        self.saturating_mul(*other)
    }
}

/// Probabilistic weights.
impl Weight for f64 {
    #[inline]
    fn unity() -> Self {
        1.0
    }

    #[inline]
    fn combine(&self, other: &Self) -> Self {
        self * other
    }
}

/// Descriptive weights, combined by concatenation.
impl Weight for String {
    #[inline]
    fn unity() -> Self {
        String::new()
    }

    fn combine(&self, other: &Self) -> Self {
        let mut joined = String::with_capacity(self.len() + other.len());
        joined.push_str(self);
        joined.push_str(other);
        joined
    }
}

/// Untyped weight: nothing to combine.
impl Weight for () {
    #[inline]
    fn unity() -> Self {}

    #[inline]
    fn combine(&self, _other: &Self) -> Self {}
}

/// Immutable weight attached to a function or traverser
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coefficient<C>(C);

impl<C> Coefficient<C> {
    /// Create a coefficient holding `value`
    #[inline]
    #[must_use]
    pub const fn new(value: C) -> Self {
        Self(value)
    }

    /// The weight value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &C {
        &self.0
    }

    /// Consume the coefficient, returning its value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> C {
        self.0
    }

    /// Derive a new coefficient using a caller supplied combination rule
    #[inline]
    #[must_use]
    pub fn combine_with<F>(&self, other: &Self, rule: F) -> Self
    where
        F: FnOnce(&C, &C) -> C,
    {
        Self(rule(&self.0, &other.0))
    }
}

impl<C: Weight> Coefficient<C> {
    /// The identity coefficient
    #[inline]
    #[must_use]
    pub fn unity() -> Self {
        Self(C::unity())
    }

    /// Whether this is the identity coefficient
    #[inline]
    #[must_use]
    pub fn is_unity(&self) -> bool {
        self.0.is_unity()
    }

    /// Derive a new coefficient using the weight's own rule
    #[inline]
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        Self(self.0.combine(&other.0))
    }

    /// Left-to-right combination of a sequence, starting from unity
    #[must_use]
    pub fn product<'a, I>(coefficients: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        coefficients
            .into_iter()
            .fold(Self::unity(), |acc, next| acc.combine(next))
    }
}

impl<C: Weight> Default for Coefficient<C> {
    fn default() -> Self {
        Self::unity()
    }
}

impl<C: fmt::Debug> fmt::Display for Coefficient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_is_identity_for_bulk() {
        let three = Coefficient::new(3u64);
        assert_eq!(three.combine(&Coefficient::unity()), three);
        assert_eq!(Coefficient::unity().combine(&three), three);
    }

    #[test]
    fn bulk_saturates_instead_of_wrapping() {
        let big = Coefficient::new(u64::MAX / 2);
        assert_eq!(*big.combine(&Coefficient::new(4)).value(), u64::MAX);
    }

    #[test]
    fn string_weights_concatenate() {
        let a = Coefficient::new("a".to_string());
        let b = Coefficient::new("b".to_string());
        assert_eq!(a.combine(&b).value(), "ab");
        assert!(Coefficient::<String>::unity().is_unity());
    }

    #[test]
    fn unit_weight_is_always_unity() {
        let c = Coefficient::new(());
        assert!(c.combine(&c).is_unity());
    }

    #[test]
    fn caller_supplied_rule() {
        let a = Coefficient::new(6u64);
        let b = Coefficient::new(4u64);
        let summed = a.combine_with(&b, |x, y| x + y);
        assert_eq!(*summed.value(), 10);
        // originals untouched
        assert_eq!(*a.value(), 6);
    }

    #[test]
    fn product_of_empty_is_unity() {
        let empty: Vec<Coefficient<u64>> = Vec::new();
        assert!(Coefficient::product(&empty).is_unity());
    }

    #[test]
    fn product_folds_left_to_right() {
        let parts = [
            Coefficient::new("x".to_string()),
            Coefficient::new("y".to_string()),
            Coefficient::new("z".to_string()),
        ];
        assert_eq!(Coefficient::product(&parts).value(), "xyz");
    }

    #[test]
    fn display_uses_debug_form() {
        assert_eq!(Coefficient::new(2u64).to_string(), "2");
    }
}
