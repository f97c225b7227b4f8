//! Traversers - the unit of flow through a compilation

use crate::coefficient::{Coefficient, Weight};
use std::fmt;

/// Bound for anything that can ride a traverser
///
/// `Clone` is the copy-on-branch operation: every dispatched branch gets
/// its own value, so nothing is shared mutably between branches.
pub trait Object: Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> Object for T where T: Clone + fmt::Debug + Send + Sync + 'static {}

/// An object of type `S` together with its accumulated coefficient
#[derive(Debug, Clone, PartialEq)]
pub struct Traverser<C, S> {
    coefficient: Coefficient<C>,
    object: S,
}

impl<C: Weight, S> Traverser<C, S> {
    /// Traverser with unity coefficient
    #[inline]
    #[must_use]
    pub fn new(object: S) -> Self {
        Self {
            coefficient: Coefficient::unity(),
            object,
        }
    }

    /// Derive the next-stage traverser carrying `object`
    ///
    /// The new coefficient is this traverser's combined with `coefficient`
    /// (usually the coefficient of the function being passed).
    #[inline]
    #[must_use]
    pub fn split<E>(&self, object: E, coefficient: &Coefficient<C>) -> Traverser<C, E> {
        Traverser {
            coefficient: self.coefficient.combine(coefficient),
            object,
        }
    }

    /// Same object, coefficient combined with `coefficient`
    #[inline]
    #[must_use]
    pub fn weighted(self, coefficient: &Coefficient<C>) -> Self {
        if coefficient.is_unity() {
            return self;
        }
        Self {
            coefficient: self.coefficient.combine(coefficient),
            object: self.object,
        }
    }
}

impl<C, S> Traverser<C, S> {
    /// Traverser with explicit coefficient
    #[inline]
    #[must_use]
    pub fn with_coefficient(coefficient: Coefficient<C>, object: S) -> Self {
        Self {
            coefficient,
            object,
        }
    }

    /// The carried object
    #[inline]
    #[must_use]
    pub fn object(&self) -> &S {
        &self.object
    }

    /// The accumulated coefficient
    #[inline]
    #[must_use]
    pub fn coefficient(&self) -> &Coefficient<C> {
        &self.coefficient
    }

    /// Consume, returning the object
    #[inline]
    #[must_use]
    pub fn into_object(self) -> S {
        self.object
    }

    /// Consume, returning coefficient and object
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Coefficient<C>, S) {
        (self.coefficient, self.object)
    }
}
