//! Output labels bound to a function
//!
//! Labels are a set: insertion order is irrelevant and duplicates collapse.
//! Duplicate bindings across a whole pipeline are the caller's concern.

use crate::error::CompileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of unique label names
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeSet<String>);

impl Labels {
    /// Empty label set
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Build a validated label set
    ///
    /// # Errors
    /// `CompileError::MalformedLabel` for the first malformed name.
    pub fn of<I, L>(labels: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut set = Self::none();
        for label in labels {
            set.insert(label)?;
        }
        Ok(set)
    }

    /// Insert a label, returning whether it was new
    ///
    /// # Errors
    /// `CompileError::MalformedLabel` if the name is empty, contains
    /// whitespace, or contains `@`.
    pub fn insert(&mut self, label: impl Into<String>) -> Result<bool, CompileError> {
        let label = label.into();
        validate(&label)?;
        Ok(self.0.insert(label))
    }

    /// Whether `label` is bound
    #[inline]
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Iterate labels in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of labels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no labels are bound
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validate(label: &str) -> Result<(), CompileError> {
    let reason = if label.is_empty() {
        "label is empty"
    } else if label.chars().any(char::is_whitespace) {
        "label contains whitespace"
    } else if label.contains('@') {
        "label contains '@'"
    } else {
        return Ok(());
    };
    Err(CompileError::MalformedLabel {
        label: label.to_string(),
        reason,
    })
}

/// Renders as `@a@b`, empty for no labels
impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.0 {
            write!(f, "@{label}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let labels = Labels::of(["a", "b", "a"]).unwrap();
        assert_eq!(labels.len(), 2);
        assert!(labels.contains("a"));
    }

    #[test]
    fn order_is_irrelevant() {
        assert_eq!(
            Labels::of(["x", "y"]).unwrap(),
            Labels::of(["y", "x"]).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["", "has space", "at@sign"] {
            assert!(matches!(
                Labels::of([bad]),
                Err(CompileError::MalformedLabel { .. })
            ));
        }
    }

    #[test]
    fn insert_reports_novelty() {
        let mut labels = Labels::none();
        assert!(labels.insert("a").unwrap());
        assert!(!labels.insert("a").unwrap());
    }

    #[test]
    fn display_suffix() {
        assert_eq!(Labels::of(["b", "a"]).unwrap().to_string(), "@a@b");
        assert_eq!(Labels::none().to_string(), "");
    }
}
