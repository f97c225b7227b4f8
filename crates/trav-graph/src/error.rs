//! Error types for the graph collaborator

use crate::id::{ElementId, IdManager};
use std::fmt;
use trav_core::ValueKind;

/// Identifier coercion failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The manager never accepts values of this kind
    #[error("{manager} id manager does not accept {found} identifiers")]
    Unsupported {
        /// Policy that rejected the value
        manager: IdManager,
        /// Kind of the supplied value
        found: ValueKind,
    },

    /// Right kind, but the value does not convert
    #[error("{manager} id manager cannot convert {value}: {reason}")]
    Malformed {
        /// Policy that rejected the value
        manager: IdManager,
        /// Rendered input
        value: String,
        /// What went wrong
        reason: String,
    },

    /// The generator ran out of identifiers
    #[error("{manager} id manager has no identifiers left")]
    Exhausted {
        /// Exhausted policy
        manager: IdManager,
    },
}

/// The three element kinds carrying identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Vertex
    Vertex,
    /// Edge
    Edge,
    /// Property attached to a vertex
    VertexProperty,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
            Self::VertexProperty => "vertex property",
        })
    }
}

/// Graph mutation and lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Identifier could not be coerced
    #[error(transparent)]
    Id(#[from] IdError),

    /// Identifier already taken within its kind
    #[error("{kind} with id {id} already exists")]
    DuplicateId {
        /// Element kind
        kind: ElementKind,
        /// Conflicting identifier
        id: ElementId,
    },

    /// Referenced element is missing
    #[error("{kind} with id {id} does not exist")]
    NotFound {
        /// Element kind
        kind: ElementKind,
        /// Missing identifier
        id: ElementId,
    },
}
