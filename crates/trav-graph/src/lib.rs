//! Graph-side collaborator of the traversal machine
//!
//! The machine passes element identifiers through untouched. Coercing them
//! into a canonical form is the storage layer's job, configured per element
//! kind with an [`IdManager`]:
//!
//! ```
//! use trav_core::Value;
//! use trav_graph::{ElementId, GraphConfig, IdManager, MemoryGraph};
//!
//! let graph = MemoryGraph::new(GraphConfig::uniform(IdManager::Long));
//! let v = graph.add_vertex(Some(Value::from("100")), "person").unwrap();
//! assert_eq!(v, ElementId::Long(100));
//! assert!(graph.vertex(&Value::Double(100.0)).unwrap().is_some());
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod id;

pub use config::GraphConfig;
pub use error::{ElementKind, GraphError, IdError};
pub use graph::{Edge, MemoryGraph, Vertex, VertexProperty};
pub use id::{ElementId, IdManager};
