//! Minimal in-memory element store
//!
//! Every supplied identifier goes through the configured [`IdManager`] of its
//! element kind, both on insert and on lookup, so `100`, `100.0` and `"100"`
//! address the same vertex under [`IdManager::Long`].

use crate::config::GraphConfig;
use crate::error::{ElementKind, GraphError};
use crate::id::{ElementId, IdManager};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::atomic::AtomicU64;
use trav_core::Value;

/// Stored vertex
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Identifier
    pub id: ElementId,
    /// Label
    pub label: String,
}

/// Stored edge
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Identifier
    pub id: ElementId,
    /// Label
    pub label: String,
    /// Tail vertex
    pub out_vertex: ElementId,
    /// Head vertex
    pub in_vertex: ElementId,
}

/// Stored vertex property
#[derive(Debug, Clone, PartialEq)]
pub struct VertexProperty {
    /// Identifier
    pub id: ElementId,
    /// Owning vertex
    pub vertex: ElementId,
    /// Key
    pub key: String,
    /// Value
    pub value: Value,
}

#[derive(Debug, Default)]
struct Elements {
    vertices: IndexMap<ElementId, Vertex>,
    edges: IndexMap<ElementId, Edge>,
    properties: IndexMap<ElementId, VertexProperty>,
}

impl Elements {
    fn contains(&self, kind: ElementKind, id: &ElementId) -> bool {
        match kind {
            ElementKind::Vertex => self.vertices.contains_key(id),
            ElementKind::Edge => self.edges.contains_key(id),
            ElementKind::VertexProperty => self.properties.contains_key(id),
        }
    }
}

/// Thread-safe graph keyed by coerced identifiers
#[derive(Debug, Default)]
pub struct MemoryGraph {
    config: GraphConfig,
    elements: RwLock<Elements>,
    vertex_sequence: AtomicU64,
    edge_sequence: AtomicU64,
    property_sequence: AtomicU64,
}

impl MemoryGraph {
    /// Empty graph with the given id policies
    #[must_use]
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Id policies in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn manager(&self, kind: ElementKind) -> IdManager {
        match kind {
            ElementKind::Vertex => self.config.vertex_id_manager,
            ElementKind::Edge => self.config.edge_id_manager,
            ElementKind::VertexProperty => self.config.vertex_property_id_manager,
        }
    }

    fn sequence(&self, kind: ElementKind) -> &AtomicU64 {
        match kind {
            ElementKind::Vertex => &self.vertex_sequence,
            ElementKind::Edge => &self.edge_sequence,
            ElementKind::VertexProperty => &self.property_sequence,
        }
    }

    /// Coerce `id` under the policy for `kind`
    ///
    /// # Errors
    /// [`GraphError::Id`] when the policy rejects the value.
    pub fn coerce(&self, kind: ElementKind, id: &Value) -> Result<ElementId, GraphError> {
        Ok(self.manager(kind).convert(id)?)
    }

    /// Identifier for a new element; caller holds the write lock
    fn assign(
        &self,
        elements: &Elements,
        kind: ElementKind,
        supplied: Option<&Value>,
    ) -> Result<ElementId, GraphError> {
        if let Some(value) = supplied {
            let id = self.coerce(kind, value)?;
            if elements.contains(kind, &id) {
                return Err(GraphError::DuplicateId { kind, id });
            }
            return Ok(id);
        }
        // generated ids skip over ones supplied earlier
        loop {
            let id = self.manager(kind).next_id(self.sequence(kind))?;
            if !elements.contains(kind, &id) {
                return Ok(id);
            }
        }
    }

    /// Add a vertex, generating its id when none is supplied
    ///
    /// # Errors
    /// [`GraphError::Id`] or [`GraphError::DuplicateId`].
    pub fn add_vertex(
        &self,
        id: Option<Value>,
        label: impl Into<String>,
    ) -> Result<ElementId, GraphError> {
        let mut elements = self.elements.write();
        let id = self.assign(&elements, ElementKind::Vertex, id.as_ref())?;
        let vertex = Vertex {
            id: id.clone(),
            label: label.into(),
        };
        tracing::debug!(%id, label = %vertex.label, "vertex added");
        elements.vertices.insert(id.clone(), vertex);
        Ok(id)
    }

    /// Add an edge between two existing vertices
    ///
    /// # Errors
    /// [`GraphError::NotFound`] for a missing endpoint, otherwise as
    /// [`MemoryGraph::add_vertex`].
    pub fn add_edge(
        &self,
        id: Option<Value>,
        label: impl Into<String>,
        out_vertex: &ElementId,
        in_vertex: &ElementId,
    ) -> Result<ElementId, GraphError> {
        let mut elements = self.elements.write();
        for endpoint in [out_vertex, in_vertex] {
            if !elements.vertices.contains_key(endpoint) {
                return Err(GraphError::NotFound {
                    kind: ElementKind::Vertex,
                    id: endpoint.clone(),
                });
            }
        }
        let id = self.assign(&elements, ElementKind::Edge, id.as_ref())?;
        let edge = Edge {
            id: id.clone(),
            label: label.into(),
            out_vertex: out_vertex.clone(),
            in_vertex: in_vertex.clone(),
        };
        tracing::debug!(%id, label = %edge.label, %out_vertex, %in_vertex, "edge added");
        elements.edges.insert(id.clone(), edge);
        Ok(id)
    }

    /// Attach a property to an existing vertex
    ///
    /// # Errors
    /// [`GraphError::NotFound`] for a missing vertex, otherwise as
    /// [`MemoryGraph::add_vertex`].
    pub fn add_vertex_property(
        &self,
        vertex: &ElementId,
        id: Option<Value>,
        key: impl Into<String>,
        value: Value,
    ) -> Result<ElementId, GraphError> {
        let mut elements = self.elements.write();
        if !elements.vertices.contains_key(vertex) {
            return Err(GraphError::NotFound {
                kind: ElementKind::Vertex,
                id: vertex.clone(),
            });
        }
        let id = self.assign(&elements, ElementKind::VertexProperty, id.as_ref())?;
        let property = VertexProperty {
            id: id.clone(),
            vertex: vertex.clone(),
            key: key.into(),
            value,
        };
        tracing::debug!(%id, %vertex, key = %property.key, "vertex property added");
        elements.properties.insert(id.clone(), property);
        Ok(id)
    }

    /// Look up a vertex by any representation of its id
    ///
    /// # Errors
    /// [`GraphError::Id`] when `id` does not coerce.
    pub fn vertex(&self, id: &Value) -> Result<Option<Vertex>, GraphError> {
        let id = self.coerce(ElementKind::Vertex, id)?;
        Ok(self.elements.read().vertices.get(&id).cloned())
    }

    /// Look up an edge by any representation of its id
    ///
    /// # Errors
    /// [`GraphError::Id`] when `id` does not coerce.
    pub fn edge(&self, id: &Value) -> Result<Option<Edge>, GraphError> {
        let id = self.coerce(ElementKind::Edge, id)?;
        Ok(self.elements.read().edges.get(&id).cloned())
    }

    /// Look up a vertex property by any representation of its id
    ///
    /// # Errors
    /// [`GraphError::Id`] when `id` does not coerce.
    pub fn vertex_property(&self, id: &Value) -> Result<Option<VertexProperty>, GraphError> {
        let id = self.coerce(ElementKind::VertexProperty, id)?;
        Ok(self.elements.read().properties.get(&id).cloned())
    }

    /// Properties of `vertex` in insertion order
    #[must_use]
    pub fn properties_of(&self, vertex: &ElementId) -> Vec<VertexProperty> {
        self.elements
            .read()
            .properties
            .values()
            .filter(|p| &p.vertex == vertex)
            .cloned()
            .collect()
    }

    /// Edges leaving `vertex` in insertion order
    #[must_use]
    pub fn out_edges(&self, vertex: &ElementId) -> Vec<Edge> {
        self.elements
            .read()
            .edges
            .values()
            .filter(|e| &e.out_vertex == vertex)
            .cloned()
            .collect()
    }

    /// Number of vertices
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.elements.read().vertices.len()
    }

    /// Number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.elements.read().edges.len()
    }

    /// Number of vertex properties
    #[must_use]
    pub fn vertex_property_count(&self) -> usize {
        self.elements.read().properties.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdError;

    fn long_graph() -> MemoryGraph {
        MemoryGraph::new(GraphConfig::uniform(IdManager::Long))
    }

    #[test]
    fn duplicate_ids_rejected_across_representations() {
        let graph = long_graph();
        graph.add_vertex(Some(Value::Int(1)), "a").unwrap();
        let err = graph.add_vertex(Some(Value::from("1")), "b").unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateId {
                kind: ElementKind::Vertex,
                id: ElementId::Long(1)
            }
        );
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn kinds_have_separate_id_spaces() {
        let graph = long_graph();
        let v = graph.add_vertex(Some(Value::Long(1)), "a").unwrap();
        let e = graph.add_edge(Some(Value::Long(1)), "self", &v, &v).unwrap();
        assert_eq!(v, e);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn generated_ids_skip_supplied_ones() {
        let graph = long_graph();
        graph.add_vertex(Some(Value::Long(0)), "a").unwrap();
        graph.add_vertex(Some(Value::Long(1)), "b").unwrap();
        assert_eq!(graph.add_vertex(None, "c").unwrap(), ElementId::Long(2));
    }

    #[test]
    fn missing_endpoint() {
        let graph = long_graph();
        let v = graph.add_vertex(None, "a").unwrap();
        let err = graph
            .add_edge(None, "knows", &v, &ElementId::Long(42))
            .unwrap_err();
        assert!(matches!(err, GraphError::NotFound { kind: ElementKind::Vertex, .. }));
        let err = graph
            .add_vertex_property(&ElementId::Long(42), None, "k", Value::Null)
            .unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
    }

    #[test]
    fn uncoercible_lookup_is_an_error() {
        let graph = MemoryGraph::new(GraphConfig::uniform(IdManager::Uuid));
        let err = graph.vertex(&Value::Long(1)).unwrap_err();
        assert!(matches!(err, GraphError::Id(IdError::Unsupported { .. })));
    }

    #[test]
    fn adjacency_in_insertion_order() {
        let graph = MemoryGraph::default();
        let a = graph.add_vertex(Some(Value::from("a")), "person").unwrap();
        let b = graph.add_vertex(Some(Value::from("b")), "person").unwrap();
        graph.add_edge(None, "knows", &a, &b).unwrap();
        graph.add_edge(None, "likes", &a, &a).unwrap();
        graph.add_vertex_property(&a, None, "name", Value::from("ann")).unwrap();

        let labels: Vec<_> = graph.out_edges(&a).into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["knows", "likes"]);
        assert!(graph.out_edges(&b).is_empty());
        assert_eq!(graph.properties_of(&a)[0].value, Value::from("ann"));
    }
}
