//! Relation graph built from triplets using petgraph.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use relgraph_core::Triplet;
use std::collections::HashMap;

/// A directed graph of entity labels connected by relation labels.
///
/// Nodes have set semantics. At most one edge exists per ordered
/// (subject, object) pair; a later triplet for the same pair replaces
/// the earlier edge's label.
///
/// # Example
///
/// ```rust
/// use relgraph_core::Triplet;
/// use relgraph_graph::RelationGraph;
///
/// let graph = RelationGraph::from_triplets(&[
///     Triplet::new("Paris", "is capital of", "France"),
///     Triplet::new("Paris", "located in", "France"),
/// ]);
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.edge_label("Paris", "France"), Some("located in"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    /// Node weight is the entity label, edge weight the relation label.
    graph: DiGraph<String, String>,

    /// Map from entity label to node index.
    index: HashMap<String, NodeIndex>,
}

/// A borrowed view of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub label: &'a str,
}

impl RelationGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from triplets, in input order.
    pub fn from_triplets(triplets: &[Triplet]) -> Self {
        let mut graph = Self::new();
        for triplet in triplets {
            graph.add_triplet(triplet);
        }
        graph
    }

    /// Insert both endpoints and add or relabel the subject -> object edge.
    pub fn add_triplet(&mut self, triplet: &Triplet) {
        let subject = self.get_or_create_node(&triplet.subject);
        let object = self.get_or_create_node(&triplet.object);
        self.graph
            .update_edge(subject, object, triplet.relation.clone());
    }

    /// Insert a node if it does not exist yet.
    pub fn get_or_create_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }

        let idx = self.graph.add_node(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    /// Number of distinct entities.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct (subject, object) pairs.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Entity labels in first-seen order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges in first-inserted order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(move |e| EdgeView {
            source: self.graph[e.source()].as_str(),
            target: self.graph[e.target()].as_str(),
            label: e.weight().as_str(),
        })
    }

    /// Current label of the source -> target edge, if any.
    pub fn edge_label(&self, source: &str, target: &str) -> Option<&str> {
        let a = *self.index.get(source)?;
        let b = *self.index.get(target)?;
        self.graph
            .find_edge(a, b)
            .map(|e| self.graph[e].as_str())
    }

    /// Get the underlying petgraph for layout and traversal.
    pub fn as_petgraph(&self) -> &DiGraph<String, String> {
        &self.graph
    }
}

impl<'a> FromIterator<&'a Triplet> for RelationGraph {
    fn from_iter<I: IntoIterator<Item = &'a Triplet>>(iter: I) -> Self {
        let mut graph = Self::new();
        for triplet in iter {
            graph.add_triplet(triplet);
        }
        graph
    }
}
