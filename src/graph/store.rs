//! In-memory graph storage implementation
//!
//! The store is built once from node and edge lists and never mutated.
//! Lookups by id go through a hash index; neighbor queries go through a
//! CSR topology view that keeps edges in their original order.

use super::edge::Edge;
use super::node::Node;
use super::types::{EdgeType, NodeId, NodeType};
use oceanus_graph_algorithms::{EdgeIndex, GraphView, NodeIndex};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during graph queries
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("No node named '{0}'")]
    NamedNodeNotFound(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Records discarded while building a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Nodes whose id was already taken by an earlier node
    pub duplicate_nodes: usize,
    /// Edges with an endpoint that names no node
    pub dangling_edges: usize,
}

/// Graph statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: BTreeMap<NodeType, usize>,
    pub edges_by_type: BTreeMap<EdgeType, usize>,
}

/// In-memory graph storage
///
/// - nodes: dense, in load order
/// - edges: dense, in load order, every endpoint resolves to a node
/// - index: NodeId -> position in `nodes`
/// - topology: CSR view over node positions, edge ids match `edges`
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: FxHashMap<NodeId, NodeIndex>,
    topology: GraphView,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store, silently discarding duplicate nodes and dangling edges
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self::build(nodes, edges).0
    }

    /// Build a store and report what was discarded.
    ///
    /// Duplicate node ids keep the first occurrence. Edges whose source or
    /// target is not a known node are dropped.
    pub fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> (Self, BuildStats) {
        let mut stats = BuildStats::default();
        let mut index = FxHashMap::default();
        let mut kept_nodes = Vec::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                stats.duplicate_nodes += 1;
                continue;
            }
            index.insert(node.id.clone(), kept_nodes.len());
            kept_nodes.push(node);
        }

        let mut kept_edges = Vec::with_capacity(edges.len());
        let mut pairs = Vec::with_capacity(edges.len());
        for edge in edges {
            match (index.get(&edge.source), index.get(&edge.target)) {
                (Some(&s), Some(&t)) => {
                    pairs.push((s, t));
                    kept_edges.push(edge);
                }
                _ => stats.dangling_edges += 1,
            }
        }

        if stats.duplicate_nodes > 0 {
            warn!(count = stats.duplicate_nodes, "Dropped nodes with duplicate ids");
        }
        if stats.dangling_edges > 0 {
            warn!(count = stats.dangling_edges, "Dropped edges with unknown endpoints");
        }

        let topology = GraphView::from_edges(kept_nodes.len(), &pairs);
        let store = GraphStore {
            nodes: kept_nodes,
            edges: kept_edges,
            index,
            topology,
        };
        (store, stats)
    }

    /// Get a node by id
    pub fn find_node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Get a node by id, failing when it does not exist
    pub fn get_node(&self, id: &NodeId) -> GraphResult<&Node> {
        self.find_node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    /// Check if node exists
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// First node whose `name` equals `name`
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name.as_deref() == Some(name))
    }

    /// First node whose `name` equals `name`, failing when there is none
    pub fn require_named(&self, name: &str) -> GraphResult<&Node> {
        self.find_by_name(name)
            .ok_or_else(|| GraphError::NamedNodeNotFound(name.to_string()))
    }

    /// Dense position of a node
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx]
    }

    pub fn edge_at(&self, idx: EdgeIndex) -> &Edge {
        &self.edges[idx]
    }

    /// All nodes, in load order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in load order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Topology view; node indices are positions in `nodes()`, edge indices
    /// positions in `edges()`
    pub fn topology(&self) -> &GraphView {
        &self.topology
    }

    /// Get all nodes of a type
    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.node_type == node_type).collect()
    }

    /// Get all edges of a type
    pub fn edges_of_type(&self, edge_type: EdgeType) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.edge_type == edge_type).collect()
    }

    /// Get outgoing edges from a node, in edge order
    pub fn outgoing(&self, id: &NodeId) -> Vec<&Edge> {
        match self.index_of(id) {
            Some(idx) => self
                .topology
                .out_edge_ids(idx)
                .iter()
                .map(|&e| &self.edges[e])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Get incoming edges to a node, in edge order
    pub fn incoming(&self, id: &NodeId) -> Vec<&Edge> {
        match self.index_of(id) {
            Some(idx) => self
                .topology
                .in_edge_ids(idx)
                .iter()
                .map(|&e| &self.edges[e])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every edge touching a node paired with the node on its other end, in
    /// edge order. Parallel edges yield repeated neighbors.
    pub fn neighbors(&self, id: &NodeId) -> Vec<(&Edge, &Node)> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.topology
            .incident(idx)
            .iter()
            // a self-loop is listed twice in the incidence list
            .filter(|inc| inc.forward || inc.neighbor != idx)
            .map(|inc| (&self.edges[inc.edge], &self.nodes[inc.neighbor]))
            .collect()
    }

    /// Get number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counts per node type and per edge type
    pub fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            ..Default::default()
        };
        for node in &self.nodes {
            *stats.nodes_by_type.entry(node.node_type).or_insert(0) += 1;
        }
        for edge in &self.edges {
            *stats.edges_by_type.entry(edge.edge_type).or_insert(0) += 1;
        }
        stats
    }
}
