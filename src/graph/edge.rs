//! Edge implementation for the music graph

use super::types::{EdgeType, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed, typed edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Type of relationship
    pub edge_type: EdgeType,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, edge_type: EdgeType) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }

    /// Deduplication key `source-target-edgeType`
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            target: self.target.clone(),
            edge_type: self.edge_type,
        }
    }

    /// Check if this edge connects two specific nodes (in either direction)
    pub fn connects(&self, node1: &NodeId, node2: &NodeId) -> bool {
        (&self.source == node1 && &self.target == node2)
            || (&self.source == node2 && &self.target == node1)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: &NodeId) -> bool {
        &self.source == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: &NodeId) -> bool {
        &self.target == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint
    pub fn other_end(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Identity of an edge for deduplication purposes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
    pub edge_type: EdgeType,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.source, self.target, self.edge_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_direction() {
        let edge = Edge::new("1", "2", EdgeType::PerformerOf);
        let a = NodeId::from("1");
        let b = NodeId::from("2");
        let c = NodeId::from("3");

        assert!(edge.starts_from(&a));
        assert!(edge.ends_at(&b));
        assert!(edge.connects(&b, &a));
        assert!(!edge.connects(&a, &c));
        assert_eq!(edge.other_end(&b), Some(&a));
        assert_eq!(edge.other_end(&c), None);
    }

    #[test]
    fn test_edge_key_display() {
        let edge = Edge::new("7", "9", EdgeType::CoverOf);
        assert_eq!(edge.key().to_string(), "7-9-CoverOf");
        assert_eq!(edge.key(), Edge::new("7", "9", EdgeType::CoverOf).key());
        assert_ne!(edge.key(), Edge::new("7", "9", EdgeType::InStyleOf).key());
    }
}
