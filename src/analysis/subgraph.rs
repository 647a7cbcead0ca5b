//! N-hop neighborhood extraction around a seed set

use crate::graph::{Edge, EdgeKey, GraphStore, Node, NodeId};
use oceanus_graph_algorithms::expand_frontier;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

/// A node-link slice of the graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Edge>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }
}

/// Everything reachable within `max_hops` hops of any seed.
///
/// Each hop keeps every edge touching the current frontier, including edges
/// whose far end was reached earlier; an edge is attributed to the hop that
/// first scans it and later copies with the same `source-target-type` key are
/// skipped. Nodes come back in store order, links in scan order. Unknown seed
/// ids are ignored.
pub fn extract_subgraph(store: &GraphStore, seeds: &[NodeId], max_hops: usize) -> Subgraph {
    let seed_indices: Vec<_> = seeds.iter().filter_map(|id| store.index_of(id)).collect();
    if seed_indices.is_empty() {
        return Subgraph::default();
    }

    let expansion = expand_frontier(store.topology(), &seed_indices, max_hops);

    let nodes: Vec<Node> = store
        .nodes()
        .iter()
        .enumerate()
        .filter(|(idx, _)| expansion.contains(*idx))
        .map(|(_, node)| node.clone())
        .collect();

    let mut keys: FxHashSet<EdgeKey> = FxHashSet::default();
    let links: Vec<Edge> = expansion
        .scanned_edges
        .iter()
        .map(|&e| store.edge_at(e))
        .filter(|edge| keys.insert(edge.key()))
        .cloned()
        .collect();

    debug!(
        "Subgraph of {} seeds over {} hops: {} nodes, {} links",
        seed_indices.len(),
        expansion.hops_run,
        nodes.len(),
        links.len()
    );

    Subgraph { nodes, links }
}
