//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

/// Dense node index (0..N)
pub type NodeIndex = usize;

/// Dense edge index, the position of the edge in the list the view was built from
pub type EdgeIndex = usize;

/// One entry of the undirected incidence list of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    /// Edge that connects the two nodes
    pub edge: EdgeIndex,
    /// The node on the other end of the edge
    pub neighbor: NodeIndex,
    /// True when the owning node is the edge source
    pub forward: bool,
}

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Besides the directed out/in structures the view keeps an undirected
/// incidence list. Every list is ordered by edge index, so traversals that
/// walk it reproduce the order of the original edge list.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// (source, target) per edge index
    pub endpoints: Vec<(NodeIndex, NodeIndex)>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<NodeIndex>,
    /// Edge index aligned with `out_targets`
    pub out_edges: Vec<EdgeIndex>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<NodeIndex>,
    /// Edge index aligned with `in_sources`
    pub in_edges: Vec<EdgeIndex>,

    /// Undirected incidence lists. Offsets into `incidence`. Size = node_count + 1
    pub incidence_offsets: Vec<usize>,
    pub incidence: Vec<Incidence>,
}

impl GraphView {
    /// Build a view from an edge list of (source, target) pairs.
    ///
    /// Pairs that reference an index `>= node_count` are left out of every
    /// adjacency structure but keep their slot in `endpoints`, so edge indices
    /// stay aligned with the caller's list.
    pub fn from_edges(node_count: usize, edges: &[(NodeIndex, NodeIndex)]) -> Self {
        let valid = |&(s, t): &(NodeIndex, NodeIndex)| s < node_count && t < node_count;

        let mut out_degree = vec![0usize; node_count];
        let mut in_degree = vec![0usize; node_count];
        for &(s, t) in edges.iter().filter(|e| valid(e)) {
            out_degree[s] += 1;
            in_degree[t] += 1;
        }

        let out_offsets = prefix_sums(&out_degree);
        let in_offsets = prefix_sums(&in_degree);
        let incident_degree: Vec<usize> = out_degree
            .iter()
            .zip(&in_degree)
            .map(|(o, i)| o + i)
            .collect();
        let incidence_offsets = prefix_sums(&incident_degree);

        let edge_total = out_offsets[node_count];
        let mut out_targets = vec![0; edge_total];
        let mut out_edges = vec![0; edge_total];
        let mut in_sources = vec![0; edge_total];
        let mut in_edges = vec![0; edge_total];
        let mut incidence = vec![
            Incidence {
                edge: 0,
                neighbor: 0,
                forward: false,
            };
            edge_total * 2
        ];

        let mut out_cursor = out_offsets[..node_count].to_vec();
        let mut in_cursor = in_offsets[..node_count].to_vec();
        let mut inc_cursor = incidence_offsets[..node_count].to_vec();

        for (edge, &(s, t)) in edges.iter().enumerate() {
            if !valid(&(s, t)) {
                continue;
            }
            out_targets[out_cursor[s]] = t;
            out_edges[out_cursor[s]] = edge;
            out_cursor[s] += 1;

            in_sources[in_cursor[t]] = s;
            in_edges[in_cursor[t]] = edge;
            in_cursor[t] += 1;

            incidence[inc_cursor[s]] = Incidence {
                edge,
                neighbor: t,
                forward: true,
            };
            inc_cursor[s] += 1;
            incidence[inc_cursor[t]] = Incidence {
                edge,
                neighbor: s,
                forward: false,
            };
            inc_cursor[t] += 1;
        }

        GraphView {
            node_count,
            endpoints: edges.to_vec(),
            out_offsets,
            out_targets,
            out_edges,
            in_offsets,
            in_sources,
            in_edges,
            incidence_offsets,
            incidence,
        }
    }

    /// Number of edge slots (including any that were left out of the adjacency)
    pub fn edge_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.out_targets[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.in_sources[self.in_offsets[idx]..self.in_offsets[idx + 1]]
    }

    /// Edge indices leaving a node, in edge order
    pub fn out_edge_ids(&self, idx: NodeIndex) -> &[EdgeIndex] {
        &self.out_edges[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Edge indices entering a node, in edge order
    pub fn in_edge_ids(&self, idx: NodeIndex) -> &[EdgeIndex] {
        &self.in_edges[self.in_offsets[idx]..self.in_offsets[idx + 1]]
    }

    /// Every edge touching a node regardless of direction, in edge order.
    /// A self-loop appears twice (forward, then backward).
    pub fn incident(&self, idx: NodeIndex) -> &[Incidence] {
        &self.incidence[self.incidence_offsets[idx]..self.incidence_offsets[idx + 1]]
    }
}

fn prefix_sums(degrees: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(degrees.len() + 1);
    let mut running = 0;
    offsets.push(0);
    for d in degrees {
        running += d;
        offsets.push(running);
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_view_projection() {
        // 0 -> 1 -> 2, 2 -> 0
        let view = GraphView::from_edges(3, &[(0, 1), (1, 2), (2, 0)]);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.successors(0), &[1]);
        assert_eq!(view.predecessors(0), &[2]);
        assert_eq!(view.out_degree(1), 1);
        assert_eq!(view.in_degree(2), 1);
        assert_eq!(view.out_edge_ids(2), &[2]);
    }

    #[test]
    fn test_incidence_keeps_edge_order() {
        let view = GraphView::from_edges(3, &[(1, 0), (0, 2), (2, 0)]);
        let incident = view.incident(0);

        assert_eq!(incident.len(), 3);
        assert_eq!(incident[0], Incidence { edge: 0, neighbor: 1, forward: false });
        assert_eq!(incident[1], Incidence { edge: 1, neighbor: 2, forward: true });
        assert_eq!(incident[2], Incidence { edge: 2, neighbor: 2, forward: false });
    }

    #[test]
    fn test_self_loop_listed_twice() {
        let view = GraphView::from_edges(1, &[(0, 0)]);
        let incident = view.incident(0);
        assert_eq!(incident.len(), 2);
        assert!(incident[0].forward);
        assert!(!incident[1].forward);
    }

    #[test]
    fn test_out_of_range_edges_skipped() {
        let view = GraphView::from_edges(2, &[(0, 5), (0, 1)]);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.successors(0), &[1]);
        assert_eq!(view.out_edge_ids(0), &[1]);
        assert_eq!(view.incident(1).len(), 1);
    }
}
