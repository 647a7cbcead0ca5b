//! Traversal algorithms
//!
//! Multi-source frontier expansion (n-hop reachability) and a bounded-depth
//! BFS that threads caller state along each discovered path.

use super::common::{EdgeIndex, GraphView, NodeIndex};
use std::collections::VecDeque;

/// Result of a multi-source frontier expansion
#[derive(Debug, Clone, Default)]
pub struct FrontierExpansion {
    /// Reached nodes: seeds first, then each hop's discoveries in discovery order
    pub reached: Vec<NodeIndex>,
    /// Hop at which each node was reached (`None` = unreached)
    pub hop_of: Vec<Option<usize>>,
    /// Every edge touching some frontier, listed once, in first-scan order
    pub scanned_edges: Vec<EdgeIndex>,
    /// Number of hops that actually ran
    pub hops_run: usize,
}

impl FrontierExpansion {
    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.hop_of.get(idx).is_some_and(|h| h.is_some())
    }
}

/// Expand a frontier from `seeds` for at most `max_hops` rounds.
///
/// Each round scans every edge touching the current frontier, in edge order,
/// regardless of where its far end lies. Edges are recorded the first time
/// they are scanned. The next frontier holds the endpoints of the scanned
/// edges that were not reached before this round. Stops early when the
/// frontier empties.
pub fn expand_frontier(view: &GraphView, seeds: &[NodeIndex], max_hops: usize) -> FrontierExpansion {
    let mut hop_of = vec![None; view.node_count];
    let mut reached = Vec::new();
    let mut frontier = Vec::new();

    for &seed in seeds {
        if seed < view.node_count && hop_of[seed].is_none() {
            hop_of[seed] = Some(0);
            reached.push(seed);
            frontier.push(seed);
        }
    }

    let mut edge_seen = vec![false; view.edge_count()];
    let mut scanned_edges = Vec::new();
    let mut hops_run = 0;

    for hop in 1..=max_hops {
        if frontier.is_empty() {
            break;
        }
        hops_run = hop;

        let mut hop_edges: Vec<EdgeIndex> = frontier
            .iter()
            .flat_map(|&n| view.incident(n).iter().map(|inc| inc.edge))
            .collect();
        hop_edges.sort_unstable();
        hop_edges.dedup();

        let mut next = Vec::new();
        for &edge in &hop_edges {
            if !edge_seen[edge] {
                edge_seen[edge] = true;
                scanned_edges.push(edge);
            }
            let (s, t) = view.endpoints[edge];
            for endpoint in [s, t] {
                if hop_of[endpoint].is_none() {
                    hop_of[endpoint] = Some(hop);
                    reached.push(endpoint);
                    next.push(endpoint);
                }
            }
        }
        frontier = next;
    }

    FrontierExpansion {
        reached,
        hop_of,
        scanned_edges,
        hops_run,
    }
}

/// One step of a bounded BFS: expanding `from` along `edge` towards `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub edge: EdgeIndex,
    /// True when `from` is the edge source
    pub forward: bool,
    /// Depth of `from`
    pub depth: usize,
}

/// What a bounded BFS does with a neighbor
pub enum Visit<S> {
    /// Queue the neighbor at depth + 1 carrying this state
    Enqueue(S),
    /// Do not continue through this neighbor
    Stop,
}

/// Breadth-first traversal over the undirected incidence lists, at most
/// `max_depth` steps away from `source`.
///
/// A node is marked visited when it is dequeued; later queue entries for it
/// are dropped. Nodes dequeued at `max_depth` are not expanded. The callback
/// sees each step with the state of the path that reached `from` and decides
/// whether the neighbor is queued.
///
/// Returns the number of nodes expanded.
pub fn bounded_bfs<S, F>(
    view: &GraphView,
    source: NodeIndex,
    initial: S,
    max_depth: usize,
    mut visit: F,
) -> usize
where
    F: FnMut(&S, &Step) -> Visit<S>,
{
    if source >= view.node_count {
        return 0;
    }

    let mut visited = vec![false; view.node_count];
    let mut queue = VecDeque::new();
    let mut expanded = 0;
    queue.push_back((source, initial, 0usize));

    while let Some((current, state, depth)) = queue.pop_front() {
        if visited[current] {
            continue;
        }
        visited[current] = true;
        expanded += 1;

        if depth >= max_depth {
            continue;
        }

        for inc in view.incident(current) {
            let step = Step {
                from: current,
                to: inc.neighbor,
                edge: inc.edge,
                forward: inc.forward,
                depth,
            };
            if let Visit::Enqueue(next) = visit(&state, &step) {
                queue.push_back((inc.neighbor, next, depth + 1));
            }
        }
    }

    expanded
}
