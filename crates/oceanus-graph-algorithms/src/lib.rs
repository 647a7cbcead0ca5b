pub mod common;
pub mod ranking;
pub mod traversal;

pub use common::{EdgeIndex, GraphView, Incidence, NodeIndex};
pub use ranking::{count_occurrences, rank_by_score, top_k_by_count};
pub use traversal::{bounded_bfs, expand_frontier, FrontierExpansion, Step, Visit};
