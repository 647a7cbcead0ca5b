//! Music graph data model
//!
//! This module implements the knowledge graph the analyses run over:
//! - Typed nodes (people, songs, albums, groups, labels)
//! - Directed, typed edges; parallel edges are allowed
//! - An immutable in-memory store with a hash index and CSR topology
//! - Loaders for the JSON graph export and the song analysis CSV

pub mod edge;
pub mod loader;
pub mod lookup;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, EdgeKey};
pub use loader::{load_graph, parse_graph, read_graph, LoadError, LoadOptions, LoadReport, LoadResult};
pub use lookup::{SongLookup, SongRecord};
pub use node::{parse_release_day, Node};
pub use store::{BuildStats, GraphError, GraphResult, GraphStatistics, GraphStore};
pub use types::{parse_year, EdgeType, NodeId, NodeType, UnknownTypeError};
