//! Oceanus music influence graph
//!
//! Influence analytics over a static music knowledge graph of people, songs,
//! albums, groups and labels joined by typed relationships such as
//! "performed", "is a cover of" or "directly samples".
//!
//! # Components
//!
//! - [`graph`]: the data model, the immutable [`GraphStore`] and the loaders
//!   for the node-link JSON export and the song analysis CSV
//! - [`analysis`]: subgraph extraction, the genre influence matrix,
//!   rising-star scoring, influence paths, Sankey genre flow, genre
//!   timelines, the influence-type histogram, ego networks and the artist
//!   roster
//! - [`config`]: YAML analysis configuration
//! - [`state`]: the loaded [`AppState`] and the `render` dispatch that turns
//!   a [`ViewRequest`] into a serializable [`ViewModel`]
//!
//! Everything is synchronous and in-memory. The store never changes after
//! load, and every analysis recomputes its result from scratch.
//!
//! ## Example Usage
//!
//! ```rust
//! use oceanus::analysis::extract_subgraph;
//! use oceanus::graph::{parse_graph, LoadOptions, NodeId};
//!
//! let json = r#"{
//!     "nodes": [
//!         {"id": 1, "Node Type": "Person", "name": "Sailor Shift"},
//!         {"id": 2, "Node Type": "Song", "name": "Song A", "notable": true}
//!     ],
//!     "links": [
//!         {"source": 1, "target": 2, "Edge Type": "PerformerOf"}
//!     ]
//! }"#;
//!
//! let (store, report) = parse_graph(json, &LoadOptions::default()).unwrap();
//! assert_eq!(report.nodes_kept, 2);
//!
//! let sub = extract_subgraph(&store, &[NodeId::from("1")], 1);
//! assert_eq!(sub.nodes.len(), 2);
//! assert_eq!(sub.links.len(), 1);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod graph;
pub mod state;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeType, GraphError, GraphResult, GraphStore, LoadError, LoadOptions, LoadReport,
    LoadResult, Node, NodeId, NodeType, SongLookup,
};

pub use config::{AnalysisConfig, ConfigError, ConfigResult};

pub use state::{export_view, render, AppState, StateError, StateResult, ViewModel, ViewRequest};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
