//! Graph file loading
//!
//! Reads the node-link JSON export (`{ nodes: [...], links: [...] }`) into a
//! [`GraphStore`]. Ids may be strings or numbers; unknown node or edge type
//! strings are dropped and counted, as are non-notable songs and albums
//! unless [`LoadOptions::keep_non_notable_works`] is set.

use super::edge::Edge;
use super::node::Node;
use super::store::GraphStore;
use super::types::{EdgeType, NodeId, NodeType};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while reading input files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Options applied while loading a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep songs and albums that are not flagged notable
    pub keep_non_notable_works: bool,
}

/// What happened to the records of a graph file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub nodes_read: usize,
    pub nodes_kept: usize,
    pub non_notable_works: usize,
    pub unknown_node_types: usize,
    pub duplicate_nodes: usize,
    pub edges_read: usize,
    pub edges_kept: usize,
    pub unknown_edge_types: usize,
    pub dangling_edges: usize,
}

impl LoadReport {
    pub fn nodes_dropped(&self) -> usize {
        self.non_notable_works + self.unknown_node_types + self.duplicate_nodes
    }

    pub fn edges_dropped(&self) -> usize {
        self.unknown_edge_types + self.dangling_edges
    }
}

#[derive(Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(rename = "Node Type")]
    node_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    stage_name: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    release_date: Option<String>,
    #[serde(default)]
    notable: Option<bool>,
}

#[derive(Deserialize)]
struct RawLink {
    source: NodeId,
    target: NodeId,
    #[serde(rename = "Edge Type")]
    edge_type: String,
}

/// Release dates show up both as `"2031"` and `2031`
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Load a graph file from disk
pub fn load_graph(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<(GraphStore, LoadReport)> {
    let path = path.as_ref();
    info!("Loading graph from: {}", path.display());
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_graph(BufReader::new(file), options)
}

/// Load a graph from any reader
pub fn read_graph<R: Read>(reader: R, options: &LoadOptions) -> LoadResult<(GraphStore, LoadReport)> {
    let raw: RawGraph = serde_json::from_reader(reader)?;
    Ok(assemble(raw, options))
}

/// Load a graph from a JSON string
pub fn parse_graph(json: &str, options: &LoadOptions) -> LoadResult<(GraphStore, LoadReport)> {
    let raw: RawGraph = serde_json::from_str(json)?;
    Ok(assemble(raw, options))
}

fn assemble(raw: RawGraph, options: &LoadOptions) -> (GraphStore, LoadReport) {
    let mut report = LoadReport {
        nodes_read: raw.nodes.len(),
        edges_read: raw.links.len(),
        ..Default::default()
    };

    let mut nodes = Vec::with_capacity(raw.nodes.len());
    for raw_node in raw.nodes {
        let Ok(node_type) = raw_node.node_type.parse::<NodeType>() else {
            debug!("Skipping node {} with type '{}'", raw_node.id, raw_node.node_type);
            report.unknown_node_types += 1;
            continue;
        };
        let notable = raw_node.notable.unwrap_or(false);
        if node_type.is_work() && !notable && !options.keep_non_notable_works {
            report.non_notable_works += 1;
            continue;
        }
        nodes.push(Node {
            id: raw_node.id,
            node_type,
            name: raw_node.name,
            stage_name: raw_node.stage_name,
            genre: raw_node.genre,
            release_date: raw_node.release_date,
            notable,
        });
    }

    let mut edges = Vec::with_capacity(raw.links.len());
    for link in raw.links {
        match link.edge_type.parse::<EdgeType>() {
            Ok(edge_type) => edges.push(Edge::new(link.source, link.target, edge_type)),
            Err(_) => report.unknown_edge_types += 1,
        }
    }

    let (store, stats) = GraphStore::build(nodes, edges);
    report.duplicate_nodes = stats.duplicate_nodes;
    report.dangling_edges = stats.dangling_edges;
    report.nodes_kept = store.node_count();
    report.edges_kept = store.edge_count();

    if report.unknown_node_types > 0 || report.unknown_edge_types > 0 {
        warn!(
            "Dropped {} nodes and {} edges with unknown types",
            report.unknown_node_types, report.unknown_edge_types
        );
    }
    info!(
        "Loaded {} nodes and {} edges ({} nodes, {} edges dropped)",
        report.nodes_kept,
        report.edges_kept,
        report.nodes_dropped(),
        report.edges_dropped()
    );

    (store, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "directed": true,
        "nodes": [
            {"id": 1, "Node Type": "Person", "name": "Sailor Shift"},
            {"id": "2", "Node Type": "Song", "name": "Tide", "genre": "Oceanus Folk",
             "release_date": "2028", "notable": true},
            {"id": 3, "Node Type": "Song", "name": "B-side", "notable": false},
            {"id": 4, "Node Type": "Album", "name": "Waves", "release_date": 2030, "notable": true},
            {"id": 5, "Node Type": "Spaceship", "name": "Nope"}
        ],
        "links": [
            {"source": 1, "target": 2, "Edge Type": "PerformerOf", "key": 0},
            {"source": 1, "target": 3, "Edge Type": "PerformerOf"},
            {"source": 1, "target": 4, "Edge Type": "Teleports"},
            {"source": 4, "target": "2", "Edge Type": "CoverOf"}
        ]
    }"#;

    #[test]
    fn test_parse_graph() {
        let (store, report) = parse_graph(SAMPLE, &LoadOptions::default()).unwrap();

        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 2);
        assert_eq!(report.nodes_read, 5);
        assert_eq!(report.non_notable_works, 1);
        assert_eq!(report.unknown_node_types, 1);
        assert_eq!(report.unknown_edge_types, 1);
        // the edge to the dropped B-side
        assert_eq!(report.dangling_edges, 1);
        assert_eq!(report.nodes_dropped(), 2);
        assert_eq!(report.edges_dropped(), 2);
    }

    #[test]
    fn test_numeric_fields_coerced() {
        let (store, _) = parse_graph(SAMPLE, &LoadOptions::default()).unwrap();
        let album = store.find_node(&NodeId::from("4")).unwrap();
        assert_eq!(album.release_date.as_deref(), Some("2030"));
        assert_eq!(album.release_year(), Some(2030));
        assert!(store.find_node(&NodeId::from("1")).is_some());
    }

    #[test]
    fn test_keep_non_notable_works() {
        let options = LoadOptions {
            keep_non_notable_works: true,
        };
        let (store, report) = parse_graph(SAMPLE, &options).unwrap();
        assert_eq!(store.node_count(), 4);
        assert_eq!(store.edge_count(), 3);
        assert_eq!(report.non_notable_works, 0);
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_graph("{ nodes: ", &LoadOptions::default());
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_graph("/nonexistent/graph.json", &LoadOptions::default());
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
