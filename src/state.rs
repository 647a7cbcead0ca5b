//! Application state and view dispatch
//!
//! [`AppState`] owns everything loaded from disk. [`render`] routes a
//! [`ViewRequest`] to the matching analysis and wraps the result in a
//! [`ViewModel`]. Requests never fail: a missing seed or center node turns
//! into [`ViewModel::Empty`].

use crate::analysis::{
    artist_roster, ego_network, extract_subgraph, genre_matrix, genre_timeline, influence_paths,
    influence_type_histogram, rising_stars_report, sankey_flows, seed_genres, ArtistEntry,
    EgoNetwork, GenreMatrix, GenreTimeline, InfluenceHistogram, InfluencePaths, RisingStarsReport,
    SankeyDiagram, Subgraph,
};
use crate::config::{AnalysisConfig, ConfigError};
use crate::graph::{load_graph, GraphStatistics, GraphStore, LoadError, LoadReport, NodeId, SongLookup};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StateResult<T> = Result<T, StateError>;

/// Loaded graph, optional song lookup and the config the views read
#[derive(Debug, Clone)]
pub struct AppState {
    pub graph: GraphStore,
    pub songs: Option<SongLookup>,
    pub config: AnalysisConfig,
    pub load_report: LoadReport,
}

impl AppState {
    pub fn new(graph: GraphStore, songs: Option<SongLookup>, config: AnalysisConfig) -> Self {
        Self {
            graph,
            songs,
            config,
            load_report: LoadReport::default(),
        }
    }

    /// Validate the config, then read the files it names
    pub fn load(config: AnalysisConfig) -> StateResult<Self> {
        config.validate()?;
        let (graph, load_report) = load_graph(&config.data.graph_path, &config.data.load_options())?;

        let songs = match &config.data.songs_path {
            Some(path) if path.exists() => Some(SongLookup::load(path)?),
            Some(path) => {
                warn!("Song lookup {} not found, using node attributes only", path.display());
                None
            }
            None => None,
        };

        Ok(Self {
            graph,
            songs,
            config,
            load_report,
        })
    }

    pub fn songs(&self) -> Option<&SongLookup> {
        self.songs.as_ref()
    }
}

/// Which view to compute. Parameters not carried here come from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    Summary,
    Artists,
    Subgraph { seeds: Vec<NodeId> },
    GenreMatrix,
    RisingStars,
    Influencers,
    Sankey,
    Timeline,
    Histogram,
    Ego,
}

impl ViewRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ViewRequest::Summary => "summary",
            ViewRequest::Artists => "artists",
            ViewRequest::Subgraph { .. } => "subgraph",
            ViewRequest::GenreMatrix => "genre_matrix",
            ViewRequest::RisingStars => "rising_stars",
            ViewRequest::Influencers => "influencers",
            ViewRequest::Sankey => "sankey",
            ViewRequest::Timeline => "timeline",
            ViewRequest::Histogram => "histogram",
            ViewRequest::Ego => "ego",
        }
    }
}

/// Computed data of one view, ready to print or serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewModel {
    Summary {
        statistics: GraphStatistics,
        load: LoadReport,
        song_records: usize,
    },
    Artists {
        artists: Vec<ArtistEntry>,
        seed: String,
        seed_genres: Vec<String>,
    },
    Subgraph(Subgraph),
    GenreMatrix {
        matrix: GenreMatrix,
        /// Heat color of every cell, row-major like the counts
        colors: Vec<Vec<String>>,
    },
    RisingStars(RisingStarsReport),
    Influencers(InfluencePaths),
    Sankey(SankeyDiagram),
    Timeline(GenreTimeline),
    Histogram(InfluenceHistogram),
    Ego(EgoNetwork),
    Empty {
        reason: String,
    },
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        matches!(self, ViewModel::Empty { .. })
    }
}

fn degrade(request: &ViewRequest, reason: impl ToString) -> ViewModel {
    let reason = reason.to_string();
    warn!("View {} is empty: {}", request.name(), reason);
    ViewModel::Empty { reason }
}

/// Compute the requested view from the current state
pub fn render(state: &AppState, request: &ViewRequest) -> ViewModel {
    let store = &state.graph;
    let songs = state.songs();
    let config = &state.config;
    debug!("Rendering view: {}", request.name());

    match request {
        ViewRequest::Summary => ViewModel::Summary {
            statistics: store.statistics(),
            load: state.load_report,
            song_records: songs.map(|s| s.len()).unwrap_or(0),
        },
        ViewRequest::Artists => {
            let seed = config.influence_paths.seed_name.clone();
            let genres = match seed_genres(store, &seed) {
                Ok(genres) => genres,
                Err(e) => {
                    warn!("No seed genres: {}", e);
                    Vec::new()
                }
            };
            ViewModel::Artists {
                artists: artist_roster(store),
                seed,
                seed_genres: genres,
            }
        }
        ViewRequest::Subgraph { seeds } => {
            ViewModel::Subgraph(extract_subgraph(store, seeds, config.subgraph.max_hops))
        }
        ViewRequest::GenreMatrix => {
            let section = &config.genre_matrix;
            let matrix = genre_matrix(store, section.min_year, section.max_year, section.mode);
            let scale = matrix.heat_scale();
            let colors = matrix
                .cells
                .iter()
                .map(|row| row.iter().map(|&v| scale.color(v)).collect())
                .collect();
            ViewModel::GenreMatrix { matrix, colors }
        }
        ViewRequest::RisingStars => {
            ViewModel::RisingStars(rising_stars_report(store, songs, &config.rising_stars))
        }
        ViewRequest::Influencers => match influence_paths(store, &config.influence_paths) {
            Ok(paths) => ViewModel::Influencers(paths),
            Err(e) => degrade(request, e),
        },
        ViewRequest::Sankey => ViewModel::Sankey(sankey_flows(store, songs, &config.sankey)),
        ViewRequest::Timeline => {
            ViewModel::Timeline(genre_timeline(store, songs, &config.sankey.focus_genre))
        }
        ViewRequest::Histogram => {
            ViewModel::Histogram(influence_type_histogram(store, &config.histogram))
        }
        ViewRequest::Ego => match ego_network(store, &config.ego.center_name, config.ego.view) {
            Ok(network) => ViewModel::Ego(network),
            Err(e) => degrade(request, e),
        },
    }
}

/// Write a view as pretty-printed JSON
pub fn export_view(view: &ViewModel, path: impl AsRef<Path>) -> StateResult<()> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| StateError::Export {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, view)?;
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    info!("Exported view to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeType, Node, NodeType};

    fn state() -> AppState {
        let graph = GraphStore::from_parts(
            vec![
                Node::new("1", NodeType::Person).with_name("Sailor Shift"),
                Node::new("2", NodeType::Song)
                    .with_name("Song A")
                    .with_genre("Oceanus Folk")
                    .with_release_date("2035")
                    .notable(true),
                Node::new("3", NodeType::Song)
                    .with_name("Song B")
                    .with_genre("Dream Pop")
                    .with_release_date("2030")
                    .notable(true),
            ],
            vec![
                Edge::new("1", "2", EdgeType::PerformerOf),
                Edge::new("2", "3", EdgeType::CoverOf),
            ],
        );
        AppState::new(graph, None, AnalysisConfig::default())
    }

    #[test]
    fn test_render_summary() {
        let view = render(&state(), &ViewRequest::Summary);
        match view {
            ViewModel::Summary {
                statistics,
                song_records,
                ..
            } => {
                assert_eq!(statistics.node_count, 3);
                assert_eq!(statistics.edge_count, 2);
                assert_eq!(song_records, 0);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_render_subgraph_uses_config_hops() {
        let mut state = state();
        state.config.subgraph.max_hops = 1;
        let view = render(
            &state,
            &ViewRequest::Subgraph {
                seeds: vec![NodeId::from("1")],
            },
        );
        let ViewModel::Subgraph(sub) = view else {
            panic!("expected subgraph");
        };
        assert_eq!(sub.nodes.len(), 2);
        assert_eq!(sub.links.len(), 1);
    }

    #[test]
    fn test_missing_center_degrades() {
        let mut state = state();
        state.config.ego.center_name = "Nobody".to_string();
        state.config.influence_paths.seed_name = "Nobody".to_string();

        assert!(render(&state, &ViewRequest::Ego).is_empty());
        assert!(render(&state, &ViewRequest::Influencers).is_empty());

        // The roster still renders without seed genres
        let ViewModel::Artists { artists, seed_genres, .. } = render(&state, &ViewRequest::Artists)
        else {
            panic!("expected artists");
        };
        assert_eq!(artists.len(), 1);
        assert!(seed_genres.is_empty());
    }

    #[test]
    fn test_genre_matrix_colors() {
        let view = render(&state(), &ViewRequest::GenreMatrix);
        let ViewModel::GenreMatrix { matrix, colors } = view else {
            panic!("expected genre matrix");
        };
        assert_eq!(matrix.genres, vec!["Dream Pop", "Oceanus Folk"]);
        assert_eq!(colors.len(), 2);
        assert!(colors.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_render_is_repeatable() {
        let state = state();
        for request in [ViewRequest::Sankey, ViewRequest::Timeline, ViewRequest::RisingStars] {
            assert_eq!(render(&state, &request), render(&state, &request));
        }
    }

    #[test]
    fn test_export_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sankey.json");
        export_view(&render(&state(), &ViewRequest::Sankey), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["view"], "sankey");
        assert_eq!(value["focus_genre"], "Oceanus Folk");
    }

    #[test]
    fn test_export_empty_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        let view = ViewModel::Empty {
            reason: "No node named 'Nobody'".to_string(),
        };
        export_view(&view, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["view"], "empty");
    }
}
