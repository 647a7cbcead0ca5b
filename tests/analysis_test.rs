use oceanus::analysis::{
    extract_subgraph, genre_matrix, genre_timeline, influence_paths, sankey_flows, Era, MatrixMode,
};
use oceanus::config::{AnalysisConfig, InfluencePathsConfig, SankeyConfig};
use oceanus::graph::{load_graph, parse_graph, LoadError, LoadOptions, NodeId, SongLookup};
use oceanus::{render, AppState, StateError, ViewModel, ViewRequest};
use serde_json::json;
use std::io::Write;

fn sample_graph() -> serde_json::Value {
    json!({
        "directed": true,
        "nodes": [
            {"id": 1, "Node Type": "Person", "name": "Sailor Shift", "notable": true},
            {"id": 2, "Node Type": "Song", "name": "Song A", "genre": "Oceanus Folk",
             "release_date": "2028", "notable": true},
            {"id": 3, "Node Type": "Song", "name": "Song B", "genre": "Dream Pop",
             "release_date": 2025, "notable": true},
            {"id": 4, "Node Type": "Song", "name": "Demo", "genre": "Dream Pop",
             "release_date": "2024", "notable": false},
            {"id": 5, "Node Type": "Person", "name": "Kai"},
            {"id": 6, "Node Type": "Song", "name": "Song C", "notable": true,
             "release_date": "2033"},
            {"id": 7, "Node Type": "Spaceship", "name": "Nope"}
        ],
        "links": [
            {"source": 1, "target": 2, "Edge Type": "PerformerOf"},
            {"source": 2, "target": 3, "Edge Type": "InStyleOf"},
            {"source": 5, "target": 3, "Edge Type": "ComposerOf"},
            {"source": 6, "target": 2, "Edge Type": "CoverOf"},
            {"source": 1, "target": 4, "Edge Type": "ComposerOf"},
            {"source": 1, "target": 99, "Edge Type": "PerformerOf"},
            {"source": 5, "target": 6, "Edge Type": "Inspired"}
        ]
    })
}

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_report_counts_drops() {
    let (store, report) = parse_graph(&sample_graph().to_string(), &LoadOptions::default()).unwrap();

    assert_eq!(report.nodes_read, 7);
    assert_eq!(report.non_notable_works, 1);
    assert_eq!(report.unknown_node_types, 1);
    assert_eq!(report.nodes_kept, 5);
    assert_eq!(report.edges_read, 7);
    assert_eq!(report.unknown_edge_types, 1);
    // 99 never existed, 4 was dropped as non-notable
    assert_eq!(report.dangling_edges, 2);
    assert_eq!(report.edges_kept, 4);
    assert_eq!(store.edge_count(), 4);
    assert!(store.find_node(&NodeId::from("4")).is_none());
}

#[test]
fn test_keep_non_notable_works() {
    let options = LoadOptions {
        keep_non_notable_works: true,
    };
    let (store, report) = parse_graph(&sample_graph().to_string(), &options).unwrap();
    assert_eq!(report.non_notable_works, 0);
    assert!(store.has_node(&NodeId::from("4")));
    assert_eq!(store.edge_count(), 5);
}

#[test]
fn test_performer_scenario_subgraph() {
    let json = json!({
        "nodes": [
            {"id": "1", "Node Type": "Person", "name": "Sailor Shift"},
            {"id": "2", "Node Type": "Song", "name": "Song A", "notable": true}
        ],
        "links": [{"source": "1", "target": "2", "Edge Type": "PerformerOf"}]
    });
    let (store, _) = parse_graph(&json.to_string(), &LoadOptions::default()).unwrap();

    let sub = extract_subgraph(&store, &[NodeId::from("1")], 1);
    assert_eq!(sub.nodes.len(), 2);
    assert_eq!(sub.links.len(), 1);
    assert_eq!(sub.links[0].source, NodeId::from("1"));

    let empty = extract_subgraph(&store, &[], 3);
    assert!(empty.is_empty());
}

#[test]
fn test_dangling_edge_excluded_everywhere() {
    let (store, _) = parse_graph(&sample_graph().to_string(), &LoadOptions::default()).unwrap();
    let missing = NodeId::from("99");

    let sub = extract_subgraph(&store, &[NodeId::from("1")], 5);
    assert!(!sub.contains(&missing));
    assert!(sub.links.iter().all(|l| l.target != missing));

    let matrix = genre_matrix(&store, 1900, 2040, MatrixMode::Outgoing);
    assert_eq!(matrix.total(), 1);
    assert_eq!(matrix.value("Dream Pop", "Oceanus Folk"), Some(1));

    let sankey = sankey_flows(&store, None, &SankeyConfig::default());
    assert_eq!(sankey.total_outward(), 1);
    assert_eq!(sankey.total_inward(), 1);
    assert_eq!(sankey.inward.get("Unknown"), Some(&1));
}

#[test]
fn test_song_lookup_fills_missing_genre() {
    let (store, _) = parse_graph(&sample_graph().to_string(), &LoadOptions::default()).unwrap();
    let csv = write_temp("id,genre,release_date\n6,Sea Shanty,2033\n 3 ,,\n", ".csv");
    let songs = SongLookup::load(csv.path()).unwrap();
    assert_eq!(songs.len(), 2);

    let config = SankeyConfig {
        min_flow_strength: 1,
        ..Default::default()
    };
    let sankey = sankey_flows(&store, Some(&songs), &config);
    assert_eq!(sankey.inward.get("Sea Shanty"), Some(&1));
    assert_eq!(sankey.links.len(), 2);

    let pre = SankeyConfig {
        era: Era::Pre,
        ..config
    };
    assert!(sankey_flows(&store, Some(&songs), &pre).is_empty());

    let timeline = genre_timeline(&store, Some(&songs), "Oceanus Folk");
    assert_eq!(timeline.inward.len(), 1);
    assert_eq!(timeline.inward[0].year, 2028);
    assert_eq!(timeline.outward[0].year, 2028);
}

#[test]
fn test_influence_paths_end_to_end() {
    let (store, _) = parse_graph(&sample_graph().to_string(), &LoadOptions::default()).unwrap();
    let result = influence_paths(&store, &InfluencePathsConfig::default()).unwrap();

    // Song A is dated, so the walk stops there; nobody else contributed to it
    assert!(result.events.is_empty());
    assert!(result.top_contributors.is_empty());
    assert_eq!(result.seed, NodeId::from("1"));
}

#[test]
fn test_app_state_from_files() {
    let graph = write_temp(&sample_graph().to_string(), ".json");
    let songs = write_temp("id,genre,release_date\n6,Sea Shanty,2033\n", ".csv");

    let mut config = AnalysisConfig::default();
    config.data.graph_path = graph.path().to_path_buf();
    config.data.songs_path = Some(songs.path().to_path_buf());
    let state = AppState::load(config).unwrap();

    assert_eq!(state.load_report.nodes_kept, 5);
    match render(&state, &ViewRequest::Summary) {
        ViewModel::Summary {
            statistics,
            song_records,
            load,
        } => {
            assert_eq!(statistics.node_count, 5);
            assert_eq!(song_records, 1);
            assert_eq!(load.dangling_edges, 2);
        }
        other => panic!("unexpected view {:?}", other),
    }
}

#[test]
fn test_missing_songs_file_is_not_fatal() {
    let graph = write_temp(&sample_graph().to_string(), ".json");
    let dir = tempfile::tempdir().unwrap();

    let mut config = AnalysisConfig::default();
    config.data.graph_path = graph.path().to_path_buf();
    config.data.songs_path = Some(dir.path().join("absent.csv"));
    let state = AppState::load(config).unwrap();
    assert!(state.songs.is_none());
}

#[test]
fn test_missing_graph_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_graph(dir.path().join("missing.json"), &LoadOptions::default());
    assert!(matches!(result, Err(LoadError::Io { .. })));

    let mut config = AnalysisConfig::default();
    config.data.graph_path = dir.path().join("missing.json");
    config.data.songs_path = None;
    assert!(matches!(
        AppState::load(config),
        Err(StateError::Load(LoadError::Io { .. }))
    ));
}

#[test]
fn test_malformed_graph_json() {
    let result = parse_graph("{\"nodes\": [", &LoadOptions::default());
    assert!(matches!(result, Err(LoadError::Json(_))));
}

#[test]
fn test_render_every_view() {
    let (graph, report) = parse_graph(&sample_graph().to_string(), &LoadOptions::default()).unwrap();
    let mut state = AppState::new(graph, None, AnalysisConfig::default());
    state.load_report = report;

    let requests = [
        ViewRequest::Summary,
        ViewRequest::Artists,
        ViewRequest::Subgraph {
            seeds: vec![NodeId::from("1")],
        },
        ViewRequest::GenreMatrix,
        ViewRequest::RisingStars,
        ViewRequest::Influencers,
        ViewRequest::Sankey,
        ViewRequest::Timeline,
        ViewRequest::Histogram,
        ViewRequest::Ego,
    ];
    for request in &requests {
        let view = render(&state, request);
        assert!(!view.is_empty(), "{} degraded", request.name());
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["view"], request.name());
    }
}
