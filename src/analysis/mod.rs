//! Analytics over the music graph
//!
//! Every analysis is a pure function of the store (and, where works need
//! genre or date fallbacks, the song lookup). Nothing here mutates state or
//! caches results between calls.

pub mod artists;
pub mod attributes;
pub mod ego;
pub mod genre_matrix;
pub mod influence_paths;
pub mod rising_stars;
pub mod sankey;
pub mod subgraph;
pub mod timeline;

pub use artists::{artist_roster, seed_genres, ArtistEntry};
pub use attributes::{WorkAttributes, UNKNOWN_GENRE};
pub use ego::{ego_network, EgoLink, EgoNetwork, EgoNode, EgoView, LinkDirection};
pub use genre_matrix::{genre_matrix, GenreMatrix, HeatScale, MatrixMode, NEUTRAL_COLOR};
pub use influence_paths::{
    collect_influence_events, influence_paths, ContributorRank, InfluenceEvent, InfluencePaths,
};
pub use rising_stars::{
    artist_metrics, find_rising_stars, rising_stars_report, ArtistMetrics, Collaboration,
    GenreVersatility, RisingStar, RisingStarsReport, ScoreInputs, TimelineEntry,
};
pub use sankey::{
    sankey_flows, Era, FlowCategory, GenreFlow, SankeyDiagram, SankeyLink, SankeyNode,
    FOCUS_COLOR, GENRE_COLOR,
};
pub use subgraph::{extract_subgraph, Subgraph};
pub use timeline::{
    genre_timeline, influence_type_histogram, GenreTimeline, HistogramBin, InfluenceHistogram,
    YearCount,
};
