//! Per-year views of the focus genre: inward/outward influence counts and a
//! histogram of influence types

use super::attributes::WorkAttributes;
use super::sankey::focus_crossings;
use crate::config::HistogramConfig;
use crate::graph::{EdgeType, GraphStore, SongLookup};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Influence edges crossing the focus-genre boundary, per release year of
/// the focus-side work
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenreTimeline {
    pub focus_genre: String,
    pub outward: Vec<YearCount>,
    pub inward: Vec<YearCount>,
}

fn to_series(counts: BTreeMap<i32, usize>) -> Vec<YearCount> {
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

pub fn genre_timeline(store: &GraphStore, songs: Option<&SongLookup>, focus_genre: &str) -> GenreTimeline {
    let attrs = WorkAttributes::new(songs);
    let mut outward = BTreeMap::new();
    let mut inward = BTreeMap::new();

    for crossing in focus_crossings(store, &attrs, focus_genre) {
        let Some(year) = attrs.flow_year(crossing.focus_work()) else {
            continue;
        };
        let bucket = if crossing.inward { &mut inward } else { &mut outward };
        *bucket.entry(year).or_insert(0) += 1;
    }

    GenreTimeline {
        focus_genre: focus_genre.to_string(),
        outward: to_series(outward),
        inward: to_series(inward),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub year: i32,
    pub counts: BTreeMap<EdgeType, usize>,
}

impl HistogramBin {
    pub fn count(&self, edge_type: EdgeType) -> usize {
        self.counts.get(&edge_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfluenceHistogram {
    pub focus_genre: String,
    pub influence_types: Vec<EdgeType>,
    /// Years ascending; years without any matching edge are absent
    pub bins: Vec<HistogramBin>,
}

/// Count influence edges into focus-genre works, per target release year and
/// edge type. Only the node's own genre is consulted.
pub fn influence_type_histogram(store: &GraphStore, config: &HistogramConfig) -> InfluenceHistogram {
    let mut by_year: BTreeMap<i32, BTreeMap<EdgeType, usize>> = BTreeMap::new();

    for (edge, &(_, t)) in store.edges().iter().zip(&store.topology().endpoints) {
        if !config.influence_types.contains(&edge.edge_type) {
            continue;
        }
        let target = store.node_at(t);
        if target.genre.as_deref() != Some(config.focus_genre.as_str()) {
            continue;
        }
        let Some(year) = target.release_year() else {
            continue;
        };
        if year < config.min_year || year > config.max_year {
            continue;
        }
        *by_year
            .entry(year)
            .or_default()
            .entry(edge.edge_type)
            .or_insert(0) += 1;
    }

    debug!("Influence histogram over {} years", by_year.len());

    InfluenceHistogram {
        focus_genre: config.focus_genre.clone(),
        influence_types: config.influence_types.clone(),
        bins: by_year
            .into_iter()
            .map(|(year, counts)| HistogramBin { year, counts })
            .collect(),
    }
}
