//! Genre flow into and out of the focus genre
//!
//! Only song-to-song, album-to-song (etc.) edges count. Inward flows come
//! from other genres into focus-genre works, outward flows go from
//! focus-genre works to other genres. The era filter looks at the release
//! year of the focus-side work.

use super::attributes::WorkAttributes;
use crate::config::SankeyConfig;
use crate::graph::{Edge, EdgeType, GraphStore, Node, SongLookup};
use indexmap::IndexMap;
use oceanus_graph_algorithms::top_k_by_count;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const GENRE_COLOR: &str = "#ff6b35";
pub const FOCUS_COLOR: &str = "#45b7d1";

/// Fixed release-year bands of the dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    #[default]
    All,
    /// Up to 2023
    Pre,
    /// 2023 through 2030
    Mid,
    /// 2031 through 2039
    Peak,
}

impl Era {
    /// Whether a release year falls in the band. A missing year never does.
    pub fn admits(&self, year: Option<i32>) -> bool {
        let Some(year) = year else {
            return false;
        };
        match self {
            Era::All => true,
            Era::Pre => year <= 2023,
            Era::Mid => year > 2022 && year <= 2030,
            Era::Peak => year > 2030 && year <= 2039,
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Era::All => "all",
            Era::Pre => "pre",
            Era::Mid => "mid",
            Era::Peak => "peak",
        };
        f.write_str(name)
    }
}

impl FromStr for Era {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Era::All),
            "pre" => Ok(Era::Pre),
            "mid" => Ok(Era::Mid),
            "peak" => Ok(Era::Peak),
            other => Err(format!("unknown era '{other}' (expected all, pre, mid or peak)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowCategory {
    Genre,
    Focus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SankeyNode {
    pub id: String,
    pub name: String,
    pub category: FlowCategory,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SankeyLink {
    /// Index into the node list
    pub source: usize,
    pub target: usize,
    pub value: usize,
    pub color: &'static str,
}

/// One edge that crosses the focus-genre boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreFlow {
    pub from: String,
    pub to: String,
    pub from_genre: String,
    pub to_genre: String,
    pub edge_type: EdgeType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SankeyDiagram {
    pub focus_genre: String,
    pub era: Era,
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
    /// Source genre counts of inward flows, first-seen order
    pub inward: IndexMap<String, usize>,
    /// Target genre counts of outward flows, first-seen order, all genres
    pub outward: IndexMap<String, usize>,
    pub inward_flows: Vec<GenreFlow>,
    pub outward_flows: Vec<GenreFlow>,
}

impl SankeyDiagram {
    pub fn total_inward(&self) -> usize {
        self.inward_flows.len()
    }

    pub fn total_outward(&self) -> usize {
        self.outward_flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inward_flows.is_empty() && self.outward_flows.is_empty()
    }
}

/// A work-to-work edge that crosses the focus-genre boundary
pub(crate) struct Crossing<'g> {
    pub edge: &'g Edge,
    pub source: &'g Node,
    pub target: &'g Node,
    pub source_genre: &'g str,
    pub target_genre: &'g str,
    /// True when the target is the focus-genre side
    pub inward: bool,
}

impl<'g> Crossing<'g> {
    /// The focus-genre endpoint
    pub fn focus_work(&self) -> &'g Node {
        if self.inward {
            self.target
        } else {
            self.source
        }
    }

    fn to_flow(&self) -> GenreFlow {
        GenreFlow {
            from: self.source.display_name().to_string(),
            to: self.target.display_name().to_string(),
            from_genre: self.source_genre.to_string(),
            to_genre: self.target_genre.to_string(),
            edge_type: self.edge.edge_type,
        }
    }
}

/// Every work-to-work edge with exactly one focus-genre endpoint, in edge order
pub(crate) fn focus_crossings<'g>(
    store: &'g GraphStore,
    attrs: &WorkAttributes<'g>,
    focus_genre: &str,
) -> Vec<Crossing<'g>> {
    let topology = store.topology();
    let mut crossings = Vec::new();
    for (edge, &(s, t)) in store.edges().iter().zip(&topology.endpoints) {
        let source = store.node_at(s);
        let target = store.node_at(t);
        if !source.is_work() || !target.is_work() {
            continue;
        }
        let source_genre = attrs.flow_genre(source);
        let target_genre = attrs.flow_genre(target);
        let source_focus = source_genre == focus_genre;
        let target_focus = target_genre == focus_genre;
        if source_focus == target_focus {
            continue;
        }
        crossings.push(Crossing {
            edge,
            source,
            target,
            source_genre,
            target_genre,
            inward: target_focus,
        });
    }
    crossings
}

/// Build the flow diagram around `config.focus_genre`
pub fn sankey_flows(store: &GraphStore, songs: Option<&SongLookup>, config: &SankeyConfig) -> SankeyDiagram {
    let attrs = WorkAttributes::new(songs);
    let focus = config.focus_genre.as_str();

    let mut inward_flows = Vec::new();
    let mut outward_flows = Vec::new();
    for crossing in focus_crossings(store, &attrs, focus) {
        if !config.era.admits(attrs.flow_year(crossing.focus_work())) {
            continue;
        }
        if crossing.inward {
            inward_flows.push(crossing.to_flow());
        } else {
            outward_flows.push(crossing.to_flow());
        }
    }

    let mut inward: IndexMap<String, usize> = IndexMap::new();
    for f in &inward_flows {
        *inward.entry(f.from_genre.clone()).or_insert(0) += 1;
    }
    let mut outward: IndexMap<String, usize> = IndexMap::new();
    for f in &outward_flows {
        *outward.entry(f.to_genre.clone()).or_insert(0) += 1;
    }
    let top_outward = top_k_by_count(
        outward_flows.iter().map(|f| f.to_genre.clone()),
        config.max_outward_genres,
    );

    let mut nodes = Vec::new();
    let mut links = Vec::new();
    for genre in inward.keys() {
        nodes.push(SankeyNode {
            id: format!("inward_{genre}"),
            name: genre.clone(),
            category: FlowCategory::Genre,
            color: GENRE_COLOR,
        });
    }
    let focus_index = nodes.len();
    nodes.push(SankeyNode {
        id: "focus".to_string(),
        name: focus.to_string(),
        category: FlowCategory::Focus,
        color: FOCUS_COLOR,
    });
    for (genre, _) in &top_outward {
        nodes.push(SankeyNode {
            id: format!("outward_{genre}"),
            name: genre.clone(),
            category: FlowCategory::Genre,
            color: GENRE_COLOR,
        });
    }

    for (i, count) in inward.values().enumerate() {
        if *count >= config.min_flow_strength {
            links.push(SankeyLink {
                source: i,
                target: focus_index,
                value: *count,
                color: GENRE_COLOR,
            });
        }
    }
    for (i, (_, count)) in top_outward.iter().enumerate() {
        if *count >= config.min_flow_strength {
            links.push(SankeyLink {
                source: focus_index,
                target: focus_index + 1 + i,
                value: *count,
                color: FOCUS_COLOR,
            });
        }
    }

    debug!(
        "Sankey ({} era): {} inward and {} outward flows, {} links",
        config.era,
        inward_flows.len(),
        outward_flows.len(),
        links.len()
    );

    SankeyDiagram {
        focus_genre: focus.to_string(),
        era: config.era,
        nodes,
        links,
        inward,
        outward,
        inward_flows,
        outward_flows,
    }
}
