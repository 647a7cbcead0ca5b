//! Ego network of a named artist
//!
//! Two views over the same center:
//! - `collaborations`: direct contribution and membership ties, plus the
//!   other members of the center's groups and the other contributors of
//!   songs the center wrote lyrics for
//! - `influences`: direct influence-type ties only

use crate::graph::{EdgeType, GraphError, GraphResult, GraphStore, NodeId, NodeType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EgoView {
    #[default]
    Collaborations,
    Influences,
}

impl EgoView {
    /// Edge types followed from the center
    pub fn edge_types(&self) -> Vec<EdgeType> {
        match self {
            EgoView::Collaborations => {
                let mut types = EdgeType::CONTRIBUTION.to_vec();
                types.push(EdgeType::MemberOf);
                types
            }
            EgoView::Influences => EdgeType::INFLUENCE.to_vec(),
        }
    }
}

impl fmt::Display for EgoView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EgoView::Collaborations => write!(f, "collaborations"),
            EgoView::Influences => write!(f, "influences"),
        }
    }
}

impl FromStr for EgoView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collaborations" => Ok(EgoView::Collaborations),
            "influences" => Ok(EgoView::Influences),
            other => Err(format!(
                "unknown ego view '{other}' (expected collaborations or influences)"
            )),
        }
    }
}

/// Direction of a link relative to the center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirection {
    Out,
    In,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgoNode {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    pub depth: usize,
    pub is_center: bool,
    pub notable: bool,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EgoLink {
    pub source: NodeId,
    pub target: NodeId,
    pub edge_type: EdgeType,
    pub is_influence: bool,
    pub direction: LinkDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgoNetwork {
    pub center: NodeId,
    pub view: EgoView,
    pub nodes: Vec<EgoNode>,
    pub links: Vec<EgoLink>,
}

impl EgoNetwork {
    pub fn nodes_at_depth(&self, depth: usize) -> impl Iterator<Item = &EgoNode> {
        self.nodes.iter().filter(move |n| n.depth == depth)
    }
}

struct Builder<'g> {
    store: &'g GraphStore,
    nodes: IndexMap<usize, EgoNode>,
    links: IndexMap<(NodeId, NodeId), EgoLink>,
}

impl<'g> Builder<'g> {
    fn add_node(&mut self, idx: usize, depth: usize) {
        let node = self.store.node_at(idx);
        self.nodes.insert(
            idx,
            EgoNode {
                id: node.id.clone(),
                name: node.display_name().to_string(),
                node_type: node.node_type,
                depth,
                is_center: depth == 0,
                notable: node.notable,
                genre: node.genre.clone(),
            },
        );
    }

    /// Links are keyed by `source-target`; a later edge between the same
    /// pair replaces the earlier one in place
    fn add_link(&mut self, edge_idx: usize, direction: LinkDirection) {
        let edge = self.store.edge_at(edge_idx);
        self.links.insert(
            (edge.source.clone(), edge.target.clone()),
            EgoLink {
                source: edge.source.clone(),
                target: edge.target.clone(),
                edge_type: edge.edge_type,
                is_influence: edge.edge_type.is_influence(),
                direction,
            },
        );
    }
}

/// Ego network around the node named `center_name`
pub fn ego_network(store: &GraphStore, center_name: &str, view: EgoView) -> GraphResult<EgoNetwork> {
    let center = store.require_named(center_name)?;
    let center_idx = store
        .index_of(&center.id)
        .ok_or_else(|| GraphError::NodeNotFound(center.id.clone()))?;
    let topology = store.topology();
    let followed = view.edge_types();

    let mut builder = Builder {
        store,
        nodes: IndexMap::new(),
        links: IndexMap::new(),
    };
    builder.add_node(center_idx, 0);

    let mut groups = Vec::new();
    for inc in topology.incident(center_idx) {
        if inc.neighbor == center_idx {
            continue;
        }
        let edge = store.edge_at(inc.edge);
        if !followed.contains(&edge.edge_type) {
            continue;
        }
        builder.add_node(inc.neighbor, 1);
        if store.node_at(inc.neighbor).is(NodeType::MusicalGroup) && !groups.contains(&inc.neighbor) {
            groups.push(inc.neighbor);
        }
        let direction = if inc.forward {
            LinkDirection::Out
        } else {
            LinkDirection::In
        };
        builder.add_link(inc.edge, direction);
    }

    if view == EgoView::Collaborations {
        // Members of the center's groups, in edge order
        for (edge_idx, edge) in store.edges().iter().enumerate() {
            if edge.edge_type != EdgeType::MemberOf {
                continue;
            }
            let (member, group) = topology.endpoints[edge_idx];
            if groups.contains(&group) && !builder.nodes.contains_key(&member) {
                builder.add_node(member, 2);
                builder.add_link(edge_idx, LinkDirection::Out);
            }
        }

        // Other contributors of songs the center wrote lyrics for
        let lyric_songs: Vec<usize> = topology
            .out_edge_ids(center_idx)
            .iter()
            .filter(|&&e| store.edge_at(e).edge_type == EdgeType::LyricistOf)
            .map(|&e| topology.endpoints[e].1)
            .collect();
        for (edge_idx, edge) in store.edges().iter().enumerate() {
            if !edge.edge_type.is_contribution() {
                continue;
            }
            let (person, song) = topology.endpoints[edge_idx];
            if person == center_idx
                || !lyric_songs.contains(&song)
                || !store.node_at(person).is(NodeType::Person)
                || builder.nodes.contains_key(&person)
            {
                continue;
            }
            builder.add_node(person, 2);
            builder.add_link(edge_idx, LinkDirection::Out);
        }
    }

    debug!(
        "Ego network of {} ({}): {} nodes, {} links",
        center_name,
        view,
        builder.nodes.len(),
        builder.links.len()
    );

    Ok(EgoNetwork {
        center: center.id.clone(),
        view,
        nodes: builder.nodes.into_values().collect(),
        links: builder.links.into_values().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn fixture() -> GraphStore {
        GraphStore::from_parts(
            vec![
                Node::new("s", NodeType::Person).with_name("Sailor Shift"),
                Node::new("g", NodeType::MusicalGroup).with_name("Ivy Echos"),
                Node::new("m", NodeType::Person).with_name("Maya"),
                Node::new("l", NodeType::Song).with_name("Lyric Song").notable(true),
                Node::new("p", NodeType::Person).with_name("Pat"),
                Node::new("o", NodeType::Song).with_name("Old Song").notable(true),
                Node::new("r", NodeType::RecordLabel).with_name("Label"),
            ],
            vec![
                Edge::new("s", "g", EdgeType::MemberOf),
                Edge::new("m", "g", EdgeType::MemberOf),
                Edge::new("s", "l", EdgeType::LyricistOf),
                Edge::new("p", "l", EdgeType::PerformerOf),
                Edge::new("l", "o", EdgeType::CoverOf),
                Edge::new("o", "s", EdgeType::InStyleOf),
                Edge::new("l", "r", EdgeType::RecordedBy),
            ],
        )
    }

    fn names(network: &EgoNetwork, depth: usize) -> Vec<&str> {
        network.nodes_at_depth(depth).map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_collaborations_view() {
        let network = ego_network(&fixture(), "Sailor Shift", EgoView::Collaborations).unwrap();

        assert_eq!(names(&network, 0), vec!["Sailor Shift"]);
        assert_eq!(names(&network, 1), vec!["Ivy Echos", "Lyric Song"]);
        assert_eq!(names(&network, 2), vec!["Maya", "Pat"]);
        assert_eq!(network.links.len(), 4);
        assert!(network.links.iter().all(|l| !l.is_influence));
        assert!(network.nodes[0].is_center);
    }

    #[test]
    fn test_influences_view() {
        let network = ego_network(&fixture(), "Sailor Shift", EgoView::Influences).unwrap();

        assert_eq!(names(&network, 1), vec!["Old Song"]);
        assert_eq!(names(&network, 2), Vec::<&str>::new());
        assert_eq!(network.links.len(), 1);
        assert_eq!(network.links[0].direction, LinkDirection::In);
        assert!(network.links[0].is_influence);
    }

    #[test]
    fn test_missing_center() {
        let result = ego_network(&fixture(), "Nobody", EgoView::Influences);
        assert_eq!(result, Err(GraphError::NamedNodeNotFound("Nobody".to_string())));
    }

    #[test]
    fn test_view_parse() {
        assert_eq!("influences".parse::<EgoView>(), Ok(EgoView::Influences));
        assert!("friends".parse::<EgoView>().is_err());
        assert_eq!(EgoView::Collaborations.edge_types().len(), 5);
    }
}
