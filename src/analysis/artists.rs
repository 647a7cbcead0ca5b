//! Artist roster and seed-artist genres

use crate::graph::{EdgeType, GraphResult, GraphStore, NodeId, NodeType};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistEntry {
    pub id: NodeId,
    pub name: String,
    pub notable: bool,
    /// Edge types this person is the source of
    pub roles: BTreeSet<EdgeType>,
}

/// Every person, sorted by display name ignoring case
pub fn artist_roster(store: &GraphStore) -> Vec<ArtistEntry> {
    let topology = store.topology();
    let mut roster: Vec<ArtistEntry> = store
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is(NodeType::Person))
        .map(|(idx, node)| ArtistEntry {
            id: node.id.clone(),
            name: node.display_name().to_string(),
            notable: node.notable,
            roles: topology
                .out_edge_ids(idx)
                .iter()
                .map(|&e| store.edge_at(e).edge_type)
                .collect(),
        })
        .collect();
    roster.sort_by_cached_key(|entry| entry.name.to_lowercase());
    roster
}

/// Distinct genres of the targets of edges leaving the named node, in edge order
pub fn seed_genres(store: &GraphStore, name: &str) -> GraphResult<Vec<String>> {
    let seed = store.require_named(name)?;
    let genres: IndexSet<String> = store
        .outgoing(&seed.id)
        .into_iter()
        .filter_map(|edge| store.find_node(&edge.target))
        .filter_map(|node| node.genre.clone())
        .filter(|genre| !genre.is_empty())
        .collect();
    Ok(genres.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn fixture() -> GraphStore {
        GraphStore::from_parts(
            vec![
                Node::new("1", NodeType::Person).with_name("sailor Shift"),
                Node::new("2", NodeType::Person).with_stage_name("Ana"),
                Node::new("3", NodeType::Person).with_name("Zed"),
                Node::new("4", NodeType::Song).with_genre("Oceanus Folk"),
                Node::new("5", NodeType::Song).with_genre("Dream Pop"),
                Node::new("6", NodeType::Album).with_genre("Oceanus Folk"),
            ],
            vec![
                Edge::new("1", "4", EdgeType::PerformerOf),
                Edge::new("1", "5", EdgeType::LyricistOf),
                Edge::new("1", "6", EdgeType::PerformerOf),
                Edge::new("3", "4", EdgeType::ComposerOf),
            ],
        )
    }

    #[test]
    fn test_roster_order_and_roles() {
        let roster = artist_roster(&fixture());
        let names: Vec<_> = roster.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "sailor Shift", "Zed"]);

        let sailor = &roster[1];
        assert_eq!(
            sailor.roles.iter().copied().collect::<Vec<_>>(),
            vec![EdgeType::PerformerOf, EdgeType::LyricistOf]
        );
        assert!(roster[0].roles.is_empty());
    }

    #[test]
    fn test_seed_genres() {
        let genres = seed_genres(&fixture(), "sailor Shift").unwrap();
        assert_eq!(genres, vec!["Oceanus Folk", "Dream Pop"]);
        assert!(seed_genres(&fixture(), "Sailor Shift").is_err());
    }
}
