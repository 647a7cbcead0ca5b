//! Influence attribution paths around a seed artist
//!
//! Walks outward from the seed over edges in both directions. Whenever the
//! walk steps onto a dated song or album, every other person who contributed
//! to that work is credited with one event carrying the full textual path.
//! Dated works end a path, even when the date has no readable year;
//! everything else is expanded further.

use crate::config::InfluencePathsConfig;
use crate::graph::{GraphResult, GraphStore, NodeId, NodeType};
use oceanus_graph_algorithms::{bounded_bfs, top_k_by_count, NodeIndex, Visit};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

/// One credited contribution reached from the seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfluenceEvent {
    pub contributor_id: NodeId,
    pub contributor_name: String,
    /// `None` when the release date has no year in it
    pub release_year: Option<i32>,
    /// Seed name, then one sentence per step
    pub path: Vec<String>,
}

impl InfluenceEvent {
    pub fn path_text(&self) -> String {
        self.path.join(" > ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorRank {
    pub id: NodeId,
    pub name: String,
    pub events: usize,
}

/// Ranked contributors and the events behind them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencePaths {
    pub seed: NodeId,
    pub seed_name: String,
    /// Every collected event, in discovery order
    pub events: Vec<InfluenceEvent>,
    pub top_contributors: Vec<ContributorRank>,
    /// Events of the top contributors only, in discovery order
    pub top_events: Vec<InfluenceEvent>,
}

/// Collect attribution events from the node named `seed_name`
pub fn collect_influence_events(
    store: &GraphStore,
    seed_name: &str,
    max_depth: usize,
) -> GraphResult<Vec<InfluenceEvent>> {
    let seed = store.require_named(seed_name)?;
    let Some(seed_idx) = store.index_of(&seed.id) else {
        return Ok(Vec::new());
    };
    let topology = store.topology();

    let mut events = Vec::new();
    let mut seen_paths: FxHashSet<(NodeIndex, String)> = FxHashSet::default();

    let expanded = bounded_bfs(
        topology,
        seed_idx,
        vec![seed.display_name().to_string()],
        max_depth,
        |path, step| {
            let current = store.node_at(step.from);
            let neighbor = store.node_at(step.to);
            let edge = store.edge_at(step.edge);
            let (source, target) = if step.forward {
                (current, neighbor)
            } else {
                (neighbor, current)
            };

            let mut next = path.clone();
            next.push(
                edge.edge_type
                    .describe(source.display_name(), target.display_name()),
            );

            let release_date = neighbor
                .release_date
                .as_deref()
                .filter(|d| !d.is_empty() && neighbor.is_work());
            let Some(release_date) = release_date else {
                return Visit::Enqueue(next);
            };
            let release_year = neighbor.release_year();

            let released = format!("{} was released in {}", neighbor.display_name(), release_date);
            for inc in topology.incident(step.to) {
                let credit = store.edge_at(inc.edge);
                let person = store.node_at(inc.neighbor);
                if !credit.edge_type.is_contribution()
                    || !person.is(NodeType::Person)
                    || inc.neighbor == seed_idx
                {
                    continue;
                }
                let (credit_source, credit_target) = if inc.forward {
                    (neighbor, person)
                } else {
                    (person, neighbor)
                };

                let mut full = next.clone();
                full.push(released.clone());
                full.push(
                    credit
                        .edge_type
                        .describe(credit_source.display_name(), credit_target.display_name()),
                );

                if seen_paths.insert((inc.neighbor, full.join(" > "))) {
                    events.push(InfluenceEvent {
                        contributor_id: person.id.clone(),
                        contributor_name: person.display_name().to_string(),
                        release_year,
                        path: full,
                    });
                }
            }
            Visit::Stop
        },
    );

    debug!(
        "Influence walk from {} expanded {} nodes, {} events",
        seed_name,
        expanded,
        events.len()
    );
    Ok(events)
}

/// Collect events and keep the `top_contributors` most credited people
pub fn influence_paths(store: &GraphStore, config: &InfluencePathsConfig) -> GraphResult<InfluencePaths> {
    let seed = store.require_named(&config.seed_name)?;
    let events = collect_influence_events(store, &config.seed_name, config.max_depth)?;

    let ranked = top_k_by_count(
        events
            .iter()
            .map(|e| &e.contributor_id)
            .filter(|id| **id != seed.id),
        config.top_contributors,
    );

    let top_contributors: Vec<ContributorRank> = ranked
        .into_iter()
        .map(|(id, count)| ContributorRank {
            id: id.clone(),
            name: store
                .find_node(id)
                .map(|n| n.display_name().to_string())
                .unwrap_or_default(),
            events: count,
        })
        .collect();

    let top_ids: FxHashSet<&NodeId> = top_contributors.iter().map(|c| &c.id).collect();
    let top_events = events
        .iter()
        .filter(|e| top_ids.contains(&e.contributor_id))
        .cloned()
        .collect();

    Ok(InfluencePaths {
        seed: seed.id.clone(),
        seed_name: seed.display_name().to_string(),
        events,
        top_contributors,
        top_events,
    })
}
