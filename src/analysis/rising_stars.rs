//! Rising-star scoring
//!
//! Candidates are people who performed or composed focus-genre works, have
//! a career of at least a few dated works, at least one notable work, and
//! released something in the trailing window that ends at the reference
//! date. They are scored on what they did inside that window.

use super::attributes::{WorkAttributes, UNKNOWN_GENRE};
use crate::config::RisingStarsConfig;
use crate::graph::{EdgeType, GraphError, GraphResult, GraphStore, NodeId, NodeType, SongLookup};
use chrono::NaiveDate;
use indexmap::IndexSet;
use oceanus_graph_algorithms::{rank_by_score, top_k_by_count, NodeIndex};
use serde::Serialize;
use tracing::debug;

/// Edge types that tie an artist to their own works
const AUTHORSHIP: [EdgeType; 2] = [EdgeType::PerformerOf, EdgeType::ComposerOf];

/// One dated work on an artist's timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub work: NodeId,
    pub name: String,
    pub node_type: NodeType,
    pub date: NaiveDate,
    pub genre: String,
    pub notable: bool,
}

/// Career metrics of one artist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistMetrics {
    pub artist: NodeId,
    pub name: String,
    /// Dated works, oldest first
    pub timeline: Vec<TimelineEntry>,
    pub notable_works: usize,
    /// Years from the first work to the first notable one
    pub time_to_success: Option<f64>,
    pub genre_spread: usize,
    pub collaboration_score: usize,
    pub total_works: usize,
    pub genres: Vec<String>,
}

/// The four numbers a potential score is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreInputs {
    pub notable_works: usize,
    pub genre_spread: usize,
    pub collaboration_score: usize,
    pub time_to_success: Option<f64>,
}

impl ScoreInputs {
    /// `max(0, 5 - t) + 2 * notable + spread + 1.5 * collaborations`,
    /// with the time term 0 when `t` is unknown
    pub fn potential_score(&self) -> f64 {
        let time_score = self
            .time_to_success
            .map(|t| (5.0 - t).max(0.0))
            .unwrap_or(0.0);
        time_score
            + 2.0 * self.notable_works as f64
            + self.genre_spread as f64
            + 1.5 * self.collaboration_score as f64
    }
}

/// A ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RisingStar {
    pub artist: NodeId,
    pub name: String,
    pub metrics: ArtistMetrics,
    /// Inputs restricted to the trailing window
    pub windowed: ScoreInputs,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collaboration {
    pub artist: String,
    pub collaborator: String,
    pub shared_works: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreVersatility {
    pub artist: String,
    pub genres: Vec<String>,
    pub versatility: usize,
}

/// Everything the rising-stars panel shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RisingStarsReport {
    pub predictions: Vec<RisingStar>,
    pub trajectories: Vec<ArtistMetrics>,
    pub average_time_to_success: Option<f64>,
    pub key_collaborations: Vec<Collaboration>,
    pub genre_versatility: Vec<GenreVersatility>,
}

/// Song/album nodes linked to the artist by performing or composing, in
/// edge order, each listed once
fn works_of(store: &GraphStore, artist: NodeIndex) -> Vec<NodeIndex> {
    let mut works = IndexSet::new();
    for inc in store.topology().incident(artist) {
        let edge = store.edge_at(inc.edge);
        if AUTHORSHIP.contains(&edge.edge_type) && store.node_at(inc.neighbor).is_work() {
            works.insert(inc.neighbor);
        }
    }
    works.into_iter().collect()
}

/// Other people who performed or composed `work`, in edge order
fn co_authors(store: &GraphStore, work: NodeIndex, artist: NodeIndex) -> Vec<NodeIndex> {
    let mut people = IndexSet::new();
    for inc in store.topology().incident(work) {
        let edge = store.edge_at(inc.edge);
        if inc.neighbor != artist
            && AUTHORSHIP.contains(&edge.edge_type)
            && store.node_at(inc.neighbor).is(NodeType::Person)
        {
            people.insert(inc.neighbor);
        }
    }
    people.into_iter().collect()
}

fn notable_co_authors<'w>(
    store: &GraphStore,
    works: impl IntoIterator<Item = &'w NodeIndex>,
    artist: NodeIndex,
) -> usize {
    let mut notable = IndexSet::new();
    for &work in works {
        for person in co_authors(store, work, artist) {
            if store.node_at(person).notable {
                notable.insert(person);
            }
        }
    }
    notable.len()
}

fn metrics_at(store: &GraphStore, attrs: &WorkAttributes, artist: NodeIndex) -> ArtistMetrics {
    let works = works_of(store, artist);

    let mut genres: IndexSet<String> = IndexSet::new();
    let mut timeline = Vec::new();
    for &idx in &works {
        let work = store.node_at(idx);
        let genre = attrs.genre(work);
        if let Some(g) = genre {
            genres.insert(g.to_string());
        }
        if let Some(date) = attrs.release_day(work) {
            let name = match work.name.as_deref() {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => format!("{} {}", work.node_type, work.id),
            };
            timeline.push(TimelineEntry {
                work: work.id.clone(),
                name,
                node_type: work.node_type,
                date,
                genre: genre.unwrap_or(UNKNOWN_GENRE).to_string(),
                notable: work.notable,
            });
        }
    }
    timeline.sort_by_key(|entry| entry.date);

    let time_to_success = timeline.first().and_then(|first| {
        timeline
            .iter()
            .find(|e| e.notable)
            .map(|hit| (hit.date - first.date).num_days() as f64 / 365.0)
    });

    let node = store.node_at(artist);
    ArtistMetrics {
        artist: node.id.clone(),
        name: node.display_name().to_string(),
        notable_works: timeline.iter().filter(|e| e.notable).count(),
        time_to_success,
        genre_spread: genres.len(),
        collaboration_score: notable_co_authors(store, &works, artist),
        total_works: works.len(),
        genres: genres.into_iter().collect(),
        timeline,
    }
}

/// Career metrics of one artist
pub fn artist_metrics(
    store: &GraphStore,
    songs: Option<&SongLookup>,
    artist: &NodeId,
) -> GraphResult<ArtistMetrics> {
    let idx = store
        .index_of(artist)
        .ok_or_else(|| GraphError::NodeNotFound(artist.clone()))?;
    Ok(metrics_at(store, &WorkAttributes::new(songs), idx))
}

/// Score inputs over the timeline entries released on or after `window_start`
fn windowed_inputs(
    store: &GraphStore,
    metrics: &ArtistMetrics,
    artist: NodeIndex,
    window_start: NaiveDate,
) -> ScoreInputs {
    let recent: Vec<&TimelineEntry> = metrics
        .timeline
        .iter()
        .filter(|e| e.date >= window_start)
        .collect();

    let genres: IndexSet<&str> = recent.iter().map(|e| e.genre.as_str()).collect();
    let works: Vec<NodeIndex> = recent
        .iter()
        .filter_map(|e| store.index_of(&e.work))
        .collect();

    ScoreInputs {
        notable_works: recent.iter().filter(|e| e.notable).count(),
        genre_spread: genres.len(),
        collaboration_score: notable_co_authors(store, &works, artist),
        time_to_success: metrics.time_to_success,
    }
}

/// Rank every qualifying artist, best first, keeping `max_predictions`
pub fn find_rising_stars(
    store: &GraphStore,
    songs: Option<&SongLookup>,
    config: &RisingStarsConfig,
) -> Vec<RisingStar> {
    let attrs = WorkAttributes::new(songs);
    let window_start = config.window_start();
    let reference = config.reference_date;

    let mut candidates = Vec::new();
    for (idx, node) in store.nodes().iter().enumerate() {
        if !node.is(NodeType::Person) {
            continue;
        }
        let works = works_of(store, idx);
        if !works
            .iter()
            .any(|&w| attrs.has_genre(store.node_at(w), &config.focus_genre))
        {
            continue;
        }

        let metrics = metrics_at(store, &attrs, idx);
        if metrics.notable_works == 0 || metrics.timeline.len() < config.min_timeline_entries {
            continue;
        }
        let active = metrics
            .timeline
            .iter()
            .any(|e| e.date >= window_start && e.date < reference);
        if !active {
            continue;
        }

        let windowed = windowed_inputs(store, &metrics, idx, window_start);
        let score = windowed.potential_score();
        debug!(
            "Rising star candidate {}: {} notable, {} genres, {} collaborators, score {:.1}",
            metrics.name,
            windowed.notable_works,
            windowed.genre_spread,
            windowed.collaboration_score,
            score
        );
        candidates.push(RisingStar {
            artist: metrics.artist.clone(),
            name: metrics.name.clone(),
            metrics,
            windowed,
            score,
        });
    }

    let mut ranked = rank_by_score(candidates, |star| star.score);
    ranked.truncate(config.max_predictions);
    ranked
}

/// Predictions plus the trajectory panel for the best few
pub fn rising_stars_report(
    store: &GraphStore,
    songs: Option<&SongLookup>,
    config: &RisingStarsConfig,
) -> RisingStarsReport {
    let predictions = find_rising_stars(store, songs, config);
    let trajectories: Vec<ArtistMetrics> = predictions
        .iter()
        .take(config.trajectory_count)
        .map(|star| star.metrics.clone())
        .collect();

    let times: Vec<f64> = trajectories
        .iter()
        .filter_map(|m| m.time_to_success)
        .collect();
    let average_time_to_success = if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<f64>() / times.len() as f64)
    };

    let mut pairs = Vec::new();
    for metrics in &trajectories {
        let Some(artist) = store.index_of(&metrics.artist) else {
            continue;
        };
        for work in works_of(store, artist) {
            for person in co_authors(store, work, artist) {
                pairs.push((
                    metrics.name.clone(),
                    store.node_at(person).display_name().to_string(),
                ));
            }
        }
    }
    let key_collaborations = top_k_by_count(pairs, 10)
        .into_iter()
        .map(|((artist, collaborator), shared_works)| Collaboration {
            artist,
            collaborator,
            shared_works,
        })
        .collect();

    let versatility: Vec<GenreVersatility> = trajectories
        .iter()
        .map(|m| GenreVersatility {
            artist: m.name.clone(),
            genres: m.genres.clone(),
            versatility: m.genre_spread,
        })
        .collect();
    let genre_versatility = rank_by_score(versatility, |v| v.versatility as f64);

    RisingStarsReport {
        predictions,
        trajectories,
        average_time_to_success,
        key_collaborations,
        genre_versatility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node, SongRecord};

    fn work(id: &str, genre: &str, date: &str, notable: bool) -> Node {
        Node::new(id, NodeType::Song)
            .with_name(id.to_uppercase())
            .with_genre(genre)
            .with_release_date(date)
            .notable(notable)
    }

    fn person(id: &str, name: &str, notable: bool) -> Node {
        Node::new(id, NodeType::Person).with_name(name).notable(notable)
    }

    fn fixture() -> GraphStore {
        GraphStore::from_parts(
            vec![
                person("a", "Ada", true),
                person("b", "Bo", false),
                person("c", "Cy", true),
                person("d", "Di", false),
                person("e", "Eve", false),
                work("w1", "Oceanus Folk", "2030-01-01", true),
                work("w2", "Pop", "2035-05-01", true),
                work("w3", "Oceanus Folk", "2036", true),
                work("w4", "Jazz", "2037", true),
                work("w5", "Oceanus Folk", "2020", false),
                work("w6", "Oceanus Folk", "2022", true),
                work("w7", "Oceanus Folk", "2034-06-01", true),
            ],
            vec![
                Edge::new("a", "w1", EdgeType::PerformerOf),
                Edge::new("a", "w2", EdgeType::PerformerOf),
                Edge::new("a", "w3", EdgeType::ComposerOf),
                Edge::new("c", "w2", EdgeType::ComposerOf),
                Edge::new("d", "w1", EdgeType::PerformerOf),
                Edge::new("d", "w4", EdgeType::PerformerOf),
                Edge::new("b", "w4", EdgeType::PerformerOf),
                Edge::new("e", "w5", EdgeType::PerformerOf),
                Edge::new("e", "w6", EdgeType::PerformerOf),
                Edge::new("e", "w7", EdgeType::PerformerOf),
                // producing is not authorship
                Edge::new("c", "w3", EdgeType::ProducerOf),
            ],
        )
    }

    #[test]
    fn test_artist_metrics() {
        let store = fixture();
        let metrics = artist_metrics(&store, None, &NodeId::from("a")).unwrap();

        assert_eq!(metrics.total_works, 3);
        assert_eq!(metrics.notable_works, 3);
        assert_eq!(metrics.time_to_success, Some(0.0));
        assert_eq!(metrics.genres, vec!["Oceanus Folk", "Pop"]);
        // Cy co-composed w2; Di is not notable
        assert_eq!(metrics.collaboration_score, 1);
        let dates: Vec<_> = metrics.timeline.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2030-01-01", "2035-05-01", "2036-01-01"]);
    }

    #[test]
    fn test_time_to_success() {
        let store = fixture();
        let metrics = artist_metrics(&store, None, &NodeId::from("e")).unwrap();
        let years = metrics.time_to_success.unwrap();
        assert!((years - 731.0 / 365.0).abs() < 1e-9);
        assert_eq!(metrics.notable_works, 2);
    }

    #[test]
    fn test_unknown_artist() {
        let store = fixture();
        assert!(artist_metrics(&store, None, &NodeId::from("zz")).is_err());
    }

    #[test]
    fn test_potential_score() {
        let inputs = ScoreInputs {
            notable_works: 2,
            genre_spread: 2,
            collaboration_score: 1,
            time_to_success: Some(0.0),
        };
        assert_eq!(inputs.potential_score(), 12.5);

        let slow = ScoreInputs {
            time_to_success: Some(9.0),
            ..inputs
        };
        assert_eq!(slow.potential_score(), 7.5);

        let never = ScoreInputs {
            time_to_success: None,
            ..inputs
        };
        assert_eq!(never.potential_score(), 7.5);
    }

    #[test]
    fn test_find_rising_stars() {
        let store = fixture();
        let stars = find_rising_stars(&store, None, &RisingStarsConfig::default());

        let names: Vec<_> = stars.iter().map(|s| s.name.as_str()).collect();
        // Bo and Di have no focus-genre career worth ranking
        assert_eq!(names, vec!["Ada", "Eve"]);

        let ada = &stars[0];
        assert_eq!(ada.windowed.notable_works, 2);
        assert_eq!(ada.windowed.genre_spread, 2);
        assert_eq!(ada.windowed.collaboration_score, 1);
        assert_eq!(ada.score, 12.5);

        let eve = &stars[1];
        assert_eq!(eve.windowed.notable_works, 1);
        assert_eq!(eve.windowed.genre_spread, 1);
        assert!((eve.score - (8.0 - 731.0 / 365.0)).abs() < 1e-9);
    }

    #[test]
    fn test_window_excludes_inactive_artists() {
        let store = fixture();
        let config = RisingStarsConfig {
            reference_date: NaiveDate::from_ymd_opt(2029, 1, 1).unwrap(),
            ..Default::default()
        };
        // window 2024..2029 has no releases
        assert!(find_rising_stars(&store, None, &config).is_empty());
    }

    #[test]
    fn test_focus_genre_from_lookup() {
        let store = GraphStore::from_parts(
            vec![
                person("p", "Pia", false),
                Node::new("x1", NodeType::Song).with_release_date("2035").notable(true),
                Node::new("x2", NodeType::Song).with_release_date("2036").notable(true),
                Node::new("x3", NodeType::Song).with_release_date("2037").notable(true),
            ],
            vec![
                Edge::new("p", "x1", EdgeType::PerformerOf),
                Edge::new("p", "x2", EdgeType::PerformerOf),
                Edge::new("p", "x3", EdgeType::PerformerOf),
            ],
        );
        let config = RisingStarsConfig::default();
        assert!(find_rising_stars(&store, None, &config).is_empty());

        let mut songs = SongLookup::new();
        songs.insert(
            "x2",
            SongRecord {
                genre: Some("Oceanus Folk".to_string()),
                release_date: None,
            },
        );
        let stars = find_rising_stars(&store, Some(&songs), &config);
        assert_eq!(stars.len(), 1);
        // x1 and x3 have no genre anywhere
        assert_eq!(stars[0].windowed.genre_spread, 2);
        assert_eq!(stars[0].metrics.genre_spread, 1);
    }

    #[test]
    fn test_report() {
        let store = fixture();
        let report = rising_stars_report(&store, None, &RisingStarsConfig::default());

        assert_eq!(report.trajectories.len(), 2);
        let average = report.average_time_to_success.unwrap();
        assert!((average - (731.0 / 365.0) / 2.0).abs() < 1e-9);

        let pairs: Vec<_> = report
            .key_collaborations
            .iter()
            .map(|c| (c.artist.as_str(), c.collaborator.as_str(), c.shared_works))
            .collect();
        assert_eq!(pairs, vec![("Ada", "Di", 1), ("Ada", "Cy", 1)]);

        assert_eq!(report.genre_versatility[0].artist, "Ada");
        assert_eq!(report.genre_versatility[0].versatility, 2);
    }
}
